//! Team leadership endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::leadership::{HistoryEntry, LeaderInfo};
use crate::domain::team::TeamId;
use crate::domain::user::UserId;

/// Body of assign and change requests
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderApiRequest {
    pub user_id: i64,
}

/// Leader of a team
#[derive(Debug, Clone, Serialize)]
pub struct LeaderResponse {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub started_at: String,
}

impl From<&LeaderInfo> for LeaderResponse {
    fn from(info: &LeaderInfo) -> Self {
        Self {
            user_id: info.user_id.value(),
            name: info.name.clone(),
            email: info.email.clone(),
            started_at: info.started_at.to_rfc3339(),
        }
    }
}

/// Current leader of a team, `null` when the team has none
#[derive(Debug, Clone, Serialize)]
pub struct CurrentLeaderResponse {
    pub team_id: i64,
    pub leader: Option<LeaderResponse>,
}

/// One leadership term
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub leader_id: i64,
    pub leader_name: String,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub is_current: bool,
}

impl From<&HistoryEntry> for HistoryEntryResponse {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.record_id.map(|id| id.value()),
            leader_id: entry.leader_id.value(),
            leader_name: entry.leader_name.clone(),
            started_at: entry.started_at.to_rfc3339(),
            ended_at: entry.ended_at.map(|t| t.to_rfc3339()),
            is_current: entry.is_current,
        }
    }
}

/// Leadership history response
#[derive(Debug, Clone, Serialize)]
pub struct LeadershipHistoryResponse {
    pub team_id: i64,
    pub history: Vec<HistoryEntryResponse>,
    pub total: usize,
}

fn parse_team_id(raw: &str) -> Result<TeamId, ApiError> {
    let id = raw
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request(format!("Invalid team id '{}'", raw)).with_param("team_id"))?;

    TeamId::new(id).map_err(|e| ApiError::from(e).with_param("team_id"))
}

fn parse_user_id(raw: i64) -> Result<UserId, ApiError> {
    UserId::new(raw).map_err(|e| ApiError::from(e).with_param("user_id"))
}

/// POST /teams/{team_id}/leader
pub async fn assign_leader(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Json(request): Json<LeaderApiRequest>,
) -> Result<(StatusCode, Json<LeaderResponse>), ApiError> {
    debug!(team_id = %team_id, user_id = request.user_id, "Assigning team leader");

    let team_id = parse_team_id(&team_id)?;
    let user_id = parse_user_id(request.user_id)?;

    let leader = state
        .leadership_service
        .assign_leader(team_id, user_id)
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(LeaderResponse::from(&leader))))
}

/// PUT /teams/{team_id}/leader
pub async fn change_leader(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Json(request): Json<LeaderApiRequest>,
) -> Result<Json<LeaderResponse>, ApiError> {
    debug!(team_id = %team_id, user_id = request.user_id, "Changing team leader");

    let team_id = parse_team_id(&team_id)?;
    let user_id = parse_user_id(request.user_id)?;

    let leader = state
        .leadership_service
        .change_leader(team_id, user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(LeaderResponse::from(&leader)))
}

/// DELETE /teams/{team_id}/leader
pub async fn remove_leader(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(team_id = %team_id, "Removing team leader");

    let team_id = parse_team_id(&team_id)?;

    state
        .leadership_service
        .remove_leader(team_id)
        .await
        .map_err(ApiError::from)?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /teams/{team_id}/leader
pub async fn get_current_leader(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<CurrentLeaderResponse>, ApiError> {
    debug!(team_id = %team_id, "Getting current team leader");

    let team_id = parse_team_id(&team_id)?;

    let leader = state
        .leadership_service
        .get_current_leader(team_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(CurrentLeaderResponse {
        team_id: team_id.value(),
        leader: leader.as_ref().map(LeaderResponse::from),
    }))
}

/// GET /teams/{team_id}/leadership-history
pub async fn get_leadership_history(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<LeadershipHistoryResponse>, ApiError> {
    debug!(team_id = %team_id, "Getting team leadership history");

    let team_id = parse_team_id(&team_id)?;

    let entries = state
        .leadership_service
        .get_leadership_history(team_id)
        .await
        .map_err(ApiError::from)?;

    let history: Vec<HistoryEntryResponse> = entries.iter().map(HistoryEntryResponse::from).collect();
    let total = history.len();

    Ok(Json(LeadershipHistoryResponse {
        team_id: team_id.value(),
        history,
        total,
    }))
}
