//! Team API endpoints

pub mod leadership;

use axum::{
    routing::get,
    Router,
};

use super::state::AppState;

/// Create the team router
pub fn create_teams_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{team_id}/leader",
            get(leadership::get_current_leader)
                .post(leadership::assign_leader)
                .put(leadership::change_leader)
                .delete(leadership::remove_leader),
        )
        .route(
            "/{team_id}/leadership-history",
            get(leadership::get_leadership_history),
        )
}
