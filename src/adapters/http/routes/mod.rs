pub mod auth;
pub mod user;

use axum::Router;
use serde::Serialize;

use crate::{
    adapters::http::app_state::AppState, domain::entities::user::UserView,
    use_cases::user::SessionGrant,
};

pub fn router() -> Router<AppState> {
    Router::new().merge(user::router()).merge(auth::router())
}

/// Body returned whenever a SESSION token is handed out.
#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserView,
}

impl From<SessionGrant> for SessionResponse {
    fn from(grant: SessionGrant) -> Self {
        Self {
            user: UserView::from(&grant.user),
            token: grant.token,
        }
    }
}
