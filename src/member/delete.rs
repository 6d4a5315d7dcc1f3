//! Member deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    authz::member_capabilities,
    member::{MemberId, delete_member, get_member},
    project::get_project,
    user::UserId,
};

/// The state needed for deleting a member.
#[derive(Debug, Clone)]
pub struct DeleteMemberEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteMemberEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Remove a member from their project. Operations tagged to the member keep
/// existing without a member. Returns a success alert or an error alert.
pub async fn delete_member_endpoint(
    Path(member_id): Path<MemberId>,
    State(state): State<DeleteMemberEndpointState>,
    Extension(user_id): Extension<UserId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let member = match get_member(member_id, &connection) {
        Ok(member) => member,
        Err(error) => return error.into_alert_response(),
    };
    let project = match get_project(member.project_id, &connection) {
        Ok(project) => project,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = member_capabilities(project.owner, user_id).ensure_can_delete() {
        return error.into_alert_response();
    }

    match delete_member(member_id, &connection) {
        Ok(()) => Alert::success("Member removed", "").into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting member {member_id}: {error}"
            );

            error.into_alert_response()
        }
    }
}
