//! Endpoint for deleting a project and everything in it.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, authz::project_capabilities, endpoints,
    project::{ProjectId, delete_project, get_project},
    user::UserId,
};

/// The state needed for deleting a project.
#[derive(Debug, Clone)]
pub struct DeleteProjectEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteProjectEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a project along with its members, categories, and operations.
///
/// Redirects to the projects page since the confirmation modal is opened
/// from there.
pub async fn delete_project_endpoint(
    Path(project_id): Path<ProjectId>,
    State(state): State<DeleteProjectEndpointState>,
    Extension(user_id): Extension<UserId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let project = match get_project(project_id, &connection) {
        Ok(project) => project,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = project_capabilities(project.owner, user_id).ensure_can_delete() {
        return error.into_alert_response();
    }

    match delete_project(project_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::PROJECTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting project {project_id}: {error}"
            );

            error.into_alert_response()
        }
    }
}
