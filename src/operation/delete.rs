//! Operation deletion endpoint.

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
    authz::operation_capabilities,
    operation::{OperationId, delete_operation, get_operation},
    project::get_project,
    user::UserId,
};

/// The state needed for deleting an operation.
#[derive(Debug, Clone)]
pub struct DeleteOperationEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteOperationEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete an operation. Returns a success alert or an error alert.
pub async fn delete_operation_endpoint(
    Path(operation_id): Path<OperationId>,
    State(state): State<DeleteOperationEndpointState>,
    Extension(user_id): Extension<UserId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let operation = match get_operation(operation_id, &connection) {
        Ok(operation) => operation,
        Err(error) => return error.into_alert_response(),
    };
    let project = match get_project(operation.project_id, &connection) {
        Ok(project) => project,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = operation_capabilities(project.owner, user_id).ensure_can_delete() {
        return error.into_alert_response();
    }

    match delete_operation(operation_id, &connection) {
        Ok(()) => Alert::success("Operation deleted", "").into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting operation {operation_id}: {error}"
            );

            error.into_alert_response()
        }
    }
}
