//! Member creation endpoint.
//!
//! The add-member form lives on the project edit page, so there is no
//! standalone creation page. The acting user becomes the account behind the
//! new member.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    authz::member_capabilities,
    endpoints,
    member::{MemberName, create_member, domain::MemberFormData},
    project::get_project,
    user::UserId,
};

/// The state needed for creating a member.
#[derive(Debug, Clone)]
pub struct CreateMemberEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateMemberEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle member creation form submission.
pub async fn create_member_endpoint(
    State(state): State<CreateMemberEndpointState>,
    Extension(user_id): Extension<UserId>,
    Form(form_data): Form<MemberFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let project = match get_project(form_data.project_id, &connection) {
        Ok(project) => project,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = member_capabilities(project.owner, user_id).ensure_can_edit() {
        return error.into_alert_response();
    }

    let name = match MemberName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    match create_member(name, project.id, user_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::EDIT_PROJECT_VIEW,
                project.id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a member: {error}");

            error.into_alert_response()
        }
    }
}
