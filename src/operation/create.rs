//! Operation creation endpoint.
//!
//! Income and charge forms both land here; the fin type rides along in the
//! form body. The category arrives as free text and is resolved to a row,
//! created on first use.

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
    authz::operation_capabilities,
    category::{CategoryName, resolve_or_create_category},
    endpoints,
    member::get_member,
    operation::{OperationDraft, create_operation, domain::OperationFormData},
    project::{Project, get_project},
    user::UserId,
};

/// The state needed for creating an operation.
#[derive(Debug, Clone)]
pub struct CreateOperationEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateOperationEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Turn submitted form data into a draft, resolving the category name and
/// checking that a picked member belongs to the project.
pub(super) fn resolve_draft(
    project: &Project,
    form_data: &OperationFormData,
    connection: &Connection,
) -> Result<OperationDraft, Error> {
    let category_id = match CategoryName::new(&form_data.category_name) {
        Ok(name) => Some(resolve_or_create_category(name, project.id, connection)?.id),
        Err(_) => None,
    };

    let member_id = match form_data.member_id {
        Some(member_id) => {
            let member = get_member(member_id, connection)?;

            if member.project_id != project.id {
                return Err(Error::NotFound);
            }

            Some(member_id)
        }
        None => None,
    };

    Ok(OperationDraft {
        project_id: project.id,
        fin_type: form_data.fin_type,
        for_all: form_data.for_all.is_some(),
        value: form_data.value,
        category_id,
        member_id,
    })
}

/// Handle operation creation form submission.
pub async fn create_operation_endpoint(
    State(state): State<CreateOperationEndpointState>,
    Extension(user_id): Extension<UserId>,
    Form(form_data): Form<OperationFormData>,
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

    if let Err(error) = operation_capabilities(project.owner, user_id).ensure_can_edit() {
        return error.into_alert_response();
    }

    let draft = match resolve_draft(&project, &form_data, &connection) {
        Ok(draft) => draft,
        Err(error) => return error.into_alert_response(),
    };

    match create_operation(draft, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::PROJECT_VIEW,
                project.id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an operation: {error}");

            error.into_alert_response()
        }
    }
}
