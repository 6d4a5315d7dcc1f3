//! Delete-project confirmation modal.
//!
//! The projects page opens this fragment into `#modal-container`. It shows
//! what the deletion takes with it before the user commits.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::Markup;
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    authz::project_capabilities,
    endpoints,
    html::{BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE},
    member::get_members_by_project,
    modal::modal_shell,
    operation::{FinType, count_operations_by_type},
    project::{Project, ProjectId, get_project},
    user::{UserId, get_user_by_id},
};

/// The state needed for the delete-project modal.
#[derive(Debug, Clone)]
pub struct ProjectDeleteModalState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProjectDeleteModalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the delete-project confirmation modal fragment.
pub async fn get_project_delete_modal(
    Path(project_id): Path<ProjectId>,
    State(state): State<ProjectDeleteModalState>,
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

    match summarise_project(&project, &connection) {
        Ok(summary) => project_delete_modal_view(&project, &summary).into_response(),
        Err(error) => {
            tracing::error!("Failed to summarise project {project_id}: {error}");

            error.into_alert_response()
        }
    }
}

fn summarise_project(project: &Project, connection: &Connection) -> Result<ProjectSummary, Error> {
    Ok(ProjectSummary {
        owner_name: get_user_by_id(project.owner, connection)?.name,
        member_count: get_members_by_project(project.id, connection)?.len(),
        income_count: count_operations_by_type(project.id, FinType::Income, connection)?,
        charge_count: count_operations_by_type(project.id, FinType::Charge, connection)?,
    })
}

struct ProjectSummary {
    owner_name: String,
    member_count: usize,
    income_count: usize,
    charge_count: usize,
}

fn project_delete_modal_view(project: &Project, summary: &ProjectSummary) -> Markup {
    let delete_endpoint = endpoints::format_endpoint(endpoints::PROJECT_API, project.id);

    let detail_row = |label: &str, value: String| {
        html!(
            div class="flex justify-between gap-8"
            {
                dt class="font-medium" { (label) }
                dd { (value) }
            }
        )
    };

    let body = html!(
        dl class="space-y-2 text-sm text-gray-700 dark:text-gray-300"
        {
            (detail_row("Name", project.name.clone()))
            (detail_row("Owner", summary.owner_name.clone()))
            (detail_row("Created", project.create_time.date().to_string()))
            (detail_row("Updated", project.update_time.date().to_string()))
            (detail_row("Members", summary.member_count.to_string()))
            (detail_row("Incomes", summary.income_count.to_string()))
            (detail_row("Charges", summary.charge_count.to_string()))
        }

        p class="text-sm text-red-600 dark:text-red-400"
        {
            "Deleting the project removes its members, categories, and \
            operations. This cannot be undone."
        }

        div class="flex justify-end gap-4"
        {
            button
                type="button"
                class=(BUTTON_SECONDARY_STYLE)
                onclick="document.getElementById('modal-container').innerHTML = '';"
            {
                "Cancel"
            }

            button
                type="button"
                hx-delete=(delete_endpoint)
                hx-target-error="#alert-container"
                class=(BUTTON_DELETE_STYLE)
            {
                "Delete Project"
            }
        }
    );

    modal_shell("Delete Project?", &body)
}
