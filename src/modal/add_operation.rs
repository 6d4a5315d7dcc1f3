//! Add-charge and add-income modal fragments.
//!
//! Both render the same operation form preset with the fin type and
//! project, posting to the operation creation endpoint. The category field
//! is free text with autocomplete backed by the category search endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    authz::operation_capabilities,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    member::{Member, get_members_by_project},
    modal::modal_shell,
    operation::FinType,
    project::{ProjectId, get_project},
    user::UserId,
};

/// The state needed for the add-operation modals.
#[derive(Debug, Clone)]
pub struct AddOperationModalState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AddOperationModalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the add-charge modal fragment.
pub async fn get_add_charge_modal(
    Path(project_id): Path<ProjectId>,
    State(state): State<AddOperationModalState>,
    Extension(user_id): Extension<UserId>,
) -> Response {
    add_operation_modal(project_id, FinType::Charge, state, user_id).await
}

/// Render the add-income modal fragment.
pub async fn get_add_income_modal(
    Path(project_id): Path<ProjectId>,
    State(state): State<AddOperationModalState>,
    Extension(user_id): Extension<UserId>,
) -> Response {
    add_operation_modal(project_id, FinType::Income, state, user_id).await
}

async fn add_operation_modal(
    project_id: ProjectId,
    fin_type: FinType,
    state: AddOperationModalState,
    user_id: UserId,
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

    if let Err(error) = operation_capabilities(project.owner, user_id).ensure_can_edit() {
        return error.into_alert_response();
    }

    let members = match get_members_by_project(project_id, &connection) {
        Ok(members) => members,
        Err(error) => {
            tracing::error!("Failed to retrieve members: {error}");
            return error.into_alert_response();
        }
    };

    add_operation_modal_view(project_id, fin_type, &members).into_response()
}

fn add_operation_modal_view(
    project_id: ProjectId,
    fin_type: FinType,
    members: &[Member],
) -> Markup {
    let create_endpoint = endpoints::OPERATIONS_API;
    let fin_type_value = match fin_type {
        FinType::Income => "income",
        FinType::Charge => "charge",
    };
    let title = match fin_type {
        FinType::Income => "Add Income",
        FinType::Charge => "Add Charge",
    };

    let body = html!(
        form
            hx-post=(create_endpoint)
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            input type="hidden" name="project_id" value=(project_id);
            input type="hidden" name="fin_type" value=(fin_type_value);

            div
            {
                label for="value" class=(FORM_LABEL_STYLE) { "Value" }

                input
                    id="value"
                    type="number"
                    name="value"
                    min="1"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category_name" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    id="category_name"
                    type="text"
                    name="category_name"
                    placeholder="Category"
                    autocomplete="off"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="member_id" class=(FORM_LABEL_STYLE) { "Member" }

                select id="member_id" name="member_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Nobody" }

                    @for member in members {
                        option value=(member.id) { (member.name) }
                    }
                }
            }

            div class="flex items-center gap-2"
            {
                input
                    id="for_all"
                    type="checkbox"
                    name="for_all"
                    checked
                    class=(FORM_CHECKBOX_STYLE);

                label for="for_all" class=(FORM_LABEL_STYLE) { "For the whole household" }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (title) }
        }
    );

    modal_shell(title, &body)
}
