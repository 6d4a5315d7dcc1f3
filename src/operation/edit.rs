//! Operation editing page and update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    authz::operation_capabilities,
    category::get_category,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    member::{Member, get_members_by_project},
    navigation::NavBar,
    operation::{
        FinType, Operation, OperationId, create::resolve_draft, domain::OperationFormData,
        get_operation, update_operation,
    },
    project::get_project,
    user::UserId,
};

/// The state needed for the operation edit page and update endpoint.
#[derive(Debug, Clone)]
pub struct EditOperationState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditOperationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the operation edit page.
pub async fn get_edit_operation_page(
    Path(operation_id): Path<OperationId>,
    State(state): State<EditOperationState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let operation = get_operation(operation_id, &connection)?;
    let project = get_project(operation.project_id, &connection)?;
    operation_capabilities(project.owner, user_id).ensure_can_edit()?;

    let members = get_members_by_project(project.id, &connection)?;
    let category_name = match operation.category_id {
        Some(category_id) => get_category(category_id, &connection)?.name,
        None => String::new(),
    };

    Ok(edit_operation_view(&operation, &category_name, &members).into_response())
}

/// Handle the operation edit form submission.
pub async fn update_operation_endpoint(
    Path(operation_id): Path<OperationId>,
    State(state): State<EditOperationState>,
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

    let operation = match get_operation(operation_id, &connection) {
        Ok(operation) => operation,
        Err(error) => return error.into_alert_response(),
    };
    let project = match get_project(operation.project_id, &connection) {
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

    match update_operation(operation_id, draft, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::PROJECT_VIEW,
                project.id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating operation {operation_id}: {error}"
            );

            error.into_alert_response()
        }
    }
}

fn edit_operation_view(operation: &Operation, category_name: &str, members: &[Member]) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROJECTS_VIEW).into_html();
    let update_endpoint = endpoints::format_endpoint(endpoints::OPERATION_API, operation.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                input type="hidden" name="project_id" value=(operation.project_id);

                div
                {
                    label for="fin_type" class=(FORM_LABEL_STYLE) { "Type" }

                    select id="fin_type" name="fin_type" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option
                            value="income"
                            selected[operation.fin_type == FinType::Income]
                        {
                            "Income"
                        }
                        option
                            value="charge"
                            selected[operation.fin_type == FinType::Charge]
                        {
                            "Charge"
                        }
                    }
                }

                div
                {
                    label for="value" class=(FORM_LABEL_STYLE) { "Value" }

                    input
                        id="value"
                        type="number"
                        name="value"
                        value=(operation.value)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category_name" class=(FORM_LABEL_STYLE) { "Category" }

                    input
                        id="category_name"
                        type="text"
                        name="category_name"
                        value=(category_name)
                        placeholder="Category"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="member_id" class=(FORM_LABEL_STYLE) { "Member" }

                    select id="member_id" name="member_id" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" selected[operation.member_id.is_none()] { "Nobody" }

                        @for member in members {
                            option
                                value=(member.id)
                                selected[operation.member_id == Some(member.id)]
                            {
                                (member.name)
                            }
                        }
                    }
                }

                div class="flex items-center gap-2"
                {
                    input
                        id="for_all"
                        type="checkbox"
                        name="for_all"
                        checked[operation.for_all]
                        class=(FORM_CHECKBOX_STYLE);

                    label for="for_all" class=(FORM_LABEL_STYLE) { "For the whole household" }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Operation" }
            }
        }
    };

    base("Edit Operation", &content)
}


#[cfg(test)]
mod update_operation_endpoint_tests {
    use axum::{
        Extension, Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        endpoints,
        member::{MemberName, create_member},
        operation::{
            FinType, OperationDraft, create_operation, domain::OperationFormData,
            edit::EditOperationState, get_operation,
        },
        test_utils::{assert_hx_redirect, create_app_state, create_test_project},
    };

    use super::update_operation_endpoint;

    #[tokio::test]
    async fn updates_all_fields() {
        let app_state = create_app_state();
        let (fixture, operation, member) = {
            let connection = app_state.db_connection.lock().unwrap();
            let fixture = create_test_project(&connection);
            let member = create_member(
                MemberName::new_unchecked("Сергей"),
                fixture.project.id,
                fixture.user.id,
                &connection,
            )
            .unwrap();
            let operation = create_operation(
                OperationDraft {
                    project_id: fixture.project.id,
                    fin_type: FinType::Charge,
                    for_all: true,
                    value: 1200,
                    category_id: None,
                    member_id: None,
                },
                &connection,
            )
            .unwrap();
            (fixture, operation, member)
        };
        let state = EditOperationState {
            db_connection: app_state.db_connection.clone(),
        };
        let form = OperationFormData {
            project_id: fixture.project.id,
            fin_type: FinType::Income,
            for_all: None,
            value: 99,
            category_name: "развлечения".to_string(),
            member_id: Some(member.id),
        };

        let response = update_operation_endpoint(
            Path(operation.id),
            State(state),
            Extension(fixture.user.id),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(
            &response,
            &endpoints::format_endpoint(endpoints::PROJECT_VIEW, fixture.project.id),
        );

        let connection = app_state.db_connection.lock().unwrap();
        let updated = get_operation(operation.id, &connection).unwrap();
        assert_eq!(updated.fin_type, FinType::Income);
        assert!(!updated.for_all);
        assert_eq!(updated.value, 99);
        assert!(updated.category_id.is_some());
        assert_eq!(updated.member_id, Some(member.id));
    }

    #[tokio::test]
    async fn missing_operation_returns_not_found_alert() {
        let app_state = create_app_state();
        let fixture = {
            let connection = app_state.db_connection.lock().unwrap();
            create_test_project(&connection)
        };
        let state = EditOperationState {
            db_connection: app_state.db_connection.clone(),
        };
        let form = OperationFormData {
            project_id: fixture.project.id,
            fin_type: FinType::Income,
            for_all: None,
            value: 99,
            category_name: String::new(),
            member_id: None,
        };

        let response = update_operation_endpoint(
            Path(999999),
            State(state),
            Extension(fixture.user.id),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
