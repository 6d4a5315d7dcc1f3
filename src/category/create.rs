//! Category creation page and endpoint.
//!
//! Creation goes through the resolve-or-create path, so submitting a name
//! that already exists in the chosen project lands on the existing row
//! instead of erroring.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    authz::category_capabilities,
    category::{CategoryName, domain::CategoryFormData, resolve_or_create_category},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    project::{Project, get_project, get_projects_by_owner},
    user::UserId,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category creation page with a project picker.
pub async fn get_new_category_page(
    State(state): State<CreateCategoryEndpointState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let projects = get_projects_by_owner(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve projects: {error}"))?;

    Ok(new_category_view(&projects).into_response())
}

/// Handle category creation form submission.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    Extension(user_id): Extension<UserId>,
    Form(form_data): Form<CategoryFormData>,
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

    if let Err(error) = category_capabilities(project.owner, user_id).ensure_can_edit() {
        return error.into_alert_response();
    }

    let name = match CategoryName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    match resolve_or_create_category(name, project.id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::EDIT_PROJECT_VIEW,
                project.id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a category: {error}");

            error.into_alert_response()
        }
    }
}

fn new_category_view(projects: &[Project]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CATEGORY_VIEW).into_html();
    let create_category_endpoint = endpoints::CATEGORIES_API;

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(create_category_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="project_id" class=(FORM_LABEL_STYLE) { "Project" }

                    select
                        id="project_id"
                        name="project_id"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for project in projects {
                            option value=(project.id) { (project.name) }
                        }
                    }
                }

                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Category Name" }

                    input
                        id="name"
                        type="text"
                        name="name"
                        placeholder="Category Name"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Category" }
            }
        }
    };

    base("Create Category", &content)
}
