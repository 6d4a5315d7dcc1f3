//! Project creation page and endpoint.

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
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    project::{ProjectName, create_project, domain::ProjectFormData},
    user::UserId,
};

/// The state needed for creating a project.
#[derive(Debug, Clone)]
pub struct CreateProjectEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateProjectEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the project creation page.
pub async fn get_new_project_page() -> Response {
    new_project_view().into_response()
}

/// Handle project creation form submission. The acting user becomes the
/// owner.
pub async fn create_project_endpoint(
    State(state): State<CreateProjectEndpointState>,
    Extension(user_id): Extension<UserId>,
    Form(new_project): Form<ProjectFormData>,
) -> Response {
    let name = match ProjectName::new(&new_project.name) {
        Ok(name) => name,
        Err(error) => {
            return new_project_form_view(&format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_project(name, user_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::PROJECTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a project: {error}");

            error.into_alert_response()
        }
    }
}

fn new_project_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_PROJECT_VIEW).into_html();
    let form = new_project_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Project", &content)
}

fn new_project_form_view(error_message: &str) -> Markup {
    let create_project_endpoint = endpoints::PROJECTS_API;

    html! {
        form
            hx-post=(create_project_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Project Name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Project Name"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Project" }
        }
    }
}
