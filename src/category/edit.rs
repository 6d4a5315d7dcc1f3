//! Category editing page and rename endpoint.

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
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    authz::category_capabilities,
    category::{Category, CategoryId, CategoryName, get_category, rename_category},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    project::get_project,
    user::UserId,
};

/// The state needed for the category edit page and rename endpoint.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Form data for renaming a category.
#[derive(Debug, Serialize, Deserialize)]
pub struct RenameCategoryFormData {
    /// The new category name.
    pub name: String,
}

/// Render the category edit page.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = get_category(category_id, &connection)?;
    let project = get_project(category.project_id, &connection)?;
    category_capabilities(project.owner, user_id).ensure_can_edit()?;

    Ok(edit_category_view(&category, "").into_response())
}

/// Handle the category rename form submission.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
    Extension(user_id): Extension<UserId>,
    Form(form_data): Form<RenameCategoryFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let category = match get_category(category_id, &connection) {
        Ok(category) => category,
        Err(error) => return error.into_alert_response(),
    };
    let project = match get_project(category.project_id, &connection) {
        Ok(project) => project,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = category_capabilities(project.owner, user_id).ensure_can_edit() {
        return error.into_alert_response();
    }

    let name = match CategoryName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => {
            return edit_category_view(&category, &format!("Error: {error}")).into_response();
        }
    };

    match rename_category(category_id, name, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::DuplicateCategoryName) => {
            edit_category_view(&category, &format!("Error: {error}")).into_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while renaming category {category_id}: {error}"
            );

            error.into_alert_response()
        }
    }
}

fn edit_category_view(category: &Category, error_message: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();
    let update_endpoint = endpoints::format_endpoint(endpoints::CATEGORY_API, category.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Category Name" }

                    input
                        id="name"
                        type="text"
                        name="name"
                        value=(category.name)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                @if !error_message.is_empty() {
                    p class="text-red-600 dark:text-red-400" { (error_message) }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Rename Category" }
            }
        }
    };

    base("Edit Category", &content)
}
