//! Project editing page and rename endpoint.
//!
//! The edit page is the management hub for a project: it renames the
//! project and lists its members and categories with add, edit, and delete
//! controls.

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
    authz::project_capabilities,
    category::{Category, get_categories_by_project},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        edit_delete_action_links,
    },
    member::{Member, get_members_by_project},
    navigation::NavBar,
    project::{Project, ProjectId, ProjectName, domain::ProjectFormData, get_project, rename_project},
    user::UserId,
};

/// The state needed for the project edit page and the rename endpoint.
#[derive(Debug, Clone)]
pub struct EditProjectState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditProjectState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the project edit page.
pub async fn get_edit_project_page(
    Path(project_id): Path<ProjectId>,
    State(state): State<EditProjectState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let project = get_project(project_id, &connection)?;
    project_capabilities(project.owner, user_id).ensure_can_edit()?;

    let members = get_members_by_project(project_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve members: {error}"))?;
    let categories = get_categories_by_project(project_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(edit_project_view(&project, &members, &categories, "").into_response())
}

/// Handle the project rename form submission.
pub async fn update_project_endpoint(
    Path(project_id): Path<ProjectId>,
    State(state): State<EditProjectState>,
    Extension(user_id): Extension<UserId>,
    Form(form_data): Form<ProjectFormData>,
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

    if let Err(error) = project_capabilities(project.owner, user_id).ensure_can_edit() {
        return error.into_alert_response();
    }

    let name = match ProjectName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => {
            let members = match get_members_by_project(project_id, &connection) {
                Ok(members) => members,
                Err(error) => return error.into_alert_response(),
            };
            let categories = match get_categories_by_project(project_id, &connection) {
                Ok(categories) => categories,
                Err(error) => return error.into_alert_response(),
            };

            return edit_project_view(
                &project,
                &members,
                &categories,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match rename_project(project_id, name, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::PROJECTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while renaming project {project_id}: {error}"
            );

            error.into_alert_response()
        }
    }
}

fn edit_project_view(
    project: &Project,
    members: &[Member],
    categories: &[Category],
    error_message: &str,
) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_PROJECT_VIEW, project.id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();
    let update_endpoint = endpoints::format_endpoint(endpoints::PROJECT_API, project.id);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-8 w-full max-w-2xl"
            {
                section
                {
                    h1 class="text-xl font-bold mb-4" { "Edit " (project.name) }

                    form
                        hx-put=(update_endpoint)
                        hx-target-error="#alert-container"
                        class="w-full space-y-4"
                    {
                        div
                        {
                            label for="name" class=(FORM_LABEL_STYLE) { "Project Name" }

                            input
                                id="name"
                                type="text"
                                name="name"
                                value=(project.name)
                                required
                                autofocus
                                class=(FORM_TEXT_INPUT_STYLE);
                        }

                        @if !error_message.is_empty() {
                            p class="text-red-600 dark:text-red-400" { (error_message) }
                        }

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Rename Project" }
                    }
                }

                (members_section(project.id, members))
                (categories_section(project.id, categories))
            }
        }
    );

    base("Edit Project", &content)
}

fn members_section(project_id: ProjectId, members: &[Member]) -> Markup {
    let add_member_endpoint = endpoints::MEMBERS_API;

    html!(
        section
        {
            h2 class="text-lg font-bold mb-2" { "Members" }

            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400 mb-4"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for member in members {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (member.name) }

                            td class=(TABLE_CELL_STYLE)
                            {
                                div class="flex gap-4"
                                {
                                    (edit_delete_action_links(
                                        &endpoints::format_endpoint(
                                            endpoints::EDIT_MEMBER_VIEW,
                                            member.id,
                                        ),
                                        &endpoints::format_endpoint(
                                            endpoints::MEMBER_API,
                                            member.id,
                                        ),
                                        &format!(
                                            "Remove '{}' from the project? Their operations \
                                            will lose the member tag.",
                                            member.name
                                        ),
                                        "closest tr",
                                        "delete",
                                    ))
                                }
                            }
                        }
                    }

                    @if members.is_empty() {
                        tr
                        {
                            td colspan="2" class="px-6 py-4 text-center" { "No members yet." }
                        }
                    }
                }
            }

            form
                hx-post=(add_member_endpoint)
                hx-target-error="#alert-container"
                class="flex items-end gap-4"
            {
                input type="hidden" name="project_id" value=(project_id);

                div class="grow"
                {
                    label for="member-name" class=(FORM_LABEL_STYLE) { "New member" }
                    input
                        id="member-name"
                        type="text"
                        name="name"
                        placeholder="Member Name"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Add Member" }
            }
        }
    )
}

fn categories_section(project_id: ProjectId, categories: &[Category]) -> Markup {
    let add_category_endpoint = endpoints::CATEGORIES_API;

    html!(
        section
        {
            h2 class="text-lg font-bold mb-2" { "Categories" }

            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400 mb-4"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for category in categories {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (category.name) }

                            td class=(TABLE_CELL_STYLE)
                            {
                                div class="flex gap-4"
                                {
                                    (edit_delete_action_links(
                                        &endpoints::format_endpoint(
                                            endpoints::EDIT_CATEGORY_VIEW,
                                            category.id,
                                        ),
                                        &endpoints::format_endpoint(
                                            endpoints::CATEGORY_API,
                                            category.id,
                                        ),
                                        &format!(
                                            "Delete '{}'? Operations filed under it will \
                                            become uncategorised.",
                                            category.name
                                        ),
                                        "closest tr",
                                        "delete",
                                    ))
                                }
                            }
                        }
                    }

                    @if categories.is_empty() {
                        tr
                        {
                            td colspan="2" class="px-6 py-4 text-center" { "No categories yet." }
                        }
                    }
                }
            }

            form
                hx-post=(add_category_endpoint)
                hx-target-error="#alert-container"
                class="flex items-end gap-4"
            {
                input type="hidden" name="project_id" value=(project_id);

                div class="grow"
                {
                    label for="category-name" class=(FORM_LABEL_STYLE) { "New category" }
                    input
                        id="category-name"
                        type="text"
                        name="name"
                        placeholder="Category Name"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Add Category" }
            }
        }
    )
}
