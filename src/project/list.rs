//! Projects listing page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base,
    },
    navigation::NavBar,
    project::{Project, get_projects_by_owner},
    user::UserId,
};

/// The state needed for the projects listing page.
#[derive(Debug, Clone)]
pub struct ProjectsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProjectsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the projects the acting user may view, which under the owner-only
/// rule is exactly the projects they own.
pub async fn get_projects_page(
    State(state): State<ProjectsPageState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let projects = get_projects_by_owner(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve projects: {error}"))?;

    Ok(projects_view(&projects).into_response())
}

fn projects_view(projects: &[Project]) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROJECTS_VIEW).into_html();
    let new_project_route = endpoints::NEW_PROJECT_VIEW;

    let table_row = |project: &Project| {
        let details_url = endpoints::format_endpoint(endpoints::PROJECT_VIEW, project.id);
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_PROJECT_VIEW, project.id);
        let delete_modal_url =
            endpoints::format_endpoint(endpoints::MODAL_PROJECT_DELETE, project.id);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    a href=(details_url) class=(LINK_STYLE) { (project.name) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (project.create_time.date())
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (project.update_time.date())
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                        button
                            type="button"
                            hx-get=(delete_modal_url)
                            hx-target="#modal-container"
                            hx-target-error="#alert-container"
                            class=(LINK_STYLE)
                        {
                            "Delete"
                        }
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Projects" }

                    a href=(new_project_route) class=(LINK_STYLE)
                    {
                        "Create Project"
                    }
                }

                section class="dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Created" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Updated" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for project in projects {
                                (table_row(project))
                            }

                            @if projects.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No projects yet. "
                                        a href=(new_project_route) class=(LINK_STYLE)
                                        {
                                            "Create your first project"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Projects", &content)
}

#[cfg(test)]
mod projects_page_tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use scraper::Selector;

    use crate::{
        endpoints,
        project::{ProjectName, create_project, list::ProjectsPageState},
        test_utils::{assert_valid_html, create_app_state, create_test_project, parse_html_document},
        user::create_user,
    };

    use super::get_projects_page;

    #[tokio::test]
    async fn lists_only_the_callers_projects() {
        let app_state = create_app_state();
        let fixture = {
            let connection = app_state.db_connection.lock().unwrap();
            let fixture = create_test_project(&connection);
            let other = create_user("other@test.com", "not-a-real-hash", &connection).unwrap();
            create_project(ProjectName::new_unchecked("Чужой бюджет"), other.id, &connection)
                .unwrap();
            fixture
        };
        let state = ProjectsPageState {
            db_connection: app_state.db_connection.clone(),
        };

        let response = get_projects_page(State(state), Extension(fixture.user.id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let body = html.html();
        assert!(body.contains("Семейный бюджет"));
        assert!(!body.contains("Чужой бюджет"));
    }

    #[tokio::test]
    async fn rows_link_to_details_edit_and_delete_modal() {
        let app_state = create_app_state();
        let fixture = {
            let connection = app_state.db_connection.lock().unwrap();
            create_test_project(&connection)
        };
        let state = ProjectsPageState {
            db_connection: app_state.db_connection.clone(),
        };

        let response = get_projects_page(State(state), Extension(fixture.user.id))
            .await
            .unwrap();
        let html = parse_html_document(response).await;

        let details_url =
            endpoints::format_endpoint(endpoints::PROJECT_VIEW, fixture.project.id);
        let link_selector =
            Selector::parse(&format!("a[href='{details_url}']")).unwrap();
        assert!(html.select(&link_selector).next().is_some());

        let modal_url =
            endpoints::format_endpoint(endpoints::MODAL_PROJECT_DELETE, fixture.project.id);
        let modal_selector =
            Selector::parse(&format!("button[hx-get='{modal_url}']")).unwrap();
        assert!(html.select(&modal_selector).next().is_some());
    }
}
