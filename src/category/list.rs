//! Categories listing page.
//!
//! Shows the categories across every project the acting user owns, with the
//! owning project's name alongside each category.

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
    category::{CategoryWithProject, get_categories_by_owner},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
    user::UserId,
};

/// The state needed for the categories listing page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the categories of every project the acting user owns.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_categories_by_owner(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(categories_view(&categories).into_response())
}

fn categories_view(categories: &[CategoryWithProject]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();
    let new_category_route = endpoints::NEW_CATEGORY_VIEW;

    let table_row = |entry: &CategoryWithProject| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (entry.category.name) }
                td class=(TABLE_CELL_STYLE) { (entry.project_name) }
                td class=(TABLE_CELL_STYLE) { (entry.category.update_time.date()) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &endpoints::format_endpoint(
                                endpoints::EDIT_CATEGORY_VIEW,
                                entry.category.id,
                            ),
                            &endpoints::format_endpoint(
                                endpoints::CATEGORY_API,
                                entry.category.id,
                            ),
                            &format!(
                                "Delete '{}'? Operations filed under it will become \
                                uncategorised.",
                                entry.category.name
                            ),
                            "closest tr",
                            "delete",
                        ))
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
                    h1 class="text-xl font-bold" { "Categories" }

                    a href=(new_category_route) class=(LINK_STYLE)
                    {
                        "Create Category"
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Project" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Updated" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for entry in categories {
                                (table_row(entry))
                            }

                            @if categories.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No categories yet. "
                                        a href=(new_category_route) class=(LINK_STYLE)
                                        {
                                            "Create your first category"
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

    base("Categories", &content)
}

#[cfg(test)]
mod categories_page_tests {
    use axum::{Extension, extract::State, http::StatusCode};

    use crate::{
        category::{CategoryName, list::CategoriesPageState, resolve_or_create_category},
        project::{ProjectName, create_project},
        test_utils::{assert_valid_html, create_app_state, create_test_project, parse_html_document},
        user::create_user,
    };

    use super::get_categories_page;

    #[tokio::test]
    async fn lists_only_the_callers_categories_with_project_names() {
        let app_state = create_app_state();
        let fixture = {
            let connection = app_state.db_connection.lock().unwrap();
            let fixture = create_test_project(&connection);
            resolve_or_create_category(
                CategoryName::new_unchecked("продукты"),
                fixture.project.id,
                &connection,
            )
            .unwrap();

            let other = create_user("other@test.com", "not-a-real-hash", &connection).unwrap();
            let other_project =
                create_project(ProjectName::new_unchecked("Чужой бюджет"), other.id, &connection)
                    .unwrap();
            resolve_or_create_category(
                CategoryName::new_unchecked("секреты"),
                other_project.id,
                &connection,
            )
            .unwrap();

            fixture
        };
        let state = CategoriesPageState {
            db_connection: app_state.db_connection.clone(),
        };

        let response = get_categories_page(State(state), Extension(fixture.user.id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let body = html.html();
        assert!(body.contains("продукты"));
        assert!(body.contains("Семейный бюджет"));
        assert!(!body.contains("секреты"));
    }

    #[tokio::test]
    async fn shows_empty_state_without_categories() {
        let app_state = create_app_state();
        let fixture = {
            let connection = app_state.db_connection.lock().unwrap();
            create_test_project(&connection)
        };
        let state = CategoriesPageState {
            db_connection: app_state.db_connection.clone(),
        };

        let response = get_categories_page(State(state), Extension(fixture.user.id))
            .await
            .unwrap();
        let html = parse_html_document(response).await;

        assert!(html.html().contains("No categories yet."));
    }
}
