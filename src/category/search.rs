//! Category lookup endpoints backing the operation form's autocomplete.
//!
//! The search endpoint returns JSON suggestions for a name fragment. The
//! unique endpoint resolves a typed name to a category ID, creating the
//! category on first use, and returns the ID as plain text.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    authz::category_capabilities,
    category::{CategoryName, resolve_or_create_category, search_categories},
    project::{ProjectId, get_project},
    user::UserId,
};

/// The state needed for the category lookup endpoints.
#[derive(Debug, Clone)]
pub struct CategorySearchState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategorySearchState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for the category search endpoint.
#[derive(Debug, Deserialize)]
pub struct CategorySearchParams {
    /// The project whose categories to search.
    pub project_id: ProjectId,
    /// The name fragment to match. Blank matches everything.
    #[serde(default)]
    pub term: String,
}

/// A single autocomplete suggestion.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySuggestion {
    /// The category name, shown in the suggestion list.
    pub value: String,
    /// The category's ID.
    pub id: i64,
}

/// Query parameters for the category resolve endpoint.
#[derive(Debug, Deserialize)]
pub struct CategoryResolveParams {
    /// The project the category belongs to.
    pub project_id: ProjectId,
    /// The typed category name.
    #[serde(default)]
    pub name: String,
}

fn status_for(error: Error) -> StatusCode {
    match error {
        Error::NotFound => StatusCode::NOT_FOUND,
        Error::Forbidden => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Search a project's categories by name substring, returning JSON
/// suggestions.
pub async fn search_categories_endpoint(
    State(state): State<CategorySearchState>,
    Extension(user_id): Extension<UserId>,
    Query(params): Query<CategorySearchParams>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let project = match get_project(params.project_id, &connection) {
        Ok(project) => project,
        Err(error) => return status_for(error).into_response(),
    };

    if let Err(error) = category_capabilities(project.owner, user_id).ensure_can_view() {
        return status_for(error).into_response();
    }

    match search_categories(params.project_id, &params.term, &connection) {
        Ok(categories) => {
            let suggestions: Vec<CategorySuggestion> = categories
                .into_iter()
                .map(|category| CategorySuggestion {
                    value: category.name,
                    id: category.id,
                })
                .collect();

            Json(suggestions).into_response()
        }
        Err(error) => {
            tracing::error!("Failed to search categories: {error}");
            status_for(error).into_response()
        }
    }
}

/// Resolve a category name to its ID, creating the category if it is new.
///
/// Returns the ID as plain text, or "-1" for a blank name so the client can
/// submit the operation without a category.
pub async fn category_unique_endpoint(
    State(state): State<CategorySearchState>,
    Extension(user_id): Extension<UserId>,
    Query(params): Query<CategoryResolveParams>,
) -> Response {
    let name = match CategoryName::new(&params.name) {
        Ok(name) => name,
        Err(_) => return "-1".into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let project = match get_project(params.project_id, &connection) {
        Ok(project) => project,
        Err(error) => return status_for(error).into_response(),
    };

    if let Err(error) = category_capabilities(project.owner, user_id).ensure_can_edit() {
        return status_for(error).into_response();
    }

    match resolve_or_create_category(name, params.project_id, &connection) {
        Ok(category) => category.id.to_string().into_response(),
        Err(error) => {
            tracing::error!("Failed to resolve category: {error}");
            status_for(error).into_response()
        }
    }
}


#[cfg(test)]
mod category_unique_endpoint_tests {
    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        category::{CategoryName, get_categories_by_project, resolve_or_create_category},
        test_utils::{create_app_state, create_test_project, response_body_text},
    };

    use super::{CategoryResolveParams, CategorySearchState, category_unique_endpoint};

    fn search_state(app_state: &crate::AppState) -> CategorySearchState {
        CategorySearchState {
            db_connection: app_state.db_connection.clone(),
        }
    }

    #[tokio::test]
    async fn resolves_existing_category_to_its_id() {
        let app_state = create_app_state();
        let (fixture, category) = {
            let connection = app_state.db_connection.lock().unwrap();
            let fixture = create_test_project(&connection);
            let category = resolve_or_create_category(
                CategoryName::new_unchecked("кафе"),
                fixture.project.id,
                &connection,
            )
            .unwrap();
            (fixture, category)
        };

        let response = category_unique_endpoint(
            State(search_state(&app_state)),
            Extension(fixture.user.id),
            Query(CategoryResolveParams {
                project_id: fixture.project.id,
                name: "Кафе".to_string(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_body_text(response).await, category.id.to_string());
    }

    #[tokio::test]
    async fn creates_category_on_first_use() {
        let app_state = create_app_state();
        let fixture = {
            let connection = app_state.db_connection.lock().unwrap();
            create_test_project(&connection)
        };

        let response = category_unique_endpoint(
            State(search_state(&app_state)),
            Extension(fixture.user.id),
            Query(CategoryResolveParams {
                project_id: fixture.project.id,
                name: "новая".to_string(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let connection = app_state.db_connection.lock().unwrap();
        let categories = get_categories_by_project(fixture.project.id, &connection).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "новая");
    }

    #[tokio::test]
    async fn blank_name_returns_minus_one() {
        let app_state = create_app_state();
        let fixture = {
            let connection = app_state.db_connection.lock().unwrap();
            create_test_project(&connection)
        };

        let response = category_unique_endpoint(
            State(search_state(&app_state)),
            Extension(fixture.user.id),
            Query(CategoryResolveParams {
                project_id: fixture.project.id,
                name: "   ".to_string(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_body_text(response).await, "-1");

        let connection = app_state.db_connection.lock().unwrap();
        let categories =
            crate::category::get_categories_by_project(fixture.project.id, &connection).unwrap();
        assert!(categories.is_empty());
    }
}
