//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    authz::category_capabilities,
    category::{CategoryId, delete_category, get_category},
    project::get_project,
    user::UserId,
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a category. Operations filed under it keep existing and become
/// uncategorised. Returns a success alert or an error alert.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<DeleteCategoryEndpointState>,
    Extension(user_id): Extension<UserId>,
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

    if let Err(error) = category_capabilities(project.owner, user_id).ensure_can_delete() {
        return error.into_alert_response();
    }

    match delete_category(category_id, &connection) {
        Ok(()) => Alert::success("Category deleted", "").into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        Error,
        category::{
            CategoryName, delete::DeleteCategoryEndpointState, get_category,
            resolve_or_create_category,
        },
        operation::{FinType, OperationDraft, create_operation, get_operation},
        test_utils::{create_app_state, create_test_project, get_header},
        user::create_user,
    };

    use super::delete_category_endpoint;

    fn delete_state(app_state: &crate::AppState) -> DeleteCategoryEndpointState {
        DeleteCategoryEndpointState {
            db_connection: app_state.db_connection.clone(),
        }
    }

    #[tokio::test]
    async fn deletes_category_and_clears_operation_references() {
        let app_state = create_app_state();
        let (fixture, category, operation) = {
            let connection = app_state.db_connection.lock().unwrap();
            let fixture = create_test_project(&connection);
            let category = resolve_or_create_category(
                CategoryName::new_unchecked("продукты"),
                fixture.project.id,
                &connection,
            )
            .unwrap();
            let operation = create_operation(
                OperationDraft {
                    project_id: fixture.project.id,
                    fin_type: FinType::Charge,
                    for_all: true,
                    value: 1200,
                    category_id: Some(category.id),
                    member_id: None,
                },
                &connection,
            )
            .unwrap();
            (fixture, category, operation)
        };

        let response = delete_category_endpoint(
            Path(category.id),
            State(delete_state(&app_state)),
            Extension(fixture.user.id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let connection = app_state.db_connection.lock().unwrap();
        assert_eq!(get_category(category.id, &connection), Err(Error::NotFound));
        let surviving = get_operation(operation.id, &connection).unwrap();
        assert_eq!(surviving.category_id, None);
    }

    #[tokio::test]
    async fn non_owner_gets_forbidden_alert() {
        let app_state = create_app_state();
        let (category, other) = {
            let connection = app_state.db_connection.lock().unwrap();
            let fixture = create_test_project(&connection);
            let category = resolve_or_create_category(
                CategoryName::new_unchecked("продукты"),
                fixture.project.id,
                &connection,
            )
            .unwrap();
            let other = create_user("other@test.com", "not-a-real-hash", &connection).unwrap();
            (category, other)
        };

        let response = delete_category_endpoint(
            Path(category.id),
            State(delete_state(&app_state)),
            Extension(other.id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let connection = app_state.db_connection.lock().unwrap();
        assert!(get_category(category.id, &connection).is_ok());
    }

    #[tokio::test]
    async fn missing_category_returns_not_found_alert() {
        let app_state = create_app_state();
        let fixture = {
            let connection = app_state.db_connection.lock().unwrap();
            create_test_project(&connection)
        };

        let response = delete_category_endpoint(
            Path(999999),
            State(delete_state(&app_state)),
            Extension(fixture.user.id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            get_header(&response, "content-type"),
            "text/html; charset=utf-8"
        );
    }
}
