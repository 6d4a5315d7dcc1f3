//! Application router configuration with protected and unprotected route
//! definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx, get_log_in_page, get_log_out, post_log_in},
    category::{
        category_unique_endpoint, create_category_endpoint, delete_category_endpoint,
        get_categories_page, get_edit_category_page, get_new_category_page,
        search_categories_endpoint, update_category_endpoint,
    },
    demo::overwrite_db_endpoint,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    logging::logging_middleware,
    member::{
        create_member_endpoint, delete_member_endpoint, get_edit_member_page,
        update_member_endpoint,
    },
    modal::{get_add_charge_modal, get_add_income_modal, get_project_delete_modal},
    not_found::get_404_not_found,
    operation::{
        create_operation_endpoint, delete_operation_endpoint, get_edit_operation_page,
        update_operation_endpoint,
    },
    project::{
        create_project_endpoint, delete_project_endpoint, get_edit_project_page,
        get_new_project_page, get_project_details_page, get_projects_page,
        update_project_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::OVERWRITE_DB_API, post(overwrite_db_endpoint))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_pages = Router::new()
        .route(endpoints::PROJECTS_VIEW, get(get_projects_page))
        .route(endpoints::NEW_PROJECT_VIEW, get(get_new_project_page))
        .route(endpoints::PROJECT_VIEW, get(get_project_details_page))
        .route(endpoints::EDIT_PROJECT_VIEW, get(get_edit_project_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(endpoints::EDIT_MEMBER_VIEW, get(get_edit_member_page))
        .route(endpoints::EDIT_OPERATION_VIEW, get(get_edit_operation_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes are called from HTMX and need the HX-Redirect header for
    // auth redirects to work.
    let protected_api = Router::new()
        .route(endpoints::PROJECTS_API, post(create_project_endpoint))
        .route(
            endpoints::PROJECT_API,
            put(update_project_endpoint).delete(delete_project_endpoint),
        )
        .route(endpoints::CATEGORIES_API, post(create_category_endpoint))
        .route(
            endpoints::CATEGORY_API,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::CATEGORY_SEARCH_API,
            get(search_categories_endpoint),
        )
        .route(endpoints::CATEGORY_UNIQUE_API, get(category_unique_endpoint))
        .route(endpoints::MEMBERS_API, post(create_member_endpoint))
        .route(
            endpoints::MEMBER_API,
            put(update_member_endpoint).delete(delete_member_endpoint),
        )
        .route(endpoints::OPERATIONS_API, post(create_operation_endpoint))
        .route(
            endpoints::OPERATION_API,
            put(update_operation_endpoint).delete(delete_operation_endpoint),
        )
        .route(
            endpoints::MODAL_PROJECT_DELETE,
            get(get_project_delete_modal),
        )
        .route(endpoints::MODAL_ADD_CHARGE, get(get_add_charge_modal))
        .route(endpoints::MODAL_ADD_INCOME, get(get_add_income_modal))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

    protected_pages
        .merge(protected_api)
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The root path '/' redirects to the projects page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::PROJECTS_VIEW)
}
