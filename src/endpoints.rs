//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/projects/{project_id}', use
//! [format_endpoint].

/// The root route which redirects to the projects page.
pub const ROOT: &str = "/";
/// The page listing the projects the caller may view.
pub const PROJECTS_VIEW: &str = "/projects";
/// The page for creating a new project.
pub const NEW_PROJECT_VIEW: &str = "/projects/new";
/// The page showing a project's operations, filtered/sorted/paged.
pub const PROJECT_VIEW: &str = "/projects/{project_id}";
/// The page for editing a project, its categories, and its members.
pub const EDIT_PROJECT_VIEW: &str = "/projects/{project_id}/edit";
/// The page listing the categories the caller may view.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page for editing an existing category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The page for editing an existing project member.
pub const EDIT_MEMBER_VIEW: &str = "/members/{member_id}/edit";
/// The page for editing an existing operation.
pub const EDIT_OPERATION_VIEW: &str = "/operations/{operation_id}/edit";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create a project.
pub const PROJECTS_API: &str = "/api/projects";
/// The route to update or delete a project.
pub const PROJECT_API: &str = "/api/projects/{project_id}";
/// The route to create a category.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route to update or delete a category.
pub const CATEGORY_API: &str = "/api/categories/{category_id}";
/// The route to search a project's categories by name substring.
pub const CATEGORY_SEARCH_API: &str = "/api/categories/search";
/// The route to resolve a category name to an ID, creating it if needed.
pub const CATEGORY_UNIQUE_API: &str = "/api/categories/unique";
/// The route to create a project member.
pub const MEMBERS_API: &str = "/api/members";
/// The route to update or delete a project member.
pub const MEMBER_API: &str = "/api/members/{member_id}";
/// The route to create an operation.
pub const OPERATIONS_API: &str = "/api/operations";
/// The route to update or delete an operation.
pub const OPERATION_API: &str = "/api/operations/{operation_id}";
/// The modal fragment confirming project deletion.
pub const MODAL_PROJECT_DELETE: &str = "/api/modal/projects/{project_id}/delete";
/// The modal fragment with the add-charge form.
pub const MODAL_ADD_CHARGE: &str = "/api/modal/projects/{project_id}/charge";
/// The modal fragment with the add-income form.
pub const MODAL_ADD_INCOME: &str = "/api/modal/projects/{project_id}/income";
/// The route that wipes the database and reseeds the demo data.
pub const OVERWRITE_DB_API: &str = "/api/overwrite_db";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/projects/{project_id}',
/// '{project_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
