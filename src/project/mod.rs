//! Projects: the budgets that members, categories, and operations live in.

mod create;
mod db;
mod delete;
mod details;
pub(crate) mod domain;
mod edit;
mod list;

pub use create::{create_project_endpoint, get_new_project_page};
pub use db::{
    create_project, create_project_table, delete_project, get_project, get_projects_by_owner,
    rename_project, touch_project,
};
pub use delete::delete_project_endpoint;
pub use details::get_project_details_page;
pub use domain::{Project, ProjectId, ProjectName};
pub use edit::{get_edit_project_page, update_project_endpoint};
pub use list::get_projects_page;
