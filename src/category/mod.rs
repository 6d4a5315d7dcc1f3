//! Categories for classifying a project's financial operations.

mod create;
mod db;
mod delete;
pub(crate) mod domain;
mod edit;
mod list;
mod search;

pub use create::{create_category_endpoint, get_new_category_page};
pub use db::{
    create_category_table, delete_category, get_categories_by_owner, get_categories_by_project,
    get_category, rename_category, resolve_or_create_category, search_categories,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryId, CategoryName, CategoryWithProject};
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use list::get_categories_page;
pub use search::{category_unique_endpoint, search_categories_endpoint};
