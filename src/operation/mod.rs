//! Financial operations, the incomes and charges a project records.

mod create;
mod db;
mod delete;
pub(crate) mod domain;
mod edit;
mod query;

pub use create::create_operation_endpoint;
pub use db::{
    count_operations_by_type, create_operation, create_operation_at, create_operation_table,
    delete_operation, get_operation, update_operation,
};
pub use delete::delete_operation_endpoint;
pub use domain::{FinType, Operation, OperationDraft, OperationId};
pub use edit::{get_edit_operation_page, update_operation_endpoint};
pub use query::{
    OperationPage, OperationQuery, OperationTableRow, SortDirection, SortKey, list_operations,
};
