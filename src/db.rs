//! Database initialization for the application.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, category::create_category_table, member::create_member_table,
    operation::create_operation_table, project::create_project_table, user::create_user_table,
};

/// Create the application tables if they do not exist.
///
/// Tables are created inside a single exclusive transaction so that a
/// partially initialized schema is never observable.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // FK enforcement is per-connection and off by default in SQLite.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_project_table(&transaction)?;
    create_member_table(&transaction)?;
    create_category_table(&transaction)?;
    create_operation_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
