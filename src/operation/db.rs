//! Database operations for financial operations.
//!
//! Recording, editing, or deleting an operation bumps the owning project's
//! update time.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    operation::{FinType, Operation, OperationDraft, OperationId},
    project::{ProjectId, touch_project},
};

/// Record a new operation timestamped now and return it with its generated
/// ID.
pub fn create_operation(
    draft: OperationDraft,
    connection: &Connection,
) -> Result<Operation, Error> {
    create_operation_at(draft, OffsetDateTime::now_utc(), connection)
}

/// Record a new operation with an explicit timestamp.
///
/// Used by the demo seed, which recreates operations with fixed historical
/// timestamps.
pub fn create_operation_at(
    draft: OperationDraft,
    timestamp: OffsetDateTime,
    connection: &Connection,
) -> Result<Operation, Error> {
    connection.execute(
        "INSERT INTO fin_operation
        (project_id, fin_type, for_all, value, category_id, member_id, create_time, update_time)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
        (
            draft.project_id,
            draft.fin_type.as_i64(),
            draft.for_all,
            draft.value,
            draft.category_id,
            draft.member_id,
            timestamp,
            timestamp,
        ),
    )?;

    let id = connection.last_insert_rowid();
    touch_project(draft.project_id, connection)?;

    Ok(Operation {
        id,
        project_id: draft.project_id,
        fin_type: draft.fin_type,
        for_all: draft.for_all,
        value: draft.value,
        category_id: draft.category_id,
        member_id: draft.member_id,
        create_time: timestamp,
        update_time: timestamp,
    })
}

/// Retrieve a single operation by ID.
pub fn get_operation(
    operation_id: OperationId,
    connection: &Connection,
) -> Result<Operation, Error> {
    connection
        .prepare(
            "SELECT id, project_id, fin_type, for_all, value, category_id, member_id,
            create_time, update_time
            FROM fin_operation WHERE id = :id;",
        )?
        .query_row(&[(":id", &operation_id)], map_row)
        .map_err(|error| error.into())
}

/// Overwrite an operation's editable fields and bump the owning project's
/// update time.
///
/// The project an operation belongs to never changes.
///
/// # Errors
/// Returns [Error::NotFound] if the operation no longer exists.
pub fn update_operation(
    operation_id: OperationId,
    draft: OperationDraft,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE fin_operation
        SET fin_type = ?1, for_all = ?2, value = ?3, category_id = ?4, member_id = ?5,
            update_time = ?6
        WHERE id = ?7;",
        (
            draft.fin_type.as_i64(),
            draft.for_all,
            draft.value,
            draft.category_id,
            draft.member_id,
            OffsetDateTime::now_utc(),
            operation_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    touch_project(draft.project_id, connection)?;

    Ok(())
}

/// Delete an operation by ID and bump the owning project's update time.
///
/// # Errors
/// Returns [Error::NotFound] if the operation no longer exists.
pub fn delete_operation(operation_id: OperationId, connection: &Connection) -> Result<(), Error> {
    let project_id: ProjectId = connection
        .query_row(
            "SELECT project_id FROM fin_operation WHERE id = ?1",
            [operation_id],
            |row| row.get(0),
        )
        .map_err(Error::from)?;

    connection.execute("DELETE FROM fin_operation WHERE id = ?1", [operation_id])?;
    touch_project(project_id, connection)?;

    Ok(())
}

/// Count a project's operations of one fin type.
///
/// The delete-project modal shows income and charge counts separately.
pub fn count_operations_by_type(
    project_id: ProjectId,
    fin_type: FinType,
    connection: &Connection,
) -> Result<usize, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM fin_operation WHERE project_id = ?1 AND fin_type = ?2",
        (project_id, fin_type.as_i64()),
        |row| row.get(0),
    )?;

    Ok(count as usize)
}

/// Initialize the operation table.
///
/// Deleting a category or member clears the reference on any operations
/// pointing at it instead of deleting the operations.
pub fn create_operation_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS fin_operation (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL REFERENCES project(id),
            fin_type INTEGER NOT NULL,
            for_all INTEGER NOT NULL,
            value INTEGER NOT NULL,
            category_id INTEGER REFERENCES category(id) ON DELETE SET NULL,
            member_id INTEGER REFERENCES project_member(id) ON DELETE SET NULL,
            create_time TEXT NOT NULL,
            update_time TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_operation_project ON fin_operation(project_id);",
    )?;

    Ok(())
}

pub(crate) fn map_row(row: &Row) -> Result<Operation, rusqlite::Error> {
    let fin_type_raw: i64 = row.get(2)?;
    let fin_type = FinType::from_i64(fin_type_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Integer,
            format!("invalid fin_type {fin_type_raw}").into(),
        )
    })?;

    Ok(Operation {
        id: row.get(0)?,
        project_id: row.get(1)?,
        fin_type,
        for_all: row.get(3)?,
        value: row.get(4)?,
        category_id: row.get(5)?,
        member_id: row.get(6)?,
        create_time: row.get(7)?,
        update_time: row.get(8)?,
    })
}
