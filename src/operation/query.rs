//! The filtered, sorted, paged operation listing behind the project details
//! page.
//!
//! Every call recomputes the listing from scratch with plain SQL. The total
//! count is computed with the same filters before pagination so the page
//! indicator stays correct on any page.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};

use crate::{Error, operation::FinType, operation::db::map_row, project::ProjectId};

use super::Operation;

/// The column to sort an operation listing by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Member display name.
    Member,
    /// Income before charge (or the reverse).
    FinType,
    /// Category name.
    Category,
    /// Time the operation was recorded.
    CreateTime,
    /// Operation amount.
    Value,
}

/// The direction to sort an operation listing in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Filters, sorting, and the page to fetch for an operation listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationQuery {
    /// Keep only operations of this fin type.
    pub fin_type: Option<FinType>,
    /// Keep only operations whose category name contains this substring.
    /// Operations without a category never match.
    pub category: Option<String>,
    /// The column to sort by. `None` falls back to newest first.
    pub sort: Option<SortKey>,
    /// The direction to sort in. Ignored when `sort` is `None`.
    pub direction: SortDirection,
    /// 1-based page number. Values below 1 are treated as 1.
    pub page: u64,
}

/// One row of the listing: the operation with its category and member names
/// resolved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTableRow {
    /// The operation itself.
    pub operation: Operation,
    /// The category name, if the operation has a category.
    pub category_name: Option<String>,
    /// The member display name, if the operation is tagged to a member.
    pub member_name: Option<String>,
}

/// One page of an operation listing plus the numbers the paging UI needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPage {
    /// The rows of the requested page, at most `page_size` of them.
    pub rows: Vec<OperationTableRow>,
    /// How many operations match the filters across all pages.
    pub total: usize,
    /// The 1-based page number that was fetched.
    pub page: u64,
    /// The fixed page size.
    pub page_size: u64,
}

impl OperationPage {
    /// How many pages the filtered listing spans. Zero rows means zero
    /// pages.
    pub fn page_count(&self) -> u64 {
        (self.total as u64).div_ceil(self.page_size)
    }
}

/// Fetch one page of a project's operations.
///
/// A page past the end of the listing yields no rows and the true total,
/// not an error.
pub fn list_operations(
    project_id: ProjectId,
    query: &OperationQuery,
    page_size: u64,
    connection: &Connection,
) -> Result<OperationPage, Error> {
    let mut where_clause_parts = vec!["o.project_id = ?1".to_string()];
    let mut query_parameters = vec![Value::Integer(project_id)];

    if let Some(fin_type) = query.fin_type {
        where_clause_parts.push(format!("o.fin_type = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Integer(fin_type.as_i64()));
    }

    if let Some(category) = query.category.as_deref().filter(|term| !term.is_empty()) {
        where_clause_parts.push(format!("instr(c.name, ?{}) > 0", query_parameters.len() + 1));
        query_parameters.push(Value::Text(category.to_string()));
    }

    let from_and_where = format!(
        "FROM fin_operation o
        LEFT JOIN category c ON c.id = o.category_id
        LEFT JOIN project_member m ON m.id = o.member_id
        WHERE {}",
        where_clause_parts.join(" AND ")
    );

    let total: i64 = connection.query_row(
        &format!("SELECT COUNT(*) {from_and_where}"),
        params_from_iter(query_parameters.iter()),
        |row| row.get(0),
    )?;
    let total = total as usize;

    // Ties are broken by ID so row order is stable across edits. The
    // tie-break follows the sort direction, which makes descending the
    // exact reverse of ascending even when the sort column has duplicates.
    let order_clause = match query.sort {
        Some(key) => {
            let column = match key {
                SortKey::Member => "m.name",
                SortKey::FinType => "o.fin_type",
                SortKey::Category => "c.name",
                SortKey::CreateTime => "o.create_time",
                SortKey::Value => "o.value",
            };
            let direction = match query.direction {
                SortDirection::Ascending => "ASC",
                SortDirection::Descending => "DESC",
            };
            format!("ORDER BY {column} {direction}, o.id {direction}")
        }
        None => "ORDER BY o.create_time DESC, o.id ASC".to_string(),
    };

    let page = query.page.max(1);
    let offset = (page - 1) * page_size;
    let select = format!(
        "SELECT o.id, o.project_id, o.fin_type, o.for_all, o.value, o.category_id, o.member_id,
        o.create_time, o.update_time, c.name, m.name
        {from_and_where} {order_clause} LIMIT {page_size} OFFSET {offset}"
    );

    let rows = connection
        .prepare(&select)?
        .query_map(params_from_iter(query_parameters.iter()), |row| {
            Ok(OperationTableRow {
                operation: map_row(row)?,
                category_name: row.get(9)?,
                member_name: row.get(10)?,
            })
        })?
        .map(|maybe_row| maybe_row.map_err(Error::SqlError))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OperationPage {
        rows,
        total,
        page,
        page_size,
    })
}
