//! Demo data endpoint.
//!
//! Wipes every table and reseeds a known family budget so the app can be
//! explored without signing up. The endpoint is unauthenticated by design:
//! it exists for demo deployments only.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::macros::datetime;

use crate::{
    AppState, Error,
    category::{Category, CategoryName, resolve_or_create_category},
    member::{MemberId, MemberName, create_member},
    operation::{FinType, OperationDraft, create_operation_at},
    project::{ProjectName, create_project},
    user::{create_user, hash_password},
};

/// The state needed for the demo reseed endpoint.
#[derive(Debug, Clone)]
pub struct OverwriteDbState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for OverwriteDbState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Replace the database contents with the demo family budget.
///
/// Responds with plain "ok" on success.
pub async fn overwrite_db_endpoint(State(state): State<OverwriteDbState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match seed_demo_data(&connection) {
        Ok(()) => "ok".into_response(),
        Err(error) => {
            tracing::error!("Failed to seed demo data: {error}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn wipe_tables(connection: &Connection) -> Result<(), Error> {
    // Child tables first so the foreign keys never dangle mid-wipe.
    for table in ["fin_operation", "category", "project_member", "project", "user"] {
        connection.execute(&format!("DELETE FROM {table};"), [])?;
    }

    Ok(())
}

fn seed_demo_data(connection: &Connection) -> Result<(), Error> {
    wipe_tables(connection)?;

    let password_hash = hash_password("123456")?;
    let demo_user = create_user("demo@mail.ru", &password_hash, connection)?;

    let project = create_project(
        ProjectName::new_unchecked("Семейный бюджет"),
        demo_user.id,
        connection,
    )?;

    let lidia = create_member(
        MemberName::new_unchecked("Лидия Иванова"),
        project.id,
        demo_user.id,
        connection,
    )?;
    let sergey = create_member(
        MemberName::new_unchecked("Сергей Петров"),
        project.id,
        demo_user.id,
        connection,
    )?;

    let category = |name: &str| -> Result<Category, Error> {
        resolve_or_create_category(CategoryName::new_unchecked(name), project.id, connection)
    };
    let groceries = category("продукты")?;
    let gifts = category("подарки")?;
    let appliances = category("бытовая техника")?;
    let leisure = category("развлечения")?;
    let cafe = category("кафе")?;

    let charges: [(i64, &Category, Option<MemberId>, time::OffsetDateTime); 10] = [
        (1200, &groceries, None, datetime!(2021-01-12 22:11:11 UTC)),
        (110, &groceries, None, datetime!(2021-01-12 20:11:11 UTC)),
        (11000, &gifts, None, datetime!(2021-12-12 21:11:11 UTC)),
        (11000, &appliances, Some(lidia.id), datetime!(2021-06-17 14:11:11 UTC)),
        (2500, &leisure, Some(lidia.id), datetime!(2021-10-20 10:11:11 UTC)),
        (1100, &leisure, Some(sergey.id), datetime!(2021-04-12 20:00:00 UTC)),
        (10000, &leisure, Some(sergey.id), datetime!(2021-05-12 20:00:00 UTC)),
        (10000, &leisure, Some(lidia.id), datetime!(2021-05-10 21:00:00 UTC)),
        (4000, &cafe, Some(sergey.id), datetime!(2021-05-10 21:00:00 UTC)),
        (4000, &cafe, None, datetime!(2021-05-07 19:00:00 UTC)),
    ];

    for (value, category, member_id, recorded_at) in charges {
        create_operation_at(
            OperationDraft {
                project_id: project.id,
                fin_type: FinType::Charge,
                for_all: true,
                value,
                category_id: Some(category.id),
                member_id,
            },
            recorded_at,
            connection,
        )?;
    }

    Ok(())
}
