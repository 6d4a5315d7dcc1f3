//! Shared fixtures for handler tests: an app state over a fresh in-memory
//! database and a user with a project to hang entities off.

use rusqlite::Connection;

use crate::{
    AppState,
    project::{Project, ProjectName, create_project},
    user::{User, create_user},
};

/// A user together with a project they own.
pub struct TestProject {
    pub user: User,
    pub project: Project,
}

/// Create an [AppState] backed by a fresh in-memory database.
pub fn create_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection, "42").expect("Could not create app state")
}

/// Create a user and a project owned by them.
///
/// The stored password hash is a placeholder. Tests that verify passwords
/// create their own user with a real hash.
pub fn create_test_project(connection: &Connection) -> TestProject {
    let user = create_user("owner@test.com", "not-a-real-hash", connection)
        .expect("Could not create test user");
    let project = create_project(
        ProjectName::new_unchecked("Семейный бюджет"),
        user.id,
        connection,
    )
    .expect("Could not create test project");

    TestProject { user, project }
}
