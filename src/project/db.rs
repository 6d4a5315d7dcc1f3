//! Database operations for projects.
//!
//! A project owns its members, categories, and operations, so deleting a
//! project removes all of them in one transaction. Changes to a project's
//! contents are reflected in the project's `update_time` via
//! [touch_project].

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    project::{Project, ProjectId, ProjectName},
    user::UserId,
};

/// Create a project and return it with its generated ID.
pub fn create_project(
    name: ProjectName,
    owner: UserId,
    connection: &Connection,
) -> Result<Project, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO project (user_id, name, create_time, update_time)
        VALUES (?1, ?2, ?3, ?4);",
        (owner.as_i64(), name.as_ref(), now, now),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Project {
        id,
        name: name.to_string(),
        owner,
        create_time: now,
        update_time: now,
    })
}

/// Retrieve a single project by ID.
pub fn get_project(project_id: ProjectId, connection: &Connection) -> Result<Project, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, create_time, update_time
            FROM project WHERE id = :id;",
        )?
        .query_row(&[(":id", &project_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all projects owned by `owner`, newest first.
pub fn get_projects_by_owner(
    owner: UserId,
    connection: &Connection,
) -> Result<Vec<Project>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, create_time, update_time
            FROM project WHERE user_id = :user_id
            ORDER BY create_time DESC, id DESC;",
        )?
        .query_map(&[(":user_id", &owner.as_i64())], map_row)?
        .map(|maybe_project| maybe_project.map_err(|error| error.into()))
        .collect()
}

/// Rename a project and bump its update time.
///
/// # Errors
/// Returns [Error::NotFound] if the project no longer exists.
pub fn rename_project(
    project_id: ProjectId,
    new_name: ProjectName,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE project SET name = ?1, update_time = ?2 WHERE id = ?3",
        (new_name.as_ref(), OffsetDateTime::now_utc(), project_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Bump a project's update time.
///
/// Called whenever a category or operation belonging to the project is
/// created, changed, or deleted.
pub fn touch_project(project_id: ProjectId, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "UPDATE project SET update_time = ?1 WHERE id = ?2",
        (OffsetDateTime::now_utc(), project_id),
    )?;

    Ok(())
}

/// Delete a project along with its members, categories, and operations.
///
/// # Errors
/// Returns [Error::NotFound] if the project no longer exists. Nothing is
/// deleted in that case.
pub fn delete_project(project_id: ProjectId, connection: &Connection) -> Result<(), Error> {
    let transaction = rusqlite::Transaction::new_unchecked(
        connection,
        rusqlite::TransactionBehavior::Immediate,
    )?;

    transaction.execute("DELETE FROM fin_operation WHERE project_id = ?1", [project_id])?;
    transaction.execute("DELETE FROM category WHERE project_id = ?1", [project_id])?;
    transaction.execute("DELETE FROM project_member WHERE project_id = ?1", [project_id])?;
    let rows_affected = transaction.execute("DELETE FROM project WHERE id = ?1", [project_id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    transaction.commit()?;

    Ok(())
}

/// Initialize the project table.
pub fn create_project_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS project (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id),
            name TEXT NOT NULL,
            create_time TEXT NOT NULL,
            update_time TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_project_user ON project(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Project, rusqlite::Error> {
    Ok(Project {
        id: row.get(0)?,
        owner: UserId::new(row.get(1)?),
        name: row.get(2)?,
        create_time: row.get(3)?,
        update_time: row.get(4)?,
    })
}


#[cfg(test)]
mod project_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        project::{ProjectName, create_project, get_project, get_projects_by_owner},
        user::{UserId, create_user},
    };

    use super::{delete_project, rename_project, touch_project};

    fn get_test_db_connection() -> (Connection, UserId) {
        let connection = Connection::open_in_memory().unwrap();
        crate::db::initialize(&connection).expect("Could not initialize database");

        let user = create_user("owner@test.com", "not-a-real-hash", &connection)
            .expect("Could not create test user");

        (connection, user.id)
    }

    #[test]
    fn create_project_succeeds() {
        let (connection, owner) = get_test_db_connection();
        let name = ProjectName::new("Family budget").unwrap();

        let project = create_project(name, owner, &connection).expect("Could not create project");

        assert!(project.id > 0);
        assert_eq!(project.name, "Family budget");
        assert_eq!(project.owner, owner);
        assert_eq!(project.create_time, project.update_time);
    }

    #[test]
    fn get_project_succeeds() {
        let (connection, owner) = get_test_db_connection();
        let inserted = create_project(ProjectName::new_unchecked("Foo"), owner, &connection)
            .expect("Could not create project");

        let selected = get_project(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_project_with_invalid_id_returns_not_found() {
        let (connection, owner) = get_test_db_connection();
        let inserted = create_project(ProjectName::new_unchecked("Foo"), owner, &connection)
            .expect("Could not create project");

        let selected = get_project(inserted.id + 123, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_projects_by_owner_excludes_other_users() {
        let (connection, owner) = get_test_db_connection();
        let other_user = create_user("other@test.com", "not-a-real-hash", &connection)
            .expect("Could not create test user")
            .id;
        let mine = create_project(ProjectName::new_unchecked("Mine"), owner, &connection)
            .expect("Could not create project");
        create_project(ProjectName::new_unchecked("Theirs"), other_user, &connection)
            .expect("Could not create project");

        let projects = get_projects_by_owner(owner, &connection).expect("Could not list projects");

        assert_eq!(projects, vec![mine]);
    }

    #[test]
    fn rename_project_updates_name_and_update_time() {
        let (connection, owner) = get_test_db_connection();
        let project = create_project(ProjectName::new_unchecked("Before"), owner, &connection)
            .expect("Could not create project");

        rename_project(project.id, ProjectName::new_unchecked("After"), &connection)
            .expect("Could not rename project");

        let updated = get_project(project.id, &connection).expect("Could not get project");
        assert_eq!(updated.name, "After");
        assert!(updated.update_time >= project.update_time);
    }

    #[test]
    fn rename_project_with_invalid_id_returns_not_found() {
        let (connection, _) = get_test_db_connection();

        let result = rename_project(999999, ProjectName::new_unchecked("After"), &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn touch_project_bumps_update_time() {
        let (connection, owner) = get_test_db_connection();
        let project = create_project(ProjectName::new_unchecked("Foo"), owner, &connection)
            .expect("Could not create project");

        // Force a visibly newer timestamp.
        connection
            .execute(
                "UPDATE project SET update_time = '2000-01-01T00:00:00Z' WHERE id = ?1",
                [project.id],
            )
            .unwrap();

        touch_project(project.id, &connection).expect("Could not touch project");

        let updated = get_project(project.id, &connection).expect("Could not get project");
        assert!(updated.update_time.year() > 2000);
    }

    #[test]
    fn delete_project_removes_project() {
        let (connection, owner) = get_test_db_connection();
        let project = create_project(ProjectName::new_unchecked("Doomed"), owner, &connection)
            .expect("Could not create project");

        delete_project(project.id, &connection).expect("Could not delete project");

        assert_eq!(get_project(project.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_project_with_invalid_id_returns_not_found() {
        let (connection, _) = get_test_db_connection();

        let result = delete_project(999999, &connection);

        assert_eq!(result, Err(Error::NotFound));
    }
}
