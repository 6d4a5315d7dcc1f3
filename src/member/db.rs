//! Database operations for project members.
//!
//! Member changes do not bump the owning project's update time. Only the
//! financial contents of a project (categories and operations) count as
//! budget changes.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    member::{Member, MemberId, MemberName},
    project::ProjectId,
    user::UserId,
};

/// Create a member and return it with its generated ID.
pub fn create_member(
    name: MemberName,
    project_id: ProjectId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Member, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO project_member (project_id, user_id, name, create_time, update_time)
        VALUES (?1, ?2, ?3, ?4, ?5);",
        (project_id, user_id.as_i64(), name.as_ref(), now, now),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Member {
        id,
        project_id,
        user_id,
        name: name.to_string(),
        create_time: now,
        update_time: now,
    })
}

/// Retrieve a single member by ID.
pub fn get_member(member_id: MemberId, connection: &Connection) -> Result<Member, Error> {
    connection
        .prepare(
            "SELECT id, project_id, user_id, name, create_time, update_time
            FROM project_member WHERE id = :id;",
        )?
        .query_row(&[(":id", &member_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all members of a project ordered alphabetically by name.
pub fn get_members_by_project(
    project_id: ProjectId,
    connection: &Connection,
) -> Result<Vec<Member>, Error> {
    connection
        .prepare(
            "SELECT id, project_id, user_id, name, create_time, update_time
            FROM project_member
            WHERE project_id = :project_id ORDER BY name ASC, id ASC;",
        )?
        .query_map(&[(":project_id", &project_id)], map_row)?
        .map(|maybe_member| maybe_member.map_err(|error| error.into()))
        .collect()
}

/// Rename a member.
///
/// # Errors
/// Returns [Error::NotFound] if the member no longer exists.
pub fn rename_member(
    member_id: MemberId,
    new_name: MemberName,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE project_member SET name = ?1, update_time = ?2 WHERE id = ?3",
        (new_name.as_ref(), OffsetDateTime::now_utc(), member_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete a member by ID.
///
/// Operations tagged to the member keep existing; their member reference is
/// cleared by the schema.
///
/// # Errors
/// Returns [Error::NotFound] if the member no longer exists.
pub fn delete_member(member_id: MemberId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM project_member WHERE id = ?1", [member_id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Initialize the member table.
pub fn create_member_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS project_member (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL REFERENCES project(id),
            user_id INTEGER NOT NULL REFERENCES user(id),
            name TEXT NOT NULL,
            create_time TEXT NOT NULL,
            update_time TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_member_project ON project_member(project_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Member, rusqlite::Error> {
    Ok(Member {
        id: row.get(0)?,
        project_id: row.get(1)?,
        user_id: UserId::new(row.get(2)?),
        name: row.get(3)?,
        create_time: row.get(4)?,
        update_time: row.get(5)?,
    })
}

#[cfg(test)]
mod member_name_tests {
    use crate::{Error, member::MemberName};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(MemberName::new(""), Err(Error::EmptyMemberName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(MemberName::new("  \t"), Err(Error::EmptyMemberName));
    }

    #[test]
    fn new_keeps_unicode_names() {
        let name = MemberName::new("Лидия Иванова").unwrap();

        assert_eq!(name.as_ref(), "Лидия Иванова");
    }
}

#[cfg(test)]
mod member_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        member::{MemberName, create_member, get_member, get_members_by_project},
        project::{ProjectId, ProjectName, create_project, get_project},
        user::{UserId, create_user},
    };

    use super::{delete_member, rename_member};

    fn get_test_db_connection() -> (Connection, ProjectId, UserId) {
        let connection = Connection::open_in_memory().unwrap();
        crate::db::initialize(&connection).expect("Could not initialize database");

        let user = create_user("owner@test.com", "not-a-real-hash", &connection)
            .expect("Could not create test user");
        let project = create_project(ProjectName::new_unchecked("Budget"), user.id, &connection)
            .expect("Could not create test project");

        (connection, project.id, user.id)
    }

    #[test]
    fn create_member_succeeds() {
        let (connection, project_id, user_id) = get_test_db_connection();
        let name = MemberName::new("Лидия Иванова").unwrap();

        let member = create_member(name, project_id, user_id, &connection)
            .expect("Could not create member");

        assert!(member.id > 0);
        assert_eq!(member.project_id, project_id);
        assert_eq!(member.user_id, user_id);
        assert_eq!(member.name, "Лидия Иванова");
        assert_eq!(member.create_time, member.update_time);
    }

    #[test]
    fn create_member_does_not_touch_project() {
        let (connection, project_id, user_id) = get_test_db_connection();
        let before = get_project(project_id, &connection).unwrap().update_time;

        create_member(
            MemberName::new_unchecked("Foo"),
            project_id,
            user_id,
            &connection,
        )
        .expect("Could not create member");

        let after = get_project(project_id, &connection).unwrap().update_time;
        assert_eq!(before, after);
    }

    #[test]
    fn same_user_may_appear_under_several_names() {
        let (connection, project_id, user_id) = get_test_db_connection();

        create_member(
            MemberName::new_unchecked("Anya"),
            project_id,
            user_id,
            &connection,
        )
        .expect("Could not create member");
        create_member(
            MemberName::new_unchecked("Borya"),
            project_id,
            user_id,
            &connection,
        )
        .expect("Could not create member");

        let members =
            get_members_by_project(project_id, &connection).expect("Could not list members");
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn get_members_by_project_sorts_by_name() {
        let (connection, project_id, user_id) = get_test_db_connection();
        let b = create_member(
            MemberName::new_unchecked("Borya"),
            project_id,
            user_id,
            &connection,
        )
        .expect("Could not create member");
        let a = create_member(
            MemberName::new_unchecked("Anya"),
            project_id,
            user_id,
            &connection,
        )
        .expect("Could not create member");

        let members =
            get_members_by_project(project_id, &connection).expect("Could not list members");

        assert_eq!(members, vec![a, b]);
    }

    #[test]
    fn rename_member_succeeds() {
        let (connection, project_id, user_id) = get_test_db_connection();
        let member = create_member(
            MemberName::new_unchecked("Before"),
            project_id,
            user_id,
            &connection,
        )
        .expect("Could not create member");

        rename_member(member.id, MemberName::new_unchecked("After"), &connection)
            .expect("Could not rename member");

        let updated = get_member(member.id, &connection).expect("Could not get member");
        assert_eq!(updated.name, "After");
        assert!(updated.update_time >= member.update_time);
    }

    #[test]
    fn rename_member_with_invalid_id_returns_not_found() {
        let (connection, _, _) = get_test_db_connection();

        let result = rename_member(999999, MemberName::new_unchecked("After"), &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_member_succeeds() {
        let (connection, project_id, user_id) = get_test_db_connection();
        let member = create_member(
            MemberName::new_unchecked("Doomed"),
            project_id,
            user_id,
            &connection,
        )
        .expect("Could not create member");

        delete_member(member.id, &connection).expect("Could not delete member");

        assert_eq!(get_member(member.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_member_with_invalid_id_returns_not_found() {
        let (connection, _, _) = get_test_db_connection();

        assert_eq!(delete_member(999999, &connection), Err(Error::NotFound));
    }
}
