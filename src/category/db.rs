//! Database operations for categories.
//!
//! Category names are unique per project, enforced by the schema. The
//! resolve-or-create path relies on `INSERT ... ON CONFLICT DO NOTHING`
//! followed by a lookup inside the same statement batch, so two concurrent
//! submissions of the same name always converge on one row instead of
//! racing a check-then-create.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName, CategoryWithProject},
    project::{ProjectId, touch_project},
    user::UserId,
};

/// Resolve a category name to its row, creating the row if it is new.
///
/// Bumps the owning project's update time only when a new row was created.
pub fn resolve_or_create_category(
    name: CategoryName,
    project_id: ProjectId,
    connection: &Connection,
) -> Result<Category, Error> {
    let now = OffsetDateTime::now_utc();
    let inserted = connection.execute(
        "INSERT INTO category (project_id, name, create_time, update_time)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT (project_id, name) DO NOTHING;",
        (project_id, name.as_ref(), now, now),
    )?;

    if inserted > 0 {
        touch_project(project_id, connection)?;
    }

    connection
        .prepare(
            "SELECT id, project_id, name, create_time, update_time FROM category
            WHERE project_id = :project_id AND name = :name;",
        )?
        .query_row(
            rusqlite::named_params! {":project_id": project_id, ":name": name.as_ref()},
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, project_id, name, create_time, update_time FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories of a project ordered alphabetically by name.
pub fn get_categories_by_project(
    project_id: ProjectId,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, project_id, name, create_time, update_time FROM category
            WHERE project_id = :project_id ORDER BY name ASC;",
        )?
        .query_map(&[(":project_id", &project_id)], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the categories of every project owned by `owner`, with the
/// project names for display, ordered by project then category name.
pub fn get_categories_by_owner(
    owner: UserId,
    connection: &Connection,
) -> Result<Vec<CategoryWithProject>, Error> {
    connection
        .prepare(
            "SELECT c.id, c.project_id, c.name, c.create_time, c.update_time, p.name
            FROM category c
            JOIN project p ON p.id = c.project_id
            WHERE p.user_id = :user_id
            ORDER BY p.name ASC, c.name ASC;",
        )?
        .query_map(&[(":user_id", &owner.as_i64())], |row| {
            Ok(CategoryWithProject {
                category: map_row(row)?,
                project_name: row.get(5)?,
            })
        })?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Search a project's categories for names containing `term`.
///
/// The match is a case-insensitive substring match; `term` is lowercased to
/// line up with the stored names. Blank terms match everything.
pub fn search_categories(
    project_id: ProjectId,
    term: &str,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let term = term.trim().to_lowercase();

    connection
        .prepare(
            "SELECT id, project_id, name, create_time, update_time FROM category
            WHERE project_id = :project_id AND (:term = '' OR instr(name, :term) > 0)
            ORDER BY name ASC;",
        )?
        .query_map(
            rusqlite::named_params! {":project_id": project_id, ":term": term},
            map_row,
        )?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Rename a category and bump the owning project's update time.
///
/// # Errors
/// Returns [Error::NotFound] if the category no longer exists, or
/// [Error::DuplicateCategoryName] if the project already has a category with
/// the new name.
pub fn rename_category(
    category_id: CategoryId,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1, update_time = ?2 WHERE id = ?3",
            (new_name.as_ref(), OffsetDateTime::now_utc(), category_id),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(inner, _)
                if inner.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::DuplicateCategoryName
            }
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    let project_id: ProjectId = connection.query_row(
        "SELECT project_id FROM category WHERE id = ?1",
        [category_id],
        |row| row.get(0),
    )?;
    touch_project(project_id, connection)?;

    Ok(())
}

/// Delete a category by ID and bump the owning project's update time.
///
/// Operations tagged with the category keep existing; their category
/// reference is cleared by the schema.
///
/// # Errors
/// Returns [Error::NotFound] if the category no longer exists.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let project_id: ProjectId = connection
        .query_row(
            "SELECT project_id FROM category WHERE id = ?1",
            [category_id],
            |row| row.get(0),
        )
        .map_err(Error::from)?;

    connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;
    touch_project(project_id, connection)?;

    Ok(())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL REFERENCES project(id),
            name TEXT NOT NULL,
            create_time TEXT NOT NULL,
            update_time TEXT NOT NULL,
            UNIQUE (project_id, name)
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        create_time: row.get(3)?,
        update_time: row.get(4)?,
    })
}


#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{
            CategoryName, get_categories_by_owner, get_categories_by_project, get_category,
            resolve_or_create_category, search_categories,
        },
        project::{ProjectId, ProjectName, create_project, get_project},
        user::create_user,
    };

    use super::{delete_category, rename_category};

    fn get_test_db_connection() -> (Connection, ProjectId) {
        let connection = Connection::open_in_memory().unwrap();
        crate::db::initialize(&connection).expect("Could not initialize database");

        let user = create_user("owner@test.com", "not-a-real-hash", &connection)
            .expect("Could not create test user");
        let project = create_project(ProjectName::new_unchecked("Budget"), user.id, &connection)
            .expect("Could not create test project");

        (connection, project.id)
    }

    #[test]
    fn resolve_creates_missing_category() {
        let (connection, project_id) = get_test_db_connection();
        let name = CategoryName::new("Продукты").unwrap();

        let category = resolve_or_create_category(name, project_id, &connection)
            .expect("Could not resolve category");

        assert!(category.id > 0);
        assert_eq!(category.name, "продукты");
    }

    #[test]
    fn resolve_is_idempotent() {
        let (connection, project_id) = get_test_db_connection();

        let first = resolve_or_create_category(
            CategoryName::new("кафе").unwrap(),
            project_id,
            &connection,
        )
        .expect("Could not resolve category");
        let second = resolve_or_create_category(
            CategoryName::new("Кафе").unwrap(),
            project_id,
            &connection,
        )
        .expect("Could not resolve category");

        assert_eq!(first, second);

        let categories = get_categories_by_project(project_id, &connection)
            .expect("Could not list categories");
        assert_eq!(categories.len(), 1);
    }

    #[test]
    fn resolve_bumps_project_update_time_only_on_create() {
        let (connection, project_id) = get_test_db_connection();
        let name = CategoryName::new("подарки").unwrap();

        resolve_or_create_category(name.clone(), project_id, &connection).unwrap();
        let after_create = get_project(project_id, &connection).unwrap().update_time;

        connection
            .execute(
                "UPDATE project SET update_time = '2000-01-01T00:00:00Z' WHERE id = ?1",
                [project_id],
            )
            .unwrap();

        resolve_or_create_category(name, project_id, &connection).unwrap();
        let after_resolve = get_project(project_id, &connection).unwrap().update_time;

        assert!(after_create.year() >= 2020);
        assert_eq!(after_resolve.year(), 2000, "resolve of an existing category should not touch");
    }

    #[test]
    fn same_name_allowed_in_different_projects() {
        let (connection, project_id) = get_test_db_connection();
        let other_project = create_project(
            ProjectName::new_unchecked("Other"),
            get_project(project_id, &connection).unwrap().owner,
            &connection,
        )
        .expect("Could not create project");

        let first = resolve_or_create_category(
            CategoryName::new_unchecked("кафе"),
            project_id,
            &connection,
        )
        .unwrap();
        let second = resolve_or_create_category(
            CategoryName::new_unchecked("кафе"),
            other_project.id,
            &connection,
        )
        .unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let (connection, _) = get_test_db_connection();

        assert_eq!(get_category(999999, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_categories_by_owner_includes_project_names() {
        let (connection, project_id) = get_test_db_connection();
        let owner = get_project(project_id, &connection).unwrap().owner;
        resolve_or_create_category(CategoryName::new_unchecked("кафе"), project_id, &connection)
            .unwrap();

        let categories =
            get_categories_by_owner(owner, &connection).expect("Could not list categories");

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].category.name, "кафе");
        assert_eq!(categories[0].project_name, "Budget");
    }

    #[test]
    fn search_matches_substring_case_insensitively() {
        let (connection, project_id) = get_test_db_connection();
        for name in ["продукты", "подарки", "кафе"] {
            resolve_or_create_category(
                CategoryName::new_unchecked(name),
                project_id,
                &connection,
            )
            .unwrap();
        }

        let matches = search_categories(project_id, "ПОД", &connection)
            .expect("Could not search categories");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "подарки");
    }

    #[test]
    fn search_with_blank_term_returns_all() {
        let (connection, project_id) = get_test_db_connection();
        for name in ["продукты", "кафе"] {
            resolve_or_create_category(
                CategoryName::new_unchecked(name),
                project_id,
                &connection,
            )
            .unwrap();
        }

        let matches =
            search_categories(project_id, "  ", &connection).expect("Could not search categories");

        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn rename_category_succeeds_and_touches_project() {
        let (connection, project_id) = get_test_db_connection();
        let category = resolve_or_create_category(
            CategoryName::new_unchecked("before"),
            project_id,
            &connection,
        )
        .unwrap();

        connection
            .execute(
                "UPDATE project SET update_time = '2000-01-01T00:00:00Z' WHERE id = ?1",
                [project_id],
            )
            .unwrap();

        rename_category(category.id, CategoryName::new_unchecked("after"), &connection)
            .expect("Could not rename category");

        let updated = get_category(category.id, &connection).unwrap();
        assert_eq!(updated.name, "after");
        let project = get_project(project_id, &connection).unwrap();
        assert!(project.update_time.year() > 2000);
    }

    #[test]
    fn rename_to_name_taken_in_project_returns_duplicate_error() {
        let (connection, project_id) = get_test_db_connection();
        resolve_or_create_category(
            CategoryName::new_unchecked("продукты"),
            project_id,
            &connection,
        )
        .unwrap();
        let cafe = resolve_or_create_category(
            CategoryName::new_unchecked("кафе"),
            project_id,
            &connection,
        )
        .unwrap();

        let result = rename_category(
            cafe.id,
            CategoryName::new_unchecked("продукты"),
            &connection,
        );

        assert_eq!(result, Err(Error::DuplicateCategoryName));
        let unchanged = get_category(cafe.id, &connection).unwrap();
        assert_eq!(unchanged.name, "кафе");
    }

    #[test]
    fn rename_category_with_invalid_id_returns_not_found() {
        let (connection, _) = get_test_db_connection();

        let result = rename_category(999999, CategoryName::new_unchecked("after"), &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_category_succeeds() {
        let (connection, project_id) = get_test_db_connection();
        let category = resolve_or_create_category(
            CategoryName::new_unchecked("doomed"),
            project_id,
            &connection,
        )
        .unwrap();

        delete_category(category.id, &connection).expect("Could not delete category");

        assert_eq!(get_category(category.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_category_with_invalid_id_returns_not_found() {
        let (connection, _) = get_test_db_connection();

        assert_eq!(delete_category(999999, &connection), Err(Error::NotFound));
    }
}
