//! The user model and its database operations.
//!
//! A user is the login identity. Users own projects and back project
//! members; all capability checks resolve against a user ID.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Database identifier for a user.
///
/// This is a newtype so that the auth middleware can place it into request
/// extensions without colliding with other integer extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw database ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw database ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// The ID of the user.
    pub id: UserId,
    /// The unique login name.
    pub name: String,
    /// The bcrypt hash of the user's password.
    pub password_hash: String,
}

/// Hash a raw password for storage.
///
/// # Errors
/// Returns [Error::HashingError] if the underlying hashing library fails.
pub fn hash_password(raw_password: &str) -> Result<String, Error> {
    bcrypt::hash(raw_password, bcrypt::DEFAULT_COST)
        .map_err(|error| Error::HashingError(error.to_string()))
}

/// Check a raw password against a stored hash.
///
/// # Errors
/// Returns [Error::InvalidCredentials] if the password does not match, or
/// [Error::HashingError] if the stored hash could not be parsed.
pub fn verify_password(raw_password: &str, password_hash: &str) -> Result<(), Error> {
    match bcrypt::verify(raw_password, password_hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(error) => Err(Error::HashingError(error.to_string())),
    }
}

/// Create a user and return it with its generated ID.
pub fn create_user(name: &str, password_hash: &str, connection: &Connection) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (name, password_hash) VALUES (?1, ?2);",
        (name, password_hash),
    )?;

    let id = UserId::new(connection.last_insert_rowid());

    Ok(User {
        id,
        name: name.to_owned(),
        password_hash: password_hash.to_owned(),
    })
}

/// Retrieve a single user by ID.
pub fn get_user_by_id(user_id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, password_hash FROM user WHERE id = :id;")?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Retrieve a single user by their unique login name.
pub fn get_user_by_name(name: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, password_hash FROM user WHERE name = :name;")?
        .query_row(&[(":name", &name)], map_row)
        .map_err(|error| error.into())
}

/// Get the total number of users in the database.
pub fn count_users(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Initialize the user table.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: UserId::new(row.get(0)?),
        name: row.get(1)?,
        password_hash: row.get(2)?,
    })
}


#[cfg(test)]
mod password_tests {
    use crate::Error;

    use super::{hash_password, verify_password};

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("123456").expect("Could not hash password");

        assert!(verify_password("123456", &hash).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("123456").expect("Could not hash password");

        assert_eq!(
            verify_password("hunter2", &hash),
            Err(Error::InvalidCredentials)
        );
    }
}
