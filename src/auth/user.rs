//! The credential store: creating the user table, registering users and
//! checking credentials.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// The unique name a user logs in with.
///
/// Leading and trailing whitespace is removed, and the name cannot be empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Username(String);

impl Username {
    /// Create a username from `raw_username`.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyUsername] if `raw_username` is empty or only whitespace.
    pub fn new(raw_username: &str) -> Result<Self, Error> {
        let trimmed = raw_username.trim();

        if trimmed.is_empty() {
            Err(Error::EmptyUsername)
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    /// Create a username without any validation.
    ///
    /// The caller should ensure that `raw_username` is not empty.
    pub fn new_unchecked(raw_username: &str) -> Self {
        Self(raw_username.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's unique name.
    pub username: Username,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Register a new user with the password `raw_password`.
///
/// Only the hash of the password is stored.
///
/// # Errors
///
/// Returns:
/// - [Error::EmptyPassword] if `raw_password` is empty,
/// - [Error::DuplicateUsername] if `username` is already registered,
/// - [Error::SqlError] if an SQL related error occurred.
pub fn register_user(
    username: Username,
    raw_password: &str,
    connection: &Connection,
) -> Result<User, Error> {
    if raw_password.is_empty() {
        return Err(Error::EmptyPassword);
    }

    let password_hash = PasswordHash::from_raw_password(raw_password);

    connection.execute(
        "INSERT INTO users (username, password) VALUES (?1, ?2)",
        (username.as_ref(), password_hash.as_ref()),
    )?;

    Ok(User {
        username,
        password_hash,
    })
}

/// Check whether `raw_password` is the password of `username`.
///
/// Returns `false` for unknown usernames, the same as for a wrong password.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn verify_credentials(
    username: &Username,
    raw_password: &str,
    connection: &Connection,
) -> Result<bool, Error> {
    let stored_hash: Option<String> = connection
        .query_row(
            "SELECT password FROM users WHERE username = :username",
            &[(":username", username.as_ref())],
            |row| row.get(0),
        )
        .optional()?;

    Ok(stored_hash
        .map(|hash| PasswordHash::new_unchecked(&hash).verify(raw_password))
        .unwrap_or(false))
}

/// Get the user registered as `username`.
///
/// # Errors
///
/// This function will return an error if:
/// - `username` does not belong to a registered user ([Error::NotFound]).
/// - there was an error trying to access the store.
pub fn get_user(username: &Username, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT username, password FROM users WHERE username = :username")?
        .query_row(&[(":username", username.as_ref())], |row| {
            let raw_username: String = row.get(0)?;
            let raw_password_hash: String = row.get(1)?;

            Ok(User {
                username: Username::new_unchecked(&raw_username),
                password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            })
        })
        .map_err(|error| error.into())
}
