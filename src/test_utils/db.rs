use rusqlite::Connection;

use crate::{AppState, db::initialize};

/// An in-memory database with all the tables created.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// App state backed by an in-memory database, using UTC as the local timezone.
pub(crate) fn get_test_state() -> AppState {
    AppState::new(
        Connection::open_in_memory().expect("Could not open in-memory SQLite database"),
        "foobar",
        "Etc/UTC",
    )
    .expect("Could not create app state")
}
