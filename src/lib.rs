//! Pennywise is a web app for tracking personal income and expenses.
//!
//! This library provides a REST API that directly serves HTML pages. The
//! persistence and reporting core is made of three parts:
//! - the credential store ([register_user], [verify_credentials]),
//! - the transaction store ([create_transaction], [get_transactions], [delete_transaction]),
//! - the aggregation engine ([totals], [by_category], [monthly_trend], [search], [suggest]).

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rusqlite::ffi;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use auth::{PasswordHash, User, Username, get_user, register_user, verify_credentials};
pub use dashboard::{
    Advice, CategoryCut, CategoryTotal, MonthlyTotal, Suggestion, Totals, by_category, latest,
    monthly_trend, search, suggest, totals,
};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    ExpenseCategory, Transaction, TransactionBuilder, TransactionId, TransactionKind,
    create_transaction, delete_transaction, get_transactions, transactions_to_csv, write_csv,
};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username is already taken by another user.
    #[error("the username already exists")]
    DuplicateUsername,

    /// The username does not exist or the password does not match.
    ///
    /// Both cases share one variant so that clients cannot tell which
    /// usernames are registered.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// An empty string was used to create a username.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// An empty string was used as a password during registration.
    #[error("password cannot be empty")]
    EmptyPassword,

    /// A negative, infinite or NaN amount was used to create a transaction.
    #[error("{0} is not a valid amount, amounts must be zero or more")]
    NegativeAmount(f64),

    /// A transaction form was submitted without an amount.
    #[error("an amount is required")]
    MissingAmount,

    /// An expense was created with a category outside the fixed set.
    #[error("\"{0}\" is not a valid expense category")]
    InvalidCategory(String),

    /// The session cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the session token or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The CSV writer could not serialize the transactions.
    #[error("could not export transactions as CSV: {0}")]
    ExportError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // A text primary key reports a PRIMARYKEY violation, a UNIQUE index reports UNIQUE.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if (sql_error.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || sql_error.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE)
                    && desc.ends_with("users.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::NegativeAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!("{amount} is not a valid amount. Enter zero or more."),
                },
            ),
            Error::MissingAmount => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Missing amount".to_owned(),
                    details: "Enter an amount of zero or more.".to_owned(),
                },
            ),
            Error::InvalidCategory(category) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid category".to_owned(),
                    details: format!(
                        "\"{category}\" is not an expense category. \
                        Choose one of the categories in the list."
                    ),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::ExportError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Export failed".to_owned(),
                    details: "Could not create the CSV file, check the server logs for more details."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
