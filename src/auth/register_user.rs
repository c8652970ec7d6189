//! The sign-up page for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{Username, register_user},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, base, loading_spinner, log_in_register, password_input,
        username_input,
    },
};

/// Shown when someone tries to sign up with a name that is taken.
pub const DUPLICATE_USERNAME_ERROR_MSG: &str = "Username already exists";

fn registration_form(
    username: &str,
    username_error_message: Option<&str>,
    password_error_message: Option<&str>,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, username_error_message))
            (password_input(password_error_message))

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Sign up"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a
                    href=(endpoints::LOG_IN_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", None, None);
    let content = log_in_register("Create Account", &registration_form);
    base("Sign Up", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the sign-up form.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

/// Handler for sign-up requests.
///
/// On success the client is redirected to the log-in page, otherwise the form
/// is returned with an error message next to the offending field.
pub async fn post_register(
    State(state): State<RegistrationState>,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let username = match Username::new(&user_data.username) {
        Ok(username) => username,
        Err(error) => {
            return registration_form(&user_data.username, Some(&error_message(&error)), None)
                .into_response();
        }
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => register_user(username.clone(), &user_data.password, &connection),
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok(user) => {
            tracing::info!("Registered new user {}", user.username);
            (
                HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ Error::DuplicateUsername) => {
            registration_form(username.as_ref(), Some(&error_message(&error)), None)
                .into_response()
        }
        Err(error @ Error::EmptyPassword) => {
            registration_form(username.as_ref(), None, Some(&error_message(&error)))
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {error}");
            (
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
                .into_response()
        }
    }
}

fn error_message(error: &Error) -> String {
    match error {
        Error::DuplicateUsername => DUPLICATE_USERNAME_ERROR_MSG.to_owned(),
        Error::EmptyUsername => "Username cannot be empty".to_owned(),
        Error::EmptyPassword => "Password cannot be empty".to_owned(),
        error => error.to_string(),
    }
}
