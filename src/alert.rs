//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered either inline (e.g., the saving suggestion on the
//! dashboard) or as HTMX responses that get swapped into `#alert-container`.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

const SUCCESS_STYLE: &str = "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
    border-l-4 border-green-500 dark:bg-gray-800 dark:text-green-400";
const INFO_STYLE: &str = "p-4 mb-4 text-sm text-blue-800 rounded-lg bg-blue-50 \
    border-l-4 border-blue-500 dark:bg-gray-800 dark:text-blue-400";
const WARNING_STYLE: &str = "p-4 mb-4 text-sm text-yellow-800 rounded-lg bg-yellow-50 \
    border-l-4 border-yellow-500 dark:bg-gray-800 dark:text-yellow-300";
const ERROR_STYLE: &str = "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
    border-l-4 border-red-500 dark:bg-gray-800 dark:text-red-400";

/// A message for the user, styled by its severity.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something worked.
    SuccessSimple { message: String },
    /// Neutral information.
    Info { message: String },
    /// Something the user should pay attention to.
    Warning { message: String },
    /// Something failed, with instructions for the user.
    Error { message: String, details: String },
}

impl Alert {
    fn style(&self) -> &'static str {
        match self {
            Alert::SuccessSimple { .. } => SUCCESS_STYLE,
            Alert::Info { .. } => INFO_STYLE,
            Alert::Warning { .. } => WARNING_STYLE,
            Alert::Error { .. } => ERROR_STYLE,
        }
    }

    /// Render the alert as a `div` with `role="alert"`.
    pub fn into_html(self) -> Markup {
        let style = self.style();

        let (message, details) = match self {
            Alert::Error { message, details } => (message, Some(details)),
            Alert::SuccessSimple { message }
            | Alert::Info { message }
            | Alert::Warning { message } => (message, None),
        };

        html! {
            div class=(style) role="alert"
            {
                span class="font-medium" { (message) }

                @if let Some(details) = details {
                    @if !details.is_empty() {
                        p { (details) }
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}
