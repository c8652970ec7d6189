//! Defines the endpoints for recording new income and expenses.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
// axum_extra's Form parses an empty field as None, so a blank amount can be
// answered with an alert instead of a plain-text rejection.
use axum_extra::extract::Form;
use maud::html;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::Username,
    timezone::local_today,
    transaction::{
        Transaction, TransactionBuilder, TransactionKind, core::create_transaction,
        create_page::transaction_form,
    },
};

/// The state needed to record income or an expense.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for recording income.
#[derive(Debug, Serialize, Deserialize)]
pub struct IncomeForm {
    /// The date the money was earned.
    pub date: Date,
    /// Where the money came from, e.g. "Salary".
    pub source: String,
    /// The amount earned in dollars.
    pub amount: Option<f64>,
}

/// The form data for recording an expense.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// The date the money was spent.
    pub date: Date,
    /// One of the expense categories, e.g. "Rent".
    pub category: String,
    /// The amount spent in dollars.
    pub amount: Option<f64>,
}

/// A route handler for recording income for the logged-in user.
///
/// Responds with a success alert and a fresh form.
pub async fn create_income_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(username): Extension<Username>,
    Form(form): Form<IncomeForm>,
) -> Response {
    let Some(amount) = form.amount else {
        tracing::warn!("rejected income for {username} with no amount");
        return Error::MissingAmount.into_alert_response();
    };
    let builder = Transaction::build(form.date, &form.source, amount);

    create_transaction_endpoint(TransactionKind::Income, state, &username, builder)
}

/// A route handler for recording an expense for the logged-in user.
///
/// Responds with a success alert and a fresh form.
pub async fn create_expense_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(username): Extension<Username>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let Some(amount) = form.amount else {
        tracing::warn!("rejected expense for {username} with no amount");
        return Error::MissingAmount.into_alert_response();
    };
    let builder = Transaction::build(form.date, &form.category, amount);

    create_transaction_endpoint(TransactionKind::Expense, state, &username, builder)
}

fn create_transaction_endpoint(
    kind: TransactionKind,
    state: CreateTransactionState,
    username: &Username,
    builder: TransactionBuilder,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("Invalid timezone {}", state.local_timezone);
            return error.into_alert_response();
        }
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => create_transaction(kind, username, builder, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let transaction = match result {
        Ok(transaction) => transaction,
        Err(error) => {
            tracing::warn!("could not create {kind:?} for {username}: {error}");
            return error.into_alert_response();
        }
    };

    tracing::debug!("created {kind:?} {} for {username}", transaction.id);

    let message = match kind {
        TransactionKind::Income => "Income added successfully!",
        TransactionKind::Expense => "Expense added successfully!",
    };

    html! {
        (Alert::SuccessSimple { message: message.to_owned() }.into_html())
        (transaction_form(kind, today))
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use axum_extra::extract::Form;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        auth::Username,
        test_utils::{get_test_connection, parse_html_fragment},
        transaction::{TransactionKind, get_transactions},
    };

    use super::{
        CreateTransactionState, ExpenseForm, IncomeForm, create_expense_endpoint,
        create_income_endpoint,
    };

    fn get_state() -> CreateTransactionState {
        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn alice() -> Username {
        Username::new_unchecked("alice")
    }

    #[tokio::test]
    async fn can_create_income() {
        let state = get_state();
        let form = IncomeForm {
            date: date!(2024 - 01 - 15),
            source: "Salary".to_owned(),
            amount: Some(3000.0),
        };

        let response =
            create_income_endpoint(State(state.clone()), Extension(alice()), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_alert_text(response, "Income added successfully!").await;

        let connection = state.db_connection.lock().unwrap();
        let income = get_transactions(TransactionKind::Income, &alice(), &connection).unwrap();
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].date, date!(2024 - 01 - 15));
        assert_eq!(income[0].label, "Salary");
        assert_eq!(income[0].amount, 3000.0);
    }

    #[tokio::test]
    async fn can_create_expense() {
        let state = get_state();
        let form = ExpenseForm {
            date: date!(2024 - 01 - 20),
            category: "Rent".to_owned(),
            amount: Some(1200.0),
        };

        let response =
            create_expense_endpoint(State(state.clone()), Extension(alice()), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_alert_text(response, "Expense added successfully!").await;

        let connection = state.db_connection.lock().unwrap();
        let expenses = get_transactions(TransactionKind::Expense, &alice(), &connection).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].label, "Rent");
        assert_eq!(expenses[0].amount, 1200.0);
    }

    #[tokio::test]
    async fn response_contains_fresh_form() {
        let form = IncomeForm {
            date: date!(2024 - 01 - 15),
            source: "Salary".to_owned(),
            amount: Some(3000.0),
        };

        let response = create_income_endpoint(State(get_state()), Extension(alice()), Form(form))
            .await
            .into_response();

        let fragment = parse_html_fragment(response).await;
        let forms = fragment
            .select(&Selector::parse("form").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(forms.len(), 1, "want 1 form, got {}", forms.len());

        let source = fragment
            .select(&Selector::parse("input[name=source]").unwrap())
            .next()
            .expect("No source input found");
        assert_eq!(source.value().attr("value"), None, "want an empty source input");
    }

    #[tokio::test]
    async fn negative_amount_is_rejected() {
        let state = get_state();
        let form = IncomeForm {
            date: date!(2024 - 01 - 15),
            source: "Refund".to_owned(),
            amount: Some(-5.0),
        };

        let response =
            create_income_endpoint(State(state.clone()), Extension(alice()), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        let income = get_transactions(TransactionKind::Income, &alice(), &connection).unwrap();
        assert!(income.is_empty(), "want no income stored, got {income:?}");
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let state = get_state();
        let form = ExpenseForm {
            date: date!(2024 - 01 - 20),
            category: "Holidays".to_owned(),
            amount: Some(500.0),
        };

        let response =
            create_expense_endpoint(State(state.clone()), Extension(alice()), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        let expenses = get_transactions(TransactionKind::Expense, &alice(), &connection).unwrap();
        assert!(expenses.is_empty(), "want no expenses stored, got {expenses:?}");
    }

    #[test]
    fn form_parses_html_date() {
        let form: ExpenseForm =
            serde_html_form::from_str("date=2024-01-20&category=Food&amount=12.50").unwrap();

        assert_eq!(form.date, date!(2024 - 01 - 20));
        assert_eq!(form.category, "Food");
        assert_eq!(form.amount, Some(12.5));
    }

    #[test]
    fn blank_amount_parses_as_none() {
        let form: IncomeForm =
            serde_html_form::from_str("date=2024-01-15&source=Salary&amount=").unwrap();

        assert_eq!(form.amount, None);
    }

    #[tokio::test]
    async fn missing_amount_is_rejected_with_alert() {
        let state = get_state();
        let form: ExpenseForm =
            serde_html_form::from_str("date=2024-01-20&category=Food&amount=").unwrap();

        let response =
            create_expense_endpoint(State(state.clone()), Extension(alice()), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_alert_text(response, "Missing amount").await;
        let connection = state.db_connection.lock().unwrap();
        let expenses = get_transactions(TransactionKind::Expense, &alice(), &connection).unwrap();
        assert!(expenses.is_empty(), "want no expenses stored, got {expenses:?}");
    }

    async fn assert_alert_text(response: Response, want: &str) {
        let fragment = parse_html_fragment(response).await;
        let alert = fragment
            .select(&Selector::parse("div[role=alert] span").unwrap())
            .next()
            .expect("No alert found");
        let text = alert.text().collect::<String>();
        assert_eq!(text.trim(), want);
    }
}
