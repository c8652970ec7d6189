use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::Username,
    transaction::{TransactionId, TransactionKind, core::delete_transaction},
};

/// The state needed to delete income or an expense.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting one of the logged-in user's income records.
pub async fn delete_income_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(username): Extension<Username>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    delete_transaction_endpoint(TransactionKind::Income, state, &username, transaction_id)
}

/// A route handler for deleting one of the logged-in user's expenses.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(username): Extension<Username>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    delete_transaction_endpoint(TransactionKind::Expense, state, &username, transaction_id)
}

/// Responds with an empty body on success, even if nothing was deleted, so
/// that HTMX removes the table row.
fn delete_transaction_endpoint(
    kind: TransactionKind,
    state: DeleteTransactionState,
    username: &Username,
    transaction_id: TransactionId,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => delete_transaction(kind, transaction_id, username, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok(0) => {
            tracing::debug!("{kind:?} {transaction_id} was already gone for {username}");
            StatusCode::OK.into_response()
        }
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(_) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("Could not delete {kind:?} {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        auth::Username,
        test_utils::get_test_connection,
        transaction::{Transaction, TransactionKind, create_transaction, get_transactions},
    };

    use super::{DeleteTransactionState, delete_expense_endpoint, delete_income_endpoint};

    fn get_state() -> DeleteTransactionState {
        DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        }
    }

    #[tokio::test]
    async fn deletes_expense() {
        let state = get_state();
        let alice = Username::new_unchecked("alice");
        let expense = create_transaction(
            TransactionKind::Expense,
            &alice,
            Transaction::build(date!(2024 - 01 - 20), "Rent", 1200.0),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_expense_endpoint(
            State(state.clone()),
            Extension(alice.clone()),
            Path(expense.id),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty(), "want empty body, got {body:?}");
        let expenses = get_transactions(
            TransactionKind::Expense,
            &alice,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert!(expenses.is_empty());
    }

    #[tokio::test]
    async fn deleting_unknown_id_is_ok() {
        let response = delete_income_endpoint(
            State(get_state()),
            Extension(Username::new_unchecked("alice")),
            Path(1337),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cannot_delete_other_users_income() {
        let state = get_state();
        let alice = Username::new_unchecked("alice");
        let income = create_transaction(
            TransactionKind::Income,
            &alice,
            Transaction::build(date!(2024 - 01 - 15), "Salary", 3000.0),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_income_endpoint(
            State(state.clone()),
            Extension(Username::new_unchecked("mallory")),
            Path(income.id),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let remaining = get_transactions(
            TransactionKind::Income,
            &alice,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert_eq!(remaining, vec![income]);
    }
}
