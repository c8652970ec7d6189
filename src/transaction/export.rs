//! CSV export of income and expenses.

use std::{
    io::Write,
    sync::{Arc, Mutex},
};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use csv::WriterBuilder;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::Username,
    dashboard::search,
    transaction::{Transaction, TransactionKind, core::get_transactions},
};

/// Write `transactions` as CSV with a header row.
///
/// The columns are `id`, `date`, the label column for `kind` (`source` or
/// `category`) and `amount`. Dates are written as `YYYY-MM-DD` and amounts
/// with two decimal places.
///
/// # Errors
/// Returns [Error::ExportError] if a record cannot be written to `writer`.
pub fn write_csv(
    transactions: &[Transaction],
    kind: TransactionKind,
    writer: impl Write,
) -> Result<(), Error> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    writer
        .write_record(["id", "date", kind.label_column(), "amount"])
        .map_err(|error| Error::ExportError(error.to_string()))?;

    for transaction in transactions {
        writer
            .write_record([
                transaction.id.to_string(),
                transaction.date.to_string(),
                transaction.label.clone(),
                format!("{:.2}", transaction.amount),
            ])
            .map_err(|error| Error::ExportError(error.to_string()))?;
    }

    writer
        .flush()
        .map_err(|error| Error::ExportError(error.to_string()))
}

/// Render `transactions` as a CSV string, see [write_csv].
///
/// # Errors
/// Returns [Error::ExportError] if the CSV could not be written.
pub fn transactions_to_csv(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> Result<String, Error> {
    let mut buffer = Vec::new();
    write_csv(transactions, kind, &mut buffer)?;

    String::from_utf8(buffer).map_err(|error| Error::ExportError(error.to_string()))
}

/// The state needed to export income and expenses.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string of an export request.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// Only export records whose source or category contains this text.
    pub q: Option<String>,
}

/// Download the logged-in user's income as a CSV file.
pub async fn export_income_endpoint(
    State(state): State<ExportState>,
    Extension(username): Extension<Username>,
    Query(query): Query<ExportQuery>,
) -> Response {
    export_endpoint(TransactionKind::Income, state, &username, query)
}

/// Download the logged-in user's expenses as a CSV file.
pub async fn export_expenses_endpoint(
    State(state): State<ExportState>,
    Extension(username): Extension<Username>,
    Query(query): Query<ExportQuery>,
) -> Response {
    export_endpoint(TransactionKind::Expense, state, &username, query)
}

fn export_endpoint(
    kind: TransactionKind,
    state: ExportState,
    username: &Username,
    query: ExportQuery,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => get_transactions(kind, username, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let transactions = match result {
        Ok(transactions) => transactions,
        Err(error) => {
            tracing::error!("could not load {kind:?} for export: {error}");
            return error.into_alert_response();
        }
    };

    let query = query.q.unwrap_or_default();
    let is_filtered = !query.trim().is_empty();
    let transactions = search(&transactions, &query);

    let body = match transactions_to_csv(&transactions, kind) {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not export {kind:?}: {error}");
            return error.into_alert_response();
        }
    };

    (
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name(kind, is_filtered)),
            ),
        ],
        body,
    )
        .into_response()
}

fn file_name(kind: TransactionKind, is_filtered: bool) -> &'static str {
    match (kind, is_filtered) {
        (TransactionKind::Income, false) => "income.csv",
        (TransactionKind::Income, true) => "filtered_income.csv",
        (TransactionKind::Expense, false) => "expenses.csv",
        (TransactionKind::Expense, true) => "filtered_expenses.csv",
    }
}

#[cfg(test)]
mod csv_tests {
    use time::macros::date;

    use crate::transaction::{Transaction, TransactionKind};

    use super::transactions_to_csv;

    #[test]
    fn single_income_row_has_header_and_one_line() {
        let income = vec![Transaction {
            id: 1,
            date: date!(2024 - 01 - 15),
            label: "Salary".to_owned(),
            amount: 3000.0,
        }];

        let csv = transactions_to_csv(&income, TransactionKind::Income).unwrap();

        assert_eq!(csv, "id,date,source,amount\n1,2024-01-15,Salary,3000.00\n");
    }

    #[test]
    fn expenses_use_category_column() {
        let expenses = vec![
            Transaction {
                id: 3,
                date: date!(2024 - 01 - 20),
                label: "Rent".to_owned(),
                amount: 1200.0,
            },
            Transaction {
                id: 4,
                date: date!(2024 - 02 - 02),
                label: "Food".to_owned(),
                amount: 12.345,
            },
        ];

        let csv = transactions_to_csv(&expenses, TransactionKind::Expense).unwrap();

        assert_eq!(
            csv,
            "id,date,category,amount\n3,2024-01-20,Rent,1200.00\n4,2024-02-02,Food,12.35\n"
        );
    }

    #[test]
    fn empty_export_is_just_the_header() {
        let csv = transactions_to_csv(&[], TransactionKind::Expense).unwrap();

        assert_eq!(csv, "id,date,category,amount\n");
    }

    #[test]
    fn labels_with_commas_are_quoted() {
        let income = vec![Transaction {
            id: 7,
            date: date!(2024 - 03 - 01),
            label: "Sales, online".to_owned(),
            amount: 10.0,
        }];

        let csv = transactions_to_csv(&income, TransactionKind::Income).unwrap();

        assert_eq!(
            csv,
            "id,date,source,amount\n7,2024-03-01,\"Sales, online\",10.00\n"
        );
    }
}
