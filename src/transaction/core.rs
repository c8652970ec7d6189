//! Defines the core data models and database queries for income and expenses.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, auth::Username};

// ============================================================================
// MODELS
// ============================================================================

/// The database ID of an income or expense record.
pub type TransactionId = i64;

/// Whether a transaction is money earned or money spent.
///
/// Income and expenses live in separate tables with the same shape, so every
/// store function takes the kind to pick the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, labelled by its source, e.g. "Salary".
    Income,
    /// Money spent, labelled by its [ExpenseCategory].
    Expense,
}

impl TransactionKind {
    fn table(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expenses",
        }
    }

    /// The name of the column holding the label, also used as the CSV header.
    pub fn label_column(self) -> &'static str {
        match self {
            TransactionKind::Income => "source",
            TransactionKind::Expense => "category",
        }
    }
}

/// The fixed set of categories an expense can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    /// Rent or mortgage payments.
    Rent,
    /// Groceries and eating out.
    Food,
    /// Fuel, fares and vehicle costs.
    Transport,
    /// Power, water, internet and phone bills.
    Utilities,
    /// Anything else.
    Other,
}

impl ExpenseCategory {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Rent,
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Utilities,
        ExpenseCategory::Other,
    ];

    /// The name stored in the database and shown to the user.
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::InvalidCategory(s.to_owned()))
    }
}

impl Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single income or expense record.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, unique within its table.
    pub id: TransactionId,
    /// When the money was earned or spent.
    pub date: Date,
    /// The source for income, the category for expenses.
    pub label: String,
    /// The amount of money earned or spent, never negative.
    pub amount: f64,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(date: Date, label: &str, amount: f64) -> TransactionBuilder {
        TransactionBuilder {
            date,
            label: label.to_owned(),
            amount,
        }
    }
}

/// The fields of a [Transaction] before it has been stored and given an ID.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The date when the money moved.
    pub date: Date,

    /// The source for income (free text), or the category for expenses (one
    /// of [ExpenseCategory]).
    pub label: String,

    /// The amount in dollars. Must be zero or more.
    pub amount: f64,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the income and expense tables.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn create_transaction_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    for kind in [TransactionKind::Income, TransactionKind::Expense] {
        let table = kind.table();
        let label_column = kind.label_column();

        connection.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT NOT NULL,
                    date TEXT NOT NULL,
                    {label_column} TEXT NOT NULL,
                    amount REAL NOT NULL
                    )"
            ),
            (),
        )?;

        connection.execute(
            &format!("CREATE INDEX IF NOT EXISTS idx_{table}_username ON {table}(username);"),
            (),
        )?;
    }

    Ok(())
}

/// Store a new income or expense record for `owner` and return it with its new ID.
///
/// Expense labels are checked against [ExpenseCategory], income sources are
/// stored as given (minus surrounding whitespace).
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative, infinite or NaN,
/// - or [Error::InvalidCategory] if an expense label is not an [ExpenseCategory],
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    kind: TransactionKind,
    owner: &Username,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if !builder.amount.is_finite() || builder.amount < 0.0 {
        return Err(Error::NegativeAmount(builder.amount));
    }

    let label = builder.label.trim();

    if kind == TransactionKind::Expense {
        label.parse::<ExpenseCategory>()?;
    }

    let table = kind.table();
    let label_column = kind.label_column();

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO {table} (username, date, {label_column}, amount)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, date, {label_column}, amount"
        ))?
        .query_row(
            (owner.as_ref(), builder.date, label, builder.amount),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get all of `owner`'s income or expenses in the order they were added.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    kind: TransactionKind,
    owner: &Username,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let table = kind.table();
    let label_column = kind.label_column();

    connection
        .prepare(&format!(
            "SELECT id, date, {label_column}, amount FROM {table}
             WHERE username = :username
             ORDER BY id ASC"
        ))?
        .query_map(&[(":username", owner.as_ref())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

type RowsAffected = usize;

/// Delete `owner`'s income or expense record with `id`.
///
/// Deleting a record that does not exist, or that belongs to someone else,
/// does nothing and is not an error.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(
    kind: TransactionKind,
    id: TransactionId,
    owner: &Username,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    let table = kind.table();

    connection
        .execute(
            &format!("DELETE FROM {table} WHERE id = ?1 AND username = ?2"),
            (id, owner.as_ref()),
        )
        .map_err(|err| err.into())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let label = row.get(2)?;
    let amount = row.get(3)?;

    Ok(Transaction {
        id,
        date,
        label,
        amount,
    })
}

// ============================================================================
// TESTS
// ============================================================================
