//! Sets up the application database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{auth::create_user_table, transaction::create_transaction_tables};

/// Create the tables for the credential store and the transaction store.
///
/// All tables are created inside one exclusive transaction, so either all of
/// them exist afterwards or none of the statements took effect.
/// Calling this function on an already initialized database is a no-op.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_tables(&transaction)?;

    transaction.commit()
}
