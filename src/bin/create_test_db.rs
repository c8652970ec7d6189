use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month};

use pennywise_rs::{
    ExpenseCategory, Transaction, TransactionKind, Username, create_transaction, initialize_db,
    register_user,
};

/// A utility for creating a test database for the web server of pennywise_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user 'test' with password 'test'...");
    let user = register_user(Username::new("test")?, "test", &conn)?;

    println!("Adding sample income and expenses...");
    for month in [Month::January, Month::February, Month::March] {
        let payday = Date::from_calendar_date(2024, month, 15)?;
        let rent_day = Date::from_calendar_date(2024, month, 1)?;
        let shopping_day = Date::from_calendar_date(2024, month, 20)?;

        create_transaction(
            TransactionKind::Income,
            &user.username,
            Transaction::build(payday, "Salary", 3000.0),
            &conn,
        )?;
        create_transaction(
            TransactionKind::Expense,
            &user.username,
            Transaction::build(rent_day, ExpenseCategory::Rent.as_str(), 1200.0),
            &conn,
        )?;
        create_transaction(
            TransactionKind::Expense,
            &user.username,
            Transaction::build(shopping_day, ExpenseCategory::Food.as_str(), 350.0),
            &conn,
        )?;
        create_transaction(
            TransactionKind::Expense,
            &user.username,
            Transaction::build(shopping_day, ExpenseCategory::Transport.as_str(), 80.0),
            &conn,
        )?;
    }

    create_transaction(
        TransactionKind::Income,
        &user.username,
        Transaction::build(
            Date::from_calendar_date(2024, Month::February, 28)?,
            "Freelance",
            450.0,
        ),
        &conn,
    )?;

    println!("Success!");

    Ok(())
}
