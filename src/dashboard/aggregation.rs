//! Aggregation of income and expenses for the dashboard.
//!
//! Every function here is a pure computation over transactions that have
//! already been loaded from the database.

use std::collections::{BTreeMap, HashMap};

use time::Date;

use crate::transaction::Transaction;

/// The sums shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    /// The sum of all income.
    pub income: f64,
    /// The sum of all expenses.
    pub expenses: f64,
    /// Income minus expenses, negative when spending more than earning.
    pub net_savings: f64,
}

/// The total spent in one expense category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The expense category, e.g. "Rent".
    pub label: String,
    /// The sum of the expenses in the category.
    pub total: f64,
}

/// Income and expenses for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTotal {
    /// The first day of the month.
    pub month: Date,
    /// The sum of the income dated in the month.
    pub income: f64,
    /// The sum of the expenses dated in the month.
    pub expenses: f64,
}

fn sum(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .map(|transaction| transaction.amount)
        .sum()
}

/// Sum `income` and `expense`, and the difference between the two.
///
/// Empty slices sum to zero.
pub fn totals(income: &[Transaction], expense: &[Transaction]) -> Totals {
    let income = sum(income);
    let expenses = sum(expense);

    Totals {
        income,
        expenses,
        net_savings: income - expenses,
    }
}

/// Sum expenses by category.
///
/// The result is sorted by total, largest first, and then by category name
/// so that ties always come out in the same order.
pub fn by_category(expense: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in expense {
        *totals.entry(transaction.label.as_str()).or_insert(0.0) += transaction.amount;
    }

    let mut totals = totals
        .into_iter()
        .map(|(label, total)| CategoryTotal {
            label: label.to_owned(),
            total,
        })
        .collect::<Vec<_>>();

    totals.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.label.cmp(&b.label)));

    totals
}

fn first_of_month(date: Date) -> Date {
    // Every month has a first day.
    date.replace_day(1).unwrap_or(date)
}

/// Sum income and expenses by calendar month.
///
/// Covers every month that has either income or expenses, oldest first. A
/// month with only one kind of transaction has zero for the other.
pub fn monthly_trend(income: &[Transaction], expense: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<Date, (f64, f64)> = BTreeMap::new();

    for transaction in income {
        months.entry(first_of_month(transaction.date)).or_default().0 += transaction.amount;
    }

    for transaction in expense {
        months.entry(first_of_month(transaction.date)).or_default().1 += transaction.amount;
    }

    months
        .into_iter()
        .map(|(month, (income, expenses))| MonthlyTotal {
            month,
            income,
            expenses,
        })
        .collect()
}

/// Keep the transactions whose label contains `query`, ignoring case.
///
/// Surrounding whitespace in `query` is ignored and a blank query keeps
/// everything.
pub fn search(transactions: &[Transaction], query: &str) -> Vec<Transaction> {
    let query = query.trim().to_lowercase();

    if query.is_empty() {
        return transactions.to_vec();
    }

    transactions
        .iter()
        .filter(|transaction| transaction.label.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// The `count` most recent transactions, newest first.
///
/// Transactions on the same day are ordered by ID, most recently added first.
pub fn latest(transactions: &[Transaction], count: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    sorted.truncate(count);

    sorted
}
