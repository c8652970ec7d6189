//! Tables of the most recent income and expenses on the dashboard.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    transaction::{Transaction, TransactionKind},
};

/// How many rows each of the recent transaction tables shows.
pub(super) const LATEST_COUNT: usize = 5;

fn table_row(kind: TransactionKind, transaction: &Transaction) -> Markup {
    let delete_url = match kind {
        TransactionKind::Income => format_endpoint(endpoints::INCOME, transaction.id),
        TransactionKind::Expense => format_endpoint(endpoints::EXPENSE, transaction.id),
    };

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.label) }
            td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(transaction.amount)) }

            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(delete_url)
                    hx-confirm={
                        "Are you sure you want to delete '" (transaction.label) "' on "
                        (transaction.date) "?"
                    }
                    hx-target="closest tr"
                    hx-target-error="#alert-container"
                    hx-swap="delete"
                    class=(BUTTON_DELETE_STYLE)
                {
                   "Delete"
                }
            }
        }
    )
}

/// Renders up to [LATEST_COUNT] of `transactions`, which should already be
/// sorted newest first, with a delete button on each row.
pub(super) fn latest_table(kind: TransactionKind, transactions: &[Transaction]) -> Markup {
    let (table_id, title, label_header, new_url, empty_message) = match kind {
        TransactionKind::Income => (
            "latest-income",
            "Latest Income",
            "Source",
            endpoints::NEW_INCOME_VIEW,
            "No income to show. ",
        ),
        TransactionKind::Expense => (
            "latest-expenses",
            "Latest Expenses",
            "Category",
            endpoints::NEW_EXPENSE_VIEW,
            "No expenses to show. ",
        ),
    };

    html!(
        div class="dark:bg-gray-800"
        {
            h3 class="text-lg font-semibold mb-2" { (title) }

            table id=(table_id) class="w-full text-sm text-left rtl:text-right
                text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { (label_header) }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for transaction in transactions.iter().take(LATEST_COUNT) {
                        (table_row(kind, transaction))
                    }

                    @if transactions.is_empty() {
                        tr
                        {
                            td
                                colspan="4"
                                class="px-6 py-4 text-center
                                    text-gray-500 dark:text-gray-400"
                            {
                                (empty_message)
                                a href=(new_url) class=(LINK_STYLE)
                                {
                                    "Add one"
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}
