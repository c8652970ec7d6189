//! Cards for the income, expense and savings totals at the top of the dashboard.

use maud::{Markup, html};

use crate::{dashboard::aggregation::Totals, html::format_currency};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-2";
const CARD_GREEN_STYLE: &str = "text-2xl font-bold text-green-600 dark:text-green-400";
const CARD_RED_STYLE: &str = "text-2xl font-bold text-red-600 dark:text-red-400";

fn card(id: &str, title: &str, amount: f64, amount_style: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            span class="text-sm text-gray-600 dark:text-gray-400" { (title) }
            span class=(amount_style) { (format_currency(amount)) }
        }
    }
}

/// Renders the total income, total expenses and net savings.
pub(super) fn totals_view(totals: Totals) -> Markup {
    let savings_style = if totals.net_savings >= 0.0 {
        CARD_GREEN_STYLE
    } else {
        CARD_RED_STYLE
    };

    html! {
        section id="totals" class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                (card("total-income", "Total Income", totals.income, CARD_GREEN_STYLE))
                (card("total-expenses", "Total Expenses", totals.expenses, CARD_RED_STYLE))
                (card("net-savings", "Net Savings", totals.net_savings, savings_style))
            }
        }
    }
}
