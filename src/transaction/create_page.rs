//! Defines the route handlers for the pages for recording new income and expenses.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles, loading_spinner,
    },
    navigation::NavBar,
    timezone::local_today,
    transaction::{ExpenseCategory, TransactionKind},
};

/// The ID of the element the form lives in, replaced with a fresh form after each submission.
const FORM_CONTAINER_ID: &str = "transaction-form-container";

fn label_input(kind: TransactionKind) -> Markup {
    match kind {
        TransactionKind::Income => html! {
            div
            {
                label
                    for="source"
                    class=(FORM_LABEL_STYLE)
                {
                    "Source"
                }

                input
                    name="source"
                    id="source"
                    type="text"
                    placeholder="Salary"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        },
        TransactionKind::Expense => html! {
            div
            {
                label
                    for="category"
                    class=(FORM_LABEL_STYLE)
                {
                    "Category"
                }

                select
                    name="category"
                    id="category"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in ExpenseCategory::ALL {
                        option value=(category) { (category) }
                    }
                }
            }
        },
    }
}

/// The form for recording income or an expense, with the date set to `today`.
pub(super) fn transaction_form(kind: TransactionKind, today: Date) -> Markup {
    let (endpoint, title) = match kind {
        TransactionKind::Income => (endpoints::INCOME_API, "Add Income"),
        TransactionKind::Expense => (endpoints::EXPENSES_API, "Add Expense"),
    };

    html! {
        form
            hx-post=(endpoint)
            hx-target=(format!("#{FORM_CONTAINER_ID}"))
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { (title) }

            div
            {
                label
                    for="date"
                    class=(FORM_LABEL_STYLE)
                {
                    "Date"
                }

                input
                    name="date"
                    id="date"
                    type="date"
                    required
                    value=(today)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (label_input(kind))

            div
            {
                label
                    for="amount"
                    class=(FORM_LABEL_STYLE)
                {
                    "Amount"
                }

                // w-full needed to ensure input takes the full width when prefilled with a value
                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        min="0"
                        step="0.01"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span
                    id="indicator"
                    class="inline htmx-indicator"
                {
                    (loading_spinner())
                }
                " " (title)
            }
        }
    }
}

fn new_transaction_view(kind: TransactionKind, today: Date) -> Markup {
    let (active_endpoint, title) = match kind {
        TransactionKind::Income => (endpoints::NEW_INCOME_VIEW, "Add Income"),
        TransactionKind::Expense => (endpoints::NEW_EXPENSE_VIEW, "Add Expense"),
    };
    let nav_bar = NavBar::new(active_endpoint).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div id=(FORM_CONTAINER_ID) class="w-full"
            {
                (transaction_form(kind, today))
            }
        }
    };

    base(title, &[dollar_input_styles()], &content)
}

/// The state needed for the pages for recording income and expenses.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn get_new_transaction_page(
    kind: TransactionKind,
    state: NewTransactionPageState,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .inspect_err(|_| tracing::error!("Invalid timezone {}", state.local_timezone))?;

    Ok(new_transaction_view(kind, today).into_response())
}

/// Renders the page for recording income.
pub async fn get_new_income_page(
    State(state): State<NewTransactionPageState>,
) -> Result<Response, Error> {
    get_new_transaction_page(TransactionKind::Income, state)
}

/// Renders the page for recording an expense.
pub async fn get_new_expense_page(
    State(state): State<NewTransactionPageState>,
) -> Result<Response, Error> {
    get_new_transaction_page(TransactionKind::Expense, state)
}
