//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - State and query types used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::Username,
    dashboard::{
        aggregation::{by_category, latest, monthly_trend, search, totals},
        cards::totals_view,
        charts::{DashboardChart, category_chart, charts_script, charts_view, trend_chart},
        suggestion::{suggest, suggestion_view},
        tables::{LATEST_COUNT, latest_table},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base, link,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionKind, get_transactions},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string of a dashboard request.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Only list income and expenses whose source or category contains this text.
    pub q: Option<String>,
}

/// Display a page with an overview of the logged-in user's income and expenses.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(username): Extension<Username>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let (income, expenses) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let income = get_transactions(TransactionKind::Income, &username, &connection)
            .inspect_err(|error| tracing::error!("could not get income: {error}"))?;
        let expenses = get_transactions(TransactionKind::Expense, &username, &connection)
            .inspect_err(|error| tracing::error!("could not get expenses: {error}"))?;

        (income, expenses)
    };

    let query = query.q.unwrap_or_default();

    Ok(dashboard_view(&income, &expenses, query.trim()).into_response())
}

/// Creates the charts for the data that exists.
///
/// The category chart needs expenses and the trend chart needs income or expenses.
fn build_dashboard_charts(income: &[Transaction], expenses: &[Transaction]) -> Vec<DashboardChart> {
    let mut charts = Vec::new();

    if !expenses.is_empty() {
        charts.push(DashboardChart {
            id: "category-chart",
            options: category_chart(&by_category(expenses)).to_string(),
        });
    }

    if !income.is_empty() || !expenses.is_empty() {
        charts.push(DashboardChart {
            id: "trend-chart",
            options: trend_chart(&monthly_trend(income, expenses)).to_string(),
        });
    }

    charts
}

fn export_url(endpoint: &str, query: &str) -> String {
    if query.is_empty() {
        return endpoint.to_owned();
    }

    match serde_urlencoded::to_string([("q", query)]) {
        Ok(query_string) => format!("{endpoint}?{query_string}"),
        Err(error) => {
            tracing::error!("could not encode search query {query:?}: {error}");
            endpoint.to_owned()
        }
    }
}

fn search_view(query: &str) -> Markup {
    html!(
        section id="search" class="w-full mb-4"
        {
            h2 class="text-xl font-bold mb-2" { "Search Transactions" }

            form
                method="get"
                action=(endpoints::DASHBOARD_VIEW)
                class="flex flex-wrap gap-2 items-center"
            {
                label for="q" class="sr-only" { "Search by source (income) or category (expense)" }

                input
                    type="search"
                    name="q"
                    id="q"
                    value=(query)
                    placeholder="Search by source (income) or category (expense)"
                    class={(FORM_TEXT_INPUT_STYLE) " flex-1"};

                button type="submit" class={(BUTTON_PRIMARY_STYLE) " w-auto"} { "Search" }
            }

            div id="downloads" class="flex flex-wrap gap-4 mt-2 text-sm"
            {
                a href=(endpoints::EXPORT_INCOME) download class=(LINK_STYLE)
                {
                    "Download All Income"
                }

                a href=(endpoints::EXPORT_EXPENSES) download class=(LINK_STYLE)
                {
                    "Download All Expenses"
                }

                @if !query.is_empty() {
                    a href=(export_url(endpoints::EXPORT_INCOME, query)) download class=(LINK_STYLE)
                    {
                        "Download Filtered Income"
                    }

                    a href=(export_url(endpoints::EXPORT_EXPENSES, query)) download class=(LINK_STYLE)
                    {
                        "Download Filtered Expenses"
                    }
                }
            }
        }
    )
}

fn no_data_view() -> Markup {
    let new_income_link = link(endpoints::NEW_INCOME_VIEW, "income");
    let new_expense_link = link(endpoints::NEW_EXPENSE_VIEW, "expenses");

    html!(
        div id="no-data" class="w-full mb-4 text-center"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once you add some "
                (new_income_link) " or " (new_expense_link) "."
            }
        }
    )
}

/// Renders the dashboard for `income` and `expenses`, with the tables of
/// recent transactions filtered by `query`.
fn dashboard_view(income: &[Transaction], expenses: &[Transaction], query: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let totals = totals(income, expenses);
    let suggestion = suggest(totals.income, totals.expenses, expenses);
    let charts = build_dashboard_charts(income, expenses);

    let latest_income = latest(&search(income, query), LATEST_COUNT);
    let latest_expenses = latest(&search(expenses, query), LATEST_COUNT);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Dashboard" }

            (totals_view(totals))

            (search_view(query))

            @if charts.is_empty() {
                (no_data_view())
            } @else {
                (charts_view(&charts))
            }

            (suggestion_view(suggestion))

            section id="recent-transactions" class="w-full mb-8"
            {
                h2 class="text-xl font-bold mb-2" { "Recent Transactions" }

                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    (latest_table(TransactionKind::Income, &latest_income))
                    (latest_table(TransactionKind::Expense, &latest_expenses))
                }
            }
        }
    );

    let scripts = if charts.is_empty() {
        Vec::new()
    } else {
        vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            charts_script(&charts),
        ]
    };

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        auth::Username,
        endpoints,
        test_utils::{assert_valid_html, get_test_connection, parse_html_document},
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{DashboardQuery, DashboardState, export_url, get_dashboard_page};

    fn alice() -> Username {
        Username::new_unchecked("alice")
    }

    fn add(kind: TransactionKind, date: time::Date, label: &str, amount: f64, conn: &Connection) {
        create_transaction(kind, &alice(), Transaction::build(date, label, amount), conn).unwrap();
    }

    fn get_state(connection: Connection) -> DashboardState {
        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    async fn get_page(state: DashboardState, query: Option<&str>) -> Html {
        let response = get_dashboard_page(
            State(state),
            Extension(alice()),
            Query(DashboardQuery {
                q: query.map(str::to_owned),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        html
    }

    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("Nothing matched {selector}"))
            .text()
            .collect::<String>()
    }

    fn count(html: &Html, selector: &str) -> usize {
        html.select(&Selector::parse(selector).unwrap()).count()
    }

    #[tokio::test]
    async fn dashboard_shows_totals_charts_and_tables() {
        let conn = get_test_connection();
        add(TransactionKind::Income, date!(2024 - 01 - 15), "Salary", 3000.0, &conn);
        add(TransactionKind::Expense, date!(2024 - 01 - 20), "Rent", 1200.0, &conn);

        let html = get_page(get_state(conn), None).await;

        assert!(text_of(&html, "#total-income").contains("3,000.00"));
        assert!(text_of(&html, "#total-expenses").contains("1,200.00"));
        assert!(text_of(&html, "#net-savings").contains("1,800.00"));
        assert_eq!(count(&html, "#category-chart"), 1);
        assert_eq!(count(&html, "#trend-chart"), 1);
        assert_eq!(count(&html, "#latest-income tbody tr"), 1);
        assert_eq!(count(&html, "#latest-expenses tbody tr"), 1);
        assert!(
            text_of(&html, "#top-category").contains("You're spending the most on Rent"),
            "want top category suggestion"
        );
    }

    #[tokio::test]
    async fn dashboard_without_data_shows_prompt() {
        let html = get_page(get_state(get_test_connection()), None).await;

        assert_eq!(count(&html, "#no-data"), 1);
        assert_eq!(count(&html, "#charts"), 0);
        assert!(text_of(&html, "#suggestion").contains("Add income to get savings advice."));
        assert!(text_of(&html, "#net-savings").contains("$0.00"));
    }

    #[tokio::test]
    async fn dashboard_only_shows_own_transactions() {
        let conn = get_test_connection();
        create_transaction(
            TransactionKind::Income,
            &Username::new_unchecked("bob"),
            Transaction::build(date!(2024 - 01 - 15), "Salary", 9000.0),
            &conn,
        )
        .unwrap();

        let html = get_page(get_state(conn), None).await;

        assert!(text_of(&html, "#total-income").contains("$0.00"));
        assert_eq!(count(&html, "#latest-income tbody tr button"), 0);
    }

    #[tokio::test]
    async fn search_filters_tables_and_adds_filtered_downloads() {
        let conn = get_test_connection();
        add(TransactionKind::Income, date!(2024 - 01 - 15), "Salary", 3000.0, &conn);
        add(TransactionKind::Income, date!(2024 - 01 - 16), "Side gig", 200.0, &conn);
        add(TransactionKind::Expense, date!(2024 - 01 - 20), "Rent", 1200.0, &conn);

        let html = get_page(get_state(conn), Some("gig")).await;

        assert_eq!(count(&html, "#latest-income tbody tr button"), 1);
        assert_eq!(count(&html, "#latest-expenses tbody tr button"), 0);
        // Totals ignore the search.
        assert!(text_of(&html, "#total-income").contains("3,200.00"));

        let download_links = html
            .select(&Selector::parse("#downloads a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect::<Vec<_>>();
        assert_eq!(
            download_links,
            vec![
                endpoints::EXPORT_INCOME,
                endpoints::EXPORT_EXPENSES,
                "/api/export/income?q=gig",
                "/api/export/expenses?q=gig",
            ]
        );
    }

    #[tokio::test]
    async fn latest_tables_show_newest_five() {
        let conn = get_test_connection();
        for day in 1..=7 {
            let date = date!(2024 - 01 - 01).replace_day(day).unwrap();
            add(TransactionKind::Expense, date, "Food", 10.0, &conn);
        }

        let html = get_page(get_state(conn), None).await;

        assert_eq!(count(&html, "#latest-expenses tbody tr"), 5);
        let first_date = text_of(&html, "#latest-expenses tbody tr td");
        assert_eq!(first_date.trim(), "2024-01-07");
    }

    #[test]
    fn export_url_encodes_query() {
        assert_eq!(
            export_url(endpoints::EXPORT_INCOME, "side gig"),
            "/api/export/income?q=side+gig"
        );
        assert_eq!(export_url(endpoints::EXPORT_INCOME, ""), "/api/export/income");
    }
}
