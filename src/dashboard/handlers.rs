//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    AppState, Error,
    dashboard::{
        aggregation::{asset_allocation, balance_series, category_totals, income_expense_series},
        charts::{
            DashboardChart, allocation_chart, balance_chart, charts_script, income_expense_chart,
            spending_chart,
        },
        insight::{insight_tips, spending_concentration},
        summary::{
            FinancialSummary, goal_card, goal_progress, insight_panel, recent_transactions_table,
            summary_cards,
        },
    },
    endpoints,
    html::{HeadElement, base, dollar_input_styles, link},
    investment::get_investments,
    navigation::NavBar,
    settings::get_savings_goal,
    transaction::{Transaction, get_recent_transactions, get_transactions},
};

/// How many transactions the recent transactions table shows.
const RECENT_TRANSACTIONS_LIMIT: u32 = 10;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions, investments and settings.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    summary: FinancialSummary,
    goal: Decimal,
    progress: Decimal,
    tips: Vec<String>,
    charts: Vec<DashboardChart>,
    recent_transactions: Vec<Transaction>,
}

/// Display a page with an overview of the user's data.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    match build_dashboard_data(&connection)? {
        Some(data) => Ok(dashboard_view(nav_bar, &data).into_response()),
        None => Ok(dashboard_no_data_view(nav_bar).into_response()),
    }
}

/// Fetches and builds all data needed for the dashboard display.
///
/// # Returns
/// All dashboard data ready for rendering, or `None` if no transaction data exists.
///
/// # Errors
/// Returns error if database queries fail.
fn build_dashboard_data(connection: &Connection) -> Result<Option<DashboardData>, Error> {
    let transactions = get_transactions(None, connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    if transactions.is_empty() {
        return Ok(None);
    }

    let investments = get_investments(connection)
        .inspect_err(|error| tracing::error!("could not get investments: {error}"))?;
    let goal = get_savings_goal(connection)
        .inspect_err(|error| tracing::error!("could not get savings goal: {error}"))?;
    let recent_transactions = get_recent_transactions(RECENT_TRANSACTIONS_LIMIT, connection)
        .inspect_err(|error| tracing::error!("could not get recent transactions: {error}"))?;

    let summary = FinancialSummary::from_transactions(&transactions);
    let totals = category_totals(&transactions);
    let concentration = spending_concentration(&totals);
    let tips = insight_tips(&summary, concentration.as_ref());

    let mut charts = vec![
        DashboardChart {
            id: "balance-chart",
            options: balance_chart(&balance_series(&transactions)).to_string(),
        },
        DashboardChart {
            id: "income-expense-chart",
            options: income_expense_chart(&income_expense_series(&transactions)).to_string(),
        },
    ];

    // The doughnut charts are meaningless without data, so leave them out.
    if !totals.is_empty() {
        charts.push(DashboardChart {
            id: "spending-chart",
            options: spending_chart(&totals).to_string(),
        });
    }

    if !investments.is_empty() {
        charts.push(DashboardChart {
            id: "allocation-chart",
            options: allocation_chart(&asset_allocation(&investments)).to_string(),
        });
    }

    Ok(Some(DashboardData {
        progress: goal_progress(summary.balance, goal),
        summary,
        goal,
        tips,
        charts,
        recent_transactions,
    }))
}

/// Renders the dashboard page when no transaction data exists.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding a transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts and insights will show up here once you add some
                transactions. Start by " (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with summary cards, charts, the savings
/// goal and insights.
fn dashboard_view(nav_bar: NavBar, data: &DashboardData) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (summary_cards(&data.summary))

            (goal_card(data.goal, data.progress))

            (insight_panel(&data.tips))

            section
                id="charts"
                class="w-full mx-auto mb-4"
            {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    @for chart in &data.charts {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded dark:bg-gray-100"
                        {}
                    }
                }
            }

            (recent_transactions_table(&data.recent_transactions))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&data.charts),
        dollar_input_styles(),
    ];

    base("Dashboard", &scripts, &content)
}
