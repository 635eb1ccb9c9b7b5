//! Defines the route handler for the page that lists investments and the form
//! for adding one.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    endpoints::format_endpoint,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        dollar_input_styles, format_currency, loading_spinner,
    },
    investment::core::{Investment, get_investments},
    navigation::NavBar,
};

/// The state needed for the investments page.
#[derive(Debug, Clone)]
pub struct InvestmentsViewState {
    /// The database connection for managing investments.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for InvestmentsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render an overview of the user's investments with a form for adding one.
pub async fn get_investments_page(
    State(state): State<InvestmentsViewState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let investments = get_investments(&connection)
        .inspect_err(|error| tracing::error!("could not get investments: {error}"))?;

    let content = html! {
        (NavBar::new(endpoints::INVESTMENTS_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Investments" }

            form
                class="w-full max-w-3xl flex flex-col sm:flex-row gap-4 items-end mb-8"
                hx-post=(endpoints::INVESTMENTS_API)
                hx-target-error="#alert-container"
            {
                div class="flex-1 w-full"
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Name" }
                    input
                        type="text"
                        name="name"
                        id="name"
                        class=(FORM_TEXT_INPUT_STYLE)
                        placeholder="e.g. Index fund"
                        required;
                }

                div class="w-full sm:w-48"
                {
                    label for="value" class=(FORM_LABEL_STYLE) { "Value" }
                    div class="input-wrapper w-full"
                    {
                        input
                            type="number"
                            name="value"
                            id="value"
                            class=(FORM_TEXT_INPUT_STYLE)
                            min="0"
                            step="0.01"
                            placeholder="0.00"
                            required;
                    }
                }

                button
                    type="submit"
                    class={(BUTTON_PRIMARY_STYLE) " sm:w-32"}
                {
                    span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                    "Add"
                }
            }

            div class="w-full max-w-3xl relative overflow-x-auto shadow-md sm:rounded-lg"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Value" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @if investments.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="3" class={(TABLE_CELL_STYLE) " text-center"}
                                {
                                    "No investments yet. Add your first holding above."
                                }
                            }
                        } @else {
                            @for investment in &investments {
                                (investment_row(investment))
                            }
                        }
                    }
                }
            }
        }
    };

    Ok(base("Investments", &[dollar_input_styles()], &content).into_response())
}

fn investment_row(investment: &Investment) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE) data-investment-row="true"
        {
            th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
            {
                (investment.name)
            }
            td class=(TABLE_CELL_STYLE) { (format_currency(investment.value)) }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    type="button"
                    class=(BUTTON_DELETE_STYLE)
                    hx-delete=(format_endpoint(endpoints::DELETE_INVESTMENT, investment.id))
                    hx-confirm="Are you sure you want to delete this investment?"
                    hx-target="closest tr"
                    hx-swap="delete"
                    hx-target-error="#alert-container"
                {
                    "Delete"
                }
            }
        }
    }
}
