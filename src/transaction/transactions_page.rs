//! Defines the route handler for the page that displays transactions as a table.
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
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    transaction::core::{Transaction, get_transactions},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render an overview of the user's transactions, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(None, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let content = html! {
        (NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex w-full max-w-3xl items-center justify-between my-4"
            {
                h1 class="text-xl font-bold" { "Transactions" }

                a
                    href=(endpoints::NEW_TRANSACTION_VIEW)
                    class=(LINK_STYLE)
                {
                    "New transaction"
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
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @if transactions.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="5" class={(TABLE_CELL_STYLE) " text-center"}
                                {
                                    "No transactions yet. "
                                    a
                                        href=(endpoints::NEW_TRANSACTION_VIEW)
                                        class=(LINK_STYLE)
                                    {
                                        "Add your first transaction"
                                    }
                                }
                            }
                        } @else {
                            // Newest first. The store returns oldest first for
                            // the chart code.
                            @for transaction in transactions.iter().rev() {
                                (transaction_row(transaction))
                            }
                        }
                    }
                }
            }
        }
    };

    Ok(base("Transactions", &[], &content).into_response())
}

fn transaction_row(transaction: &Transaction) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    type="button"
                    class=(BUTTON_DELETE_STYLE)
                    hx-delete=(format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id))
                    hx-confirm="Are you sure you want to delete this transaction?"
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

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{body::Body, extract::State, http::Response};
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use scraper::{ElementRef, Html, Selector};
    use time::macros::date;

    use crate::{
        db::initialize,
        endpoints,
        endpoints::format_endpoint,
        transaction::{NewTransaction, create_transaction},
    };

    use super::{TransactionsViewState, get_transactions_page};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[tokio::test]
    async fn transactions_page_displays_transactions_newest_first() {
        let conn = get_test_connection();
        create_transaction(
            NewTransaction {
                amount: Decimal::new(100, 0),
                date: date!(2025 - 10 - 01),
                category: "Food".to_owned(),
                description: "Groceries".to_owned(),
            },
            &conn,
        )
        .unwrap();
        create_transaction(
            NewTransaction {
                amount: Decimal::new(200, 0),
                date: date!(2025 - 10 - 05),
                category: "Salary".to_owned(),
                description: "Pay".to_owned(),
            },
            &conn,
        )
        .unwrap();

        let state = TransactionsViewState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_transactions_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        assert_valid_html(&html);

        let row_selector = Selector::parse("tbody tr[data-transaction-row='true']").unwrap();
        let rows: Vec<ElementRef<'_>> = html.select(&row_selector).collect();
        assert_eq!(rows.len(), 2, "want 2 transaction rows, got {}", rows.len());

        let first_row_text = rows[0].text().collect::<String>();
        assert!(
            first_row_text.contains("2025-10-05"),
            "want newest transaction first, got {first_row_text}"
        );
        assert!(first_row_text.contains("$200.00"));
    }

    #[tokio::test]
    async fn transaction_rows_have_delete_buttons() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            NewTransaction {
                amount: Decimal::new(100, 0),
                date: date!(2025 - 10 - 01),
                category: "Food".to_owned(),
                description: "Groceries".to_owned(),
            },
            &conn,
        )
        .unwrap();

        let state = TransactionsViewState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_transactions_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        let button_selector = Selector::parse("tbody button[hx-delete]").unwrap();
        let button = html
            .select(&button_selector)
            .next()
            .expect("want a delete button in the table");

        assert_eq!(
            button.value().attr("hx-delete"),
            Some(format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id).as_str())
        );
        assert_eq!(button.value().attr("hx-target"), Some("closest tr"));
        assert_eq!(button.value().attr("hx-swap"), Some("delete"));
    }

    #[tokio::test]
    async fn empty_transactions_page_links_to_new_transaction() {
        let state = TransactionsViewState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = get_transactions_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        assert_valid_html(&html);

        let empty_cell_selector = Selector::parse("tbody td[colspan='5']").unwrap();
        let empty_cell = html
            .select(&empty_cell_selector)
            .next()
            .expect("want an empty-state table cell");

        let link_selector = Selector::parse("a").unwrap();
        let link = empty_cell
            .select(&link_selector)
            .next()
            .expect("want a link in the empty-state cell");
        assert_eq!(
            link.value().attr("href"),
            Some(endpoints::NEW_TRANSACTION_VIEW)
        );
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("Could not get response body");
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }
}
