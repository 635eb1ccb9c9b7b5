//! Defines the route handler for the page for creating a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    category::{EXPENSE_CATEGORIES, INCOME_CATEGORIES},
    html::{
        BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base, dollar_input_styles, loading_spinner,
    },
    navigation::NavBar,
    timezone::local_today,
    transaction::get_recent_categories,
};

/// How many recently used categories the quick pick row shows.
const RECENT_CATEGORY_LIMIT: u32 = 6;

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading recently used categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for creating a transaction.
///
/// The date input defaults to today and is capped at today, matching the
/// server-side check in the create endpoint.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
) -> Result<Response, Error> {
    let max_date = local_today(&state.local_timezone)?;

    let recent_categories = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_recent_categories(RECENT_CATEGORY_LIMIT, &connection)
            .inspect_err(|error| tracing::error!("could not get recent categories: {error}"))?
    };

    let content = html! {
        (NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "New Transaction" }

            form
                class="space-y-4"
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
            {
                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    div class="input-wrapper w-full"
                    {
                        input
                            type="number"
                            name="amount"
                            id="amount"
                            class=(FORM_TEXT_INPUT_STYLE)
                            min="0"
                            step="0.01"
                            placeholder="0.00"
                            required;
                    }
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                    input
                        type="date"
                        name="date"
                        id="date"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=(max_date)
                        max=(max_date)
                        required;
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    @if !recent_categories.is_empty() {
                        div class="flex flex-wrap gap-2 mb-2"
                        {
                            @for category in &recent_categories {
                                button
                                    type="button"
                                    class=(CATEGORY_BADGE_STYLE)
                                    data-category=(category)
                                    onclick="document.getElementById('category').value = this.dataset.category"
                                {
                                    (category)
                                }
                            }
                        }
                    }

                    select
                        name="category"
                        id="category"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required
                    {
                        optgroup label="Expenses"
                        {
                            @for category in EXPENSE_CATEGORIES {
                                option value=(category) { (category) }
                            }
                        }

                        optgroup label="Income"
                        {
                            @for category in INCOME_CATEGORIES {
                                option value=(category) { (category) }
                            }
                        }
                    }
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                    input
                        type="text"
                        name="description"
                        id="description"
                        class=(FORM_TEXT_INPUT_STYLE)
                        placeholder="What was this for?";
                }

                button
                    type="submit"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                    "Save"
                }
            }
        }
    };

    Ok(base("New Transaction", &[dollar_input_styles()], &content).into_response())
}

#[cfg(test)]
mod view_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        extract::State,
        http::{Response, StatusCode},
    };
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use scraper::{ElementRef, Html, Selector};
    use time::{OffsetDateTime, macros::date};

    use crate::{
        category::{EXPENSE_CATEGORIES, INCOME_CATEGORIES},
        db::initialize,
        endpoints,
        transaction::{NewTransaction, create_transaction},
    };

    use super::{NewTransactionPageState, get_new_transaction_page};

    fn get_test_state() -> NewTransactionPageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        NewTransactionPageState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn new_transaction_returns_form() {
        let state = get_test_state();

        let response = get_new_transaction_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html(response).await;
        assert_valid_html(&document);
        assert_correct_form(&document);
    }

    #[tokio::test]
    async fn shows_recently_used_categories_as_quick_picks() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            for category in ["Food", "Rent", "Food"] {
                create_transaction(
                    NewTransaction {
                        amount: Decimal::ONE,
                        date: date!(2025 - 10 - 05),
                        category: category.to_owned(),
                        description: "".to_owned(),
                    },
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_new_transaction_page(State(state)).await.unwrap();

        let document = parse_html(response).await;
        assert_valid_html(&document);

        let quick_pick_selector = Selector::parse("button[data-category]").unwrap();
        let categories = document
            .select(&quick_pick_selector)
            .map(|button| button.value().attr("data-category").unwrap())
            .collect::<Vec<_>>();

        assert_eq!(categories, vec!["Food", "Rent"]);
    }

    #[tokio::test]
    async fn hides_quick_picks_without_transactions() {
        let state = get_test_state();

        let response = get_new_transaction_page(State(state)).await.unwrap();

        let document = parse_html(response).await;
        let quick_pick_selector = Selector::parse("button[data-category]").unwrap();

        assert_eq!(document.select(&quick_pick_selector).count(), 0);
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[track_caller]
    fn assert_correct_form(document: &Html) {
        let form_selector = scraper::Selector::parse("form").unwrap();
        let forms = document.select(&form_selector).collect::<Vec<_>>();
        assert_eq!(forms.len(), 1, "want 1 form, got {}", forms.len());

        let form = forms.first().unwrap();
        let hx_post = form.value().attr("hx-post");
        assert_eq!(
            hx_post,
            Some(endpoints::TRANSACTIONS_API),
            "want form with attribute hx-post=\"{}\", got {:?}",
            endpoints::TRANSACTIONS_API,
            hx_post
        );

        assert_correct_inputs(form);
        assert_category_select(form);
        assert_has_submit_button(form);
    }

    #[track_caller]
    fn assert_correct_inputs(form: &ElementRef) {
        let expected_input_types = vec![
            ("amount", "number"),
            ("date", "date"),
            ("description", "text"),
        ];

        for (name, element_type) in expected_input_types {
            let selector_string = format!("input[type={element_type}]");
            let input_selector = scraper::Selector::parse(&selector_string).unwrap();
            let inputs = form.select(&input_selector).collect::<Vec<_>>();
            assert_eq!(
                inputs.len(),
                1,
                "want 1 {element_type} input, got {}",
                inputs.len()
            );

            let input = inputs.first().unwrap();

            let input_name = input.value().attr("name");
            assert_eq!(
                input_name,
                Some(name),
                "want {element_type} with name=\"{name}\", got {input_name:?}"
            );

            match input_name {
                Some("amount") => {
                    assert_required(input);
                    assert_amount_min_and_step(input);
                }
                Some("date") => {
                    assert_required(input);
                    assert_max_date(input);
                }
                _ => {}
            }
        }
    }

    #[track_caller]
    fn assert_category_select(form: &ElementRef) {
        let select_selector = scraper::Selector::parse("select[name=category]").unwrap();
        let select = form
            .select(&select_selector)
            .next()
            .expect("want a category select element");

        let option_selector = scraper::Selector::parse("option").unwrap();
        let options = select
            .select(&option_selector)
            .map(|option| option.text().collect::<String>())
            .collect::<Vec<_>>();

        for category in INCOME_CATEGORIES.iter().chain(EXPENSE_CATEGORIES.iter()) {
            assert!(
                options.iter().any(|option| option == category),
                "want category select to contain option \"{category}\", got {options:?}"
            );
        }
    }

    #[track_caller]
    fn assert_required(input: &ElementRef) {
        let required = input.value().attr("required");
        let input_name = input.value().attr("name").unwrap();
        assert!(
            required.is_some(),
            "want {input_name} input to be required, got {required:?}"
        );
    }

    #[track_caller]
    fn assert_max_date(input: &ElementRef) {
        let today = OffsetDateTime::now_utc().date();
        let max_date = input.value().attr("max");

        assert_eq!(
            Some(today.to_string().as_str()),
            max_date,
            "the date for a new transaction should be limited to the current date {today}, but got {max_date:?}"
        );
    }

    #[track_caller]
    fn assert_amount_min_and_step(input: &ElementRef) {
        let min_value = input
            .value()
            .attr("min")
            .expect("amount input should have the attribute 'min'");
        let min_value: i64 = min_value
            .parse()
            .expect("the attribute 'min' for the amount input should be an integer");
        assert_eq!(
            0, min_value,
            "the amount for a new transaction should be limited to a minimum of 0, but got {min_value}"
        );

        let step = input
            .value()
            .attr("step")
            .expect("amount input should have the attribute 'step'");
        let step: f64 = step
            .parse()
            .expect("the attribute 'step' for the amount input should be a float");
        assert_eq!(
            0.01, step,
            "the amount for a new transaction should increment in steps of 0.01, but got {step}"
        );
    }

    #[track_caller]
    fn assert_has_submit_button(form: &ElementRef) {
        let button_selector = scraper::Selector::parse("button").unwrap();
        let buttons = form.select(&button_selector).collect::<Vec<_>>();
        assert_eq!(buttons.len(), 1, "want 1 button, got {}", buttons.len());
        let button_type = buttons.first().unwrap().value().attr("type");
        assert_eq!(
            button_type,
            Some("submit"),
            "want button with type=\"submit\", got {button_type:?}"
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
