//! Defines the endpoint for creating a new investment.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, Error, endpoints, investment::create_investment};

/// The state needed to create an investment.
#[derive(Debug, Clone)]
pub struct CreateInvestmentState {
    /// The database connection for managing investments.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateInvestmentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating an investment.
#[derive(Debug, Deserialize)]
pub struct InvestmentForm {
    /// The name of the holding.
    pub name: String,
    /// The current value of the holding in dollars.
    pub value: Decimal,
}

/// A route handler for creating a new investment, redirects to the
/// investments view on success.
///
/// Validation failures render an alert into the page's alert container.
pub async fn create_investment_endpoint(
    State(state): State<CreateInvestmentState>,
    Form(form): Form<InvestmentForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_investment(&form.name, form.value, &connection) {
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::INVESTMENTS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
