//! The savings goal setting and its update endpoint.
//!
//! Settings live in a single-row table. The savings goal defaults to $5,000
//! until the user sets their own from the dashboard.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::{Connection, types::Type};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, Error, endpoints};

/// The savings goal used when the user has not set one.
pub const DEFAULT_SAVINGS_GOAL: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Get the savings goal, or the default if none has been set.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_savings_goal(connection: &Connection) -> Result<Decimal, Error> {
    let goal_text: Option<String> = connection
        .query_row("SELECT savings_goal FROM settings WHERE id = 1", [], |row| {
            row.get(0)
        })
        .map(Some)
        .or_else(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            error => Err(error),
        })?;

    match goal_text {
        Some(text) => {
            let goal = Decimal::from_str(&text).map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(error))
            })?;
            Ok(goal)
        }
        None => Ok(DEFAULT_SAVINGS_GOAL),
    }
}

/// Set the savings goal, replacing any previous value.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidSavingsGoal] if the goal is zero or negative,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn set_savings_goal(goal: Decimal, connection: &Connection) -> Result<(), Error> {
    if goal <= Decimal::ZERO {
        return Err(Error::InvalidSavingsGoal(goal));
    }

    connection.execute(
        "INSERT INTO settings (id, savings_goal) VALUES (1, ?1)
         ON CONFLICT(id) DO UPDATE SET savings_goal = excluded.savings_goal",
        [goal.to_string()],
    )?;

    Ok(())
}

/// Create the settings table in the database.
///
/// The CHECK constraint keeps the table to a single row.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                savings_goal TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// The state needed to update the savings goal.
#[derive(Debug, Clone)]
pub struct SavingsGoalState {
    /// The database connection for managing settings.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SavingsGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for updating the savings goal.
#[derive(Debug, Deserialize)]
pub struct SavingsGoalForm {
    /// The new savings goal in dollars.
    pub goal: Decimal,
}

/// A route handler for updating the savings goal, redirects to the dashboard
/// on success.
pub async fn set_savings_goal_endpoint(
    State(state): State<SavingsGoalState>,
    Form(form): Form<SavingsGoalForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = set_savings_goal(form.goal, &connection) {
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
