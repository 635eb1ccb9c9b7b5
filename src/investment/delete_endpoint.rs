//! Defines the endpoint for deleting an investment.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, investment::core::delete_investment};

/// The state needed to delete an investment.
#[derive(Debug, Clone)]
pub struct DeleteInvestmentState {
    /// The database connection for managing investments.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteInvestmentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an investment.
///
/// The delete buttons on the investments page use `hx-swap="delete"` on the
/// table row, so the success response must be 200 OK or HTMX will not remove
/// the row.
pub async fn delete_investment_endpoint(
    State(state): State<DeleteInvestmentState>,
    Path(investment_id): Path<i64>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_investment(investment_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("Could not delete investment {investment_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use crate::{
        db::initialize,
        investment::{create_investment, get_investments},
    };

    use super::{DeleteInvestmentState, delete_investment_endpoint};

    fn get_test_state() -> DeleteInvestmentState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DeleteInvestmentState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn deletes_investment() {
        let state = get_test_state();
        let investment = {
            let connection = state.db_connection.lock().unwrap();
            create_investment("Index fund", Decimal::ONE, &connection).unwrap()
        };

        let response = delete_investment_endpoint(State(state.clone()), Path(investment.id)).await;

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_investments(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_investment_returns_not_found() {
        let state = get_test_state();

        let response = delete_investment_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
