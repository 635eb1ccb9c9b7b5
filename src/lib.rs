//! Spendsight is a web app for tracking personal spending.
//!
//! It stores transactions and investments in SQLite, aggregates them into
//! chart data on every page load, and serves HTML pages directly.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use time::Date;
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod investment;
mod navigation;
mod not_found;
mod routing;
mod settings;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use routing::build_router;

use crate::{
    alert::Alert,
    internal_server_error::{InternalServerErrorPage, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used as a transaction category.
    ///
    /// Categories are validated at the store's write boundary so that the
    /// aggregation code can assume every stored record is well-formed.
    #[error("transaction category cannot be empty")]
    EmptyCategory,

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// An empty string was used as an investment name.
    #[error("investment name cannot be empty")]
    EmptyInvestmentName,

    /// A negative value was used to create an investment.
    ///
    /// Holdings are recorded as their current worth which cannot go below
    /// zero.
    #[error("{0} is a negative value, which is not allowed for an investment")]
    NegativeInvestmentValue(Decimal),

    /// The specified investment name already exists in the database.
    #[error("the investment \"{0}\" already exists in the database")]
    DuplicateInvestmentName(String),

    /// A zero or negative amount was used as the savings goal.
    #[error("the savings goal must be greater than zero, got {0}")]
    InvalidSavingsGoal(Decimal),

    /// A stored record could not be read back as valid data, e.g. an amount
    /// column that does not parse as a decimal.
    ///
    /// Writes are validated, so this error indicates the database was
    /// modified outside the application. It is a defensive check, not a
    /// normal control flow path.
    #[error("a stored record is malformed: {0}")]
    InvalidRecord(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to delete an investment that does not exist
    #[error("tried to delete an investment that is not in the database")]
    DeleteMissingInvestment,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            rusqlite::Error::FromSqlConversionFailure(_, _, source) => {
                Error::InvalidRecord(source.to_string())
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPage {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => Alert::error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            )
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            Error::FutureDate(date) => Alert::error(
                "Invalid transaction date",
                &format!("{date} is a date in the future, which is not allowed."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::EmptyCategory => Alert::error(
                "Invalid category",
                "Choose a category for the transaction.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::EmptyInvestmentName => Alert::error(
                "Invalid investment name",
                "Enter a name for the investment.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::NegativeInvestmentValue(value) => Alert::error(
                "Invalid investment value",
                &format!("{value} is negative. Investment values must be zero or more."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::DuplicateInvestmentName(name) => Alert::error(
                "Duplicate investment name",
                &format!(
                    "The investment {name} already exists in the database. \
                    Choose a different name, or delete the existing investment.",
                ),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidSavingsGoal(goal) => Alert::error(
                "Invalid savings goal",
                &format!("{goal} is not a valid goal. Enter an amount greater than zero."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::DeleteMissingTransaction => Alert::error(
                "Could not delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingInvestment => Alert::error(
                "Could not delete investment",
                "The investment could not be found. \
                Try refreshing the page to see if the investment has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            _ => Alert::error(
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            )
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
