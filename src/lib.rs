//! Fintrack is a backend service for tracking personal income and expenses.
//!
//! This library provides a JSON REST API for recording transactions and for
//! the dashboard aggregations computed over them: summary totals, a
//! per-category expense breakdown and a six month income/expense trend.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod analytics;
mod app_state;
mod database_id;
mod db;
mod endpoints;
mod extract;
mod logging;
mod money;
mod pagination;
mod routing;
mod timezone;
mod transaction;

pub use analytics::{
    CategoryBreakdownEntry, Dashboard, MonthlyTrendEntry, Summary, TREND_MONTHS,
    compute_category_breakdown, compute_dashboard, compute_monthly_trend, compute_summary,
};
pub use app_state::AppState;
pub use database_id::{DatabaseId, TransactionId, UserId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use timezone::{get_local_offset, today_in_timezone};
pub use transaction::{
    Category, SQLiteTransactionStore, Transaction, TransactionBuilder, TransactionStore,
    TransactionType, create_transaction,
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
    /// A user ID was missing, zero or negative.
    ///
    /// User IDs are checked before the database is queried, so an invalid ID
    /// never reaches the store.
    #[error("{0} is not a valid user ID")]
    InvalidUserId(i64),

    /// The amount of a transaction was not a positive number with at most two
    /// decimal places, or it was too large to store.
    ///
    /// The direction of money is recorded by the transaction type, so amounts
    /// are always positive.
    #[error("invalid amount {0}: amounts must be positive with at most two decimal places")]
    InvalidAmount(String),

    /// An empty or whitespace-only string was used as a transaction description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// A text field was longer than the maximum number of characters allowed.
    #[error("{field} cannot be longer than {max_length} characters")]
    FieldTooLong {
        /// The name of the offending field.
        field: &'static str,
        /// The maximum number of characters allowed in the field.
        max_length: usize,
    },

    /// The start of a date range was after the end.
    #[error("the start date {0} is after the end date {1}")]
    InvalidDateRange(Date, Date),

    /// A date was so close to the limits of the calendar that a date range
    /// around it could not be represented.
    #[error("the date {0} is out of range")]
    DateOutOfRange(Date),

    /// A request's path, query string or body could not be parsed.
    #[error("{message}")]
    RejectedRequest {
        /// The status code chosen by the extractor that rejected the request.
        status: StatusCode,
        /// Why the request was rejected.
        message: String,
    },

    /// A sum of stored amounts was too large to represent.
    #[error("the total amount is too large to represent")]
    TotalOverflow,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::RejectedRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::RejectedRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::RejectedRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidUserId(_) | Error::InvalidDateRange(_, _) | Error::DateOutOfRange(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::InvalidAmount(_) | Error::EmptyDescription | Error::FieldTooLong { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::RejectedRequest { status, .. } => *status,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DatabaseLockError => StatusCode::SERVICE_UNAVAILABLE,
            Error::SqlError(_) | Error::TotalOverflow | Error::InvalidTimezoneError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            Error::DatabaseLockError => {
                "The transaction store is unavailable, try again later.".to_owned()
            }
            Error::InvalidTimezoneError(timezone) => format!(
                "Could not get local timezone \"{timezone}\". Check your server settings and \
                ensure the timezone has been set to valid, canonical timezone string"
            ),
            // SQL errors are not intended to be shown to the client.
            Error::SqlError(error) => {
                tracing::error!("An unexpected error occurred: {}", error);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
