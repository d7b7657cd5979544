//! Spreadbook is a small internal web app for recording currency spread
//! transactions.
//!
//! A user logs in against a static credential list, uploads spreadsheet data
//! (CSV sheets) of transaction rows, reviews the rows and applies rates, and
//! saves everything into a single SQLite table. A manual entry form and a
//! searchable, editable list are backed by the same table.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod auth_cookie;
mod auth_middleware;
mod credentials;
pub mod db;
pub mod endpoints;
pub mod entry;
mod html;
pub mod import;
mod internal_server_error;
mod log_in;
mod log_out;
mod navigation;
mod not_found;
mod routing;
pub mod spread;
pub mod state;

#[cfg(test)]
mod test_utils;

pub use db::initialize as initialize_db;
pub use routing::build_router;
pub use state::AppState;

use crate::{
    alert::Alert, internal_server_error::render_internal_server_error,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
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
    /// The username was not in the credential list, or the password did not
    /// match.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The credential file could not be read or parsed.
    #[error("could not load the credential file: {0}")]
    CredentialFile(String),

    /// Either the session or expiry cookie is missing from the cookie jar in
    /// the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error formatting or parsing the expiry cookie date-time.
    #[error("could not handle the expiry cookie date-time: {0}")]
    InvalidCookieDate(String),

    /// A date string from the manual entry form was not in `dd/mm/yyyy`
    /// format.
    #[error("\"{0}\" is not a valid date, expected dd/mm/yyyy")]
    InvalidDateFormat(String),

    /// A numeric field of the manual entry form could not be parsed.
    #[error("\"{0}\" is not a valid number")]
    InvalidNumber(String),

    /// One or more required columns were absent from a sheet after header
    /// mapping.
    ///
    /// `available` holds the post-mapping column names so the user can see
    /// what the sheet actually contained.
    #[error("missing required columns {missing:?}, found columns {available:?}")]
    MissingColumns {
        /// The required columns that were not found.
        missing: Vec<String>,
        /// The columns that were found, after mapping.
        available: Vec<String>,
    },

    /// Fewer sheets were uploaded than the selected import mode requires.
    #[error("this import mode requires at least {want} sheets, got {got}")]
    SheetCount {
        /// The minimum number of sheets for the mode.
        want: usize,
        /// The number of sheets that were uploaded.
        got: usize,
    },

    /// A sheet could not be parsed as CSV at all.
    #[error("could not parse the sheet: {0}")]
    InvalidSheet(String),

    /// The row selection on the review page could not be parsed, or referred
    /// to rows outside the pending import.
    #[error("\"{0}\" is not a valid row selection, expected e.g. \"2\" or \"3;5\"")]
    InvalidRowSelection(String),

    /// The multipart form could not be parsed as a list of CSV sheets.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// An uploaded file was not a CSV sheet.
    #[error("file is not a CSV sheet")]
    NotCsv,

    /// A review or save action was attempted with no upload in progress.
    #[error("there is no upload in progress")]
    NoPendingImport,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an entry that does not exist.
    #[error("tried to update an entry that is not in the database")]
    UpdateMissingEntry,

    /// Tried to delete an entry that does not exist.
    #[error("tried to delete an entry that is not in the database")]
    DeleteMissingEntry,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
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

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(
                    "Sorry, something went wrong.",
                    "Try again later or check the server logs",
                )
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTMX alert fragment targeting the page's
    /// alert container.
    pub(crate) fn into_alert_response(self) -> Response {
        match self {
            Error::MissingColumns { missing, available } => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: format!("Missing required columns: {}", missing.join(", ")),
                    details: format!("The sheet contained: {}", available.join(", ")),
                }
                .into_html(),
            )
                .into_response(),
            Error::SheetCount { want, got } => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Not enough sheets".to_owned(),
                    details: format!(
                        "This import mode requires at least {want} sheets, but {got} were uploaded."
                    ),
                }
                .into_html(),
            )
                .into_response(),
            Error::InvalidSheet(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the uploaded sheet".to_owned(),
                    details,
                }
                .into_html(),
            )
                .into_response(),
            Error::InvalidRowSelection(input) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid row selection".to_owned(),
                    details: format!(
                        "\"{input}\" is not a valid selection. \
                        Use a single row number such as \"2\" or a range such as \"3;5\"."
                    ),
                }
                .into_html(),
            )
                .into_response(),
            Error::InvalidDateFormat(input) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid date".to_owned(),
                    details: format!("\"{input}\" is not a valid date. Use the format dd/mm/yyyy."),
                }
                .into_html(),
            )
                .into_response(),
            Error::InvalidNumber(input) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid number".to_owned(),
                    details: format!("\"{input}\" is not a valid number."),
                }
                .into_html(),
            )
                .into_response(),
            Error::NotCsv => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "File type must be CSV.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::NoPendingImport => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "There is no upload in progress. Upload a sheet first.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::UpdateMissingEntry => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update entry".to_owned(),
                    details: "The entry could not be found.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingEntry => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete entry".to_owned(),
                    details: "The entry could not be found. \
                        Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    }
                    .into_html(),
                )
                    .into_response()
            }
        }
    }
}
