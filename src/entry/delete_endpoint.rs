//! The endpoint for deleting a spread entry from the entries table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    endpoints,
    entry::{delete_entry, EntryId},
    AppState, Error,
};

/// The state needed for deleting entries.
#[derive(Debug, Clone)]
pub struct DeleteEntryState {
    /// The database connection for deleting entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete the spread entry `entry_id` and redirect the client to the entries
/// page.
pub async fn delete_entry_endpoint(
    State(state): State<DeleteEntryState>,
    Path(entry_id): Path<EntryId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_entry(entry_id, &connection) {
        Ok(()) => {
            tracing::info!("deleted entry {entry_id}");
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::ENTRIES_VIEW.to_owned()),
                (),
            )
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}
