//! The endpoint for saving a reviewed import into the spread table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    alert::Alert,
    entry::{insert_entry_with_id, max_entry_id},
    import::PendingImport,
    AppState, Error,
};

/// The state needed for saving the pending import.
#[derive(Debug, Clone)]
pub struct SaveImportState {
    /// The database connection the rows are written to.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The upload being saved.
    pub pending_import: Arc<Mutex<Option<PendingImport>>>,
}

impl FromRef<AppState> for SaveImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pending_import: state.pending_import.clone(),
        }
    }
}

/// Write every pending row into the spread table and clear the buffer.
///
/// Rows get contiguous IDs starting one past the current maximum, running
/// across batches in upload order. The write happens in one transaction, so
/// a failure part-way leaves the table and the buffer exactly as they were.
pub async fn save_import_endpoint(State(state): State<SaveImportState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let mut pending_guard = match state.pending_import.lock() {
        Ok(pending) => pending,
        Err(error) => {
            tracing::error!("could not acquire pending import lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let Some(pending) = pending_guard.as_ref() else {
        return Error::NoPendingImport.into_alert_response();
    };

    // No IDs are assigned unless the current maximum is known.
    let start_id = match max_entry_id(&connection) {
        Ok(max_id) => max_id + 1,
        Err(error) => return error.into_alert_response(),
    };

    let tx = match connection.unchecked_transaction() {
        Ok(tx) => tx,
        Err(error) => {
            tracing::error!("could not start transaction: {error}");
            return Error::from(error).into_alert_response();
        }
    };

    let mut next_id = start_id;

    for batch in &pending.batches {
        for row in &batch.rows {
            // Dropping `tx` on the error path rolls the whole save back and
            // the buffer is kept for another attempt.
            if let Err(error) = insert_entry_with_id(next_id, row, &tx) {
                tracing::error!("could not save pending row as entry {next_id}: {error}");
                return error.into_alert_response();
            }

            next_id += 1;
        }
    }

    if let Err(error) = tx.commit() {
        tracing::error!("could not commit import transaction: {error}");
        return Error::from(error).into_alert_response();
    }

    let saved = (next_id - start_id) as usize;
    *pending_guard = None;

    tracing::info!("saved {saved} imported entries");

    let alert = if saved == 0 {
        Alert::Success {
            message: "Saved 0 entries".to_owned(),
            details: "The upload contained no rows.".to_owned(),
        }
    } else {
        Alert::Success {
            message: format!("Saved {saved} entries"),
            details: format!("Assigned IDs {start_id} to {}.", next_id - 1),
        }
    };

    (StatusCode::CREATED, alert.into_html()).into_response()
}
