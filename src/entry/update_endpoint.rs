//! The endpoint for overwriting a spread entry from the edit form.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    endpoints,
    entry::{update_entry, EntryForm, EntryId},
    AppState, Error,
};

/// The state needed for updating entries.
#[derive(Debug, Clone)]
pub struct UpdateEntryState {
    /// The database connection for writing entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Overwrite the spread entry `entry_id` with the edit form data and redirect
/// the client to the entries page.
///
/// The derived columns are recomputed from the submitted amount and rates, so
/// a stale derived value can never survive an edit.
pub async fn update_entry_endpoint(
    State(state): State<UpdateEntryState>,
    Path(entry_id): Path<EntryId>,
    Form(form): Form<EntryForm>,
) -> Response {
    let fields = match form.try_into_fields() {
        Ok(fields) => fields,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_entry(entry_id, &fields, &connection) {
        Ok(()) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::ENTRIES_VIEW.to_owned()),
            (),
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}
