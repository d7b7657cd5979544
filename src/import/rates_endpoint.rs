//! The endpoint for applying a pair of rates to a selection of pending rows.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    endpoints,
    import::{parse_row_selection, PendingImport},
    AppState, Error,
};

/// The state needed for applying rates to the pending import.
#[derive(Debug, Clone)]
pub struct ApplyRatesState {
    /// The upload the rates are applied to.
    pub pending_import: Arc<Mutex<Option<PendingImport>>>,
}

impl FromRef<AppState> for ApplyRatesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            pending_import: state.pending_import.clone(),
        }
    }
}

/// The rate form on the review page.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesForm {
    /// The row selection, a single row number or an inclusive range.
    pub rows: String,
    /// The rate charged to the client.
    pub taxa_rec_cliente: f64,
    /// The rate paid to the bank.
    pub taxa_pgto_banco: f64,
}

/// Set both rates on the selected pending rows and recompute their derived
/// fields, then redirect the client back to the review page.
///
/// Rows without an amount get the rates but keep their derived fields
/// untouched until an amount is known.
pub async fn apply_rates_endpoint(
    State(state): State<ApplyRatesState>,
    Form(form): Form<RatesForm>,
) -> Response {
    let mut pending = match state.pending_import.lock() {
        Ok(pending) => pending,
        Err(error) => {
            tracing::error!("could not acquire pending import lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let Some(pending) = pending.as_mut() else {
        return Error::NoPendingImport.into_alert_response();
    };

    let selected = match parse_row_selection(&form.rows, pending.row_count()) {
        Ok(selected) => selected,
        Err(error) => return error.into_alert_response(),
    };

    for (index, row) in pending.rows_mut().enumerate() {
        if selected.contains(&index) {
            row.taxa_rec_cliente = Some(form.taxa_rec_cliente);
            row.taxa_pgto_banco = Some(form.taxa_pgto_banco);
            row.recalculate();
        }
    }

    tracing::debug!("applied rates to {} pending rows", selected.len());

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::IMPORT_REVIEW_VIEW.to_owned()),
        (),
    )
        .into_response()
}
