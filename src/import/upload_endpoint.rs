//! The endpoint for uploading CSV sheets into the pending import buffer.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{multipart::Field, FromRef, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    endpoints,
    import::{
        mapping::map_headers, sanitize::sanitize_rows, sheet::parse_sheet, PendingImport,
        SheetBatch,
    },
    AppState, Error,
};

/// The state needed for uploading sheets.
#[derive(Debug, Clone)]
pub struct UploadState {
    /// The buffer the upload is parked in until it is reviewed and saved.
    pub pending_import: Arc<Mutex<Option<PendingImport>>>,
}

impl FromRef<AppState> for UploadState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            pending_import: state.pending_import.clone(),
        }
    }
}

/// How many sheets an upload must contain.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ImportMode {
    /// One or more independent sheets.
    Single,
    /// A workbook split into sheets, at least two.
    Workbook,
}

impl ImportMode {
    fn minimum_sheets(self) -> usize {
        match self {
            ImportMode::Single => 1,
            ImportMode::Workbook => 2,
        }
    }
}

async fn parse_sheet_field(field: Field<'_>) -> Result<SheetBatch, Error> {
    if field.content_type() != Some("text/csv") {
        return Err(Error::NotCsv);
    }

    let file_name = field
        .file_name()
        .map(|file_name| file_name.to_owned())
        .ok_or_else(|| {
            Error::MultipartError("Could not get file name from multipart form field".to_owned())
        })?;

    let data = field.text().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("Could not read data from multipart form field.".to_owned())
    })?;

    tracing::debug!("Received sheet '{}' that is {} bytes", file_name, data.len());

    let sheet = parse_sheet(&file_name, &data)?;
    let headers = map_headers(&sheet.headers)?;
    let rows = sanitize_rows(&headers, &sheet.rows);

    Ok(SheetBatch {
        name: sheet.name,
        rows,
    })
}

/// Parse the uploaded sheets and park them in the pending import buffer,
/// then redirect the client to the review page.
///
/// The buffer is only replaced when every sheet parses and the sheet count
/// matches the selected mode. A failed upload leaves any previous pending
/// import untouched.
pub async fn upload_sheets_endpoint(
    State(state): State<UploadState>,
    mut multipart: Multipart,
) -> Response {
    let mut mode = ImportMode::Single;
    let mut batches = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(error) => {
                return Error::MultipartError(error.to_string()).into_alert_response();
            }
        };

        match field.name() {
            Some("mode") => {
                let value = match field.text().await {
                    Ok(value) => value,
                    Err(error) => {
                        return Error::MultipartError(error.to_string()).into_alert_response();
                    }
                };

                if value == "workbook" {
                    mode = ImportMode::Workbook;
                }
            }
            Some("sheets") => match parse_sheet_field(field).await {
                Ok(batch) => batches.push(batch),
                Err(error) => return error.into_alert_response(),
            },
            _ => {}
        }
    }

    let want = mode.minimum_sheets();
    if batches.len() < want {
        return Error::SheetCount {
            want,
            got: batches.len(),
        }
        .into_alert_response();
    }

    let row_count: usize = batches.iter().map(|batch| batch.rows.len()).sum();
    tracing::info!(
        "parked {} sheets with {row_count} rows for review",
        batches.len()
    );

    match state.pending_import.lock() {
        Ok(mut pending) => {
            *pending = Some(PendingImport { batches });
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::IMPORT_REVIEW_VIEW.to_owned()),
                (),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not acquire pending import lock: {error}");
            Error::DatabaseLockError.into_alert_response()
        }
    }
}
