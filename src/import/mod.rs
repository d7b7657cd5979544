//! The spreadsheet import feature: upload CSV sheets, review the parsed rows,
//! apply shared rates to a row selection and save everything into the spread
//! table in one transaction.

mod import_page;
mod mapping;
mod rates_endpoint;
mod review_page;
mod sanitize;
mod save_endpoint;
mod sheet;
mod upload_endpoint;

pub use import_page::get_import_page;
pub use rates_endpoint::apply_rates_endpoint;
pub use review_page::get_import_review_page;
pub use save_endpoint::save_import_endpoint;
pub use upload_endpoint::upload_sheets_endpoint;

use crate::{entry::EntryFields, Error};

/// One uploaded sheet after header mapping and row sanitisation.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetBatch {
    /// The file name of the uploaded sheet, shown on the review page.
    pub name: String,
    /// The sanitised rows of the sheet, in file order.
    pub rows: Vec<EntryFields>,
}

/// The upload waiting to be reviewed and saved.
///
/// The review page, the rate form and the save endpoint all address rows by
/// their position across all batches, in upload order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PendingImport {
    /// The uploaded sheets, in upload order.
    pub batches: Vec<SheetBatch>,
}

impl PendingImport {
    /// The total number of rows across all batches.
    pub fn row_count(&self) -> usize {
        self.batches.iter().map(|batch| batch.rows.len()).sum()
    }

    /// Iterate mutably over every row, across batches, in upload order.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut EntryFields> {
        self.batches
            .iter_mut()
            .flat_map(|batch| batch.rows.iter_mut())
    }
}

/// Parse a row selection from the review page into zero-based row indices.
///
/// A selection is either a single 1-based row number such as `"2"` or an
/// inclusive range such as `"3;5"`. The indices count across all batches.
///
/// # Errors
/// Returns an [Error::InvalidRowSelection] if the input cannot be parsed, the
/// range is reversed, or it refers to rows beyond `total`.
pub fn parse_row_selection(input: &str, total: usize) -> Result<Vec<usize>, Error> {
    let invalid = || Error::InvalidRowSelection(input.to_owned());
    let trimmed = input.trim();

    let (start, end) = match trimmed.split_once(';') {
        Some((start, end)) => (
            start.trim().parse::<usize>().map_err(|_| invalid())?,
            end.trim().parse::<usize>().map_err(|_| invalid())?,
        ),
        None => {
            let row = trimmed.parse::<usize>().map_err(|_| invalid())?;
            (row, row)
        }
    };

    if start == 0 || end < start || end > total {
        return Err(invalid());
    }

    Ok((start - 1..end).collect())
}
