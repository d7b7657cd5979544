//! Parsing uploaded CSV data into a raw sheet of header and cell strings.

use crate::Error;

/// A raw uploaded sheet, before header mapping and sanitisation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sheet {
    /// The file name of the uploaded sheet.
    pub name: String,
    /// The header row, with surrounding whitespace trimmed.
    pub headers: Vec<String>,
    /// The data rows. Rows may be shorter or longer than the header row.
    pub rows: Vec<Vec<String>>,
}

/// Parse CSV `data` into a [Sheet].
///
/// Rows are allowed to have a different number of cells than the header row
/// since hand-edited spreadsheets often have ragged rows.
///
/// # Errors
/// Returns an [Error::InvalidSheet] if the data is not valid CSV.
pub(crate) fn parse_sheet(name: &str, data: &str) -> Result<Sheet, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidSheet(error.to_string()))?
        .iter()
        .map(|header| header.trim().to_owned())
        .collect();

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|record| record.iter().map(|cell| cell.to_owned()).collect())
                .map_err(|error| Error::InvalidSheet(error.to_string()))
        })
        .collect::<Result<Vec<Vec<String>>, Error>>()?;

    Ok(Sheet {
        name: name.to_owned(),
        headers,
        rows,
    })
}
