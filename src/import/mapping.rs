//! Mapping spreadsheet column names onto the spread table columns.

use crate::Error;

/// The spreadsheet header names and the table columns they map to.
///
/// Headers that already use a table column name pass through unchanged, so
/// mapping is idempotent and exported sheets can be re-imported.
const COLUMN_MAP: [(&str, &str); 11] = [
    ("REF.", "ref_kpm"),
    ("DATA", "data"),
    ("AGENTE", "agente"),
    ("MOEDA", "moeda"),
    ("VALOR", "valor"),
    ("ABS", "abs_valor"),
    ("Conversão", "conversao"),
    ("TAXA REC CLIENTE", "taxa_rec_cliente"),
    ("TAXA PAGA AO BANCO", "taxa_pgto_banco"),
    ("FATOR CONVERSÃO", "fator_conversao"),
    ("GANHO R$", "ganho"),
];

/// The table columns a sheet must provide for its rows to be importable.
const REQUIRED_COLUMNS: [&str; 5] = ["ref_kpm", "data", "agente", "moeda", "valor"];

/// Map sheet `headers` onto table column names and check that the required
/// columns are all present.
///
/// Unrecognised headers are kept as-is so their cells are simply ignored by
/// the sanitiser.
///
/// # Errors
/// Returns an [Error::MissingColumns] listing the required columns that were
/// not found.
pub(crate) fn map_headers(headers: &[String]) -> Result<Vec<String>, Error> {
    let mapped: Vec<String> = headers
        .iter()
        .map(|header| {
            let header = header.trim();

            COLUMN_MAP
                .iter()
                .find(|(sheet_name, _)| *sheet_name == header)
                .map(|(_, column)| (*column).to_owned())
                .unwrap_or_else(|| header.to_owned())
        })
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !mapped.iter().any(|column| column == *required))
        .map(|required| (*required).to_owned())
        .collect();

    if missing.is_empty() {
        Ok(mapped)
    } else {
        Err(Error::MissingColumns {
            missing,
            available: mapped,
        })
    }
}
