//! Turning raw sheet cells into typed entry fields.
//!
//! The sanitiser is deliberately lenient: a cell that cannot be parsed
//! becomes a missing value rather than failing the whole upload, so stray
//! text in a numeric column never blocks an import.

use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

use crate::entry::EntryFields;

const SLASH_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");
const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a sheet cell as a number, or `None` if it is not one.
///
/// A comma is accepted as the decimal separator since that is how the source
/// spreadsheets write numbers.
pub(crate) fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();

    if cell.is_empty() {
        return None;
    }

    cell.parse::<f64>()
        .or_else(|_| cell.replace(',', ".").parse::<f64>())
        .ok()
        .filter(|number| number.is_finite())
}

/// Parse a sheet cell as a date, or `None` if it is not one.
///
/// Accepts dd/mm/yyyy and ISO yyyy-mm-dd.
pub(crate) fn parse_date(cell: &str) -> Option<Date> {
    let cell = cell.trim();

    Date::parse(cell, SLASH_DATE_FORMAT)
        .or_else(|_| Date::parse(cell, ISO_DATE_FORMAT))
        .ok()
}

fn parse_text(cell: &str) -> Option<String> {
    let trimmed = cell.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Convert raw sheet rows into entry fields using the mapped `headers` to
/// decide which cell feeds which field.
///
/// Cells under unrecognised headers and cells beyond the header row are
/// ignored. Running the output through the sanitiser again would change
/// nothing.
pub(crate) fn sanitize_rows(headers: &[String], rows: &[Vec<String>]) -> Vec<EntryFields> {
    rows.iter()
        .map(|row| {
            let mut fields = EntryFields::default();

            for (header, cell) in headers.iter().zip(row) {
                match header.as_str() {
                    "ref_kpm" => fields.ref_kpm = parse_text(cell),
                    "data" => fields.data = parse_date(cell),
                    "agente" => fields.agente = parse_text(cell),
                    "moeda" => fields.moeda = parse_text(cell),
                    "valor" => fields.valor = parse_number(cell),
                    "abs_valor" => fields.abs_valor = parse_number(cell),
                    "conversao" => fields.conversao = parse_number(cell),
                    "taxa_rec_cliente" => fields.taxa_rec_cliente = parse_number(cell),
                    "taxa_pgto_banco" => fields.taxa_pgto_banco = parse_number(cell),
                    "fator_conversao" => fields.fator_conversao = parse_number(cell),
                    "ganho" => fields.ganho = parse_number(cell),
                    _ => {}
                }
            }

            fields
        })
        .collect()
}

#[cfg(test)]
mod sanitize_tests {
    use time::macros::date;

    use crate::entry::EntryFields;

    use super::{parse_date, parse_number, sanitize_rows};

    #[test]
    fn numbers_accept_either_decimal_separator() {
        assert_eq!(parse_number("-150.25"), Some(-150.25));
        assert_eq!(parse_number("-150,25"), Some(-150.25));
        assert_eq!(parse_number(" 200 "), Some(200.0));
    }

    #[test]
    fn unparseable_numbers_become_missing_values() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn dates_accept_both_formats() {
        assert_eq!(parse_date("14/03/2025"), Some(date!(2025 - 03 - 14)));
        assert_eq!(parse_date("2025-03-14"), Some(date!(2025 - 03 - 14)));
        assert_eq!(parse_date("today"), None);
    }

    fn to_strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_owned()).collect()
    }

    #[test]
    fn rows_map_cells_onto_fields() {
        let headers = to_strings(&["ref_kpm", "data", "agente", "moeda", "valor"]);
        let rows = vec![to_strings(&[
            "KPM-001",
            "14/03/2025",
            "Banco Alfa",
            "USD",
            "-150,00",
        ])];

        let sanitized = sanitize_rows(&headers, &rows);

        assert_eq!(
            sanitized,
            vec![EntryFields {
                ref_kpm: Some("KPM-001".to_owned()),
                data: Some(date!(2025 - 03 - 14)),
                agente: Some("Banco Alfa".to_owned()),
                moeda: Some("USD".to_owned()),
                valor: Some(-150.0),
                ..EntryFields::default()
            }]
        );
    }

    #[test]
    fn stray_text_in_numeric_columns_becomes_missing() {
        let headers = to_strings(&["ref_kpm", "valor"]);
        let rows = vec![to_strings(&["KPM-001", "pending"])];

        let sanitized = sanitize_rows(&headers, &rows);

        assert_eq!(sanitized[0].valor, None);
        assert_eq!(sanitized[0].ref_kpm, Some("KPM-001".to_owned()));
    }

    #[test]
    fn short_rows_and_unknown_columns_are_tolerated() {
        let headers = to_strings(&["ref_kpm", "NOTES", "valor"]);
        let rows = vec![to_strings(&["KPM-001"])];

        let sanitized = sanitize_rows(&headers, &rows);

        assert_eq!(sanitized[0].ref_kpm, Some("KPM-001".to_owned()));
        assert_eq!(sanitized[0].valor, None);
    }

    #[test]
    fn sanitising_is_idempotent_for_parsed_values() {
        let headers = to_strings(&["valor", "taxa_rec_cliente"]);
        let rows = vec![to_strings(&["-150,25", "0,05"])];

        let first = sanitize_rows(&headers, &rows);
        let round_tripped = vec![to_strings(&[
            &first[0].valor.unwrap().to_string(),
            &first[0].taxa_rec_cliente.unwrap().to_string(),
        ])];
        let second = sanitize_rows(&headers, &round_tripped);

        assert_eq!(first, second);
    }
}
