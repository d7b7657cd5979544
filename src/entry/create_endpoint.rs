//! The endpoint for creating a spread entry from the manual entry form.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

use crate::{
    endpoints,
    entry::{insert_entry, EntryFields},
    AppState, Error,
};

/// The state needed for creating entries.
#[derive(Debug, Clone)]
pub struct CreateEntryState {
    /// The database connection for writing entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The date format used by the entry forms, e.g. "14/03/2025".
const FORM_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");

/// Parse a date from the entry forms.
///
/// An empty or blank string is treated as "no date".
///
/// # Errors
/// Returns an [Error::InvalidDateFormat] if the string is not a valid
/// dd/mm/yyyy date.
pub(super) fn parse_form_date(input: &str) -> Result<Option<Date>, Error> {
    let input = input.trim();

    if input.is_empty() {
        return Ok(None);
    }

    Date::parse(input, FORM_DATE_FORMAT)
        .map(Some)
        .map_err(|_| Error::InvalidDateFormat(input.to_owned()))
}

/// Render a date the way the entry forms and the tables display it.
pub(crate) fn format_form_date(date: Date) -> String {
    date.format(FORM_DATE_FORMAT).unwrap_or_default()
}

/// Parse a numeric field from the entry forms.
///
/// An empty or blank string is treated as "no value". A comma is accepted as
/// the decimal separator since that is how the source spreadsheets write
/// numbers.
///
/// # Errors
/// Returns an [Error::InvalidNumber] if the string is not a number.
pub(super) fn parse_form_number(input: &str) -> Result<Option<f64>, Error> {
    let input = input.trim();

    if input.is_empty() {
        return Ok(None);
    }

    let parsed = input
        .parse::<f64>()
        .or_else(|_| input.replace(',', ".").parse::<f64>());

    match parsed {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(Error::InvalidNumber(input.to_owned())),
    }
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// The raw data submitted by the manual entry form and the edit form.
///
/// Everything arrives as strings so that empty inputs can be mapped to NULL
/// columns instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntryForm {
    /// The external transaction reference.
    pub ref_kpm: String,
    /// The transaction date, as dd/mm/yyyy.
    pub data: String,
    /// The agent the transaction was made through.
    pub agente: String,
    /// The transaction currency.
    pub moeda: String,
    /// The signed transaction amount.
    pub valor: String,
    /// The rate charged to the client.
    pub taxa_rec_cliente: String,
    /// The rate paid to the bank.
    pub taxa_pgto_banco: String,
}

impl EntryForm {
    /// Convert the raw form data into entry fields, recomputing the derived
    /// fields when the amount and both rates are present.
    ///
    /// # Errors
    /// Returns an [Error::InvalidDateFormat] or [Error::InvalidNumber] if a
    /// non-empty field cannot be parsed.
    pub(super) fn try_into_fields(self) -> Result<EntryFields, Error> {
        let mut fields = EntryFields {
            ref_kpm: non_empty(self.ref_kpm),
            data: parse_form_date(&self.data)?,
            agente: non_empty(self.agente),
            moeda: non_empty(self.moeda),
            valor: parse_form_number(&self.valor)?,
            taxa_rec_cliente: parse_form_number(&self.taxa_rec_cliente)?,
            taxa_pgto_banco: parse_form_number(&self.taxa_pgto_banco)?,
            ..EntryFields::default()
        };

        fields.recalculate();

        Ok(fields)
    }
}

/// Create a new spread entry from the manual entry form and redirect the
/// client to the entries page.
pub async fn create_entry_endpoint(
    State(state): State<CreateEntryState>,
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

    match insert_entry(&fields, &connection) {
        Ok(entry) => {
            tracing::info!("created entry {}", entry.id);
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

#[cfg(test)]
mod form_parsing_tests {
    use time::macros::date;

    use crate::Error;

    use super::{format_form_date, parse_form_date, parse_form_number, EntryForm};

    #[test]
    fn parses_and_formats_form_dates() {
        assert_eq!(parse_form_date("14/03/2025"), Ok(Some(date!(2025 - 03 - 14))));
        assert_eq!(parse_form_date("  "), Ok(None));
        assert_eq!(format_form_date(date!(2025 - 03 - 14)), "14/03/2025");
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(
            parse_form_date("2025-03-14"),
            Err(Error::InvalidDateFormat("2025-03-14".to_owned()))
        );
        assert_eq!(
            parse_form_date("32/01/2025"),
            Err(Error::InvalidDateFormat("32/01/2025".to_owned()))
        );
    }

    #[test]
    fn parses_numbers_with_either_decimal_separator() {
        assert_eq!(parse_form_number("-150.25"), Ok(Some(-150.25)));
        assert_eq!(parse_form_number("-150,25"), Ok(Some(-150.25)));
        assert_eq!(parse_form_number(""), Ok(None));
        assert_eq!(
            parse_form_number("abc"),
            Err(Error::InvalidNumber("abc".to_owned()))
        );
    }

    #[test]
    fn form_conversion_recomputes_derived_fields() {
        let form = EntryForm {
            ref_kpm: "KPM-001".to_owned(),
            data: "14/03/2025".to_owned(),
            agente: "Banco Alfa".to_owned(),
            moeda: "USD".to_owned(),
            valor: "-150".to_owned(),
            taxa_rec_cliente: "0.05".to_owned(),
            taxa_pgto_banco: "0.03".to_owned(),
        };

        let fields = form.try_into_fields().expect("Could not parse form");

        assert_eq!(fields.abs_valor, Some(150.0));
        assert_eq!(fields.conversao, Some(7.5));
        assert!((fields.fator_conversao.unwrap() - 0.02).abs() < 1e-9);
        assert!((fields.ganho.unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn form_conversion_maps_blank_inputs_to_missing_values() {
        let form = EntryForm {
            ref_kpm: "  ".to_owned(),
            ..EntryForm::default()
        };

        let fields = form.try_into_fields().expect("Could not parse form");

        assert_eq!(fields, crate::entry::EntryFields::default());
    }
}
