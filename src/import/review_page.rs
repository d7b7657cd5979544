//! The review page for a pending import: the parsed rows, a form for
//! applying rates to a row selection and the save button.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use maud::{html, Markup};

use crate::{
    endpoints,
    entry::EntryFields,
    html::{
        base, format_amount, format_rate, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE,
    },
    import::PendingImport,
    navigation::NavBar,
    AppState, Error,
};

use crate::entry::format_form_date;

/// The state needed for rendering the review page.
#[derive(Debug, Clone)]
pub struct ReviewPageState {
    /// The upload waiting to be reviewed, if any.
    pub pending_import: Arc<Mutex<Option<PendingImport>>>,
}

impl FromRef<AppState> for ReviewPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            pending_import: state.pending_import.clone(),
        }
    }
}

fn review_row(row_number: usize, fields: &EntryFields) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (row_number) }
            td class=(TABLE_CELL_STYLE) { (fields.ref_kpm.as_deref().unwrap_or("")) }
            td class=(TABLE_CELL_STYLE) { (fields.data.map(format_form_date).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.agente.as_deref().unwrap_or("")) }
            td class=(TABLE_CELL_STYLE) { (fields.moeda.as_deref().unwrap_or("")) }
            td class=(TABLE_CELL_STYLE) { (fields.valor.map(format_amount).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.abs_valor.map(format_amount).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.conversao.map(format_amount).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.taxa_rec_cliente.map(format_rate).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.taxa_pgto_banco.map(format_rate).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.fator_conversao.map(format_rate).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.ganho.map(format_amount).unwrap_or_default()) }
        }
    }
}

fn review_table(pending: &PendingImport) -> Markup {
    // Row numbers run across batches so a selection like "3;5" can span two
    // sheets.
    let mut row_number = 0;

    html! {
        div class="relative overflow-x-auto shadow-md sm:rounded w-full mb-6"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "#" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "REF." }
                        th scope="col" class=(TABLE_CELL_STYLE) { "DATA" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "AGENTE" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "MOEDA" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "VALOR" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "ABS" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Conversão" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "TAXA REC CLIENTE" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "TAXA PAGA AO BANCO" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "FATOR CONVERSÃO" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "GANHO R$" }
                    }
                }

                tbody
                {
                    @for batch in &pending.batches {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="12" class="px-6 py-2 font-semibold text-gray-900 dark:text-white"
                            {
                                (batch.name)
                            }
                        }

                        @for fields in &batch.rows {
                            ({
                                row_number += 1;
                                review_row(row_number, fields)
                            })
                        }
                    }
                }
            }
        }
    }
}

fn rates_form() -> Markup {
    html! {
        form hx-post=(endpoints::IMPORT_RATES_API) class="flex flex-wrap items-end gap-2 mb-4"
        {
            div
            {
                label for="rows" class=(FORM_LABEL_STYLE) { "Rows (e.g. 2 or 3;5)" }

                input
                    type="text"
                    name="rows"
                    id="rows"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="taxa_rec_cliente" class=(FORM_LABEL_STYLE) { "Client rate" }

                input
                    type="number"
                    name="taxa_rec_cliente"
                    id="taxa_rec_cliente"
                    step="0.0001"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="taxa_pgto_banco" class=(FORM_LABEL_STYLE) { "Bank rate" }

                input
                    type="number"
                    name="taxa_pgto_banco"
                    id="taxa_pgto_banco"
                    step="0.0001"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply rates" }
        }
    }
}

fn save_form() -> Markup {
    html! {
        form hx-post=(endpoints::IMPORT_SAVE_API) class="w-full max-w-xs"
        {
            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save all rows" }
        }
    }
}

/// Display the rows of the pending import with the rate and save forms.
///
/// Redirects to the import page when there is no upload in progress.
pub async fn get_import_review_page(State(state): State<ReviewPageState>) -> Response {
    let pending = match state.pending_import.lock() {
        Ok(pending) => pending,
        Err(error) => {
            tracing::error!("could not acquire pending import lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let Some(pending) = pending.as_ref() else {
        return Redirect::to(endpoints::IMPORT_VIEW).into_response();
    };

    let content = html! {
        (NavBar::new(endpoints::IMPORT_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4"
            {
                "Review import (" (pending.row_count()) " rows)"
            }

            (review_table(pending))

            (rates_form())

            (save_form())
        }
    };

    Html(base("Review Import", &content).into_string()).into_response()
}

#[cfg(test)]
mod review_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        endpoints,
        entry::EntryFields,
        import::{PendingImport, SheetBatch},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{get_import_review_page, ReviewPageState};

    fn pending_with_two_batches() -> PendingImport {
        let row = |reference: &str| EntryFields {
            ref_kpm: Some(reference.to_owned()),
            data: Some(date!(2025 - 03 - 14)),
            agente: Some("Banco Alfa".to_owned()),
            moeda: Some("USD".to_owned()),
            valor: Some(-150.0),
            ..EntryFields::default()
        };

        PendingImport {
            batches: vec![
                SheetBatch {
                    name: "first.csv".to_owned(),
                    rows: vec![row("KPM-001"), row("KPM-002")],
                },
                SheetBatch {
                    name: "second.csv".to_owned(),
                    rows: vec![row("KPM-003")],
                },
            ],
        }
    }

    #[tokio::test]
    async fn review_page_numbers_rows_across_batches() {
        let state = ReviewPageState {
            pending_import: Arc::new(Mutex::new(Some(pending_with_two_batches()))),
        };

        let response = get_import_review_page(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let first_cells: Vec<String> = html
            .select(&Selector::parse("tbody tr td:first-child").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect();

        // Batch header rows carry the file name, data rows are numbered 1..3
        // across both batches.
        assert_eq!(
            first_cells,
            vec!["first.csv", "1", "2", "second.csv", "3"]
        );
    }

    #[tokio::test]
    async fn review_page_has_rate_and_save_forms() {
        let state = ReviewPageState {
            pending_import: Arc::new(Mutex::new(Some(pending_with_two_batches()))),
        };

        let response = get_import_review_page(State(state)).await;
        let html = parse_html_document(response).await;

        let form_endpoints: Vec<String> = html
            .select(&Selector::parse("form").unwrap())
            .map(|form| form.value().attr("hx-post").unwrap_or_default().to_owned())
            .collect();

        assert!(form_endpoints.contains(&endpoints::IMPORT_RATES_API.to_owned()));
        assert!(form_endpoints.contains(&endpoints::IMPORT_SAVE_API.to_owned()));
    }

    #[tokio::test]
    async fn review_page_redirects_without_pending_import() {
        let state = ReviewPageState {
            pending_import: Arc::new(Mutex::new(None)),
        };

        let response = get_import_review_page(State(state)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::IMPORT_VIEW
        );
    }
}
