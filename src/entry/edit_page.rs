//! The edit page, a prefilled form for changing an existing spread entry.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{Html, IntoResponse, Response},
};
use maud::{html, Markup};
use rusqlite::Connection;

use crate::{
    endpoints,
    entry::{get_entry, EntryId, SpreadEntry},
    html::{
        base, BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
    },
    navigation::NavBar,
    AppState, Error,
};

use super::create_endpoint::format_form_date;

/// The state needed for rendering the edit page.
#[derive(Debug, Clone)]
pub struct EditEntryPageState {
    /// The database connection for reading the entry being edited.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditEntryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn number_value(number: Option<f64>) -> String {
    number.map(|number| number.to_string()).unwrap_or_default()
}

fn edit_entry_form(entry: &SpreadEntry) -> Markup {
    let fields = &entry.fields;

    html! {
        form
            hx-put=(endpoints::format_endpoint(endpoints::ENTRY_API, entry.id))
            class="space-y-4 w-full"
        {
            div
            {
                label for="ref_kpm" class=(FORM_LABEL_STYLE) { "Reference" }

                input
                    type="text"
                    name="ref_kpm"
                    id="ref_kpm"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(fields.ref_kpm.as_deref().unwrap_or(""));
            }

            div
            {
                label for="data" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    type="text"
                    name="data"
                    id="data"
                    placeholder="dd/mm/yyyy"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(fields.data.map(format_form_date).unwrap_or_default());
            }

            div
            {
                label for="agente" class=(FORM_LABEL_STYLE) { "Agent" }

                input
                    type="text"
                    name="agente"
                    id="agente"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(fields.agente.as_deref().unwrap_or(""));
            }

            div
            {
                label for="moeda" class=(FORM_LABEL_STYLE) { "Currency" }

                input
                    type="text"
                    name="moeda"
                    id="moeda"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(fields.moeda.as_deref().unwrap_or(""));
            }

            div
            {
                label for="valor" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    type="number"
                    name="valor"
                    id="valor"
                    step="0.01"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(number_value(fields.valor))
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
                    value=(number_value(fields.taxa_rec_cliente));
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
                    value=(number_value(fields.taxa_pgto_banco));
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save changes" }
        }
    }
}

/// Display the form for editing the spread entry `entry_id`.
///
/// The derived columns are recomputed on the server when the form is saved.
pub async fn get_edit_entry_page(
    State(state): State<EditEntryPageState>,
    Path(entry_id): Path<EntryId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let entry = match get_entry(entry_id, &connection) {
        Ok(entry) => entry,
        Err(error) => return error.into_response(),
    };

    let content = html! {
        (NavBar::new(endpoints::ENTRIES_VIEW).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit entry " (entry.id) }

            (edit_entry_form(&entry))
        }
    };

    Html(base("Edit Entry", &content).into_string()).into_response()
}

#[cfg(test)]
mod edit_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        endpoints,
        entry::{insert_entry, EntryFields},
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::{get_edit_entry_page, EditEntryPageState};

    fn get_test_state() -> EditEntryPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        EditEntryPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn edit_page_prefills_form_with_entry_values() {
        let state = get_test_state();
        let entry_id = {
            let connection = state.db_connection.lock().unwrap();
            insert_entry(
                &EntryFields {
                    ref_kpm: Some("KPM-001".to_owned()),
                    data: Some(date!(2025 - 03 - 14)),
                    agente: Some("Banco Alfa".to_owned()),
                    moeda: Some("USD".to_owned()),
                    valor: Some(-150.0),
                    taxa_rec_cliente: Some(0.05),
                    taxa_pgto_banco: Some(0.03),
                    ..EntryFields::default()
                },
                &connection,
            )
            .unwrap()
            .id
        };

        let response = get_edit_entry_page(State(state), Path(entry_id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::ENTRY_API, entry_id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "ref_kpm", "text", "KPM-001");
        assert_form_input_with_value(&form, "data", "text", "14/03/2025");
        assert_form_input_with_value(&form, "agente", "text", "Banco Alfa");
        assert_form_input_with_value(&form, "moeda", "text", "USD");
        assert_form_input_with_value(&form, "valor", "number", "-150");
        assert_form_input_with_value(&form, "taxa_rec_cliente", "number", "0.05");
        assert_form_input_with_value(&form, "taxa_pgto_banco", "number", "0.03");
    }

    #[tokio::test]
    async fn edit_page_returns_404_for_unknown_entry() {
        let state = get_test_state();

        let response = get_edit_entry_page(State(state), Path(1337)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
