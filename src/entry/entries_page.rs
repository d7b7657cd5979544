//! The entries page: a searchable table of every spread entry with links to
//! edit and buttons to delete each row.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{Html, IntoResponse, Response},
};
use maud::{html, Markup};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    endpoints,
    entry::{all_entries, SpreadEntry},
    html::{
        base, format_amount, format_rate, BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
    },
    navigation::NavBar,
    AppState, Error,
};

use super::create_endpoint::format_form_date;

/// The state needed for rendering the entries page.
#[derive(Debug, Clone)]
pub struct EntriesPageState {
    /// The database connection for reading entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EntriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters of the entries page.
#[derive(Debug, Default, Deserialize)]
pub struct EntriesQuery {
    /// A search string that filters the table on the text columns.
    pub q: Option<String>,
}

fn search_form(filter: &str) -> Markup {
    html! {
        form method="get" action=(endpoints::ENTRIES_VIEW) class="flex gap-2 w-full max-w-md mb-4"
        {
            input
                type="search"
                name="q"
                placeholder="Search by reference, agent or currency"
                class=(FORM_TEXT_INPUT_STYLE)
                value=(filter);

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Search" }
        }
    }
}

fn optional_text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn entry_row(entry: &SpreadEntry) -> Markup {
    let fields = &entry.fields;

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (entry.id) }
            td class=(TABLE_CELL_STYLE) { (optional_text(&fields.ref_kpm)) }
            td class=(TABLE_CELL_STYLE) { (fields.data.map(format_form_date).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (optional_text(&fields.agente)) }
            td class=(TABLE_CELL_STYLE) { (optional_text(&fields.moeda)) }
            td class=(TABLE_CELL_STYLE) { (fields.valor.map(format_amount).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.abs_valor.map(format_amount).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.conversao.map(format_amount).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.taxa_rec_cliente.map(format_rate).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.taxa_pgto_banco.map(format_rate).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.fator_conversao.map(format_rate).unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (fields.ganho.map(format_amount).unwrap_or_default()) }

            td class=(TABLE_CELL_STYLE)
            {
                a
                    href=(endpoints::format_endpoint(endpoints::EDIT_ENTRY_VIEW, entry.id))
                    class=(LINK_STYLE)
                {
                    "Edit"
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(endpoints::format_endpoint(endpoints::ENTRY_API, entry.id))
                    hx-confirm="Delete this entry?"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

fn entries_table(entries: &[SpreadEntry]) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md sm:rounded w-full"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
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
                        th scope="col" class=(TABLE_CELL_STYLE) { "" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "" }
                    }
                }

                tbody
                {
                    @for entry in entries {
                        (entry_row(entry))
                    }
                }
            }
        }
    }
}

fn entries_page(entries: &[SpreadEntry], filter: &str) -> Markup {
    let content = html! {
        (NavBar::new(endpoints::ENTRIES_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex items-center justify-between w-full mb-4"
            {
                h1 class="text-xl font-bold" { "Entries" }

                a href=(endpoints::NEW_ENTRY_VIEW) class=(LINK_STYLE) { "New entry" }
            }

            (search_form(filter))

            @if entries.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No entries found." }
            } @else {
                (entries_table(entries))
            }
        }
    };

    base("Entries", &content)
}

/// Display every spread entry, optionally filtered by the `q` query
/// parameter.
pub async fn get_entries_page(
    State(state): State<EntriesPageState>,
    Query(query): Query<EntriesQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let filter = query.q.as_deref().unwrap_or("");

    match all_entries(query.q.as_deref(), &connection) {
        Ok(entries) => Html(entries_page(&entries, filter).into_string()).into_response(),
        Err(error) => error.into_response(),
    }
}
