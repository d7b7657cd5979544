//! The manual entry page, a form for recording a single spread entry by hand.

use axum::response::{Html, IntoResponse, Response};
use maud::{html, Markup};

use crate::{
    endpoints,
    html::{
        base, BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
    },
    navigation::NavBar,
};

fn new_entry_form() -> Markup {
    html! {
        form hx-post=(endpoints::ENTRIES_API) class="space-y-4 w-full"
        {
            div
            {
                label for="ref_kpm" class=(FORM_LABEL_STYLE) { "Reference" }

                input
                    type="text"
                    name="ref_kpm"
                    id="ref_kpm"
                    class=(FORM_TEXT_INPUT_STYLE)
                    autofocus;
            }

            div
            {
                label for="data" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    type="text"
                    name="data"
                    id="data"
                    placeholder="dd/mm/yyyy"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="agente" class=(FORM_LABEL_STYLE) { "Agent" }

                input
                    type="text"
                    name="agente"
                    id="agente"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="moeda" class=(FORM_LABEL_STYLE) { "Currency" }

                input
                    type="text"
                    name="moeda"
                    id="moeda"
                    placeholder="USD"
                    class=(FORM_TEXT_INPUT_STYLE);
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
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="taxa_pgto_banco" class=(FORM_LABEL_STYLE) { "Bank rate" }

                input
                    type="number"
                    name="taxa_pgto_banco"
                    id="taxa_pgto_banco"
                    step="0.0001"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create entry" }
        }
    }
}

/// Display the form for creating a spread entry by hand.
///
/// The derived columns are not part of the form. They are recomputed on the
/// server from the amount and the two rates.
pub async fn get_new_entry_page() -> Response {
    let content = html! {
        (NavBar::new(endpoints::NEW_ENTRY_VIEW).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New entry" }

            (new_entry_form())
        }
    };

    Html(base("New Entry", &content).into_string()).into_response()
}
