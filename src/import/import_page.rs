//! The import page, a form for uploading CSV sheets.

use axum::response::{Html, IntoResponse, Response};
use maud::{html, Markup};

use crate::{
    endpoints,
    html::{
        base, BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_TEXT_INPUT_STYLE,
    },
    navigation::NavBar,
};

fn import_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::IMPORT_API)
            hx-encoding="multipart/form-data"
            class="space-y-4 w-full"
        {
            fieldset class=(FORM_RADIO_GROUP_STYLE)
            {
                legend class=(FORM_LABEL_STYLE) { "Upload mode" }

                div class="flex items-center gap-2"
                {
                    input
                        type="radio"
                        name="mode"
                        id="mode_single"
                        value="single"
                        class=(FORM_RADIO_INPUT_STYLE)
                        checked;

                    label for="mode_single" class=(FORM_LABEL_STYLE)
                    {
                        "Single sheet (one or more files)"
                    }
                }

                div class="flex items-center gap-2"
                {
                    input
                        type="radio"
                        name="mode"
                        id="mode_workbook"
                        value="workbook"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label for="mode_workbook" class=(FORM_LABEL_STYLE)
                    {
                        "Workbook (at least two files)"
                    }
                }
            }

            div
            {
                label for="sheets" class=(FORM_LABEL_STYLE) { "CSV sheets" }

                input
                    type="file"
                    name="sheets"
                    id="sheets"
                    accept=".csv,text/csv"
                    class=(FORM_TEXT_INPUT_STYLE)
                    multiple
                    required;
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Upload" }
        }
    }
}

/// Display the form for uploading CSV sheets of spread entries.
pub async fn get_import_page() -> Response {
    let content = html! {
        (NavBar::new(endpoints::IMPORT_VIEW).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Import" }

            p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
            {
                "Upload one or more CSV sheets. \
                The rows can be reviewed before they are saved."
            }

            (import_form())
        }
    };

    Html(base("Import", &content).into_string()).into_response()
}
