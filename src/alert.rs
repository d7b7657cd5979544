//! Alert fragments for displaying success and error messages to the user.
//!
//! Alerts are swapped into the page's `#alert-container` out-of-band so that
//! endpoint responses can report outcomes without re-rendering the page.

use maud::{html, Markup};

/// A success or error message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An action completed.
    Success {
        /// The headline of the alert.
        message: String,
        /// Extra context shown below the headline.
        details: String,
    },
    /// An action failed.
    Error {
        /// The headline of the alert.
        message: String,
        /// Extra context shown below the headline.
        details: String,
    },
    /// An action failed and the headline says it all.
    ErrorSimple {
        /// The headline of the alert.
        message: String,
    },
}

impl Alert {
    /// Render the alert as an out-of-band fragment for `#alert-container`.
    pub fn into_html(self) -> Markup {
        let (message, details, color_style) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-300",
            ),
            Alert::ErrorSimple { message } => (
                message,
                String::new(),
                "bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-300",
            ),
        };

        html! {
            div id="alert-container" hx-swap-oob="true" class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class={ "rounded p-4 shadow " (color_style) }
                {
                    p class="text-sm font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1 text-sm opacity-80" { (details) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod alert_tests {
    use scraper::Html;

    use super::Alert;

    #[test]
    fn success_alert_renders_message_and_details() {
        let markup = Alert::Success {
            message: "Saved".to_owned(),
            details: "3 rows were written.".to_owned(),
        }
        .into_html();

        let html = Html::parse_fragment(&markup.into_string());

        let message = html
            .select(&scraper::Selector::parse("#alert-container p.text-sm.font-medium").unwrap())
            .next()
            .expect("No alert message found")
            .text()
            .collect::<String>();
        assert_eq!(message.trim(), "Saved");

        let details = html
            .select(&scraper::Selector::parse("#alert-container p.mt-1.text-sm.opacity-80").unwrap())
            .next()
            .expect("No alert details found")
            .text()
            .collect::<String>();
        assert_eq!(details.trim(), "3 rows were written.");
    }

    #[test]
    fn simple_error_alert_has_no_details() {
        let markup = Alert::ErrorSimple {
            message: "File type must be CSV.".to_owned(),
        }
        .into_html();

        let html = Html::parse_fragment(&markup.into_string());

        assert!(html
            .select(&scraper::Selector::parse("p.mt-1.text-sm.opacity-80").unwrap())
            .next()
            .is_none());
    }
}
