//! This file defines the routes for displaying the log-in page and handling log-in requests.

use std::path::PathBuf;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::{cookie::Key, PrivateCookieJar};
use axum_htmx::HxRedirect;
use maud::{html, Markup};
use serde::Deserialize;
use time::Duration;

use crate::{
    auth_cookie::{invalidate_auth_cookie, set_auth_cookie},
    credentials::{load_credentials, verify_credentials},
    endpoints,
    html::{base, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    AppState,
};

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect username or password.";

/// The state needed to perform a log in.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The path to the credential file.
    pub users_path: PathBuf,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            users_path: state.users_path.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
///
/// The username and password are stored as plain strings. There is no need
/// for validation here since they will be compared against the credential
/// file.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    /// Username entered during log-in.
    pub username: String,
    /// Password entered during log-in.
    pub password: String,
}

fn log_in_form(username: &str, error_message: Option<&str>) -> Markup {
    html! {
        form hx-post=(endpoints::LOG_IN_API) class="space-y-4 md:space-y-6"
        {
            div
            {
                label for="username" class=(FORM_LABEL_STYLE) { "Username" }

                input
                    type="text"
                    name="username"
                    id="username"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    autofocus
                    value=(username);
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Password" }

                input
                    type="password"
                    name="password"
                    id="password"
                    placeholder="••••••••"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;

                @if let Some(error_message) = error_message
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Log in" }
        }
    }
}

fn log_in_page(form: Markup) -> Markup {
    let content = html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto"
        {
            span class="flex items-center mb-6 text-2xl font-semibold text-gray-900 dark:text-white"
            {
                "Spreadbook"
            }

            div class="w-full bg-white rounded-lg shadow dark:border md:mt-0 sm:max-w-md xl:p-0 dark:bg-gray-800 dark:border-gray-700"
            {
                div class="p-6 space-y-4 md:space-y-6 sm:p-8"
                {
                    h1 class="text-xl font-bold leading-tight tracking-tight text-gray-900 md:text-2xl dark:text-white"
                    {
                        "Log in"
                    }

                    (form)
                }
            }
        }
    };

    base("Log in", &content)
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    Html(log_in_page(log_in_form("", None)).into_string()).into_response()
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is
/// redirected to the entries page. Otherwise, the form is returned with an
/// error message explaining the problem.
///
/// The credential file is re-read on every attempt so that edits to it take
/// effect without restarting the server.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(log_in_data): Form<LogInData>,
) -> Response {
    let credentials = match load_credentials(&state.users_path) {
        Ok(credentials) => credentials,
        Err(error) => {
            tracing::error!("Could not load the credential file: {error}");
            return Html(
                log_in_form(
                    &log_in_data.username,
                    Some("An internal error occurred. Please try again later."),
                )
                .into_string(),
            )
            .into_response();
        }
    };

    if !verify_credentials(&credentials, &log_in_data.username, &log_in_data.password) {
        return Html(
            log_in_form(&log_in_data.username, Some(INVALID_CREDENTIALS_ERROR_MSG)).into_string(),
        )
        .into_response();
    }

    set_auth_cookie(jar.clone(), &log_in_data.username, state.cookie_duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::ENTRIES_VIEW.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting auth cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
        })
        .into_response()
}
