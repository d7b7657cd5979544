//! The 404 page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Route handler for URLs that do not match any other route.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// The 404 page as a response, for handlers that detect a missing resource
/// themselves.
pub fn get_404_not_found_response() -> Response {
    let page = error_view(
        "Not Found",
        "404",
        "The page you are looking for does not exist.",
        "Check the URL or head back to the homepage",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}
