//! Defines the app's routes and their auth middleware.

use axum::{
    extract::FromRef,
    middleware,
    response::Redirect,
    routing::{get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::{
    auth_middleware::{auth_guard, auth_guard_hx, AuthState},
    endpoints,
    entry::{
        create_entry_endpoint, delete_entry_endpoint, get_edit_entry_page, get_entries_page,
        get_new_entry_page, update_entry_endpoint,
    },
    import::{
        apply_rates_endpoint, get_import_page, get_import_review_page, save_import_endpoint,
        upload_sheets_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    AppState,
};

/// Return the router for the application.
///
/// The page and API routes sit behind the auth guard. Pages redirect to the
/// log-in page with a plain HTTP redirect, API routes with an HTMX redirect
/// header.
pub fn build_router(state: AppState) -> Router {
    let auth_state = AuthState::from_ref(&state);

    let protected_pages = Router::new()
        .route(
            endpoints::ROOT,
            get(|| async { Redirect::to(endpoints::ENTRIES_VIEW) }),
        )
        .route(endpoints::ENTRIES_VIEW, get(get_entries_page))
        .route(endpoints::NEW_ENTRY_VIEW, get(get_new_entry_page))
        .route(endpoints::EDIT_ENTRY_VIEW, get(get_edit_entry_page))
        .route(endpoints::IMPORT_VIEW, get(get_import_page))
        .route(endpoints::IMPORT_REVIEW_VIEW, get(get_import_review_page))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_guard,
        ));

    let protected_api = Router::new()
        .route(endpoints::ENTRIES_API, post(create_entry_endpoint))
        .route(
            endpoints::ENTRY_API,
            put(update_entry_endpoint).delete(delete_entry_endpoint),
        )
        .route(endpoints::IMPORT_API, post(upload_sheets_endpoint))
        .route(endpoints::IMPORT_RATES_API, post(apply_rates_endpoint))
        .route(endpoints::IMPORT_SAVE_API, post(save_import_endpoint))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_guard_hx));

    Router::new()
        .merge(protected_pages)
        .merge(protected_api)
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
