//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/entries/{entry_id}', use [format_endpoint].

/// The root route which redirects to the entry list or log in page.
pub const ROOT: &str = "/";
/// The page for displaying the saved entries.
pub const ENTRIES_VIEW: &str = "/entries";
/// The page for creating a new entry by hand.
pub const NEW_ENTRY_VIEW: &str = "/entries/new";
/// The page for editing an existing entry.
pub const EDIT_ENTRY_VIEW: &str = "/entries/{entry_id}/edit";
/// The page for uploading spreadsheet files.
pub const IMPORT_VIEW: &str = "/import";
/// The page for reviewing an upload before saving it.
pub const IMPORT_REVIEW_VIEW: &str = "/import/review";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create an entry.
pub const ENTRIES_API: &str = "/api/entries";
/// The route to update or delete a single entry.
pub const ENTRY_API: &str = "/api/entries/{entry_id}";
/// The route to upload spreadsheet files.
pub const IMPORT_API: &str = "/api/import";
/// The route to apply rates to rows of the pending upload.
pub const IMPORT_RATES_API: &str = "/api/import/rates";
/// The route to save the pending upload to the database.
pub const IMPORT_SAVE_API: &str = "/api/import/save";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/entries/{entry_id}', '{entry_id}' is
/// the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
