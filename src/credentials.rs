//! Loading and checking the static credential list.
//!
//! Credentials live in a JSON file next to the server, an array of
//! `{"username": ..., "password": ...}` objects. The file is re-read on every
//! log-in attempt so edits take effect without a restart.

use std::path::Path;

use serde::Deserialize;

use crate::Error;

/// A username and password pair from the credential file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Credential {
    /// The log-in name.
    pub username: String,
    /// The plaintext password.
    pub password: String,
}

/// Read and parse the credential file at `path`.
///
/// # Errors
/// Returns [Error::CredentialFile] if the file cannot be read or is not a
/// JSON array of credential objects.
pub fn load_credentials(path: &Path) -> Result<Vec<Credential>, Error> {
    let contents = std::fs::read_to_string(path)
        .map_err(|error| Error::CredentialFile(format!("{}: {error}", path.display())))?;

    serde_json::from_str(&contents)
        .map_err(|error| Error::CredentialFile(format!("{}: {error}", path.display())))
}

/// Check `username` and `password` against the credential list.
pub fn verify_credentials(credentials: &[Credential], username: &str, password: &str) -> bool {
    credentials
        .iter()
        .any(|credential| credential.username == username && credential.password == password)
}
