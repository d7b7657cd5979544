use std::{
    env,
    fs::OpenOptions,
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
};

use axum::{
    extract::{MatchedPath, Request},
    Router,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use spreadbook::{build_router, graceful_shutdown, AppState};

/// The web server for spreadbook.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    /// Falls back to the SPREADBOOK_DB environment variable, then
    /// "spreadbook.db".
    #[arg(long)]
    db_path: Option<String>,

    /// File path to the JSON credential file.
    /// Falls back to the SPREADBOOK_USERS environment variable, then
    /// "users.json".
    #[arg(long)]
    users_path: Option<String>,

    /// The port to serve the app from.
    /// Falls back to the SPREADBOOK_PORT environment variable, then 3000.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let db_path = args
        .db_path
        .or_else(|| env::var("SPREADBOOK_DB").ok())
        .unwrap_or_else(|| "spreadbook.db".to_owned());

    let users_path = args
        .users_path
        .or_else(|| env::var("SPREADBOOK_USERS").ok())
        .unwrap_or_else(|| "users.json".to_owned());

    let port = args
        .port
        .or_else(|| {
            env::var("SPREADBOOK_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
        })
        .unwrap_or(3000);

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let connection = Connection::open(&db_path).expect("Could not open the database");
    let state = AppState::new(connection, &secret, PathBuf::from(&users_path))
        .expect("Could not initialise the application state");

    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("Using database '{db_path}' and credential file '{users_path}'");
    tracing::info!("HTTP server listening on {addr}");

    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // 5xx responses are logged where the error occurs, so the default
        // failure logging would only duplicate them.
        .on_failure(());

    router.layer(tracing_layer)
}
