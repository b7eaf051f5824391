//! docportal
//!
//! HTTP server and command-line tools for the portal navigation kernel.

use std::net::SocketAddr;

use anyhow::{Context, Result, bail};
use axum::http::{HeaderValue, Method};
use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use docportal_kernel::access::SessionState;
use docportal_kernel::labels::render_trail;
use docportal_kernel::navigation::NavigationOutcome;
use docportal_kernel::routing::{BreadcrumbSpec, RouteNode, portal_routes};
use docportal_kernel::{AppState, Config, build_router};

/// Navigation kernel for the documents portal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Print the route tree with breadcrumbs and guards.
    Routes,
    /// Print the breadcrumb trail of a URL as an anonymous visitor.
    Trail {
        url: String,
        /// Display language (defaults to DEFAULT_LANGUAGE).
        #[arg(long)]
        lang: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Routes => {
            print_routes();
            Ok(())
        }
        Command::Trail { url, lang } => print_trail(config, &url, lang.as_deref()).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting docportal kernel");
    info!(
        port = config.port,
        api = %config.api_base_url,
        "Configuration loaded"
    );

    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    let app = build_router(state)
        .layer(build_cors_layer(&config))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn print_routes() {
    let table = portal_routes();
    for (depth, node) in table.walk() {
        let data = node.data();
        let path = if node.path().is_empty() {
            "''"
        } else {
            node.path()
        };

        let mut line = format!("{}{path}", "  ".repeat(depth));
        match &data.breadcrumb {
            Some(BreadcrumbSpec::Literal(token)) => line.push_str(&format!("  [{token}]")),
            Some(BreadcrumbSpec::Computed(_)) => line.push_str("  [computed]"),
            None => {}
        }
        line.push_str(&guard_summary(node));
        println!("{line}");
    }
}

fn guard_summary(node: &RouteNode) -> String {
    let data = node.data();
    let mut parts = Vec::new();
    if data.requires_auth {
        parts.push("auth".to_string());
    }
    if data.guest_only {
        parts.push("guest".to_string());
    }
    if let Some(access) = &data.access {
        parts.push(access.describe());
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("  ({})", parts.join(", "))
    }
}

async fn print_trail(config: Config, url: &str, lang: Option<&str>) -> Result<()> {
    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    let lang = lang.unwrap_or(state.default_language());
    let Some(language) = state.language(lang) else {
        bail!("unknown language: {lang}");
    };

    let outcome = state
        .navigator()
        .navigate(url, &SessionState::signed_out())
        .await;

    let end = match &outcome {
        NavigationOutcome::Completed(end) => end,
        NavigationOutcome::Redirected { to, end: Some(end), .. } => {
            println!("redirected to {to}");
            end
        }
        other => bail!("navigation did not complete: {other:?}"),
    };

    for crumb in render_trail(&end.breadcrumbs, state.labels().store(), language) {
        println!("{}\t{}", crumb.text, crumb.url);
    }
    Ok(())
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let methods = [Method::GET, Method::PUT, Method::OPTIONS];

    if config.cors_allowed_origins.len() == 1 && config.cors_allowed_origins[0] == "*" {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([
                axum::http::header::AUTHORIZATION,
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT_LANGUAGE,
            ])
            .allow_credentials(true)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
