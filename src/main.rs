//! Titan Chat - desktop client for the Titan chat server
//!
//! Streams answers from the server, showing the model's reasoning apart from
//! its final answer when thinking mode is on.

use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use titan_chat::app::App;

fn main() {
    // Initialize tracing subscriber for logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("titan_chat=info".parse().unwrap()))
        .init();

    info!("Starting Titan Chat v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = titan_chat::storage::init_storage() {
        tracing::warn!("Settings will not be persisted: {}", e);
    }

    // Launch Dioxus desktop application
    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            Config::default().with_window(
                WindowBuilder::new()
                    .with_title("Titan Chat")
                    .with_inner_size(LogicalSize::new(1200.0, 800.0)),
            ),
        )
        .launch(App);
}
