//! Console demo: loads a few pages against the configured backend and logs
//! what each page would render.
//!
//! ```bash
//! RUST_LOG=info cargo run -- console.toml
//! ```

use seating_console::framework::UiState;
use seating_console::lifecycle::{setup_tracing, Console, ConsoleConfig};
use seating_console::model::OrderStatus;
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => ConsoleConfig::load(&path).map_err(|e| e.to_string())?,
        None => ConsoleConfig::default(),
    };
    info!(base_url = %config.api.base_url, "Starting console");

    let console = Console::new(config).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("colors_page");
    async {
        match console.colors.load().await {
            Ok(colors) => info!(count = colors.len(), "Colors loaded"),
            Err(e) => warn!(error = %e, "Colors failed to load"),
        }
        match console.colors.view().state {
            UiState::Error(banner) => warn!(message = %banner.message, "Colors page shows an error"),
            UiState::Empty => info!("Colors page is empty"),
            UiState::Populated(items) => info!(rows = items.len(), "Colors page populated"),
            UiState::Idle | UiState::Loading => {}
        }
    }
    .instrument(span)
    .await;

    let span = tracing::info_span!("orders_page");
    async {
        match console.orders.filter_status(Some(OrderStatus::Pending)).await {
            Ok(orders) => info!(count = orders.len(), "Pending orders loaded"),
            Err(e) => error!(error = %e, "Orders failed to load"),
        }
    }
    .instrument(span)
    .await;

    let cart = console.store.state().cart;
    info!(items = cart.item_count(), total = cart.total(), "Cart restored");

    console.shutdown().await.map_err(|e| e.to_string())?;

    info!("Console closed");
    Ok(())
}
