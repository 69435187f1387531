use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = docchat::config::Config::from_env();
    info!("Starting Docchat (API: {})", config.api_base_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Docchat"),
        ..Default::default()
    };

    eframe::run_native(
        "Docchat",
        options,
        Box::new(move |cc| Ok(Box::new(docchat::ui::DocChatApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
