use ghostwalk::app::App;
use ghostwalk::constants::LOOP_TIME;
use ghostwalk::formatter::CustomFormatter;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("debug"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().event_format(CustomFormatter))
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}

/// Runs one unattended session: no input, silent audio, until the ghost encounter resolves.
fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut app = App::new()?;

    info!(loop_time = ?LOOP_TIME, "Starting session loop");
    while app.run() {}

    Ok(())
}
