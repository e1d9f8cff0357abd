mod config;
mod i18n;
mod maintenance;
mod tui;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = config::Config::load_or_default()?;
    log::debug!("loaded config: {:?}", config);

    tui::run(config).await?;

    Ok(())
}
