use std::time::Duration;

use eyre::Context;
use log::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;

    let env = env::Env::load().context("Failed to load configuration")?;
    let api = groupme::GroupMe::new(&env).context("Failed to create API client")?;
    let karma = karma::Karma::new(api, &env);

    match env.tick_minutes() {
        Some(minutes) => {
            info!("Posting updates every {} minutes", minutes);
            bg_process::start(karma, Duration::from_secs(minutes * 60));
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown")?;
            info!("Shutting down");
        }
        None => {
            info!("Running one update");
            karma.update_all().await?;
        }
    }

    Ok(())
}
