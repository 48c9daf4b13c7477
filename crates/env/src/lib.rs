use std::{env::var, sync::Arc};

use dotenv::dotenv;
use eyre::{Context, Error};

const DEFAULT_BASE_URL: &str = "https://api.groupme.com/v3";
const DEFAULT_IMAGE_URL: &str = "https://image.groupme.com";
const DEFAULT_CHART_DIR: &str = "./pics";
const DEFAULT_MAX_PAGES: u32 = 500;

#[derive(Clone)]
pub struct Env(Arc<EnvInner>);

struct EnvInner {
    token: String,
    bot_id: String,
    group_id: u64,
    base_url: String,
    image_url: String,
    chart_dir: String,
    suppress_self_likes: bool,
    tick_minutes: Option<u64>,
    max_pages: u32,
}

impl Env {
    pub fn token(&self) -> &str {
        &self.0.token
    }

    pub fn bot_id(&self) -> &str {
        &self.0.bot_id
    }

    pub fn group_id(&self) -> u64 {
        self.0.group_id
    }

    pub fn base_url(&self) -> &str {
        &self.0.base_url
    }

    pub fn image_url(&self) -> &str {
        &self.0.image_url
    }

    pub fn chart_dir(&self) -> &str {
        &self.0.chart_dir
    }

    pub fn suppress_self_likes(&self) -> bool {
        self.0.suppress_self_likes
    }

    /// `None` means one pipeline run per process invocation.
    pub fn tick_minutes(&self) -> Option<u64> {
        self.0.tick_minutes
    }

    pub fn max_pages(&self) -> u32 {
        self.0.max_pages
    }

    pub fn load() -> Result<Env, Error> {
        if let Err(err) = dotenv() {
            log::info!("no .env file loaded: {}", err);
        }

        let group_id = var("GROUPME_GROUP_ID")
            .context("GROUPME_GROUP_ID is not set")?
            .parse::<u64>()
            .context("GROUPME_GROUP_ID must be a numeric group identifier")?;

        let suppress_self_likes = match var("SUPPRESS_SELF_LIKES") {
            Ok(value) => value
                .parse::<bool>()
                .context("SUPPRESS_SELF_LIKES must be true or false")?,
            Err(_) => false,
        };

        let tick_minutes = match var("TICK_MINUTES") {
            Ok(value) => {
                let minutes = value
                    .parse::<u64>()
                    .context("TICK_MINUTES must be a number of minutes")?;
                (minutes > 0).then_some(minutes)
            }
            Err(_) => None,
        };

        let max_pages = match var("MAX_PAGES") {
            Ok(value) => value
                .parse::<u32>()
                .context("MAX_PAGES must be a page count")?,
            Err(_) => DEFAULT_MAX_PAGES,
        };

        Ok(Env(Arc::new(EnvInner {
            token: var("GROUPME_TOKEN").context("GROUPME_TOKEN is not set")?,
            bot_id: var("GROUPME_BOT_ID").context("GROUPME_BOT_ID is not set")?,
            group_id,
            base_url: var("GROUPME_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            image_url: var("GROUPME_IMAGE_URL").unwrap_or_else(|_| DEFAULT_IMAGE_URL.to_string()),
            chart_dir: var("CHART_DIR").unwrap_or_else(|_| DEFAULT_CHART_DIR.to_string()),
            suppress_self_likes,
            tick_minutes,
            max_pages,
        })))
    }
}
