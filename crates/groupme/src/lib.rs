pub mod pages;
mod wire;

use std::path::Path;

use async_trait::async_trait;
use env::Env;
use eyre::{eyre, Error};
use model::{KarmaError, Message};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use url::Url;

pub use pages::{drain_pages, Page, PageSource, PAGE_LIMIT};
use wire::{HistoryEnvelope, UploadEnvelope};

const TOKEN_HEADER: &str = "X-Access-Token";

/// Client over the group-messaging REST API: message history, likes digest,
/// image hosting and the bot-post endpoint.
pub struct GroupMe {
    http: Client,
    base_url: Url,
    image_url: Url,
    token: String,
    group_id: u64,
    bot_id: String,
    max_pages: u32,
}

impl GroupMe {
    pub fn new(env: &Env) -> Result<GroupMe, Error> {
        Ok(GroupMe {
            http: Client::new(),
            base_url: Url::parse(env.base_url())?,
            image_url: Url::parse(env.image_url())?,
            token: env.token().to_owned(),
            group_id: env.group_id(),
            bot_id: env.bot_id().to_owned(),
            max_pages: env.max_pages(),
        })
    }

    fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, Error> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| eyre!("API base URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Pages through the whole history of the configured group, newest
    /// first. Partial history is an expected outcome, not an error.
    pub async fn fetch_all_messages(&self) -> Result<Vec<Message>, Error> {
        log::info!("fetching message history for group {}", self.group_id);
        let mut source = HistoryPages { api: self };
        drain_pages(&mut source, self.max_pages).await
    }

    async fn history_page(&self, before_id: Option<&str>) -> Result<Page, Error> {
        let group = self.group_id.to_string();
        let mut url = Self::endpoint(&self.base_url, &["groups", &group, "messages"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("token", &self.token);
            query.append_pair("limit", &PAGE_LIMIT.to_string());
            if let Some(before_id) = before_id {
                query.append_pair("before_id", before_id);
            }
        }

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(Page::Refused(status.as_u16()));
        }
        let envelope: HistoryEnvelope = response
            .json()
            .await
            .map_err(|err| KarmaError::Data(err.to_string()))?;
        let messages = envelope
            .response
            .ok_or_else(|| {
                KarmaError::Data("history body without response.messages".to_string())
            })?
            .messages;
        Ok(Page::Messages(messages))
    }

    /// Digest of liked messages over the given period, e.g. "month".
    /// Single page, no cursor.
    pub async fn liked_messages(&self, period: &str) -> Result<Vec<Message>, Error> {
        let group = self.group_id.to_string();
        let mut url = Self::endpoint(&self.base_url, &["groups", &group, "likes"])?;
        url.query_pairs_mut()
            .append_pair("token", &self.token)
            .append_pair("period", period);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(KarmaError::Transport {
                status: status.as_u16(),
                context: "likes digest",
            }
            .into());
        }
        let envelope: HistoryEnvelope = response
            .json()
            .await
            .map_err(|err| KarmaError::Data(err.to_string()))?;
        match envelope.response {
            Some(body) => Ok(body.messages),
            None => Err(KarmaError::Data(
                "likes digest body without response.messages".to_string(),
            )
            .into()),
        }
    }

    /// Uploads the file as raw bytes and returns the hosted URL.
    pub async fn upload_image(&self, path: &Path) -> Result<String, Error> {
        let data = tokio::fs::read(path).await?;
        log::info!("uploading {} ({} bytes)", path.display(), data.len());
        let url = Self::endpoint(&self.image_url, &["pictures"])?;

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "image/jpeg")
            .header(TOKEN_HEADER, &self.token)
            .body(data)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(KarmaError::Upload {
                status: status.as_u16(),
            }
            .into());
        }
        let envelope: UploadEnvelope = response
            .json()
            .await
            .map_err(|err| KarmaError::Data(err.to_string()))?;
        match envelope.payload.and_then(|payload| payload.picture_url) {
            Some(picture_url) => Ok(picture_url),
            None => {
                Err(KarmaError::Data("upload body without payload.picture_url".to_string()).into())
            }
        }
    }

    /// One-way post into the group on behalf of the bot. The caller gets
    /// the raw status and decides what failure means.
    pub async fn post_bot_message(
        &self,
        text: &str,
        picture_url: Option<&str>,
    ) -> Result<StatusCode, Error> {
        let mut url = Self::endpoint(&self.base_url, &["bots", "post"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("bot_id", &self.bot_id);
            query.append_pair("text", text);
            if let Some(picture_url) = picture_url {
                query.append_pair("picture_url", picture_url);
            }
        }

        let response = self
            .http
            .post(url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;
        Ok(response.status())
    }
}

struct HistoryPages<'a> {
    api: &'a GroupMe,
}

#[async_trait]
impl PageSource for HistoryPages<'_> {
    async fn page(&mut self, before_id: Option<&str>) -> Result<Page, Error> {
        self.api.history_page(before_id).await
    }
}
