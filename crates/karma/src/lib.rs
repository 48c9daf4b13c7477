pub mod aggregate;
pub mod pairs;

use std::path::PathBuf;

use env::Env;
use eyre::Error;
use groupme::GroupMe;
use model::{AggregateSeries, MessageTable};

pub use aggregate::{total_likes, total_messages};
pub use pairs::like_pairs;

/// How many bars end up on a chart.
pub const TOP_ENTRIES: usize = 5;

/// The closed set of aggregates a pipeline run can publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    TotalLikes,
    TotalMessages,
}

impl AggregateKind {
    pub fn title(&self) -> &'static str {
        match self {
            AggregateKind::TotalLikes => "Total Likes",
            AggregateKind::TotalMessages => "Total Messages",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            AggregateKind::TotalLikes => "total_likes.png",
            AggregateKind::TotalMessages => "total_messages.png",
        }
    }

    pub fn series(&self, table: &MessageTable) -> AggregateSeries {
        match self {
            AggregateKind::TotalLikes => total_likes(table),
            AggregateKind::TotalMessages => total_messages(table),
        }
    }

    /// Text posted next to the chart, stamped with the oldest row covered.
    pub fn caption(&self, table: &MessageTable) -> String {
        let since = table
            .oldest_timestamp()
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        match self {
            AggregateKind::TotalLikes => format!("All Karma gained since: \n{since}"),
            AggregateKind::TotalMessages => format!("All Messages sent since: \n{since}"),
        }
    }
}

pub struct Karma {
    api: GroupMe,
    chart_dir: PathBuf,
    suppress_self_likes: bool,
}

impl Karma {
    pub fn new(api: GroupMe, env: &Env) -> Karma {
        Karma {
            api,
            chart_dir: PathBuf::from(env.chart_dir()),
            suppress_self_likes: env.suppress_self_likes(),
        }
    }

    pub async fn update_all(&self) -> Result<(), Error> {
        self.update(&[AggregateKind::TotalLikes, AggregateKind::TotalMessages])
            .await
    }

    /// One full pipeline run: fetch, build the table once, then render,
    /// upload and post each requested aggregate in turn.
    pub async fn update(&self, kinds: &[AggregateKind]) -> Result<(), Error> {
        let messages = self.api.fetch_all_messages().await?;
        log::info!("fetched {} messages", messages.len());
        let table = MessageTable::build(messages, self.suppress_self_likes)?;
        if table.is_empty() {
            log::warn!("no messages in the fetched window, nothing to post");
            return Ok(());
        }

        for kind in kinds {
            let mut series = kind.series(&table);
            series.sort_desc();
            let series = series.top(TOP_ENTRIES);

            let path = self.chart_dir.join(kind.file_name());
            chart::render_bar_chart(&series, kind.title(), &path)?;
            let picture_url = self.api.upload_image(&path).await?;
            let status = self
                .api
                .post_bot_message(&kind.caption(&table), Some(&picture_url))
                .await?;
            log::info!("posted {} update: {}", kind.title(), status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Message;

    fn message(id: &str, created_at: i64) -> Message {
        Message {
            id: id.to_string(),
            name: "Avery".to_string(),
            sender_id: "A".to_string(),
            user_id: "A".to_string(),
            text: Some("hello".to_string()),
            created_at,
            favorited_by: vec![],
        }
    }

    #[test]
    fn captions_carry_the_oldest_row_timestamp() {
        let table = MessageTable::build(
            vec![message("1", 1_600_000_000), message("2", 1_700_000_000)],
            false,
        )
        .unwrap();

        let caption = AggregateKind::TotalLikes.caption(&table);
        assert_eq!(caption, "All Karma gained since: \n2020-09-13 12:26:40");

        let caption = AggregateKind::TotalMessages.caption(&table);
        assert!(caption.starts_with("All Messages sent since: \n"));
    }

    #[test]
    fn kinds_pick_their_aggregate() {
        let mut msg = message("1", 1_600_000_000);
        msg.favorited_by = vec!["B".to_string(), "C".to_string()];
        let table = MessageTable::build(vec![msg], false).unwrap();

        assert_eq!(AggregateKind::TotalLikes.series(&table).total(), 2);
        assert_eq!(AggregateKind::TotalMessages.series(&table).total(), 1);
        assert_eq!(AggregateKind::TotalLikes.file_name(), "total_likes.png");
        assert_eq!(AggregateKind::TotalMessages.title(), "Total Messages");
    }
}
