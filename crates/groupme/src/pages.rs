use async_trait::async_trait;
use eyre::Error;
use model::{KarmaError, Message};

/// Fixed history page size.
pub const PAGE_LIMIT: u32 = 100;

/// One answer from the history endpoint: a page of messages, or a
/// non-success status the loop has to interpret.
#[derive(Debug)]
pub enum Page {
    Messages(Vec<Message>),
    Refused(u16),
}

#[async_trait]
pub trait PageSource {
    async fn page(&mut self, before_id: Option<&str>) -> Result<Page, Error>;
}

fn stop_reason(status: u16) -> String {
    match status {
        420 => "rate limited".to_string(),
        304 => "end of history".to_string(),
        other => other.to_string(),
    }
}

/// Walks the history backwards with the `before_id` cursor until the server
/// refuses, a page comes back empty, or the page budget runs out.
///
/// A refusal on the very first request is an error; afterwards it is a
/// soft stop and whatever was collected so far is the result.
pub async fn drain_pages(
    source: &mut (impl PageSource + Send),
    max_pages: u32,
) -> Result<Vec<Message>, Error> {
    let mut messages: Vec<Message> = Vec::new();
    let mut before_id: Option<String> = None;
    let mut pages = 0;

    loop {
        if pages == max_pages {
            log::warn!("page budget of {} exhausted, stopping pagination", max_pages);
            break;
        }
        match source.page(before_id.as_deref()).await? {
            Page::Refused(status) => {
                if pages == 0 {
                    let err = match status {
                        401 | 403 => KarmaError::Auth { status },
                        _ => KarmaError::Transport {
                            status,
                            context: "message history",
                        },
                    };
                    return Err(err.into());
                }
                log::info!("requests ended due to: {} by {}", stop_reason(status), status);
                break;
            }
            Page::Messages(page) => {
                if page.is_empty() {
                    // Nothing left for the cursor to point at.
                    break;
                }
                before_id = page.last().map(|msg| msg.id.clone());
                messages.extend(page);
                pages += 1;
            }
        }
    }

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str) -> Message {
        Message {
            id: id.to_string(),
            name: "Avery".to_string(),
            sender_id: "1".to_string(),
            user_id: "1".to_string(),
            text: Some("hello".to_string()),
            created_at: 1_700_000_000,
            favorited_by: vec![],
        }
    }

    struct Scripted {
        pages: Vec<Page>,
        cursors: Vec<Option<String>>,
    }

    impl Scripted {
        fn new(pages: Vec<Page>) -> Self {
            Scripted {
                pages,
                cursors: vec![],
            }
        }
    }

    #[async_trait]
    impl PageSource for Scripted {
        async fn page(&mut self, before_id: Option<&str>) -> Result<Page, Error> {
            self.cursors.push(before_id.map(str::to_owned));
            Ok(self.pages.remove(0))
        }
    }

    /// Always answers with a fresh single-message page.
    struct Endless {
        served: u32,
    }

    #[async_trait]
    impl PageSource for Endless {
        async fn page(&mut self, _before_id: Option<&str>) -> Result<Page, Error> {
            self.served += 1;
            Ok(Page::Messages(vec![message(&self.served.to_string())]))
        }
    }

    #[tokio::test]
    async fn concatenates_pages_in_server_order() {
        let mut source = Scripted::new(vec![
            Page::Messages(vec![message("4"), message("3")]),
            Page::Messages(vec![message("2"), message("1")]),
            Page::Refused(304),
        ]);

        let messages = drain_pages(&mut source, 500).await.unwrap();
        let ids: Vec<_> = messages.iter().map(|msg| msg.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "3", "2", "1"]);
    }

    #[tokio::test]
    async fn cursor_follows_the_oldest_seen_id() {
        let mut source = Scripted::new(vec![
            Page::Messages(vec![message("4"), message("3")]),
            Page::Messages(vec![message("2"), message("1")]),
            Page::Refused(304),
        ]);

        drain_pages(&mut source, 500).await.unwrap();
        assert_eq!(
            source.cursors,
            vec![None, Some("3".to_string()), Some("1".to_string())]
        );
    }

    #[tokio::test]
    async fn rate_limit_after_first_page_yields_partial_result() {
        let mut source = Scripted::new(vec![
            Page::Messages(vec![message("4"), message("3")]),
            Page::Refused(420),
        ]);

        let messages = drain_pages(&mut source, 500).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, "4");
    }

    #[tokio::test]
    async fn refusal_on_first_request_is_an_auth_error() {
        let mut source = Scripted::new(vec![Page::Refused(401)]);

        let err = drain_pages(&mut source, 500).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<KarmaError>(),
            Some(KarmaError::Auth { status: 401 })
        ));
    }

    #[tokio::test]
    async fn refusal_on_first_request_is_a_transport_error() {
        let mut source = Scripted::new(vec![Page::Refused(500)]);

        let err = drain_pages(&mut source, 500).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<KarmaError>(),
            Some(KarmaError::Transport { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn empty_page_is_a_clean_stop() {
        let mut source = Scripted::new(vec![
            Page::Messages(vec![message("4")]),
            Page::Messages(vec![]),
        ]);

        let messages = drain_pages(&mut source, 500).await.unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[tokio::test]
    async fn page_budget_bounds_the_loop() {
        let mut source = Endless { served: 0 };

        let messages = drain_pages(&mut source, 3).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(source.served, 3);
    }
}
