use std::time::Duration;

use karma::Karma;
use tokio::time;

/// Runs a full pipeline update on every tick. The first tick fires
/// immediately; a failed tick is logged and the schedule keeps going.
pub fn start(karma: Karma, period: Duration) {
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        loop {
            interval.tick().await;
            if let Err(err) = karma.update_all().await {
                log::error!("Error in background process: {:#}", err);
            }
        }
    });
}
