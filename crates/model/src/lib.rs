pub mod errors;
pub mod message;
pub mod series;
pub mod table;

pub use errors::KarmaError;
pub use message::Message;
pub use series::{AggregateSeries, LikePair, SeriesEntry, UNKNOWN_NAME};
pub use table::{MessageRow, MessageTable};
