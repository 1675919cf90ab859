//! Feed access: where the XMLTV document comes from, how it is read, and how
//! changes to it are noticed.

pub mod source;
pub mod watcher;
pub mod xmltv;

pub use source::{FeedSource, FileFeedSource, SourceFingerprint, StaticFeedSource};
pub use watcher::{FeedWatcher, PollOutcome};
pub use xmltv::{parse_document, FeedDocument};
