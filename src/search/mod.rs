pub mod client;
pub mod normalizer;
pub mod pacer;
pub mod paginator;
pub mod transport;

pub use client::SearchClient;
pub use pacer::{FixedDelayPacer, Pacer};
pub use paginator::{Collection, Paginator, StopReason, MAX_PAGE_SIZE};
pub use transport::{PageRequest, SearchTransport};
