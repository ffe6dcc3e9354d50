pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod search;

pub use config::{Config, RunOptions};
pub use error::{Error, Result};
pub use export::{DatasetExporter, ExportFormat};
pub use pipeline::ScrapePipeline;
pub use search::{FixedDelayPacer, Paginator, SearchClient};
