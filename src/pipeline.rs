use indicatif::{ProgressBar, ProgressStyle};

use crate::models::UserRecord;
use crate::search::Paginator;

pub struct ScrapePipeline {
    paginator: Paginator,
    max_items: usize,
    show_progress: bool,
}

impl ScrapePipeline {
    pub fn new(paginator: Paginator, max_items: usize) -> Self {
        Self {
            paginator,
            max_items,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Search every keyword in order and return all records tagged with their keyword.
    pub async fn run(&self, keywords: &[String]) -> Vec<UserRecord> {
        let pb = if self.show_progress {
            ProgressBar::new(keywords.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} keywords")
        {
            pb.set_style(style.progress_chars("#>-"));
        }

        let mut all_users = Vec::new();

        for keyword in keywords {
            if self.paginator.cancellation_token().is_cancelled() {
                tracing::warn!("Cancelled, skipping remaining keywords");
                break;
            }

            let keyword = keyword.trim();
            if keyword.is_empty() {
                tracing::warn!("Skipping empty keyword entry in input");
                pb.inc(1);
                continue;
            }

            tracing::info!(
                "Searching users for keyword='{}' with max_items={}",
                keyword,
                self.max_items
            );
            let collection = self.paginator.collect(keyword, self.max_items).await;

            let mut users = collection.records;
            for user in &mut users {
                user.tag_source(keyword);
            }
            tracing::info!("Collected {} users for keyword '{}'", users.len(), keyword);

            all_users.extend(users);
            pb.inc(1);
        }

        pb.finish_with_message("Search complete");
        all_users
    }
}
