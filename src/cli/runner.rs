//! CLI runner - executes commands

use crate::adapter::{
    AccountBoards, BoardFeed, BoardRelated, PinDetail, PinRelated, PinRelatedCursor,
    SearchBoards, SearchPins, DEFAULT_CURSOR_COUNT,
};
use crate::batch::{fetch_all, fetch_details};
use crate::cancel::Cancellation;
use crate::cli::commands::{Cli, Commands, ItemShape};
use crate::config::FetcherConfig;
use crate::error::Result;
use crate::events::TracingSink;
use crate::http::{HttpClient, Transport};
use crate::normalize::{BoardSummary, PinDetailSummary, PinSummary};
use crate::output::JsonWriter;
use crate::paginator::{RunOutcome, RunStatus};
use crate::types::JsonValue;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// What happened to one collection
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    /// Id named on the command line
    pub id: String,
    pub status: RunStatus,
    pub items: usize,
    pub pages: usize,
    /// Written file, if the write succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
    cancel: Cancellation,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            cancel: Cancellation::new(),
        }
    }

    /// Use an externally owned cancellation handle
    #[must_use]
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle that stops every run started by this runner
    pub fn cancellation(&self) -> &Cancellation {
        &self.cancel
    }

    /// Configuration file merged with command line overrides
    pub fn config(&self) -> Result<FetcherConfig> {
        let mut config = match &self.cli.config {
            Some(path) => FetcherConfig::load(path)?,
            None => FetcherConfig::default(),
        };

        if let Some(dir) = &self.cli.output {
            config.output.dir.clone_from(dir);
        }
        if self.cli.pretty {
            config.output.pretty = true;
        }
        if let Some(limit) = self.cli.concurrency {
            config.concurrency.max_concurrent = limit;
        }
        if let Some(max_pages) = self.cli.max_pages {
            config.pagination.max_pages = max_pages;
        }
        if let Some(path) = &self.cli.cookie_file {
            config.session.cookie_file = Some(path.clone());
        }
        if let Some(cookie) = &self.cli.cookie {
            config.session.cookie = Some(cookie.clone());
        }
        if let Some(page_size) = self.page_size_override() {
            config.pagination.page_size = page_size;
        }

        config.validate()?;
        Ok(config)
    }

    fn page_size_override(&self) -> Option<u32> {
        match &self.cli.command {
            Commands::Board { page_size, .. }
            | Commands::Boards { page_size, .. }
            | Commands::PinRelated { page_size, .. }
            | Commands::SearchPins { page_size, .. } => *page_size,
            Commands::BoardRelated { .. }
            | Commands::SearchBoards { .. }
            | Commands::Pin { .. } => None,
        }
    }

    /// Run the CLI command
    ///
    /// Only configuration problems are returned as errors; failed or
    /// cancelled collections are reported and their partial items written.
    pub async fn run(&self) -> Result<Vec<CollectionReport>> {
        let config = self.config()?;
        let client = HttpClient::with_config(config.http_client_config())?;
        let reports = self.run_with_transport(&config, Arc::new(client)).await?;

        for report in &reports {
            match serde_json::to_string(report) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!("Failed to serialize report for {}: {e}", report.id),
            }
        }
        Ok(reports)
    }

    /// Run the command against an existing transport
    pub async fn run_with_transport(
        &self,
        config: &FetcherConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Vec<CollectionReport>> {
        let paginator = config
            .paginator(TracingSink::shared())?
            .with_cancellation(self.cancel.clone());
        let page_size = config.pagination.page_size;
        let limit = config.concurrency.max_concurrent;

        let outcomes: Vec<RunOutcome<JsonValue>> = match &self.cli.command {
            Commands::Board {
                board_ids, section, ..
            } => {
                let adapters = board_ids
                    .iter()
                    .map(|id| {
                        let feed = BoardFeed::new(id).page_size(page_size);
                        match section {
                            Some(section) => feed.section(section),
                            None => feed,
                        }
                    })
                    .collect();
                fetch_all(&paginator, transport, adapters, limit).await
            }
            Commands::Boards { usernames, .. } => {
                let adapters = usernames
                    .iter()
                    .map(|name| AccountBoards::new(name).page_size(page_size))
                    .collect();
                fetch_all(&paginator, transport, adapters, limit).await
            }
            Commands::BoardRelated { board_ids } => {
                let adapters = board_ids.iter().map(BoardRelated::new).collect();
                fetch_all(&paginator, transport, adapters, limit).await
            }
            Commands::PinRelated {
                pin_ids,
                cursor: true,
                page_size: count,
            } => {
                let count = count.unwrap_or(DEFAULT_CURSOR_COUNT);
                let adapters = pin_ids
                    .iter()
                    .map(|id| PinRelatedCursor::new(id).map(|a| a.count(count)))
                    .collect::<Result<Vec<_>>>()?;
                fetch_all(&paginator, transport, adapters, limit).await
            }
            Commands::PinRelated { pin_ids, .. } => {
                let adapters = pin_ids
                    .iter()
                    .map(|id| PinRelated::with_page_size(id, page_size))
                    .collect::<Result<Vec<_>>>()?;
                fetch_all(&paginator, transport, adapters, limit).await
            }
            Commands::SearchPins { queries, .. } => {
                let adapters = queries
                    .iter()
                    .map(|q| SearchPins::new(q).page_size(page_size))
                    .collect();
                fetch_all(&paginator, transport, adapters, limit).await
            }
            Commands::SearchBoards { queries } => {
                let adapters = queries.iter().map(SearchBoards::new).collect();
                fetch_all(&paginator, transport, adapters, limit).await
            }
            Commands::Pin { pin_ids } => {
                let details = pin_ids
                    .iter()
                    .map(PinDetail::new)
                    .collect::<Result<Vec<_>>>()?;
                fetch_details(paginator.fetcher(), transport, details, limit)
                    .await
                    .into_iter()
                    .map(detail_outcome)
                    .collect()
            }
        };

        let writer = config.writer();
        let reports: Vec<CollectionReport> = self
            .cli
            .command
            .ids()
            .iter()
            .zip(outcomes)
            .map(|(id, outcome)| self.write(&writer, id, outcome))
            .collect();

        let complete = reports
            .iter()
            .filter(|r| r.status.is_completed())
            .count();
        info!(
            "Fetched {} collections ({complete} complete) into {}",
            reports.len(),
            writer.dir().display()
        );
        Ok(reports)
    }

    fn write(
        &self,
        writer: &JsonWriter,
        id: &str,
        outcome: RunOutcome<JsonValue>,
    ) -> CollectionReport {
        let written = match (self.cli.command.shape(), self.cli.raw) {
            // A failed pin detail has nothing to write
            (ItemShape::PinDetail, raw) => outcome.items.first().map(|pin| {
                if raw {
                    writer.write_value(id, pin)
                } else {
                    writer.write_value(id, &PinDetailSummary::from_raw(pin))
                }
            }),
            (_, true) => Some(writer.write(id, &outcome.items)),
            (ItemShape::Boards, false) => {
                let boards: Vec<_> = outcome.items.iter().map(BoardSummary::from_raw).collect();
                Some(writer.write(id, &boards))
            }
            (ItemShape::Pins, false) => {
                let pins: Vec<_> = outcome.items.iter().map(PinSummary::from_raw).collect();
                Some(writer.write(id, &pins))
            }
        };

        let path = match written {
            Some(Ok(path)) => Some(path),
            Some(Err(e)) => {
                error!("Failed to write {id}: {e}");
                None
            }
            None => None,
        };

        CollectionReport {
            id: id.to_string(),
            status: outcome.status,
            items: outcome.items.len(),
            pages: outcome.pages,
            path,
            error: outcome.error.map(|e| e.to_string()),
        }
    }
}

/// A single pin fetch reported like a one-page collection
fn detail_outcome(result: Result<JsonValue>) -> RunOutcome<JsonValue> {
    match result {
        Ok(pin) => RunOutcome {
            items: vec![pin],
            status: RunStatus::Completed,
            pages: 1,
            error: None,
        },
        Err(e) => RunOutcome {
            items: Vec::new(),
            status: if e.is_cancelled() {
                RunStatus::Cancelled
            } else {
                RunStatus::PartialAborted
            },
            pages: 0,
            error: Some(e),
        },
    }
}
