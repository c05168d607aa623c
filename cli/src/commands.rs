//! Subcommand implementations.
//!
//! Every command takes the service behind [`AnalysisApi`] and writes to a
//! caller-supplied sink, so the same code runs against the HTTP client in
//! `main` and against the mock in tests.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;

use log::{debug, info};

use bandarscope::accumulation::{self, AccumulationFilter, AccumulationSort, AccumulationSortKey};
use bandarscope::input::format_file_size;
use bandarscope::metrics::{summary_total_value, with_weights};
use bandarscope::table::{
    self, Bound, PageState, PositionFilter, SortDirection, SortKey, TableEvent, TableState,
};
use bandarscope::{StockCode, UploadFile, UploadState, ValidationError};
use bandarscope_client::poll::{PollEvent, ReloadPoller};
use bandarscope_client::{
    AnalysisApi, AnalysisKind, ApiError, Namespace, ReloadDomain, parse_json_text,
};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::render::{
    AccumulationReport, NewsPage, PositionsReport, ProgressLine, SentimentPanel, StatsPanel,
};

/// Rows per page of the news feed.
pub const NEWS_ROWS_PER_PAGE: usize = 10;

/// Where a broker summary comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// A `.json` file upload.
    File(PathBuf),
    /// JSON pasted on stdin.
    Pasted,
}

/// Table controls for `analyze`.
#[derive(Clone, Debug, Default)]
pub struct TableOptions {
    pub search: Option<String>,
    pub position: Option<PositionFilter>,
    pub min_value: Option<String>,
    pub max_value: Option<String>,
    pub min_pnl: Option<String>,
    pub max_pnl: Option<String>,
    pub sort: Option<SortKey>,
    pub descending: bool,
    pub rows_per_page: Option<usize>,
    pub page: Option<usize>,
}

impl TableOptions {
    /// Reject a page size the table does not offer.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        match self.rows_per_page {
            Some(rows) if !table::is_rows_per_page_option(rows) => {
                Err(ValidationError::RowsPerPage(rows))
            }
            _ => Ok(()),
        }
    }

    /// The events a user would have produced to reach this view, in order.
    ///
    /// Paging comes last since every other event returns to page 1.
    pub fn events(&self) -> Vec<TableEvent> {
        let mut events = vec![TableEvent::DataLoaded];
        if let Some(rows) = self.rows_per_page {
            events.push(TableEvent::SetRowsPerPage(rows));
        }
        if let Some(query) = &self.search {
            events.push(TableEvent::Search(query.clone()));
        }
        if let Some(position) = self.position {
            events.push(TableEvent::SetPosition(position));
        }
        for (bound, text) in [
            (Bound::MinValue, &self.min_value),
            (Bound::MaxValue, &self.max_value),
            (Bound::MinPnl, &self.min_pnl),
            (Bound::MaxPnl, &self.max_pnl),
        ] {
            if let Some(text) = text {
                events.push(TableEvent::SetBound(bound, text.clone()));
            }
        }
        if let Some(key) = self.sort {
            events.push(TableEvent::Sort(key));
            if self.descending {
                events.push(TableEvent::Sort(key));
            }
        }
        if let Some(page) = self.page {
            events.push(TableEvent::GoToPage(page));
        }
        events
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::InputRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Upload a broker summary, then show its positions through the table pipeline.
pub fn analyze(
    api: &dyn AnalysisApi,
    config: &Config,
    source: &Source,
    opts: &TableOptions,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    let namespace = config.namespace()?;
    opts.validate()?;
    let data = match source {
        Source::File(path) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let size = std::fs::metadata(path)
                .map_err(|e| Error::InputRead {
                    path: path.to_path_buf(),
                    source: e,
                })?
                .len();
            let file = UploadFile::new(&name, size)?;
            let contents = read_file(path)?;
            writeln!(out, "Uploading {file}")?;

            let mut upload = UploadState::default();
            upload.select(file)?;
            upload.submit()?;
            let result = match namespace {
                Namespace::Root => {
                    let text = String::from_utf8_lossy(&contents);
                    parse_json_text(&text)
                        .map_err(ApiError::from)
                        .and_then(|payload| api.analyze(&payload))
                }
                Namespace::Stock => api.analyze_file(&name, contents),
            };
            match result {
                Ok(data) => {
                    upload.succeed()?;
                    data
                }
                Err(e) => {
                    upload.fail(e.to_string())?;
                    return Err(e.into());
                }
            }
        }
        Source::Pasted => {
            let mut text = String::new();
            input.read_to_string(&mut text)?;
            let payload = parse_json_text(&text)?;
            api.analyze(&payload)?
        }
    };

    let summaries = data.into_summaries();
    info!("analysis returned {} broker summaries", summaries.len());
    let events = opts.events();
    for (i, summary) in summaries.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        let positions = with_weights(&summary.stocks, summary_total_value(summary.summary.as_ref()));
        let state = TableState::new(config.table.rows_per_page).apply_all(events.clone(), &positions);
        let view = table::view(&positions, &state);
        debug!(
            "table view: {} of {} rows, page {}/{}",
            view.rows.len(),
            view.total_rows,
            view.current_page,
            view.total_pages
        );
        write!(
            out,
            "{}",
            PositionsReport {
                summary: Some(summary),
                all_rows: &positions,
                view: &view,
            }
        )?;
    }
    Ok(())
}

/// Run one or every analysis family for a stock and print the bundles.
pub fn analysis(
    api: &dyn AnalysisApi,
    code: &str,
    kind: Option<AnalysisKind>,
    out: &mut dyn Write,
) -> Result<()> {
    let code = StockCode::parse(code)?;
    let kinds = match kind {
        Some(k) => vec![k],
        None => AnalysisKind::ALL.to_vec(),
    };
    for kind in kinds {
        let bundles = api.analyze_stock(kind, &code)?;
        writeln!(out, "{} ANALYSIS: {code}", kind.path_segment().to_uppercase())?;
        if bundles.is_empty() {
            writeln!(out, "  No data.")?;
        }
        for bundle in &bundles {
            writeln!(out, "{}", serde_json::to_string_pretty(bundle)?)?;
        }
    }
    Ok(())
}

pub fn profile(api: &dyn AnalysisApi, code: &str, out: &mut dyn Write) -> Result<()> {
    let code = StockCode::parse(code)?;
    let profile = api.company_profile(&code)?;
    writeln!(
        out,
        "COMPANY PROFILE: {code} {}",
        profile.company_name().unwrap_or("")
    )?;
    writeln!(out, "{}", serde_json::to_string_pretty(profile.body())?)?;
    Ok(())
}

/// Send recent trading data read from a JSON file.
pub fn import(api: &dyn AnalysisApi, path: &Path, out: &mut dyn Write) -> Result<()> {
    let contents = read_file(path)?;
    let payload = parse_json_text(&String::from_utf8_lossy(&contents))?;
    writeln!(out, "Importing {} ({})", path.display(), format_file_size(contents.len() as u64))?;
    let ack = api.import_recent_data(&payload)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&ack)?)?;
    Ok(())
}

/// Filter and sort controls for `accumulation`.
#[derive(Clone, Debug, Default)]
pub struct AccumulationOptions {
    pub filter: AccumulationFilter,
    pub sort: Option<AccumulationSortKey>,
    pub ascending: bool,
}

impl AccumulationOptions {
    /// Net volume, largest first, unless a column or direction was given.
    pub fn sort(&self) -> AccumulationSort {
        AccumulationSort {
            key: self.sort.unwrap_or(AccumulationSort::default().key),
            direction: if self.ascending {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            },
        }
    }
}

pub fn accumulation(
    api: &dyn AnalysisApi,
    opts: &AccumulationOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let stocks = api.accumulation_stocks()?;
    let summary = api.accumulation_summary()?;
    let rows = accumulation::view(&stocks, &opts.filter, &opts.sort());
    let brokers = accumulation::brokers(&stocks);
    let sectors = accumulation::sectors(&stocks);
    write!(
        out,
        "{}",
        AccumulationReport {
            rows: &rows,
            counts: accumulation::counts(&stocks),
            summary: Some(&summary),
            brokers: &brokers,
            sectors: &sectors,
        }
    )?;
    Ok(())
}

pub fn stats(api: &dyn AnalysisApi, out: &mut dyn Write) -> Result<()> {
    let stats = api.master_data_stats()?;
    write!(out, "{}", StatsPanel(&stats))?;
    Ok(())
}

/// Options for `reload`.
#[derive(Clone, Copy, Debug)]
pub struct ReloadOptions {
    pub domain: ReloadDomain,
    /// Skip the confirmation prompt.
    pub yes: bool,
}

/// Trigger a master-data reload and follow its progress until it finishes.
pub fn reload(
    api: Arc<dyn AnalysisApi + Send + Sync>,
    config: &Config,
    opts: ReloadOptions,
    out: &mut dyn Write,
) -> Result<()> {
    if !opts.yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Reload {} master data?", opts.domain))
            .default(false)
            .interact()
            .map_err(|e| Error::Aborted(format!("confirmation prompt failed: {e}")))?;
        if !confirmed {
            writeln!(out, "Aborted.")?;
            return Ok(());
        }
    }

    let started = api.reload(opts.domain)?;
    match started.estimated_time_minutes {
        Some(minutes) => writeln!(
            out,
            "Reload of {} data started (about {minutes:.0} minutes).",
            opts.domain
        )?,
        None => writeln!(out, "Reload of {} data started.", opts.domain)?,
    }

    let (tx, rx) = mpsc::channel();
    let mut poller = ReloadPoller::new(config.poll_interval());
    poller.start(Arc::clone(&api), tx);

    let mut outcome = Ok(());
    for event in rx {
        match event {
            PollEvent::Progress(progress) => {
                if progress.any_running() {
                    write!(out, "{}", ProgressLine(&progress))?;
                }
            }
            PollEvent::TickFailed(e) => writeln!(out, "  progress check failed: {e}")?,
            PollEvent::Finished(Ok(stats)) => {
                writeln!(out, "Reload finished.")?;
                write!(out, "{}", StatsPanel(&stats))?;
            }
            PollEvent::Finished(Err(e)) => outcome = Err(e.into()),
        }
    }
    poller.stop();
    outcome
}

/// Fetch a news page for `symbol`.
pub fn news(
    api: &dyn AnalysisApi,
    config: &Config,
    symbol: &str,
    page: usize,
    out: &mut dyn Write,
) -> Result<()> {
    let items = api.news(symbol, &config.news_query())?;
    let mut state = PageState::new(NEWS_ROWS_PER_PAGE);
    if state.contains(page, items.len()) {
        state.current_page = page;
    }
    let (start, end) = state.bounds(items.len());
    write!(
        out,
        "{}",
        NewsPage {
            items: &items[start..end],
            page: state.current_page,
            total_pages: state.total_pages(items.len()),
            total: items.len(),
        }
    )?;
    Ok(())
}

pub fn sentiment(
    api: &dyn AnalysisApi,
    config: &Config,
    symbol: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let report = api.news_sentiment(symbol, &config.news_query())?;
    write!(out, "{}", SentimentPanel(&report))?;
    Ok(())
}
