//! CLI entry point for bandarscope.

use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use bandarscope::accumulation::{AccumulationFilter, AccumulationSortKey};
use bandarscope::table::{PositionFilter, SortKey};
use bandarscope_client::http::HttpApi;
use bandarscope_client::{AnalysisApi, AnalysisKind, Namespace, ReloadDomain};
use bandarscope_cli::commands::{
    self, AccumulationOptions, ReloadOptions, Source, TableOptions,
};
use bandarscope_cli::config::Config;
use bandarscope_cli::error::Result;

#[derive(Parser)]
#[command(name = "bandar")]
#[command(about = "Broker-summary and bandarmology dashboards in the terminal")]
#[command(version)]
struct Cli {
    /// Path to bandar.toml (defaults to ./bandar.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override api.base_url
    #[arg(long)]
    api_url: Option<String>,

    /// Override api.namespace (root or stock)
    #[arg(long)]
    namespace: Option<Namespace>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a broker summary and show its positions table
    Analyze {
        /// Broker summary .json file; omit to read pasted JSON from stdin
        file: Option<PathBuf>,

        /// Case-insensitive stock code search
        #[arg(long)]
        search: Option<String>,

        /// all, buy, or sell
        #[arg(long)]
        position: Option<PositionFilter>,

        /// Minimum |value| in billions
        #[arg(long)]
        min_value: Option<String>,

        /// Maximum |value| in billions
        #[arg(long)]
        max_value: Option<String>,

        /// Minimum signed net value
        #[arg(long, allow_hyphen_values = true)]
        min_pnl: Option<String>,

        /// Maximum signed net value
        #[arg(long, allow_hyphen_values = true)]
        max_pnl: Option<String>,

        /// current_price, weight_pct, or value_bn
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// 10, 20, 30, or 50
        #[arg(long)]
        rows: Option<usize>,

        #[arg(long)]
        page: Option<usize>,
    },

    /// Run quant, technical, fundamental, or news analysis for one stock
    Analysis {
        code: String,

        /// Omit to run every kind
        #[arg(long)]
        kind: Option<AnalysisKind>,
    },

    /// Show a company profile
    Profile { code: String },

    /// Import recent trading data from a JSON file
    Import { file: PathBuf },

    /// Show the broker accumulation table
    Accumulation {
        #[arg(long)]
        broker: Option<String>,

        #[arg(long)]
        sector: Option<String>,

        #[arg(long, default_value = "")]
        search: String,

        /// stock_code, sector, industry, net_volume, or avg_price
        #[arg(long)]
        sort: Option<AccumulationSortKey>,

        #[arg(long)]
        asc: bool,
    },

    /// Show master-data freshness
    Stats,

    /// Reload master data and follow progress
    Reload {
        /// technical or fundamental
        domain: ReloadDomain,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show news for a symbol
    News {
        #[arg(default_value = "XAUUSD")]
        symbol: String,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show market sentiment for a symbol
    Sentiment {
        #[arg(default_value = "XAUUSD")]
        symbol: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let mut config = match Config::resolve(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };
    config.apply_env(cli.api_url);
    if let Some(ns) = cli.namespace {
        config.api.namespace = ns.to_string();
    }
    if let Err(e) = config.validate() {
        eprintln!("Error loading config: {e}");
        process::exit(1);
    }

    if let Err(e) = run(cli.command, &config) {
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}

fn connect(config: &Config) -> Result<HttpApi> {
    let api = HttpApi::new(&config.api.base_url).with_namespace(config.namespace()?);
    match config.timeout() {
        Some(timeout) => Ok(api.with_timeout(timeout)?),
        None => Ok(api),
    }
}

fn run(command: Command, config: &Config) -> Result<()> {
    let api: Arc<dyn AnalysisApi + Send + Sync> = Arc::new(connect(config)?);
    let mut out = io::stdout().lock();

    match command {
        Command::Analyze {
            file,
            search,
            position,
            min_value,
            max_value,
            min_pnl,
            max_pnl,
            sort,
            desc,
            rows,
            page,
        } => {
            let source = file.map_or(Source::Pasted, Source::File);
            let opts = TableOptions {
                search,
                position,
                min_value,
                max_value,
                min_pnl,
                max_pnl,
                sort,
                descending: desc,
                rows_per_page: rows,
                page,
            };
            commands::analyze(
                api.as_ref(),
                config,
                &source,
                &opts,
                &mut io::stdin().lock(),
                &mut out,
            )
        }
        Command::Analysis { code, kind } => commands::analysis(api.as_ref(), &code, kind, &mut out),
        Command::Profile { code } => commands::profile(api.as_ref(), &code, &mut out),
        Command::Import { file } => commands::import(api.as_ref(), &file, &mut out),
        Command::Accumulation {
            broker,
            sector,
            search,
            sort,
            asc,
        } => {
            let opts = AccumulationOptions {
                filter: AccumulationFilter {
                    broker,
                    sector,
                    search,
                },
                sort,
                ascending: asc,
            };
            commands::accumulation(api.as_ref(), &opts, &mut out)
        }
        Command::Stats => commands::stats(api.as_ref(), &mut out),
        Command::Reload { domain, yes } => {
            commands::reload(api, config, ReloadOptions { domain, yes }, &mut out)
        }
        Command::News { symbol, page } => commands::news(api.as_ref(), config, &symbol, page, &mut out),
        Command::Sentiment { symbol } => commands::sentiment(api.as_ref(), config, &symbol, &mut out),
    }
}
