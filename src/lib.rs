//! # bandarscope
//!
//! Client-side model for broker-summary ("bandarmology") dashboards on the
//! Indonesian market.
//!
//! The analytics run on a remote service; this crate owns what the client
//! does with the results:
//!
//! - **Data model**: [`StockPosition`], [`BrokerSummary`], [`NetPosition`]
//! - **Derived metrics**: per-row `weight_pct` and headline counts ([`metrics`])
//! - **Tables**: a reducer-driven filter → sort → paginate pipeline ([`table`])
//!   and the accumulation/distribution view ([`accumulation`])
//! - **Input checks**: upload file rules and lifecycle ([`upload`]), stock codes ([`input`])
//! - **Presentation helpers**: status badges ([`badge`]) and rupiah formatting ([`format`])
//!
//! No I/O happens here. See `bandarscope-client` for the HTTP side.
//!
//! ## Quick Start
//!
//! ```
//! use bandarscope::{StockPosition, metrics, table::{self, TableEvent, TableState, PositionFilter}};
//!
//! let loaded = vec![
//!     StockPosition::new("BBCA", 5_000_000_000.0),
//!     StockPosition::new("TLKM", -2_000_000_000.0),
//! ];
//! let rows = metrics::with_weights(&loaded, 10_000_000_000.0);
//! assert_eq!(rows[0].weight_pct, Some(50.0));
//!
//! let state = TableState::default()
//!     .apply(TableEvent::DataLoaded, &rows)
//!     .apply(TableEvent::SetPosition(PositionFilter::NetBuy), &rows);
//! let view = table::view(&rows, &state);
//! assert_eq!(view.total_rows, 1);
//! assert_eq!(view.rows[0].stock_code, "BBCA");
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` on the data model and table state.

pub mod accumulation;
pub mod badge;
mod error;
pub mod format;
pub mod input;
pub mod metrics;
pub mod table;
mod types;
pub mod upload;

pub use accumulation::AccumulatedStock;
pub use badge::{Badge, Status, Tone};
pub use error::{TransitionError, ValidationError};
pub use input::StockCode;
pub use types::{BILLION, BrokerInfo, BrokerSummary, NetPosition, StockPosition, SummaryStats};
pub use upload::{UploadFile, UploadState};
