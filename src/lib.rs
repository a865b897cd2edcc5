//! pghydro_rs
//!
//! A small Rust library for retrieving groundwater and water-quality measurements
//! from a token-authenticated REST service and shaping them for Piper triangle
//! plots. Pairs with the `pghydro` CLI.
//!
//! ### Features
//! - Fetch groundwater levels, physicochemical parameters and chemical analyses
//! - Filter by station(s), parameter/analyte(s) and date bounds
//! - Results as polars `DataFrame`s, saved as CSV or JSON
//! - Piper formatting with regex-based color/marker rules per station
//!
//! ### Example
//! ```no_run
//! use pghydro_rs::{Client, PiperOptions, StyleRules};
//!
//! let client = Client::new("https://your-api-url.com", "mytoken")?;
//! let df = client.get_analyses(Some("Piezometer 1".into()), Some(["Ca", "Cl", "Na"].into()), None, None)?;
//! let opts = PiperOptions {
//!     color_rules: Some(StyleRules::new([("^Piezometer", "tab:blue"), ("^Spring", "tab:green")])?),
//!     convert_alkalinity: true,
//!     ..PiperOptions::default()
//! };
//! let piper = pghydro_rs::piper::format_piper(&df, &opts)?;
//! pghydro_rs::storage::save_csv(&piper, "piper.csv")?;
//! # Ok::<(), pghydro_rs::Error>(())
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod piper;
pub mod query;
pub mod storage;
pub mod style;

pub use api::Client;
pub use error::{Error, Result};
pub use models::{Endpoint, Selection};
pub use piper::{PiperOptions, format_piper};
pub use query::{QueryFilter, build_query};
pub use style::{StyleRules, match_pattern};
