//! Real-time file search engine and command-line front end.
//!
//! The engine lives in [`search`]: build a [`SearchConfig`], hand it to
//! [`Searcher::new`], then call [`Searcher::search`].
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod output;
pub mod search;
pub mod walker;

pub use crate::error::{LocateError, Result};
pub use metrics::SearchStats;
pub use search::{CancelToken, InertFilters, SearchConfig, SearchResult, Searcher};
