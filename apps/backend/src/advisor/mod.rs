//! Optional external settlement advisor.
//!
//! This module provides:
//! - the `SettlementAdvisor` trait and its request shape
//! - `HttpAdvisor`, which calls a configured endpoint
//! - a parser turning advisor text back into a checkable plan

mod http;
mod parse;
mod trait_def;

use std::sync::Arc;

pub use http::HttpAdvisor;
pub use parse::parse_suggestion;
pub use trait_def::{AdvisorError, AdvisorPlayer, AdvisorRequest, SettlementAdvisor};

use crate::config::AdvisorConfig;
use crate::error::AppError;

/// Builds the HTTP advisor for `config`, if one is configured.
pub fn from_config(
    config: Option<&AdvisorConfig>,
) -> Result<Option<Arc<dyn SettlementAdvisor>>, AppError> {
    match config {
        Some(cfg) => {
            let advisor: Arc<dyn SettlementAdvisor> = Arc::new(HttpAdvisor::from_config(cfg)?);
            Ok(Some(advisor))
        }
        None => Ok(None),
    }
}
