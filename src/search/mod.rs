//! Search module
//!
//! Runs a single query against the remote RAG service and renders the outcome.

mod client;
mod outcome;

pub use client::SearchClient;
pub use outcome::{extract_results, render_results, SearchOutcome, NO_RESULTS_MESSAGE};
