//! Ethereum execution-layer and beacon-chain helpers
//!

pub mod beacon;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod eth;
pub mod gitlab;
pub mod retry;
pub mod utils;
