//! Unit Tests Module
//!
//! Component tests driven through the public API with fake transports.

#[path = "../common/mod.rs"]
mod common;

mod eth_module;
mod retry_policy;
