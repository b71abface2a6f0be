//! Common test utilities for snip.
//!
//! - `fixtures`: sample snippets, hand-built legacy records and temp stores
#![allow(dead_code)]

pub mod fixtures;

use tracing_subscriber::EnvFilter;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
