//! snip library - named clipboard-style snippets with file persistence.
//!
//! This library exposes the core functionality of the `snip` CLI for use in
//! tests and other applications.
//!
//! # Modules
//!
//! - `content`: Snippet content model (text, file lists, images, audio)
//! - `codec`: Binary record format for persisted snippets
//! - `store`: Named snippet collection backed by a directory
//! - `config`: Configuration file handling
//! - `error`: Error types with user-recoverable hints
//! - `output`: Output mode abstraction (robot/human)
#![forbid(unsafe_code)]

pub mod cli;
pub mod codec;
pub mod config;
pub mod content;
pub mod error;
pub mod image_ops;
pub mod logging;
pub mod output;
pub mod store;
pub mod theme;
