//! Core library for eaiser, a local-first personal note manager.
//!
//! Notes live in a SQLite database and are organized into a self-referential
//! category tree, optionally color-coded. Three note kinds are supported:
//! plain markdown notes, imported PDFs (stored on disk and referenced by
//! relative name), and script notes whose body can be executed under a hard
//! timeout. An AI assistant can answer questions using note contents as
//! context.
//!
//! # Usage
//!
//! ```no_run
//! use eaiser::App;
//!
//! # async fn demo() -> eaiser::error::Result<()> {
//! let app = App::init()?;
//!
//! let notes = app.db.list_notes(None)?;
//! let reply = app.chat.chat("what did I write about rigging?", &[]).await?;
//! # Ok(())
//! # }
//! ```

pub mod ai;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod script;
pub mod storage;
pub mod tree;

pub use app::App;
pub use db::Database;
pub use error::{Error, Result};

/// Separator placed between note bodies when they are concatenated into a
/// single context passage for the AI assistant.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";
