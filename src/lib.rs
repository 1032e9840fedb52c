//! # Prompt Lyrics
//!
//! Resilient extraction of a song's style `prompt`, `lyrics` and `title`
//! from free-form language-model output.
//!
//! Models asked for JSON rarely return only JSON. They wrap it in fences and
//! commentary, write emoji as `\u{1f3b5}`, leave stray backslashes, emit
//! several objects, or echo the schema (`"prompt": "string"`). This crate
//! recovers the most useful result with a deterministic pipeline and never
//! fails on malformed input.
//!
//! ## Core Concepts
//!
//! - **[`extract`]**: the pure engine. Raw text plus a [`RequestContext`]
//!   in, [`ExtractedFields`] out. No I/O, no state, no errors.
//! - **[`output_parser`]**: the individual stages (fence stripping, escape
//!   repair, candidate scanning and selection, normalization, heuristics,
//!   finalization), each usable on its own.
//! - **[`Generator`]**: the injected model seam. The crate never loads a
//!   model; [`MockGenerator`] and [`FnGenerator`] cover tests and glue.
//! - **[`SongWriter`]**: one compose request around a generator, with
//!   instruction building, serialized generation and lifecycle events.
//!
//! ## Quick Start
//!
//! ```
//! use prompt_lyrics::{extract, RequestContext};
//!
//! let raw = "Here is your song!\n```json\n{\"prompt\": \"lofi, 70 bpm\", \
//!            \"lyrics\": \"[verse]:\\nrain on glass \u{2728}\", \"title\": \"Glass\"}\n```";
//! let fields = extract(raw, &RequestContext::new("rainy window"));
//! assert_eq!(fields.prompt, "lofi, 70 bpm");
//! assert_eq!(fields.lyrics, "[verse]\nrain on glass");
//! assert_eq!(fields.title, "Glass");
//! ```

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod events;
pub mod generator;
pub mod output_parser;
pub mod prompt;
pub mod songwriter;
pub mod types;

pub use config::GenerationConfig;
pub use diagnostics::{ExtractDiagnostics, FallbackReason, Strategy};
pub use engine::{extract, extract_with_diagnostics};
pub use error::{ComposeError, Result};
pub use events::{Event, EventHandler, FnEventHandler};
pub use generator::{FnGenerator, GenerationRequest, Generator, MockGenerator};
pub use output_parser::{finalize, INSTRUMENTAL_MARKER};
pub use songwriter::SongWriter;
pub use types::{ExtractedFields, RequestContext};
