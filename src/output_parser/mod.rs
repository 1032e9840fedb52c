//! # LLM Output Parser
//!
//! The stages behind [`extract`](crate::extract): everything needed to turn a
//! model's free-form reply into song fields without calling the model again.
//! Handles markdown fences, commentary around JSON, broken escapes, several
//! JSON-looking fragments, missing fields and echoed template text.
//!
//! ## Stages
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`strip_fences`] | Remove a surrounding code fence |
//! | [`repair_escapes`] | Fix `\u{HEX}` escapes and stray backslashes |
//! | [`scan_candidates`] | Find every balanced `{...}` object, string-aware |
//! | [`select_best`] | Longest non-placeholder object with the required key |
//! | [`FieldValue`] | Scalar-or-list field normalization |
//! | [`fallback_fields`] | Regex heuristics when JSON is unusable |
//! | [`is_placeholder`] | Detect echoed template values |
//! | [`finalize`] | Defaults, title salvage, lyric cleanup |

pub mod error;
pub mod extract;
pub mod finalize;
pub mod heuristic;
pub mod json;
pub mod normalize;
pub mod placeholder;
pub mod repair;

// Re-export all public functions at module level
pub use error::ParseError;
pub use extract::{scan_candidates, strip_fences, Candidate, CandidateScanner};
pub use finalize::{finalize, tidy_lyrics, title_from_concept, INSTRUMENTAL_MARKER};
pub use heuristic::{fallback_fields, has_section_tag, lyrics_from_label, lyrics_from_section_tag};
pub use json::{find_object, parse_object, select_best, REQUIRED_KEY};
pub use normalize::{FieldValue, NormalizedFields};
pub use placeholder::is_placeholder;
pub use repair::repair_escapes;
