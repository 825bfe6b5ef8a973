/*!
 * # furisub - ruby (furigana) subtitle conversion
 *
 * Converts Japanese subtitle text carrying inline ruby annotations into
 * styled subtitle tracks, per-sentence images, romanized subtitle tracks and
 * non-linear editor timelines. Timing always comes from an existing SRT track.
 *
 * ## Architecture
 *
 * - `transliteration`: kana to Hepburn-style romaji
 * - `ruby_parser`: inline ruby markup into ordered segments
 * - `timing`: SRT timing lines into time intervals
 * - `content`: the JSON content track
 * - `alignment`: positional pairing of content units and intervals
 * - `emitters`: output formats (ASS, PNG, SRT, XMEML)
 * - `app_config`: configuration management
 * - `app_controller`: pipeline orchestration and batch runs
 * - `file_utils`: file system operations
 * - `errors`: error and diagnostic types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod alignment;
pub mod app_config;
pub mod app_controller;
pub mod content;
pub mod emitters;
pub mod errors;
pub mod file_utils;
pub mod ruby_parser;
pub mod timing;
pub mod transliteration;

// Re-export main types for easier usage
pub use alignment::{AlignedEntry, AlignedSequence, align};
pub use app_config::{Config, RenderConfig};
pub use app_controller::{ConversionJob, ConversionOutcome, Controller};
pub use emitters::OutputFormat;
pub use errors::{AppError, Diagnostic, EmitError, InputError};
pub use ruby_parser::{ContentUnit, Segment, parse_markup};
pub use timing::TimeInterval;
pub use transliteration::transliterate;
