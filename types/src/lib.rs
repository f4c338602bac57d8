//! Core domain types for the denim onboarding wizard.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies:
//! the answer document and its copy-on-write update engine, validated field paths,
//! the field catalog, input coercion, and navigation state.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions
#![allow(clippy::cast_possible_truncation)] // integral f64 -> i64 is range-checked first
#![allow(clippy::float_cmp)] // fract() == 0.0 is exact

mod catalog;
mod coerce;
mod document;
mod path;
mod step;
pub mod ui;

pub use catalog::{FieldKind, FieldSpec, Note, StepInfo, field_spec, step_info};
pub use coerce::{
    PERCENT_MAX, PERCENT_MIN, clamp_percent, format_number, parse_number, parse_percent,
    text_value, toggle_choice,
};
pub use document::{DocumentError, FieldValue, Node, NodeMap, WizardDocument};
pub use path::{FieldPath, PathError};
pub use step::{Section, Step};
