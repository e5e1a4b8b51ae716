//! Typed, introspectable option declarations
//!
//! This crate provides:
//! - Strongly typed option descriptors with independent default/supplied
//!   value tracking and deferred legal-value checking
//! - Write-once external bindings filled by a single canonical feed pass
//! - A visitor for cross-cutting operations over mixed descriptors
//! - Pluggable registry backends behind one [`Options`] trait: a
//!   value-storing [`OptionsRegistry`] and an [`OptionsNameExtractor`]
//!   that derives a deterministic signature from requested groups

pub mod extractor;
pub mod group;
pub mod kind;
pub mod option;
pub mod options;
pub mod registry;
pub mod visitor;

pub use extractor::OptionsNameExtractor;
pub use group::OptionGroup;
pub use kind::OptionKind;
pub use option::{BaseOption, Location, TypedOption};
pub use options::{BufferSink, DiagnosticSink, LogSink, Options};
pub use registry::OptionsRegistry;
pub use visitor::OptionVisitor;
