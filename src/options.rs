//! The backend contract shared by real registries and the name extractor

use std::collections::BTreeSet;

use anyhow::Result;

use crate::group::OptionGroup;

/// Destination for non-fatal diagnostics such as unrecognized option names.
/// The caller decides fatality; backends only report.
pub trait DiagnosticSink {
    fn report(&mut self, message: &str);
}

/// Forwards diagnostics to the `log` facade at warn level.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Collects diagnostics in memory, for inspection after the pass.
#[derive(Debug, Default)]
pub struct BufferSink {
    messages: Vec<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl DiagnosticSink for BufferSink {
    fn report(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// A registry backend for declared option groups.
///
/// Declaration code is written once against this trait and runs unchanged
/// over any backend: a value-storing registry performing the canonical feed
/// pass, or the name extractor recording only group identity. The core is
/// agnostic to where raw values came from and where diagnostics go.
pub trait Options {
    /// Register every descriptor in `group` as one unit. Name-collision
    /// policy is backend-defined, but a rejected group must leave the
    /// registered descriptor set unchanged.
    fn register_group(&mut self, group: OptionGroup) -> Result<()>;

    /// Whether `name` transitioned to "supplied" in the current pass.
    fn was_supplied(&self, name: &str) -> bool;

    /// Every name that transitioned to "supplied" in the current pass.
    fn supplied_option_names(&self) -> BTreeSet<String>;

    /// Report every raw input name never registered by any group through
    /// `sink`. Non-fatal; nothing is raised.
    fn check_unregistered(&self, sink: &mut dyn DiagnosticSink);

    /// Record a raw value for `name` unless one already exists
    /// (first-write-wins).
    fn insert(&mut self, name: &str, value: &str);

    /// Record a raw value for `name`, unconditionally overwriting.
    fn replace(&mut self, name: &str, value: &str);

    /// Ordered free-standing tokens that bound to no named option.
    fn positional_tokens(&self) -> Vec<String>;
}
