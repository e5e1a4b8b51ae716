//! Group-name discovery without a real feed pass

use std::collections::BTreeSet;

use anyhow::{Result, bail};

use crate::group::OptionGroup;
use crate::options::{DiagnosticSink, Options};

/// An [`Options`] backend whose purpose is signature discovery, not parsing.
///
/// Running the same declaration code that would drive a real registry, it
/// records only which help groups were requested and derives a
/// deterministic signature from them: the distinct group names sorted
/// lexicographically and joined with `", "`. Registration order never
/// changes the result, so the signature is usable as a cache or version
/// key. Individual option values are never retained, and every value query
/// reports empty.
#[derive(Debug, Default)]
pub struct OptionsNameExtractor {
    group_names: BTreeSet<String>,
    generated_name: String,
}

impl OptionsNameExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signature derived from the groups registered so far. Empty until
    /// the first registration.
    pub fn generated_name(&self) -> &str {
        &self.generated_name
    }
}

impl Options for OptionsNameExtractor {
    fn register_group(&mut self, group: OptionGroup) -> Result<()> {
        if group.name().is_empty() {
            bail!("option group must have a non-empty name for name extraction");
        }
        self.group_names.insert(group.name().to_string());
        let names: Vec<&str> = self.group_names.iter().map(String::as_str).collect();
        self.generated_name = names.join(", ");
        Ok(())
    }

    fn was_supplied(&self, _name: &str) -> bool {
        false
    }

    fn supplied_option_names(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn check_unregistered(&self, _sink: &mut dyn DiagnosticSink) {}

    fn insert(&mut self, _name: &str, _value: &str) {}

    fn replace(&mut self, _name: &str, _value: &str) {}

    fn positional_tokens(&self) -> Vec<String> {
        Vec::new()
    }
}
