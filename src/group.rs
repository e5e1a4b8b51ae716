//! Named bundles of option descriptors

use crate::kind::OptionKind;
use crate::option::{BaseOption, TypedOption};

/// A help group: a named bundle of related descriptors registered into a
/// backend as one unit.
pub struct OptionGroup {
    name: String,
    options: Vec<Box<dyn BaseOption>>,
}

impl OptionGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    /// Add a descriptor, builder-style.
    pub fn add<T: OptionKind>(mut self, option: TypedOption<T>) -> Self {
        self.options.push(Box::new(option));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[Box<dyn BaseOption>] {
        &self.options
    }

    /// Whether any member is flagged necessary for group activation.
    pub fn contains_necessary(&self) -> bool {
        self.options.iter().any(|option| option.is_necessary())
    }

    /// Decompose into name and descriptors; used by backends taking
    /// ownership of the group's contents.
    pub fn into_parts(self) -> (String, Vec<Box<dyn BaseOption>>) {
        (self.name, self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_chains_and_preserves_order() {
        let group = OptionGroup::new("Cache Options")
            .add(TypedOption::<u64>::new("cache_size"))
            .add(TypedOption::<bool>::new("cache_readonly"));

        assert_eq!(group.name(), "Cache Options");
        let names: Vec<&str> = group.options().iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["cache_size", "cache_readonly"]);
    }

    #[test]
    fn test_contains_necessary() {
        let plain = OptionGroup::new("Logging Options")
            .add(TypedOption::<bool>::new("quiet"));
        assert!(!plain.contains_necessary());

        let gated = OptionGroup::new("Search Options")
            .add(TypedOption::<u32>::new("search").necessary())
            .add(TypedOption::<u32>::new("search_beam"));
        assert!(gated.contains_necessary());
    }
}
