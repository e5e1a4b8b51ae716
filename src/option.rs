//! Option descriptors: typed storage, constraints and external bindings

use std::any::{Any, TypeId};
use std::sync::{Arc, RwLock};

use anyhow::{Result, anyhow};

use crate::kind::OptionKind;
use crate::visitor::OptionVisitor;

/// A shared write target bound to an option descriptor.
///
/// The caller keeps one handle and reads the final value through it after
/// the canonical feed pass; the descriptor keeps another and writes through
/// it at most once. Cloning is cheap and refers to the same slot.
#[derive(Clone, Debug)]
pub struct Location<T> {
    slot: Arc<RwLock<T>>,
}

impl<T: Clone> Location<T> {
    pub fn new(initial: T) -> Self {
        Self {
            slot: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn get(&self) -> T {
        self.slot.read().unwrap().clone()
    }

    fn set(&self, value: T) {
        *self.slot.write().unwrap() = value;
    }
}

/// Type-erased view of an option descriptor.
///
/// Groups and registry backends store descriptors behind this trait; the
/// typed API is recovered either through [`accept`](BaseOption::accept)
/// (visitor dispatch) or through [`as_any`](BaseOption::as_any) downcasting.
pub trait BaseOption {
    /// Unique long name. Immutable after construction.
    fn name(&self) -> &str;
    fn get_help(&self) -> &str;
    fn get_short_name(&self) -> &str;
    /// Identity of the carried value kind.
    fn kind_id(&self) -> TypeId;
    /// Human-readable name of the carried value kind.
    fn kind_name(&self) -> &'static str;
    fn is_keep(&self) -> bool;
    fn is_necessary(&self) -> bool;
    fn is_allow_override(&self) -> bool;
    fn is_hidden_from_help(&self) -> bool;
    /// The recorded choice-violation message, if a supplied value fell
    /// outside the one-of constraint.
    fn one_of_violation(&self) -> Option<&str>;
    /// Whether a value has been supplied. Always safe to call.
    fn value_supplied(&self) -> bool;

    /// Dispatch into the visitor method matching this descriptor's kind.
    fn accept(&mut self, visitor: &mut dyn OptionVisitor);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Schema equality: two descriptors are equal iff name, kind identity,
    /// help, short name, keep flag and necessary flag all match. Neither
    /// default values nor supplied values participate. Total; never fails.
    fn schema_eq(&self, other: &dyn BaseOption) -> bool {
        self.name() == other.name()
            && self.kind_id() == other.kind_id()
            && self.get_help() == other.get_help()
            && self.get_short_name() == other.get_short_name()
            && self.is_keep() == other.is_keep()
            && self.is_necessary() == other.is_necessary()
    }
}

/// A declared, named configurable setting with a static kind.
///
/// Built once at declaration time through the fluent methods, bundled into
/// an [`OptionGroup`](crate::OptionGroup), then transitioned to "supplied"
/// during one canonical feed pass. "Has default" and "has supplied value"
/// are independent presence states; [`value_supplied`](Self::value_supplied)
/// and [`default_value_supplied`](Self::default_value_supplied) must be
/// checked before the corresponding getters.
///
/// A supplied value that falls outside the one-of constraint is not
/// rejected: the violation message is recorded and surfaced through
/// [`one_of_violation`](BaseOption::one_of_violation), so declarations may
/// pass through transient invalid states while being populated.
#[derive(Clone, Debug)]
pub struct TypedOption<T: OptionKind> {
    name: String,
    help: String,
    short_name: String,
    keep: bool,
    necessary: bool,
    allow_override: bool,
    hidden_from_help: bool,
    one_of_err: Option<String>,
    value: Option<T>,
    default: Option<T>,
    one_of: Vec<T>,
    location: Option<Location<T>>,
    location_written: bool,
}

impl<T: OptionKind> TypedOption<T> {
    /// Create a descriptor. The name is its unique key and must be
    /// non-empty.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "option name must not be empty");
        Self {
            name,
            help: String::new(),
            short_name: String::new(),
            keep: false,
            necessary: false,
            allow_override: false,
            hidden_from_help: false,
            one_of_err: None,
            value: None,
            default: None,
            one_of: Vec::new(),
            location: None,
            location_written: false,
        }
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help = text.to_string();
        self
    }

    pub fn short_name(mut self, short: &str) -> Self {
        self.short_name = short.to_string();
        self
    }

    /// Mark the option as one to keep in serialized model state.
    pub fn keep(mut self) -> Self {
        self.keep = true;
        self
    }

    /// Mark the option as necessary for its group to activate.
    pub fn necessary(mut self) -> Self {
        self.necessary = true;
        self
    }

    pub fn allow_override(mut self) -> Self {
        self.allow_override = true;
        self
    }

    pub fn hidden_from_help(mut self) -> Self {
        self.hidden_from_help = true;
        self
    }

    pub fn default_value(mut self, value: T) -> Self {
        self.set_default_value(value);
        self
    }

    pub fn one_of(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.set_one_of(values);
        self
    }

    /// Bind an external write target. Only the first canonical
    /// [`set_value`](Self::set_value) writes through it.
    pub fn bind(mut self, location: &Location<T>) -> Self {
        self.location = Some(location.clone());
        self
    }

    /// Record the fallback value used when nothing is supplied.
    pub fn set_default_value(&mut self, value: T) {
        self.default = Some(value);
    }

    pub fn default_value_supplied(&self) -> bool {
        self.default.is_some()
    }

    pub fn get_default_value(&self) -> Result<T> {
        self.default.clone().ok_or_else(|| {
            anyhow!(
                "option --{} has no default value; call default_value_supplied() before reading it",
                self.name
            )
        })
    }

    /// Record `value` as supplied.
    ///
    /// `from_canonical_parse` must be true only for the single authoritative
    /// feed pass: that is the one transition allowed to write a bound
    /// [`Location`], and it does so at most once. Later sets, canonical or
    /// not, never touch the location again.
    ///
    /// If a one-of constraint exists and `value` is not a member, the
    /// violation message is recorded instead of failing.
    pub fn set_value(&mut self, value: T, from_canonical_parse: bool) {
        if from_canonical_parse && !self.location_written {
            if let Some(location) = &self.location {
                location.set(value.clone());
                self.location_written = true;
            }
        }
        if !self.one_of.is_empty() && !self.one_of.contains(&value) {
            if let Some(shown) = T::format(&value) {
                self.one_of_err = Some(invalid_choice_message(&self.name, &shown, &self.one_of));
            }
        }
        self.value = Some(value);
    }

    pub fn get_value(&self) -> Result<T> {
        self.value.clone().ok_or_else(|| {
            anyhow!(
                "option --{} has no supplied value; call value_supplied() before reading it",
                self.name
            )
        })
    }

    /// Install the legal-value constraint. An empty set means
    /// unconstrained. Declaration order is preserved in violation messages.
    pub fn set_one_of(&mut self, values: impl IntoIterator<Item = T>) {
        self.one_of = values.into_iter().collect();
    }

    pub fn get_one_of(&self) -> &[T] {
        &self.one_of
    }
}

impl<T: OptionKind> BaseOption for TypedOption<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_help(&self) -> &str {
        &self.help
    }

    fn get_short_name(&self) -> &str {
        &self.short_name
    }

    fn kind_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn kind_name(&self) -> &'static str {
        T::KIND
    }

    fn is_keep(&self) -> bool {
        self.keep
    }

    fn is_necessary(&self) -> bool {
        self.necessary
    }

    fn is_allow_override(&self) -> bool {
        self.allow_override
    }

    fn is_hidden_from_help(&self) -> bool {
        self.hidden_from_help
    }

    fn one_of_violation(&self) -> Option<&str> {
        self.one_of_err.as_deref()
    }

    fn value_supplied(&self) -> bool {
        self.value.is_some()
    }

    fn accept(&mut self, visitor: &mut dyn OptionVisitor) {
        T::dispatch(self, visitor);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Schema equality; see [`BaseOption::schema_eq`].
impl<T: OptionKind> PartialEq for TypedOption<T> {
    fn eq(&self, other: &Self) -> bool {
        self.schema_eq(other)
    }
}

fn invalid_choice_message<T: OptionKind>(name: &str, value: &str, allowed: &[T]) -> String {
    let allowed: Vec<String> = allowed.iter().filter_map(T::format).collect();
    format!(
        "Error: '{}' is not a valid choice for option --{}. Please select from {{{}}}",
        value,
        name,
        allowed.join(", ")
    )
}
