//! In-memory registry backend fed from a programmatic value map

use std::collections::{BTreeSet, HashMap};

use anyhow::{Result, anyhow, bail};

use crate::group::OptionGroup;
use crate::kind::OptionKind;
use crate::option::{BaseOption, TypedOption};
use crate::options::{DiagnosticSink, Options};
use crate::visitor::OptionVisitor;

/// The value-storing [`Options`] backend.
///
/// Raw values are string-typed and enter through [`insert`](Options::insert),
/// [`replace`](Options::replace) or [`append`](Self::append) before groups
/// are registered; argv-style tokenization happens upstream and is not this
/// backend's concern. [`register_group`](Options::register_group) performs
/// the canonical feed pass for the group it is given: each descriptor gets
/// its raw tokens parsed and applied with the canonical flag set, or its
/// default applied when nothing was supplied. Raw values are consulted at
/// registration time only, so a value inserted later affects only
/// later-registered groups.
#[derive(Default)]
pub struct OptionsRegistry {
    options: HashMap<String, Box<dyn BaseOption>>,
    short_names: HashMap<String, String>,
    help_group_names: Vec<String>,
    raw_values: HashMap<String, Vec<String>>,
    supplied: BTreeSet<String>,
    positional: Vec<String>,
}

impl OptionsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one more raw token for `name`, keeping earlier ones. This is
    /// the feed path for list-kinded options, mirroring an option supplied
    /// several times.
    pub fn append(&mut self, name: &str, value: &str) {
        self.raw_values
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// Record a free-standing token that binds to no named option.
    pub fn add_positional_token(&mut self, token: &str) {
        self.positional.push(token.to_string());
    }

    /// Typed read access to a registered descriptor.
    pub fn get<T: OptionKind>(&self, name: &str) -> Result<&TypedOption<T>> {
        let option = self
            .options
            .get(name)
            .ok_or_else(|| anyhow!("option --{} was never registered", name))?;
        option
            .as_any()
            .downcast_ref::<TypedOption<T>>()
            .ok_or_else(|| kind_mismatch(name, option.kind_name(), T::KIND))
    }

    /// Typed mutable access, for programmatic overrides outside the
    /// canonical pass.
    pub fn get_mut<T: OptionKind>(&mut self, name: &str) -> Result<&mut TypedOption<T>> {
        let option = self
            .options
            .get_mut(name)
            .ok_or_else(|| anyhow!("option --{} was never registered", name))?;
        let kind = option.kind_name();
        option
            .as_any_mut()
            .downcast_mut::<TypedOption<T>>()
            .ok_or_else(|| kind_mismatch(name, kind, T::KIND))
    }

    /// Distinct help-group names, in registration order.
    pub fn help_group_names(&self) -> &[String] {
        &self.help_group_names
    }

    /// Register a group whose activation is gated on necessary options.
    ///
    /// Returns whether every necessary member of the group was supplied.
    /// A group with no necessary members is a declaration mistake here;
    /// use [`register_group`](Options::register_group) for those.
    pub fn register_group_and_check_necessary(&mut self, group: OptionGroup) -> Result<bool> {
        let necessary: Vec<String> = group
            .options()
            .iter()
            .filter(|option| option.is_necessary())
            .map(|option| option.name().to_string())
            .collect();
        if necessary.is_empty() {
            bail!(
                "group '{}' declares no necessary options; register_group_and_check_necessary \
                 cannot gate on it",
                group.name()
            );
        }
        self.register_group(group)?;
        Ok(necessary.iter().all(|name| self.supplied.contains(name)))
    }

    fn tokens_for(&self, name: &str) -> Vec<String> {
        if let Some(tokens) = self.raw_values.get(name) {
            return tokens.clone();
        }
        if let Some(option) = self.options.get(name) {
            let short = option.get_short_name();
            if !short.is_empty() {
                if let Some(tokens) = self.raw_values.get(short) {
                    return tokens.clone();
                }
            }
        }
        Vec::new()
    }
}

impl Options for OptionsRegistry {
    fn register_group(&mut self, group: OptionGroup) -> Result<()> {
        let (group_name, incoming) = group.into_parts();

        // Validate the whole group before touching the registered set, so a
        // rejected group leaves the backend unchanged.
        let mut seen_in_group: HashMap<&str, &dyn BaseOption> = HashMap::new();
        for option in &incoming {
            let name = option.name();
            if let Some(existing) = self.options.get(name) {
                if !existing.schema_eq(option.as_ref()) {
                    bail!("option --{} is already registered with a different schema", name);
                }
            } else if let Some(prior) = seen_in_group.get(name) {
                if !prior.schema_eq(option.as_ref()) {
                    bail!("group '{}' declares option --{} twice with different schemas", group_name, name);
                }
            }
            let short = option.get_short_name();
            if !short.is_empty() {
                if let Some(long) = self.short_names.get(short) {
                    if long != name {
                        bail!("short name -{} is already taken by option --{}", short, long);
                    }
                }
            }
            seen_in_group.insert(name, option.as_ref());
        }

        if !group_name.is_empty() && !self.help_group_names.contains(&group_name) {
            self.help_group_names.push(group_name);
        }

        let mut feed_order: Vec<String> = Vec::new();
        for option in incoming {
            let name = option.name().to_string();
            let short = option.get_short_name().to_string();
            // A re-registration with an identical schema keeps the first
            // descriptor and its state.
            if !self.options.contains_key(&name) {
                log::debug!("Registered option: --{} ({})", name, option.kind_name());
                if !short.is_empty() {
                    self.short_names.insert(short, name.clone());
                }
                self.options.insert(name.clone(), option);
            }
            if !feed_order.contains(&name) {
                feed_order.push(name);
            }
        }

        // Canonical feed pass for this group.
        for name in feed_order {
            let tokens = self.tokens_for(&name);
            let Some(option) = self.options.get_mut(&name) else {
                continue;
            };
            let mut feeder = TokenFeeder {
                tokens: &tokens,
                fed_from_tokens: false,
                error: None,
            };
            option.accept(&mut feeder);
            if let Some(error) = feeder.error {
                return Err(error);
            }
            if feeder.fed_from_tokens {
                log::debug!("Fed option: --{} from {} token(s)", name, tokens.len());
                self.supplied.insert(name);
            }
        }
        Ok(())
    }

    fn was_supplied(&self, name: &str) -> bool {
        self.supplied.contains(name)
    }

    fn supplied_option_names(&self) -> BTreeSet<String> {
        self.supplied.clone()
    }

    fn check_unregistered(&self, sink: &mut dyn DiagnosticSink) {
        let mut names: Vec<&String> = self
            .raw_values
            .keys()
            .filter(|name| {
                !self.options.contains_key(*name) && !self.short_names.contains_key(*name)
            })
            .collect();
        names.sort();
        for name in names {
            sink.report(&format!("unrecognized option: --{}", name));
        }
    }

    fn insert(&mut self, name: &str, value: &str) {
        self.raw_values
            .entry(name.to_string())
            .or_insert_with(|| vec![value.to_string()]);
    }

    fn replace(&mut self, name: &str, value: &str) {
        self.raw_values
            .insert(name.to_string(), vec![value.to_string()]);
    }

    fn positional_tokens(&self) -> Vec<String> {
        self.positional.clone()
    }
}

fn kind_mismatch(name: &str, actual: &'static str, requested: &'static str) -> anyhow::Error {
    anyhow!(
        "option --{} holds a value of kind {}, not {}",
        name,
        actual,
        requested
    )
}

/// Applies raw tokens to descriptors during the canonical pass: tokens are
/// parsed per kind, falling back to the declared default when none exist.
struct TokenFeeder<'a> {
    tokens: &'a [String],
    fed_from_tokens: bool,
    error: Option<anyhow::Error>,
}

impl TokenFeeder<'_> {
    fn feed<T: OptionKind>(&mut self, option: &mut TypedOption<T>) {
        if !self.tokens.is_empty() {
            match T::from_tokens(option.name(), self.tokens) {
                Ok(value) => {
                    option.set_value(value, true);
                    self.fed_from_tokens = true;
                }
                Err(error) => self.error = Some(error),
            }
        } else if option.default_value_supplied() {
            if let Ok(default) = option.get_default_value() {
                option.set_value(default, true);
            }
        }
    }
}

impl OptionVisitor for TokenFeeder<'_> {
    fn visit_u32(&mut self, option: &mut TypedOption<u32>) {
        self.feed(option);
    }

    fn visit_u64(&mut self, option: &mut TypedOption<u64>) {
        self.feed(option);
    }

    fn visit_i32(&mut self, option: &mut TypedOption<i32>) {
        self.feed(option);
    }

    fn visit_i64(&mut self, option: &mut TypedOption<i64>) {
        self.feed(option);
    }

    fn visit_f32(&mut self, option: &mut TypedOption<f32>) {
        self.feed(option);
    }

    fn visit_bool(&mut self, option: &mut TypedOption<bool>) {
        self.feed(option);
    }

    fn visit_string(&mut self, option: &mut TypedOption<String>) {
        self.feed(option);
    }

    fn visit_vec_string(&mut self, option: &mut TypedOption<Vec<String>>) {
        self.feed(option);
    }
}
