//! The closed set of value kinds an option may carry

use anyhow::{Context, Result, bail};

use crate::option::TypedOption;
use crate::visitor::OptionVisitor;

mod sealed {
    pub trait Sealed {}

    impl Sealed for u32 {}
    impl Sealed for u64 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f32 {}
    impl Sealed for bool {}
    impl Sealed for String {}
    impl Sealed for Vec<String> {}
}

/// A value kind an option is allowed to carry.
///
/// The set is closed: exactly `u32`, `u64`, `i32`, `i64`, `f32`, `bool`,
/// `String` and `Vec<String>` implement it, and the sealing module prevents
/// downstream additions. Every kind knows how to dispatch itself into the
/// matching [`OptionVisitor`] method, how to build itself from raw string
/// tokens, and how to render itself for choice-violation messages.
pub trait OptionKind: sealed::Sealed + Clone + PartialEq + std::fmt::Debug + 'static {
    /// Short kind name used in diagnostics and kind-mismatch errors.
    const KIND: &'static str;

    /// Invoke the visitor method matching this kind.
    fn dispatch(option: &mut TypedOption<Self>, visitor: &mut dyn OptionVisitor);

    /// Build a value from the raw tokens supplied for `name`.
    fn from_tokens(name: &str, tokens: &[String]) -> Result<Self>;

    /// Textual form used in choice-violation messages.
    ///
    /// Kinds returning `None` do not participate in one-of constraints;
    /// no violation text is ever recorded for them.
    fn format(value: &Self) -> Option<String>;
}

/// Scalar kinds accept one token; repeated identical tokens collapse.
fn single_token<'a>(name: &str, tokens: &'a [String]) -> Result<&'a str> {
    let Some(first) = tokens.first() else {
        bail!("option --{} was supplied without a value", name);
    };
    if tokens.iter().any(|token| token != first) {
        bail!(
            "option --{} expects a single value but was supplied conflicting values {:?}",
            name,
            tokens
        );
    }
    Ok(first.as_str())
}

macro_rules! scalar_kind {
    ($ty:ty, $kind:literal, $visit:ident) => {
        impl OptionKind for $ty {
            const KIND: &'static str = $kind;

            fn dispatch(option: &mut TypedOption<Self>, visitor: &mut dyn OptionVisitor) {
                visitor.$visit(option);
            }

            fn from_tokens(name: &str, tokens: &[String]) -> Result<Self> {
                let token = single_token(name, tokens)?;
                token.parse::<$ty>().with_context(|| {
                    format!(
                        "option --{} expects a value of kind {}, got '{}'",
                        name, $kind, token
                    )
                })
            }

            fn format(value: &Self) -> Option<String> {
                Some(value.to_string())
            }
        }
    };
}

scalar_kind!(u32, "u32", visit_u32);
scalar_kind!(u64, "u64", visit_u64);
scalar_kind!(i32, "i32", visit_i32);
scalar_kind!(i64, "i64", visit_i64);
scalar_kind!(f32, "f32", visit_f32);

impl OptionKind for bool {
    const KIND: &'static str = "bool";

    fn dispatch(option: &mut TypedOption<Self>, visitor: &mut dyn OptionVisitor) {
        visitor.visit_bool(option);
    }

    /// A switch: a bare occurrence (empty token) means `true`.
    fn from_tokens(name: &str, tokens: &[String]) -> Result<Self> {
        let token = single_token(name, tokens)?;
        if token.is_empty() {
            return Ok(true);
        }
        token
            .parse::<bool>()
            .with_context(|| format!("option --{} expects 'true' or 'false', got '{}'", name, token))
    }

    fn format(value: &Self) -> Option<String> {
        Some(value.to_string())
    }
}

impl OptionKind for String {
    const KIND: &'static str = "string";

    fn dispatch(option: &mut TypedOption<Self>, visitor: &mut dyn OptionVisitor) {
        visitor.visit_string(option);
    }

    fn from_tokens(name: &str, tokens: &[String]) -> Result<Self> {
        Ok(single_token(name, tokens)?.to_string())
    }

    fn format(value: &Self) -> Option<String> {
        Some(value.clone())
    }
}

impl OptionKind for Vec<String> {
    const KIND: &'static str = "list of strings";

    fn dispatch(option: &mut TypedOption<Self>, visitor: &mut dyn OptionVisitor) {
        visitor.visit_vec_string(option);
    }

    /// Collects every token in supply order.
    fn from_tokens(_name: &str, tokens: &[String]) -> Result<Self> {
        Ok(tokens.to_vec())
    }

    fn format(_value: &Self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_scalar_parses_single_token() {
        let value = u32::from_tokens("bits", &tokens(&["18"])).unwrap();
        assert_eq!(value, 18);
    }

    #[test]
    fn test_scalar_rejects_conflicting_tokens() {
        let result = u32::from_tokens("bits", &tokens(&["18", "20"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_scalar_collapses_identical_tokens() {
        let value = f32::from_tokens("alpha", &tokens(&["0.5", "0.5"])).unwrap();
        assert_eq!(value, 0.5);
    }

    #[test]
    fn test_scalar_rejects_malformed_token() {
        let result = i64::from_tokens("passes", &tokens(&["many"]));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("--passes"));
        assert!(message.contains("i64"));
    }

    #[test]
    fn test_bool_bare_occurrence_is_true() {
        assert!(bool::from_tokens("quiet", &tokens(&[""])).unwrap());
        assert!(!bool::from_tokens("quiet", &tokens(&["false"])).unwrap());
    }

    #[test]
    fn test_vec_string_collects_all_tokens() {
        let value = Vec::<String>::from_tokens("stages", &tokens(&["load", "train"])).unwrap();
        assert_eq!(value, vec!["load".to_string(), "train".to_string()]);
    }

    #[test]
    fn test_vec_string_does_not_format() {
        assert!(Vec::<String>::format(&vec!["a".to_string()]).is_none());
        assert_eq!(f32::format(&0.1), Some("0.1".to_string()));
    }
}
