//! Double-dispatch over the closed set of option kinds

use crate::option::TypedOption;

/// A cross-cutting operation over heterogeneous option descriptors.
///
/// [`BaseOption::accept`](crate::BaseOption::accept) calls back into the
/// method matching the descriptor's kind, so a visitor can walk a mixed
/// collection of descriptors without inspecting kinds at each call site.
/// Every method defaults to a no-op; implementors override only the kinds
/// they care about.
pub trait OptionVisitor {
    fn visit_u32(&mut self, _option: &mut TypedOption<u32>) {}
    fn visit_u64(&mut self, _option: &mut TypedOption<u64>) {}
    fn visit_i32(&mut self, _option: &mut TypedOption<i32>) {}
    fn visit_i64(&mut self, _option: &mut TypedOption<i64>) {}
    fn visit_f32(&mut self, _option: &mut TypedOption<f32>) {}
    fn visit_bool(&mut self, _option: &mut TypedOption<bool>) {}
    fn visit_string(&mut self, _option: &mut TypedOption<String>) {}
    fn visit_vec_string(&mut self, _option: &mut TypedOption<Vec<String>>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::BaseOption;

    /// Overrides a single method; everything else stays a no-op.
    #[derive(Default)]
    struct CountStrings {
        seen: Vec<String>,
    }

    impl OptionVisitor for CountStrings {
        fn visit_string(&mut self, option: &mut TypedOption<String>) {
            self.seen.push(option.name().to_string());
        }
    }

    #[test]
    fn test_unimplemented_kinds_are_noops() {
        let mut visitor = CountStrings::default();
        let mut text = TypedOption::<String>::new("initial_regressor");
        let mut number = TypedOption::<u32>::new("bit_precision");

        text.accept(&mut visitor);
        number.accept(&mut visitor);

        assert_eq!(visitor.seen, vec!["initial_regressor".to_string()]);
    }
}
