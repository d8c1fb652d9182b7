//! Algebraic properties of the operator keys

use kernel_resource::InlineResources;
use kernel_test_utils::kernel::{inline_builder_with, inline_kernel};
use proptest::collection::{hash_set, vec};
use proptest::prelude::*;

fn token() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_append_then_remove_restores_the_list(
        base in hash_set(token(), 1..6),
        extra in token(),
    ) {
        prop_assume!(!base.contains(&extra));
        let base: Vec<String> = base.into_iter().collect();
        let kernel = inline_kernel(&format!(
            "items={}\nitems+={extra}\nitems-={extra}\n",
            base.join(",")
        ));
        prop_assert_eq!(kernel.resolve("items").unwrap(), base);
    }

    #[test]
    fn test_prepend_then_remove_restores_the_list(
        base in hash_set(token(), 1..6),
        extra in token(),
    ) {
        prop_assume!(!base.contains(&extra));
        let base: Vec<String> = base.into_iter().collect();
        let anchor = base[base.len() - 1].clone();
        let kernel = inline_kernel(&format!(
            "items={}\nitems^={anchor}:{extra}\nitems-={extra}\n",
            base.join(",")
        ));
        prop_assert_eq!(kernel.resolve("items").unwrap(), base);
    }

    #[test]
    fn test_last_assignment_wins_and_repeating_it_changes_nothing(
        values in vec(token(), 1..5),
    ) {
        let files = |values: &[String]| {
            values.iter().fold(InlineResources::new(), |resources, value| {
                resources.with("kernel.properties", format!("level={value}"))
            })
        };
        let last = values[values.len() - 1].clone();

        let kernel = inline_builder_with(files(&values)).build().unwrap();
        prop_assert_eq!(kernel.resolve("level").unwrap(), vec![last.clone()]);

        let mut repeated = values.clone();
        repeated.push(last.clone());
        let kernel = inline_builder_with(files(&repeated)).build().unwrap();
        prop_assert_eq!(kernel.resolve("level").unwrap(), vec![last]);
    }
}
