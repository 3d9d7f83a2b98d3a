use javelin_checks::rules::silly_string_operations::StringMethod;
use javelin_checks::rules::SillyStringOperations;
use javelin_checks::{MethodInvocationCheck, MethodMatcher, MethodRegistry, RegistryError};
use javelin_hir::MethodSymbol;
use javelin_types::well_known::{CHAR, CHAR_SEQUENCE, INT, STRING, STRING_BUILDER};
use javelin_types::TypeStore;
use proptest::prelude::*;

use crate::fixture::string_method;

fn builtin_entries() -> Vec<(MethodMatcher, StringMethod)> {
    let check = SillyStringOperations::new().expect("built-in checks register");
    check
        .registry()
        .iter()
        .map(|(matcher, tag)| (matcher.clone(), tag))
        .collect()
}

/// Resolved methods a front end could hand us, both registered and not.
fn sample_methods() -> Vec<MethodSymbol> {
    vec![
        string_method("contains", &[CHAR_SEQUENCE]),
        string_method("contains", &[STRING_BUILDER]),
        string_method("compareTo", &[STRING]),
        string_method("compareToIgnoreCase", &[STRING]),
        string_method("endsWith", &[STRING]),
        string_method("indexOf", &[STRING]),
        string_method("indexOf", &[STRING, INT]),
        string_method("indexOf", &[INT]),
        string_method("lastIndexOf", &[STRING]),
        string_method("lastIndexOf", &[STRING, INT]),
        string_method("matches", &[STRING]),
        string_method("replace", &[CHAR, CHAR]),
        string_method("replace", &[CHAR_SEQUENCE, CHAR_SEQUENCE]),
        string_method("replaceAll", &[STRING, STRING]),
        string_method("replaceFirst", &[STRING, STRING]),
        string_method("split", &[STRING]),
        string_method("split", &[STRING, INT]),
        string_method("startsWith", &[STRING]),
        string_method("startsWith", &[STRING, INT]),
        string_method("substring", &[INT]),
        string_method("substring", &[INT, INT]),
        string_method("length", &[]),
        string_method("trim", &[]),
        MethodSymbol::new(STRING_BUILDER, "indexOf", &[STRING], INT),
    ]
}

#[test]
fn every_builtin_overload_is_found() {
    let types = TypeStore::with_minimal_jdk();
    let registry = MethodRegistry::from_entries(builtin_entries()).unwrap();

    let found: Vec<Option<StringMethod>> =
        sample_methods().iter().map(|m| registry.find(m, &types)).collect();
    let misses = found.iter().filter(|tag| tag.is_none()).count();
    // `indexOf(int)`, `length()`, `trim()` and the StringBuilder call.
    assert_eq!(misses, 4);
    assert_eq!(
        registry.find(&string_method("contains", &[STRING_BUILDER]), &types),
        Some(StringMethod::Contains)
    );
}

#[test]
fn reusing_a_name_and_arity_for_another_method_is_rejected() {
    let mut registry = MethodRegistry::from_entries(builtin_entries()).unwrap();
    let err = registry
        .register(
            MethodMatcher::new()
                .type_definition(STRING)
                .name("substring")
                .add_parameter("long"),
            StringMethod::IndexOf,
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::Conflict { arity: 1, .. }), "{err}");
}

proptest! {
    #[test]
    fn registration_order_does_not_affect_matching(
        shuffled in Just(builtin_entries()).prop_shuffle(),
        duplicated in proptest::sample::subsequence(builtin_entries(), 0..=19),
    ) {
        let types = TypeStore::with_minimal_jdk();
        let reference = MethodRegistry::from_entries(builtin_entries()).unwrap();
        let reordered =
            MethodRegistry::from_entries(shuffled.into_iter().chain(duplicated)).unwrap();

        prop_assert_eq!(reordered.len(), reference.len());
        for method in sample_methods() {
            prop_assert_eq!(reordered.find(&method, &types), reference.find(&method, &types));
        }
    }
}
