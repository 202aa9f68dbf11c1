use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn custom() -> Ty {
    Ty::named("Custom")
}

fn plain() -> Ty {
    Ty::named("Plain")
}

fn registry(pairs: &[(Ty, Ty, PairOptions)]) -> TypePairRegistry {
    let mut builder = TypePairRegistry::builder();
    for (source, destination, options) in pairs {
        builder
            .add_pair(source.clone(), destination.clone(), *options)
            .unwrap();
    }
    builder.build()
}

#[test]
fn test_expanded_pair_maps_every_container_variant() {
    let reg = registry(&[(custom(), plain(), PairOptions::EXPANDED)]);

    assert_eq!(reg.lookup(&custom()), Some(plain()));
    for kind in ContainerKind::ALL {
        assert_eq!(reg.lookup(&kind.wrap(custom())), Some(kind.wrap(plain())));
    }
    assert_eq!(reg.len(), 5);
}

#[test]
fn test_exact_pair_does_not_expand() {
    let reg = registry(&[(custom(), plain(), PairOptions::EXACT)]);

    assert_eq!(reg.lookup(&custom()), Some(plain()));
    assert_eq!(reg.lookup(&Ty::list(custom())), None);
    assert_eq!(reg.len(), 1);
}

#[test]
fn test_bidirectional_pair_registers_mirror_once() {
    let reg = registry(&[(custom(), plain(), PairOptions::BIDIRECTIONAL)]);

    assert_eq!(reg.lookup(&plain()), Some(custom()));
    assert_eq!(reg.lookup(&Ty::array(plain())), Some(Ty::array(custom())));
    // Five forward pairs and five mirrored ones; no reverse of the reverse.
    assert_eq!(reg.len(), 10);
    assert_eq!(reg.declared(), &[TypePair::new(custom(), plain())]);
}

#[test]
fn test_explicit_mirror_registration_succeeds() {
    let reg = registry(&[
        (custom(), plain(), PairOptions::EXPANDED),
        (plain(), custom(), PairOptions::EXPANDED),
    ]);
    assert_eq!(reg.lookup(&plain()), Some(custom()));
}

#[test]
fn test_identical_pair_is_a_no_op() {
    let reg = registry(&[
        (custom(), plain(), PairOptions::EXPANDED),
        (custom(), plain(), PairOptions::EXPANDED),
    ]);
    assert_eq!(reg.len(), 5);
    assert_eq!(reg.declared().len(), 1);
}

#[test]
fn test_conflicting_destination_is_rejected() {
    let mut builder = TypePairRegistry::builder();
    builder
        .add_pair(custom(), plain(), PairOptions::EXPANDED)
        .unwrap();

    let err = builder
        .add_pair(custom(), Ty::named("Other"), PairOptions::EXPANDED)
        .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::ConflictingPair {
            ty: custom(),
            existing: plain(),
            attempted: Ty::named("Other"),
        }
    );
}

#[test]
fn test_failed_registration_leaves_builder_unchanged() {
    let mut builder = TypePairRegistry::builder();
    builder
        .add_pair(Ty::list(custom()), Ty::named("Plains"), PairOptions::EXACT)
        .unwrap();

    // The primary pair is new, but its list variant conflicts.
    let err = builder
        .add_pair(custom(), plain(), PairOptions::EXPANDED)
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::ConflictingPair { .. }));

    let reg = builder.build();
    assert_eq!(reg.lookup(&custom()), None);
    assert_eq!(reg.len(), 1);
}

#[test]
fn test_reverse_conflicts_with_existing_mapping() {
    let mut builder = TypePairRegistry::builder();
    builder
        .add_pair(custom(), plain(), PairOptions::BIDIRECTIONAL)
        .unwrap();

    let err = builder
        .add_pair(Ty::named("Other"), plain(), PairOptions::BIDIRECTIONAL)
        .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::ConflictingPair {
            ty: plain(),
            existing: custom(),
            attempted: Ty::named("Other"),
        }
    );
}

#[test]
fn test_by_ref_endpoint_is_rejected() {
    let mut builder = TypePairRegistry::builder();
    let err = builder
        .add_pair(custom().by_ref(), plain(), PairOptions::EXACT)
        .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::ByRefEndpoint {
            ty: custom().by_ref()
        }
    );
}

#[test]
fn test_lookup_rewraps_by_ref() {
    let reg = registry(&[(custom(), plain(), PairOptions::EXPANDED)]);

    assert_eq!(reg.lookup(&custom().by_ref()), Some(plain().by_ref()));
    assert_eq!(
        reg.lookup(&Ty::list(custom()).by_ref()),
        Some(Ty::list(plain()).by_ref())
    );
}

#[test]
fn test_substitute_passes_unmapped_types_through_by_default() {
    let reg = registry(&[(custom(), plain(), PairOptions::EXPANDED)]);
    let int = Ty::named("int");

    assert_eq!(reg.policy(), UnmappedPolicy::Passthrough);
    assert_eq!(reg.substitute(&int).unwrap(), int);
    assert_eq!(reg.substitute(&int.clone().by_ref()).unwrap(), int.by_ref());
    assert_eq!(reg.substitute(&custom()).unwrap(), plain());
}

#[test]
fn test_strict_policy_requires_declared_passthrough() {
    let mut builder = TypePairRegistry::builder();
    builder
        .add_pair(custom(), plain(), PairOptions::EXPANDED)
        .unwrap()
        .policy(UnmappedPolicy::Strict)
        .passthrough(Ty::named("int"));
    let reg = builder.build();

    assert_eq!(reg.substitute(&custom()).unwrap(), plain());
    assert_eq!(
        reg.substitute(&Ty::named("int").by_ref()).unwrap(),
        Ty::named("int").by_ref()
    );
    assert_eq!(
        reg.substitute(&Ty::named("Custmo").by_ref()).unwrap_err(),
        ConfigurationError::UnmappedType {
            ty: Ty::named("Custmo")
        }
    );
}

#[test]
fn test_by_ref_passthrough_declares_element_type() {
    let mut builder = TypePairRegistry::builder();
    builder
        .policy(UnmappedPolicy::Strict)
        .passthrough(Ty::named("str").by_ref());
    let reg = builder.build();

    assert_eq!(
        reg.substitute(&Ty::named("str").by_ref()).unwrap(),
        Ty::named("str").by_ref()
    );
    assert_eq!(reg.substitute(&Ty::named("str")).unwrap(), Ty::named("str"));
}

#[test]
fn test_pairs_iterate_in_registration_order() {
    let reg = registry(&[
        (custom(), plain(), PairOptions::EXACT),
        (Ty::named("A"), Ty::named("B"), PairOptions::EXACT),
    ]);
    let rendered: Vec<String> = reg.pairs().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["Custom -> Plain", "A -> B"]);
}

#[test]
fn test_apply_declaration() {
    let declaration = ShapeDeclaration {
        pairs: vec![crate::PairDeclaration {
            source: custom(),
            destination: plain(),
            expand_containers: true,
            add_reverse: true,
        }],
        strict: true,
        passthrough: vec![Ty::named("str")],
    };

    let mut builder = TypePairRegistry::builder();
    builder.apply(&declaration).unwrap();
    let reg = builder.build();

    assert_eq!(reg.policy(), UnmappedPolicy::Strict);
    assert_eq!(reg.lookup(&Ty::list(plain())), Some(Ty::list(custom())));
    assert_eq!(reg.substitute(&Ty::named("str")).unwrap(), Ty::named("str"));
}

fn type_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,6}"
}

proptest! {
    #[test]
    fn prop_distinct_expanded_pairs_resolve_every_variant(a in type_name(), b in type_name()) {
        prop_assume!(a != b);
        let (a, b) = (Ty::named(a), Ty::named(b));
        let reg = registry(&[(a.clone(), b.clone(), PairOptions::EXPANDED)]);

        for kind in ContainerKind::ALL {
            prop_assert_eq!(reg.lookup(&kind.wrap(a.clone())), Some(kind.wrap(b.clone())));
        }
    }

    #[test]
    fn prop_conflicting_second_destination_always_fails(
        a in type_name(),
        b in type_name(),
        c in type_name(),
    ) {
        prop_assume!(a != b && b != c);
        let mut builder = TypePairRegistry::builder();
        builder
            .add_pair(Ty::named(a.clone()), Ty::named(b), PairOptions::EXACT)
            .unwrap();
        let result = builder.add_pair(Ty::named(a), Ty::named(c), PairOptions::EXACT);
        let is_conflict = matches!(result, Err(ConfigurationError::ConflictingPair { .. }));
        prop_assert!(is_conflict);
    }
}
