use super::*;
use crate::target::TargetReturn;
use crate::{Fault, Value};
use morph_types::{ConfigurationError, PairOptions, UnmappedPolicy};
use pretty_assertions::assert_eq;

struct Store;

fn custom() -> Ty {
    Ty::named("Custom")
}

fn plain() -> Ty {
    Ty::named("Plain")
}

fn registry(policy: UnmappedPolicy) -> Arc<TypePairRegistry> {
    let mut builder = TypePairRegistry::builder();
    builder
        .add_pair(custom(), plain(), PairOptions::BIDIRECTIONAL)
        .unwrap()
        .policy(policy)
        .passthrough(Ty::named("int"));
    Arc::new(builder.build())
}

fn store() -> Arc<TargetType<Store>> {
    let ok =
        |_: &Store, _: &mut [Value]| -> Result<TargetReturn, Fault> { Ok(TargetReturn::void()) };
    Arc::new(
        TargetType::builder("Store")
            .method("get", [plain()], plain(), ok)
            .method("get", [Ty::named("int")], plain(), ok)
            .method("all", [Ty::list(plain())], Ty::array(plain()), ok)
            .method("load", [Ty::named("int")], Ty::task_of(plain()), ok)
            .method("flush", [], Ty::Task, ok)
            .method("poll", [], Ty::value_task_of(plain()), ok)
            .method("bump", [Ty::named("int").by_ref(), plain().by_ref()], Ty::Void, ok)
            .method("save", [plain()], Ty::Void, ok)
            .method("count", [], Ty::named("int"), ok)
            .method("fetch", [Ty::named("int").by_ref()], Ty::Task, ok)
            .build()
            .unwrap(),
    )
}

fn resolver() -> MethodResolver<Store> {
    MethodResolver::new(registry(UnmappedPolicy::Passthrough), store())
}

#[test]
fn test_resolves_substituted_signature() {
    let method = AdapterMethod::new("get", [custom()], custom());
    let info = resolver().resolve(&method).unwrap();

    assert_eq!(info.method().signature().to_string(), "get(Plain) -> Plain");
    assert_eq!(info.adapter_params(), &[custom()]);
    assert_eq!(info.target_params(), &[plain()]);
    assert_eq!(info.return_kind(), ReturnKind::Sync);
    assert!(info.remap().is_none());
}

#[test]
fn test_picks_overload_by_parameter_types() {
    let method = AdapterMethod::new("get", [Ty::named("int")], custom());
    let info = resolver().resolve(&method).unwrap();
    assert_eq!(info.target_params(), &[Ty::named("int")]);
}

#[test]
fn test_container_parameters_substitute() {
    let method = AdapterMethod::new("all", [Ty::list(custom())], Ty::array(custom()));
    let info = resolver().resolve(&method).unwrap();
    assert_eq!(info.target_params(), &[Ty::list(plain())]);
    assert_eq!(info.target_return(), &Ty::array(plain()));
}

#[test]
fn test_by_ref_flags_survive_substitution() {
    let method = AdapterMethod::new(
        "bump",
        [Ty::named("int").by_ref(), custom().by_ref()],
        Ty::Void,
    );
    let info = resolver().resolve(&method).unwrap();
    assert_eq!(
        info.target_params(),
        &[Ty::named("int").by_ref(), plain().by_ref()]
    );
    assert_eq!(info.by_ref_positions().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(info.return_kind(), ReturnKind::Void);
}

#[test]
fn test_generic_task_records_remap() {
    let method = AdapterMethod::new("load", [Ty::named("int")], Ty::task_of(custom()));
    let info = resolver().resolve(&method).unwrap();
    assert_eq!(info.return_kind(), ReturnKind::GenericTask);
    assert_eq!(info.remap(), Some(&ResultRemap::new(plain(), custom())));

    let method = AdapterMethod::new("poll", [], Ty::value_task_of(custom()));
    let info = resolver().resolve(&method).unwrap();
    assert_eq!(info.return_kind(), ReturnKind::GenericValueTask);
    assert!(info.remap().is_some());

    let method = AdapterMethod::new("flush", [], Ty::Task);
    let info = resolver().resolve(&method).unwrap();
    assert_eq!(info.return_kind(), ReturnKind::Task);
    assert!(info.remap().is_none());
}

#[test]
fn test_missing_method_lists_candidates() {
    let method = AdapterMethod::new("get", [Ty::named("str")], custom());
    let err = resolver().resolve(&method).unwrap_err();
    match err {
        DispatchError::MethodNotFound {
            target_type,
            signature,
            candidates,
        } => {
            assert_eq!(target_type.as_str(), "Store");
            assert_eq!(signature, "get(str)");
            assert_eq!(
                candidates,
                vec!["get(Plain) -> Plain".to_owned(), "get(int) -> Plain".to_owned()]
            );
        }
        other => panic!("expected MethodNotFound, got {other:?}"),
    }
}

#[test]
fn test_return_kind_mismatch() {
    let method = AdapterMethod::new("save", [custom()], Ty::Task);
    let err = resolver().resolve(&method).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::ReturnTypeMismatch {
            adapter_kind: ReturnKind::Task,
            target_kind: ReturnKind::Void,
            ..
        }
    ));
    assert!(err.is_resolution_error());
}

#[test]
fn test_sync_value_against_task_is_mismatch() {
    let method = AdapterMethod::new("count", [], Ty::value_task_of(Ty::named("int")));
    let err = resolver().resolve(&method).unwrap_err();
    assert!(matches!(err, DispatchError::ReturnTypeMismatch { .. }));
}

#[test]
fn test_by_ref_on_async_rejected() {
    let method = AdapterMethod::new("fetch", [Ty::named("int").by_ref()], Ty::Task);
    let err = resolver().resolve(&method).unwrap_err();
    assert!(matches!(err, DispatchError::ByRefOnAsync { position: 0, .. }));
}

#[test]
fn test_strict_policy_rejects_unmapped_type() {
    let resolver = MethodResolver::new(registry(UnmappedPolicy::Strict), store());

    let declared = AdapterMethod::new("get", [Ty::named("int")], custom());
    assert!(resolver.resolve(&declared).is_ok());

    let undeclared = AdapterMethod::new("get", [Ty::named("str")], custom());
    let err = resolver.resolve(&undeclared).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Configuration(ConfigurationError::UnmappedType { .. })
    ));
}

#[test]
fn test_successes_cached_failures_not() {
    let resolver = resolver();
    let good = AdapterMethod::new("get", [custom()], custom());
    let bad = AdapterMethod::new("missing", [], Ty::Void);

    let first = resolver.resolve(&good).unwrap();
    let second = resolver.resolve(&good).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    assert!(resolver.resolve(&bad).is_err());
    assert!(resolver.resolve(&bad).is_err());
    assert_eq!(resolver.cache().len(), 1);
}

#[test]
fn test_clones_share_cache() {
    let resolver = resolver();
    let clone = resolver.clone();
    let method = AdapterMethod::new("count", [], Ty::named("int"));

    let info = clone.resolve(&method).unwrap();
    assert!(Arc::ptr_eq(&info, &resolver.cache().get(&method).unwrap()));
    assert!(info.is_equivalent(&resolver.resolve(&method).unwrap()));
}
