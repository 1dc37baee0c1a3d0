use ferrous_locator::{
    injectable, ConstructorRegistration, LocatorOptions, MutableResolverExt, ResolveError, Resolver,
    ServiceLocator,
};
use std::any::type_name;
use std::sync::Arc;

struct Alpha {
    beta: Arc<Beta>,
}
injectable!(Alpha { beta: Beta });

struct Beta {
    alpha: Arc<Alpha>,
}
injectable!(Beta { alpha: Alpha });

struct Gamma {
    gamma: Arc<Gamma>,
}
injectable!(Gamma { gamma: Gamma });

/// Helper: assert that resolution failed with a cycle along `expected_path`.
fn assert_circular(err: Option<ResolveError>, expected_path: &[&str]) {
    match err {
        Some(ResolveError::Circular(path)) => assert_eq!(path, expected_path, "wrong circular path"),
        other => panic!("expected circular dependency error, got {:?}", other),
    }
}

#[test]
fn test_self_circular_dependency() {
    let locator = ServiceLocator::new();
    locator.register_injectable_self::<Gamma>(None);

    assert_circular(
        locator.get::<Gamma>().err(),
        &[type_name::<Gamma>(), type_name::<Gamma>()],
    );
}

#[test]
fn test_two_service_cycle() {
    let locator = ServiceLocator::new();
    locator.register_injectable_self::<Alpha>(None);
    locator.register_injectable_self::<Beta>(None);

    assert_circular(
        locator.get::<Alpha>().err(),
        &[type_name::<Alpha>(), type_name::<Beta>(), type_name::<Alpha>()],
    );
    assert_circular(
        locator.get::<Beta>().err(),
        &[type_name::<Beta>(), type_name::<Alpha>(), type_name::<Beta>()],
    );
}

#[test]
fn test_lazy_singleton_cycle_fails_instead_of_deadlocking() {
    let locator = ServiceLocator::new();
    locator.register_lazy_injectable_self::<Alpha>(None);
    locator.register_lazy_injectable_self::<Beta>(None);

    assert_circular(
        locator.get::<Alpha>().err(),
        &[type_name::<Alpha>(), type_name::<Beta>(), type_name::<Alpha>()],
    );
}

#[test]
fn test_cycle_path_includes_contract() {
    let locator = ServiceLocator::new();
    locator.register_injectable_self::<Gamma>(Some("loop"));

    let expected = format!("{} [loop]", type_name::<Gamma>());
    assert_circular(locator.get_named::<Gamma>("loop").err(), &[expected.as_str(), expected.as_str()]);
}

#[test]
fn test_closure_factory_cycle() {
    struct SelfReferencing;

    let locator = ServiceLocator::new();
    locator.register_fn::<SelfReferencing, _>(None, |r| {
        r.get_required::<SelfReferencing>()?;
        Ok(Arc::new(SelfReferencing))
    });

    assert_circular(
        locator.get::<SelfReferencing>().err(),
        &[type_name::<SelfReferencing>(), type_name::<SelfReferencing>()],
    );
}

#[test]
fn test_failed_cycle_leaves_locator_usable() {
    let locator = ServiceLocator::new();
    locator.register_injectable_self::<Gamma>(None);
    locator.register_constant(Arc::new(5u8), None);

    assert!(locator.get::<Gamma>().is_err());
    assert_eq!(*locator.get_required::<u8>().unwrap(), 5);
    assert!(locator.get::<Gamma>().is_err());
}

#[test]
fn test_depth_limit_without_cycle_detection() {
    let options = LocatorOptions::default()
        .with_cycle_detection(false)
        .with_max_resolution_depth(8);
    let locator = ServiceLocator::with_options(options);
    locator.register_injectable_self::<Gamma>(None);

    assert_eq!(locator.get::<Gamma>().err(), Some(ResolveError::DepthExceeded(8)));
}

#[test]
fn test_lazy_self_cycle_without_cycle_detection() {
    let options = LocatorOptions::default()
        .with_cycle_detection(false)
        .with_max_resolution_depth(8);
    let locator = ServiceLocator::with_options(options);
    locator.register_lazy_injectable_self::<Gamma>(None);

    // The singleton slot refuses re-entry before the depth limit is reached
    assert_circular(
        locator.get::<Gamma>().err(),
        &[type_name::<Gamma>(), type_name::<Gamma>()],
    );
    assert_circular(
        locator.get::<Gamma>().err(),
        &[type_name::<Gamma>(), type_name::<Gamma>()],
    );
}

#[test]
fn test_deep_chain_within_limit() {
    struct L0;
    struct L1 {
        l0: Arc<L0>,
    }
    struct L2 {
        l1: Arc<L1>,
    }
    struct L3 {
        l2: Arc<L2>,
    }
    injectable!(L0 {});
    injectable!(L1 { l0: L0 });
    injectable!(L2 { l1: L1 });
    injectable!(L3 { l2: L2 });

    let locator = ServiceLocator::with_options(LocatorOptions::default().with_max_resolution_depth(4));
    locator.register_injectable_self::<L0>(None);
    locator.register_injectable_self::<L1>(None);
    locator.register_injectable_self::<L2>(None);
    locator.register_injectable_self::<L3>(None);

    let top = locator.get_required::<L3>().unwrap();
    assert_eq!(Arc::strong_count(&top.l2.l1.l0), 1);

    let shallow = ServiceLocator::with_options(LocatorOptions::default().with_max_resolution_depth(3));
    shallow.register_injectable_self::<L0>(None);
    shallow.register_injectable_self::<L1>(None);
    shallow.register_injectable_self::<L2>(None);
    shallow.register_injectable_self::<L3>(None);
    assert_eq!(shallow.get::<L3>().err(), Some(ResolveError::DepthExceeded(3)));
}
