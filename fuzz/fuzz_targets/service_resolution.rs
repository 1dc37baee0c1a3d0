#![no_main]

use ferrous_locator::{
    injectable, ConstructorRegistration, MutableResolverExt, ResolveError, Resolver, ServiceKey,
    ServiceLocator,
};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

const CONTRACTS: [Option<&str>; 4] = [None, Some("a"), Some("b"), Some("")];

struct Leaf {
    id: u32,
}

struct Node {
    leaf: Arc<Leaf>,
}
injectable!(Node { leaf: Leaf });

struct Root {
    node: Arc<Node>,
    leaf: Arc<Leaf>,
}
injectable!(Root { node: Node, leaf: Leaf });

fuzz_target!(|data: &[u8]| {
    let locator = ServiceLocator::new();

    // Each byte is one operation: low bits pick the action, high bits the contract
    for &byte in data.iter().take(64) {
        let contract = CONTRACTS[(byte >> 6) as usize];
        match byte & 0x07 {
            0 => locator.register_constant(Arc::new(Leaf { id: byte as u32 }), contract),
            1 => locator.register_injectable_self::<Node>(contract),
            2 => locator.register_lazy_injectable_self::<Node>(contract),
            3 => locator.register_injectable_self::<Root>(contract),
            4 => locator.register_lazy_injectable_self::<Root>(contract),
            5 => {
                locator.unregister_current(&ServiceKey::with_contract::<Leaf>(contract));
            }
            _ => check_root(&locator, contract),
        }
    }

    for contract in CONTRACTS {
        check_root(&locator, contract);
    }
});

fn check_root(locator: &ServiceLocator, contract: Option<&'static str>) {
    match locator.get_with_contract::<Root>(contract) {
        Ok(Some(root)) => {
            let _ = root.node.leaf.id ^ root.leaf.id;
        }
        Ok(None) => {}
        Err(ResolveError::MissingParameter { parameter, .. }) => {
            assert!(parameter == "node" || parameter == "leaf");
        }
        Err(other) => panic!("unexpected resolution error: {}", other),
    }
}
