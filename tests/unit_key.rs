/// Unit tests for ServiceKey and TypeToken

use ferrous_locator::{ServiceKey, TypeToken};
use std::any::TypeId;
use std::collections::HashSet;

trait Logger: Send + Sync {}

#[test]
fn test_type_token_identity() {
    let token = TypeToken::of::<String>();
    assert_eq!(token.type_id(), TypeId::of::<String>());
    assert_eq!(token.type_name(), "alloc::string::String");
    assert_eq!(token, TypeToken::of::<String>());
    assert_ne!(token, TypeToken::of::<u32>());
}

#[test]
fn test_type_token_for_trait_object() {
    let token = TypeToken::of::<dyn Logger>();
    assert_eq!(token.type_id(), TypeId::of::<dyn Logger>());
    assert!(token.type_name().starts_with("dyn "));
    assert!(token.type_name().ends_with("Logger"));
}

#[test]
fn test_key_display_name_plain() {
    let key = ServiceKey::of::<String>();
    assert_eq!(key.display_name(), "alloc::string::String");
    assert_eq!(key.to_string(), "alloc::string::String");
    assert_eq!(key.contract(), None);
}

#[test]
fn test_key_display_name_with_contract() {
    let key = ServiceKey::named::<u32>("database_port");
    assert_eq!(key.display_name(), "u32");
    assert_eq!(key.to_string(), "u32 [database_port]");
    assert_eq!(key.contract(), Some("database_port"));
}

#[test]
fn test_key_constructors_agree() {
    let token = TypeToken::of::<u32>();
    assert_eq!(ServiceKey::new(token, None), ServiceKey::of::<u32>());
    assert_eq!(ServiceKey::new(token, Some("a")), ServiceKey::named::<u32>("a"));
    assert_eq!(ServiceKey::with_contract::<u32>(Some("a")), ServiceKey::named::<u32>("a"));
    assert_eq!(ServiceKey::with_contract::<u32>(None), ServiceKey::of::<u32>());
    assert_eq!(ServiceKey::of::<u32>().service(), token);
}

#[test]
fn test_key_equality_uses_type_and_contract() {
    assert_ne!(ServiceKey::of::<u32>(), ServiceKey::named::<u32>("a"));
    assert_ne!(ServiceKey::named::<u32>("a"), ServiceKey::named::<u32>("b"));
    assert_ne!(ServiceKey::named::<u32>("a"), ServiceKey::named::<u64>("a"));

    // An empty contract is still a contract
    assert_ne!(ServiceKey::of::<u32>(), ServiceKey::named::<u32>(""));
}

#[test]
fn test_key_hash_consistency() {
    let keys: HashSet<ServiceKey> = [
        ServiceKey::of::<u32>(),
        ServiceKey::of::<u32>(),
        ServiceKey::named::<u32>("a"),
        ServiceKey::of::<dyn Logger>(),
        ServiceKey::named::<dyn Logger>("a"),
    ]
    .into_iter()
    .collect();

    assert_eq!(keys.len(), 4);
    assert!(keys.contains(&ServiceKey::named::<dyn Logger>("a")));
}
