//! Cache key generation tests.

use cache_connector::{build_key, cache_key, KeyGenerator};

struct StaffQuery;

#[test]
fn test_same_inputs_same_key() {
    let keys = KeyGenerator::for_type::<StaffQuery>();
    assert_eq!(
        keys.key("page", ["store-1", "20"]),
        keys.key("page", ["store-1", "20"])
    );
}

#[test]
fn test_documented_collision_is_preserved() {
    let id = "com.example.StaffService";
    assert_eq!(
        build_key(id, "find", ["1", "23"]),
        build_key(id, "find", ["12", "3"])
    );
    assert_eq!(
        build_key(id, "find", ["1", "23"]),
        "com.example.StaffServicefind123"
    );
}

#[test]
fn test_identity_and_operation_have_no_separator() {
    let none = Vec::<&str>::new;
    assert_eq!(build_key("ab", "c", none()), build_key("a", "bc", none()));
}

#[test]
fn test_macro_matches_function() {
    assert_eq!(
        cache_key!("Svc", "find", 1, "23"),
        build_key("Svc", "find", ["1", "23"])
    );
}

#[test]
fn test_named_generator() {
    let keys = KeyGenerator::new("StaffService");
    assert_eq!(keys.identity(), "StaffService");
    assert_eq!(keys.key("count", [true]), "StaffServicecounttrue");
}
