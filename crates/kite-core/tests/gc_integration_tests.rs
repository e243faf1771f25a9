//! Integration tests for heap collection
//!
//! Tests cover:
//! - Rooted vs unrooted survival
//! - Pinned slot survival
//! - Tracing through arrays, object properties and constructor links
//! - Collection statistics

use kite_core::{EngineContext, Invocation, PropKey, Value};

#[test]
fn test_unrooted_values_are_collected() {
    let mut cx = EngineContext::new();
    let a = cx.create_string("a").unwrap();
    let b = cx.create_array(&[]).unwrap();

    cx.collect();

    assert!(!cx.is_live(a));
    assert!(!cx.is_live(b));
    assert_eq!(cx.heap_stats().live_objects, 0);
}

#[test]
fn test_rooted_values_survive() {
    let mut cx = EngineContext::new();
    let keep = cx.create_string("keep").unwrap();
    let doomed = cx.create_string("doomed").unwrap();

    cx.add_root(keep);
    cx.collect();

    assert!(cx.is_live(keep));
    assert!(!cx.is_live(doomed));
    assert_eq!(cx.read_string(keep).unwrap(), "keep");
}

#[test]
fn test_pinned_values_survive() {
    let mut cx = EngineContext::new();
    let v = cx.create_string("pinned").unwrap();

    cx.pin(v).unwrap();
    cx.collect();
    assert!(cx.is_live(v));

    cx.unpin(v).unwrap();
    cx.collect();
    assert!(!cx.is_live(v));
}

#[test]
fn test_array_elements_are_traced() {
    let mut cx = EngineContext::new();
    let hello = cx.create_string("hello").unwrap();
    let world = cx.create_string("world").unwrap();
    let arr = cx.create_array(&[hello, world]).unwrap();

    cx.add_root(arr);
    cx.collect();

    assert!(cx.is_live(arr));
    assert!(cx.is_live(hello));
    assert!(cx.is_live(world));
    assert_eq!(cx.read_string(hello).unwrap(), "hello");
}

#[test]
fn test_object_properties_are_traced() {
    let mut cx = EngineContext::new();
    let inner = cx.create_string("inner").unwrap();
    let obj = cx.create_object().unwrap();
    cx.object_set(obj, "field", inner).unwrap();

    cx.add_root(obj);
    cx.collect();

    assert!(cx.is_live(inner));
    assert_eq!(
        cx.object_get(obj, &PropKey::from("field")).unwrap(),
        Some(inner)
    );
}

#[test]
fn test_constructor_link_is_traced() {
    let mut cx = EngineContext::new();
    let ctor = cx
        .create_function("Widget", |_cx, _recv, _args| Ok(Value::null()))
        .unwrap();
    let instance = cx.invoke(ctor, Invocation::Construct, &[]).unwrap();

    // Rooting only the instance keeps its constructor alive too
    cx.add_root(instance);
    cx.collect();

    assert!(cx.is_live(instance));
    assert!(cx.is_live(ctor));
    assert!(cx.is_instance_of(instance, ctor).unwrap());
}

#[test]
fn test_nested_graph_traced_transitively() {
    let mut cx = EngineContext::new();
    let leaf = cx.create_string("leaf").unwrap();
    let mid = cx.create_array(&[leaf]).unwrap();
    let root = cx.create_object().unwrap();
    cx.object_set(root, "mid", mid).unwrap();

    cx.add_root(root);
    cx.collect();

    assert!(cx.is_live(root));
    assert!(cx.is_live(mid));
    assert!(cx.is_live(leaf));
}

#[test]
fn test_collect_is_explicit_only() {
    let mut cx = EngineContext::new();
    let v = cx.create_string("still here").unwrap();

    // Allocation churn without collect never reclaims anything
    for _ in 0..64 {
        cx.create_array(&[]).unwrap();
    }

    assert!(cx.is_live(v));
    assert_eq!(cx.gc_stats().collections, 0);
    assert_eq!(cx.heap_stats().live_objects, 65);
}

#[test]
fn test_collection_stats() {
    let mut cx = EngineContext::new();
    cx.create_string("x").unwrap();
    cx.create_string("y").unwrap();

    cx.collect();
    assert_eq!(cx.gc_stats().collections, 1);
    assert_eq!(cx.gc_stats().last_freed, 2);
    assert_eq!(cx.gc_stats().objects_freed, 2);

    cx.collect();
    assert_eq!(cx.gc_stats().collections, 2);
    assert_eq!(cx.gc_stats().last_freed, 0);
    assert_eq!(cx.gc_stats().objects_freed, 2);
}

#[test]
fn test_dangling_handle_after_collect() {
    let mut cx = EngineContext::new();
    let v = cx.create_string("gone").unwrap();

    cx.collect();

    assert!(cx.read_string(v).is_err());
    assert_eq!(cx.type_name(v), "collected");
}
