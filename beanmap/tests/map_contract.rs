//! The read/write contract of `BeanMap` over derived beans.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use beanmap::{
    Bean, BeanMap, CachingDiscovery, ChangeLog, Config, Constructor, Error, Primitive,
    PropertyChange, PropertyType, TransformerRegistry, Value,
};

#[derive(Debug, Default, Clone, PartialEq, Bean)]
struct Sample {
    a: i32,
    b: i32,
    label: String,
    #[bean(read_only)]
    created: u64,
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn test_every_readable_property_is_a_key() {
    let sample = Sample {
        a: 1,
        b: 2,
        label: "s".into(),
        created: 99,
    };
    let map = BeanMap::for_bean(sample.clone());
    assert_eq!(map.len(), 4);
    assert!(map.contains_key("a"));
    assert_eq!(map.get("a"), Some(Value::I32(sample.a)));
    assert_eq!(map.get("created"), Some(Value::U64(sample.created)));
}

#[test]
fn test_put_then_get_is_idempotent() {
    let mut map = BeanMap::for_bean(Sample::default());
    assert_eq!(map.put("a", 5).unwrap(), Some(Value::I32(0)));
    assert_eq!(map.get("a"), Some(Value::I32(5)));
    assert_eq!(map.put("a", 5).unwrap(), Some(Value::I32(5)));
    assert_eq!(map.get("a"), Some(Value::I32(5)));
}

#[test]
fn test_bad_names_raise_on_put_but_not_on_get() {
    init_logging();
    let mut map = BeanMap::for_bean(Sample::default());
    assert_eq!(map.get("nothing"), None);
    assert!(matches!(map.put("nothing", 1), Err(Error::PropertyNotFound { .. })));
    assert!(matches!(map.put("created", 1u64), Err(Error::ReadOnlyProperty { .. })));
}

#[test]
fn test_clear_restores_defaults() {
    let mut map = BeanMap::for_bean(Sample {
        a: 4,
        b: 5,
        label: "x".into(),
        created: 1,
    });
    map.clear().unwrap();
    assert_eq!(map.downcast_bean::<Sample>(), Some(&Sample::default()));
    assert_eq!(map.len(), 4);
}

#[test]
fn test_clone_is_independent() {
    let mut original = BeanMap::for_bean(Sample::default());
    original.put("a", 1).unwrap();
    original.put("b", 2).unwrap();

    let mut copy = original.try_clone().unwrap();
    assert_eq!(copy.get("a"), Some(Value::I32(1)));
    assert_eq!(copy.get("b"), Some(Value::I32(2)));

    copy.put("a", 100).unwrap();
    assert_eq!(original.get("a"), Some(Value::I32(1)));
    assert_eq!(copy.get("a"), Some(Value::I32(100)));
}

#[test]
fn test_unbound_map() {
    let mut map = BeanMap::for_bean(Sample::default());
    map.set_bean(None);
    assert_eq!(map.len(), 0);
    assert_eq!(map.get("a"), None);
    assert_eq!(map.put("a", 1).unwrap(), None);
    assert_eq!(map.keys().count(), 0);
}

#[test]
fn test_entry_replacement_and_removal() {
    let mut map = BeanMap::for_bean(Sample::default());
    {
        let mut cursor = map.entries_mut();
        while let Some(mut entry) = cursor.next_entry() {
            if entry.key() == "b" {
                assert_eq!(entry.set_value("7").unwrap(), Some(Value::I32(0)));
                assert!(matches!(entry.remove(), Err(Error::UnsupportedMutation(_))));
            }
        }
    }
    assert_eq!(map.get("b"), Some(Value::I32(7)));
    assert_eq!(map.len(), 4);
}

#[test]
fn test_listener_receives_old_and_new() {
    let log = ChangeLog::default();
    let mut map = BeanMap::builder()
        .listener(log.clone())
        .bean(Sample::default())
        .build();
    map.put("label", "hello").unwrap();
    map.put("label", "world").unwrap();
    assert_eq!(
        log.changes().last(),
        Some(&PropertyChange {
            name: "label".into(),
            old: Some(Value::from("hello")),
            new: Some(Value::from("world")),
        })
    );
    assert_eq!(log.len(), 2);
}

#[test]
fn test_put_all_writeable_between_maps() {
    let source = BeanMap::for_bean(Sample {
        a: 3,
        b: 4,
        label: "src".into(),
        created: 77,
    });
    let mut target = BeanMap::for_bean(Sample::default());
    target.put_all_writeable(&source).unwrap();
    assert_eq!(
        target.downcast_bean::<Sample>(),
        Some(&Sample {
            a: 3,
            b: 4,
            label: "src".into(),
            created: 0,
        })
    );
}

#[test]
fn test_custom_transformers() {
    let transformers = TransformerRegistry::default()
        .with(Primitive::I32, |s: &str| Ok(Value::I32(s.len() as i32)));
    let config = Config::default().with_transformers(Arc::new(transformers));
    let mut map = BeanMap::builder()
        .config(config)
        .bean(Sample::default())
        .build();
    map.put("a", "four").unwrap();
    assert_eq!(map.get("a"), Some(Value::I32(4)));
}

#[test]
fn test_caching_discovery_config() {
    let config = Config::default().with_discovery(CachingDiscovery::default());
    let mut map = BeanMap::builder()
        .config(config)
        .bean(Sample::default())
        .build();
    map.bind(Sample::default());
    map.put("a", 2).unwrap();
    assert_eq!(map.get("a"), Some(Value::I32(2)));
}

static METRE_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Has both a string constructor and a primitive transformer.
#[derive(Debug, Clone, Default, PartialEq)]
struct Metres(i64);

impl PropertyType for Metres {
    fn primitive() -> Option<Primitive> {
        Some(Primitive::I64)
    }

    fn constructors() -> Vec<Constructor> {
        vec![Constructor::new(|s: String| {
            METRE_CALLS.fetch_add(1, Ordering::SeqCst);
            s.trim_end_matches('m')
                .parse::<i64>()
                .map(Metres)
                .map_err(|e| e.to_string())
        })]
    }
}

#[derive(Default, Bean)]
struct Track {
    length: Metres,
}

#[test]
fn test_constructor_preferred_over_transformer() {
    let mut map = BeanMap::for_bean(Track::default());
    map.put("length", "120m").unwrap();
    assert_eq!(METRE_CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(
        map.get("length").unwrap().downcast_ref::<Metres>(),
        Some(&Metres(120))
    );
}
