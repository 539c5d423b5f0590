//! The structural SHA-256 hash, `RIHS01_<hex>`.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use msgtypes_core::{Basename, FieldDesc, LeafType, MessageDescriptor, TypeStore, TypesysError};

const STRUCTURE_SENTINEL: &str = "structure_needs_at_least_one_member";

/// `base_id`, from the published type-id table. `char` (13) and `float128` (12)
/// have no [`Basename`] variant — the MSG grammar never produces them (the
/// grammar rewrites `char` to `uint8` at parse time, and has no production
/// reaching `float128` at all) — so they're absent from this match rather
/// than dead arms. `bounded_string` (21) is `string` (17) with a nonzero
/// `string_bound`, not a separate [`Basename`] variant.
fn base_id(base: Basename, string_bound: usize) -> u32 {
    match base {
        Basename::Int8 => 2,
        Basename::Uint8 => 3,
        Basename::Int16 => 4,
        Basename::Uint16 => 5,
        Basename::Int32 => 6,
        Basename::Uint32 => 7,
        Basename::Int64 => 8,
        Basename::Uint64 => 9,
        Basename::Float32 => 10,
        Basename::Float64 => 11,
        Basename::Bool => 15,
        Basename::Octet => 16,
        Basename::String => {
            if string_bound > 0 {
                21
            } else {
                17
            }
        }
    }
}

const NESTED_MESSAGE_BASE_ID: u32 = 1;

struct LeafEncoding {
    base_id: u32,
    string_capacity: u32,
    nested_type_name: String,
}

fn encode_leaf(leaf: &LeafType) -> LeafEncoding {
    match leaf {
        LeafType::Base { base, string_bound } => LeafEncoding {
            base_id: base_id(*base, *string_bound),
            string_capacity: *string_bound as u32,
            nested_type_name: String::new(),
        },
        LeafType::Name(fqn) => LeafEncoding {
            base_id: NESTED_MESSAGE_BASE_ID,
            string_capacity: 0,
            nested_type_name: fqn.clone(),
        },
    }
}

struct TypeIdEncoding {
    type_id: u32,
    capacity: u32,
    string_capacity: u32,
    nested_type_name: String,
}

fn encode_field(field: &FieldDesc) -> TypeIdEncoding {
    let (leaf, increment, capacity) = match field {
        FieldDesc::Leaf(leaf) => (leaf, 0, 0),
        FieldDesc::Array { inner, length } => {
            let increment = if *length > 0 { 96 } else { 144 };
            (inner, increment, *length as u32)
        }
        FieldDesc::Sequence { inner, bound } => (inner, 48, *bound as u32),
    };
    let enc = encode_leaf(leaf);
    TypeIdEncoding {
        type_id: increment + enc.base_id,
        capacity,
        string_capacity: enc.string_capacity,
        nested_type_name: enc.nested_type_name,
    }
}

fn field_json(name: &str, field: &FieldDesc) -> Value {
    let enc = encode_field(field);
    let mut type_obj = Map::new();
    type_obj.insert("type_id".to_string(), json!(enc.type_id));
    type_obj.insert("capacity".to_string(), json!(enc.capacity));
    type_obj.insert("string_capacity".to_string(), json!(enc.string_capacity));
    type_obj.insert("nested_type_name".to_string(), json!(enc.nested_type_name));

    let mut field_obj = Map::new();
    field_obj.insert("name".to_string(), json!(name));
    field_obj.insert("type".to_string(), Value::Object(type_obj));
    Value::Object(field_obj)
}

fn struct_json(name: &str, desc: &MessageDescriptor) -> Value {
    let fields: Vec<Value> = if desc.fields.is_empty() {
        vec![field_json(
            STRUCTURE_SENTINEL,
            &FieldDesc::base(Basename::Uint8, 0),
        )]
    } else {
        desc.fields
            .iter()
            .map(|(name, field)| field_json(name, field))
            .collect()
    };

    let mut obj = Map::new();
    obj.insert("type_name".to_string(), json!(name));
    obj.insert("fields".to_string(), Value::Array(fields));
    Value::Object(obj)
}

fn nested_names(desc: &MessageDescriptor) -> Vec<String> {
    desc.fields
        .iter()
        .filter_map(|(_, field)| match field {
            FieldDesc::Leaf(LeafType::Name(n)) => Some(n.clone()),
            FieldDesc::Array { inner: LeafType::Name(n), .. } => Some(n.clone()),
            FieldDesc::Sequence { inner: LeafType::Name(n), .. } => Some(n.clone()),
            _ => None,
        })
        .collect()
}

/// Populate `cache` with `typename`'s struct description and every
/// transitively referenced type's, visiting each name at most once. The
/// placeholder insert before recursing (rather than after) makes a cyclic
/// type graph terminate instead of looping.
fn collect(
    store: &TypeStore,
    typename: &str,
    cache: &mut IndexMap<String, Value>,
) -> Result<(), TypesysError> {
    if cache.contains_key(typename) {
        return Ok(());
    }
    let desc = store
        .get(typename)
        .ok_or_else(|| TypesysError::UnknownType { name: typename.to_string() })?;

    cache.insert(typename.to_string(), Value::Null);
    for nested in nested_names(desc) {
        collect(store, &nested, cache)?;
    }
    cache.insert(typename.to_string(), struct_json(typename, desc));
    Ok(())
}

/// Produce `RIHS01_<sha256_hex>` for `typename`.
pub fn hash_rihs01(store: &TypeStore, typename: &str) -> Result<String, TypesysError> {
    let mut cache: IndexMap<String, Value> = IndexMap::new();
    collect(store, typename, &mut cache)?;

    let type_description = cache
        .get(typename)
        .cloned()
        .expect("collect() inserts typename's own entry");

    let mut referenced_names: Vec<&String> = cache.keys().filter(|k| k.as_str() != typename).collect();
    referenced_names.sort();
    let referenced_type_descriptions: Vec<Value> = referenced_names
        .into_iter()
        .map(|name| cache[name].clone())
        .collect();

    let mut payload = Map::new();
    payload.insert("type_description".to_string(), type_description);
    payload.insert(
        "referenced_type_descriptions".to_string(),
        Value::Array(referenced_type_descriptions),
    );

    let canonical = Value::Object(payload).to_string();
    let digest = Sha256::digest(canonical.as_bytes());
    Ok(format!("RIHS01_{digest:x}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgtypes_core::LeafType;

    fn store_with(types: Vec<(&str, MessageDescriptor)>) -> TypeStore {
        let mut store = TypeStore::new();
        for (name, desc) in types {
            store.insert(name, desc);
        }
        store
    }

    #[test]
    fn scalar_and_array_fields_encode_expected_type_ids() {
        let mut desc = MessageDescriptor::default();
        desc.fields.push((
            "s".to_string(),
            FieldDesc::Leaf(LeafType::Base { base: Basename::String, string_bound: 7 }),
        ));
        desc.fields.push((
            "b".to_string(),
            FieldDesc::Array { inner: LeafType::Base { base: Basename::Bool, string_bound: 0 }, length: 3 },
        ));
        let store = store_with(vec![("pkg/msg/Foo", desc)]);

        let hash = hash_rihs01(&store, "pkg/msg/Foo").unwrap();
        assert!(hash.starts_with("RIHS01_"));
        assert_eq!(hash.len(), "RIHS01_".len() + 64);
    }

    #[test]
    fn empty_struct_gets_synthetic_member() {
        let store = store_with(vec![("pkg/msg/Empty", MessageDescriptor::default())]);
        let hash_a = hash_rihs01(&store, "pkg/msg/Empty").unwrap();

        let mut with_sentinel = MessageDescriptor::default();
        with_sentinel.fields.push((
            STRUCTURE_SENTINEL.to_string(),
            FieldDesc::base(Basename::Uint8, 0),
        ));
        let store_b = store_with(vec![("pkg/msg/Empty", with_sentinel)]);
        let hash_b = hash_rihs01(&store_b, "pkg/msg/Empty").unwrap();

        assert_eq!(hash_a, hash_b);
    }

    #[test]
    fn referenced_types_are_sorted_and_deduplicated() {
        let mut foo = MessageDescriptor::default();
        foo.fields.push(("a".to_string(), FieldDesc::name("pkg/msg/B")));
        foo.fields.push(("b".to_string(), FieldDesc::name("pkg/msg/A")));
        let a = MessageDescriptor::default();
        let mut b = MessageDescriptor::default();
        b.fields.push(("inner".to_string(), FieldDesc::name("pkg/msg/A")));
        let store = store_with(vec![("pkg/msg/Foo", foo), ("pkg/msg/A", a), ("pkg/msg/B", b)]);

        let hash = hash_rihs01(&store, "pkg/msg/Foo").unwrap();
        assert!(hash.starts_with("RIHS01_"));
    }

    #[test]
    fn self_referential_cycle_does_not_loop() {
        let mut desc = MessageDescriptor::default();
        desc.fields.push(("next".to_string(), FieldDesc::name("pkg/msg/Node")));
        let store = store_with(vec![("pkg/msg/Node", desc)]);

        let hash = hash_rihs01(&store, "pkg/msg/Node").unwrap();
        assert!(hash.starts_with("RIHS01_"));
    }

    #[test]
    fn unknown_type_is_reported() {
        let store = TypeStore::new();
        let err = hash_rihs01(&store, "pkg/msg/Missing").unwrap_err();
        assert!(matches!(err, TypesysError::UnknownType { .. }));
    }
}
