//! The legacy MD5-over-canonical-text hash.

use indexmap::IndexMap;
use md5::{Digest, Md5};
use msgtypes_core::{Basename, FieldDesc, LeafType, MessageDescriptor, TypeStore, TypesysError};

use crate::names::denormalize_msgtype;

const STRUCTURE_SENTINEL: &str = "structure_needs_at_least_one_member";

struct SubDef {
    body: String,
    /// Empty while the entry is a not-yet-resolved sentinel; a real MD5
    /// hex digest is never empty, so emptiness doubles as the in-progress
    /// marker.
    hash: String,
}

struct Generator<'a> {
    store: &'a TypeStore,
    ros1: bool,
    subdefs: IndexMap<String, SubDef>,
    /// Sub-types in first-encountered order, for the final definition text.
    order: Vec<String>,
}

impl<'a> Generator<'a> {
    fn render_leaf(&self, leaf: &LeafType) -> String {
        match leaf {
            LeafType::Base { base, string_bound } => match base {
                Basename::Octet => "byte".to_string(),
                Basename::String if *string_bound > 0 => format!("string<={string_bound}"),
                other => other.as_str().to_string(),
            },
            LeafType::Name(fqn) => {
                if self.ros1 {
                    match fqn.as_str() {
                        "builtin_interfaces/msg/Time" => return "time".to_string(),
                        "builtin_interfaces/msg/Duration" => return "duration".to_string(),
                        _ => {}
                    }
                }
                denormalize_msgtype(fqn)
            }
        }
    }

    fn render_field(&self, field: &FieldDesc) -> String {
        match field {
            FieldDesc::Leaf(leaf) => self.render_leaf(leaf),
            FieldDesc::Array { inner, length } => format!("{}[{length}]", self.render_leaf(inner)),
            FieldDesc::Sequence { inner, bound } => {
                if *bound == 0 {
                    format!("{}[]", self.render_leaf(inner))
                } else {
                    format!("{}[<={bound}]", self.render_leaf(inner))
                }
            }
        }
    }

    fn render_body(&self, fqn: &str, desc: &MessageDescriptor) -> String {
        let mut out = String::new();
        if self.ros1 && fqn == "std_msgs/msg/Header" {
            out.push_str("uint32 seq\n");
        }
        for c in &desc.consts {
            out.push_str(&format!(
                "{} {}={}\n",
                c.base.as_str(),
                msgtypes_core::denormalize_fieldname(&c.name),
                c.value
            ));
        }
        for (name, field) in &desc.fields {
            if name == STRUCTURE_SENTINEL {
                continue;
            }
            out.push_str(&format!(
                "{} {}\n",
                self.render_field(field),
                msgtypes_core::denormalize_fieldname(name)
            ));
        }
        out
    }

    fn render_leaf_for_hash(&mut self, leaf: &LeafType) -> Result<String, TypesysError> {
        match leaf {
            LeafType::Base { .. } => Ok(self.render_leaf(leaf)),
            LeafType::Name(fqn) => self.hash_for(fqn),
        }
    }

    fn render_field_for_hash(&mut self, field: &FieldDesc) -> Result<String, TypesysError> {
        Ok(match field {
            FieldDesc::Leaf(leaf) => self.render_leaf_for_hash(leaf)?,
            FieldDesc::Array { inner, length } => {
                format!("{}[{length}]", self.render_leaf_for_hash(inner)?)
            }
            FieldDesc::Sequence { inner, bound } => {
                if *bound == 0 {
                    format!("{}[]", self.render_leaf_for_hash(inner)?)
                } else {
                    format!("{}[<={bound}]", self.render_leaf_for_hash(inner)?)
                }
            }
        })
    }

    fn render_hash_text(
        &mut self,
        fqn: &str,
        desc: &MessageDescriptor,
    ) -> Result<String, TypesysError> {
        let mut out = String::new();
        if self.ros1 && fqn == "std_msgs/msg/Header" {
            out.push_str("uint32 seq\n");
        }
        for c in &desc.consts {
            out.push_str(&format!(
                "{} {}={}\n",
                c.base.as_str(),
                msgtypes_core::denormalize_fieldname(&c.name),
                c.value
            ));
        }
        for (name, field) in &desc.fields {
            if name == STRUCTURE_SENTINEL {
                continue;
            }
            let rendered = self.render_field_for_hash(field)?;
            out.push_str(&format!("{rendered} {}\n", msgtypes_core::denormalize_fieldname(name)));
        }
        Ok(out)
    }

    fn hash_for(&mut self, fqn: &str) -> Result<String, TypesysError> {
        if let Some(existing) = self.subdefs.get(fqn) {
            if existing.hash.is_empty() {
                return Err(TypesysError::InvariantViolation {
                    message: format!("cycle detected while hashing {fqn}"),
                });
            }
            return Ok(existing.hash.clone());
        }

        self.subdefs.insert(
            fqn.to_string(),
            SubDef {
                body: String::new(),
                hash: String::new(),
            },
        );
        self.order.push(fqn.to_string());

        let store = self.store;
        let desc = store
            .get(fqn)
            .ok_or_else(|| TypesysError::UnknownType { name: fqn.to_string() })?;
        let body = self.render_body(fqn, desc);
        let hash_text = self.render_hash_text(fqn, desc)?;
        let hash = format!("{:x}", Md5::digest(hash_text.as_bytes()));

        self.subdefs.insert(fqn.to_string(), SubDef { body, hash: hash.clone() });
        Ok(hash)
    }
}

/// Produce `(canonical_definition_text, md5_hex)` for `typename`.
pub fn generate_msgdef(
    store: &TypeStore,
    typename: &str,
    ros1: bool,
) -> Result<(String, String), TypesysError> {
    let desc = store
        .get(typename)
        .ok_or_else(|| TypesysError::UnknownType { name: typename.to_string() })?;

    let mut gen = Generator {
        store,
        ros1,
        subdefs: IndexMap::new(),
        order: Vec::new(),
    };

    let root_body = gen.render_body(typename, desc);
    let root_hash_text = gen.render_hash_text(typename, desc)?;
    let md5_hex = format!("{:x}", Md5::digest(root_hash_text.as_bytes()));

    let mut text = root_body;
    for fqn in &gen.order {
        let sub = &gen.subdefs[fqn];
        text.push_str(&"=".repeat(80));
        text.push('\n');
        text.push_str(&format!("MSG: {}\n", denormalize_msgtype(fqn)));
        text.push_str(&sub.body);
    }

    Ok((text, md5_hex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgtypes_core::{ConstValue, FieldDesc};

    fn store_with(types: Vec<(&str, MessageDescriptor)>) -> TypeStore {
        let mut store = TypeStore::new();
        for (name, desc) in types {
            store.insert(name, desc);
        }
        store
    }

    #[test]
    fn minimal_scalar_hash_matches_raw_md5() {
        let mut desc = MessageDescriptor::default();
        desc.fields.push(("x".to_string(), FieldDesc::base(Basename::Int32, 0)));
        let store = store_with(vec![("pkg/msg/Foo", desc)]);

        let (text, hash) = generate_msgdef(&store, "pkg/msg/Foo", true).unwrap();
        assert_eq!(text, "int32 x\n");
        let expected = format!("{:x}", Md5::digest(b"int32 x\n"));
        assert_eq!(hash, expected);
    }

    #[test]
    fn header_reference_gets_synthetic_seq_under_ros1() {
        let mut header = MessageDescriptor::default();
        header
            .fields
            .push(("frame_id".to_string(), FieldDesc::base(Basename::String, 0)));
        let mut foo = MessageDescriptor::default();
        foo.fields
            .push(("h".to_string(), FieldDesc::name("std_msgs/msg/Header")));
        let store = store_with(vec![("pkg/msg/Foo", foo), ("std_msgs/msg/Header", header)]);

        let (text, _hash) = generate_msgdef(&store, "pkg/msg/Foo", true).unwrap();
        assert!(text.contains("Header h\n"));
        assert!(text.contains("uint32 seq\nstring frame_id\n"));
    }

    #[test]
    fn array_and_sequence_suffixes_render_correctly() {
        let mut desc = MessageDescriptor::default();
        desc.fields.push((
            "a".to_string(),
            FieldDesc::Array { inner: msgtypes_core::LeafType::Base { base: Basename::Uint8, string_bound: 0 }, length: 4 },
        ));
        desc.fields.push((
            "b".to_string(),
            FieldDesc::Sequence { inner: msgtypes_core::LeafType::Base { base: Basename::Uint8, string_bound: 0 }, bound: 0 },
        ));
        desc.fields.push((
            "c".to_string(),
            FieldDesc::Sequence { inner: msgtypes_core::LeafType::Base { base: Basename::Uint8, string_bound: 0 }, bound: 4 },
        ));
        let store = store_with(vec![("pkg/msg/Foo", desc)]);

        let (text, _) = generate_msgdef(&store, "pkg/msg/Foo", true).unwrap();
        assert_eq!(text, "uint8[4] a\nuint8[] b\nuint8[<=4] c\n");
    }

    #[test]
    fn keyword_field_is_denormalized_back_on_emission() {
        let mut desc = MessageDescriptor::default();
        desc.fields.push(("class_".to_string(), FieldDesc::base(Basename::Int32, 0)));
        let store = store_with(vec![("pkg/msg/Foo", desc)]);

        let (text, _) = generate_msgdef(&store, "pkg/msg/Foo", true).unwrap();
        assert_eq!(text, "int32 class\n");
    }

    #[test]
    fn unknown_type_is_reported() {
        let store = TypeStore::new();
        let err = generate_msgdef(&store, "pkg/msg/Missing", true).unwrap_err();
        assert!(matches!(err, TypesysError::UnknownType { .. }));
    }

    #[test]
    fn self_referential_cycle_is_an_invariant_violation() {
        let mut desc = MessageDescriptor::default();
        desc.fields.push(("next".to_string(), FieldDesc::name("pkg/msg/Foo")));
        let store = store_with(vec![("pkg/msg/Foo", desc)]);

        let err = generate_msgdef(&store, "pkg/msg/Foo", true).unwrap_err();
        assert!(matches!(err, TypesysError::InvariantViolation { .. }));
    }

    #[test]
    fn string_constant_renders_without_quotes() {
        let mut desc = MessageDescriptor::default();
        desc.consts.push(msgtypes_core::ConstDesc {
            name: "GREET".to_string(),
            base: Basename::String,
            value: ConstValue::Str("hello world".to_string()),
        });
        let store = store_with(vec![("pkg/msg/Foo", desc)]);

        let (text, _) = generate_msgdef(&store, "pkg/msg/Foo", true).unwrap();
        assert_eq!(text, "string GREET=hello world\n");
    }
}
