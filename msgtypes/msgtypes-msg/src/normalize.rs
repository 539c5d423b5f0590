//! Name normalization: `/msg/`-infix insertion for declared type names, and
//! the five-rule precedence order for field `NAME` leaves.

use std::collections::HashSet;

use msgtypes_core::{FieldDesc, LeafType};

/// Insert `msg` before the leaf segment of a slash-separated name, unless
/// it's already there. Shared by a declared type's own name and normalizer
/// rule 4 below — both are the same "insert the infix" operation, just
/// triggered under different conditions by their callers.
pub fn ensure_msg_infix(name: &str) -> String {
    let parts: Vec<&str> = name.split('/').collect();
    if parts.len() >= 2 && parts[parts.len() - 2] == "msg" {
        return name.to_string();
    }
    let (leaf, parent) = (parts[parts.len() - 1], &parts[..parts.len() - 1]);
    format!("{}/msg/{leaf}", parent.join("/"))
}

/// Resolve a bare or partially-qualified field `NAME` to its fully
/// qualified form, given the owning type's package and the set of FQNs
/// declared in this parse batch. Rule order is strict — rule 1 is checked
/// (and can win) even when rule 3 would also match.
fn normalize_name(n: &str, owner_pkg: &str, declared: &HashSet<String>) -> String {
    if !n.contains('/') {
        let leaf_suffix = format!("/msg/{n}");
        if let Some(fqn) = declared.iter().find(|fqn| fqn.ends_with(&leaf_suffix)) {
            return fqn.clone();
        }
    }
    if n == "Header" {
        return "std_msgs/msg/Header".to_string();
    }
    if !n.contains('/') {
        return format!("{owner_pkg}/msg/{n}");
    }
    if !n.contains("/msg/") {
        return ensure_msg_infix(n);
    }
    n.to_string()
}

fn normalize_leaf(leaf: LeafType, owner_pkg: &str, declared: &HashSet<String>) -> LeafType {
    match leaf {
        LeafType::Name(n) => LeafType::Name(normalize_name(&n, owner_pkg, declared)),
        base @ LeafType::Base { .. } => base,
    }
}

/// Rewrite every `NAME` leaf reachable from `field` (including through
/// `ARRAY`/`SEQUENCE`) in place. `BASE` fields are untouched.
pub fn normalize_field(field: FieldDesc, owner_pkg: &str, declared: &HashSet<String>) -> FieldDesc {
    match field {
        FieldDesc::Leaf(leaf) => FieldDesc::Leaf(normalize_leaf(leaf, owner_pkg, declared)),
        FieldDesc::Array { inner, length } => FieldDesc::Array {
            inner: normalize_leaf(inner, owner_pkg, declared),
            length,
        },
        FieldDesc::Sequence { inner, bound } => FieldDesc::Sequence {
            inner: normalize_leaf(inner, owner_pkg, declared),
            bound,
        },
    }
}
