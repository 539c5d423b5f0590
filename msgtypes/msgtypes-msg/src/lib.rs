//! Grammar productions for MSG, the tree-walking visitor that lowers a
//! parse into the raw IR, and the name normalizer that resolves field
//! references to fully-qualified type names.

mod grammar;
mod lower;
mod normalize;

use std::collections::HashSet;

use indexmap::IndexMap;
use msgtypes_core::{MessageDescriptor, TypesysError};
use msgtypes_peg::PegError;

pub use normalize::{ensure_msg_infix, normalize_field};

/// `PegError` and `TypesysError` are both foreign to this crate, so they
/// can't be bridged with a `From` impl (orphan rule) — convert explicitly
/// at each grammar call site instead.
fn to_parse_error(err: PegError) -> TypesysError {
    TypesysError::Parse {
        snippet: err.snippet,
    }
}

fn normalize_batch(raw: Vec<lower::RawMessage>) -> IndexMap<String, MessageDescriptor> {
    let declared: HashSet<String> = raw.iter().map(|m| m.name.clone()).collect();

    let mut out = IndexMap::new();
    for lower::RawMessage { name, mut descriptor } in raw {
        let owner_pkg = name.split('/').next().expect("name is non-empty");
        descriptor.fields = descriptor
            .fields
            .into_iter()
            .map(|(field_name, field)| (field_name, normalize_field(field, owner_pkg, &declared)))
            .collect();
        out.insert(name, descriptor);
    }
    out
}

/// Parse a single MSG definition. `typename` is the declared type's own
/// name (bare, `pkg/Name`, or already-qualified `pkg/msg/Name`); the grammar
/// is invoked against `MSG: <typename>\n<text>`.
pub fn parse_msg(
    text: &str,
    typename: &str,
) -> Result<IndexMap<String, MessageDescriptor>, TypesysError> {
    let input = format!("MSG: {typename}\n{text}");
    let tree = grammar::grammar()
        .parse("msgdef", &input)
        .map_err(to_parse_error)?;
    let raw = lower::lower_msgdef(&tree)?;
    Ok(normalize_batch(vec![raw]))
}

/// Parse one or more `MSG:`-headed definitions already separated by
/// 80-`=` lines, as a single batch sharing one declared-name set for name
/// resolution (rule 1 needs visibility across the whole batch).
pub fn parse_all(text: &str) -> Result<IndexMap<String, MessageDescriptor>, TypesysError> {
    let tree = grammar::grammar()
        .parse("specification", text)
        .map_err(to_parse_error)?;
    let children = tree.seq();
    let mut raw = vec![lower::lower_msgdef(&children[0])?];
    for pair in children[1].rep() {
        let msgdef = &pair.seq()[1];
        raw.push(lower::lower_msgdef(msgdef)?);
    }
    Ok(normalize_batch(raw))
}
