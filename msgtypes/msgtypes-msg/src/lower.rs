//! Tree-walking visitor: lowers a parsed [`Tree`] into the raw IR (message
//! name plus fields/constants with not-yet-normalized type names).
//!
//! The grammar's `Choice`/`Ref` productions are transparent (see
//! [`msgtypes_peg::Tree`]'s docs), so a handful of shapes can only be told
//! apart by inspecting their contents rather than a tag on the node itself.
//! `lower_type_spec` and the const-value dispatch below do exactly that,
//! each documented at the point where the ambiguity is resolved.

use msgtypes_core::{
    normalize_fieldname, Basename, ConstDesc, ConstValue, FieldDesc, MessageDescriptor,
    TypesysError,
};
use msgtypes_peg::Tree;

/// A field/const leaf type before alias rewriting and name resolution.
enum RawLeaf {
    Base { base: String, string_bound: usize },
    Name(String),
}

enum RawFieldDesc {
    Leaf(RawLeaf),
    Array { inner: RawLeaf, length: usize },
    Sequence { inner: RawLeaf, bound: usize },
}

fn join_scoped_name(tree: &Tree) -> String {
    let children = tree.seq();
    let mut parts = vec![children[0].text().to_string()];
    for seg in children[1].rep() {
        parts.push(seg.seq()[1].text().to_string());
    }
    parts.join("/")
}

/// `simple_type_spec = 'string' '<=' integer_literal | scoped_name`.
///
/// The two alternatives are told apart by arity: the bounded-string form is
/// always a 3-child `Seq`, `scoped_name` is always a 2-child `Seq` whose
/// second child is a `Rep` (the `('/' ident)*` tail).
fn lower_simple_type_spec(tree: &Tree) -> RawLeaf {
    let children = tree.seq();
    if children.len() == 3 {
        let bound: usize = children[2]
            .text()
            .parse()
            .expect("integer_literal regex only matches digit runs");
        RawLeaf::Base {
            base: "string".to_string(),
            string_bound: bound,
        }
    } else {
        RawLeaf::Name(join_scoped_name(tree))
    }
}

/// `type_spec = simple_type_spec array_size | simple_type_spec array_bounds
/// | simple_type_spec`.
///
/// All three alternatives produce a `Seq`. The scalar alternative is
/// `simple_type_spec`'s own tree verbatim (arity 3, or arity 2 with a `Rep`
/// second child — see `lower_simple_type_spec`). The two suffixed
/// alternatives always produce an arity-2 `Seq` whose second child is
/// itself a `Seq` (the bracket suffix), so that shape is the discriminator
/// against the bare `scoped_name` case.
fn lower_type_spec(tree: &Tree) -> RawFieldDesc {
    let children = tree.seq();
    match children.len() {
        3 => RawFieldDesc::Leaf(lower_simple_type_spec(tree)),
        2 => match &children[1] {
            Tree::Rep(_) => RawFieldDesc::Leaf(lower_simple_type_spec(tree)),
            Tree::Seq(suffix) => {
                let inner = lower_simple_type_spec(&children[0]);
                match suffix[0].text() {
                    "[<=" => {
                        let bound: usize = suffix[1]
                            .text()
                            .parse()
                            .expect("integer_literal regex only matches digit runs");
                        RawFieldDesc::Sequence { inner, bound }
                    }
                    "[" => match suffix[1].opt() {
                        Some(len) => {
                            let length: usize = len
                                .text()
                                .parse()
                                .expect("integer_literal regex only matches digit runs");
                            RawFieldDesc::Array { inner, length }
                        }
                        None => RawFieldDesc::Sequence { inner, bound: 0 },
                    },
                    other => unreachable!("unexpected type_spec suffix literal: {other:?}"),
                }
            }
            other => unreachable!("unexpected type_spec shape: {other:?}"),
        },
        n => unreachable!("unexpected type_spec arity: {n}"),
    }
}

/// `byte`/`char`/`time`/`duration` alias rewriting, applied once a bare
/// (no-`/`) leaf name is known. Everything else is left for the normalizer
/// to resolve against the declared-type set and owner package.
fn resolve_leaf(raw: RawLeaf) -> Result<msgtypes_core::LeafType, TypesysError> {
    use msgtypes_core::LeafType;

    match raw {
        RawLeaf::Base { base, string_bound } => {
            let base = Basename::parse(&base).ok_or_else(|| TypesysError::Parse {
                snippet: base.clone(),
            })?;
            Ok(LeafType::Base { base, string_bound })
        }
        RawLeaf::Name(name) => {
            if !name.contains('/') {
                let aliased = match name.as_str() {
                    "byte" => "octet",
                    "char" => "uint8",
                    other => other,
                };
                if let Some(base) = Basename::parse(aliased) {
                    return Ok(LeafType::Base {
                        base,
                        string_bound: 0,
                    });
                }
                match name.as_str() {
                    "time" => return Ok(LeafType::Name("builtin_interfaces/msg/Time".to_string())),
                    "duration" => {
                        return Ok(LeafType::Name(
                            "builtin_interfaces/msg/Duration".to_string(),
                        ))
                    }
                    _ => {}
                }
            }
            Ok(LeafType::Name(name))
        }
    }
}

fn resolve_field(raw: RawFieldDesc) -> Result<FieldDesc, TypesysError> {
    Ok(match raw {
        RawFieldDesc::Leaf(inner) => FieldDesc::Leaf(resolve_leaf(inner)?),
        RawFieldDesc::Array { inner, length } => FieldDesc::Array {
            inner: resolve_leaf(inner)?,
            length,
        },
        RawFieldDesc::Sequence { inner, bound } => FieldDesc::Sequence {
            inner: resolve_leaf(inner)?,
            bound,
        },
    })
}

fn parse_integer_text(text: &str) -> Result<i64, TypesysError> {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, text.strip_prefix('+').unwrap_or(text)),
    };
    let magnitude = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else if rest.len() > 1 && rest.starts_with('0') {
        i64::from_str_radix(rest, 8)
    } else {
        rest.parse::<i64>()
    }
    .map_err(|_| TypesysError::Parse {
        snippet: text.to_string(),
    })?;
    Ok(sign * magnitude)
}

fn parse_boolean_text(text: &str) -> bool {
    matches!(text.to_ascii_lowercase().as_str(), "true" | "1")
}

/// Resolve a constant's declared base type and interpret its raw literal
/// text accordingly. `const_dcl`'s three numeric alternatives
/// (`float_literal` | `integer_literal` | `boolean_literal`) are as
/// transparent as everything else in this grammar, and `0`/`1` parse as
/// both an integer and a boolean literal — so the literal token alone
/// can't disambiguate `ConstValue::Int` from `ConstValue::Bool`. The
/// constant's own `type_spec` can, and is semantically what decides it
/// anyway: a `bool X=1` constant has a boolean value regardless of which
/// grammar alternative happened to accept the token `1`.
fn lower_const_value(base: Basename, text: &str) -> Result<ConstValue, TypesysError> {
    Ok(match base {
        Basename::Bool => ConstValue::Bool(parse_boolean_text(text)),
        Basename::Float32 | Basename::Float64 => {
            ConstValue::Float(text.parse().map_err(|_| TypesysError::Parse {
                snippet: text.to_string(),
            })?)
        }
        Basename::String => ConstValue::Str(text.trim().to_string()),
        _ => ConstValue::Int(parse_integer_text(text)?),
    })
}

fn lower_const_dcl(tree: &Tree) -> Result<ConstDesc, TypesysError> {
    let children = tree.seq();
    if let Tree::Lit(lit) = &children[0] {
        if lit == "string" {
            let name = normalize_fieldname(children[1].text());
            let value = children[3].text().trim().to_string();
            return Ok(ConstDesc {
                name,
                base: Basename::String,
                value: ConstValue::Str(value),
            });
        }
    }

    // Route through the same alias rewriting as fields (`byte`/`char` parse
    // as a bare `RawLeaf::Name` here too, not a `RawLeaf::Base`).
    let base = match resolve_field(lower_type_spec(&children[0]))? {
        FieldDesc::Leaf(msgtypes_core::LeafType::Base { base, .. }) => base,
        _ => {
            return Err(TypesysError::InvariantViolation {
                message: "constant declared with a non-base type".to_string(),
            })
        }
    };
    let name = normalize_fieldname(children[1].text());
    let value = lower_const_value(base, children[3].text())?;
    Ok(ConstDesc { name, base, value })
}

fn lower_field_dcl(tree: &Tree) -> Result<(String, FieldDesc), TypesysError> {
    let children = tree.seq();
    let name = normalize_fieldname(children[1].text());
    let field = resolve_field(lower_type_spec(&children[0]))?;
    Ok((name, field))
}

/// `definition = const_dcl | field_dcl`. `const_dcl` always produces a
/// 4-child `Seq` (type/`"string"`, ident, `"="`, value); `field_dcl` always
/// produces a 3-child `Seq` (type, ident, optional default). Arity is a
/// sound discriminator since neither shape ever collapses into the other.
fn lower_definition(tree: &Tree) -> Result<DefinitionIr, TypesysError> {
    match tree.seq().len() {
        4 => Ok(DefinitionIr::Const(lower_const_dcl(tree)?)),
        3 => Ok(DefinitionIr::Field(lower_field_dcl(tree)?)),
        n => unreachable!("unexpected definition arity: {n}"),
    }
}

enum DefinitionIr {
    Const(ConstDesc),
    Field((String, FieldDesc)),
}

/// A single `msgdef`, lowered but with field `NAME` leaves not yet run
/// through the normalizer — that needs visibility into every `msgdef` in
/// the batch, so it happens one level up in `lib.rs`.
pub struct RawMessage {
    pub name: String,
    pub descriptor: MessageDescriptor,
}

/// `msgdef = 'MSG:' WS scoped_name definition*`, producing
/// `(normalized_type_name, body)`: ensure the declared name contains
/// `/msg/`, inserting it before the leaf segment if the parent segment
/// isn't already `msg`.
pub fn lower_msgdef(tree: &Tree) -> Result<RawMessage, TypesysError> {
    let children = tree.seq();
    let declared = join_scoped_name(&children[1]);
    let name = crate::normalize::ensure_msg_infix(&declared);

    let mut descriptor = MessageDescriptor::default();
    for def in children[2].rep() {
        match lower_definition(def)? {
            DefinitionIr::Const(c) => descriptor.consts.push(c),
            DefinitionIr::Field(f) => descriptor.fields.push(f),
        }
    }
    Ok(RawMessage { name, descriptor })
}
