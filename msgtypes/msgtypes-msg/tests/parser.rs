use msgtypes_core::{Basename, ConstValue, FieldDesc, LeafType};
use msgtypes_msg::parse_msg;

#[test]
fn minimal_scalar_field() {
    let dict = parse_msg("int32 x\n", "pkg/Foo").unwrap();
    let desc = dict.get("pkg/msg/Foo").unwrap();
    assert_eq!(desc.fields.len(), 1);
    assert_eq!(desc.fields[0].0, "x");
    assert_eq!(
        desc.fields[0].1,
        FieldDesc::base(Basename::Int32, 0)
    );
}

#[test]
fn header_resolves_to_std_msgs() {
    let dict = parse_msg("Header h\n", "pkg/Foo").unwrap();
    let desc = dict.get("pkg/msg/Foo").unwrap();
    assert_eq!(
        desc.fields[0].1,
        FieldDesc::name("std_msgs/msg/Header")
    );
}

#[test]
fn bounded_string_constant_strips_trailing_whitespace() {
    let dict = parse_msg("string GREET=hello world  \n", "pkg/Foo").unwrap();
    let desc = dict.get("pkg/msg/Foo").unwrap();
    assert_eq!(desc.consts.len(), 1);
    assert_eq!(desc.consts[0].name, "GREET");
    assert_eq!(desc.consts[0].base, Basename::String);
    assert_eq!(desc.consts[0].value, ConstValue::Str("hello world".to_string()));
}

#[test]
fn array_vs_bounded_vs_unbounded_sequence() {
    let dict = parse_msg("uint8[4] a\nuint8[] b\nuint8[<=4] c\n", "pkg/Foo").unwrap();
    let desc = dict.get("pkg/msg/Foo").unwrap();
    assert_eq!(
        desc.fields[0].1,
        FieldDesc::Array {
            inner: LeafType::Base { base: Basename::Uint8, string_bound: 0 },
            length: 4,
        }
    );
    assert_eq!(
        desc.fields[1].1,
        FieldDesc::Sequence {
            inner: LeafType::Base { base: Basename::Uint8, string_bound: 0 },
            bound: 0,
        }
    );
    assert_eq!(
        desc.fields[2].1,
        FieldDesc::Sequence {
            inner: LeafType::Base { base: Basename::Uint8, string_bound: 0 },
            bound: 4,
        }
    );
}

#[test]
fn keyword_field_name_gets_suffixed() {
    let dict = parse_msg("int32 class\n", "pkg/Foo").unwrap();
    let desc = dict.get("pkg/msg/Foo").unwrap();
    assert_eq!(desc.fields[0].0, "class_");
}

#[test]
fn byte_and_char_aliases_rewrite_to_octet_and_uint8() {
    let dict = parse_msg("byte b\nchar c\n", "pkg/Foo").unwrap();
    let desc = dict.get("pkg/msg/Foo").unwrap();
    assert_eq!(desc.fields[0].1, FieldDesc::base(Basename::Octet, 0));
    assert_eq!(desc.fields[1].1, FieldDesc::base(Basename::Uint8, 0));
}

#[test]
fn time_and_duration_expand_to_builtin_interfaces() {
    let dict = parse_msg("time t\nduration d\n", "pkg/Foo").unwrap();
    let desc = dict.get("pkg/msg/Foo").unwrap();
    assert_eq!(desc.fields[0].1, FieldDesc::name("builtin_interfaces/msg/Time"));
    assert_eq!(desc.fields[1].1, FieldDesc::name("builtin_interfaces/msg/Duration"));
}

#[test]
fn bare_name_without_sibling_falls_back_to_owner_package() {
    let dict = parse_msg("Point a\n", "geometry_msgs/Vector3").unwrap();
    let desc = dict.get("geometry_msgs/msg/Vector3").unwrap();
    // "Point" has no sibling declared in this single-type batch, so rule 3 applies.
    assert_eq!(desc.fields[0].1, FieldDesc::name("geometry_msgs/msg/Point"));
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let dict = parse_msg("# a comment\nint32 x # trailing comment\n\nint32 y\n", "pkg/Foo").unwrap();
    let desc = dict.get("pkg/msg/Foo").unwrap();
    assert_eq!(desc.fields.len(), 2);
}

#[test]
fn unparseable_input_is_a_parse_error() {
    let err = parse_msg("this is not valid msg text !!!\n", "pkg/Foo").unwrap_err();
    assert!(matches!(err, msgtypes_core::TypesysError::Parse { .. }));
}

#[test]
fn batch_parse_lets_rule_one_win_over_rule_three() {
    let text = "MSG: geometry_msgs/msg/Point\nfloat64 x\n\
================================================================================\n\
MSG: geometry_msgs/Vector3\nPoint a\n";
    let dict = msgtypes_msg::parse_all(text).unwrap();
    let vec3 = dict.get("geometry_msgs/msg/Vector3").unwrap();
    assert_eq!(vec3.fields[0].1, FieldDesc::name("geometry_msgs/msg/Point"));
    assert!(dict.contains_key("geometry_msgs/msg/Point"));
}
