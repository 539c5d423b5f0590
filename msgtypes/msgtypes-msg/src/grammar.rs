//! The normative MSG PEG grammar, built once from [`msgtypes_peg`] primitives.

use std::sync::OnceLock;

use msgtypes_peg::{Grammar, Rule};
use regex::Regex;

fn re(pattern: &str) -> Rule {
    Rule::Regex(Regex::new(pattern).expect("grammar regex is valid"))
}

/// The compiled grammar, built on first use and reused for every parse.
pub fn grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(build)
}

/// `default_value` accepts a literal but is otherwise unparsed and discarded
/// by the visitor. Restricting it to the four literal shapes (rather than
/// "rest of line", as an informal reading of the grammar might suggest)
/// keeps it from ever swallowing the next field declaration: none of
/// `scoped_name`'s identifiers can start with a digit or quote, or equal
/// `true`/`false` as a whole word, so the choice never misfires across a
/// field boundary.
fn build() -> Grammar {
    let skip = Regex::new(r"(?:[\s]+|#[^\n]*)+").expect("skip regex is valid");

    let rules: Vec<(&'static str, Rule)> = vec![
        ("ident", re(r"[a-zA-Z_][a-zA-Z_0-9]*")),
        (
            "scoped_name",
            Rule::Seq(vec![
                Rule::Ref("ident"),
                Rule::Repeat(Box::new(Rule::Seq(vec![Rule::Literal("/"), Rule::Ref("ident")]))),
            ]),
        ),
        (
            "integer_literal",
            Rule::Choice(vec![
                re(r"0[xX][0-9a-fA-F]+"),
                re(r"0[0-7]+"),
                re(r"[-+]?[0-9]+"),
            ]),
        ),
        (
            "float_literal",
            re(r"[-+]?[0-9]+\.[0-9]+(?:[eE][-+]?[0-9]+)?|[-+]?[0-9]+[eE][-+]?[0-9]+"),
        ),
        ("boolean_literal", re(r"(?i:true|false)\b|[01]\b")),
        ("string_literal", re(r#"'(?:\\.|[^'\\])*'|"(?:\\.|[^"\\])*""#)),
        (
            "default_value",
            Rule::Opt(Box::new(Rule::Choice(vec![
                Rule::Ref("string_literal"),
                Rule::Ref("float_literal"),
                Rule::Ref("integer_literal"),
                Rule::Ref("boolean_literal"),
            ]))),
        ),
        (
            "array_size",
            Rule::Seq(vec![
                Rule::Literal("["),
                Rule::Opt(Box::new(Rule::Ref("integer_literal"))),
                Rule::Literal("]"),
            ]),
        ),
        (
            "array_bounds",
            Rule::Seq(vec![
                Rule::Literal("[<="),
                Rule::Ref("integer_literal"),
                Rule::Literal("]"),
            ]),
        ),
        (
            "simple_type_spec",
            Rule::Choice(vec![
                Rule::Seq(vec![
                    Rule::Literal("string"),
                    Rule::Literal("<="),
                    Rule::Ref("integer_literal"),
                ]),
                Rule::Ref("scoped_name"),
            ]),
        ),
        (
            "type_spec",
            Rule::Choice(vec![
                Rule::Seq(vec![Rule::Ref("simple_type_spec"), Rule::Ref("array_size")]),
                Rule::Seq(vec![Rule::Ref("simple_type_spec"), Rule::Ref("array_bounds")]),
                Rule::Ref("simple_type_spec"),
            ]),
        ),
        (
            "const_dcl",
            Rule::Choice(vec![
                Rule::Seq(vec![
                    Rule::Literal("string"),
                    Rule::Ref("ident"),
                    Rule::Literal("="),
                    re(r"[^\n]+"),
                ]),
                Rule::Seq(vec![
                    Rule::Ref("type_spec"),
                    Rule::Ref("ident"),
                    Rule::Literal("="),
                    Rule::Ref("float_literal"),
                ]),
                Rule::Seq(vec![
                    Rule::Ref("type_spec"),
                    Rule::Ref("ident"),
                    Rule::Literal("="),
                    Rule::Ref("integer_literal"),
                ]),
                Rule::Seq(vec![
                    Rule::Ref("type_spec"),
                    Rule::Ref("ident"),
                    Rule::Literal("="),
                    Rule::Ref("boolean_literal"),
                ]),
            ]),
        ),
        (
            "field_dcl",
            Rule::Seq(vec![
                Rule::Ref("type_spec"),
                Rule::Ref("ident"),
                Rule::Ref("default_value"),
            ]),
        ),
        (
            "definition",
            Rule::Choice(vec![Rule::Ref("const_dcl"), Rule::Ref("field_dcl")]),
        ),
        ("msgsep", re(r"={80}")),
        (
            "msgdef",
            Rule::Seq(vec![
                Rule::Literal("MSG:"),
                Rule::Ref("scoped_name"),
                Rule::Repeat(Box::new(Rule::Ref("definition"))),
            ]),
        ),
        (
            "specification",
            Rule::Seq(vec![
                Rule::Ref("msgdef"),
                Rule::Repeat(Box::new(Rule::Seq(vec![Rule::Ref("msgsep"), Rule::Ref("msgdef")]))),
            ]),
        ),
    ];

    Grammar::new(rules, skip)
}
