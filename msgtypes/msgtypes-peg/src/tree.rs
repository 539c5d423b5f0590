/// An untyped PEG parse tree node.
///
/// Produced structurally, matching the rule kind that matched it: a
/// [`Rule::Literal`] yields [`Tree::Lit`], a [`Rule::Regex`] yields
/// [`Tree::Text`], a [`Rule::Seq`] yields [`Tree::Seq`], a [`Rule::Repeat`]
/// yields [`Tree::Rep`], and a [`Rule::Opt`] yields [`Tree::Opt`]. A
/// [`Rule::Choice`] and a [`Rule::Ref`] are transparent: they produce
/// whatever tree their matched alternative (or referenced rule) produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    /// The literal text that was matched.
    Lit(String),
    /// Text captured by a regex terminal.
    Text(String),
    /// Children of a sequence, in declaration order.
    Seq(Vec<Tree>),
    /// Children of a zero-or-more repetition, in match order.
    Rep(Vec<Tree>),
    /// `Some` if the optional matched, `None` otherwise.
    Opt(Option<Box<Tree>>),
}

impl Tree {
    /// Unwrap a [`Tree::Text`], panicking otherwise.
    ///
    /// Lowering code matches the grammar it was written against, so a
    /// shape mismatch here is a programming error, not user input.
    pub fn text(&self) -> &str {
        match self {
            Tree::Text(s) | Tree::Lit(s) => s,
            other => panic!("expected Tree::Text/Lit, got {other:?}"),
        }
    }

    pub fn seq(&self) -> &[Tree] {
        match self {
            Tree::Seq(children) => children,
            other => panic!("expected Tree::Seq, got {other:?}"),
        }
    }

    pub fn rep(&self) -> &[Tree] {
        match self {
            Tree::Rep(children) => children,
            other => panic!("expected Tree::Rep, got {other:?}"),
        }
    }

    pub fn opt(&self) -> Option<&Tree> {
        match self {
            Tree::Opt(inner) => inner.as_deref(),
            other => panic!("expected Tree::Opt, got {other:?}"),
        }
    }
}
