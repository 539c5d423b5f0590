//! Identifier normalization: avoid collisions between MSG field/constant
//! names and reserved words in the downstream host language.
//!
//! The downstream host is the Python `rosbags`/`rclpy` binding layer this
//! subsystem's hash and canonical-text output ultimately feed, so the
//! reserved-word set is Python's, not Rust's — this has to stay fixed even
//! if the implementation language changes, because it's wire-visible in
//! the legacy canonical text and load-bearing for round-tripping field
//! names through existing consumers.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Append a trailing underscore if `name` collides with a reserved word.
pub fn normalize_fieldname(name: &str) -> String {
    if PYTHON_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Undo [`normalize_fieldname`] for canonical-text and hash output.
///
/// Strips *all* trailing underscores unconditionally, applied to every
/// field name and not only ones that were actually keyword-suffixed.
pub fn denormalize_fieldname(name: &str) -> &str {
    name.trim_end_matches('_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_gets_suffixed() {
        assert_eq!(normalize_fieldname("class"), "class_");
    }

    #[test]
    fn non_keyword_is_unchanged() {
        assert_eq!(normalize_fieldname("velocity"), "velocity");
    }

    #[test]
    fn normalize_then_denormalize_round_trips() {
        for name in ["class", "x", "import", "velocity"] {
            assert_eq!(denormalize_fieldname(&normalize_fieldname(name)), name);
        }
    }
}
