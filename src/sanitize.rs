//! Escaping for text embedded in generated markup
//!
//! Every string drawn from a reply item or typed by the user passes through
//! [`escape`] exactly once, at the point where it becomes part of the markup
//! tree. The tree only accepts [`Escaped`] values, so skipping that step does
//! not compile.

use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// Text that is safe to place inside element content or a quoted attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Escaped(Cow<'static, str>);

impl Escaped {
    /// Markup-clean text authored by this crate (labels, fixed messages).
    ///
    /// Only for literals: the caller vouches that the text has none of
    /// `& < > " '`.
    pub const fn literal(text: &'static str) -> Self {
        Self(Cow::Borrowed(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape the five markup-significant characters.
///
/// Not idempotent: escaping already escaped text double-encodes `&`.
pub fn escape(input: &str) -> Escaped {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Escaped(Cow::Owned(input.to_string()));
    }

    let mut out = String::with_capacity(input.len() + 16);
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    Escaped(Cow::Owned(out))
}

/// Escape an arbitrary JSON value. Anything that is not a string yields the
/// empty string.
pub fn escape_value(value: &Value) -> Escaped {
    match value {
        Value::String(s) => escape(s),
        _ => Escaped::default(),
    }
}

/// Escape an optional field, treating absence as the empty string.
pub fn escape_opt(value: Option<&str>) -> Escaped {
    value.map(escape).unwrap_or_default()
}
