//! Typed inputs for query fragments.
//!
//! Every value that ends up inside a query fragment passes through exactly
//! one normalizer ([`Scalar::to_engine_literal`]) so that numbers, booleans
//! and datetimes all render as engine-native literal text. On top of that,
//! [`Term`] records how much processing the caller wants: `Clean` values are
//! escaped for the query language, `Exact` values become phrases, and `Raw`
//! values are emitted verbatim with no post-processing at all.

use chrono::{DateTime, SecondsFormat, Utc};

/// A single comparison value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(DateTime<Utc>),
}

impl Scalar {
    /// Render as engine-native literal text.
    pub fn to_engine_literal(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Scalar::DateTime(value)
    }
}

/// A scalar plus its processing mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Escape query-language metacharacters, then apply the operator's
    /// per-word transformation.
    Clean(Scalar),
    /// Match as a whole phrase; no per-word transformation.
    Exact(Scalar),
    /// Pre-escaped query-language text, emitted verbatim.
    Raw(String),
}

impl Term {
    pub fn clean(value: impl Into<Scalar>) -> Self {
        Term::Clean(value.into())
    }

    pub fn exact(value: impl Into<Scalar>) -> Self {
        Term::Exact(value.into())
    }

    pub fn raw(value: impl Into<String>) -> Self {
        Term::Raw(value.into())
    }

    /// The prepared query-language form of this term.
    pub(crate) fn prepared(&self) -> String {
        match self {
            Term::Clean(s) => sanitize(&s.to_engine_literal()),
            Term::Exact(s) => quote_phrase(&s.to_engine_literal()),
            Term::Raw(s) => s.clone(),
        }
    }

    pub(crate) fn is_raw(&self) -> bool {
        matches!(self, Term::Raw(_))
    }

    pub(crate) fn is_exact(&self) -> bool {
        matches!(self, Term::Exact(_))
    }
}

pub(crate) fn quote_phrase(text: &str) -> String {
    format!("\"{text}\"")
}

/// Words the query language treats as operators.
const RESERVED_WORDS: [&str; 4] = ["AND", "OR", "NOT", "TO"];

/// Characters the query language treats as syntax.
const RESERVED_CHARACTERS: [char; 19] = [
    '\\', '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':',
    '/',
];

/// Escape user-supplied text so the engine reads it as literal terms.
pub(crate) fn sanitize(input: &str) -> String {
    let mut cleaned = input.to_string();
    for word in RESERVED_WORDS {
        cleaned = cleaned.replace(word, &word.to_lowercase());
    }

    let mut out = String::with_capacity(cleaned.len());
    for c in cleaned.chars() {
        if RESERVED_CHARACTERS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
