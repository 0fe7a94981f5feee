//! Query fragment construction.
//!
//! A fragment is one filter condition rendered as query-language text, e.g.
//! `country:("ZA")` or `(heart AND transplant)`. Fragments for the designated
//! content field are emitted bare; every other field gets a `field:` prefix.

use crate::input::{quote_phrase, Scalar, Term};

/// A filter condition: operator plus a value of matching arity.
///
/// Scalar operators carry one term; `In` carries a candidate set and `Range`
/// carries its two bounds. Fusing the value into the variant makes arity
/// mismatches unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Substring-style match on each word.
    Contains(Term),
    /// Prefix match on each word (`word*`).
    StartsWith(Term),
    /// Whole-phrase match.
    Exact(Term),
    /// Fuzzy match on each word (`word~`).
    Fuzzy(Term),
    /// Exclusive lower bound: `{value TO *}`.
    Gt(Term),
    /// Inclusive lower bound: `[value TO *]`.
    Gte(Term),
    /// Exclusive upper bound: `{* TO value}`.
    Lt(Term),
    /// Inclusive upper bound: `[* TO value]`.
    Lte(Term),
    /// Membership in a candidate set, every element quoted.
    In(Vec<Scalar>),
    /// Inclusive range: `["lower" TO "upper"]`.
    Range(Scalar, Scalar),
}

impl Filter {
    fn is_raw(&self) -> bool {
        match self {
            Filter::Contains(t)
            | Filter::StartsWith(t)
            | Filter::Exact(t)
            | Filter::Fuzzy(t)
            | Filter::Gt(t)
            | Filter::Gte(t)
            | Filter::Lt(t)
            | Filter::Lte(t) => t.is_raw(),
            Filter::In(_) | Filter::Range(..) => false,
        }
    }
}

/// Build the query-language fragment for one filter condition.
///
/// Returns `"field:fragment"`, or the bare fragment when `field` is the
/// designated content field. Pure function of its inputs.
pub fn build_fragment(field: &str, filter: &Filter, content_field: &str) -> String {
    let fragment = render(filter);

    // Non-raw fragments are parenthesized unless already fully wrapped.
    let fragment = if !fragment.is_empty()
        && !filter.is_raw()
        && !(fragment.starts_with('(') && fragment.ends_with(')'))
    {
        format!("({fragment})")
    } else {
        fragment
    };

    if field == content_field {
        fragment
    } else {
        format!("{field}:{fragment}")
    }
}

fn render(filter: &Filter) -> String {
    match filter {
        Filter::Contains(t) => per_word(t, |w| w.to_string()),
        Filter::StartsWith(t) => per_word(t, |w| format!("{w}*")),
        Filter::Fuzzy(t) => per_word(t, |w| format!("{w}~")),

        Filter::Exact(t) => phrase(t),

        Filter::Gt(t) => format!("{{{} TO *}}", phrase(t)),
        Filter::Gte(t) => format!("[{} TO *]", phrase(t)),
        Filter::Lt(t) => format!("{{* TO {}}}", phrase(t)),
        Filter::Lte(t) => format!("[* TO {}]", phrase(t)),

        Filter::In(candidates) => {
            let quoted: Vec<String> = candidates
                .iter()
                .map(|v| quote_phrase(&v.to_engine_literal()))
                .collect();
            format!("({})", quoted.join(" OR "))
        }

        Filter::Range(lower, upper) => format!(
            "[{} TO {}]",
            quote_phrase(&lower.to_engine_literal()),
            quote_phrase(&upper.to_engine_literal())
        ),
    }
}

/// Transform each whitespace-separated word independently and AND the
/// results. Exact and raw terms skip the per-word treatment entirely.
fn per_word(term: &Term, transform: impl Fn(&str) -> String) -> String {
    if term.is_exact() || term.is_raw() {
        return term.prepared();
    }

    let prepared = term.prepared();
    let words: Vec<String> = prepared.split_whitespace().map(&transform).collect();

    match words.len() {
        0 => String::new(),
        1 => words.into_iter().next().unwrap_or_default(),
        _ => format!("({})", words.join(" AND ")),
    }
}

/// The phrase form used by exact matches and comparison bounds: exact and
/// raw terms are already in final shape, everything else is quoted.
fn phrase(term: &Term) -> String {
    match term {
        Term::Exact(_) | Term::Raw(_) => term.prepared(),
        Term::Clean(_) => quote_phrase(&term.prepared()),
    }
}
