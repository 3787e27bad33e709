//! Label canonicalization.
//!
//! Call sites hand over labels in whatever order they happen to build them;
//! every aggregate is keyed by the canonical form produced here, so two label
//! sets with the same pairs always land on the same entry.

use std::fmt::Write;

/// Escape a label value for the text exposition format.
pub fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Build the canonical key for a label set.
///
/// Keys are sorted and rendered as `key="value"` pairs joined by commas. When
/// a key is repeated the last value supplied wins. The empty set yields `""`.
pub fn canonicalize<I, K, V>(labels: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = labels.into_iter().collect();
    // stable: equal keys keep call-site order
    pairs.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

    let mut out = String::new();
    let mut first = true;
    for (idx, (k, v)) in pairs.iter().enumerate() {
        let shadowed = pairs
            .get(idx + 1)
            .is_some_and(|next| next.0.as_ref() == k.as_ref());
        if shadowed {
            continue;
        }
        if !first {
            out.push(',');
        }
        first = false;
        let _ = write!(out, "{}=\"{}\"", k.as_ref(), escape_label(v.as_ref()));
    }
    out
}

/// Normalize a metric name: hyphens become underscores and, when given, the
/// conventional suffix is appended unless already present.
pub fn normalize_name(name: &str, suffix: Option<&str>) -> String {
    let name = name.replace('-', "_");
    match suffix {
        Some(s) if !name.ends_with(s) => format!("{name}{s}"),
        _ => name,
    }
}

/// Render `<name>{<labels>}` or bare `<name>` for the empty key.
pub(crate) fn series(name: &str, key: &str) -> String {
    if key.is_empty() {
        name.to_string()
    } else {
        format!("{name}{{{key}}}")
    }
}
