//! Attribute name canonicalization.
//!
//! Header and field names arrive in whatever shape the source file uses
//! (`"Product ID"`, `"Order #"`, camel case exports). Every name is pushed
//! through a fixed normalization pipeline before it is used as a record
//! attribute, an index key, or a predicate. The pipeline must stay
//! byte-for-byte compatible with existing rename-override configurations,
//! so each stage is applied in a fixed order and never skipped.

use std::collections::BTreeMap;

/// Marker prepended to every canonical name.
///
/// Kept from the legacy attribute-storage scheme so rename overrides and
/// persisted attribute lists keep resolving. Normalization strips leading
/// underscores, which makes `canonical` idempotent: a canonical name fed
/// back through the pipeline yields itself.
pub const STORAGE_PREFIX: &str = "_";

/// Legacy reserved-word aliases, applied after normalization.
const RESERVED_ALIASES: &[(&str, &str)] = &[("class", "klass"), ("open", "opened")];

/// Insert word-boundary underscores and downcase.
///
/// Mirrors the classic inflector `underscore`: a boundary before an
/// uppercase letter that follows a lowercase letter or digit, a boundary
/// inside an acronym run before its trailing capitalized word, `-` mapped
/// to `_`.
#[must_use]
pub fn underscore(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            out.push('_');
            continue;
        }
        if c.is_ascii_uppercase() {
            let boundary = match i.checked_sub(1).map(|p| chars[p]) {
                Some(prev) if prev.is_ascii_lowercase() || prev.is_ascii_digit() => true,
                Some(prev) if prev.is_ascii_uppercase() => chars
                    .get(i + 1)
                    .is_some_and(|next| next.is_ascii_lowercase()),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Normalize a raw name into its identifier form (no prefix, no aliasing).
///
/// `"Product ID"` → `product_id`, `"Order #"` → `order_number`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    let mut in_whitespace = false;
    let mut in_underscore = false;

    let mut push = |out: &mut String, c: char| {
        if c == '_' {
            if !in_underscore && !out.is_empty() {
                out.push('_');
            }
            in_underscore = true;
        } else {
            out.push(c);
            in_underscore = false;
        }
    };

    for c in underscore(raw).chars() {
        if c.is_whitespace() {
            // whitespace runs become a single underscore
            if !in_whitespace {
                push(&mut out, '_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;

        match c {
            '.' | '+' | '|' => {}
            '/' => push(&mut out, '_'),
            '#' => {
                push(&mut out, '_');
                for n in "number".chars() {
                    push(&mut out, n);
                }
            }
            _ => push(&mut out, c),
        }
    }

    out.trim_matches('_').to_string()
}

/// Canonicalize a raw name against a rename-override table.
///
/// Pipeline order is load-bearing: normalize, rename-override lookup
/// (raw first, then the normalized intermediate), reserved-word aliasing,
/// then the storage prefix.
#[must_use]
pub fn canonical(raw: &str, renames: &BTreeMap<String, String>) -> String {
    let mut name = renames.get(raw).cloned().unwrap_or_else(|| {
        let normalized = normalize(raw);
        renames.get(&normalized).cloned().unwrap_or(normalized)
    });

    if let Some((_, alias)) = RESERVED_ALIASES.iter().find(|(word, _)| *word == name) {
        name = (*alias).to_string();
    }

    format!("{STORAGE_PREFIX}{name}")
}
