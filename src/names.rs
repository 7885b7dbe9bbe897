//! Participant name matching.
//!
//! Names arrive as free text from the booking system, so the same household
//! shows up as "Okafor & Reyes", "okafor and reyes" or an old misspelling.
//! Matching always goes through [`normalize_name`]; [`format_display_name`]
//! applies the same substitutions but keeps the original casing.

/// Known spelling variants mapped to the canonical roster spelling.
/// Keys are compared in folded form (see [`fold`]).
pub const KNOWN_ALIASES: &[(&str, &str)] = &[
    ("Lindquist", "Lindqvist"),
    ("Lindqvist Family", "Lindqvist"),
    ("Marchette", "Marchetti"),
    ("Okafor Reyes", "Okafor & Reyes"),
    ("Okafor-Reyes", "Okafor & Reyes"),
    ("Dubois", "Dubois & Kim"),
    ("Nakamura-Ellis", "Nakamura"),
    ("Hartly", "Hartley"),
];

/// Lowercases, spells out "&", collapses whitespace and trims
fn fold(name: &str) -> String {
    collapse_whitespace(&name.to_lowercase().replace('&', " and "))
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical spelling for a raw name, if it is a known variant
fn lookup_alias(raw: &str) -> Option<&'static str> {
    let folded = fold(raw);
    KNOWN_ALIASES
        .iter()
        .find(|(variant, _)| fold(variant) == folded)
        .map(|(_, canonical)| *canonical)
}

/// Normalized identity of a participant name.
///
/// Returns an empty string for `None` or blank input. Idempotent.
pub fn normalize_name(name: Option<&str>) -> String {
    let raw = match name.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return String::new(),
    };
    fold(lookup_alias(raw).unwrap_or(raw))
}

/// True when both names refer to the same participant
pub fn same_participant(a: &str, b: &str) -> bool {
    let a = normalize_name(Some(a));
    !a.is_empty() && a == normalize_name(Some(b))
}

/// Human-facing form of a name: alias and "&" substitution, original casing kept
pub fn format_display_name(name: Option<&str>) -> String {
    let raw = match name.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return String::new(),
    };
    let canonical = lookup_alias(raw).unwrap_or(raw);
    collapse_whitespace(&canonical.replace('&', " and "))
}
