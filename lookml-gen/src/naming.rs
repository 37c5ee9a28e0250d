//! Conversion of free-form labels into LookML identifiers.
//!
//! [`normalize`] only lower-cases and turns spaces into underscores. Other
//! characters are passed through untouched, so a label like `"2024 Sales-Q1"`
//! yields `"2024_sales-q1"`, which LookML will reject.
//! [`identifier_warnings`] reports such problems without changing the output.

/// Converts a label to the identifier syntax used for LookML field, view and
/// dashboard names.
///
/// ```
/// use lookml_gen::naming::normalize;
///
/// assert_eq!(normalize("Order Date"), "order_date");
/// assert_eq!(normalize(&normalize("Order Date")), "order_date");
/// ```
pub fn normalize(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

/// Qualifies a field as `<view>.<normalized field>`.
///
/// A name that already carries the `<view>.` prefix is returned unchanged.
pub fn qualify(view_name: &str, field: &str) -> String {
    let prefix = format!("{view_name}.");
    if field.starts_with(&prefix) {
        field.to_string()
    } else {
        format!("{prefix}{}", normalize(field))
    }
}

/// Problems that make an identifier invalid in LookML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierWarning {
    Empty,
    LeadingDigit,
    InvalidCharacter(char),
}

impl std::fmt::Display for IdentifierWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierWarning::Empty => write!(f, "identifier is empty"),
            IdentifierWarning::LeadingDigit => write!(f, "identifier starts with a digit"),
            IdentifierWarning::InvalidCharacter(c) => write!(f, "invalid character '{c}'"),
        }
    }
}

/// Lists the reasons an already-normalized identifier is not a valid LookML
/// name. Each offending character is reported once.
pub fn identifier_warnings(identifier: &str) -> Vec<IdentifierWarning> {
    let mut warnings = Vec::new();
    let Some(first) = identifier.chars().next() else {
        warnings.push(IdentifierWarning::Empty);
        return warnings;
    };
    if first.is_ascii_digit() {
        warnings.push(IdentifierWarning::LeadingDigit);
    }
    for c in identifier.chars() {
        let valid = c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_';
        if !valid && !warnings.contains(&IdentifierWarning::InvalidCharacter(c)) {
            warnings.push(IdentifierWarning::InvalidCharacter(c));
        }
    }
    warnings
}
