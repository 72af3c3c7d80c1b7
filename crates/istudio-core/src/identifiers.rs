//! Sanitization for admin-controlled SQL identifiers.
//!
//! Table and column names in the catalog come from the backend schema and
//! from request parameters, so they are untrusted input. Values are always
//! bound as query parameters, but identifiers cannot be bound, so every
//! identifier is restricted to a safe charset before it is interpolated
//! into a statement.

/// PostgreSQL truncates identifiers at NAMEDATALEN - 1 bytes.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Error returned when an identifier fails sanitization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier: {0:?}")]
pub struct InvalidIdentifier(pub String);

/// Validates an identifier against the safe charset.
///
/// Accepted: 1..=63 bytes, first character ASCII alphabetic or `_`,
/// remainder ASCII alphanumeric or `_`. Anything else (quotes, dots,
/// whitespace, unicode) is rejected.
pub fn sanitize_identifier(name: &str) -> Result<&str, InvalidIdentifier> {
    if name.is_empty() || name.len() > MAX_IDENTIFIER_LEN {
        return Err(InvalidIdentifier(name.to_string()));
    }

    let mut chars = name.chars();
    let first = chars.next().expect("non-empty checked above");
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(InvalidIdentifier(name.to_string()));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(InvalidIdentifier(name.to_string()));
    }

    Ok(name)
}

/// Sanitizes and double-quotes an identifier for interpolation.
pub fn quote_identifier(name: &str) -> Result<String, InvalidIdentifier> {
    let name = sanitize_identifier(name)?;
    Ok(format!("\"{name}\""))
}
