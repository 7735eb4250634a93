/// Extract the credential from an `Authorization: Bearer <credential>` value.
///
/// The value must split on single ASCII whitespace into exactly two non-empty
/// parts, and the scheme must be `Bearer` in any letter case. The credential
/// is returned verbatim.
pub fn extract_bearer(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split(|c: char| c.is_ascii_whitespace());

    let scheme = parts.next()?;
    let credential = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    if !scheme.eq_ignore_ascii_case("Bearer") || credential.is_empty() {
        return None;
    }

    Some(credential)
}
