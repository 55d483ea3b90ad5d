use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ASCII `\w` and ASCII case folding on purpose: callers depend on exactly
    // this level of permissiveness (no quoted local parts, TLDs of 2-4 letters).
    static ref EMAIL_PATTERN: Regex = Regex::new(r"(?i-u)^[\w.\-]+@([\w\-]+\.)+[A-Z]{2,4}$")
        .expect("email pattern is a valid regex");
}

/// Syntactic email check. `None` and `""` are never valid.
///
/// ```
/// use tunnel_toggle::is_valid_email;
///
/// assert!(is_valid_email("user@example.com"));
/// assert!(!is_valid_email(None));
/// ```
pub fn is_valid_email<'a>(input: impl Into<Option<&'a str>>) -> bool {
    match input.into() {
        None | Some("") => false,
        Some(email) => EMAIL_PATTERN.is_match(email),
    }
}
