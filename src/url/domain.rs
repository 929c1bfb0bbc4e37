/// Strips a leading `http://` or `https://` (any letter case) from a link
///
/// Returns the link unchanged when it carries neither prefix.
pub fn strip_scheme(link: &str) -> &str {
    for scheme in ["http://", "https://"] {
        if let Some(prefix) = link.get(..scheme.len()) {
            if prefix.eq_ignore_ascii_case(scheme) {
                return &link[scheme.len()..];
            }
        }
    }
    link
}

/// Returns true if the link starts with `http://` or `https://` (any letter case)
pub fn has_http_scheme(link: &str) -> bool {
    strip_scheme(link).len() != link.len()
}

/// Extracts the domain from a link
///
/// The scheme is stripped and everything from the first `/` onward is dropped.
/// No lowercasing and no port handling is applied: the result is exactly the
/// text between the scheme and the path.
///
/// # Arguments
///
/// * `link` - A link, normally already scheme-normalized by the link filter
///
/// # Returns
///
/// The domain portion of the link (possibly empty)
///
/// # Examples
///
/// ```
/// use domain_scout::url::domain_of;
///
/// assert_eq!(domain_of("http://example.com/path"), "example.com");
/// assert_eq!(domain_of("HTTPS://Blog.Example.com"), "Blog.Example.com");
/// assert_eq!(domain_of("example.com/page"), "example.com");
/// ```
pub fn domain_of(link: &str) -> &str {
    let rest = strip_scheme(link);
    match rest.find('/') {
        Some(end) => &rest[..end],
        None => rest,
    }
}
