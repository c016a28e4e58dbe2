//! String conventions shared by the toolkit.
//!
//! Toolkit names (bodies, kernel variables, units) are compared ignoring case,
//! leading and trailing blanks, and runs of embedded blanks.

/// Uppercase, trim, and collapse embedded whitespace to single spaces
pub fn normalize_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().map(|c| c.to_ascii_uppercase()));
    }
    out
}

/// Trim and collapse embedded whitespace, preserving case
pub fn compress_blanks(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn eq_names(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

/// Truncate to at most `max` characters (not bytes)
pub fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize() {
        assert_eq!(normalize_name("  solar   system\tbarycenter "), "SOLAR SYSTEM BARYCENTER");
        assert_eq!(normalize_name(""), "");
        assert!(eq_names("Earth  Barycenter", "EARTH BARYCENTER"));
        assert_eq!(compress_blanks("  New   Horizons "), "New Horizons");
    }

    #[test]
    fn truncate_chars() {
        assert_eq!(truncate("SPICE(KERNELVARNOTFOUND)", 5), "SPICE");
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("a\u{1234}bc", 2), "a\u{1234}");
    }
}
