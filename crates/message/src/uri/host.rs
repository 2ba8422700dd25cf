//! Hostname syntax validation.
//!
//! Accepts DNS style names made of dot separated labels (ASCII letters, digits
//! and inner hyphens), dotted IPv4 addresses, and bracketed IPv6 literals.

use std::net::Ipv6Addr;

/// Maximum length of a whole hostname, excluding a trailing dot.
const MAX_HOST_LEN: usize = 253;

/// Maximum length of a single label.
const MAX_LABEL_LEN: usize = 63;

/// Returns true if `host` is a syntactically valid hostname.
///
/// The empty string is not a hostname; callers that accept "no host" check for
/// it before calling this function.
pub fn is_valid_hostname(host: &str) -> bool {
    if let Some(literal) = host.strip_prefix('[') {
        return literal.strip_suffix(']').is_some_and(|inner| inner.parse::<Ipv6Addr>().is_ok());
    }

    // a single trailing dot marks a fully qualified name
    let name = host.strip_suffix('.').unwrap_or(host);
    if name.is_empty() || name.len() > MAX_HOST_LEN {
        return false;
    }

    name.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    match bytes {
        [] => false,
        [b'-', ..] | [.., b'-'] => false,
        _ => bytes.len() <= MAX_LABEL_LEN && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_names() {
        for host in ["example.com", "hostname.com", "localhost", "a", "xn--bcher-kva.example", "EXAMPLE.COM", "example.com."] {
            assert!(is_valid_hostname(host), "{host} should be valid");
        }
    }

    #[test]
    fn accept_ip_literals() {
        assert!(is_valid_hostname("127.0.0.1"));
        assert!(is_valid_hostname("[::1]"));
        assert!(is_valid_hostname("[2001:db8::7]"));
    }

    #[test]
    fn reject_bad_names() {
        for host in [
            "",
            ".",
            "host?name",
            "bad?host",
            "http://example.com",
            "exa mple.com",
            "-example.com",
            "example-.com",
            "example..com",
            "under_score.com",
            "[::1",
            "[not-an-ip]",
        ] {
            assert!(!is_valid_hostname(host), "{host} should be invalid");
        }
    }

    #[test]
    fn reject_oversized_labels() {
        let label = "a".repeat(MAX_LABEL_LEN + 1);
        assert!(!is_valid_hostname(&label));
        assert!(is_valid_hostname(&label[1..]));

        let long = ["abcdefghi"; 26].join(".");
        assert!(long.len() > MAX_HOST_LEN);
        assert!(!is_valid_hostname(&long));
    }
}
