//! Registered HTTP status codes and their default reason phrases.

use http::StatusCode;
use tracing::debug;

use crate::error::InvalidArgument;

/// Returns the default reason phrase of a registered status code.
///
/// Phrases are the title cased names of the codes, written without
/// punctuation (`203` is `Non Authoritative Information`, `418` is
/// `Im A Teapot`), except `200` which is `OK`.
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    let phrase = match code {
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        103 => "Early Hints",

        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi Status",
        208 => "Already Reported",
        226 => "Im Used",

        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        306 => "Reserved",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",

        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Payload Too Large",
        414 => "Uri Too Long",
        415 => "Unsupported Media Type",
        416 => "Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "Im A Teapot",
        421 => "Misdirected Request",
        422 => "Unprocessable Entity",
        423 => "Locked",
        424 => "Failed Dependency",
        425 => "Too Early",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",

        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        510 => "Not Extended",
        511 => "Network Authentication Required",

        _ => return None,
    };
    Some(phrase)
}

/// Validates a status code against the registry, returning it with its default phrase.
///
/// # Errors
///
/// Returns [`InvalidArgument::InvalidStatusCode`] if the code is not registered.
pub fn registered_status(code: u16) -> Result<(StatusCode, &'static str), InvalidArgument> {
    let phrase = reason_phrase(code).ok_or(InvalidArgument::InvalidStatusCode { code })?;
    let status = StatusCode::from_u16(code).map_err(|e| {
        debug!(code, error = %e, "status code out of range");
        InvalidArgument::InvalidStatusCode { code }
    })?;
    Ok((status, phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_codes() {
        let ranges = [100..=103, 200..=208, 226..=226, 300..=308, 400..=418, 421..=426, 428..=429, 431..=431, 451..=451, 500..=508, 510..=511];
        let mut count = 0;
        for code in ranges.into_iter().flatten() {
            assert!(reason_phrase(code).is_some(), "{code} should be registered");
            count += 1;
        }
        let total = (0..=999).filter(|code| reason_phrase(*code).is_some()).count();
        assert_eq!(total, count);
    }

    #[test]
    fn phrases() {
        assert_eq!(reason_phrase(200), Some("OK"));
        assert_eq!(reason_phrase(203), Some("Non Authoritative Information"));
        assert_eq!(reason_phrase(207), Some("Multi Status"));
        assert_eq!(reason_phrase(226), Some("Im Used"));
        assert_eq!(reason_phrase(414), Some("Uri Too Long"));
        assert_eq!(reason_phrase(418), Some("Im A Teapot"));
        assert_eq!(reason_phrase(505), Some("Version Not Supported"));
    }

    #[test]
    fn unregistered_codes() {
        for code in [0, 99, 104, 209, 299, 309, 419, 420, 427, 430, 450, 509, 512, 600, 999] {
            assert_eq!(registered_status(code).unwrap_err(), InvalidArgument::InvalidStatusCode { code });
        }
        assert_eq!(registered_status(404).unwrap(), (StatusCode::NOT_FOUND, "Not Found"));
    }
}
