//! OSC 7 current-working-directory reports (`ESC ] 7 ; <uri> ST`).
//!
//! Only two URI schemes are understood: `file://`, whose hostname and path
//! are percent-decoded, and `kitty-shell-cwd://`, whose payload is passed
//! through raw (its whole point is to avoid the percent-encoding dance in
//! shell scripts). Both require the third `/` that separates hostname from
//! path, even when the hostname is empty.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const FILE_SCHEME: &str = "file://";
const KITTY_SCHEME: &str = "kitty-shell-cwd://";

/// RFC 3986 unreserved characters are left alone; everything else
/// (including `/`, which is encoded separately per path segment) is
/// percent-encoded.
const PERCENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Osc7 {
    pub hostname: String,
    pub path: String,
}

impl Osc7 {
    /// Parses the payload that follows `OSC 7 ;` (the `Osc` event's data,
    /// without the `7;` prefix).
    pub fn parse(data: &[u8]) -> Option<Osc7> {
        let text = std::str::from_utf8(data).ok()?;

        let (scheme, needs_percent_decode) = if text.starts_with(FILE_SCHEME) {
            (FILE_SCHEME, true)
        } else if text.starts_with(KITTY_SCHEME) {
            (KITTY_SCHEME, false)
        } else {
            return None;
        };

        let rest = &text[scheme.len()..];
        let hostname_end = rest.find('/')?;
        let (hostname, path) = (&rest[..hostname_end], &rest[hostname_end..]);

        if !needs_percent_decode {
            return Some(Osc7 {
                hostname: hostname.to_string(),
                path: path.to_string(),
            });
        }

        let hostname = percent_decode_str(hostname).decode_utf8().ok()?;
        let path = percent_decode_str(path).decode_utf8().ok()?;
        Some(Osc7 {
            hostname: hostname.into_owned(),
            path: path.into_owned(),
        })
    }

    /// Serializes to the full `ESC ] 7 ; file://... ST` sequence. Always
    /// emits the `file://` form, percent-encoding the hostname and each
    /// path segment independently so that the `/` separators survive.
    pub fn serialize(&self) -> String {
        let encoded_hostname = utf8_percent_encode(&self.hostname, PERCENT_ENCODE_SET);
        let encoded_path: String = self
            .path
            .split('/')
            .map(|segment| utf8_percent_encode(segment, PERCENT_ENCODE_SET).to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!("\x1b]7;{FILE_SCHEME}{encoded_hostname}{encoded_path}\x1b\\")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_scheme_with_percent_decoding() {
        let parsed = Osc7::parse(b"file://host/dev/null%20test").unwrap();
        assert_eq!(parsed.hostname, "host");
        assert_eq!(parsed.path, "/dev/null test");
    }

    #[test]
    fn parses_kitty_scheme_without_decoding() {
        let parsed = Osc7::parse(b"kitty-shell-cwd://host/dev/null%20test").unwrap();
        assert_eq!(parsed.hostname, "host");
        assert_eq!(parsed.path, "/dev/null%20test");
    }

    #[test]
    fn missing_third_slash_fails_to_parse() {
        assert!(Osc7::parse(b"file://host-without-path").is_none());
    }

    #[test]
    fn unknown_scheme_fails_to_parse() {
        assert!(Osc7::parse(b"ftp://host/path").is_none());
    }

    #[test]
    fn round_trips_with_space_in_path() {
        let osc = Osc7 {
            hostname: "host".to_string(),
            path: "/dev/null test".to_string(),
        };
        let serialized = osc.serialize();
        assert_eq!(serialized, "\x1b]7;file://host/dev/null%20test\x1b\\");

        let inner = &serialized[4..serialized.len() - 2];
        assert_eq!(Osc7::parse(inner.as_bytes()).as_ref(), Some(&osc));
    }

    #[test]
    fn empty_hostname_still_requires_third_slash() {
        let parsed = Osc7::parse(b"file:///root").unwrap();
        assert_eq!(parsed.hostname, "");
        assert_eq!(parsed.path, "/root");
    }
}
