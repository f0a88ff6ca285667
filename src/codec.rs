//! Hex-string ↔ byte utilities and SysEx frame assembly.
//!
//! Frame templates are written in the hardware reference manual's notation
//! ("F0h 00h 20h ..."), so the parser consumes the first two hex digits of
//! each token and ignores any trailing suffix.

use crate::error::GatewayError;

/// Parse whitespace-separated two-hex-digit tokens into bytes.
///
/// Tokens are case-insensitive; anything after the first two characters is
/// ignored. Fails with [`GatewayError::MalformedHexInput`] when a token does
/// not start with two hex digits.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, GatewayError> {
    s.split_whitespace()
        .map(|token| {
            token
                .get(..2)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| GatewayError::MalformedHexInput {
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Assemble one outgoing SysEx frame from a hex header template and a raw
/// payload.
///
/// No end-of-frame byte is appended; callers include the terminating `F7h`
/// in the header or payload themselves.
pub fn build_sysex(header: &str, payload: &[u8]) -> Result<Vec<u8>, GatewayError> {
    let mut frame = hex_to_bytes(header)?;
    frame.extend_from_slice(payload);
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suffixed_tokens() {
        let bytes = hex_to_bytes("F0h 00h 20h 29h F7h").unwrap();
        assert_eq!(bytes, vec![0xF0, 0x00, 0x20, 0x29, 0xF7]);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(hex_to_bytes("f0 Ab 7f").unwrap(), vec![0xF0, 0xAB, 0x7F]);
    }

    #[test]
    fn test_only_first_two_digits_are_consumed() {
        // "123" is the token 0x12 with a stray suffix
        assert_eq!(hex_to_bytes("123").unwrap(), vec![0x12]);
    }

    #[test]
    fn test_bad_token_is_rejected() {
        assert!(matches!(
            hex_to_bytes("F0 GG"),
            Err(GatewayError::MalformedHexInput { token }) if token == "GG"
        ));
    }

    #[test]
    fn test_single_digit_token_is_rejected() {
        assert!(hex_to_bytes("F").is_err());
    }

    #[test]
    fn test_build_sysex_concatenates() {
        let frame = build_sysex("F0h 00h", &[0x01, 0xF7]).unwrap();
        assert_eq!(frame, vec![0xF0, 0x00, 0x01, 0xF7]);
    }

    #[test]
    fn test_build_sysex_empty_payload() {
        let frame = build_sysex("F0h F7h", &[]).unwrap();
        assert_eq!(frame, vec![0xF0, 0xF7]);
    }
}
