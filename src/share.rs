//! Share codec — a word list as one compact URL-safe string.
//!
//! Words are joined with newlines and base64-encoded (URL-safe alphabet, no
//! padding) so a whole piece fits in a link or a clipboard. The scheduler
//! knows nothing about this format.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::fmt;
use std::string::FromUtf8Error;

/// Decoding failures.
#[derive(Debug)]
pub enum ShareError {
    /// The string is not valid base64.
    Encoding(base64::DecodeError),
    /// The decoded bytes are not UTF-8.
    Text(FromUtf8Error),
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareError::Encoding(e) => write!(f, "invalid share code: {e}"),
            ShareError::Text(e) => write!(f, "share code is not text: {e}"),
        }
    }
}

impl std::error::Error for ShareError {}

impl From<base64::DecodeError> for ShareError {
    fn from(e: base64::DecodeError) -> Self {
        ShareError::Encoding(e)
    }
}

impl From<FromUtf8Error> for ShareError {
    fn from(e: FromUtf8Error) -> Self {
        ShareError::Text(e)
    }
}

/// Encode a word list as a share code.
pub fn encode(words: &[String]) -> String {
    URL_SAFE_NO_PAD.encode(words.join("\n"))
}

/// Decode a share code back into its word list.
pub fn decode(code: &str) -> Result<Vec<String>, ShareError> {
    let bytes = URL_SAFE_NO_PAD.decode(code.trim())?;
    let text = String::from_utf8(bytes)?;
    if text.is_empty() {
        return Ok(Vec::new());
    }
    Ok(text.split('\n').map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn round_trip_simple() {
        let original = words(&["hello", "world"]);
        assert_eq!(decode(&encode(&original)).unwrap(), original);
    }

    #[test]
    fn round_trip_unicode_and_punctuation() {
        let original = words(&["héllo!", "wörld?", "3a5b"]);
        assert_eq!(decode(&encode(&original)).unwrap(), original);
    }

    #[test]
    fn round_trip_empty_word_in_list() {
        let original = words(&["", "a", ""]);
        assert_eq!(decode(&encode(&original)).unwrap(), original);
    }

    #[test]
    fn empty_list_round_trips() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn codes_are_url_safe() {
        let code = encode(&words(&["???///+++", "a b c"]));
        assert!(code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn surrounding_whitespace_tolerated() {
        let code = encode(&words(&["drift"]));
        assert_eq!(decode(&format!("  {code}\n")).unwrap(), words(&["drift"]));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode("!!!not-base64!!!").is_err());
    }
}
