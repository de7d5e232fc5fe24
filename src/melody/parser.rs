//! Melody parser — total left-to-right scan of raw typed text.
//!
//! Digits are octave modifiers for the next non-digit character; the last
//! digit before a note wins. A newline clears any pending digit. Every input
//! character is consumed exactly once, and no input can fail to parse.

use super::token::{Token, DEFAULT_OCTAVE};

/// Parse raw text into melody tokens.
pub fn parse(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pending_octave: Option<u8> = None;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if let Some(digit) = ch.to_digit(10) {
            pending_octave = Some(digit as u8);
            if chars.peek().is_none() {
                tokens.push(Token::PendingDigit { character: ch });
            }
            continue;
        }

        if ch == '\n' {
            tokens.push(Token::LineBreak);
            pending_octave = None;
            continue;
        }

        tokens.push(Token::Note {
            character: ch,
            octave: pending_octave.take().unwrap_or(DEFAULT_OCTAVE),
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn plain_characters_use_default_octave() {
        let tokens = parse("ab");
        assert_eq!(tokens, vec![Token::note('a'), Token::note('b')]);
    }

    #[test]
    fn digit_sets_octave_for_next_note() {
        assert_eq!(
            parse("5a"),
            vec![Token::Note {
                character: 'a',
                octave: 5
            }]
        );
        assert_eq!(
            parse("3a5b"),
            vec![
                Token::Note {
                    character: 'a',
                    octave: 3
                },
                Token::Note {
                    character: 'b',
                    octave: 5
                },
            ]
        );
    }

    #[test]
    fn later_digit_overwrites_earlier() {
        assert_eq!(
            parse("12a"),
            vec![Token::Note {
                character: 'a',
                octave: 2
            }]
        );
    }

    #[test]
    fn digit_applies_to_exactly_one_note() {
        assert_eq!(
            parse("2ab"),
            vec![
                Token::Note {
                    character: 'a',
                    octave: 2
                },
                Token::note('b'),
            ]
        );
    }

    #[test]
    fn newline_emits_line_break() {
        assert_eq!(
            parse("a\nb"),
            vec![Token::note('a'), Token::LineBreak, Token::note('b')]
        );
    }

    #[test]
    fn newline_clears_pending_digit() {
        assert_eq!(
            parse("3\nb"),
            vec![Token::LineBreak, Token::note('b')]
        );
    }

    #[test]
    fn trailing_digit_becomes_pending() {
        assert_eq!(
            parse("ab3"),
            vec![
                Token::note('a'),
                Token::note('b'),
                Token::PendingDigit { character: '3' },
            ]
        );
    }

    #[test]
    fn lone_digit_is_pending() {
        assert_eq!(parse("7"), vec![Token::PendingDigit { character: '7' }]);
    }

    #[test]
    fn space_and_dot_are_notes() {
        assert_eq!(tokens_of("a ."), 3);
        assert_eq!(
            parse(" "),
            vec![Token::note(' ')]
        );
    }

    #[test]
    fn every_character_consumed_exactly_once() {
        // Digits absorb into the following token (or become PendingDigit);
        // everything else emits exactly one token.
        for input in ["", "abc", "12a", "a\n\nb", "3", "a1b2c3", "héllo wörld"] {
            let non_digit = input.chars().filter(|c| !c.is_ascii_digit()).count();
            let trailing_digit = usize::from(
                input
                    .chars()
                    .last()
                    .is_some_and(|c| c.is_ascii_digit()),
            );
            assert_eq!(
                parse(input).len(),
                non_digit + trailing_digit,
                "token count mismatch for {input:?}"
            );
        }
    }

    #[test]
    fn unicode_characters_are_notes() {
        let tokens = parse("ß");
        assert_eq!(tokens, vec![Token::note('ß')]);
    }

    fn tokens_of(input: &str) -> usize {
        parse(input).len()
    }
}
