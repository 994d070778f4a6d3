//! The pattern compiler.
//!
//! A pattern expression over `ACGTUN` with optional bracket groups is compiled into one
//! position key per matching position. The key byte encodes the accepted bases:
//!
//! * bit 0: `A`
//! * bit 1: `C`
//! * bit 2: `G`
//! * bit 3: `T` or `U`
//! * bit 4: `N`
//!
//! A bracket group like `[AT]` merges its letters into a single key, so
//! `AC[AT]` compiles to `[0x01, 0x02, 0x09]`. The `N` wildcard sets all five bits,
//! which makes an `N` position accept every input class including `N` itself.

use crate::errors::{PatternErrorKind, Result, SeqscanErrorKind};

/// A position key: the bit set of accepted bases at one matching position.
pub(crate) type PositionKey = u8;

/// The key bits of the `N` wildcard.
pub(crate) const KEY_N: PositionKey = 0x1F;

/// Compile a pattern expression into its position keys.
///
/// Returns one key per matching position. The pattern length is the length of the
/// returned vector; an empty bracket group consumes no position.
pub(crate) fn compile_pattern(expr: &str) -> Result<Vec<PositionKey>> {
    let mut keys: Vec<PositionKey> = Vec::with_capacity(expr.len());
    let mut key: PositionKey = 0;
    let mut in_brackets = false;
    let mut last = '\0';

    for c in expr.chars() {
        match c {
            'A' | 'a' => key |= 0x01,
            'C' | 'c' => key |= 0x02,
            'G' | 'g' => key |= 0x04,
            'T' | 't' | 'U' | 'u' => key |= 0x08,
            'N' | 'n' => key |= KEY_N,
            '[' => {
                if in_brackets {
                    return Err(SeqscanErrorKind::InvalidPattern(PatternErrorKind::DoubleOpen).into());
                }
                in_brackets = true;
            }
            ']' => {
                if !in_brackets {
                    return Err(
                        SeqscanErrorKind::InvalidPattern(PatternErrorKind::DoubleClose).into()
                    );
                }
                in_brackets = false;
                // An empty group consumes no position.
                if last == '[' {
                    last = c;
                    continue;
                }
            }
            _ => {
                return Err(
                    SeqscanErrorKind::InvalidPattern(PatternErrorKind::IllegalChar(c)).into(),
                );
            }
        }
        if !in_brackets && c != '[' {
            keys.push(key);
            key = 0;
        }
        last = c;
    }

    if in_brackets {
        return Err(SeqscanErrorKind::InvalidPattern(PatternErrorKind::UnclosedBracket).into());
    }

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SeqscanErrorKind;

    #[test]
    fn test_plain_pattern() {
        assert_eq!(compile_pattern("ACGT").unwrap(), vec![0x01, 0x02, 0x04, 0x08]);
        assert_eq!(compile_pattern("acgu").unwrap(), vec![0x01, 0x02, 0x04, 0x08]);
    }

    #[test]
    fn test_bracket_group() {
        assert_eq!(compile_pattern("AC[AT]").unwrap(), vec![0x01, 0x02, 0x09]);
        assert_eq!(compile_pattern("[ACGT]").unwrap(), vec![0x0F]);
    }

    #[test]
    fn test_wildcard() {
        assert_eq!(compile_pattern("N").unwrap(), vec![KEY_N]);
        assert_eq!(compile_pattern("[AN]").unwrap(), vec![KEY_N]);
    }

    #[test]
    fn test_empty_group() {
        assert_eq!(compile_pattern("A[]C").unwrap(), vec![0x01, 0x02]);
    }

    #[test]
    fn test_empty_pattern() {
        assert!(compile_pattern("").unwrap().is_empty());
    }

    #[test]
    fn test_errors() {
        for (expr, expected) in [
            ("A[[CT]", PatternErrorKind::DoubleOpen),
            ("AC]T", PatternErrorKind::DoubleClose),
            ("AXGT", PatternErrorKind::IllegalChar('X')),
            ("A[CT", PatternErrorKind::UnclosedBracket),
        ] {
            let err = compile_pattern(expr).unwrap_err();
            match err.kind() {
                SeqscanErrorKind::InvalidPattern(kind) => assert_eq!(*kind, expected),
                kind => panic!("unexpected error kind {kind} for '{expr}'"),
            }
        }
    }
}
