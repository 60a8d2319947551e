// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector text: `tag[#id | .class...][:nth-of-type(n)]` segments joined by ` > `.
//!
//! Identifiers are escaped on output so that any id or class value survives a
//! print/parse cycle unchanged.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write as _};
use core::num::NonZeroUsize;
use core::str::FromStr;

use crate::path::{Discriminator, Path, PathSegment};

/// Errors produced when parsing selector text.
///
/// Offsets are byte offsets into the input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The input was empty or all whitespace.
    #[error("empty selector")]
    Empty,
    /// A segment did not start with a tag name.
    #[error("expected a tag name at offset {offset}")]
    MissingTag {
        /// Where the tag was expected.
        offset: usize,
    },
    /// A `#` or `.` was not followed by an identifier.
    #[error("expected an identifier at offset {offset}")]
    MissingIdent {
        /// Where the identifier was expected.
        offset: usize,
    },
    /// A character that does not fit the grammar.
    #[error("unexpected {found:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// Its position.
        offset: usize,
    },
    /// A `>` with nothing after it.
    #[error("dangling combinator at offset {offset}")]
    DanglingCombinator {
        /// Position of the `>`.
        offset: usize,
    },
    /// Input ended where more was required.
    #[error("unexpected end of selector, expected {expected:?}")]
    UnexpectedEnd {
        /// What was expected.
        expected: char,
    },
    /// A backslash at the end of input.
    #[error("unterminated escape at offset {offset}")]
    UnterminatedEscape {
        /// Position of the backslash.
        offset: usize,
    },
    /// A pseudo-class other than `nth-of-type`.
    #[error("unsupported pseudo-class `{name}`")]
    UnsupportedPseudo {
        /// The pseudo-class name.
        name: String,
    },
    /// `:nth-of-type(...)` with something other than a positive integer.
    #[error("invalid sibling index at offset {offset}")]
    InvalidIndex {
        /// Where the index starts.
        offset: usize,
    },
}

impl FromStr for Path {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parse selector text into a [`Path`].
pub fn parse(input: &str) -> Result<Path, SelectorError> {
    let mut cursor = Cursor { src: input, pos: 0 };
    cursor.skip_whitespace();
    if cursor.at_end() {
        return Err(SelectorError::Empty);
    }
    let mut segments = Vec::new();
    loop {
        segments.push(cursor.segment()?);
        cursor.skip_whitespace();
        match cursor.peek() {
            None => break,
            Some('>') => {
                let offset = cursor.pos;
                cursor.bump();
                cursor.skip_whitespace();
                if cursor.at_end() {
                    return Err(SelectorError::DanglingCombinator { offset });
                }
            }
            Some(found) => {
                return Err(SelectorError::UnexpectedChar {
                    found,
                    offset: cursor.pos,
                });
            }
        }
    }
    Ok(Path::new(segments))
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.bump();
        }
    }

    fn segment(&mut self) -> Result<PathSegment, SelectorError> {
        let tag_offset = self.pos;
        let tag = self
            .ident()?
            .ok_or(SelectorError::MissingTag { offset: tag_offset })?;
        let mut segment = PathSegment {
            tag: tag.to_ascii_lowercase(),
            discriminator: Discriminator::None,
            nth_of_type: None,
        };

        match self.peek() {
            Some('#') => {
                self.bump();
                segment.discriminator = Discriminator::Id(self.required_ident()?);
            }
            Some('.') => {
                let mut classes = Vec::new();
                while self.peek() == Some('.') {
                    self.bump();
                    classes.push(self.required_ident()?);
                }
                segment.discriminator = Discriminator::Classes(classes);
            }
            _ => {}
        }

        if self.peek() == Some(':') {
            self.bump();
            segment.nth_of_type = Some(self.nth_of_type()?);
        }
        Ok(segment)
    }

    fn required_ident(&mut self) -> Result<String, SelectorError> {
        let offset = self.pos;
        self.ident()?.ok_or(SelectorError::MissingIdent { offset })
    }

    /// `name(n)` after the colon.
    fn nth_of_type(&mut self) -> Result<NonZeroUsize, SelectorError> {
        let name_offset = self.pos;
        let name = self
            .ident()?
            .ok_or(SelectorError::MissingIdent { offset: name_offset })?;
        if !name.eq_ignore_ascii_case("nth-of-type") {
            return Err(SelectorError::UnsupportedPseudo { name });
        }
        self.expect('(')?;
        self.skip_whitespace();
        let offset = self.pos;
        let digits_end = self.src[self.pos..]
            .find(|c: char| !c.is_ascii_digit())
            .map_or(self.src.len(), |i| self.pos + i);
        let n = self.src[self.pos..digits_end]
            .parse::<usize>()
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or(SelectorError::InvalidIndex { offset })?;
        self.pos = digits_end;
        self.skip_whitespace();
        self.expect(')')?;
        Ok(n)
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorError> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(found) => Err(SelectorError::UnexpectedChar {
                found,
                offset: self.pos,
            }),
            None => Err(SelectorError::UnexpectedEnd { expected: want }),
        }
    }

    /// Read an identifier, decoding escapes. `Ok(None)` if none starts here.
    fn ident(&mut self) -> Result<Option<String>, SelectorError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                let offset = self.pos;
                self.bump();
                out.push(self.escape(offset)?);
            } else if is_ident_char(c) {
                self.bump();
                out.push(c);
            } else {
                break;
            }
        }
        Ok((!out.is_empty()).then_some(out))
    }

    /// Decode the escape after a backslash at `offset`.
    fn escape(&mut self, offset: usize) -> Result<char, SelectorError> {
        let Some(first) = self.peek() else {
            return Err(SelectorError::UnterminatedEscape { offset });
        };
        if !first.is_ascii_hexdigit() {
            if first == '\n' {
                return Err(SelectorError::UnterminatedEscape { offset });
            }
            self.bump();
            return Ok(first);
        }
        let start = self.pos;
        while self.pos - start < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.bump();
        }
        let value = u32::from_str_radix(&self.src[start..self.pos], 16).unwrap_or(0);
        // A single whitespace terminates a hex escape and is not part of the ident.
        if self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.bump();
        }
        Ok(match value {
            0 => char::REPLACEMENT_CHARACTER,
            v => char::from_u32(v).unwrap_or(char::REPLACEMENT_CHARACTER),
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// Write `ident` as an escaped CSS identifier.
pub(crate) fn write_ident(f: &mut impl fmt::Write, ident: &str) -> fmt::Result {
    let mut chars = ident.chars().peekable();
    let mut index = 0_usize;
    let mut first = None;
    while let Some(c) = chars.next() {
        let leading_digit = c.is_ascii_digit() && (index == 0 || (index == 1 && first == Some('-')));
        if c == '\0' {
            f.write_char(char::REPLACEMENT_CHARACTER)?;
        } else if c.is_ascii_control() || leading_digit {
            write!(f, "\\{:x} ", u32::from(c))?;
        } else if index == 0 && c == '-' && chars.peek().is_none() {
            f.write_str("\\-")?;
        } else if is_ident_char(c) {
            f.write_char(c)?;
        } else {
            f.write_char('\\')?;
            f.write_char(c)?;
        }
        if index == 0 {
            first = Some(c);
        }
        index += 1;
    }
    Ok(())
}

/// Escape `ident` for use in selector text.
///
/// ```rust
/// assert_eq!(pickpath_path::escape_ident("a:b"), "a\\:b");
/// assert_eq!(pickpath_path::escape_ident("1st"), "\\31 st");
/// ```
pub fn escape_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    // Writing into a String cannot fail.
    let _ = write_ident(&mut out, ident);
    out
}
