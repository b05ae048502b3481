//! printf template tokenizer
//!
//! Splits a template into literal runs and conversion directives.
//! Grammar: `%[flags][width][.precision][length]conversion`

use super::RenderError;
use crate::constants::MAX_COUNT;

/// Directive flags (`- + space # 0`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flags {
    pub left: bool,
    pub plus: bool,
    pub space: bool,
    pub alt: bool,
    pub zero: bool,
}

/// Width or precision: literal digits or `*`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Count {
    Fixed(usize),
    FromArg,
}

/// Length modifier
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Length {
    #[default]
    Default,
    /// `hh`
    Char,
    /// `h`
    Short,
    /// `l`, `ll`, `q`, `j`, `z`, `t`, `L`
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Directive {
    pub flags: Flags,
    pub width: Option<Count>,
    pub precision: Option<Count>,
    pub length: Length,
    pub conversion: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece<'t> {
    Literal(&'t str),
    Percent,
    Directive(Directive),
}

const CONVERSIONS: &str = "diuoxXcspfFeEgG";

/// Iterator over the pieces of a template
///
/// Stops after the first error.
pub(crate) struct Pieces<'t> {
    rest: &'t str,
    failed: bool,
}

impl<'t> Pieces<'t> {
    pub fn new(template: &'t str) -> Self {
        Self {
            rest: template,
            failed: false,
        }
    }

    fn literal(&mut self) -> Piece<'t> {
        let end = self.rest.find('%').unwrap_or(self.rest.len());
        let (text, rest) = self.rest.split_at(end);
        self.rest = rest;
        Piece::Literal(text)
    }

    /// Parse a directive; `self.rest` starts just after the '%'
    fn directive(&mut self) -> Result<Piece<'t>, RenderError> {
        let bytes = self.rest.as_bytes();
        let mut pos = 0;

        if bytes.first() == Some(&b'%') {
            self.rest = &self.rest[1..];
            return Ok(Piece::Percent);
        }

        let mut flags = Flags::default();
        while let Some(&b) = bytes.get(pos) {
            match b {
                b'-' => flags.left = true,
                b'+' => flags.plus = true,
                b' ' => flags.space = true,
                b'#' => flags.alt = true,
                b'0' => flags.zero = true,
                _ => break,
            }
            pos += 1;
        }

        let width = parse_count(bytes, &mut pos)?;
        if bytes.get(pos) == Some(&b'$') {
            return Err(RenderError::UnsupportedConversion('$'));
        }

        let precision = if bytes.get(pos) == Some(&b'.') {
            pos += 1;
            Some(parse_count(bytes, &mut pos)?.unwrap_or(Count::Fixed(0)))
        } else {
            None
        };

        let length = match (bytes.get(pos), bytes.get(pos + 1)) {
            (Some(b'h'), Some(b'h')) => {
                pos += 2;
                Length::Char
            }
            (Some(b'h'), _) => {
                pos += 1;
                Length::Short
            }
            (Some(b'l'), Some(b'l')) => {
                pos += 2;
                Length::Wide
            }
            (Some(b'l' | b'q' | b'j' | b'z' | b't' | b'L'), _) => {
                pos += 1;
                Length::Wide
            }
            _ => Length::Default,
        };

        let Some(conversion) = self.rest[pos..].chars().next() else {
            return Err(RenderError::Truncated);
        };
        if !CONVERSIONS.contains(conversion) {
            return Err(RenderError::UnsupportedConversion(conversion));
        }

        self.rest = &self.rest[pos + conversion.len_utf8()..];
        Ok(Piece::Directive(Directive {
            flags,
            width,
            precision,
            length,
            conversion,
        }))
    }
}

/// Digits or `*`; literal counts above `MAX_COUNT` are an overflow
fn parse_count(bytes: &[u8], pos: &mut usize) -> Result<Option<Count>, RenderError> {
    if bytes.get(*pos) == Some(&b'*') {
        *pos += 1;
        return Ok(Some(Count::FromArg));
    }

    let start = *pos;
    let mut value: usize = 0;
    while let Some(&b) = bytes.get(*pos) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.saturating_mul(10).saturating_add(usize::from(b - b'0'));
        if value > MAX_COUNT {
            return Err(RenderError::Overflow);
        }
        *pos += 1;
    }
    Ok((*pos > start).then_some(Count::Fixed(value)))
}

impl<'t> Iterator for Pieces<'t> {
    type Item = Result<Piece<'t>, RenderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }

        if let Some(rest) = self.rest.strip_prefix('%') {
            self.rest = rest;
            let piece = self.directive();
            self.failed = piece.is_err();
            Some(piece)
        } else {
            Some(Ok(self.literal()))
        }
    }
}
