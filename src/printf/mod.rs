//! printf-style rendering over type-erased arguments
//!
//! Renders C printf templates against a borrowed `&[Arg]` slice into any
//! `fmt::Write` sink. The slice is never consumed, so a template can be
//! rendered any number of times with the same arguments (the bridge renders
//! twice: once to measure, once into the message buffer).
//!
//! # Example
//!
//! ```
//! use libinput_log_bridge::printf::{sprintf, Arg};
//!
//! let text = sprintf("%s: %d%%", &[Arg::from("battery"), Arg::from(87)]).unwrap();
//! assert_eq!(text, "battery: 87%");
//! ```
//!
//! Widths and precisions count bytes, as in C, and are limited to `INT_MAX`.
//! Length modifiers other than `hh` and `h` are accepted and ignored:
//! integers are always 64-bit here.

mod directive;
mod number;

use crate::constants::MAX_COUNT;
use directive::{Count, Directive, Flags, Length, Piece, Pieces};
use std::fmt;

/// One printf argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(&'a str),
    Ptr(usize),
}

impl Arg<'_> {
    /// Pointer argument for `%p`
    pub fn ptr<T>(ptr: *const T) -> Self {
        Arg::Ptr(ptr as usize)
    }
}

macro_rules! arg_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Arg<'_> {
                fn from(value: $source) -> Self {
                    Arg::$variant(value as $target)
                }
            }
        )*
    };
}

arg_from!(Int as i64: i8, i16, i32, i64, isize);
arg_from!(Uint as u64: u8, u16, u32, u64, usize);
arg_from!(Float as f64: f32, f64);

impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(value)
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Arg::Str(value.as_str())
    }
}

/// Why a template could not be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A directive needs an argument past the end of the slice
    MissingArgument { index: usize },
    /// The argument at `index` cannot be used with `conversion`
    ArgumentMismatch { index: usize, conversion: char },
    /// Conversion not supported (`%n`, `%a`, positional `%1$`...)
    UnsupportedConversion(char),
    /// Template ends in the middle of a directive
    Truncated,
    /// Width or precision above `INT_MAX`
    Overflow,
    /// The output sink refused a write
    Format,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument { index } => write!(f, "Missing argument #{}", index),
            Self::ArgumentMismatch { index, conversion } => {
                write!(f, "Argument #{} does not fit %{}", index, conversion)
            }
            Self::UnsupportedConversion(c) => write!(f, "Unsupported conversion %{}", c),
            Self::Truncated => write!(f, "Template ends inside a directive"),
            Self::Overflow => write!(f, "Width or precision out of range"),
            Self::Format => write!(f, "Output sink failed"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<fmt::Error> for RenderError {
    fn from(_: fmt::Error) -> Self {
        Self::Format
    }
}

/// A template with its arguments, renderable repeatedly
#[derive(Debug, Clone, Copy)]
pub struct Printf<'t, 'a> {
    pub template: &'t str,
    pub args: &'t [Arg<'a>],
}

impl<'t, 'a> Printf<'t, 'a> {
    pub fn new(template: &'t str, args: &'t [Arg<'a>]) -> Self {
        Self { template, args }
    }

    /// Render into `out`
    pub fn render_to<W: fmt::Write + ?Sized>(&self, out: &mut W) -> Result<(), RenderError> {
        render(self.template, self.args, out)
    }
}

/// Render `template` with `args` into a new `String`
pub fn sprintf(template: &str, args: &[Arg<'_>]) -> Result<String, RenderError> {
    let mut out = String::new();
    render(template, args, &mut out)?;
    Ok(out)
}

/// Render `template` with `args` into `out`
///
/// Output written before an error is left in `out`.
pub fn render<W: fmt::Write + ?Sized>(
    template: &str,
    args: &[Arg<'_>],
    out: &mut W,
) -> Result<(), RenderError> {
    let mut cursor = ArgCursor { args, index: 0 };

    for piece in Pieces::new(template) {
        match piece? {
            Piece::Literal(text) => out.write_str(text)?,
            Piece::Percent => out.write_char('%')?,
            Piece::Directive(directive) => write_directive(&directive, &mut cursor, out)?,
        }
    }
    Ok(())
}

/// Sequential reader over the argument slice
struct ArgCursor<'s, 'a> {
    args: &'s [Arg<'a>],
    index: usize,
}

impl<'s, 'a> ArgCursor<'s, 'a> {
    fn next(&mut self) -> Result<(usize, Arg<'a>), RenderError> {
        let index = self.index;
        let arg = self
            .args
            .get(index)
            .copied()
            .ok_or(RenderError::MissingArgument { index })?;
        self.index += 1;
        Ok((index, arg))
    }

    /// `*` width or precision
    fn count(&mut self) -> Result<i64, RenderError> {
        match self.next()? {
            (_, Arg::Int(v)) => Ok(v),
            (_, Arg::Uint(v)) => Ok(i64::try_from(v).unwrap_or(i64::MAX)),
            (index, _) => Err(RenderError::ArgumentMismatch {
                index,
                conversion: '*',
            }),
        }
    }
}

/// Magnitude of a `*` count, bounded like a literal one
fn star_count(value: i64) -> Result<usize, RenderError> {
    usize::try_from(value.unsigned_abs())
        .ok()
        .filter(|&count| count <= MAX_COUNT)
        .ok_or(RenderError::Overflow)
}

fn write_directive<W: fmt::Write + ?Sized>(
    directive: &Directive,
    cursor: &mut ArgCursor<'_, '_>,
    out: &mut W,
) -> Result<(), RenderError> {
    let mut flags = directive.flags;

    let width = match directive.width {
        Some(Count::Fixed(w)) => w,
        Some(Count::FromArg) => {
            let w = cursor.count()?;
            if w < 0 {
                flags.left = true;
            }
            star_count(w)?
        }
        None => 0,
    };

    let precision = match directive.precision {
        Some(Count::Fixed(p)) => Some(p),
        Some(Count::FromArg) => {
            let p = cursor.count()?;
            if p < 0 {
                None
            } else {
                Some(star_count(p)?)
            }
        }
        None => None,
    };

    let conversion = directive.conversion;
    let (index, arg) = cursor.next()?;
    let mismatch = RenderError::ArgumentMismatch { index, conversion };

    match conversion {
        'd' | 'i' => {
            let value = match arg {
                Arg::Int(v) => v,
                Arg::Uint(v) => v as i64,
                _ => return Err(mismatch),
            };
            let value = match directive.length {
                Length::Char => i64::from(value as i8),
                Length::Short => i64::from(value as i16),
                _ => value,
            };
            pad(out, number::signed(value, flags, precision), width, flags)
        }
        'u' | 'o' | 'x' | 'X' => {
            let value = match arg {
                Arg::Uint(v) => v,
                Arg::Int(v) => v as u64,
                _ => return Err(mismatch),
            };
            let value = match directive.length {
                Length::Char => u64::from(value as u8),
                Length::Short => u64::from(value as u16),
                _ => value,
            };
            pad(
                out,
                number::unsigned(value, conversion, flags, precision),
                width,
                flags,
            )
        }
        'f' | 'F' | 'e' | 'E' | 'g' | 'G' => {
            let Arg::Float(value) = arg else {
                return Err(mismatch);
            };
            pad(
                out,
                number::float(value, conversion, flags, precision),
                width,
                flags,
            )
        }
        'c' => {
            let c = match arg {
                Arg::Char(c) => c,
                Arg::Int(v) => char::from(v as u8),
                Arg::Uint(v) => char::from(v as u8),
                _ => return Err(mismatch),
            };
            let mut buf = [0u8; 4];
            pad_text(out, c.encode_utf8(&mut buf), width, flags.left)
        }
        's' => {
            let Arg::Str(s) = arg else {
                return Err(mismatch);
            };
            pad_text(out, truncate_bytes(s, precision), width, flags.left)
        }
        'p' => {
            let value = match arg {
                Arg::Ptr(p) => p as u64,
                Arg::Uint(v) => v,
                _ => return Err(mismatch),
            };
            if value == 0 {
                pad_text(out, "(nil)", width, flags.left)
            } else {
                pad_text(out, &format!("0x{:x}", value), width, flags.left)
            }
        }
        other => Err(RenderError::UnsupportedConversion(other)),
    }
}

/// Cut `s` to at most `precision` bytes without splitting a character
fn truncate_bytes(s: &str, precision: Option<usize>) -> &str {
    let Some(limit) = precision else {
        return s;
    };
    if s.len() <= limit {
        return s;
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

const SPACES: &str = "                                                                ";
const ZEROS: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Write `count` bytes of padding, `run` at a time
fn write_fill<W: fmt::Write + ?Sized>(out: &mut W, run: &str, count: usize) -> fmt::Result {
    let mut left = count;
    while left > 0 {
        let n = left.min(run.len());
        out.write_str(&run[..n])?;
        left -= n;
    }
    Ok(())
}

fn pad_text<W: fmt::Write + ?Sized>(
    out: &mut W,
    text: &str,
    width: usize,
    left: bool,
) -> Result<(), RenderError> {
    let fill = width.saturating_sub(text.len());
    if left {
        out.write_str(text)?;
        write_fill(out, SPACES, fill)?;
    } else {
        write_fill(out, SPACES, fill)?;
        out.write_str(text)?;
    }
    Ok(())
}

fn pad<W: fmt::Write + ?Sized>(
    out: &mut W,
    value: number::Formatted,
    width: usize,
    flags: Flags,
) -> Result<(), RenderError> {
    let fill = width.saturating_sub(value.len());

    if flags.left {
        out.write_str(value.sign)?;
        out.write_str(value.prefix)?;
        write_body(out, &value)?;
        write_fill(out, SPACES, fill)?;
    } else if flags.zero && value.zero_pad {
        out.write_str(value.sign)?;
        out.write_str(value.prefix)?;
        write_fill(out, ZEROS, fill)?;
        write_body(out, &value)?;
    } else {
        write_fill(out, SPACES, fill)?;
        out.write_str(value.sign)?;
        out.write_str(value.prefix)?;
        write_body(out, &value)?;
    }
    Ok(())
}

/// Digits with their precision zeros and exponent
fn write_body<W: fmt::Write + ?Sized>(out: &mut W, value: &number::Formatted) -> fmt::Result {
    write_fill(out, ZEROS, value.leading_zeros)?;
    out.write_str(&value.digits)?;
    write_fill(out, ZEROS, value.trailing_zeros)?;
    out.write_str(&value.exponent)
}
