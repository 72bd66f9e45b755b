use std::ops::Range;

use crate::syntax_kind::SyntaxKind;

/// The value of a constant expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    UInt(u32),
    ULong(u64),
    Float(f32),
    Double(f64),
    Char(char),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LiteralError {
    pub message: String,
    /// Byte range within the provided literal text (not file offsets).
    pub span: Range<usize>,
}

fn err(message: impl Into<String>, span: Range<usize>) -> LiteralError {
    LiteralError {
        message: message.into(),
        span,
    }
}

/// Decode the text of a constant token.
pub(crate) fn parse_constant(kind: SyntaxKind, text: &str) -> Result<ConstantValue, LiteralError> {
    match kind {
        SyntaxKind::NullKw => Ok(ConstantValue::Null),
        SyntaxKind::TrueKw => Ok(ConstantValue::Boolean(true)),
        SyntaxKind::FalseKw => Ok(ConstantValue::Boolean(false)),
        SyntaxKind::IntegerLiteral => parse_integer_literal(text),
        SyntaxKind::FloatLiteral => parse_float_literal(text),
        SyntaxKind::CharacterLiteral => parse_character_literal(text).map(ConstantValue::Char),
        _ => Err(err(
            format!("Unsupported literal kind: {kind:?}"),
            0..text.len(),
        )),
    }
}

/// Decimal, `0x` and `0b` integers with `_` separators and `L`, `u`/`U`,
/// `uL` suffixes. Unsuffixed literals that do not fit `Int` widen to `Long`.
pub fn parse_integer_literal(text: &str) -> Result<ConstantValue, LiteralError> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return Err(err("Empty integer literal", 0..0));
    }

    let mut end = bytes.len();
    let mut long = false;
    let mut unsigned = false;
    if matches!(bytes[end - 1], b'l' | b'L') {
        if bytes[end - 1] == b'l' {
            return Err(err("Use `L` instead of `l`", end - 1..end));
        }
        long = true;
        end -= 1;
    }
    if end > 0 && matches!(bytes[end - 1], b'u' | b'U') {
        unsigned = true;
        end -= 1;
    }
    if end == 0 {
        return Err(err("Integer literal is missing digits", 0..text.len()));
    }

    let (base, prefix_len) = integer_base(bytes, end)?;
    let value = parse_unsigned_integer(bytes, prefix_len, end, base)?;
    let out_of_range = || err("Integer literal is out of range", 0..text.len());

    match (unsigned, long) {
        (true, true) => Ok(ConstantValue::ULong(value)),
        (true, false) => Ok(match u32::try_from(value) {
            Ok(v) => ConstantValue::UInt(v),
            Err(_) => ConstantValue::ULong(value),
        }),
        (false, true) => i64::try_from(value)
            .map(ConstantValue::Long)
            .map_err(|_| out_of_range()),
        (false, false) => match i32::try_from(value) {
            Ok(v) => Ok(ConstantValue::Int(v)),
            Err(_) => i64::try_from(value)
                .map(ConstantValue::Long)
                .map_err(|_| out_of_range()),
        },
    }
}

fn integer_base(bytes: &[u8], end: usize) -> Result<(u32, usize), LiteralError> {
    if bytes[0] != b'0' || end == 1 {
        return Ok((10, 0));
    }
    match bytes[1] {
        b'x' | b'X' => Ok((16, 2)),
        b'b' | b'B' => Ok((2, 2)),
        _ => Err(err("Leading zeros are not allowed", 0..end)),
    }
}

fn parse_unsigned_integer(
    bytes: &[u8],
    prefix_len: usize,
    end: usize,
    base: u32,
) -> Result<u64, LiteralError> {
    if end == prefix_len {
        return Err(err("Missing digits after base prefix", prefix_len..prefix_len));
    }
    if bytes[end - 1] == b'_' {
        return Err(err(
            "Trailing underscore is not allowed in numeric literal",
            end - 1..end,
        ));
    }
    if bytes[prefix_len] == b'_' {
        return Err(err(
            "Underscore is not allowed immediately after base prefix",
            prefix_len..prefix_len + 1,
        ));
    }

    let mut value: u64 = 0;
    for (idx, &b) in bytes[..end].iter().enumerate().skip(prefix_len) {
        if b == b'_' {
            continue;
        }
        let digit = (b as char).to_digit(base).ok_or_else(|| {
            err(
                format!("Invalid digit `{}` in base-{base} literal", b as char),
                idx..idx + 1,
            )
        })?;
        value = value
            .checked_mul(base as u64)
            .and_then(|v| v.checked_add(digit as u64))
            .ok_or_else(|| err("Integer literal is too large", 0..end))?;
    }
    Ok(value)
}

/// `1.5`, `.5`, `1e10`, `2.5f`. A `f`/`F` suffix makes a `Float`, anything
/// else is a `Double`.
pub fn parse_float_literal(text: &str) -> Result<ConstantValue, LiteralError> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return Err(err("Empty floating literal", 0..0));
    }

    let is_float = matches!(bytes[bytes.len() - 1], b'f' | b'F');
    let main_end = if is_float { bytes.len() - 1 } else { bytes.len() };
    let main = &text[..main_end];
    if main.is_empty() {
        return Err(err("Missing digits", 0..text.len()));
    }

    let mut cleaned = String::with_capacity(main.len());
    let mut prev = b'.';
    for (idx, &b) in main.as_bytes().iter().enumerate() {
        if b == b'_' {
            let next = main.as_bytes().get(idx + 1).copied().unwrap_or(b'.');
            if !prev.is_ascii_digit() || !(next.is_ascii_digit() || next == b'_') {
                return Err(err(
                    "Underscore must be placed between digits",
                    idx..idx + 1,
                ));
            }
        } else if b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-') {
            cleaned.push(b as char);
        } else {
            return Err(err(
                format!("Invalid character `{}` in floating literal", b as char),
                idx..idx + 1,
            ));
        }
        prev = b;
    }

    let invalid = || err("Malformed floating literal", 0..text.len());
    if is_float {
        cleaned
            .parse::<f32>()
            .map(ConstantValue::Float)
            .map_err(|_| invalid())
    } else {
        cleaned
            .parse::<f64>()
            .map(ConstantValue::Double)
            .map_err(|_| invalid())
    }
}

/// `'a'`, `'\n'`, `'A'`.
pub fn parse_character_literal(text: &str) -> Result<char, LiteralError> {
    let inner = text
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .ok_or_else(|| err("Unterminated character literal", 0..text.len()))?;
    if inner.is_empty() {
        return Err(err("Empty character literal", 0..text.len()));
    }

    if inner.starts_with('\\') {
        return unescape_sequence(inner).map_err(|e| LiteralError {
            message: e.message,
            span: e.span.start + 1..e.span.end + 1,
        });
    }

    let mut chars = inner.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(err("Too many characters in a character literal", 0..text.len())),
    }
}

/// Decode a single escape sequence (`\n`, `\$`, `\uXXXX`).
pub fn unescape_sequence(text: &str) -> Result<char, LiteralError> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'\\') || bytes.len() < 2 {
        return Err(err("Expected an escape sequence", 0..text.len()));
    }

    let simple = match bytes[1] {
        b't' => Some('\t'),
        b'b' => Some('\u{8}'),
        b'n' => Some('\n'),
        b'r' => Some('\r'),
        b'\'' => Some('\''),
        b'"' => Some('"'),
        b'\\' => Some('\\'),
        b'$' => Some('$'),
        _ => None,
    };
    if let Some(c) = simple {
        if bytes.len() != 2 {
            return Err(err("Unexpected characters after escape", 2..text.len()));
        }
        return Ok(c);
    }

    if bytes[1] != b'u' {
        return Err(err(
            format!("Illegal escape: `{}`", &text[..2.min(text.len())]),
            0..2,
        ));
    }
    let hex = &text[2..];
    if hex.len() != 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(err("Unicode escape requires four hex digits", 0..text.len()));
    }
    let code = u32::from_str_radix(hex, 16)
        .map_err(|_| err("Unicode escape requires four hex digits", 0..text.len()))?;
    char::from_u32(code).ok_or_else(|| err("Unicode escape is not a valid scalar value", 0..text.len()))
}
