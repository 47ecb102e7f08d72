//! Value decoding for literal tokens.
//!
//! Every function returns `None` when the text does not denote a value; the
//! parser turns that into a malformed-literal error.

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{One, Signed, Zero, pow};

/// Largest decimal (or binary, for hex floats) exponent accepted.
const MAX_EXPONENT: usize = 1 << 16;

/// Digits after the point when printing rationals.
const PRINT_PRECISION: usize = 20;

fn strip_underscores(text: &str) -> String {
    text.chars().filter(|&c| c != '_').collect()
}

/// `0x`, `0o`, `0b`, legacy `0...` octal and decimal integers.
pub fn int_value(text: &str) -> Option<BigInt> {
    let s = strip_underscores(text);
    let b = s.as_bytes();
    let (digits, radix) = match b {
        [b'0', b'x' | b'X', rest @ ..] => (rest, 16),
        [b'0', b'o' | b'O', rest @ ..] => (rest, 8),
        [b'0', b'b' | b'B', rest @ ..] => (rest, 2),
        [b'0', rest @ ..] if !rest.is_empty() => (rest, 8),
        _ => (b, 10),
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_alphanumeric) {
        return None;
    }
    BigUint::parse_bytes(digits, radix).map(BigInt::from)
}

fn ten_pow(exp: usize) -> BigInt {
    pow(BigInt::from(10u8), exp)
}

/// `mantissa / denom * base^exp`
fn scale(mantissa: BigInt, denom: BigInt, base: u8, exp: i64) -> Option<BigRational> {
    if exp.unsigned_abs() > MAX_EXPONENT as u64 {
        return None;
    }
    let mut numer = mantissa;
    let mut denom = denom;
    let factor = pow(BigInt::from(base), exp.unsigned_abs() as usize);
    if exp >= 0 {
        numer *= factor;
    } else {
        denom *= factor;
    }
    Some(BigRational::new(numer, denom))
}

fn split_exponent(s: &str, markers: [char; 2]) -> Option<(&str, i64)> {
    match s.find(markers) {
        Some(at) => {
            let exp = s[at + 1..].parse::<i64>().ok()?;
            Some((&s[..at], exp))
        }
        None => Some((s, 0)),
    }
}

fn mantissa(m: &str, radix: u32) -> Option<(BigInt, usize)> {
    let (int, frac) = m.split_once('.').unwrap_or((m, ""));
    if int.is_empty() && frac.is_empty() {
        return None;
    }
    let digits: String = [int, frac].concat();
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let value = if digits.is_empty() {
        BigInt::zero()
    } else {
        BigInt::parse_bytes(digits.as_bytes(), radix)?
    };
    Some((value, frac.len()))
}

/// Decimal floats (`1.5e3`, `.5`, `1.`) and hexadecimal floats (`0x1p-2`).
pub fn float_value(text: &str) -> Option<BigRational> {
    let s = strip_underscores(text);
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        let (m, exp) = split_exponent(hex, ['p', 'P'])?;
        if !hex.contains(['p', 'P']) {
            return None;
        }
        let (value, frac) = mantissa(m, 16)?;
        return scale(value, pow(BigInt::from(16u8), frac), 2, exp);
    }
    let (m, exp) = split_exponent(&s, ['e', 'E'])?;
    let (value, frac) = mantissa(m, 10)?;
    scale(value, ten_pow(frac), 10, exp)
}

/// Imaginary literals: the value of the text before the trailing `i`.
///
/// Integer-looking forms are decimal regardless of a leading zero, except
/// for explicit `0x`, `0o` and `0b` prefixes.
pub fn imag_value(text: &str) -> Option<BigRational> {
    let body = text.strip_suffix('i')?;
    let b = body.as_bytes();
    let prefixed = b.len() > 1 && b[0] == b'0' && matches!(b[1], b'x' | b'X' | b'o' | b'O' | b'b' | b'B');
    let hex_float = prefixed && matches!(b[1], b'x' | b'X') && body.contains(['p', 'P', '.']);
    if prefixed && !hex_float {
        return int_value(body).map(BigRational::from_integer);
    }
    float_value(body)
}

/// One decoded escape.
enum Escaped {
    /// `\x` and octal escapes denote raw bytes.
    Byte(u8),
    Char(char),
}

/// Decodes the escape at the start of `s` (which begins with `\`) and
/// returns it with the number of bytes consumed.
fn unescape(s: &str, quote: char) -> Option<(Escaped, usize)> {
    let mut chars = s.chars();
    chars.next()?;
    let c = chars.next()?;
    let simple = match c {
        'a' => Some('\u{7}'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{b}'),
        '\\' => Some('\\'),
        c if c == quote => Some(c),
        _ => None,
    };
    if let Some(ch) = simple {
        return Some((Escaped::Char(ch), 2));
    }
    let (digits, radix) = match c {
        '0'..='7' => (3, 8),
        'x' => (2, 16),
        'u' => (4, 16),
        'U' => (8, 16),
        _ => return None,
    };
    let start = if radix == 8 { 1 } else { 2 };
    let body = s.get(start..start + digits)?;
    let value = u32::from_str_radix(body, radix).ok()?;
    let escaped = match c {
        '0'..='7' => Escaped::Byte(u8::try_from(value).ok()?),
        'x' => Escaped::Byte(value as u8),
        _ => Escaped::Char(char::from_u32(value)?),
    };
    Some((escaped, start + digits))
}

/// `'x'` style literals.
pub fn rune_value(text: &str) -> Option<char> {
    let body = text.strip_prefix('\'')?.strip_suffix('\'')?;
    if body.starts_with('\\') {
        let (escaped, used) = unescape(body, '\'')?;
        if used != body.len() {
            return None;
        }
        return Some(match escaped {
            Escaped::Byte(b) => char::from(b),
            Escaped::Char(c) => c,
        });
    }
    let mut chars = body.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// Interpreted (`"..."`) and raw (`` `...` ``) strings.
///
/// Raw strings drop carriage returns.
pub fn string_value(text: &str) -> Option<Vec<u8>> {
    if let Some(raw) = text.strip_prefix('`') {
        let raw = raw.strip_suffix('`')?;
        return Some(raw.bytes().filter(|&b| b != b'\r').collect());
    }
    let mut rest = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = Vec::with_capacity(rest.len());
    while let Some(at) = rest.find('\\') {
        out.extend_from_slice(&rest.as_bytes()[..at]);
        let (escaped, used) = unescape(&rest[at..], '"')?;
        match escaped {
            Escaped::Byte(b) => out.push(b),
            Escaped::Char(c) => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
        rest = &rest[at + used..];
    }
    out.extend_from_slice(rest.as_bytes());
    Some(out)
}

/// Decimal rendering with up to twenty fractional digits, rounded to
/// nearest, trailing zeros trimmed and at least one digit after the point.
pub fn format_rational(r: &BigRational) -> String {
    let negative = r.is_negative();
    let abs = r.abs();
    let scale = ten_pow(PRINT_PRECISION);
    let scaled = abs.numer() * &scale;
    let denom = abs.denom();
    let mut q = &scaled / denom;
    let rem = &scaled % denom;
    if rem * 2u8 >= *denom {
        q += BigInt::one();
    }
    let int = &q / &scale;
    let frac = (&q % &scale).to_string();
    let mut frac = format!("{frac:0>width$}", width = PRINT_PRECISION);
    while frac.len() > 1 && frac.ends_with('0') {
        frac.pop();
    }
    let sign = if negative && !q.is_zero() { "-" } else { "" };
    format!("{sign}{int}.{frac}")
}
