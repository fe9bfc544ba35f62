//! PostgreSQL binary values rendered as the server's text output.
//!
//! Statements run without parameters use the simple protocol and come back in
//! text format; parameterized statements come back in binary format. Types
//! with no scalar counterpart (numeric, interval, inet, arrays, ...) are
//! rendered here so both paths produce the same string.
//!
//! Output follows the server defaults sqlx connects with (`DateStyle` ISO,
//! `IntervalStyle` postgres, `TimeZone` UTC).

use chrono::{Days, NaiveDate};
use std::fmt::{Display, LowerExp};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Render a binary-format value of the named type. `None` when the type is
/// not understood or the bytes are malformed.
pub fn render(type_name: &str, buf: &[u8]) -> Option<String> {
    let name = type_name.to_ascii_uppercase();
    // User-defined array types may be reported by catalog name (`_mood`)
    match name.strip_suffix("[]").or_else(|| name.strip_prefix('_')) {
        Some(element) => array(element, buf),
        None => scalar(&name, buf),
    }
}

fn scalar(name: &str, buf: &[u8]) -> Option<String> {
    match name {
        "BOOL" => match buf {
            [0] => Some("f".to_string()),
            [1] => Some("t".to_string()),
            _ => None,
        },
        "INT2" => Some(i16::from_be_bytes(fixed(buf)?).to_string()),
        "INT4" => Some(i32::from_be_bytes(fixed(buf)?).to_string()),
        "INT8" => Some(i64::from_be_bytes(fixed(buf)?).to_string()),
        "OID" => Some(u32::from_be_bytes(fixed(buf)?).to_string()),
        "FLOAT4" => Some(float(f32::from_be_bytes(fixed(buf)?), 6)),
        "FLOAT8" => Some(float(f64::from_be_bytes(fixed(buf)?), 15)),
        "NUMERIC" => numeric(buf),
        "MONEY" => Some(money(i64::from_be_bytes(fixed(buf)?))),
        "UUID" => uuid::Uuid::from_slice(buf).ok().map(|u| u.to_string()),
        "INET" => inet(buf, false),
        "CIDR" => inet(buf, true),
        "INTERVAL" => interval(buf),
        "DATE" => date(i32::from_be_bytes(fixed(buf)?)),
        "TIME" => Some(clock(u64::try_from(i64::from_be_bytes(fixed(buf)?)).ok()?)),
        "TIMETZ" => timetz(buf),
        "TIMESTAMP" => timestamp(i64::from_be_bytes(fixed(buf)?)),
        "TIMESTAMPTZ" => timestamp(i64::from_be_bytes(fixed(buf)?)).map(|ts| {
            if ts.ends_with("infinity") {
                ts
            } else {
                ts + "+00"
            }
        }),
        "POINT" => {
            let x = f64::from_be_bytes(fixed(buf.get(0..8)?)?);
            let y = f64::from_be_bytes(fixed(buf.get(8..)?)?);
            Some(format!("({},{})", float(x, 15), float(y, 15)))
        }
        "BYTEA" => Some(buf.iter().fold(String::from("\\x"), |mut out, b| {
            out.push_str(&format!("{b:02x}"));
            out
        })),
        // Version byte, then the JSON text
        "JSONB" => match buf.split_first() {
            Some((&1, rest)) => std::str::from_utf8(rest).ok().map(str::to_string),
            _ => None,
        },
        // Enums, xml, citext and the character types send their text as is.
        _ => printable(buf),
    }
}

fn fixed<const N: usize>(buf: &[u8]) -> Option<[u8; N]> {
    buf.try_into().ok()
}

fn printable(buf: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(buf).ok()?;
    text.chars()
        .all(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .then(|| text.to_string())
}

/// Shortest round-trip digits, switching to exponent form outside
/// `[1e-4, 1e<digits>)` like `float8out`.
fn float<T>(v: T, digits: i32) -> String
where
    T: Display + LowerExp + Into<f64> + Copy,
{
    let wide: f64 = v.into();
    if wide.is_nan() {
        return "NaN".to_string();
    }
    if wide.is_infinite() {
        return if wide > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sci = format!("{v:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return v.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return v.to_string();
    };
    if wide != 0.0 && (exp < -4 || exp >= digits) {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
    } else {
        v.to_string()
    }
}

const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

/// Base-10000 digits with the display scale the column declares.
fn numeric(buf: &[u8]) -> Option<String> {
    let header = buf.get(0..8)?;
    let ndigits = usize::try_from(i16::from_be_bytes(fixed(&header[0..2])?)).ok()?;
    let weight = i64::from(i16::from_be_bytes(fixed(&header[2..4])?));
    let sign = u16::from_be_bytes(fixed(&header[4..6])?);
    let dscale = usize::try_from(i16::from_be_bytes(fixed(&header[6..8])?)).ok()?;

    match sign {
        NUMERIC_NAN => return Some("NaN".to_string()),
        NUMERIC_PINF => return Some("Infinity".to_string()),
        NUMERIC_NINF => return Some("-Infinity".to_string()),
        _ => {}
    }

    let body = buf.get(8..8 + ndigits * 2)?;
    let digits: Vec<i16> = body
        .chunks_exact(2)
        .map(|pair| i16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    let digit = |i: i64| -> i16 {
        usize::try_from(i)
            .ok()
            .and_then(|i| digits.get(i).copied())
            .unwrap_or(0)
    };

    let mut out = String::new();
    if sign == NUMERIC_NEG {
        out.push('-');
    }
    if weight < 0 {
        out.push('0');
    } else {
        out.push_str(&digit(0).to_string());
        for i in 1..=weight {
            out.push_str(&format!("{:04}", digit(i)));
        }
    }

    if dscale > 0 {
        let mut frac = String::with_capacity(dscale + 4);
        let mut i = weight + 1;
        while frac.len() < dscale {
            frac.push_str(&format!("{:04}", digit(i)));
            i += 1;
        }
        frac.truncate(dscale);
        out.push('.');
        out.push_str(&frac);
    }
    Some(out)
}

fn money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

const PGSQL_AF_INET: u8 = 2;
const PGSQL_AF_INET6: u8 = 3;

fn inet(buf: &[u8], cidr: bool) -> Option<String> {
    let [family, bits, _is_cidr, len, addr @ ..] = buf else {
        return None;
    };
    if usize::from(*len) != addr.len() {
        return None;
    }
    let (text, max_bits) = match *family {
        PGSQL_AF_INET => (Ipv4Addr::from(fixed::<4>(addr)?).to_string(), 32),
        PGSQL_AF_INET6 => (Ipv6Addr::from(fixed::<16>(addr)?).to_string(), 128),
        _ => return None,
    };
    if cidr || *bits != max_bits {
        Some(format!("{text}/{bits}"))
    } else {
        Some(text)
    }
}

const USECS_PER_SEC: u64 = 1_000_000;

/// `HH:MM:SS[.ffffff]` with trailing fractional zeros trimmed. Hours may
/// exceed 24.
fn clock(usecs: u64) -> String {
    let secs = usecs / USECS_PER_SEC;
    let frac = usecs % USECS_PER_SEC;
    let mut out = format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60);
    if frac != 0 {
        let digits = format!(".{frac:06}");
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

fn interval(buf: &[u8]) -> Option<String> {
    if buf.len() != 16 {
        return None;
    }
    let usecs = i64::from_be_bytes(fixed(&buf[0..8])?);
    let days = i32::from_be_bytes(fixed(&buf[8..12])?);
    let months = i32::from_be_bytes(fixed(&buf[12..16])?);

    let mut out = String::new();
    // A positive part following a negative one carries an explicit '+'.
    let mut after_negative = false;
    for (value, unit) in [(months / 12, "year"), (months % 12, "mon"), (days, "day")] {
        if value == 0 {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        if after_negative && value > 0 {
            out.push('+');
        }
        let plural = if value == 1 { "" } else { "s" };
        out.push_str(&format!("{value} {unit}{plural}"));
        after_negative = value < 0;
    }

    if out.is_empty() || usecs != 0 {
        if !out.is_empty() {
            out.push(' ');
        }
        if usecs < 0 {
            out.push('-');
        } else if after_negative {
            out.push('+');
        }
        out.push_str(&clock(usecs.unsigned_abs()));
    }
    Some(out)
}

fn timetz(buf: &[u8]) -> Option<String> {
    if buf.len() != 12 {
        return None;
    }
    let usecs = u64::try_from(i64::from_be_bytes(fixed(&buf[0..8])?)).ok()?;
    // Seconds west of UTC
    let zone = i32::from_be_bytes(fixed(&buf[8..12])?);

    let sign = if zone <= 0 { '+' } else { '-' };
    let abs = zone.unsigned_abs();
    let (h, m, s) = (abs / 3600, (abs / 60) % 60, abs % 60);
    let offset = if s != 0 {
        format!("{sign}{h:02}:{m:02}:{s:02}")
    } else if m != 0 {
        format!("{sign}{h:02}:{m:02}")
    } else {
        format!("{sign}{h:02}")
    };
    Some(clock(usecs) + &offset)
}

fn pg_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2000, 1, 1)
}

fn shift(days: i64) -> Option<NaiveDate> {
    let epoch = pg_epoch()?;
    if days >= 0 {
        epoch.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        epoch.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

fn date(days: i32) -> Option<String> {
    match days {
        i32::MAX => Some("infinity".to_string()),
        i32::MIN => Some("-infinity".to_string()),
        _ => shift(i64::from(days)).map(|d| d.to_string()),
    }
}

const USECS_PER_DAY: i64 = 86_400 * 1_000_000;

fn timestamp(usecs: i64) -> Option<String> {
    match usecs {
        i64::MAX => Some("infinity".to_string()),
        i64::MIN => Some("-infinity".to_string()),
        _ => {
            let day = shift(usecs.div_euclid(USECS_PER_DAY))?;
            let time = usecs.rem_euclid(USECS_PER_DAY).unsigned_abs();
            Some(format!("{} {}", day, clock(time)))
        }
    }
}

/// Binary array layout: ndim, has-null flag, element oid, then
/// `(length, lower bound)` per dimension and length-prefixed elements.
fn array(element: &str, buf: &[u8]) -> Option<String> {
    let mut reader = Reader { buf, pos: 0 };
    let ndim = usize::try_from(reader.i32()?).ok()?;
    let _has_nulls = reader.i32()?;
    let _element_oid = reader.i32()?;

    if ndim == 0 {
        return Some("{}".to_string());
    }

    let mut dims = Vec::with_capacity(ndim);
    for _ in 0..ndim {
        let len = usize::try_from(reader.i32()?).ok()?;
        let lower = reader.i32()?;
        dims.push((len, lower));
    }

    let count = dims.iter().try_fold(1usize, |n, (len, _)| n.checked_mul(*len))?;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        let len = reader.i32()?;
        let item = match usize::try_from(len) {
            Ok(len) => Some(quote(&scalar(element, reader.take(len)?)?)),
            Err(_) => None,
        };
        items.push(item.unwrap_or_else(|| "NULL".to_string()));
    }
    if reader.pos != buf.len() {
        return None;
    }

    let mut out = String::new();
    if dims.iter().any(|(_, lower)| *lower != 1) {
        for (len, lower) in &dims {
            let upper = i64::from(*lower) + i64::try_from(*len).ok()? - 1;
            out.push_str(&format!("[{lower}:{upper}]"));
        }
        out.push('=');
    }
    let mut items = items.into_iter();
    nest(&dims, &mut items, &mut out);
    Some(out)
}

fn nest(dims: &[(usize, i32)], items: &mut impl Iterator<Item = String>, out: &mut String) {
    let Some(((len, _), inner)) = dims.split_first() else {
        return;
    };
    out.push('{');
    for i in 0..*len {
        if i > 0 {
            out.push(',');
        }
        if inner.is_empty() {
            if let Some(item) = items.next() {
                out.push_str(&item);
            }
        } else {
            nest(inner, items, out);
        }
    }
    out.push('}');
}

/// Quote an array element the way `array_out` does.
fn quote(text: &str) -> String {
    let needs_quotes = text.is_empty()
        || text.eq_ignore_ascii_case("NULL")
        || text
            .chars()
            .any(|c| matches!(c, '"' | '\\' | '{' | '}' | ',') || c.is_ascii_whitespace() || c == '\x0b');
    if !needs_quotes {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let bytes = self.buf.get(self.pos..self.pos.checked_add(n)?)?;
        self.pos += n;
        Some(bytes)
    }

    fn i32(&mut self) -> Option<i32> {
        Some(i32::from_be_bytes(fixed(self.take(4)?)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_bytes(weight: i16, sign: u16, dscale: i16, digits: &[i16]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(digits.len() as i16).to_be_bytes());
        buf.extend_from_slice(&weight.to_be_bytes());
        buf.extend_from_slice(&sign.to_be_bytes());
        buf.extend_from_slice(&dscale.to_be_bytes());
        for d in digits {
            buf.extend_from_slice(&d.to_be_bytes());
        }
        buf
    }

    fn array_bytes(element_oid: i32, dims: &[(i32, i32)], items: &[Option<Vec<u8>>]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(dims.len() as i32).to_be_bytes());
        buf.extend_from_slice(&(items.iter().any(Option::is_none) as i32).to_be_bytes());
        buf.extend_from_slice(&element_oid.to_be_bytes());
        for (len, lower) in dims {
            buf.extend_from_slice(&len.to_be_bytes());
            buf.extend_from_slice(&lower.to_be_bytes());
        }
        for item in items {
            match item {
                Some(bytes) => {
                    buf.extend_from_slice(&(bytes.len() as i32).to_be_bytes());
                    buf.extend_from_slice(bytes);
                }
                None => buf.extend_from_slice(&(-1i32).to_be_bytes()),
            }
        }
        buf
    }

    #[test]
    fn test_numeric_keeps_declared_scale() {
        // 1.50::numeric
        let buf = numeric_bytes(0, 0, 2, &[1, 5000]);
        assert_eq!(render("NUMERIC", &buf).as_deref(), Some("1.50"));

        // 12345678.9
        let buf = numeric_bytes(1, 0, 1, &[1234, 5678, 9000]);
        assert_eq!(render("NUMERIC", &buf).as_deref(), Some("12345678.9"));

        // -0.0012
        let buf = numeric_bytes(-1, NUMERIC_NEG, 4, &[12]);
        assert_eq!(render("NUMERIC", &buf).as_deref(), Some("-0.0012"));

        // 0.000001 (weight -2 skips a whole group of zeros)
        let buf = numeric_bytes(-2, 0, 6, &[100]);
        assert_eq!(render("NUMERIC", &buf).as_deref(), Some("0.000001"));

        // 10000 with no fraction
        let buf = numeric_bytes(1, 0, 0, &[1]);
        assert_eq!(render("NUMERIC", &buf).as_deref(), Some("10000"));

        let zero = numeric_bytes(0, 0, 2, &[]);
        assert_eq!(render("NUMERIC", &zero).as_deref(), Some("0.00"));

        let nan = numeric_bytes(0, NUMERIC_NAN, 0, &[]);
        assert_eq!(render("numeric", &nan).as_deref(), Some("NaN"));
    }

    #[test]
    fn test_numeric_truncated_buffer() {
        let mut buf = numeric_bytes(0, 0, 2, &[1, 5000]);
        buf.pop();
        assert_eq!(render("NUMERIC", &buf), None);
    }

    #[test]
    fn test_interval() {
        let build = |usecs: i64, days: i32, months: i32| {
            let mut buf = usecs.to_be_bytes().to_vec();
            buf.extend_from_slice(&days.to_be_bytes());
            buf.extend_from_slice(&months.to_be_bytes());
            buf
        };
        assert_eq!(render("INTERVAL", &build(0, 1, 0)).as_deref(), Some("1 day"));
        assert_eq!(render("INTERVAL", &build(0, 0, 0)).as_deref(), Some("00:00:00"));
        assert_eq!(
            render("INTERVAL", &build(14_706_500_000, 3, 14)).as_deref(),
            Some("1 year 2 mons 3 days 04:05:06.5")
        );
        assert_eq!(
            render("INTERVAL", &build(3_600_000_000, -2, 0)).as_deref(),
            Some("-2 days +01:00:00")
        );
        assert_eq!(
            render("INTERVAL", &build(-90_000_000, 0, 0)).as_deref(),
            Some("-00:01:30")
        );
    }

    #[test]
    fn test_scalar_oid_inet_timetz() {
        assert_eq!(render("OID", &42u32.to_be_bytes()).as_deref(), Some("42"));

        let host = [PGSQL_AF_INET, 32, 0, 4, 10, 0, 0, 1];
        assert_eq!(render("INET", &host).as_deref(), Some("10.0.0.1"));
        let subnet = [PGSQL_AF_INET, 24, 0, 4, 10, 0, 0, 1];
        assert_eq!(render("INET", &subnet).as_deref(), Some("10.0.0.1/24"));
        let network = [PGSQL_AF_INET, 8, 1, 4, 10, 0, 0, 0];
        assert_eq!(render("CIDR", &network).as_deref(), Some("10.0.0.0/8"));

        let mut v6 = vec![PGSQL_AF_INET6, 128, 0, 16];
        v6.extend_from_slice(&Ipv6Addr::LOCALHOST.octets());
        assert_eq!(render("INET", &v6).as_deref(), Some("::1"));

        // 12:34:56+02 is stored as -7200 seconds west
        let mut tt = ((12 * 3600 + 34 * 60 + 56) * 1_000_000i64).to_be_bytes().to_vec();
        tt.extend_from_slice(&(-7200i32).to_be_bytes());
        assert_eq!(render("TIMETZ", &tt).as_deref(), Some("12:34:56+02"));

        let mut tt = 0i64.to_be_bytes().to_vec();
        tt.extend_from_slice(&(19_800i32).to_be_bytes());
        assert_eq!(render("TIMETZ", &tt).as_deref(), Some("00:00:00-05:30"));
    }

    #[test]
    fn test_dates_and_timestamps() {
        assert_eq!(render("DATE", &0i32.to_be_bytes()).as_deref(), Some("2000-01-01"));
        assert_eq!(render("DATE", &(-1i32).to_be_bytes()).as_deref(), Some("1999-12-31"));
        assert_eq!(render("DATE", &i32::MAX.to_be_bytes()).as_deref(), Some("infinity"));

        let ts = (USECS_PER_DAY + 1_500_000).to_be_bytes();
        assert_eq!(render("TIMESTAMP", &ts).as_deref(), Some("2000-01-02 00:00:01.5"));
        assert_eq!(
            render("TIMESTAMPTZ", &ts).as_deref(),
            Some("2000-01-02 00:00:01.5+00")
        );
    }

    #[test]
    fn test_uuid() {
        let id = uuid::Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8);
        assert_eq!(
            render("UUID", id.as_bytes()).as_deref(),
            Some("67e55044-10b1-426f-9247-bb680e5fe0c8")
        );
        assert_eq!(render("UUID", &[0u8; 3]), None);
    }

    #[test]
    fn test_money_and_point() {
        assert_eq!(render("MONEY", &150i64.to_be_bytes()).as_deref(), Some("$1.50"));
        assert_eq!(render("MONEY", &(-5i64).to_be_bytes()).as_deref(), Some("-$0.05"));

        let mut point = 1.5f64.to_be_bytes().to_vec();
        point.extend_from_slice(&(-2.0f64).to_be_bytes());
        assert_eq!(render("POINT", &point).as_deref(), Some("(1.5,-2)"));
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(float(1.5f64, 15), "1.5");
        assert_eq!(float(1e15f64, 15), "1e+15");
        assert_eq!(float(123456789012345f64, 15), "123456789012345");
        assert_eq!(float(0.0001f64, 15), "0.0001");
        assert_eq!(float(0.00001f64, 15), "1e-05");
        assert_eq!(float(f64::NAN, 15), "NaN");
        assert_eq!(float(f64::NEG_INFINITY, 15), "-Infinity");
        assert_eq!(float(0.0f64, 15), "0");
    }

    #[test]
    fn test_int_array() {
        let buf = array_bytes(
            23,
            &[(2, 1)],
            &[Some(1i32.to_be_bytes().to_vec()), Some(2i32.to_be_bytes().to_vec())],
        );
        assert_eq!(render("INT4[]", &buf).as_deref(), Some("{1,2}"));
    }

    #[test]
    fn test_text_array_quoting_and_nulls() {
        let buf = array_bytes(
            25,
            &[(4, 1)],
            &[
                Some(b"a b".to_vec()),
                Some(b"plain".to_vec()),
                None,
                Some(br#"say "hi""#.to_vec()),
            ],
        );
        assert_eq!(
            render("TEXT[]", &buf).as_deref(),
            Some(r#"{"a b",plain,NULL,"say \"hi\""}"#)
        );

        let buf = array_bytes(25, &[(2, 1)], &[Some(b"".to_vec()), Some(b"null".to_vec())]);
        assert_eq!(render("TEXT[]", &buf).as_deref(), Some(r#"{"","null"}"#));
    }

    #[test]
    fn test_multi_dimensional_and_offset_arrays() {
        let items: Vec<Option<Vec<u8>>> = (1..=4i16)
            .map(|v| Some(v.to_be_bytes().to_vec()))
            .collect();
        let buf = array_bytes(21, &[(2, 1), (2, 1)], &items);
        assert_eq!(render("INT2[]", &buf).as_deref(), Some("{{1,2},{3,4}}"));

        let buf = array_bytes(21, &[(2, 0)], &items[..2]);
        assert_eq!(render("INT2[]", &buf).as_deref(), Some("[0:1]={1,2}"));
    }

    #[test]
    fn test_empty_and_numeric_arrays() {
        let buf = array_bytes(23, &[], &[]);
        assert_eq!(render("INT4[]", &buf).as_deref(), Some("{}"));

        let buf = array_bytes(
            1700,
            &[(2, 1)],
            &[Some(numeric_bytes(0, 0, 1, &[1, 5000])), None],
        );
        assert_eq!(render("NUMERIC[]", &buf).as_deref(), Some("{1.5,NULL}"));
    }

    #[test]
    fn test_bytea_array_escapes_backslash() {
        let buf = array_bytes(17, &[(1, 1)], &[Some(vec![0x01, 0xab])]);
        assert_eq!(render("BYTEA[]", &buf).as_deref(), Some(r#"{"\\x01ab"}"#));
    }

    #[test]
    fn test_catalog_named_array() {
        let buf = array_bytes(16_384, &[(2, 1)], &[Some(b"happy".to_vec()), Some(b"sad".to_vec())]);
        assert_eq!(render("_mood", &buf).as_deref(), Some("{happy,sad}"));
    }

    #[test]
    fn test_text_like_types_pass_through() {
        assert_eq!(render("mood", b"happy").as_deref(), Some("happy"));
        assert_eq!(render("XML", b"<a/>").as_deref(), Some("<a/>"));
        assert_eq!(render("JSONB", b"\x01{\"a\":1}").as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_opaque_binary_is_not_text() {
        // e.g. a varbit: length prefix then bits
        assert_eq!(render("VARBIT", &[0, 0, 0, 3, 0b1010_0000]), None);
        assert_eq!(render("INT4", &[0, 1]), None);
    }
}
