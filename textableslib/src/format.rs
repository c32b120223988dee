//! Format templates applied to every cell of a table.
//!
//! A template is literal text around exactly one replacement field, e.g.
//! `{:3.2f}` or `({:.2f})`. The field accepts the usual format
//! mini-language:
//!
//! ```text
//! [[fill]align][sign][0][width][,][.precision][type]
//! ```
//!
//! with `align` one of `<>^=`, `sign` one of `+- `, and `type` one of
//! `s d f F e E g G %`. Literal braces are written `{{` and `}}`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cell::{float_repr, Cell};
use crate::error::TexTableError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Minus,
    Plus,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presentation {
    Default,
    Str,
    Decimal,
    Fixed,
    Exponent,
    General,
    Percent,
}

/// Parsed replacement field specification.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FormatSpec {
    raw: String,
    fill: char,
    align: Option<Align>,
    sign: Sign,
    zero: bool,
    width: Option<usize>,
    grouping: bool,
    precision: Option<usize>,
    presentation: Presentation,
    uppercase: bool,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            raw: String::new(),
            fill: ' ',
            align: None,
            sign: Sign::Minus,
            zero: false,
            width: None,
            grouping: false,
            precision: None,
            presentation: Presentation::Default,
            uppercase: false,
        }
    }
}

impl FormatSpec {
    fn parse(raw: &str) -> std::result::Result<Self, String> {
        let mut spec = FormatSpec {
            raw: raw.to_string(),
            ..Default::default()
        };
        let chars: Vec<char> = raw.chars().collect();
        let mut i = 0;

        if chars.len() >= 2 && align_of(chars[1]).is_some() {
            spec.fill = chars[0];
            spec.align = align_of(chars[1]);
            i = 2;
        } else if !chars.is_empty() && align_of(chars[0]).is_some() {
            spec.align = align_of(chars[0]);
            i = 1;
        }

        if let Some(&c) = chars.get(i) {
            let sign = match c {
                '+' => Some(Sign::Plus),
                '-' => Some(Sign::Minus),
                ' ' => Some(Sign::Space),
                _ => None,
            };
            if let Some(sign) = sign {
                spec.sign = sign;
                i += 1;
            }
        }

        if chars.get(i) == Some(&'#') {
            return Err("alternate form '#' is not supported".to_string());
        }

        if chars.get(i) == Some(&'0') {
            spec.zero = true;
            i += 1;
        }

        let start = i;
        while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
        if i > start {
            let digits: String = chars[start..i].iter().collect();
            spec.width = Some(digits.parse().map_err(|_| "width is too large")?);
        }

        if chars.get(i) == Some(&',') {
            spec.grouping = true;
            i += 1;
        }

        if chars.get(i) == Some(&'.') {
            i += 1;
            let start = i;
            while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
                i += 1;
            }
            if i == start {
                return Err("format specifier missing precision".to_string());
            }
            let digits: String = chars[start..i].iter().collect();
            spec.precision = Some(digits.parse().map_err(|_| "precision is too large")?);
        }

        if let Some(&c) = chars.get(i) {
            spec.presentation = match c {
                's' => Presentation::Str,
                'd' => Presentation::Decimal,
                'f' | 'F' => Presentation::Fixed,
                'e' | 'E' => Presentation::Exponent,
                'g' | 'G' => Presentation::General,
                '%' => Presentation::Percent,
                other => return Err(format!("unknown format code '{}'", other)),
            };
            spec.uppercase = c.is_ascii_uppercase();
            i += 1;
        }

        if i != chars.len() {
            return Err(format!("invalid format specifier '{}'", raw));
        }

        Ok(spec)
    }

    fn is_numeric_only(&self) -> bool {
        self.sign != Sign::Minus || self.grouping || self.align == Some(Align::AfterSign)
    }

    fn resolved_fill_align(&self, default: Align) -> (char, Align) {
        match self.align {
            Some(align) => (self.fill, align),
            None if self.zero && default == Align::Right => ('0', Align::AfterSign),
            None if self.zero => ('0', default),
            None => (' ', default),
        }
    }

    fn pad(&self, sign: &str, body: &str, default: Align) -> String {
        let (fill, align) = self.resolved_fill_align(default);
        let len = sign.chars().count() + body.chars().count();
        let pad = self.width.unwrap_or(0).saturating_sub(len);
        let fills = |n: usize| fill.to_string().repeat(n);

        match align {
            Align::Left => format!("{}{}{}", sign, body, fills(pad)),
            Align::Right => format!("{}{}{}", fills(pad), sign, body),
            Align::Center => {
                let left = pad / 2;
                format!("{}{}{}{}", fills(left), sign, body, fills(pad - left))
            }
            Align::AfterSign => format!("{}{}{}", sign, fills(pad), body),
        }
    }

    fn sign_str(&self, negative: bool) -> &'static str {
        match (negative, self.sign) {
            (true, _) => "-",
            (false, Sign::Plus) => "+",
            (false, Sign::Space) => " ",
            (false, Sign::Minus) => "",
        }
    }
}

fn align_of(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        '=' => Some(Align::AfterSign),
        _ => None,
    }
}

/// A template with exactly one replacement field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormatTemplate {
    source: String,
    prefix: String,
    suffix: String,
    spec: FormatSpec,
}

impl FormatTemplate {
    /// Parse a template string.
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = |message: String| TexTableError::InvalidFormat {
            template: template.to_string(),
            message,
        };

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut field: Option<String> = None;
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            let literal = match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    '{'
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    '}'
                }
                '{' => {
                    if field.is_some() {
                        return Err(invalid("more than one replacement field".to_string()));
                    }
                    let mut content = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => {
                                return Err(invalid("nested replacement fields".to_string()))
                            }
                            Some(other) => content.push(other),
                            None => return Err(invalid("expected '}' before end".to_string())),
                        }
                    }
                    field = Some(content);
                    continue;
                }
                '}' => return Err(invalid("single '}' encountered".to_string())),
                other => other,
            };
            if field.is_some() {
                suffix.push(literal);
            } else {
                prefix.push(literal);
            }
        }

        let content = field.ok_or_else(|| invalid("no replacement field".to_string()))?;
        let (name, raw_spec) = content.split_once(':').unwrap_or((content.as_str(), ""));
        if !name.is_empty() && name != "0" {
            return Err(invalid(format!(
                "replacement field '{}' must be positional",
                name
            )));
        }
        let spec = FormatSpec::parse(raw_spec).map_err(invalid)?;

        Ok(Self {
            source: template.to_string(),
            prefix,
            suffix,
            spec,
        })
    }

    /// The `{}` template: plain stringification.
    pub fn passthrough() -> Self {
        Self {
            source: "{}".to_string(),
            prefix: String::new(),
            suffix: String::new(),
            spec: FormatSpec::default(),
        }
    }

    /// The template text as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether this template leaves values untouched apart from stringification
    pub fn is_passthrough(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty() && self.spec.raw.is_empty()
    }

    /// Format one cell value.
    ///
    /// Fails with [`TexTableError::FormatMismatch`] when the value type does
    /// not support the field specification, e.g. `{:.2f}` applied to text.
    pub fn apply(&self, cell: &Cell) -> Result<String> {
        let body = match cell {
            Cell::Str(s) => self.format_str(cell, s)?,
            Cell::Int(v) => self.format_int(cell, *v)?,
            Cell::Float(v) => self.format_float(cell, *v)?,
            Cell::Bool(_) if self.spec.raw.is_empty() => cell.to_string(),
            Cell::Bool(b) => self.format_int(cell, i64::from(*b))?,
            Cell::Null if self.spec.raw.is_empty() => cell.to_string(),
            Cell::Null => {
                return Err(self.mismatch(cell, "unsupported format string for a null value"))
            }
        };
        Ok(format!("{}{}{}", self.prefix, body, self.suffix))
    }

    fn mismatch(&self, cell: &Cell, message: &str) -> TexTableError {
        TexTableError::FormatMismatch {
            template: self.source.clone(),
            value: format!("{} value '{}'", cell.kind(), cell),
            message: message.to_string(),
        }
    }

    fn format_str(&self, cell: &Cell, s: &str) -> Result<String> {
        let spec = &self.spec;
        if !matches!(spec.presentation, Presentation::Default | Presentation::Str) {
            return Err(self.mismatch(cell, "numeric format code applied to a string"));
        }
        if spec.is_numeric_only() {
            return Err(self.mismatch(cell, "sign, grouping or '=' alignment applied to a string"));
        }
        let body: String = match spec.precision {
            Some(p) => s.chars().take(p).collect(),
            None => s.to_string(),
        };
        Ok(spec.pad("", &body, Align::Left))
    }

    fn format_int(&self, cell: &Cell, v: i64) -> Result<String> {
        let spec = &self.spec;
        match spec.presentation {
            Presentation::Default | Presentation::Decimal => {
                if spec.precision.is_some() {
                    return Err(self.mismatch(cell, "precision not allowed in integer format"));
                }
                let mut digits = v.unsigned_abs().to_string();
                if spec.grouping {
                    digits = group_thousands(&digits);
                }
                Ok(spec.pad(spec.sign_str(v < 0), &digits, Align::Right))
            }
            Presentation::Str => Err(self.mismatch(cell, "format code 's' applied to a number")),
            _ => self.format_float(cell, v as f64),
        }
    }

    fn format_float(&self, cell: &Cell, v: f64) -> Result<String> {
        let spec = &self.spec;
        let upper = spec.uppercase;
        let negative = v.is_sign_negative() && !v.is_nan();
        let abs = v.abs();

        let body = if v.is_nan() || v.is_infinite() {
            let text = if v.is_nan() { "nan" } else { "inf" };
            let mut text = if upper {
                text.to_uppercase()
            } else {
                text.to_string()
            };
            if spec.presentation == Presentation::Percent {
                text.push('%');
            }
            text
        } else {
            match spec.presentation {
                Presentation::Decimal => {
                    return Err(self.mismatch(cell, "format code 'd' applied to a float"))
                }
                Presentation::Str => {
                    return Err(self.mismatch(cell, "format code 's' applied to a number"))
                }
                Presentation::Default => match spec.precision {
                    None => float_repr(abs),
                    Some(p) => format_repr_general(abs, p),
                },
                Presentation::Fixed => format!("{:.*}", spec.precision.unwrap_or(6), abs),
                Presentation::Exponent => {
                    format_exponent(abs, spec.precision.unwrap_or(6), upper)
                }
                Presentation::General => format_general(abs, spec.precision.unwrap_or(6), upper),
                Presentation::Percent => {
                    format!("{:.*}%", spec.precision.unwrap_or(6), abs * 100.0)
                }
            }
        };

        let body = if spec.grouping {
            group_number(&body)
        } else {
            body
        };
        Ok(spec.pad(spec.sign_str(negative), &body, Align::Right))
    }
}

impl Default for FormatTemplate {
    fn default() -> Self {
        Self::passthrough()
    }
}

impl FromStr for FormatTemplate {
    type Err = TexTableError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FormatTemplate {
    type Error = TexTableError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<FormatTemplate> for String {
    fn from(template: FormatTemplate) -> Self {
        template.source
    }
}

impl std::fmt::Display for FormatTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Exponent notation with a signed, at least two-digit exponent.
fn format_exponent(abs: f64, precision: usize, upper: bool) -> String {
    let formatted = format!("{:.*e}", precision, abs);
    let text = match formatted.split_once('e') {
        Some((mantissa, exponent)) => format!("{}e{}", mantissa, normalize_exponent(exponent)),
        None => formatted,
    };
    if upper {
        text.to_uppercase()
    } else {
        text
    }
}

/// General notation: fixed or exponent depending on magnitude, trailing
/// zeros removed.
fn format_general(abs: f64, precision: usize, upper: bool) -> String {
    let precision = precision.max(1);
    if abs == 0.0 {
        return "0".to_string();
    }

    // The exponent after rounding to `precision` significant digits decides
    // the notation.
    let probe = format!("{:.*e}", precision - 1, abs);
    let exponent: i32 = probe
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let (mantissa, exp) = probe.split_once('e').unwrap_or((probe.as_str(), "0"));
        let text = format!(
            "{}e{}",
            trim_trailing_zeros(mantissa),
            normalize_exponent(exp)
        );
        if upper {
            text.to_uppercase()
        } else {
            text
        }
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_trailing_zeros(&format!("{:.*}", decimals, abs))
    }
}

/// Precision without a type code: general notation that switches to an
/// exponent one digit earlier and keeps `.0` on fixed-notation integers.
fn format_repr_general(abs: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if abs == 0.0 {
        return "0.0".to_string();
    }

    let probe = format!("{:.*e}", precision - 1, abs);
    let (mantissa, exp) = probe.split_once('e').unwrap_or((probe.as_str(), "0"));
    let exponent: i32 = exp.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 - 1 {
        format!("{}e{}", trim_trailing_zeros(mantissa), normalize_exponent(exp))
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        let text = trim_trailing_zeros(&format!("{:.*}", decimals, abs));
        if text.contains('.') {
            text
        } else {
            format!("{}.0", text)
        }
    }
}

fn trim_trailing_zeros(value: &str) -> String {
    if !value.contains('.') {
        return value.to_string();
    }
    value
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

pub(crate) fn normalize_exponent(exponent: &str) -> String {
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("+", exponent.trim_start_matches('+')),
    };
    format!("{}{:0>2}", sign, digits)
}

fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut result = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result
}

fn group_number(text: &str) -> String {
    if text.contains(['e', 'E']) || !text.starts_with(|c: char| c.is_ascii_digit()) {
        return text.to_string();
    }
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    format!("{}{}", group_thousands(&text[..end]), &text[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(template: &str, cell: impl Into<Cell>) -> String {
        FormatTemplate::parse(template)
            .unwrap()
            .apply(&cell.into())
            .unwrap()
    }

    #[test]
    fn test_fixed_precision() {
        assert_eq!(fmt("{:3.2f}", 3.0), "3.00");
        assert_eq!(fmt("{:3.2f}", 0.0), "0.00");
        assert_eq!(fmt("{:.4f}", -0.12346), "-0.1235");
        assert_eq!(fmt("{:8.2f}", 3.14159), "    3.14");
        assert_eq!(fmt("{:f}", 1.5), "1.500000");
    }

    #[test]
    fn test_literal_text_around_field() {
        assert_eq!(fmt("({:3.2f})", 1.0), "(1.00)");
        assert_eq!(fmt("[{:.1f}]**", 2.26), "[2.3]**");
        assert_eq!(fmt("{{{:.0f}}}", 7.0), "{7}");
    }

    #[test]
    fn test_passthrough() {
        let template = FormatTemplate::passthrough();
        assert!(template.is_passthrough());
        assert_eq!(template.apply(&Cell::Float(3.0)).unwrap(), "3.0");
        assert_eq!(template.apply(&Cell::Int(3)).unwrap(), "3");
        assert_eq!(template.apply(&Cell::from("x")).unwrap(), "x");
        assert_eq!(template.apply(&Cell::Bool(false)).unwrap(), "False");
        assert_eq!(template.apply(&Cell::Null).unwrap(), "None");
        assert!(!FormatTemplate::parse("({})").unwrap().is_passthrough());
    }

    #[test]
    fn test_exponent_and_general() {
        assert_eq!(fmt("{:.2e}", 12344.0), "1.23e+04");
        assert_eq!(fmt("{:.1E}", 0.00012), "1.2E-04");
        assert_eq!(fmt("{:g}", 0.0001), "0.0001");
        assert_eq!(fmt("{:g}", 0.00001), "1e-05");
        assert_eq!(fmt("{:.3g}", 1234.5), "1.23e+03");
        assert_eq!(fmt("{:.3g}", 2.5), "2.5");
        assert_eq!(fmt("{:.3}", 3.0), "3.0");
        assert_eq!(fmt("{:.3}", 3.14159), "3.14");
        assert_eq!(fmt("{:.3}", 12.0), "12.0");
        assert_eq!(fmt("{:.3}", 100.0), "1e+02");
        assert_eq!(fmt("{:.2}", 12.0), "1.2e+01");
        assert_eq!(fmt("{:.3}", 0.00001), "1e-05");
        assert_eq!(fmt("{:.3}", 0.0), "0.0");
    }

    #[test]
    fn test_passthrough_float_switches_to_exponent() {
        assert_eq!(fmt("{}", 1e16), "1e+16");
        assert_eq!(fmt("{}", 1e20), "1e+20");
        assert_eq!(fmt("{}", 1.5e16), "1.5e+16");
        assert_eq!(fmt("{}", 1e-5), "1e-05");
        assert_eq!(fmt("{}", 0.0001), "0.0001");
        assert_eq!(fmt("{}", 1e15), "1000000000000000.0");
        assert_eq!(fmt("{}", -2.5e-7), "-2.5e-07");
    }

    #[test]
    fn test_percent_sign_and_grouping() {
        assert_eq!(fmt("{:.1%}", 0.256), "25.6%");
        assert_eq!(fmt("{:+.2f}", 1.0), "+1.00");
        assert_eq!(fmt("{: .2f}", 1.0), " 1.00");
        assert_eq!(fmt("{:,.2f}", 1234567.891), "1,234,567.89");
        assert_eq!(fmt("{:,d}", -1234567i64), "-1,234,567");
    }

    #[test]
    fn test_alignment_and_fill() {
        assert_eq!(fmt("{:<6.1f}", 1.0), "1.0   ");
        assert_eq!(fmt("{:^7.1f}", 1.0), "  1.0  ");
        assert_eq!(fmt("{:*>6}", "ab"), "****ab");
        assert_eq!(fmt("{:06.2f}", -1.5), "-01.50");
        assert_eq!(fmt("{:5}", "ab"), "ab   ");
        assert_eq!(fmt("{:5}", 12i64), "   12");
        assert_eq!(fmt("{:.2}", "abcdef"), "ab");
    }

    #[test]
    fn test_int_converts_for_float_codes() {
        assert_eq!(fmt("{:.2f}", 3i64), "3.00");
        assert_eq!(fmt("{:d}", 42i64), "42");
        assert_eq!(fmt("{:.2f}", true), "1.00");
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(fmt("{:.2f}", f64::NAN), "nan");
        assert_eq!(fmt("{:.2F}", f64::INFINITY), "INF");
        assert_eq!(fmt("{:.2f}", f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_numeric_template_on_string_is_mismatch() {
        let template = FormatTemplate::parse("{:3.2f}").unwrap();
        let err = template.apply(&Cell::from("abc")).unwrap_err();
        assert!(matches!(err, TexTableError::FormatMismatch { .. }));
        assert!(err.to_string().contains("str value 'abc'"));

        let signed = FormatTemplate::parse("{:+}").unwrap();
        assert!(signed.apply(&Cell::from("abc")).is_err());
    }

    #[test]
    fn test_other_mismatches() {
        assert!(FormatTemplate::parse("{:d}")
            .unwrap()
            .apply(&Cell::Float(1.5))
            .is_err());
        assert!(FormatTemplate::parse("{:.2d}")
            .unwrap()
            .apply(&Cell::Int(1))
            .is_err());
        assert!(FormatTemplate::parse("{:s}")
            .unwrap()
            .apply(&Cell::Int(1))
            .is_err());
        assert!(FormatTemplate::parse("{:.2f}")
            .unwrap()
            .apply(&Cell::Null)
            .is_err());
    }

    #[test]
    fn test_invalid_templates() {
        for bad in [
            "no field",
            "{}{}",
            "{:.2f",
            "}",
            "{:.f}",
            "{:q}",
            "{name}",
            "{:#x}",
        ] {
            let err = FormatTemplate::parse(bad).unwrap_err();
            assert!(
                matches!(err, TexTableError::InvalidFormat { .. }),
                "expected invalid format for {bad:?}"
            );
        }
        assert!(FormatTemplate::parse("{0:.2f}").is_ok());
    }

    #[test]
    fn test_serde_as_string() {
        let template: FormatTemplate = serde_json::from_str(r#""({:.2f})""#).unwrap();
        assert_eq!(template.as_str(), "({:.2f})");
        assert_eq!(serde_json::to_string(&template).unwrap(), r#""({:.2f})""#);
        assert!(serde_json::from_str::<FormatTemplate>(r#""{:.2f""#).is_err());
    }
}
