//! Column values and their text rendering.

use rusqlite::types::ValueRef;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Text that stands in for SQL NULL in text rows.
pub const NULL_TEXT: &str = "null";

/// One column value as stored by the engine.
///
/// Serializes untagged: `Null` becomes JSON `null`, numbers stay numbers,
/// blobs become byte arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// SQLite storage class name, as reported by `typeof()`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }

    /// Renders the value the way text rows expose it.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Display for ColumnValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str(NULL_TEXT),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => f.write_str(&format_real(*value)),
            Self::Text(value) => f.write_str(value),
            Self::Blob(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
        }
    }
}

impl From<ValueRef<'_>> for ColumnValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(value) => Self::Integer(value),
            ValueRef::Real(value) => Self::Real(value),
            ValueRef::Text(bytes) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        }
    }
}

/// Renders an engine value straight to row text without building a
/// [`ColumnValue`] first.
pub fn render_value_ref(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => NULL_TEXT.to_string(),
        ValueRef::Integer(value) => value.to_string(),
        ValueRef::Real(value) => format_real(value),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Decimal exponent from which reals switch to exponent form, and the
/// lower bound below which they do too.
const REAL_EXPONENT_MAX: i32 = 6;
const REAL_EXPONENT_MIN: i32 = -4;

/// Formats a real with the fewest digits that round-trip, in `%g` style:
/// exponent form (`1e+20`, `1.5e-07`) when the decimal exponent is below
/// -4 or at least 6, plain decimal (`0.001`, `123456`) otherwise.
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { "+Inf" } else { "-Inf" }.to_string();
    }

    // `{:e}` yields the shortest round-trip mantissa, e.g. `-2.5e-10`.
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if (REAL_EXPONENT_MIN..REAL_EXPONENT_MAX).contains(&exponent) {
        value.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::{format_real, render_value_ref, ColumnValue, NULL_TEXT};
    use rusqlite::types::ValueRef;

    #[test]
    fn null_renders_as_literal_null_text() {
        assert_eq!(ColumnValue::Null.render(), NULL_TEXT);
        assert_eq!(render_value_ref(ValueRef::Null), "null");
    }

    #[test]
    fn numbers_render_in_shortest_decimal_form() {
        assert_eq!(render_value_ref(ValueRef::Integer(-42)), "-42");
        assert_eq!(render_value_ref(ValueRef::Real(1.5)), "1.5");
        assert_eq!(render_value_ref(ValueRef::Real(3.0)), "3");
        assert_eq!(ColumnValue::Real(0.1).render(), "0.1");
    }

    #[test]
    fn reals_switch_to_exponent_form_outside_plain_range() {
        assert_eq!(format_real(1e20), "1e+20");
        assert_eq!(format_real(1e-7), "1e-07");
        assert_eq!(format_real(1e300), "1e+300");
        assert_eq!(format_real(1234567.0), "1.234567e+06");
        assert_eq!(format_real(-2.5e-10), "-2.5e-10");
        assert_eq!(format_real(0.00001), "1e-05");
    }

    #[test]
    fn reals_stay_plain_inside_range() {
        assert_eq!(format_real(123456.0), "123456");
        assert_eq!(format_real(0.0001), "0.0001");
        assert_eq!(format_real(0.0), "0");
        assert_eq!(format_real(-0.5), "-0.5");
    }

    #[test]
    fn non_finite_reals_use_signed_names() {
        assert_eq!(format_real(f64::INFINITY), "+Inf");
        assert_eq!(format_real(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_real(f64::NAN), "NaN");
    }

    #[test]
    fn text_and_blob_render_as_utf8() {
        assert_eq!(render_value_ref(ValueRef::Text(b"hello")), "hello");
        assert_eq!(render_value_ref(ValueRef::Blob(b"raw")), "raw");
        assert_eq!(render_value_ref(ValueRef::Blob(&[0x66, 0xff])), "f\u{fffd}");
    }

    #[test]
    fn typed_and_direct_rendering_agree() {
        let samples = [
            ValueRef::Null,
            ValueRef::Integer(7),
            ValueRef::Real(2.25),
            ValueRef::Text("é".as_bytes()),
            ValueRef::Blob(b"\x00a"),
        ];
        for sample in samples {
            assert_eq!(ColumnValue::from(sample).render(), render_value_ref(sample));
        }
    }

    #[test]
    fn type_names_follow_storage_classes() {
        assert_eq!(ColumnValue::Integer(1).type_name(), "integer");
        assert_eq!(ColumnValue::Text("null".into()).type_name(), "text");
        assert!(!ColumnValue::Text("null".into()).is_null());
    }
}
