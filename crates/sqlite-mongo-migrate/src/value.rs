//! Raw cell values and document scalars.
//!
//! The coercion policy lives here: a raw cell plus its declared column type
//! maps to exactly one document scalar, numeric or text. The declared type is
//! advisory; whether the value actually parses as a number is decisive.

/// A raw cell value as read from the source database.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// SQL NULL.
    Null,

    /// 64-bit signed integer.
    Integer(i64),

    /// 64-bit floating point.
    Real(f64),

    /// Text data.
    Text(String),

    /// Binary data.
    Blob(Vec<u8>),
}

impl RawValue {
    /// Whether this value counts as absent for default substitution:
    /// NULL, numeric zero, empty string, or empty blob.
    pub fn is_falsy(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Integer(v) => *v == 0,
            RawValue::Real(v) => *v == 0.0,
            RawValue::Text(s) => s.is_empty(),
            RawValue::Blob(b) => b.is_empty(),
        }
    }

    /// Interpret the value as a number, if possible, keeping the
    /// integer/real distinction of the source cell.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            RawValue::Integer(v) => Some(Number::Int(*v)),
            RawValue::Real(v) => Some(Number::Float(*v)),
            RawValue::Text(s) => {
                let trimmed = s.trim();
                if let Ok(v) = trimmed.parse::<i64>() {
                    Some(Number::Int(v))
                } else {
                    trimmed.parse::<f64>().ok().map(Number::Float)
                }
            }
            RawValue::Null | RawValue::Blob(_) => None,
        }
    }

    /// Render the value as plain text (before trimming/newline stripping).
    fn render(&self) -> String {
        match self {
            RawValue::Null => String::new(),
            RawValue::Integer(v) => v.to_string(),
            RawValue::Real(v) => format!("{:?}", v),
            RawValue::Text(s) => s.clone(),
            RawValue::Blob(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Integer(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Real(v)
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

/// A numeric scalar, keeping the source's integer/real distinction so that
/// rendering stays faithful: integers print without a fractional part,
/// floats always print with one (`2.0`, not `2`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer-valued number.
    Int(i64),

    /// Floating-point number.
    Float(f64),
}

impl Number {
    /// The numeric value as a 64-bit float.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(v) => *v as f64,
            Number::Float(v) => *v,
        }
    }
}

/// A document scalar: the only two value kinds a document may contain.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Numeric value.
    Number(Number),

    /// Text value (already trimmed, no embedded newlines).
    Text(String),
}

impl Scalar {
    /// Integer-valued numeric scalar.
    pub fn int(v: i64) -> Self {
        Scalar::Number(Number::Int(v))
    }

    /// Floating-point numeric scalar.
    pub fn float(v: f64) -> Self {
        Scalar::Number(Number::Float(v))
    }

    /// Render as a JSON literal: a bare number for numeric scalars, a quoted
    /// (escaped) string for text scalars.
    pub fn to_json_literal(&self) -> String {
        match self {
            Scalar::Number(Number::Int(v)) => v.to_string(),
            Scalar::Number(Number::Float(v)) => format!("{:?}", v),
            Scalar::Text(s) => serde_json::to_string(s).unwrap_or_default(),
        }
    }
}

/// Case-insensitive marker for columns that always coerce to text.
const TEXT_MARKER: &str = "TEXT";

/// Coerce one raw cell value plus its declared type into a document scalar.
///
/// Policy, applied in order:
///
/// 1. Falsy values (see [`RawValue::is_falsy`]) are substituted with `0.0`.
/// 2. The value is numeric only if the declared type is non-empty and not
///    `TEXT` (case-insensitive) AND the value parses as a number.
/// 3. Everything else degrades to text: rendered, trimmed of surrounding
///    whitespace, embedded newlines removed.
///
/// This is a pure function of its inputs and it never fails: a column
/// declared numeric holding a non-numeric value silently falls back to text.
pub fn coerce(raw: &RawValue, declared_type: &str) -> Scalar {
    let substituted;
    let value = if raw.is_falsy() {
        substituted = RawValue::Real(0.0);
        &substituted
    } else {
        raw
    };

    let declared = declared_type.to_ascii_uppercase();
    let parsed = value.as_number();

    match parsed {
        Some(n) if !declared.is_empty() && declared != TEXT_MARKER => Scalar::Number(n),
        _ => Scalar::Text(value.render().trim().replace('\n', "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_column_with_numeric_value() {
        assert_eq!(coerce(&RawValue::Integer(1), "INTEGER"), Scalar::int(1));
        assert_eq!(coerce(&RawValue::Real(9.5), "REAL"), Scalar::float(9.5));
        assert_eq!(
            coerce(&RawValue::Text("42.5".into()), "REAL"),
            Scalar::float(42.5)
        );
        assert_eq!(
            coerce(&RawValue::Text("42".into()), "INTEGER"),
            Scalar::int(42)
        );
    }

    #[test]
    fn test_text_marker_overrides_parseability() {
        // A declared TEXT column wins even when the value parses.
        assert_eq!(
            coerce(&RawValue::Text("42".into()), "TEXT"),
            Scalar::Text("42".into())
        );
        assert_eq!(
            coerce(&RawValue::Text("42".into()), "text"),
            Scalar::Text("42".into())
        );
    }

    #[test]
    fn test_empty_declared_type_is_text() {
        assert_eq!(
            coerce(&RawValue::Integer(7), ""),
            Scalar::Text("7".into())
        );
    }

    #[test]
    fn test_unparseable_value_degrades_to_text() {
        assert_eq!(
            coerce(&RawValue::Text("Ada".into()), "INTEGER"),
            Scalar::Text("Ada".into())
        );
    }

    #[test]
    fn test_falsy_values_substitute_default() {
        // Absent/falsy raw values coerce as if they were 0.0.
        assert_eq!(coerce(&RawValue::Null, "REAL"), Scalar::float(0.0));
        assert_eq!(coerce(&RawValue::Integer(0), "INTEGER"), Scalar::float(0.0));
        assert_eq!(
            coerce(&RawValue::Text(String::new()), "INTEGER"),
            Scalar::float(0.0)
        );
        // The default re-stringifies for TEXT columns.
        assert_eq!(coerce(&RawValue::Null, "TEXT"), Scalar::Text("0.0".into()));
        assert_eq!(
            coerce(&RawValue::Text(String::new()), "TEXT"),
            Scalar::Text("0.0".into())
        );
    }

    #[test]
    fn test_text_is_trimmed_and_newline_stripped() {
        assert_eq!(
            coerce(&RawValue::Text("  two\nlines  ".into()), "TEXT"),
            Scalar::Text("twolines".into())
        );
    }

    #[test]
    fn test_coercion_is_deterministic() {
        // Repeated calls with identical inputs yield identical outputs.
        let raw = RawValue::Text("3.25".into());
        let first = coerce(&raw, "REAL");
        for _ in 0..10 {
            assert_eq!(coerce(&raw, "REAL"), first);
        }
    }

    #[test]
    fn test_blob_degrades_to_text() {
        assert_eq!(
            coerce(&RawValue::Blob(b"abc".to_vec()), "BLOB"),
            Scalar::Text("abc".into())
        );
        // Empty blob is falsy, BLOB is not the text marker, 0.0 parses.
        assert_eq!(coerce(&RawValue::Blob(Vec::new()), "BLOB"), Scalar::float(0.0));
    }

    #[test]
    fn test_json_literal_rendering() {
        assert_eq!(Scalar::int(1).to_json_literal(), "1");
        assert_eq!(Scalar::float(9.5).to_json_literal(), "9.5");
        assert_eq!(Scalar::Text("Ada".into()).to_json_literal(), "\"Ada\"");
        assert_eq!(
            Scalar::Text("say \"hi\"".into()).to_json_literal(),
            "\"say \\\"hi\\\"\""
        );
    }

    #[test]
    fn test_integral_floats_keep_fractional_part() {
        // An integral REAL cell and the substituted default both render with
        // a trailing .0; only true integer cells render bare.
        assert_eq!(Scalar::float(0.0).to_json_literal(), "0.0");
        assert_eq!(Scalar::float(2.0).to_json_literal(), "2.0");
        assert_eq!(Scalar::int(2).to_json_literal(), "2");
        assert_eq!(
            coerce(&RawValue::Null, "REAL").to_json_literal(),
            "0.0"
        );
        assert_eq!(
            coerce(&RawValue::Real(2.0), "REAL").to_json_literal(),
            "2.0"
        );
    }
}
