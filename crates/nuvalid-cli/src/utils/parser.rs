use nuvalid::engine::quantity::{Quantity, QuantityParseError};
use thiserror::Error;

/// Expands to [`Quantity::reference_catalog`] inside a quantity list.
pub const CATALOG_KEYWORD: &str = "catalog";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidSetFormat(String),

    #[error("Invalid value '{value}' for '{key}'. Expected {expected}.")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Quantity(#[from] QuantityParseError),
}

/// Splits a `KEY=VALUE` override into trimmed parts.
pub fn parse_set_value(pair: &str) -> Result<(&str, &str), ParseError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidSetFormat(pair.to_string())),
    }
}

pub fn parse_f64(key: &str, value: &str) -> Result<f64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: "a number",
    })
}

pub fn parse_bool(key: &str, value: &str) -> Result<bool, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: "'true' or 'false'",
    })
}

/// Parses a list of quantity shorthands, expanding the `catalog` keyword in place.
pub fn parse_quantities<S: AsRef<str>>(names: &[S]) -> Result<Vec<Quantity>, ParseError> {
    let mut quantities = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if name.eq_ignore_ascii_case(CATALOG_KEYWORD) {
            quantities.extend(Quantity::reference_catalog());
        } else {
            quantities.push(name.parse()?);
        }
    }
    Ok(quantities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_splits_on_first_equals() {
        assert_eq!(
            parse_set_value("kinematics.target-mass = 37.2"),
            Ok(("kinematics.target-mass", "37.2"))
        );
        assert_eq!(parse_set_value("a=b=c"), Ok(("a", "b=c")));
        assert_eq!(
            parse_set_value("no-equals"),
            Err(ParseError::InvalidSetFormat("no-equals".into()))
        );
        assert!(parse_set_value("=1").is_err());
    }

    #[test]
    fn scalar_values_are_validated() {
        assert_eq!(parse_f64("k", "1e-4"), Ok(1e-4));
        assert!(matches!(
            parse_f64("k", "abc"),
            Err(ParseError::InvalidValue {
                expected: "a number",
                ..
            })
        ));
        assert_eq!(parse_bool("k", "true"), Ok(true));
        assert!(parse_bool("k", "yes").is_err());
    }

    #[test]
    fn catalog_keyword_expands() {
        let quantities = parse_quantities(&["q2", "catalog"]).unwrap();
        assert_eq!(quantities[0], Quantity::Q2);
        assert_eq!(quantities.len(), 1 + Quantity::reference_catalog().len());
    }

    #[test]
    fn unknown_quantity_is_reported() {
        let err = parse_quantities(&["q4"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::Quantity(QuantityParseError::Unknown("q4".into()))
        );
    }
}
