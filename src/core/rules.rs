//! Field rules: named validation/coercion applied uniformly to request
//! arguments and response fields.
//!
//! A rule either produces a normalized value or nothing. "Nothing" is the
//! ordinary outcome for an absent or unusable value and never aborts the
//! surrounding build; only misuse of [`set_field_if`] itself is an error.

use tracing::trace;

use super::carriers::{carrier_from_number, resolve_carrier};
use super::countries::is_valid_country;
use super::currencies::is_valid_currency;
use super::error::CrossBorderError;
use super::hubs::hub_country;
use super::languages::is_valid_language;
use super::value::{FieldValue, Fields, fixed4, normalize_code, truncate_chars};

/// Fallback for unknown countries and export hubs.
pub const DEFAULT_COUNTRY: &str = "US";

/// Fallback for unknown currencies.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Inclusive bounds of [`Rule::IntRangeLow`].
pub const INT_RANGE_LOW: (i64, i64) = (0, 2);

/// A validation/coercion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Any present value, unchanged.
    Exists,
    /// `true`/`false`, as a boolean or its text.
    Boolean,
    /// Text, unchanged.
    String,
    /// Text, trimmed and truncated to the given number of characters.
    StringMax(usize),
    /// Integer, or text/decimal holding one.
    Int,
    /// 0 or 1; booleans map to 1/0.
    IntBool,
    /// Integer within [`INT_RANGE_LOW`].
    IntRangeLow,
    /// Number rendered with exactly 4 decimals.
    Float4,
    /// Nested map.
    Object,
    /// List, possibly empty.
    Array,
    /// List with at least one entry.
    NonEmptyArray,
    /// Supported language, lowercased.
    ValidLanguage,
    /// Known currency, uppercased to 3 characters.
    ValidCurrency,
    /// Known country, uppercased to 2 characters.
    ValidCountry,
    /// Export hub facility code, replaced by the hub's country; unknown
    /// facilities fall back to [`DEFAULT_COUNTRY`].
    ExportHub,
    /// Carrier name or number, resolved to a code in 1..=6.
    CarrierCode,
    /// `Y` or `N`, from the first character of the text.
    StringYOrN,
    /// Comma-separated (or listed) country codes; invalid entries dropped.
    CsvCountryList,
}

impl Rule {
    /// Apply the rule to a value. `None` means the value is unusable.
    pub fn apply(self, value: &FieldValue) -> Option<FieldValue> {
        match self {
            Rule::Exists => Some(value.clone()),
            Rule::Boolean => match value {
                FieldValue::Bool(b) => Some(FieldValue::Bool(*b)),
                FieldValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Some(FieldValue::Bool(true)),
                    "false" => Some(FieldValue::Bool(false)),
                    _ => None,
                },
                _ => None,
            },
            Rule::String => value.as_str().map(FieldValue::from),
            Rule::StringMax(max) => value
                .as_str()
                .map(|s| FieldValue::Text(truncate_chars(s.trim(), max))),
            Rule::Int => value.as_int().map(FieldValue::Int),
            Rule::IntBool => match value {
                FieldValue::Bool(b) => Some(FieldValue::Int(i64::from(*b))),
                FieldValue::Text(s) if s.trim().eq_ignore_ascii_case("true") => {
                    Some(FieldValue::Int(1))
                }
                FieldValue::Text(s) if s.trim().eq_ignore_ascii_case("false") => {
                    Some(FieldValue::Int(0))
                }
                other => other
                    .as_int()
                    .filter(|i| *i == 0 || *i == 1)
                    .map(FieldValue::Int),
            },
            Rule::IntRangeLow => value
                .as_int()
                .filter(|i| (INT_RANGE_LOW.0..=INT_RANGE_LOW.1).contains(i))
                .map(FieldValue::Int),
            Rule::Float4 => match value {
                FieldValue::Bool(_) => None,
                other => other.as_decimal().and_then(fixed4).map(FieldValue::Decimal),
            },
            Rule::Object => value.as_map().map(|m| FieldValue::Map(m.clone())),
            Rule::Array => value.as_list().map(|l| FieldValue::List(l.to_vec())),
            Rule::NonEmptyArray => value
                .as_list()
                .filter(|l| !l.is_empty())
                .map(|l| FieldValue::List(l.to_vec())),
            Rule::ValidLanguage => value
                .as_str()
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| is_valid_language(s))
                .map(FieldValue::Text),
            Rule::ValidCurrency => value
                .as_str()
                .map(|s| normalize_code(s, 3))
                .filter(|s| is_valid_currency(s))
                .map(FieldValue::Text),
            Rule::ValidCountry => value
                .as_str()
                .map(|s| normalize_code(s, 2))
                .filter(|s| is_valid_country(s))
                .map(FieldValue::Text),
            Rule::ExportHub => value
                .as_str()
                .map(|s| FieldValue::from(hub_country(s).unwrap_or(DEFAULT_COUNTRY))),
            Rule::CarrierCode => match value {
                FieldValue::Text(s) => Some(FieldValue::Int(i64::from(resolve_carrier(s)))),
                FieldValue::Bool(_) => None,
                other => other
                    .as_int()
                    .map(|i| FieldValue::Int(i64::from(carrier_from_number(i)))),
            },
            Rule::StringYOrN => value
                .as_str()
                .and_then(|s| s.trim().chars().next())
                .map(|c| c.to_ascii_uppercase())
                .filter(|c| *c == 'Y' || *c == 'N')
                .map(|c| FieldValue::Text(c.to_string())),
            Rule::CsvCountryList => {
                let tokens: Vec<String> = match value {
                    FieldValue::Text(s) => s.split(',').map(str::to_string).collect(),
                    FieldValue::List(items) => items.iter().map(|i| i.to_string()).collect(),
                    _ => return None,
                };
                let valid: Vec<String> = tokens
                    .iter()
                    .map(|t| normalize_code(t, 2))
                    .filter(|c| is_valid_country(c))
                    .collect();
                (!valid.is_empty()).then(|| FieldValue::Text(valid.join(",")))
            }
        }
    }

    /// XML schema type hint used when the field is written at the top level
    /// of a request.
    pub fn xsd_type(self) -> &'static str {
        match self {
            Rule::Int | Rule::IntBool | Rule::IntRangeLow | Rule::CarrierCode => "xsd:int",
            Rule::Float4 => "xsd:float",
            Rule::Boolean => "xsd:boolean",
            _ => "xsd:string",
        }
    }
}

/// Copy `field` from `source` to `target` through `rule`.
///
/// Returns the value written. When the source value is absent or fails the
/// rule, `default` is written instead (normalized by the rule when it
/// passes, verbatim otherwise). With no usable value and no default,
/// nothing is written and `Ok(None)` is returned.
///
/// # Errors
///
/// `InvalidArgument` if `field` is empty: that is a programming error,
/// not a data problem.
pub fn set_field_if(
    source: &Fields,
    target: &mut Fields,
    field: &str,
    rule: Rule,
    default: Option<&FieldValue>,
) -> Result<Option<FieldValue>, CrossBorderError> {
    if field.trim().is_empty() {
        return Err(CrossBorderError::invalid(
            "set_field_if requires a non-empty field name",
        ));
    }

    if let Some(value) = source.get(field).and_then(|v| rule.apply(v)) {
        target.insert(field, value.clone());
        return Ok(Some(value));
    }

    match default {
        Some(default) => {
            let value = rule.apply(default).unwrap_or_else(|| default.clone());
            trace!(field, ?rule, "field falls back to default");
            target.insert(field, value.clone());
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// One entry of a declarative field table: the caller-facing key, the
/// element name on the wire, and the rule applied in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub wire: &'static str,
    pub rule: Rule,
    pub default: Option<i64>,
}

impl FieldSpec {
    /// Key and wire name are the same.
    pub const fn new(key: &'static str, rule: Rule) -> Self {
        Self::renamed(key, key, rule)
    }

    pub const fn renamed(key: &'static str, wire: &'static str, rule: Rule) -> Self {
        Self {
            key,
            wire,
            rule,
            default: None,
        }
    }

    /// Numeric default written when the field is absent or invalid.
    pub const fn or(mut self, default: i64) -> Self {
        self.default = Some(default);
        self
    }
}

/// Run every spec in `specs` over `source`, returning each spec with the
/// value it produced, in table order. Fields that are absent or fail their
/// rule (and have no default) are left out.
pub fn apply_specs(
    source: &Fields,
    specs: &[FieldSpec],
) -> Result<Vec<(FieldSpec, FieldValue)>, CrossBorderError> {
    let mut scratch = Fields::new();
    let mut out = Vec::new();
    for spec in specs {
        let default = spec.default.map(FieldValue::Int);
        if let Some(value) =
            set_field_if(source, &mut scratch, spec.key, spec.rule, default.as_ref())?
        {
            out.push((*spec, value));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn source() -> Fields {
        Fields::new()
            .with("a", "apple")
            .with("b", true)
            .with("c", "USD")
            .with("d", dec!(14.01))
            .with("e", 0)
    }

    #[test]
    fn rules_accept_matching_kinds() {
        let src = source();
        let mut dst = Fields::new();
        let got = |dst: &mut Fields, f: &str, r: Rule| set_field_if(&src, dst, f, r, None).unwrap();

        assert_eq!(got(&mut dst, "a", Rule::String), Some("apple".into()));
        assert_eq!(got(&mut dst, "a", Rule::Int), None);
        assert_eq!(got(&mut dst, "b", Rule::Boolean), Some(true.into()));
        assert_eq!(got(&mut dst, "b", Rule::Int), None);
        assert_eq!(got(&mut dst, "c", Rule::ValidCurrency), Some("USD".into()));
        assert_eq!(got(&mut dst, "c", Rule::Int), None);
        assert_eq!(
            got(&mut dst, "d", Rule::Float4).map(|v| v.to_string()),
            Some("14.0100".into())
        );
        assert_eq!(got(&mut dst, "d", Rule::String), None);
        assert_eq!(got(&mut dst, "e", Rule::Int), Some(0.into()));
        assert_eq!(got(&mut dst, "e", Rule::String), None);
    }

    #[test]
    fn missing_field_without_default_is_not_set() {
        let mut dst = Fields::new();
        let got = set_field_if(&source(), &mut dst, "f", Rule::CsvCountryList, None).unwrap();
        assert_eq!(got, None);
        assert!(!dst.contains_key("f"));
    }

    #[test]
    fn default_fills_missing_field() {
        let mut dst = Fields::new();
        let default = FieldValue::from("US,DE");
        let got = set_field_if(&source(), &mut dst, "f", Rule::CsvCountryList, Some(&default))
            .unwrap();
        assert_eq!(got, Some("US,DE".into()));
        assert_eq!(dst.text("f"), Some("US,DE"));
    }

    #[test]
    fn present_value_wins_over_default() {
        let mut dst = Fields::new();
        let default = FieldValue::from("EUR");
        let got = set_field_if(&source(), &mut dst, "c", Rule::ValidCurrency, Some(&default))
            .unwrap();
        assert_eq!(got, Some("USD".into()));
    }

    #[test]
    fn empty_field_name_is_a_contract_violation() {
        let mut dst = Fields::new();
        let err = set_field_if(&source(), &mut dst, "", Rule::Exists, None).unwrap_err();
        assert!(matches!(err, CrossBorderError::InvalidArgument(_)));
    }

    #[test]
    fn int_bool_and_range() {
        assert_eq!(Rule::IntBool.apply(&true.into()), Some(1.into()));
        assert_eq!(Rule::IntBool.apply(&"false".into()), Some(0.into()));
        assert_eq!(Rule::IntBool.apply(&2.into()), None);
        assert_eq!(Rule::IntRangeLow.apply(&2.into()), Some(2.into()));
        assert_eq!(Rule::IntRangeLow.apply(&3.into()), None);
        assert_eq!(Rule::IntRangeLow.apply(&(-1).into()), None);
    }

    #[test]
    fn yes_no_and_truncation() {
        assert_eq!(Rule::StringYOrN.apply(&"yes".into()), Some("Y".into()));
        assert_eq!(Rule::StringYOrN.apply(&" n".into()), Some("N".into()));
        assert_eq!(Rule::StringYOrN.apply(&"maybe".into()), None);
        assert_eq!(Rule::StringMax(5).apply(&" Hamburg ".into()), Some("Hambu".into()));
    }

    #[test]
    fn country_list_drops_invalid_entries() {
        assert_eq!(
            Rule::CsvCountryList.apply(&"us, de ,zz,Fr".into()),
            Some("US,DE,FR".into())
        );
        assert_eq!(
            Rule::CsvCountryList.apply(&vec!["CA", "QQ"].into()),
            Some("CA".into())
        );
        assert_eq!(Rule::CsvCountryList.apply(&"QQ,ZZ".into()), None);
    }

    #[test]
    fn carriers_and_hubs() {
        assert_eq!(Rule::CarrierCode.apply(&"FedEx".into()), Some(2.into()));
        assert_eq!(Rule::CarrierCode.apply(&9.into()), Some(6.into()));
        assert_eq!(Rule::CarrierCode.apply(&"4".into()), Some(4.into()));
        assert_eq!(Rule::ExportHub.apply(&"bru".into()), Some("BE".into()));
        assert_eq!(Rule::ExportHub.apply(&"XXX".into()), Some("US".into()));
        assert_eq!(Rule::ExportHub.apply(&7.into()), None);
    }

    #[test]
    fn arrays_and_objects() {
        let empty: Vec<FieldValue> = Vec::new();
        assert!(Rule::Array.apply(&empty.clone().into()).is_some());
        assert!(Rule::NonEmptyArray.apply(&empty.into()).is_none());
        assert!(Rule::Object.apply(&Fields::new().into()).is_some());
        assert!(Rule::Object.apply(&"x".into()).is_none());
    }

    #[test]
    fn apply_specs_keeps_table_order_and_wire_names() {
        let src = Fields::new().with("city", "Springfield").with("cost", 3);
        let specs = [
            FieldSpec::renamed("cost", "shippingCost", Rule::Float4),
            FieldSpec::new("missing", Rule::String),
            FieldSpec::new("flag", Rule::IntBool).or(0),
            FieldSpec::new("city", Rule::StringMax(50)),
        ];
        let out = apply_specs(&src, &specs).unwrap();
        let wire: Vec<_> = out.iter().map(|(spec, v)| (spec.wire, v.to_string())).collect();
        assert_eq!(
            wire,
            vec![
                ("shippingCost", "3.0000".to_string()),
                ("flag", "0".to_string()),
                ("city", "Springfield".to_string()),
            ]
        );
    }
}
