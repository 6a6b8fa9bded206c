//! Field pipelines for incoming watch payloads.
//!
//! Each field runs an explicit list of canonicalizers and checks (see
//! [`FieldPipeline`]). Within a field the first failing check wins; across
//! fields every failure is collected, so a single response can list all of
//! them.

use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidateLength;

use super::predicates::{
    is_alpha, is_iso4217, is_iso8601_date, is_price, parse_iso8601_date, price_fits_storage,
};
use super::rules::{FieldPipeline, FieldViolation, Step, Violations};
use crate::error::{CoreError, CoreResult};
use crate::text::{
    collapse_spaces, strip_to_whitelist, to_title_case, MANUFACTURER_WHITELIST, MODEL_WHITELIST,
};
use crate::types::{Date, Money};
use crate::watch::{NewWatch, WatchChanges};

// ---------------------------------------------------------------------------
// Raw payloads
// ---------------------------------------------------------------------------

/// Raw create payload, exactly as received.
///
/// Every field is optional at this stage so that missing fields are reported
/// as validation failures rather than decode errors. The `*_iso8601` /
/// `*_iso4217` aliases accept the older field names.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CreateWatchInput {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub bracelet_color: Option<String>,
    #[serde(alias = "launch_date_iso8601")]
    pub launch_date: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub price: Option<String>,
    #[serde(alias = "price_currency_iso4217")]
    pub price_currency: Option<String>,
}

/// Raw partial-update payload.
///
/// `launch_date` distinguishes an absent key (`None`) from an explicit
/// `null` (`Some(None)`), which clears the stored date.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateWatchInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bracelet_color: Option<String>,
    #[serde(
        default,
        alias = "launch_date_iso8601",
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub launch_date: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<String>,
    #[serde(alias = "price_currency_iso4217", skip_serializing_if = "Option::is_none")]
    pub price_currency: Option<String>,
}

impl UpdateWatchInput {
    pub fn is_empty(&self) -> bool {
        self.manufacturer.is_none()
            && self.model.is_none()
            && self.bracelet_color.is_none()
            && self.launch_date.is_none()
            && self.price.is_none()
            && self.price_currency.is_none()
    }
}

/// Marks a key as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

/// Accept a price either as a JSON string or as a bare number.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// Canonicalizers
// ---------------------------------------------------------------------------

fn trim(value: &str) -> String {
    value.trim().to_string()
}

fn trim_lowercase(value: &str) -> String {
    value.trim().to_lowercase()
}

fn trim_uppercase(value: &str) -> String {
    value.trim().to_uppercase()
}

fn strip_manufacturer(value: &str) -> String {
    strip_to_whitelist(value, MANUFACTURER_WHITELIST)
}

fn strip_model(value: &str) -> String {
    strip_to_whitelist(value, MODEL_WHITELIST)
}

fn title_case(value: &str) -> String {
    to_title_case(value, true)
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

fn not_empty(value: &str) -> bool {
    !value.is_empty()
}

fn at_least_3_chars(value: &str) -> bool {
    value.validate_length(Some(3u64), None, None)
}

fn at_most_50_chars(value: &str) -> bool {
    value.validate_length(None, Some(50u64), None)
}

fn at_most_25_chars(value: &str) -> bool {
    value.validate_length(None, Some(25u64), None)
}

fn exactly_3_chars(value: &str) -> bool {
    value.validate_length(None, None, Some(3u64))
}

const NOT_EMPTY: Step = Step::Check {
    rule: "not_empty",
    message: "should not be empty",
    test: not_empty,
};

const MIN_LENGTH_3: Step = Step::Check {
    rule: "min_length",
    message: "must be longer than or equal to 3 characters",
    test: at_least_3_chars,
};

const MAX_LENGTH_50: Step = Step::Check {
    rule: "max_length",
    message: "must be shorter than or equal to 50 characters",
    test: at_most_50_chars,
};

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

pub const MANUFACTURER: FieldPipeline = FieldPipeline {
    field: "manufacturer",
    steps: &[
        Step::Canonicalize(trim),
        Step::Canonicalize(strip_manufacturer),
        Step::Canonicalize(collapse_spaces),
        NOT_EMPTY,
        Step::Canonicalize(title_case),
        MIN_LENGTH_3,
        MAX_LENGTH_50,
    ],
};

pub const MODEL: FieldPipeline = FieldPipeline {
    field: "model",
    steps: &[
        Step::Canonicalize(trim),
        Step::Canonicalize(strip_model),
        Step::Canonicalize(collapse_spaces),
        NOT_EMPTY,
        Step::Canonicalize(title_case),
        MIN_LENGTH_3,
        MAX_LENGTH_50,
    ],
};

pub const BRACELET_COLOR: FieldPipeline = FieldPipeline {
    field: "bracelet_color",
    steps: &[
        Step::Canonicalize(trim_lowercase),
        NOT_EMPTY,
        Step::Check {
            rule: "alpha",
            message: "must contain only letters (a-zA-Z)",
            test: is_alpha,
        },
        MIN_LENGTH_3,
        Step::Check {
            rule: "max_length",
            message: "must be shorter than or equal to 25 characters",
            test: at_most_25_chars,
        },
    ],
};

pub const LAUNCH_DATE: FieldPipeline = FieldPipeline {
    field: "launch_date",
    steps: &[
        Step::Canonicalize(trim),
        Step::Check {
            rule: "iso8601_date",
            message: "must be a valid ISO 8601 date string (YYYY-MM-DD)",
            test: is_iso8601_date,
        },
    ],
};

pub const PRICE: FieldPipeline = FieldPipeline {
    field: "price",
    steps: &[
        Step::Canonicalize(trim),
        NOT_EMPTY,
        Step::Check {
            rule: "decimal",
            message: "may have 2 decimal digits at most. decimal separator is set to `.`",
            test: is_price,
        },
        Step::Check {
            rule: "max_digits",
            message: "must be lower than 100000000",
            test: price_fits_storage,
        },
    ],
};

pub const PRICE_CURRENCY: FieldPipeline = FieldPipeline {
    field: "price_currency",
    steps: &[
        Step::Canonicalize(trim_uppercase),
        Step::Check {
            rule: "length",
            message: "must be a string of 3 characters",
            test: exactly_3_chars,
        },
        Step::Check {
            rule: "iso4217",
            message: "must be a valid ISO4217 currency code",
            test: is_iso4217,
        },
    ],
};

fn canonical_price(raw: &str) -> Result<Money, FieldViolation> {
    let value = PRICE.run(raw)?;
    let mut price = value.parse::<Money>().map_err(|_| {
        FieldViolation::new(PRICE.field, "decimal", "price must be a decimal number")
    })?;
    price.rescale(2);
    Ok(price)
}

/// Absent, `null` and blank dates all mean "no date".
fn canonical_launch_date(raw: Option<&str>) -> Result<Option<Date>, FieldViolation> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let value = LAUNCH_DATE.run(raw)?;
    parse_iso8601_date(&value).map(Some).ok_or_else(|| {
        FieldViolation::new(
            LAUNCH_DATE.field,
            "iso8601_date",
            "launch_date must be a valid ISO 8601 date string (YYYY-MM-DD)",
        )
    })
}

// ---------------------------------------------------------------------------
// Drivers
// ---------------------------------------------------------------------------

/// Validate and canonicalize a create payload. All required fields must be present.
pub fn validate_create(input: &CreateWatchInput) -> CoreResult<NewWatch> {
    let mut violations = Violations::default();

    let manufacturer = violations.collect(MANUFACTURER.run_required(input.manufacturer.as_deref()));
    let model = violations.collect(MODEL.run_required(input.model.as_deref()));
    let bracelet_color =
        violations.collect(BRACELET_COLOR.run_required(input.bracelet_color.as_deref()));
    let launch_date = violations.collect(canonical_launch_date(input.launch_date.as_deref()));
    let price = violations.collect(
        input
            .price
            .as_deref()
            .ok_or_else(|| missing(PRICE.field))
            .and_then(canonical_price),
    );
    let price_currency =
        violations.collect(PRICE_CURRENCY.run_required(input.price_currency.as_deref()));

    match (
        manufacturer,
        model,
        bracelet_color,
        launch_date,
        price,
        price_currency,
    ) {
        (
            Some(manufacturer),
            Some(model),
            Some(bracelet_color),
            Some(launch_date),
            Some(price),
            Some(price_currency),
        ) if violations.is_empty() => Ok(NewWatch {
            manufacturer,
            model,
            bracelet_color,
            launch_date,
            price,
            price_currency,
        }),
        _ => Err(CoreError::Validation(violations.into_vec())),
    }
}

/// Validate and canonicalize a partial update. Only supplied fields are checked.
///
/// An empty payload is rejected with [`CoreError::EmptyUpdate`].
pub fn validate_update(input: &UpdateWatchInput) -> CoreResult<WatchChanges> {
    if input.is_empty() {
        return Err(CoreError::EmptyUpdate);
    }
    let mut violations = Violations::default();

    let changes = WatchChanges {
        manufacturer: input
            .manufacturer
            .as_deref()
            .and_then(|v| violations.collect(MANUFACTURER.run(v))),
        model: input
            .model
            .as_deref()
            .and_then(|v| violations.collect(MODEL.run(v))),
        bracelet_color: input
            .bracelet_color
            .as_deref()
            .and_then(|v| violations.collect(BRACELET_COLOR.run(v))),
        launch_date: input
            .launch_date
            .as_ref()
            .and_then(|v| violations.collect(canonical_launch_date(v.as_deref()))),
        price: input
            .price
            .as_deref()
            .and_then(|v| violations.collect(canonical_price(v))),
        price_currency: input
            .price_currency
            .as_deref()
            .and_then(|v| violations.collect(PRICE_CURRENCY.run(v))),
    };

    if violations.is_empty() {
        Ok(changes)
    } else {
        Err(CoreError::Validation(violations.into_vec()))
    }
}

fn missing(field: &'static str) -> FieldViolation {
    FieldViolation::new(field, "required", format!("{field} should not be empty"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    fn apple() -> CreateWatchInput {
        CreateWatchInput {
            manufacturer: Some("  apple ".into()),
            model: Some("watch series 6 (GPS)".into()),
            bracelet_color: Some(" Blue ".into()),
            launch_date: Some("2020-09-18".into()),
            price: Some(" 399.99 ".into()),
            price_currency: Some(" usd".into()),
        }
    }

    fn violations(err: CoreError) -> Vec<FieldViolation> {
        match err {
            CoreError::Validation(v) => v,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    // -- manufacturer / model -------------------------------------------------

    #[test]
    fn manufacturer_is_stripped_and_title_cased() {
        assert_eq!(MANUFACTURER.run("  tag heuer & co. ").unwrap(), "Tag Heuer Co.");
        assert_eq!(MANUFACTURER.run("IWC schaffhausen").unwrap(), "IWC Schaffhausen");
    }

    #[test]
    fn manufacturer_output_is_whitelisted_and_trimmed() {
        for raw in ["  ca$io!  ", "\tSeiko\n", "Orient * Star", "(swatch)  group."] {
            let out = MANUFACTURER.run(raw).unwrap();
            assert_eq!(out, out.trim());
            assert_eq!(strip_to_whitelist(&out, MANUFACTURER_WHITELIST), out);
            assert!(!out.contains("  "));
        }
    }

    #[test]
    fn manufacturer_too_short_after_stripping() {
        let err = MANUFACTURER.run("a!!").unwrap_err();
        assert_eq!(err.rule, "min_length");
        assert_eq!(err.field, "manufacturer");
    }

    #[test]
    fn manufacturer_only_symbols_is_empty() {
        assert_eq!(MANUFACTURER.run("$$$").unwrap_err().rule, "not_empty");
        assert_eq!(MANUFACTURER.run("   ").unwrap_err().rule, "not_empty");
    }

    #[test]
    fn manufacturer_longer_than_50_is_rejected() {
        let long = "a".repeat(51);
        assert_eq!(MANUFACTURER.run(&long).unwrap_err().rule, "max_length");
    }

    #[test]
    fn model_keeps_plus_manufacturer_does_not() {
        assert_eq!(MODEL.run("g-shock+ ga-2100").unwrap(), "G-shock+ Ga-2100");
        assert_eq!(MANUFACTURER.run("casio+").unwrap(), "Casio");
    }

    #[test]
    fn model_preserves_uppercase_codes() {
        assert_eq!(
            MODEL.run("vintage A1000MGA-5EF").unwrap(),
            "Vintage A1000MGA-5EF"
        );
    }

    // -- bracelet color -------------------------------------------------------

    #[test]
    fn bracelet_color_is_lowercased() {
        assert_eq!(BRACELET_COLOR.run(" SILVER ").unwrap(), "silver");
    }

    #[test]
    fn bracelet_color_must_be_alphabetic() {
        assert_eq!(BRACELET_COLOR.run("dark blue").unwrap_err().rule, "alpha");
        assert_eq!(BRACELET_COLOR.run("red2").unwrap_err().rule, "alpha");
        assert_eq!(BRACELET_COLOR.run("re").unwrap_err().rule, "min_length");
        assert_eq!(BRACELET_COLOR.run("").unwrap_err().rule, "not_empty");
    }

    // -- price / currency -----------------------------------------------------

    #[test]
    fn price_accepts_and_rescales() {
        assert_eq!(canonical_price("399.99").unwrap(), Decimal::new(39999, 2));
        let whole = canonical_price(" 250 ").unwrap();
        assert_eq!(whole, Decimal::new(25000, 2));
        assert_eq!(whole.to_string(), "250.00");
    }

    #[test]
    fn price_rejects_bad_values() {
        assert_eq!(canonical_price("399.999").unwrap_err().rule, "decimal");
        assert_eq!(canonical_price("abc").unwrap_err().rule, "decimal");
        assert_eq!(canonical_price("  ").unwrap_err().rule, "not_empty");
        assert_eq!(canonical_price("123456789").unwrap_err().rule, "max_digits");
    }

    #[test]
    fn currency_pipeline_uppercases_before_checking() {
        assert_eq!(PRICE_CURRENCY.run("usd").unwrap(), "USD");
        assert_eq!(PRICE_CURRENCY.run(" eur ").unwrap(), "EUR");
        assert_eq!(PRICE_CURRENCY.run("US").unwrap_err().rule, "length");
        assert_eq!(PRICE_CURRENCY.run("XXX").unwrap_err().rule, "iso4217");
    }

    // -- launch date ----------------------------------------------------------

    #[test]
    fn launch_date_absent_null_or_blank_is_none() {
        assert_eq!(canonical_launch_date(None).unwrap(), None);
        assert_eq!(canonical_launch_date(Some("   ")).unwrap(), None);
    }

    #[test]
    fn launch_date_is_parsed() {
        assert_eq!(
            canonical_launch_date(Some(" 2019-04-30 ")).unwrap(),
            NaiveDate::from_ymd_opt(2019, 4, 30)
        );
        assert_eq!(
            canonical_launch_date(Some("30-04-2019")).unwrap_err().rule,
            "iso8601_date"
        );
    }

    // -- create driver --------------------------------------------------------

    #[test]
    fn create_canonicalizes_every_field() {
        let watch = validate_create(&apple()).unwrap();
        assert_eq!(watch.manufacturer, "Apple");
        assert_eq!(watch.model, "Watch Series 6 (GPS)");
        assert_eq!(watch.bracelet_color, "blue");
        assert_eq!(watch.launch_date, NaiveDate::from_ymd_opt(2020, 9, 18));
        assert_eq!(watch.price, Decimal::new(39999, 2));
        assert_eq!(watch.price_currency, "USD");
    }

    #[test]
    fn create_without_launch_date_is_fine() {
        let input = CreateWatchInput {
            launch_date: None,
            ..apple()
        };
        assert_eq!(validate_create(&input).unwrap().launch_date, None);
    }

    #[test]
    fn create_collects_all_violations() {
        let input = CreateWatchInput {
            manufacturer: None,
            bracelet_color: Some("blue1".into()),
            price: Some("1.234".into()),
            price_currency: Some("XXX".into()),
            ..apple()
        };
        let all = violations(validate_create(&input).unwrap_err());
        let fields: Vec<_> = all.iter().map(|v| (v.field, v.rule)).collect();
        assert_eq!(
            fields,
            [
                ("manufacturer", "required"),
                ("bracelet_color", "alpha"),
                ("price", "decimal"),
                ("price_currency", "iso4217"),
            ]
        );
    }

    #[test]
    fn create_from_empty_payload_reports_required_fields() {
        let all = violations(validate_create(&CreateWatchInput::default()).unwrap_err());
        assert_eq!(all.len(), 5);
        assert!(all.iter().all(|v| v.rule == "required"));
    }

    // -- update driver --------------------------------------------------------

    #[test]
    fn update_rejects_empty_payload() {
        assert_matches!(
            validate_update(&UpdateWatchInput::default()),
            Err(CoreError::EmptyUpdate)
        );
    }

    #[test]
    fn update_only_touches_supplied_fields() {
        let input = UpdateWatchInput {
            model: Some("fenix 7  pro".into()),
            ..Default::default()
        };
        let changes = validate_update(&input).unwrap();
        assert_eq!(changes.model.as_deref(), Some("Fenix 7 Pro"));
        assert_eq!(changes.manufacturer, None);
        assert_eq!(changes.launch_date, None);
    }

    #[test]
    fn update_null_launch_date_clears_it() {
        let input: UpdateWatchInput = serde_json::from_str(r#"{"launch_date": null}"#).unwrap();
        assert_eq!(input.launch_date, Some(None));
        let changes = validate_update(&input).unwrap();
        assert_eq!(changes.launch_date, Some(None));
    }

    #[test]
    fn update_missing_launch_date_is_untouched() {
        let input: UpdateWatchInput = serde_json::from_str(r#"{"price": "10"}"#).unwrap();
        assert_eq!(input.launch_date, None);
        let changes = validate_update(&input).unwrap();
        assert_eq!(changes.launch_date, None);
        assert_eq!(changes.price, Some(Decimal::new(1000, 2)));
    }

    #[test]
    fn update_reports_invalid_fields() {
        let input = UpdateWatchInput {
            price_currency: Some("us".into()),
            ..Default::default()
        };
        let all = violations(validate_update(&input).unwrap_err());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].message, "price_currency must be a string of 3 characters");
    }

    // -- payload decoding -----------------------------------------------------

    #[test]
    fn legacy_field_names_are_accepted() {
        let input: CreateWatchInput = serde_json::from_str(
            r#"{"manufacturer": "Seiko", "model": "Presage", "bracelet_color": "brown",
                "launch_date_iso8601": "2019-04-30", "price": "450",
                "price_currency_iso4217": "jpy"}"#,
        )
        .unwrap();
        let watch = validate_create(&input).unwrap();
        assert_eq!(watch.price_currency, "JPY");
        assert_eq!(watch.launch_date, NaiveDate::from_ymd_opt(2019, 4, 30));
    }

    #[test]
    fn price_may_be_a_json_number() {
        let input: UpdateWatchInput = serde_json::from_str(r#"{"price": 250}"#).unwrap();
        assert_eq!(input.price.as_deref(), Some("250"));
        let input: UpdateWatchInput = serde_json::from_str(r#"{"price": 399.99}"#).unwrap();
        assert_eq!(validate_update(&input).unwrap().price, Some(Decimal::new(39999, 2)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<UpdateWatchInput, _> = serde_json::from_str(r#"{"colour": "red"}"#);
        assert!(result.is_err());
    }
}
