//! Turns raw backend values into the strings the page shows.
//!
//! Nothing in here fails: absent, null or non-numeric input degrades to an
//! empty string so a partial record never breaks rendering.

use serde_json::Value;

use crate::models::{EventMeta, ReferenceRecord};

/// Candidate keys for the project name, primary first.
pub const NAME_KEYS: &[&str] = &["事業名", "jigyo_mei"];
/// Candidate keys for the initial budget, primary first.
pub const INITIAL_BUDGET_KEYS: &[&str] = &["当初予算", "tosho_yosan"];

const MAX_FRACTION_DIGITS: usize = 3;

/// Returns the first candidate key holding a non-null value.
pub fn lookup_field<'a>(record: &'a EventMeta, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

pub fn reference_from_meta(meta: &EventMeta) -> ReferenceRecord {
    let name = match lookup_field(meta, NAME_KEYS) {
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    ReferenceRecord {
        name,
        initial_budget: lookup_field(meta, INITIAL_BUDGET_KEYS).cloned(),
    }
}

/// Reads a JSON number or numeric string as a finite `f64`.
pub fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

pub fn format_currency(value: Option<&Value>) -> String {
    value
        .and_then(numeric_value)
        .map(group_digits)
        .unwrap_or_default()
}

/// Comma thousands grouping with up to three fraction digits, the way a
/// ja-JP locale prints plain numbers.
fn group_digits(value: f64) -> String {
    let scale = 10f64.powi(MAX_FRACTION_DIGITS as i32);
    let scaled = value.abs() * scale;
    let (whole, fraction) = if scaled.is_finite() {
        let rounded = scaled.round();
        let whole = (rounded / scale).trunc();
        (whole, (rounded - whole * scale) as u64)
    } else {
        // too large for a fraction to matter
        (value.abs().trunc(), 0)
    };

    let digits = format!("{whole:.0}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if fraction > 0 {
        let frac = format!("{fraction:0width$}", width = MAX_FRACTION_DIGITS);
        grouped.push('.');
        grouped.push_str(frac.trim_end_matches('0'));
    }

    if value < 0.0 && (whole > 0.0 || fraction > 0) {
        grouped.insert(0, '-');
    }

    grouped
}

/// Maps a cosine-like score in `[-1, 1]` onto `[0, 1]`, clamping anything
/// outside. NaN is read as 0.
pub fn similarity_fraction(similarity: f64) -> f64 {
    let similarity = if similarity.is_nan() { 0.0 } else { similarity };
    ((similarity + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Integer percentage for the similarity bar.
pub fn normalize_similarity(similarity: f64) -> u8 {
    (similarity_fraction(similarity) * 100.0).round() as u8
}

pub fn format_similarity(similarity: f64) -> String {
    format!("{similarity:.3}")
}

pub fn weight_percent(weight: f64) -> u8 {
    if weight.is_nan() {
        return 0;
    }
    (weight.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: Value) -> EventMeta {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(Some(&json!(1234567))), "1,234,567");
        assert_eq!(format_currency(Some(&json!(500000.0))), "500,000");
        assert_eq!(format_currency(Some(&json!(999))), "999");
        assert_eq!(format_currency(Some(&json!(0))), "0");
    }

    #[test]
    fn currency_keeps_three_fraction_digits() {
        assert_eq!(format_currency(Some(&json!(1234.5))), "1,234.5");
        assert_eq!(format_currency(Some(&json!(0.12345))), "0.123");
        assert_eq!(format_currency(Some(&json!(2.0625))), "2.063");
        assert_eq!(format_currency(Some(&json!(-9876543.21))), "-9,876,543.21");
    }

    #[test]
    fn currency_blank_for_missing_or_non_numeric() {
        assert_eq!(format_currency(None), "");
        assert_eq!(format_currency(Some(&Value::Null)), "");
        assert_eq!(format_currency(Some(&json!("abc"))), "");
        assert_eq!(format_currency(Some(&json!({"a": 1}))), "");
        assert_eq!(format_currency(Some(&json!("NaN"))), "");
        assert_eq!(format_currency(Some(&json!("inf"))), "");
        assert_eq!(group_digits(-0.0001), "0");
    }

    #[test]
    fn currency_groups_values_near_f64_max() {
        let rendered = format_currency(Some(&json!(f64::MAX)));
        assert!(rendered.starts_with("179,769,313"), "{rendered}");
        assert!(!rendered.contains("inf"));
        assert!(!rendered.contains('.'));

        let negative = format_currency(Some(&json!(-1e306)));
        assert!(negative.starts_with('-'), "{negative}");
        assert!(negative.contains(',') && !negative.contains("inf"));
    }

    #[test]
    fn currency_accepts_numeric_strings() {
        assert_eq!(format_currency(Some(&json!("400000"))), "400,000");
    }

    #[test]
    fn similarity_anchor_points() {
        assert_eq!(normalize_similarity(-1.0), 0);
        assert_eq!(normalize_similarity(0.0), 50);
        assert_eq!(normalize_similarity(1.0), 100);
        assert_eq!(normalize_similarity(0.8), 90);
    }

    #[test]
    fn similarity_clamps_out_of_range() {
        assert_eq!(normalize_similarity(-3.5), 0);
        assert_eq!(normalize_similarity(7.0), 100);
        assert_eq!(normalize_similarity(f64::NAN), 50);
    }

    #[test]
    fn similarity_is_monotonic_on_unit_range() {
        let mut previous = 0u8;
        for step in 0..=200 {
            let s = -1.0 + step as f64 * 0.01;
            let pct = normalize_similarity(s);
            assert!(pct >= previous, "dropped at {s}: {pct} < {previous}");
            previous = pct;
        }
    }

    #[test]
    fn similarity_text_has_three_decimals() {
        assert_eq!(format_similarity(0.8), "0.800");
        assert_eq!(format_similarity(-0.12345), "-0.123");
    }

    #[test]
    fn weight_percent_rounds_and_clamps() {
        assert_eq!(weight_percent(0.456), 46);
        assert_eq!(weight_percent(1.5), 100);
        assert_eq!(weight_percent(f64::NAN), 0);
    }

    #[test]
    fn lookup_prefers_primary_key() {
        let record = meta(json!({"事業名": "道路整備", "jigyo_mei": "road"}));
        assert_eq!(lookup_field(&record, NAME_KEYS), Some(&json!("道路整備")));
    }

    #[test]
    fn lookup_falls_back_past_null_primary() {
        let record = meta(json!({"事業名": null, "jigyo_mei": "road", "tosho_yosan": 1200}));
        let reference = reference_from_meta(&record);
        assert_eq!(reference.name, "road");
        assert_eq!(reference.initial_budget, Some(json!(1200)));
    }

    #[test]
    fn reference_degrades_to_blank() {
        let reference = reference_from_meta(&EventMeta::new());
        assert_eq!(reference.name, "");
        assert!(reference.initial_budget.is_none());
        assert_eq!(format_currency(reference.initial_budget.as_ref()), "");
    }
}
