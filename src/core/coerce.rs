use crate::domain::model::{ProductImage, ProductRecord, RawRecord};
use serde_json::Value;

/// Map one raw record onto the fixed product schema. Coercion is
/// partial: fields absent from the raw record stay unset, fields
/// outside the schema are dropped. It never fails; unparsable numeric
/// values default to 0 and unparsable flags to false.
pub fn coerce_record(raw: &RawRecord) -> ProductRecord {
    ProductRecord {
        name: string_field(raw, "name"),
        slug: string_field(raw, "slug"),
        sku: string_field(raw, "sku"),
        description: string_field(raw, "description"),
        category: string_field(raw, "category"),
        status: string_field(raw, "status"),
        price: decimal_field(raw, "price"),
        compare_price: decimal_field(raw, "comparePrice"),
        cost_price: decimal_field(raw, "costPrice"),
        weight: decimal_field(raw, "weight"),
        stock: integer_field(raw, "stock"),
        low_stock_threshold: integer_field(raw, "lowStockThreshold"),
        track_stock: flag_field(raw, "trackStock"),
        featured: flag_field(raw, "featured"),
        images: image_field(raw, "images"),
    }
}

fn present<'a>(raw: &'a RawRecord, key: &str) -> Option<&'a Value> {
    raw.data.get(key).filter(|value| !value.is_null())
}

/// String form of a scalar value. Non-scalar values in a scalar
/// position collapse to the empty string, which downstream coercion
/// turns into the field default.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

fn string_field(raw: &RawRecord, key: &str) -> Option<String> {
    present(raw, key).map(scalar_text)
}

fn decimal_field(raw: &RawRecord, key: &str) -> Option<f64> {
    present(raw, key).map(|value| scalar_text(value).trim().parse().unwrap_or(0.0))
}

fn integer_field(raw: &RawRecord, key: &str) -> Option<i64> {
    present(raw, key).map(|value| scalar_text(value).trim().parse().unwrap_or(0))
}

/// True iff the value's string form is the literal token `true`.
/// Anything else, including `TRUE`, is false.
fn flag_field(raw: &RawRecord, key: &str) -> Option<bool> {
    present(raw, key).map(|value| scalar_text(value) == "true")
}

/// Image lists arrive either as one `;`-separated string of URLs or,
/// from JSON uploads, as an already-typed list of strings or
/// `{url: ...}` objects. Empty segments are dropped, order preserved.
fn image_field(raw: &RawRecord, key: &str) -> Vec<ProductImage> {
    match present(raw, key) {
        Some(Value::String(text)) => text
            .split(';')
            .filter(|segment| !segment.is_empty())
            .map(|segment| ProductImage {
                url: segment.to_string(),
            })
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(url) if !url.is_empty() => Some(url.clone()),
                Value::Object(fields) => fields
                    .get("url")
                    .and_then(Value::as_str)
                    .filter(|url| !url.is_empty())
                    .map(str::to_string),
                _ => None,
            })
            .map(|url| ProductImage { url })
            .collect(),
        _ => Vec::new(),
    }
}
