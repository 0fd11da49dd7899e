//! Flattening of raw API records into single-level rows.
//!
//! The search endpoint nests classification pairs (`NAICS`, `PSC`) and
//! location pairs (`Recipient Location`, `Primary Place of Performance`)
//! inside each record. [`flatten`] replaces each nested object with named
//! scalar fields so every row exports cleanly to CSV. Every flattened record
//! carries the same derived field set regardless of which sub-objects the
//! source record had; missing or null sub-objects yield null derived fields.

use serde_json::Value;

use crate::api::RawRecord;

/// The derived scalar fields appended to every flattened record, in order.
pub const DERIVED_FIELDS: [&str; 8] = [
    "naics_code",
    "naics_description",
    "psc_code",
    "psc_description",
    "recipient_city",
    "recipient_state",
    "pop_city",
    "pop_state",
];

/// Flattens one raw record.
///
/// The four nested fields are removed; the remaining fields keep their
/// original order, and the eight derived fields are appended at the end.
#[must_use]
pub fn flatten(record: RawRecord) -> RawRecord {
    let mut out = RawRecord::new();
    let mut naics = None;
    let mut psc = None;
    let mut recipient_location = None;
    let mut place_of_performance = None;

    for (key, value) in record {
        match key.as_str() {
            "NAICS" => naics = Some(value),
            "PSC" => psc = Some(value),
            "Recipient Location" => recipient_location = Some(value),
            "Primary Place of Performance" => place_of_performance = Some(value),
            _ => {
                out.insert(key, value);
            }
        }
    }

    insert_pair(&mut out, "naics_code", "naics_description", naics, CODE_KEYS);
    insert_pair(&mut out, "psc_code", "psc_description", psc, CODE_KEYS);
    insert_pair(
        &mut out,
        "recipient_city",
        "recipient_state",
        recipient_location,
        LOCATION_KEYS,
    );
    insert_pair(
        &mut out,
        "pop_city",
        "pop_state",
        place_of_performance,
        LOCATION_KEYS,
    );

    out
}

/// Source keys inside a classification sub-object.
const CODE_KEYS: (&str, &str) = ("code", "description");

/// Source keys inside a location sub-object.
const LOCATION_KEYS: (&str, &str) = ("city_name", "state_code");

/// Copies one sub-object's pair of values into top-level fields.
///
/// A missing sub-object, a null, or a non-object value all produce null
/// derived fields (the endpoint sends null for records without the data).
fn insert_pair(
    out: &mut RawRecord,
    first_field: &str,
    second_field: &str,
    value: Option<Value>,
    source_keys: (&str, &str),
) {
    let object = match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    };
    let (first_key, second_key) = source_keys;
    let pick = |key: &str| {
        object
            .as_ref()
            .and_then(|map| map.get(key).cloned())
            .unwrap_or(Value::Null)
    };
    out.insert(first_field.to_string(), pick(first_key));
    out.insert(second_field.to_string(), pick(second_key));
}
