use indexmap::IndexMap;
use serde_json::Value;

use crate::clock::Clock;
use crate::dsl::defaults::resolve_default;
use crate::dsl::validate::{parse_date, SchemaError};
use crate::dsl::value::FilterValue;
use crate::schema::field_catalog::{FilterFieldDefinition, FilterFieldType};
use crate::schema::filter_set::ReportFilterSet;

/// Builds the filter values a report run receives.
///
/// Supplied values win over defaults. `null` and blank strings count as
/// unset. A required field left unset without a default blocks the run.
pub fn prepare_filters(
    set: &ReportFilterSet,
    supplied: &IndexMap<String, Value>,
    clock: &dyn Clock,
) -> Result<IndexMap<String, FilterValue>, SchemaError> {
    if let Some(unknown) = supplied.keys().find(|k| set.field(k).is_none()) {
        return Err(SchemaError::UnknownFilter {
            fieldname: unknown.clone(),
        });
    }

    let today = clock.today();
    let mut out = IndexMap::new();

    for field in set.fields() {
        let value = match supplied.get(&field.fieldname) {
            Some(raw) => coerce_value(field, raw)?,
            None => None,
        };

        let value = match value {
            Some(v) => Some(v),
            None => resolve_default(field, today)?,
        };

        match value {
            Some(v) => {
                out.insert(field.fieldname.clone(), v);
            }
            None if field.required => {
                return Err(SchemaError::MissingRequired {
                    fieldname: field.fieldname.clone(),
                })
            }
            None => {}
        }
    }

    Ok(out)
}

fn coerce_value(field: &FilterFieldDefinition, v: &Value) -> Result<Option<FilterValue>, SchemaError> {
    let err = |reason: String| SchemaError::InvalidValue {
        fieldname: field.fieldname.clone(),
        reason,
    };

    let raw = match v {
        Value::Null => return Ok(None),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s,
        other => return Err(err(format!("expected string, got {other}"))),
    };

    match field.fieldtype {
        FilterFieldType::Date => parse_date(raw)
            .map(|d| Some(FilterValue::Date(d)))
            .ok_or_else(|| err(format!("expected a YYYY-MM-DD date, got '{raw}'"))),
        FilterFieldType::Data | FilterFieldType::Link => Ok(Some(FilterValue::Text(raw.clone()))),
    }
}
