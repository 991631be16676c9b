//! Evaluation of filter defaults against a clock.
//!
//! Filter sets only store symbolic defaults; the concrete values depend on the
//! day the report is opened and are computed here.

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;

use crate::clock::Clock;
use crate::dsl::validate::{parse_date, SchemaError};
use crate::dsl::value::FilterValue;
use crate::schema::field_catalog::{DefaultValue, FilterFieldDefinition, FilterFieldType};
use crate::schema::filter_set::ReportFilterSet;

pub fn month_start(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

pub fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year().checked_add(1)?, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

/// Resolves one field's default as of `today`. `Ok(None)` when the field has no default.
pub fn resolve_default(
    field: &FilterFieldDefinition,
    today: NaiveDate,
) -> Result<Option<FilterValue>, SchemaError> {
    let Some(default) = &field.default else {
        return Ok(None);
    };

    let out_of_range = || SchemaError::DateOutOfRange {
        fieldname: field.fieldname.clone(),
    };

    let value = match (field.fieldtype, default) {
        (FilterFieldType::Date, DefaultValue::Today) => FilterValue::Date(today),
        (FilterFieldType::Date, DefaultValue::MonthStart) => {
            FilterValue::Date(month_start(today).ok_or_else(out_of_range)?)
        }
        (FilterFieldType::Date, DefaultValue::MonthEnd) => {
            FilterValue::Date(month_end(today).ok_or_else(out_of_range)?)
        }
        (FilterFieldType::Date, DefaultValue::Literal(raw)) => {
            let date = parse_date(raw).ok_or_else(|| SchemaError::InvalidDefault {
                fieldname: field.fieldname.clone(),
                reason: format!("expected a YYYY-MM-DD date, got '{raw}'"),
            })?;
            FilterValue::Date(date)
        }
        (FilterFieldType::Data | FilterFieldType::Link, DefaultValue::Literal(raw)) => {
            FilterValue::Text(raw.clone())
        }
        (ty, relative) => {
            return Err(SchemaError::InvalidDefault {
                fieldname: field.fieldname.clone(),
                reason: format!("'{}' resolves to a date but the field is {ty}", relative.as_str()),
            })
        }
    };

    Ok(Some(value))
}

/// Resolves every default of `set` in field order, omitting fields without one.
pub fn resolve_defaults(
    set: &ReportFilterSet,
    clock: &dyn Clock,
) -> Result<IndexMap<String, FilterValue>, SchemaError> {
    let today = clock.today();
    let mut out = IndexMap::new();

    for field in set.fields() {
        if let Some(value) = resolve_default(field, today)? {
            out.insert(field.fieldname.clone(), value);
        }
    }

    tracing::debug!(report = set.report_name(), %today, resolved = out.len(), "resolved filter defaults");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_end_rolls_over_december() {
        assert_eq!(month_end(ymd(2024, 12, 5)), Some(ymd(2024, 12, 31)));
        assert_eq!(month_start(ymd(2024, 12, 5)), Some(ymd(2024, 12, 1)));
    }

    #[test]
    fn month_end_handles_leap_february() {
        assert_eq!(month_end(ymd(2024, 2, 10)), Some(ymd(2024, 2, 29)));
        assert_eq!(month_end(ymd(2025, 2, 10)), Some(ymd(2025, 2, 28)));
        assert_eq!(month_end(ymd(2100, 2, 1)), Some(ymd(2100, 2, 28)));
    }

    #[test]
    fn month_end_past_the_calendar_limit_is_none() {
        assert_eq!(month_end(NaiveDate::MAX), None);
    }

    #[test]
    fn literal_text_default_is_returned_verbatim() {
        let field = FilterFieldDefinition::link("company", "Company", "Company")
            .with_default(DefaultValue::literal("Acme Ltd"));
        let value = resolve_default(&field, ymd(2025, 3, 15)).unwrap();
        assert_eq!(value, Some(FilterValue::Text("Acme Ltd".into())));
    }

    #[test]
    fn today_default_tracks_the_clock() {
        let field = FilterFieldDefinition::date("as_of", "As Of").with_default(DefaultValue::Today);
        assert_eq!(
            resolve_default(&field, ymd(2025, 7, 4)).unwrap(),
            Some(FilterValue::Date(ymd(2025, 7, 4)))
        );
    }
}
