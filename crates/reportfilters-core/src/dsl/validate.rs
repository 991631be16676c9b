use crate::schema::field_catalog::{DefaultValue, FilterFieldDefinition, FilterFieldType};
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("report name must not be empty")]
    EmptyReportName,

    #[error("report '{0}' is already registered")]
    DuplicateReport(String),

    #[error("report '{0}' not found")]
    ReportNotFound(String),

    #[error("field #{position} has an empty fieldname")]
    EmptyFieldName { position: usize },

    #[error("fieldname '{fieldname}' has leading or trailing whitespace")]
    UntrimmedFieldName { fieldname: String },

    #[error("field '{fieldname}' has an empty label")]
    EmptyLabel { fieldname: String },

    #[error("duplicate fieldname '{fieldname}'")]
    DuplicateFieldName { fieldname: String },

    #[error("invalid options for field '{fieldname}': {reason}")]
    InvalidLinkOptions { fieldname: String, reason: String },

    #[error("invalid default for field '{fieldname}': {reason}")]
    InvalidDefault { fieldname: String, reason: String },

    #[error("unknown filter '{fieldname}'")]
    UnknownFilter { fieldname: String },

    #[error("required filter '{fieldname}' is not set")]
    MissingRequired { fieldname: String },

    #[error("invalid value for filter '{fieldname}': {reason}")]
    InvalidValue { fieldname: String, reason: String },

    #[error("date out of range while resolving default for field '{fieldname}'")]
    DateOutOfRange { fieldname: String },
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Checks a whole filter set before it is stored. The first violation wins.
pub fn validate_filter_set(report_name: &str, fields: &[FilterFieldDefinition]) -> Result<(), SchemaError> {
    if report_name.trim().is_empty() {
        return Err(SchemaError::EmptyReportName);
    }

    let mut seen = HashSet::with_capacity(fields.len());
    for (position, field) in fields.iter().enumerate() {
        if field.fieldname.trim().is_empty() {
            return Err(SchemaError::EmptyFieldName { position });
        }

        if field.fieldname.trim() != field.fieldname {
            return Err(SchemaError::UntrimmedFieldName {
                fieldname: field.fieldname.clone(),
            });
        }

        if !seen.insert(field.fieldname.as_str()) {
            return Err(SchemaError::DuplicateFieldName {
                fieldname: field.fieldname.clone(),
            });
        }

        validate_field(field)?;
    }

    Ok(())
}

pub fn validate_field(field: &FilterFieldDefinition) -> Result<(), SchemaError> {
    if field.label.trim().is_empty() {
        return Err(SchemaError::EmptyLabel {
            fieldname: field.fieldname.clone(),
        });
    }

    validate_link_options(field)?;

    if let Some(default) = &field.default {
        validate_default(field, default)?;
    }

    Ok(())
}

fn validate_link_options(field: &FilterFieldDefinition) -> Result<(), SchemaError> {
    let reason = match (field.fieldtype, field.link_target()) {
        (FilterFieldType::Link, None) => {
            "Link field must name its target entity type in options".to_string()
        }
        (ty @ (FilterFieldType::Data | FilterFieldType::Date), Some(options)) => {
            format!("{ty} field must not set options (got '{options}')")
        }
        _ => return Ok(()),
    };

    Err(SchemaError::InvalidLinkOptions {
        fieldname: field.fieldname.clone(),
        reason,
    })
}

fn validate_default(field: &FilterFieldDefinition, default: &DefaultValue) -> Result<(), SchemaError> {
    use FilterFieldType::*;

    let err = |reason: String| {
        Err(SchemaError::InvalidDefault {
            fieldname: field.fieldname.clone(),
            reason,
        })
    };

    match (field.fieldtype, default) {
        (Date, DefaultValue::Literal(raw)) => {
            if parse_date(raw).is_none() {
                return err(format!("expected a YYYY-MM-DD date, got '{raw}'"));
            }
        }
        (Date, _) => {}

        (Data | Link, DefaultValue::Literal(raw)) => {
            if raw.trim().is_empty() {
                return err("default must not be empty".to_string());
            }
        }
        (ty @ (Data | Link), relative) => {
            return err(format!(
                "'{}' resolves to a date but the field is {ty}",
                relative.as_str()
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_options_on_data_field_count_as_absent() {
        let field = FilterFieldDefinition::data("beneficiary_name", "Beneficiary Name").with_options("  ");
        assert_eq!(field.link_target(), None);
        assert_eq!(validate_field(&field), Ok(()));
    }

    #[test]
    fn padded_fieldname_is_rejected() {
        let err = validate_filter_set(
            "Test Report",
            &[
                FilterFieldDefinition::date("from_date", "From Date"),
                FilterFieldDefinition::date(" from_date", "Start Date"),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UntrimmedFieldName { fieldname: " from_date".into() }
        );
    }

    #[test]
    fn relative_default_on_link_field_is_rejected() {
        let field = FilterFieldDefinition::link("employee", "Employee", "Employee")
            .with_default(DefaultValue::Today);
        let err = validate_field(&field).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));
        assert!(err.to_string().contains("field is Link"));
    }

    #[test]
    fn parse_date_is_strict() {
        assert!(parse_date("2025-02-28").is_some());
        assert!(parse_date("2025-02-30").is_none());
        assert!(parse_date("28/02/2025").is_none());
    }
}
