use serde::Serialize;

use crate::dsl::validate::{validate_filter_set, SchemaError};
use crate::schema::field_catalog::FilterFieldDefinition;

/// Label lookup supplied by the host. Keys are the untranslated English labels.
pub trait Translate {
    fn translate(&self, text: &str) -> String;
}

/// Leaves labels as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct Untranslated;

impl Translate for Untranslated {
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}

impl<F> Translate for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, text: &str) -> String {
        self(text)
    }
}

/// The validated, ordered filters of one report.
///
/// Only constructible through [`ReportFilterSet::new`], so every instance
/// satisfies the filter invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFilterSet {
    report_name: String,
    #[serde(rename = "filters")]
    fields: Vec<FilterFieldDefinition>,
}

impl ReportFilterSet {
    /// Validates `fields` and stores them. Blank `options` are stored as absent.
    pub fn new(report_name: impl Into<String>, mut fields: Vec<FilterFieldDefinition>) -> Result<Self, SchemaError> {
        let report_name = report_name.into();
        validate_filter_set(&report_name, &fields)?;

        for field in &mut fields {
            if field.link_target().is_none() {
                field.options = None;
            }
        }

        Ok(Self { report_name, fields })
    }

    pub fn report_name(&self) -> &str {
        &self.report_name
    }

    /// Fields in presentation order.
    pub fn fields(&self) -> &[FilterFieldDefinition] {
        &self.fields
    }

    pub fn field(&self, fieldname: &str) -> Option<&FilterFieldDefinition> {
        self.fields.iter().find(|f| f.fieldname == fieldname)
    }

    /// Label strings the host must run through its translation lookup.
    pub fn translatable_labels(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.label.as_str()).collect()
    }

    /// Host descriptors with labels passed through `translator`.
    pub fn descriptors(&self, translator: &dyn Translate) -> Vec<FilterFieldDefinition> {
        self.fields
            .iter()
            .map(|f| FilterFieldDefinition {
                label: translator.translate(&f.label),
                ..f.clone()
            })
            .collect()
    }
}
