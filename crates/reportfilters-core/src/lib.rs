//! Report filter schemas: typed filter definitions per report, validated at
//! registration, with clock-relative defaults resolved on demand.

pub mod clock;
pub mod dsl;
pub mod schema;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dsl::validate::SchemaError;
pub use dsl::value::FilterValue;
pub use schema::field_catalog::{DefaultValue, FilterFieldDefinition, FilterFieldType};
pub use schema::filter_set::{ReportFilterSet, Translate, Untranslated};
pub use schema::registry::{
    unknown_descriptor_keys, FilterRegistry, RegistryBuilder, ReportFile, ReportIndex, SharedRegistry,
};
