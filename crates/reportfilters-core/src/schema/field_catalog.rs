use serde::{Deserialize, Serialize};
use std::fmt;

/// Input widget type of a report filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterFieldType {
    /// Free text.
    Data,
    Date,
    /// Identifier of an instance of another entity type, named by `options`.
    Link,
}

impl FilterFieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "Data",
            Self::Date => "Date",
            Self::Link => "Link",
        }
    }
}

impl fmt::Display for FilterFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default expression of a filter field.
///
/// Relative dates are kept symbolic and only turned into a concrete date when
/// a report is opened (see [`crate::dsl::defaults`]). On the wire every
/// variant is a plain string: `month_start`, `month_end`, `today`, or the
/// literal value itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DefaultValue {
    MonthStart,
    MonthEnd,
    Today,
    Literal(String),
}

impl DefaultValue {
    pub const MONTH_START: &'static str = "month_start";
    pub const MONTH_END: &'static str = "month_end";
    pub const TODAY: &'static str = "today";

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::MonthStart => Self::MONTH_START,
            Self::MonthEnd => Self::MONTH_END,
            Self::Today => Self::TODAY,
            Self::Literal(v) => v.as_str(),
        }
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::MONTH_START => Self::MonthStart,
            Self::MONTH_END => Self::MonthEnd,
            Self::TODAY => Self::Today,
            _ => Self::Literal(value),
        }
    }
}

impl From<DefaultValue> for String {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Literal(v) => v,
            other => other.as_str().to_string(),
        }
    }
}

/// Keys of the host descriptor shape. Hosts may carry others; those are ignored on load.
pub const DESCRIPTOR_KEYS: &[&str] = &["fieldname", "label", "fieldtype", "options", "default", "reqd"];

/// One filter field, in the descriptor shape the reporting host consumes:
/// `{fieldname, label, fieldtype, options?, default?, reqd?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterFieldDefinition {
    pub fieldname: String,
    /// Untranslated label; the host translates it keyed by this exact string.
    pub label: String,
    pub fieldtype: FilterFieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(
        rename = "reqd",
        default,
        with = "reqd_flag",
        skip_serializing_if = "is_false"
    )]
    pub required: bool,
}

impl FilterFieldDefinition {
    fn new(fieldname: impl Into<String>, label: impl Into<String>, fieldtype: FilterFieldType) -> Self {
        Self {
            fieldname: fieldname.into(),
            label: label.into(),
            fieldtype,
            options: None,
            default: None,
            required: false,
        }
    }

    pub fn data(fieldname: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(fieldname, label, FilterFieldType::Data)
    }

    pub fn date(fieldname: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(fieldname, label, FilterFieldType::Date)
    }

    pub fn link(
        fieldname: impl Into<String>,
        label: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            options: Some(target.into()),
            ..Self::new(fieldname, label, FilterFieldType::Link)
        }
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// `options` with blank values treated as absent.
    pub fn link_target(&self) -> Option<&str> {
        self.options.as_deref().map(str::trim).filter(|o| !o.is_empty())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// `reqd` is `0|1` on the wire; booleans are accepted on input too.
mod reqd_flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Int(u64),
        }

        match Flag::deserialize(deserializer)? {
            Flag::Bool(b) => Ok(b),
            Flag::Int(0) => Ok(false),
            Flag::Int(1) => Ok(true),
            Flag::Int(n) => Err(de::Error::custom(format!("reqd must be 0 or 1, got {n}"))),
        }
    }
}
