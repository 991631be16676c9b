use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Context;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::clock::Clock;
use crate::dsl::defaults::resolve_defaults;
use crate::dsl::prepare::prepare_filters;
use crate::dsl::validate::SchemaError;
use crate::dsl::value::FilterValue;
use crate::schema::field_catalog::{FilterFieldDefinition, DESCRIPTOR_KEYS};
use crate::schema::filter_set::ReportFilterSet;

/// Index file listing report definition files, relative to the index itself.
#[derive(Debug, Deserialize)]
pub struct ReportIndex {
    pub reports: Vec<PathBuf>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl ReportIndex {
    pub fn read(index_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let index_path = index_path.as_ref();
        let raw = std::fs::read_to_string(index_path)
            .with_context(|| format!("read report index: {}", index_path.display()))?;
        let mut index: ReportIndex = serde_json::from_str(&raw)
            .with_context(|| format!("parse report index: {}", index_path.display()))?;
        index.base_dir = index_path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(index)
    }

    pub fn report_paths(&self) -> Vec<PathBuf> {
        self.reports.iter().map(|p| self.base_dir.join(p)).collect()
    }
}

/// One report definition file.
#[derive(Debug, Deserialize)]
pub struct ReportFile {
    pub report_name: String,
    pub filters: Vec<FilterFieldDefinition>,
}

impl ReportFile {
    pub fn read(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::read_with_unknown_keys(path).map(|(file, _)| file)
    }

    /// Like [`ReportFile::read`], also returning the descriptor keys outside
    /// the host shape as `fieldname.key`.
    pub fn read_with_unknown_keys(path: impl AsRef<Path>) -> anyhow::Result<(Self, Vec<String>)> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read report file: {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("parse report file: {}", path.display()))?;
        let unknown = unknown_descriptor_keys(&value);
        let file = serde_json::from_value(value)
            .with_context(|| format!("parse report file: {}", path.display()))?;
        Ok((file, unknown))
    }
}

/// Keys of each entry in `filters` that are not part of the descriptor shape.
pub fn unknown_descriptor_keys(report_file: &Value) -> Vec<String> {
    let Some(filters) = report_file.get("filters").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut unknown = Vec::new();
    for (position, descriptor) in filters.iter().enumerate() {
        let Some(object) = descriptor.as_object() else {
            continue;
        };
        let fieldname = object
            .get("fieldname")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{position}"));

        for key in object.keys().filter(|k| !DESCRIPTOR_KEYS.contains(&k.as_str())) {
            unknown.push(format!("{fieldname}.{key}"));
        }
    }
    unknown
}

/// Collects filter sets during startup. Freeze with [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    reports: IndexMap<String, ReportFilterSet>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a report's filters.
    ///
    /// Registering a name twice is an error and leaves the first set in place.
    pub fn register(
        &mut self,
        report_name: impl Into<String>,
        fields: Vec<FilterFieldDefinition>,
    ) -> Result<(), SchemaError> {
        let report_name = report_name.into();
        if self.reports.contains_key(&report_name) {
            tracing::warn!(report = %report_name, "rejected duplicate report registration");
            return Err(SchemaError::DuplicateReport(report_name));
        }

        let set = ReportFilterSet::new(report_name.clone(), fields)?;
        tracing::debug!(report = %report_name, fields = set.fields().len(), "registered report filters");
        self.reports.insert(report_name, set);
        Ok(())
    }

    pub fn build(self) -> FilterRegistry {
        FilterRegistry { reports: self.reports }
    }
}

/// Immutable map from report name to its filter set, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRegistry {
    reports: IndexMap<String, ReportFilterSet>,
}

impl FilterRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Builds a registry from an index file and the report files it lists.
    pub fn load(index_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let index_path = index_path.as_ref();
        let index = ReportIndex::read(index_path)?;

        let mut builder = RegistryBuilder::new();
        for path in index.report_paths() {
            let file = ReportFile::read(&path)?;
            builder
                .register(file.report_name, file.filters)
                .with_context(|| format!("register report from {}", path.display()))?;
        }

        let registry = builder.build();
        tracing::info!(index = %index_path.display(), reports = registry.len(), "loaded report filter registry");
        Ok(registry)
    }

    pub fn get(&self, report_name: &str) -> Option<&ReportFilterSet> {
        self.reports.get(report_name)
    }

    pub fn lookup(&self, report_name: &str) -> Result<&ReportFilterSet, SchemaError> {
        self.get(report_name)
            .ok_or_else(|| SchemaError::ReportNotFound(report_name.to_string()))
    }

    pub fn resolve_defaults(
        &self,
        report_name: &str,
        clock: &dyn Clock,
    ) -> Result<IndexMap<String, FilterValue>, SchemaError> {
        resolve_defaults(self.lookup(report_name)?, clock)
    }

    pub fn prepare_filters(
        &self,
        report_name: &str,
        supplied: &IndexMap<String, Value>,
        clock: &dyn Clock,
    ) -> Result<IndexMap<String, FilterValue>, SchemaError> {
        prepare_filters(self.lookup(report_name)?, supplied, clock)
    }

    pub fn report_names(&self) -> impl Iterator<Item = &str> {
        self.reports.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Registry holder for hot reload. Readers take a snapshot and keep using it;
/// a replacement is published in one swap.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    current: Arc<RwLock<Arc<FilterRegistry>>>,
}

impl SharedRegistry {
    pub fn new(registry: FilterRegistry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    pub fn snapshot(&self) -> Arc<FilterRegistry> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Publishes `registry` and returns the one it replaced.
    pub fn replace(&self, registry: FilterRegistry) -> Arc<FilterRegistry> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::reports::{builtin_registry, BENEFICIARY_PAYMENT_REPORT};

    #[test]
    fn snapshot_outlives_replacement() {
        let shared = SharedRegistry::new(builtin_registry().unwrap());
        let before = shared.snapshot();

        let previous = shared.replace(FilterRegistry::default());

        assert!(Arc::ptr_eq(&before, &previous));
        assert!(before.get(BENEFICIARY_PAYMENT_REPORT).is_some());
        assert!(shared.snapshot().is_empty());
    }

    #[test]
    fn concurrent_readers_see_whole_registries() {
        let shared = SharedRegistry::new(builtin_registry().unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let len = shared.snapshot().len();
                        assert!(len == 0 || len == 2, "observed partial registry of {len}");
                    }
                })
            })
            .collect();

        for i in 0..50 {
            let next = if i % 2 == 0 { FilterRegistry::default() } else { builtin_registry().unwrap() };
            shared.replace(next);
        }

        for r in readers {
            r.join().unwrap();
        }
    }
}
