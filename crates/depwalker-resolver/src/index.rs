use std::collections::HashMap;

use depwalker_core::{PackageId, PackageRecord, Resolution};

#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    records: Vec<PackageRecord>,
    by_name: HashMap<String, PackageId>,
    by_provided_name: HashMap<String, PackageId>,
}

impl PackageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: PackageRecord) -> PackageId {
        let id = PackageId(self.records.len());

        if let Some(previous) = self.by_name.insert(record.name.clone(), id) {
            tracing::warn!(
                package = %record.name,
                previous = previous.0,
                "duplicate package name, keeping the later record"
            );
        }
        for provided in &record.provides {
            let Some(previous) = self.by_provided_name.insert(provided.clone(), id) else {
                continue;
            };
            // a record may repeat its own provided name
            if previous == id {
                continue;
            }
            let previous_name = self
                .records
                .get(previous.0)
                .map(|earlier| earlier.name.as_str())
                .unwrap_or_default();
            tracing::warn!(
                provided = %provided,
                previous = %previous_name,
                package = %record.name,
                "provided name declared by more than one package, keeping the later one"
            );
        }

        self.records.push(record);
        id
    }

    pub fn get(&self, id: PackageId) -> Option<&PackageRecord> {
        self.records.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: PackageId) -> Option<&mut PackageRecord> {
        self.records.get_mut(id.0)
    }

    pub fn by_name(&self, name: &str) -> Option<PackageId> {
        self.by_name.get(name).copied()
    }

    pub fn by_provided_name(&self, name: &str) -> Option<PackageId> {
        self.by_provided_name.get(name).copied()
    }

    pub fn lookup(&self, name: &str) -> Option<(PackageId, Resolution)> {
        self.by_name(name)
            .map(|id| (id, Resolution::Name))
            .or_else(|| self.by_provided_name(name).map(|id| (id, Resolution::Provides)))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    pub fn provided_name_count(&self) -> usize {
        self.by_provided_name.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PackageId, &PackageRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| (PackageId(index), record))
    }
}
