use std::collections::HashMap;

use depwalker_core::{PackageRecord, StubId};

#[derive(Debug, Clone, Default)]
pub struct StubRegistry {
    stubs: Vec<PackageRecord>,
    by_name: HashMap<String, StubId>,
}

impl StubRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_insert(&mut self, name: &str) -> StubId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }

        let id = StubId(self.stubs.len());
        self.stubs.push(PackageRecord::stub(name));
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn find(&self, name: &str) -> Option<StubId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: StubId) -> Option<&PackageRecord> {
        self.stubs.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StubId, &PackageRecord)> {
        self.stubs
            .iter()
            .enumerate()
            .map(|(index, record)| (StubId(index), record))
    }
}
