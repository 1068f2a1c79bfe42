use std::io::BufRead;

use anyhow::{bail, Context, Result};
use depwalker_core::{
    parse_control_block, AlternativeMode, PackageId, PackageRecord, PackageRef, RecordBlock,
    RecordBlocks, Resolution,
};

use crate::index::PackageIndex;
use crate::resolve::resolve_package;
use crate::stubs::StubRegistry;
use crate::types::GraphStats;

#[derive(Debug, Clone, Default)]
pub struct PackageUniverse {
    index: PackageIndex,
    stubs: StubRegistry,
    resolution_started: bool,
    skipped_terms: usize,
}

impl PackageUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: PackageRecord) -> Result<PackageId> {
        if self.resolution_started {
            bail!(
                "cannot add package '{}' after dependency resolution has started",
                record.name
            );
        }
        if record.is_stub {
            bail!("stub package '{}' cannot be indexed", record.name);
        }
        Ok(self.index.insert(record))
    }

    pub fn ingest_block(
        &mut self,
        block: &RecordBlock,
        mode: AlternativeMode,
    ) -> Result<PackageId> {
        let record = parse_control_block(&block.content)
            .and_then(|fields| PackageRecord::from_fields(&fields, mode))
            .with_context(|| format!("invalid package record at line {}", block.first_line))?;
        self.insert(record)
    }

    pub fn ingest_reader<R, F>(
        &mut self,
        reader: R,
        mode: AlternativeMode,
        mut on_record: F,
    ) -> Result<usize>
    where
        R: BufRead,
        F: FnMut(&PackageRecord),
    {
        let mut count = 0;
        for block in RecordBlocks::new(reader) {
            let block = block?;
            let id = self.ingest_block(&block, mode)?;
            if let Some(record) = self.index.get(id) {
                on_record(record);
            }
            count += 1;
        }
        tracing::info!(records = count, "indexed package records");
        Ok(count)
    }

    pub fn resolve_all(&mut self) -> usize {
        self.resolve_all_with(|_, _| {})
    }

    pub fn resolve_all_with<F>(&mut self, mut progress: F) -> usize
    where
        F: FnMut(usize, usize),
    {
        self.resolution_started = true;
        let total = self.index.len();
        let mut resolved = 0;

        for position in 0..total {
            let id = PackageId(position);
            if let Some(skipped) = resolve_package(&mut self.index, &mut self.stubs, id) {
                self.skipped_terms += skipped;
                resolved += 1;
            }
            progress(position + 1, total);
        }

        tracing::info!(
            resolved,
            stubs = self.stubs.len(),
            "finished building the dependency graph"
        );
        resolved
    }

    pub fn index(&self) -> &PackageIndex {
        &self.index
    }

    pub fn stubs(&self) -> &StubRegistry {
        &self.stubs
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution_started
            && self
                .index
                .iter()
                .all(|(_, record)| record.dependencies.is_resolved())
    }

    pub fn record(&self, target: PackageRef) -> Option<&PackageRecord> {
        match target {
            PackageRef::Package(id) => self.index.get(id),
            PackageRef::Stub(id) => self.stubs.get(id),
        }
    }

    pub fn find(&self, name: &str) -> Option<PackageRef> {
        self.index
            .lookup(name)
            .map(|(id, _)| PackageRef::Package(id))
            .or_else(|| self.stubs.find(name).map(PackageRef::Stub))
    }

    pub fn dependents_of(&self, target: PackageRef) -> Vec<PackageId> {
        self.index
            .iter()
            .filter(|(_, record)| {
                record
                    .dependencies
                    .resolved()
                    .is_some_and(|entries| entries.iter().any(|entry| entry.target == target))
            })
            .map(|(id, _)| id)
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            packages: self.index.len(),
            unique_names: self.index.name_count(),
            provided_names: self.index.provided_name_count(),
            stubs: self.stubs.len(),
            skipped_terms: self.skipped_terms,
            ..GraphStats::default()
        };

        for (_, record) in self.index.iter() {
            for entry in record.dependencies.resolved().unwrap_or_default() {
                match entry.via {
                    Resolution::Name => stats.edges_by_name += 1,
                    Resolution::Provides => stats.edges_by_provides += 1,
                    Resolution::Stub => stats.edges_to_stubs += 1,
                }
            }
        }
        stats
    }
}
