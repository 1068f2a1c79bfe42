use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub packages: usize,
    pub unique_names: usize,
    pub provided_names: usize,
    pub stubs: usize,
    pub edges_by_name: usize,
    pub edges_by_provides: usize,
    pub edges_to_stubs: usize,
    pub skipped_terms: usize,
}

impl GraphStats {
    pub fn edges(&self) -> usize {
        self.edges_by_name + self.edges_by_provides + self.edges_to_stubs
    }
}
