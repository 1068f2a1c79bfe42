use anyhow::{anyhow, Context, Result};
use depwalker_core::{DependencyTerm, PackageRef, Resolution};
use depwalker_resolver::{GraphStats, PackageUniverse};
use serde::Serialize;

pub(crate) fn format_stats_lines(stats: &GraphStats) -> Vec<String> {
    vec![
        format!("Parsed {} packages in total.", stats.packages),
        format!("We have {} packages in the main list.", stats.unique_names),
        format!(
            "We have {} packages provided by other package.",
            stats.provided_names
        ),
        format!("We have {} stub packages in the main list.", stats.stubs),
        format!(
            "Resolved {} dependency edges: {} by name, {} by provides, {} to stubs.",
            stats.edges(),
            stats.edges_by_name,
            stats.edges_by_provides,
            stats.edges_to_stubs
        ),
        format!(
            "Skipped {} architecture-qualified dependencies.",
            stats.skipped_terms
        ),
    ]
}

pub(crate) fn render_stats_json(stats: &GraphStats) -> Result<String> {
    serde_json::to_string_pretty(stats).context("failed to serialize graph statistics")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct DependencyView {
    pub(crate) name: String,
    pub(crate) target: String,
    pub(crate) via: Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PackageView {
    pub(crate) name: String,
    pub(crate) architecture: String,
    pub(crate) is_stub: bool,
    pub(crate) provides: Vec<String>,
    pub(crate) dependencies: Vec<DependencyView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) unresolved: Vec<DependencyTerm>,
    pub(crate) dependents: Vec<String>,
}

pub(crate) fn build_package_view(universe: &PackageUniverse, name: &str) -> Result<PackageView> {
    let target = universe
        .index()
        .by_name(name)
        .map(PackageRef::Package)
        .or_else(|| universe.stubs().find(name).map(PackageRef::Stub))
        .ok_or_else(|| anyhow!("no package or stub named '{name}'"))?;
    let record = universe
        .record(target)
        .ok_or_else(|| anyhow!("internal graph error for package '{name}'"))?;

    let mut dependencies = Vec::new();
    for entry in record.dependencies.resolved().unwrap_or_default() {
        let resolved = universe
            .record(entry.target)
            .ok_or_else(|| anyhow!("dangling dependency '{}' of '{name}'", entry.name))?;
        dependencies.push(DependencyView {
            name: entry.name.clone(),
            target: resolved.name.clone(),
            via: entry.via,
        });
    }

    let dependents = universe
        .dependents_of(target)
        .into_iter()
        .filter_map(|id| universe.index().get(id))
        .map(|dependent| dependent.name.clone())
        .collect();

    Ok(PackageView {
        name: record.name.clone(),
        architecture: record.architecture.clone(),
        is_stub: record.is_stub,
        provides: record.provides.clone(),
        dependencies,
        unresolved: record.dependencies.terms().unwrap_or_default().to_vec(),
        dependents,
    })
}

pub(crate) fn format_package_view_lines(view: &PackageView) -> Vec<String> {
    let mut lines = vec![format!("Package: {}", view.name)];
    if view.is_stub {
        lines.push("Stub: yes (not present in the collection)".to_string());
    }
    lines.push(format!("Architecture: {}", view.architecture));
    if !view.provides.is_empty() {
        lines.push(format!("Provides: {}", view.provides.join(", ")));
    }

    if !view.dependencies.is_empty() {
        lines.push("Depends:".to_string());
        for dependency in &view.dependencies {
            let via = resolution_label(dependency.via);
            if dependency.name == dependency.target {
                lines.push(format!("  {} ({via})", dependency.name));
            } else {
                lines.push(format!(
                    "  {} -> {} ({via})",
                    dependency.name, dependency.target
                ));
            }
        }
    }

    if !view.dependents.is_empty() {
        lines.push(format!("Required by: {}", view.dependents.join(", ")));
    }
    lines
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct StubView {
    pub(crate) name: String,
    pub(crate) dependents: Vec<String>,
}

pub(crate) fn build_stub_views(universe: &PackageUniverse) -> Vec<StubView> {
    let mut views = universe
        .stubs()
        .iter()
        .map(|(id, stub)| StubView {
            name: stub.name.clone(),
            dependents: universe
                .dependents_of(PackageRef::Stub(id))
                .into_iter()
                .filter_map(|dependent| universe.index().get(dependent))
                .map(|record| record.name.clone())
                .collect(),
        })
        .collect::<Vec<_>>();
    views.sort_by(|left, right| left.name.cmp(&right.name));
    views
}

pub(crate) fn format_stub_lines(views: &[StubView]) -> Vec<String> {
    views
        .iter()
        .map(|view| format!("{}: {}", view.name, view.dependents.join(", ")))
        .collect()
}

pub(crate) fn render_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize report")
}

fn resolution_label(via: Resolution) -> &'static str {
    match via {
        Resolution::Name => "name",
        Resolution::Provides => "provides",
        Resolution::Stub => "stub",
    }
}
