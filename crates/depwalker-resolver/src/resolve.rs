use depwalker_core::{
    is_qualified_name, Dependencies, DependencyTerm, PackageId, PackageRef, Resolution,
    ResolvedDependency,
};

use crate::index::PackageIndex;
use crate::stubs::StubRegistry;

pub fn resolve_term(
    index: &PackageIndex,
    stubs: &mut StubRegistry,
    term: &DependencyTerm,
    dependent: &str,
) -> Option<ResolvedDependency> {
    match term {
        DependencyTerm::Single(name) => {
            if is_qualified_name(name) {
                tracing::debug!(
                    dependency = %name,
                    package = dependent,
                    "skipping qualified dependency"
                );
                return None;
            }
            Some(lookup(index, name).unwrap_or_else(|| stub_dependency(stubs, name, dependent)))
        }
        DependencyTerm::AlternativeGroup(names) => {
            let mut last_examined: Option<&str> = None;
            for name in names {
                if is_qualified_name(name) {
                    tracing::debug!(
                        dependency = %name,
                        package = dependent,
                        "skipping qualified alternative"
                    );
                    continue;
                }
                last_examined = Some(name);
                if let Some(found) = lookup(index, name) {
                    return Some(found);
                }
            }
            last_examined.map(|name| stub_dependency(stubs, name, dependent))
        }
    }
}

pub fn resolve_terms(
    index: &PackageIndex,
    stubs: &mut StubRegistry,
    terms: &[DependencyTerm],
    dependent: &str,
) -> Vec<ResolvedDependency> {
    terms
        .iter()
        .filter_map(|term| resolve_term(index, stubs, term, dependent))
        .collect()
}

// Returns the number of terms that produced no edge, or `None` when the
// record was already resolved.
pub fn resolve_package(
    index: &mut PackageIndex,
    stubs: &mut StubRegistry,
    id: PackageId,
) -> Option<usize> {
    let record = index.get_mut(id)?;
    let terms = record.take_unresolved()?;
    let dependent = record.name.clone();

    let entries = resolve_terms(index, stubs, &terms, &dependent);
    let skipped = terms.len() - entries.len();
    if let Some(record) = index.get_mut(id) {
        record.dependencies = Dependencies::Resolved(entries);
    }
    Some(skipped)
}

fn lookup(index: &PackageIndex, name: &str) -> Option<ResolvedDependency> {
    index.lookup(name).map(|(id, via)| ResolvedDependency {
        name: name.to_string(),
        target: PackageRef::Package(id),
        via,
    })
}

fn stub_dependency(stubs: &mut StubRegistry, name: &str, dependent: &str) -> ResolvedDependency {
    let existed = stubs.find(name).is_some();
    let id = stubs.get_or_insert(name);
    if !existed {
        tracing::debug!(
            dependency = name,
            package = dependent,
            "dependency not present in the collection, adding stub package"
        );
    }
    ResolvedDependency {
        name: name.to_string(),
        target: PackageRef::Stub(id),
        via: Resolution::Stub,
    }
}
