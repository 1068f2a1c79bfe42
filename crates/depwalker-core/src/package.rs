use anyhow::{Context, Result};
use serde::Serialize;

use crate::control::{parse_control_block, ControlFields};
use crate::expression::{
    parse_dependency_list, parse_provides_list, AlternativeMode, DependencyTerm,
};

pub const STUB_ARCHITECTURE: &str = "any";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PackageId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StubId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum PackageRef {
    Package(PackageId),
    Stub(StubId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Name,
    Provides,
    Stub,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    pub name: String,
    pub target: PackageRef,
    pub via: Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "entries", rename_all = "lowercase")]
pub enum Dependencies {
    Unresolved(Vec<DependencyTerm>),
    Resolved(Vec<ResolvedDependency>),
}

impl Dependencies {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn terms(&self) -> Option<&[DependencyTerm]> {
        match self {
            Self::Unresolved(terms) => Some(terms),
            Self::Resolved(_) => None,
        }
    }

    pub fn resolved(&self) -> Option<&[ResolvedDependency]> {
        match self {
            Self::Unresolved(_) => None,
            Self::Resolved(entries) => Some(entries),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRecord {
    pub name: String,
    pub architecture: String,
    pub dependencies: Dependencies,
    pub provides: Vec<String>,
    pub is_stub: bool,
}

impl PackageRecord {
    pub fn new(
        name: impl Into<String>,
        architecture: impl Into<String>,
        dependencies: Vec<DependencyTerm>,
        provides: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            architecture: architecture.into(),
            dependencies: Dependencies::Unresolved(dependencies),
            provides,
            is_stub: false,
        }
    }

    pub fn stub(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architecture: STUB_ARCHITECTURE.to_string(),
            dependencies: Dependencies::Resolved(Vec::new()),
            provides: Vec::new(),
            is_stub: true,
        }
    }

    pub fn from_fields(fields: &ControlFields, mode: AlternativeMode) -> Result<Self> {
        let name = fields.require("Package")?;
        let architecture = fields
            .require("Architecture")
            .with_context(|| format!("package '{name}' is incomplete"))?;
        let dependencies = fields
            .get("Depends")
            .map(|raw| parse_dependency_list(raw, mode))
            .unwrap_or_default();
        let provides = fields
            .get("Provides")
            .map(parse_provides_list)
            .unwrap_or_default();

        Ok(Self::new(name, architecture, dependencies, provides))
    }

    pub fn from_control_str(input: &str, mode: AlternativeMode) -> Result<Self> {
        let fields = parse_control_block(input).context("failed to parse control record")?;
        Self::from_fields(&fields, mode)
    }

    pub fn take_unresolved(&mut self) -> Option<Vec<DependencyTerm>> {
        match &mut self.dependencies {
            Dependencies::Unresolved(terms) => Some(std::mem::take(terms)),
            Dependencies::Resolved(_) => None,
        }
    }
}
