mod control;
mod expression;
mod package;

pub use control::{parse_control_block, ControlFields, RecordBlock, RecordBlocks};
pub use expression::{
    is_qualified_name, parse_dependency_list, parse_provides_list, strip_version_constraints,
    AlternativeMode, DependencyTerm,
};
pub use package::{
    Dependencies, PackageId, PackageRecord, PackageRef, Resolution, ResolvedDependency, StubId,
    STUB_ARCHITECTURE,
};

#[cfg(test)]
mod tests;
