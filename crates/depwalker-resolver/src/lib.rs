mod index;
mod resolve;
mod stubs;
mod types;
mod universe;

pub use index::PackageIndex;
pub use resolve::{resolve_package, resolve_term, resolve_terms};
pub use stubs::StubRegistry;
pub use types::GraphStats;
pub use universe::PackageUniverse;
