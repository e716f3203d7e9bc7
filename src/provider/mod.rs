// Data-provider seam: the engine consumes already-queried row snapshots and
// never talks to a backend itself.

pub mod snapshot;
pub mod traits;

pub use snapshot::SnapshotProvider;
pub use traits::DealDataProvider;
