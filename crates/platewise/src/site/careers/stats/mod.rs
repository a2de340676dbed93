mod snapshot;
pub mod views;

pub use snapshot::collect;
