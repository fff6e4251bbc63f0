//! Sequential store module - append-only collection keyed by monotonic integers.

mod sequential_store;

pub use sequential_store::SequentialStore;
