// Adapters layer: concrete implementations of the domain ports.

pub mod rest;
pub mod snapshot;
pub mod storage;
