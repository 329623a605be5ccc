//! Adapters for the domain ports.

#[cfg(feature = "http-loader")]
pub mod http;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
