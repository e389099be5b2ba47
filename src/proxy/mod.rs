//! Proxy pool construction and rotation

pub mod pool;

pub use pool::ProxyPool;
