pub mod availability;
pub mod proxy;
pub mod stock;

pub use availability::Availability;
pub use proxy::ProxyEntry;
pub use stock::StockState;
