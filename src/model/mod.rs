//! Record types served by the admin API, each implementing
//! [`Resource`](crate::framework::Resource).

pub mod customer;
pub mod order;
pub mod price_tier;
pub mod product;
pub mod taxonomy;
pub mod variation;

pub use customer::*;
pub use order::*;
pub use price_tier::*;
pub use product::*;
pub use taxonomy::*;
pub use variation::*;
