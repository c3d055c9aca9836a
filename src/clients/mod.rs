//! Page clients: type-safe wrappers around [`ListClient`](crate::framework::ListClient)
//! that add the operations specific to one page.

pub mod order_client;
pub mod page_client;
pub mod shop_client;
pub mod variation_client;

pub use order_client::*;
pub use page_client::*;
pub use shop_client::*;
pub use variation_client::*;
