pub mod types;
pub mod filter_order;

pub use types::*;
pub use filter_order::FilterOrder;
