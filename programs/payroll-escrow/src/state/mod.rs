pub mod admin;
pub mod allocator;
pub mod escrow;

pub use admin::*;
pub use allocator::*;
pub use escrow::*;
