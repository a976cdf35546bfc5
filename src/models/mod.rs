pub mod message;
pub mod order;
pub mod product;

pub use message::*;
pub use order::*;
pub use product::*;
