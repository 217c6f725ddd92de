pub mod id;
pub mod models;
pub mod poll_store;

pub use id::*;
pub use models::*;
pub use poll_store::*;
