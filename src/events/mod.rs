pub mod models;
pub use models::*;

mod broadcaster;
pub use broadcaster::*;

mod all_polls_sse;
mod poll_updates_sse;
mod socket;

pub use all_polls_sse::all_polls_sse;
pub use poll_updates_sse::poll_updates_sse;
pub use socket::{apply_client_message, poll_events_ws};
