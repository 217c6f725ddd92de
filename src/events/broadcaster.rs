use tokio::sync::broadcast;

use crate::events::models::EventSender;

pub const DEFAULT_CAPACITY: usize = 100;

pub fn create_broadcaster(capacity: usize) -> EventSender {
    let (tx, _rx) = broadcast::channel(capacity.max(1));
    tx
}
