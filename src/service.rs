use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::PollError;
use crate::events::{EventReceiver, EventSender, ServerEvent, create_broadcaster};
use crate::store::{NewPoll, Poll, PollStore};

/// Shared entry point for every read and mutation of the poll store.
///
/// Both the HTTP handlers and the socket event handlers go through here. Each
/// mutation and the broadcast of its result happen while the store lock is
/// held, so observers receive events in exactly the order they were applied
/// and a subscriber's snapshot never overlaps with the events it receives.
#[derive(Clone)]
pub struct PollService {
    store: Arc<Mutex<PollStore>>,
    events: EventSender,
}

impl PollService {
    pub fn new(capacity: usize) -> Self {
        Self {
            store: Arc::new(Mutex::new(PollStore::new())),
            events: create_broadcaster(capacity),
        }
    }

    pub async fn create_poll(&self, new_poll: NewPoll) -> Result<Poll, PollError> {
        let mut store = self.store.lock().await;
        let poll = store.create_poll(new_poll)?;

        info!(poll_id = %poll.id, options = poll.options.len(), "Poll created");
        self.publish(ServerEvent::PollCreated(poll.clone()));

        Ok(poll)
    }

    pub async fn cast_vote(&self, poll_id: &str, option_id: usize) -> Result<Poll, PollError> {
        let mut store = self.store.lock().await;
        let poll = store.cast_vote(poll_id, option_id)?;

        debug!(poll_id, option_id, total = poll.total_votes(), "Vote recorded");
        self.publish(ServerEvent::PollUpdated(poll.clone()));

        Ok(poll)
    }

    pub async fn get_poll(&self, poll_id: &str) -> Option<Poll> {
        self.store.lock().await.get_poll(poll_id)
    }

    pub async fn list_polls(&self) -> Vec<Poll> {
        self.store.lock().await.list_polls()
    }

    pub async fn poll_count(&self) -> usize {
        self.store.lock().await.len()
    }

    /// Registers a new observer and returns the snapshot it should start from.
    pub async fn subscribe(&self) -> (Vec<Poll>, EventReceiver) {
        let store = self.store.lock().await;
        let rx = self.events.subscribe();
        (store.list_polls(), rx)
    }

    pub fn observer_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn publish(&self, event: ServerEvent) {
        // No receivers is not an error, there is simply nobody listening.
        let delivered = self.events.send(event).unwrap_or(0);
        debug!(observers = delivered, "Broadcast sent");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    fn color_poll() -> NewPoll {
        NewPoll {
            question: "Color?".to_string(),
            options: vec!["Red".to_string(), "Blue".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_broadcasts_to_every_observer() {
        let service = PollService::new(16);
        let (_, mut first) = service.subscribe().await;
        let (_, mut second) = service.subscribe().await;
        assert_eq!(service.observer_count(), 2);

        let poll = service.create_poll(color_poll()).await.unwrap();

        assert_eq!(first.recv().await.unwrap(), ServerEvent::PollCreated(poll.clone()));
        assert_eq!(second.recv().await.unwrap(), ServerEvent::PollCreated(poll));
    }

    #[tokio::test]
    async fn test_vote_broadcasts_full_poll_in_order() {
        let service = PollService::new(16);
        let poll = service.create_poll(color_poll()).await.unwrap();
        let (_, mut rx) = service.subscribe().await;

        service.cast_vote(&poll.id, 1).await.unwrap();
        service.cast_vote(&poll.id, 0).await.unwrap();

        match rx.recv().await.unwrap() {
            ServerEvent::PollUpdated(p) => {
                assert_eq!(p.options[0].votes, 0);
                assert_eq!(p.options[1].votes, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
        match rx.recv().await.unwrap() {
            ServerEvent::PollUpdated(p) => {
                assert_eq!(p.options[0].votes, 1);
                assert_eq!(p.options[1].votes, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_vote_does_not_broadcast() {
        let service = PollService::new(16);
        let poll = service.create_poll(color_poll()).await.unwrap();
        let (_, mut rx) = service.subscribe().await;

        assert_eq!(
            service.cast_vote("missing", 0).await,
            Err(PollError::PollNotFound)
        );
        assert_eq!(
            service.cast_vote(&poll.id, 7).await,
            Err(PollError::InvalidOption(7))
        );

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(service.get_poll(&poll.id).await, Some(poll));
    }

    #[tokio::test]
    async fn test_snapshot_and_events_do_not_overlap() {
        let service = PollService::new(16);
        let before = service.create_poll(color_poll()).await.unwrap();
        let (snapshot, mut rx) = service.subscribe().await;
        let after = service.create_poll(color_poll()).await.unwrap();

        assert_eq!(snapshot, vec![before]);
        assert_eq!(rx.recv().await.unwrap(), ServerEvent::PollCreated(after));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_concurrent_votes_are_not_lost() {
        let service = PollService::new(1024);
        let poll = service.create_poll(color_poll()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let service = service.clone();
            let poll_id = poll.id.clone();
            handles.push(tokio::spawn(async move {
                service.cast_vote(&poll_id, 0).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(service.get_poll(&poll.id).await.unwrap().options[0].votes, 50);
    }

    #[tokio::test]
    async fn test_dropped_receiver_leaves_observer_set() {
        let service = PollService::new(16);
        let (_, rx) = service.subscribe().await;
        assert_eq!(service.observer_count(), 1);

        drop(rx);
        assert_eq!(service.observer_count(), 0);
    }
}
