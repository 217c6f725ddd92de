use crate::events::models::ServerEvent;
use crate::service::PollService;
use axum::{
    extract::{Extension, Path},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use serde_json::json;
use std::{convert::Infallible, time::Duration};
use tokio::sync::broadcast::error::RecvError;

pub async fn poll_updates_sse(
    Extension(service): Extension<PollService>,
    Path(poll_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (snapshot, mut rx) = service.subscribe().await;
    let initial = snapshot.into_iter().find(|p| p.id == poll_id);

    let stream = async_stream::stream! {
        let Some(poll) = initial else {
            yield Ok(Event::default()
                .event("error")
                .data(json!({"error": "Poll not found"}).to_string()));
            return;
        };

        yield Ok(Event::default()
            .event("init")
            .data(json!({"event": "init", "data": poll}).to_string()));

        loop {
            match rx.recv().await {
                Ok(ServerEvent::PollUpdated(poll)) if poll.id == poll_id => {
                    let event = ServerEvent::PollUpdated(poll);
                    yield Ok(Event::default().event(event.name()).data(event.to_json()));
                }
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => {
                    let (snapshot, fresh) = service.subscribe().await;
                    rx = fresh;
                    if let Some(poll) = snapshot.into_iter().find(|p| p.id == poll_id) {
                        let event = ServerEvent::PollUpdated(poll);
                        yield Ok(Event::default().event(event.name()).data(event.to_json()));
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keep-alive"),
    )
}
