use crate::events::models::ServerEvent;
use crate::service::PollService;
use axum::{
    extract::Extension,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::{convert::Infallible, time::Duration};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

fn sse_event(event: &ServerEvent) -> Event {
    Event::default().event(event.name()).data(event.to_json())
}

/// Read-only feed of every poll change for observers that cannot open a socket.
pub async fn all_polls_sse(
    Extension(service): Extension<PollService>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (snapshot, mut rx) = service.subscribe().await;

    let stream = async_stream::stream! {
        yield Ok(sse_event(&ServerEvent::CurrentPolls(snapshot)));

        loop {
            match rx.recv().await {
                Ok(event) => yield Ok(sse_event(&event)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "SSE observer lagged, resending snapshot");
                    let (snapshot, fresh) = service.subscribe().await;
                    rx = fresh;
                    yield Ok(sse_event(&ServerEvent::CurrentPolls(snapshot)));
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
