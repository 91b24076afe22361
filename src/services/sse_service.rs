use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use crate::{
    services::sse_events,
    state::{SharedState, Subscription},
};

/// Subscribe a new SSE client to committed match snapshots.
pub fn subscribe(state: &SharedState) -> Subscription {
    state.broadcaster().subscribe()
}

/// Convert a snapshot subscription into an SSE response, forwarding events and
/// cleaning up once the client disconnects.
pub fn to_sse_stream(
    mut subscription: Subscription,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: reads snapshots and pushes rendered events into mpsc
    tokio::spawn(async move {
        'forward: loop {
            let published = tokio::select! {
                _ = tx.closed() => break,
                next = subscription.next() => match next {
                    Some(published) => published,
                    None => break,
                },
            };

            for payload in sse_events::events_for(&published) {
                let mut event = Event::default().data(payload.data);
                if let Some(name) = payload.event {
                    event = event.event(name);
                }

                if tx.send(Ok(event)).await.is_err() {
                    break 'forward;
                }
            }
        }

        info!("SSE stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
