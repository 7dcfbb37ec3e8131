//! Background task driving the rumqttc event loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rumqttc::{Event, EventLoop, Packet};
use tokio::sync::{mpsc, oneshot};
use tokio::sync::mpsc::error::TrySendError;

use crate::InboundMessage;
use crate::error::MqttError;

/// Poll `events` until the connection fails.
///
/// The first CONNACK (or the first error) is reported on `ready`. Inbound
/// publishes are forwarded without blocking so the event loop keeps draining
/// outgoing requests while the receiver is busy.
pub(crate) async fn run(
    mut events: EventLoop,
    connected: Arc<AtomicBool>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    ready: oneshot::Sender<Result<(), MqttError>>,
) {
    let mut ready = Some(ready);
    loop {
        match events.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                connected.store(true, Ordering::SeqCst);
                tracing::debug!(code = ?ack.code, "broker accepted connection");
                if let Some(ready) = ready.take() {
                    let _ = ready.send(Ok(()));
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let message = InboundMessage {
                    topic: publish.topic,
                    payload: publish.payload.to_vec(),
                };
                match inbound_tx.try_send(message) {
                    Ok(()) => {}
                    Err(TrySendError::Full(message)) => {
                        tracing::warn!(topic = %message.topic, "inbound queue full, dropping message");
                    }
                    Err(TrySendError::Closed(_)) => {
                        tracing::debug!("inbound receiver dropped");
                    }
                }
            }
            Ok(_) => {}
            Err(err) => {
                connected.store(false, Ordering::SeqCst);
                match ready.take() {
                    Some(ready) => {
                        let _ = ready.send(Err(MqttError::from(err)));
                    }
                    None => tracing::warn!(error = %err, "connection to broker lost"),
                }
                break;
            }
        }
    }
}
