//! Streaming subscriptions for live mode.
//!
//! Each connection is keyed by `(endpoint, server, generation)`: editing the
//! server address or pressing Reload bumps the generation, which tears the
//! old stream down and dials a new one. A failed stream reports once and
//! then parks; there is no automatic retry, the sticky error stays up until
//! the user reloads.

use futures_util::{SinkExt, StreamExt};
use iced::futures::channel::mpsc;
use iced::futures::future;
use iced::{stream, Subscription};
use log::{debug, info};
use vairccore::prelude::DetectionPayload;
use vairccore::telemetry::{MjpegDecoder, SseDecoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Color,
    Depth,
}

impl FeedKind {
    fn endpoint(self) -> &'static str {
        match self {
            FeedKind::Color => "color.mjpg",
            FeedKind::Depth => "depth.mjpg",
        }
    }
}

#[derive(Debug, Clone)]
pub enum StreamEvent {
    Payload(DetectionPayload),
    PayloadDropped,
    Frame(FeedKind, Vec<u8>),
    Disconnected(String),
}

pub fn sse(server: &str, generation: u64) -> Subscription<StreamEvent> {
    Subscription::run_with(("events", server.to_string(), generation), |data| {
        let url = format!("http://{}/events", data.1);
        stream::channel(32, move |mut output: mpsc::Sender<StreamEvent>| async move {
            info!("connecting to {}", url);
            let response = match reqwest::get(&url).await {
                Ok(response) => response,
                Err(err) => {
                    let _ = output.send(StreamEvent::Disconnected(err.to_string())).await;
                    return future::pending().await;
                }
            };

            let mut decoder = SseDecoder::new();
            let mut bytes = response.bytes_stream();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        let _ =
                            output.send(StreamEvent::Disconnected(err.to_string())).await;
                        return future::pending().await;
                    }
                };
                for message in decoder.feed(&chunk) {
                    let event = match DetectionPayload::parse_message(&message) {
                        Some(payload) => StreamEvent::Payload(payload),
                        None => StreamEvent::PayloadDropped,
                    };
                    let _ = output.send(event).await;
                }
            }

            debug!("event stream from {} ended", url);
            let _ = output
                .send(StreamEvent::Disconnected("event stream ended".to_string()))
                .await;
            future::pending().await
        })
    })
}

pub fn mjpeg(server: &str, generation: u64, kind: FeedKind) -> Subscription<StreamEvent> {
    Subscription::run_with((kind, server.to_string(), generation), |data| {
        let kind = data.0;
        let url = format!("http://{}/{}", data.1, kind.endpoint());
        stream::channel(8, move |mut output: mpsc::Sender<StreamEvent>| async move {
            let response = match reqwest::get(&url).await {
                Ok(response) => response,
                Err(err) => {
                    let _ = output.send(StreamEvent::Disconnected(err.to_string())).await;
                    return future::pending().await;
                }
            };

            let mut decoder = MjpegDecoder::new();
            let mut bytes = response.bytes_stream();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        let _ =
                            output.send(StreamEvent::Disconnected(err.to_string())).await;
                        return future::pending().await;
                    }
                };
                for frame in decoder.feed(&chunk) {
                    let _ = output.send(StreamEvent::Frame(kind, frame)).await;
                }
            }

            debug!("image stream from {} ended", url);
            let _ = output
                .send(StreamEvent::Disconnected("image stream ended".to_string()))
                .await;
            future::pending().await
        })
    })
}
