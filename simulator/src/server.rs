//! HTTP endpoints the dashboard connects to: `/events` (SSE detection
//! frames), `/color.mjpg` and `/depth.mjpg` (multipart image streams), plus
//! `/payload` for one-shot debugging.
//!
//! A producer task advances the generator at the scenario cadence and
//! publishes the latest frame; every connected client streams snapshots of
//! it, so slow consumers never stall the producer.

use crate::frames::{render_color_frame, render_depth_frame};
use crate::generator::FrameGenerator;
use crate::scenario::ScenarioConfig;
use log::{error, info};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;
use tokio::runtime::Builder;
use vairccore::prelude::DetectionPayload;
use warp::Filter;

#[derive(Clone, Default)]
struct LatestFrame {
    payload: DetectionPayload,
    color_jpeg: Arc<Vec<u8>>,
    depth_jpeg: Arc<Vec<u8>>,
}

type SharedFrame = Arc<RwLock<LatestFrame>>;

/// Hosts the telemetry endpoints on a background thread.
pub struct TelemetryServer {
    state: SharedFrame,
}

impl TelemetryServer {
    pub fn start(config: ScenarioConfig, port: u16) -> Self {
        let state: SharedFrame = Arc::new(RwLock::new(LatestFrame::default()));
        let period = config.frame_period();

        let producer_state = state.clone();
        let server_state = state.clone();
        thread::spawn(move || {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build telemetry runtime");
            runtime.block_on(async move {
                tokio::spawn(produce_frames(producer_state, config, period));
                let address = SocketAddr::from(([0, 0, 0, 0], port));
                info!("telemetry server listening on {}", address);
                warp::serve(routes(server_state, period)).run(address).await;
            });
        });

        Self { state }
    }

    #[cfg(test)]
    fn snapshot(&self) -> DetectionPayload {
        self.state.read().unwrap().payload.clone()
    }
}

async fn produce_frames(state: SharedFrame, config: ScenarioConfig, period: Duration) {
    let mut generator = FrameGenerator::new(config);
    loop {
        tokio::time::sleep(period).await;
        let payload = generator.next_payload();
        let tick = generator.tick();
        let color = render_color_frame(&payload, tick).unwrap_or_else(|err| {
            error!("color frame render failed: {}", err);
            Vec::new()
        });
        let depth = render_depth_frame(&payload, tick).unwrap_or_else(|err| {
            error!("depth frame render failed: {}", err);
            Vec::new()
        });
        let mut guard = state.write().unwrap();
        *guard = LatestFrame {
            payload,
            color_jpeg: Arc::new(color),
            depth_jpeg: Arc::new(depth),
        };
    }
}

fn routes(
    state: SharedFrame,
    period: Duration,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let state_filter = {
        let state = state.clone();
        warp::any().map(move || state.clone())
    };

    let payload_route = warp::path("payload")
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: SharedFrame| warp::reply::json(&state.read().unwrap().payload));

    let events_route = warp::path("events")
        .and(warp::get())
        .and(state_filter.clone())
        .map(move |state: SharedFrame| {
            let stream = futures_util::stream::unfold(state, move |state| async move {
                tokio::time::sleep(period).await;
                let json = {
                    let guard = state.read().unwrap();
                    serde_json::to_string(&guard.payload).unwrap_or_default()
                };
                let event = warp::sse::Event::default().data(json);
                Some((Ok::<_, Infallible>(event), state))
            });
            warp::sse::reply(warp::sse::keep_alive().stream(stream))
        });

    let color_route = mjpeg_route("color.mjpg", state.clone(), period, |frame| {
        frame.color_jpeg.clone()
    });
    let depth_route = mjpeg_route("depth.mjpg", state, period, |frame| {
        frame.depth_jpeg.clone()
    });

    payload_route
        .or(events_route)
        .or(color_route)
        .or(depth_route)
}

fn mjpeg_route(
    name: &'static str,
    state: SharedFrame,
    period: Duration,
    select: fn(&LatestFrame) -> Arc<Vec<u8>>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path(name)
        .and(warp::get())
        .map(move || {
            let stream =
                futures_util::stream::unfold(state.clone(), move |state| async move {
                    tokio::time::sleep(period).await;
                    let jpeg = select(&state.read().unwrap());
                    let mut part =
                        Vec::from(&b"--frame\r\nContent-Type: image/jpeg\r\n\r\n"[..]);
                    part.extend_from_slice(&jpeg);
                    part.extend_from_slice(b"\r\n");
                    Some((Ok::<_, Infallible>(part), state))
                });
            warp::http::Response::builder()
                .header(
                    "content-type",
                    "multipart/x-mixed-replace; boundary=frame",
                )
                .body(warp::hyper::Body::wrap_stream(stream))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn producer_publishes_frames() {
        let server = TelemetryServer::start(ScenarioConfig::from_args(50, 10, 9), 0);
        // The producer runs on its own thread; give it a few periods.
        for _ in 0..50 {
            if !server.snapshot().detections.is_empty() {
                return;
            }
            thread::sleep(Duration::from_millis(20));
        }
        panic!("producer never published a frame");
    }
}
