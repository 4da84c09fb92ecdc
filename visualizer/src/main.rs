use iced::widget::image::Handle;
use iced::{time, Element, Subscription, Task, Theme};
use icons::IconSet;
use log::info;
use std::path::PathBuf;
use stream::{FeedKind, StreamEvent};
use vairccore::persist::DEFAULT_SERVER;
use vairccore::prelude::*;
use vairccore::replay::playback::FRAME_PERIOD;
use vairccore::telemetry::StreamStats;

mod canvas;
mod icons;
mod panels;
mod stream;

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    "VAIRC Dashboard".into()
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

fn application_subscription(state: &Dashboard) -> Subscription<Message> {
    match state.mode {
        AppMode::Server => Subscription::batch([
            stream::sse(&state.server, state.generation),
            stream::mjpeg(&state.server, state.generation, FeedKind::Color),
            stream::mjpeg(&state.server, state.generation, FeedKind::Depth),
        ])
        .map(Message::Stream),
        AppMode::Replay if state.playback.is_playing() => {
            time::every(FRAME_PERIOD).map(|_| Message::PlaybackTick)
        }
        AppMode::Replay => Subscription::none(),
    }
}

fn state_path() -> PathBuf {
    std::env::var_os("VAIRC_STATE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("vairc_dashboard.json"))
}

struct Dashboard {
    state_path: PathBuf,
    mode: AppMode,
    server: String,
    server_input: String,
    /// Bumped on server edits and Reload; part of every stream's identity,
    /// so bumping it tears connections down and redials.
    generation: u64,
    connection_error: Option<String>,
    layout: LayoutController,
    session: Option<ReplaySession>,
    playback: Playback,
    live_payload: DetectionPayload,
    replay_payload: DetectionPayload,
    live_color: Option<Handle>,
    live_depth: Option<Handle>,
    replay_color: Option<Handle>,
    replay_depth: Option<Handle>,
    stats: StreamStats,
    selected_detection: Option<usize>,
    settings_open: bool,
    replay_path_input: String,
    upload_error: Option<String>,
    show_boxes: bool,
    icons: IconSet,
}

#[derive(Debug, Clone)]
enum Message {
    ModeSelected(AppMode),
    ServerInputChanged(String),
    ServerApplied,
    ServerReset,
    Reload,
    DetectionSelected(usize),
    Stream(StreamEvent),
    PanelToggled(PanelId),
    AddPanel,
    SettingsToggled,
    ShowBoxesToggled(bool),
    ReplayPathChanged(String),
    ReplayLoadRequested,
    Play,
    Pause,
    StepForward,
    StepBackward,
    Seek(usize),
    PlaybackTick,
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        let state_path = state_path();
        let persisted = PersistedState::load(&state_path);
        let layout = LayoutController::from_persisted(persisted.visibility, persisted.layout);
        (
            Dashboard {
                state_path,
                mode: persisted.mode,
                server_input: persisted.server.clone(),
                server: persisted.server,
                generation: 0,
                connection_error: None,
                layout,
                session: None,
                playback: Playback::new(0),
                live_payload: DetectionPayload::empty(),
                replay_payload: DetectionPayload::empty(),
                live_color: None,
                live_depth: None,
                replay_color: None,
                replay_depth: None,
                stats: StreamStats::new(),
                selected_detection: None,
                settings_open: false,
                replay_path_input: String::new(),
                upload_error: None,
                show_boxes: persisted.show_boxes,
                icons: IconSet::load(),
            },
            Task::none(),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::ModeSelected(mode) => {
                if state.mode != mode {
                    state.mode = mode;
                    state.persist();
                }
            }
            Message::ServerInputChanged(value) => state.server_input = value,
            Message::ServerApplied => {
                let trimmed = state.server_input.trim().to_string();
                if !trimmed.is_empty() && trimmed != state.server {
                    state.server = trimmed;
                    state.reconnect();
                    state.persist();
                }
            }
            Message::ServerReset => {
                state.server_input = DEFAULT_SERVER.to_string();
                if state.server != DEFAULT_SERVER {
                    state.server = DEFAULT_SERVER.to_string();
                    state.reconnect();
                    state.persist();
                }
            }
            Message::Reload => state.reconnect(),
            Message::DetectionSelected(index) => {
                state.selected_detection = if state.selected_detection == Some(index) {
                    None
                } else {
                    Some(index)
                };
            }
            Message::Stream(event) => state.apply_stream_event(event),
            Message::PanelToggled(id) => {
                state.layout.toggle(id.key());
                state.persist();
            }
            Message::AddPanel => {
                state.layout.add_panel();
                state.persist();
            }
            Message::SettingsToggled => state.settings_open = !state.settings_open,
            Message::ShowBoxesToggled(value) => {
                state.show_boxes = value;
                state.persist();
            }
            Message::ReplayPathChanged(value) => state.replay_path_input = value,
            Message::ReplayLoadRequested => state.load_replay(),
            Message::Play => state.playback.play(),
            Message::Pause => state.playback.pause(),
            Message::StepForward => {
                state.playback.step_forward();
                state.refresh_replay_frame();
            }
            Message::StepBackward => {
                state.playback.step_backward();
                state.refresh_replay_frame();
            }
            Message::Seek(index) => {
                state.playback.seek(index);
                state.refresh_replay_frame();
            }
            Message::PlaybackTick => {
                state.playback.tick();
                state.refresh_replay_frame();
            }
        }
        Task::none()
    }

    fn view(state: &Self) -> Element<'_, Message> {
        panels::view(state)
    }

    fn reconnect(&mut self) {
        self.generation += 1;
        self.connection_error = None;
        self.stats.reset();
    }

    fn apply_stream_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Payload(payload) => {
                self.stats.record_accepted();
                self.live_payload = payload;
            }
            StreamEvent::PayloadDropped => self.stats.record_dropped(),
            StreamEvent::Frame(FeedKind::Color, bytes) => {
                self.live_color = Some(Handle::from_bytes(bytes));
            }
            StreamEvent::Frame(FeedKind::Depth, bytes) => {
                self.live_depth = Some(Handle::from_bytes(bytes));
            }
            StreamEvent::Disconnected(reason) => {
                self.stats.record_transport_error();
                self.connection_error = Some(reason);
            }
        }
    }

    fn load_replay(&mut self) {
        let root = PathBuf::from(self.replay_path_input.trim());
        match ReplaySession::from_dir(&root) {
            Ok(session) => {
                info!(
                    "loaded replay session from {} ({} frames)",
                    root.display(),
                    session.len()
                );
                self.playback = Playback::new(session.len());
                self.session = Some(session);
                self.upload_error = None;
                self.refresh_replay_frame();
            }
            Err(err) => {
                self.upload_error = Some(err.to_string());
            }
        }
    }

    fn refresh_replay_frame(&mut self) {
        let frame = self
            .session
            .as_ref()
            .and_then(|session| session.state(self.playback.index()));
        match frame {
            Some(frame) => {
                self.replay_payload = frame.payload;
                self.replay_color = frame.color_image.map(Handle::from_path);
                self.replay_depth = frame.depth_image.map(Handle::from_path);
            }
            None => {
                self.replay_payload = DetectionPayload::empty();
                self.replay_color = None;
                self.replay_depth = None;
            }
        }
    }

    fn current_payload(&self) -> &DetectionPayload {
        match self.mode {
            AppMode::Server => &self.live_payload,
            AppMode::Replay => &self.replay_payload,
        }
    }

    fn color_handle(&self) -> Option<&Handle> {
        match self.mode {
            AppMode::Server => self.live_color.as_ref(),
            AppMode::Replay => self.replay_color.as_ref(),
        }
    }

    fn depth_handle(&self) -> Option<&Handle> {
        match self.mode {
            AppMode::Server => self.live_depth.as_ref(),
            AppMode::Replay => self.replay_depth.as_ref(),
        }
    }

    fn persist(&self) {
        PersistedState {
            server: self.server.clone(),
            mode: self.mode,
            visibility: self.layout.visibility().clone(),
            layout: self.layout.tree().cloned(),
            show_boxes: self.show_boxes,
        }
        .save(&self.state_path);
    }
}
