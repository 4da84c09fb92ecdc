//! Every view the dashboard composes: the header, the tiling panel tree and
//! the individual panel bodies.

use crate::canvas::{FieldProgram, OverlayProgram};
use crate::{Dashboard, Message};
use iced::widget::image::Handle;
use iced::widget::{
    button, checkbox, column, container, image, row, scrollable, slider, stack, text,
    text_input, Canvas, Column, Space,
};
use iced::{Alignment, Color, ContentFit, Element, Font, Length};
use vairccore::prelude::*;

/// Native resolution of the telemetry cameras.
const NATIVE_WIDTH: f32 = 640.0;
const NATIVE_HEIGHT: f32 = 480.0;

const ERROR_COLOR: Color = Color::from_rgb(0.92, 0.35, 0.35);

pub fn view(state: &Dashboard) -> Element<'_, Message> {
    let mut root = column![header(state)].spacing(8).padding(8);

    if let Some(error) = &state.connection_error {
        root = root.push(error_banner(error));
    }
    if state.mode == AppMode::Replay {
        root = root.push(playback_controls(state));
    }

    let content = content(state);
    let body: Element<'_, Message> = if state.settings_open {
        row![settings_pane(state), content].spacing(8).into()
    } else {
        content
    };

    root.push(
        container(body)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .into()
}

fn header(state: &Dashboard) -> Element<'_, Message> {
    let mut bar = row![
        text("VAIRC Dashboard").size(18),
        mode_button("Live", AppMode::Server, state.mode),
        mode_button("Replay", AppMode::Replay, state.mode),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    if state.mode == AppMode::Server {
        bar = bar
            .push(
                text_input("host:port", &state.server_input)
                    .on_input(Message::ServerInputChanged)
                    .on_submit(Message::ServerApplied)
                    .width(Length::Fixed(200.0))
                    .padding(4),
            )
            .push(button(text("Apply").size(14)).on_press(Message::ServerApplied))
            .push(button(text("Reset").size(14)).on_press(Message::ServerReset))
            .push(button(text("Reload").size(14)).on_press(Message::Reload))
            .push(text(stats_summary(state)).size(13));
    }

    bar = bar
        .push(Space::new().width(Length::Fill))
        .push(text(jetson_summary(state.current_payload())).size(13))
        .push(button(text("Settings").size(14)).on_press(Message::SettingsToggled));

    bar.into()
}

fn mode_button(label: &str, mode: AppMode, current: AppMode) -> Element<'_, Message> {
    let widget = button(text(label).size(14)).on_press(Message::ModeSelected(mode));
    if mode == current {
        widget.style(button::primary).into()
    } else {
        widget.style(button::secondary).into()
    }
}

fn stats_summary(state: &Dashboard) -> String {
    let (accepted, dropped, errors) = state.stats.snapshot();
    format!("frames {} dropped {} errors {}", accepted, dropped, errors)
}

fn jetson_summary(payload: &DetectionPayload) -> String {
    match &payload.jetson {
        Some(jetson) => format!(
            "CPU {:.1}C  GPU {:.1}C  Up {}",
            jetson.cpu_temp,
            jetson.gpu_temp,
            jetson.format_uptime()
        ),
        None => String::new(),
    }
}

fn error_banner(error: &str) -> Element<'_, Message> {
    row![
        text(format!("Connection lost: {}", error))
            .size(14)
            .color(ERROR_COLOR),
        button(text("Reload").size(13)).on_press(Message::Reload),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

fn playback_controls(state: &Dashboard) -> Element<'_, Message> {
    if state.session.is_none() {
        return text("Load a session folder from Settings to start a replay.")
            .size(14)
            .into();
    }

    let playback = &state.playback;
    let play_pause: Element<'_, Message> = if playback.is_playing() {
        button(text("Pause").size(14)).on_press(Message::Pause).into()
    } else {
        button(text("Play").size(14)).on_press(Message::Play).into()
    };

    let last = playback.frame_count().saturating_sub(1);
    row![
        button(text("<").size(14)).on_press(Message::StepBackward),
        play_pause,
        button(text(">").size(14)).on_press(Message::StepForward),
        slider(0.0..=last as f64, playback.index() as f64, |value| {
            Message::Seek(value as usize)
        })
        .width(Length::Fill),
        text(format!("{} / {}", playback.index() + 1, playback.frame_count())).size(13),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

fn content(state: &Dashboard) -> Element<'_, Message> {
    match state.layout.tree() {
        Some(tree) => render_node(state, tree),
        None => container(button(text("Add a panel").size(16)).on_press(Message::AddPanel))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    }
}

fn render_node<'a>(state: &'a Dashboard, node: &'a LayoutNode) -> Element<'a, Message> {
    match node {
        LayoutNode::Leaf(key) => panel_tile(state, key),
        LayoutNode::Split {
            direction,
            ratio,
            first,
            second,
        } => {
            let (first_share, second_share) = ratio_portions(*ratio);
            let first = render_node(state, first);
            let second = render_node(state, second);
            match direction {
                SplitDirection::Row => row![
                    container(first)
                        .width(Length::FillPortion(first_share))
                        .height(Length::Fill),
                    container(second)
                        .width(Length::FillPortion(second_share))
                        .height(Length::Fill),
                ]
                .spacing(4)
                .into(),
                SplitDirection::Column => column![
                    container(first)
                        .width(Length::Fill)
                        .height(Length::FillPortion(first_share)),
                    container(second)
                        .width(Length::Fill)
                        .height(Length::FillPortion(second_share)),
                ]
                .spacing(4)
                .into(),
            }
        }
    }
}

/// Maps a split ratio to a pair of fill portions out of 100, keeping both
/// sides at least barely visible.
fn ratio_portions(ratio: f64) -> (u16, u16) {
    let share = (ratio.clamp(0.0, 1.0) * 100.0).round() as u16;
    let share = share.clamp(1, 99);
    (share, 100 - share)
}

fn panel_tile<'a>(state: &'a Dashboard, key: &'a str) -> Element<'a, Message> {
    let Some(id) = PanelId::from_key(key) else {
        return missing_tile(key);
    };

    let title_bar = row![
        text(id.title()).size(14),
        Space::new().width(Length::Fill),
        button(text("x").size(12)).on_press(Message::PanelToggled(id)),
    ]
    .align_y(Alignment::Center);

    let body: Element<'_, Message> = match id {
        PanelId::ColorFeed => feed_view(state, state.color_handle()),
        PanelId::DepthFeed => feed_view(state, state.depth_handle()),
        PanelId::RawData => raw_data_view(state.current_payload()),
        PanelId::FieldView => field_view(state),
        PanelId::Details => details_view(state),
        PanelId::Help => help_view(),
    };

    container(column![title_bar, body].spacing(4))
        .padding(6)
        .style(container::bordered_box)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn missing_tile(key: &str) -> Element<'_, Message> {
    container(text(format!("Component not found: {}", key)).size(14))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(container::bordered_box)
        .into()
}

fn feed_view<'a>(state: &'a Dashboard, handle: Option<&'a Handle>) -> Element<'a, Message> {
    match handle {
        Some(handle) => {
            let picture = image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .content_fit(ContentFit::Contain);
            let overlay = Canvas::new(OverlayProgram {
                payload: state.current_payload().clone(),
                native_width: NATIVE_WIDTH,
                native_height: NATIVE_HEIGHT,
                show_boxes: state.show_boxes,
                selected: state.selected_detection,
            })
            .width(Length::Fill)
            .height(Length::Fill);
            stack![picture, overlay].into()
        }
        None => container(text("No Image Stream").size(14))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    }
}

fn field_view(state: &Dashboard) -> Element<'_, Message> {
    Canvas::new(FieldProgram {
        payload: state.current_payload().clone(),
        icons: state.icons.clone(),
    })
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

fn raw_data_view(payload: &DetectionPayload) -> Element<'_, Message> {
    let json = serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_string());
    scrollable(text(json).size(12).font(Font::MONOSPACE))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn details_view(state: &Dashboard) -> Element<'_, Message> {
    let payload = state.current_payload();
    let mut details = Column::new().spacing(4);

    details = details.push(
        text(match &payload.pose {
            Some(pose) => format!(
                "Pose: x {:.1}  y {:.1}  theta {:.1}",
                pose.x, pose.y, pose.theta
            ),
            None => "Pose: n/a".to_string(),
        })
        .size(13),
    );

    if let Some(jetson) = &payload.jetson {
        details = details.push(
            text(format!(
                "Jetson: CPU {:.1}C  GPU {:.1}C  uptime {}",
                jetson.cpu_temp,
                jetson.gpu_temp,
                jetson.format_uptime()
            ))
            .size(13),
        );
    }

    details = details.push(
        text(format!("Detections: {}", payload.detections.len())).size(13),
    );
    for (index, detection) in payload.detections.iter().enumerate().take(12) {
        let mut line = format!(
            "{} {:.2} at ({:.0}, {:.0})",
            detection.class, detection.confidence, detection.x, detection.y
        );
        if let Some(depth) = detection.depth {
            line.push_str(&format!("  d={:.2}m", depth));
        }
        if detection.has_field_position() {
            line.push_str(&format!(
                "  field ({:.1}, {:.1})",
                detection.fx.unwrap_or(0.0),
                detection.fy.unwrap_or(0.0)
            ));
        }
        // Clicking a row highlights the matching box on the feeds.
        let row_button = button(text(line).size(12).font(Font::MONOSPACE))
            .on_press(Message::DetectionSelected(index))
            .padding(2);
        let row_button = if state.selected_detection == Some(index) {
            row_button.style(button::primary)
        } else {
            row_button.style(button::text)
        };
        details = details.push(row_button);
    }

    scrollable(details)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn help_view<'a>() -> Element<'a, Message> {
    let lines = [
        "Live mode streams detections and camera frames from the server.",
        "Replay mode steps through a recorded session folder.",
        "Color/Depth Feed: camera image with detection overlay.",
        "Raw Data: the current payload as JSON.",
        "Field View: top-down field with detections and the robot pose.",
        "Details: pose, system stats and a detection list.",
        "Panels can be toggled from Settings; closing every panel",
        "shows an Add a panel button.",
    ];
    let body = lines
        .iter()
        .fold(Column::new().spacing(4), |col, line| {
            col.push(text(*line).size(13))
        });
    scrollable(body)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn settings_pane(state: &Dashboard) -> Element<'_, Message> {
    let mut pane = column![text("Settings").size(18), text("Panels").size(14)].spacing(8);

    for id in PanelId::ALL {
        pane = pane.push(
            checkbox(state.layout.is_visible(id))
                .label(id.title())
                .on_toggle(move |_| Message::PanelToggled(id))
                .size(16),
        );
    }

    pane = pane
        .push(
            checkbox(state.show_boxes)
                .label("Show detection boxes")
                .on_toggle(Message::ShowBoxesToggled)
                .size(16),
        )
        .push(text("Replay session folder").size(14))
        .push(
            text_input("path/to/session", &state.replay_path_input)
                .on_input(Message::ReplayPathChanged)
                .on_submit(Message::ReplayLoadRequested)
                .padding(4),
        )
        .push(button(text("Load session").size(14)).on_press(Message::ReplayLoadRequested));

    if let Some(error) = &state.upload_error {
        pane = pane.push(text(error.clone()).size(13).color(ERROR_COLOR));
    }

    container(pane)
        .padding(8)
        .width(Length::Fixed(260.0))
        .height(Length::Fill)
        .style(container::bordered_box)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_portions_sum_to_one_hundred() {
        assert_eq!(ratio_portions(0.5), (50, 50));
        assert_eq!(ratio_portions(0.8), (80, 20));
        assert_eq!(ratio_portions(0.0), (1, 99));
        assert_eq!(ratio_portions(2.0), (99, 1));
    }
}
