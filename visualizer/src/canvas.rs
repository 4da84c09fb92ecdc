//! Canvas programs: the detection overlay drawn on top of a camera feed and
//! the top-down field view. Both lean on the pure geometry in `vairccore`
//! and only turn precomputed rectangles into draw calls.

use crate::icons::IconSet;
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke, Text};
use iced::{mouse, Color, Pixels, Point, Rectangle, Renderer, Size, Theme};
use vairccore::prelude::DetectionPayload;
use vairccore::render::field::{
    fallback_color, field_markers, robot_corners, FieldTransform, FIELD_SIZE_INCHES,
};
use vairccore::render::overlay::{overlay_boxes, Rgb, LABEL_FONT_SIZE};

fn color(rgb: Rgb, alpha: f32) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, alpha)
}

/// Black on light label backgrounds, white on dark ones.
fn label_text_color(background: Rgb) -> Color {
    let luminance = 0.299 * f32::from(background.r)
        + 0.587 * f32::from(background.g)
        + 0.114 * f32::from(background.b);
    if luminance > 140.0 {
        Color::BLACK
    } else {
        Color::WHITE
    }
}

/// Bounding boxes and labels over a camera feed.
#[derive(Debug, Clone)]
pub struct OverlayProgram {
    pub payload: DetectionPayload,
    pub native_width: f32,
    pub native_height: f32,
    pub show_boxes: bool,
    pub selected: Option<usize>,
}

impl<Message> canvas::Program<Message> for OverlayProgram {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        if !self.show_boxes {
            return vec![frame.into_geometry()];
        }

        let boxes = overlay_boxes(
            &self.payload,
            bounds.width,
            bounds.height,
            self.native_width,
            self.native_height,
        );
        for entry in &boxes {
            let outline = Path::rectangle(
                Point::new(entry.rect.x, entry.rect.y),
                Size::new(entry.rect.width, entry.rect.height),
            );
            let outline_width = if self.selected == Some(entry.index) {
                4.0
            } else {
                2.0
            };
            frame.stroke(
                &outline,
                Stroke::default()
                    .with_width(outline_width)
                    .with_color(color(entry.color, 1.0)),
            );
            let inner = Path::rectangle(
                Point::new(entry.rect.x + 2.0, entry.rect.y + 2.0),
                Size::new(
                    (entry.rect.width - 4.0).max(0.0),
                    (entry.rect.height - 4.0).max(0.0),
                ),
            );
            frame.stroke(
                &inner,
                Stroke::default().with_width(1.0).with_color(Color::WHITE),
            );

            frame.fill_rectangle(
                Point::new(entry.label_rect.x, entry.label_rect.y),
                Size::new(entry.label_rect.width, entry.label_rect.height),
                color(entry.color, 1.0),
            );
            frame.fill_text(Text {
                content: entry.label.clone(),
                position: Point::new(entry.label_rect.x + 2.0, entry.label_rect.y + 2.0),
                color: label_text_color(entry.color),
                size: Pixels(LABEL_FONT_SIZE),
                ..Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}

/// Top-down field: detection markers behind the robot footprint.
#[derive(Debug, Clone)]
pub struct FieldProgram {
    pub payload: DetectionPayload,
    pub icons: IconSet,
}

impl<Message> canvas::Program<Message> for FieldProgram {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let transform = FieldTransform::new(bounds.width, bounds.height);
        let side = FIELD_SIZE_INCHES * transform.scale;

        frame.fill_rectangle(
            Point::new(transform.offset_x, transform.offset_y),
            Size::new(side, side),
            Color::from_rgb(0.16, 0.16, 0.18),
        );
        let border = Path::rectangle(
            Point::new(transform.offset_x, transform.offset_y),
            Size::new(side, side),
        );
        frame.stroke(
            &border,
            Stroke::default()
                .with_width(2.0)
                .with_color(Color::from_rgb(0.6, 0.6, 0.65)),
        );

        for marker in field_markers(&self.payload, &transform) {
            if marker.opacity <= 0.0 {
                continue;
            }
            let half = marker.size_px / 2.0;
            let area = Rectangle::new(
                Point::new(marker.center_x - half, marker.center_y - half),
                Size::new(marker.size_px, marker.size_px),
            );
            match self.icons.get(&marker.class) {
                Some(handle) => {
                    frame.draw_image(
                        area,
                        canvas::Image::new(handle.clone()).opacity(marker.opacity),
                    );
                }
                None => {
                    let circle = Path::circle(
                        Point::new(marker.center_x, marker.center_y),
                        half,
                    );
                    frame.fill(&circle, color(fallback_color(&marker.class), marker.opacity));
                }
            }
        }

        if let Some(pose) = &self.payload.pose {
            let corners = robot_corners(pose, &transform);
            let body = Path::new(|builder| {
                builder.move_to(Point::new(corners[0].0, corners[0].1));
                for corner in &corners[1..] {
                    builder.line_to(Point::new(corner.0, corner.1));
                }
                builder.close();
            });
            frame.fill(&body, Color::from_rgba(0.0, 0.0, 0.0, 0.9));
            frame.stroke(
                &body,
                Stroke::default()
                    .with_width(1.5)
                    .with_color(Color::from_rgb(0.75, 0.75, 0.8)),
            );

            // Front face of the robot.
            let front = Path::new(|builder| {
                builder.move_to(Point::new(corners[0].0, corners[0].1));
                builder.line_to(Point::new(corners[1].0, corners[1].1));
            });
            frame.stroke(
                &front,
                Stroke::default()
                    .with_width(3.0)
                    .with_color(Color::from_rgb(0.2, 0.9, 0.3)),
            );
        }

        vec![frame.into_geometry()]
    }
}
