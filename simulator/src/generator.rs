//! Seeded synthetic frame generator.
//!
//! Produces payloads in the shape the dashboard expects: detections
//! wandering through a 640x480 camera frame (with field coordinates for the
//! top-down view), a robot circling the field, and slowly drifting system
//! stats. Deterministic for a given seed so scenarios replay consistently.

use crate::scenario::ScenarioConfig;
use rand::{rngs::StdRng, Rng, SeedableRng};
use vairccore::prelude::{Detection, DetectionPayload, JetsonStats, Pose};

pub const IMAGE_WIDTH: f64 = 640.0;
pub const IMAGE_HEIGHT: f64 = 480.0;

const CLASSES: [&str; 4] = ["red", "blue", "goal", "bot"];

struct TrackedObject {
    class: &'static str,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    field_x: f64,
    field_y: f64,
}

pub struct FrameGenerator {
    config: ScenarioConfig,
    rng: StdRng,
    objects: Vec<TrackedObject>,
    tick: u64,
}

impl FrameGenerator {
    pub fn new(config: ScenarioConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let objects = (0..config.object_count)
            .map(|index| TrackedObject {
                class: CLASSES[index % CLASSES.len()],
                x: rng.gen_range(60.0..IMAGE_WIDTH - 60.0),
                y: rng.gen_range(60.0..IMAGE_HEIGHT - 60.0),
                vx: rng.gen_range(-4.0..4.0),
                vy: rng.gen_range(-3.0..3.0),
                field_x: rng.gen_range(-60.0..60.0),
                field_y: rng.gen_range(-60.0..60.0),
            })
            .collect();
        Self {
            config,
            rng,
            objects,
            tick: 0,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn next_payload(&mut self) -> DetectionPayload {
        self.tick += 1;
        let noise = self.config.noise.max(0.0);

        let mut detections = Vec::with_capacity(self.objects.len());
        for object in &mut self.objects {
            object.x += object.vx;
            object.y += object.vy;
            if object.x < 40.0 || object.x > IMAGE_WIDTH - 40.0 {
                object.vx = -object.vx;
                object.x = object.x.clamp(40.0, IMAGE_WIDTH - 40.0);
            }
            if object.y < 30.0 || object.y > IMAGE_HEIGHT - 30.0 {
                object.vy = -object.vy;
                object.y = object.y.clamp(30.0, IMAGE_HEIGHT - 30.0);
            }
            object.field_x = (object.field_x + object.vx * 0.2).clamp(-70.0, 70.0);
            object.field_y = (object.field_y - object.vy * 0.2).clamp(-70.0, 70.0);

            let jitter = if noise > 0.0 {
                self.rng.gen_range(-noise..noise)
            } else {
                0.0
            };
            let confidence = (0.75 + jitter).clamp(0.05, 1.0);
            detections.push(Detection {
                x: object.x,
                y: object.y,
                width: 80.0,
                height: 60.0,
                class: object.class.to_string(),
                confidence,
                depth: Some(1.0 + object.y / IMAGE_HEIGHT * 3.0),
                fx: Some(object.field_x),
                fy: Some(object.field_y),
                fz: None,
            });
        }

        let angle = (self.tick as f64 * 3.0).to_radians();
        let pose = Pose {
            x: 40.0 * angle.cos(),
            y: 40.0 * angle.sin(),
            theta: (self.tick as f64 * 3.0) % 360.0,
        };

        let uptime = self.tick as f64 / f64::from(self.config.fps.max(1));
        let jetson = JetsonStats {
            cpu_temp: 46.0 + (self.tick as f64 * 0.05).sin() * 4.0,
            gpu_temp: 43.0 + (self.tick as f64 * 0.04).cos() * 3.0,
            uptime,
        };

        DetectionPayload {
            detections,
            pose: Some(pose),
            jetson: Some(jetson),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_replays_the_same_frames() {
        let config = ScenarioConfig::from_args(10, 10, 42);
        let mut first = FrameGenerator::new(config.clone());
        let mut second = FrameGenerator::new(config);
        for _ in 0..5 {
            assert_eq!(first.next_payload(), second.next_payload());
        }
    }

    #[test]
    fn detections_stay_inside_the_camera_frame() {
        let mut generator = FrameGenerator::new(ScenarioConfig::from_args(10, 10, 1));
        for _ in 0..200 {
            let payload = generator.next_payload();
            assert_eq!(payload.detections.len(), 4);
            for detection in &payload.detections {
                assert!(detection.x >= 0.0 && detection.x <= IMAGE_WIDTH);
                assert!(detection.y >= 0.0 && detection.y <= IMAGE_HEIGHT);
                assert!((0.0..=1.0).contains(&detection.confidence));
            }
        }
    }

    #[test]
    fn payload_carries_pose_and_stats() {
        let mut generator = FrameGenerator::new(ScenarioConfig::from_args(10, 10, 3));
        let payload = generator.next_payload();
        assert!(payload.pose.is_some());
        let jetson = payload.jetson.unwrap();
        assert!(jetson.cpu_temp > 0.0);
    }
}
