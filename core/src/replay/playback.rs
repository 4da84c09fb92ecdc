//! Frame-accurate playback state for a loaded replay session.
//!
//! The timer itself lives in the UI (a 100 ms subscription active while
//! `is_playing()`); this state machine owns every index transition so the
//! boundary rules stay testable. Exactly one playback exists per session:
//! loading a new session constructs a fresh `Playback`, which stops the old
//! timer because the old playing flag is gone with it.

use std::time::Duration;

/// Fixed playback rate: 10 frames per second.
pub const FRAME_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    frame_count: usize,
    index: usize,
    playing: bool,
}

impl Playback {
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_count,
            index: 0,
            playing: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    fn last_index(&self) -> usize {
        self.frame_count.saturating_sub(1)
    }

    /// Starts timed playback. A no-op while already playing or when the
    /// cursor sits on the last frame.
    pub fn play(&mut self) {
        if self.playing || self.frame_count == 0 || self.index >= self.last_index() {
            return;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Moves the cursor, clamped to the valid range. Playback keeps going if
    /// it was going; the UI restarts its timer, so a brief stutter is fine.
    pub fn seek(&mut self, frame_index: usize) {
        if self.frame_count == 0 {
            return;
        }
        self.index = frame_index.min(self.last_index());
        if self.playing && self.index >= self.last_index() {
            self.playing = false;
        }
    }

    pub fn step_forward(&mut self) {
        if self.frame_count != 0 && self.index < self.last_index() {
            self.index += 1;
        }
    }

    pub fn step_backward(&mut self) {
        if self.index > 0 {
            self.index -= 1;
        }
    }

    /// One timer tick: advance a frame, auto-pausing at the end.
    pub fn tick(&mut self) {
        if !self.playing {
            return;
        }
        if self.index < self.last_index() {
            self.index += 1;
        }
        if self.index >= self.last_index() {
            self.playing = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_at_last_index_is_a_no_op() {
        let mut playback = Playback::new(3);
        playback.seek(2);
        playback.play();
        assert!(!playback.is_playing());
    }

    #[test]
    fn play_while_playing_is_a_no_op() {
        let mut playback = Playback::new(10);
        playback.play();
        assert!(playback.is_playing());
        playback.play();
        assert!(playback.is_playing());
        assert_eq!(playback.index(), 0);
    }

    #[test]
    fn tick_advances_and_stops_at_the_end() {
        let mut playback = Playback::new(3);
        playback.play();
        playback.tick();
        assert_eq!(playback.index(), 1);
        assert!(playback.is_playing());
        playback.tick();
        assert_eq!(playback.index(), 2);
        assert!(!playback.is_playing());
        playback.tick();
        assert_eq!(playback.index(), 2);
    }

    #[test]
    fn seek_clamps_and_is_idempotent() {
        let mut playback = Playback::new(5);
        playback.seek(100);
        assert_eq!(playback.index(), 4);
        playback.seek(2);
        let snapshot = playback;
        playback.seek(2);
        assert_eq!(playback, snapshot);
    }

    #[test]
    fn steps_are_no_ops_at_the_boundaries() {
        let mut playback = Playback::new(2);
        playback.step_backward();
        assert_eq!(playback.index(), 0);
        playback.step_forward();
        assert_eq!(playback.index(), 1);
        playback.step_forward();
        assert_eq!(playback.index(), 1);
    }

    #[test]
    fn empty_session_never_plays() {
        let mut playback = Playback::new(0);
        playback.play();
        playback.tick();
        playback.seek(3);
        assert!(!playback.is_playing());
        assert_eq!(playback.index(), 0);
    }
}
