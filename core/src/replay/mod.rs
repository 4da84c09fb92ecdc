pub mod index;
pub mod playback;

pub use index::{FrameState, ReplayFile, ReplaySession};
pub use playback::Playback;
