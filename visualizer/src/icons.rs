//! Category icons for the field view.
//!
//! Sprites live in `assets/icons/<class>.png`, may be non-square, and are
//! center-cropped to a square before upload. A missing or unreadable sprite
//! is not an error; the field canvas falls back to a solid circle.

use iced::widget::image::Handle;
use log::debug;
use std::path::Path;
use vairccore::render::field::crop_square;

const CLASSES: [&str; 4] = ["red", "blue", "goal", "bot"];

#[derive(Debug, Clone, Default)]
pub struct IconSet {
    red: Option<Handle>,
    blue: Option<Handle>,
    goal: Option<Handle>,
    bot: Option<Handle>,
}

impl IconSet {
    /// Loads whatever sprites exist under `assets/icons/`.
    pub fn load() -> Self {
        let mut icons = IconSet::default();
        for class in CLASSES {
            let path = format!("assets/icons/{}.png", class);
            match load_square(Path::new(&path)) {
                Some(handle) => match class {
                    "red" => icons.red = Some(handle),
                    "blue" => icons.blue = Some(handle),
                    "goal" => icons.goal = Some(handle),
                    _ => icons.bot = Some(handle),
                },
                None => debug!("no icon at {}; using fallback circle", path),
            }
        }
        icons
    }

    pub fn get(&self, class: &str) -> Option<&Handle> {
        match class.to_ascii_lowercase().as_str() {
            "red" => self.red.as_ref(),
            "blue" => self.blue.as_ref(),
            "goal" => self.goal.as_ref(),
            "bot" => self.bot.as_ref(),
            _ => None,
        }
    }
}

fn load_square(path: &Path) -> Option<Handle> {
    let sprite = image::open(path).ok()?;
    let (crop_x, crop_y, size) = crop_square(sprite.width(), sprite.height());
    let square = sprite.crop_imm(crop_x, crop_y, size, size).into_rgba8();
    Some(Handle::from_rgba(size, size, square.into_raw()))
}
