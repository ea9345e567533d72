//! Minimal ANSI color helpers for the console.

use crate::engine::scene::SceneKey;

pub const RESET: &str = "\x1b[0m";

pub fn fg_rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub fn paint_fg(text: impl AsRef<str>, (r, g, b): (u8, u8, u8)) -> String {
    format!("{}{}{}", fg_rgb(r, g, b), text.as_ref(), RESET)
}

pub fn scale_rgb((r, g, b): (u8, u8, u8), factor: f32) -> (u8, u8, u8) {
    fn scale_u8(v: u8, factor: f32) -> u8 {
        let scaled = (f32::from(v) * factor).round();
        scaled.clamp(0.0, 255.0) as u8
    }

    (scale_u8(r, factor), scale_u8(g, factor), scale_u8(b, factor))
}

/// One accent per scene, so transitions stand out in a scrolling log.
pub fn scene_rgb(scene: SceneKey) -> (u8, u8, u8) {
    match scene {
        SceneKey::Home => (235, 235, 235),
        SceneKey::Arcade => (255, 90, 200),
        SceneKey::Stairs => (255, 190, 80),
        SceneKey::Hoop => (255, 120, 40),
        SceneKey::Projects => (90, 200, 255),
        SceneKey::Menu => (140, 230, 140),
    }
}

pub fn scene(scene: SceneKey) -> String {
    paint_fg(scene.name(), scene_rgb(scene))
}

pub fn dim(text: impl AsRef<str>) -> String {
    paint_fg(text, scale_rgb((235, 235, 235), 0.55))
}

/// Strip ANSI escapes (for tests and non-tty output).
pub fn strip(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
