#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Maze Chase.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The backend grabs the cursor, polls WASD and mouse motion every frame and
//! draws the meshes handed to it with macroquad's 3D mesh API. `Escape`
//! closes the window.

mod input;
mod renderer;

use std::time::{Duration, Instant};

use anyhow::Result;
use macroquad::input::{is_key_pressed, set_cursor_grab, show_mouse, KeyCode};
use maze_chase_rendering::{
    FrameCallback, InputCollaborator, LoopControl, Presentation, RenderCollaborator,
    RenderingBackend,
};
use tracing::{debug, info};

use self::{input::MacroquadInput, renderer::MacroquadRenderer};

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run(self, presentation: Presentation, mut frame: FrameCallback) -> Result<()> {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            width,
            height,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(width).unwrap_or(i32::MAX),
            window_height: i32::try_from(height).unwrap_or(i32::MAX),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            set_cursor_grab(true);
            show_mouse(false);

            let background = to_macroquad_color(clear_color);
            let mut input = MacroquadInput::default();
            let mut renderer = MacroquadRenderer::default();
            let mut fps_counter = FpsCounter::default();
            info!("window_opened");

            loop {
                if is_key_pressed(KeyCode::Escape) {
                    break;
                }

                macroquad::window::clear_background(background);
                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height().max(1.0);
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let control = frame(
                    frame_dt,
                    &mut input as &mut dyn InputCollaborator,
                    &mut renderer as &mut dyn RenderCollaborator,
                    screen_width / screen_height,
                );
                macroquad::camera::set_default_camera();

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(Instant::now()) {
                        debug!(frames = per_second, "frame_rate");
                    }
                }

                if control == LoopControl::Exit {
                    break;
                }
                macroquad::window::next_frame().await;
            }

            set_cursor_grab(false);
            show_mouse(true);
            info!("window_closed");
        });

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
}

impl FpsCounter {
    /// Counts a frame and returns the total once a full second has elapsed.
    fn record_frame(&mut self, now: Instant) -> Option<u32> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        if now.duration_since(start) < Duration::from_secs(1) {
            return None;
        }
        let frames = self.frames;
        self.window_start = Some(now);
        self.frames = 0;
        Some(frames)
    }
}

fn to_macroquad_color(color: maze_chase_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_counter_reports_once_per_second() {
        let start = Instant::now();
        let mut counter = FpsCounter::default();
        assert_eq!(counter.record_frame(start), None);
        assert_eq!(counter.record_frame(start + Duration::from_millis(500)), None);
        assert_eq!(
            counter.record_frame(start + Duration::from_millis(1_000)),
            Some(3)
        );
        assert_eq!(
            counter.record_frame(start + Duration::from_millis(1_100)),
            None
        );
    }

    #[test]
    fn vsync_maps_to_swap_interval() {
        assert_eq!(MacroquadBackend::new().with_vsync(true).swap_interval, Some(1));
        assert_eq!(MacroquadBackend::new().with_vsync(false).swap_interval, Some(0));
        assert_eq!(MacroquadBackend::new().swap_interval, None);
    }

    #[test]
    fn colors_keep_their_channels() {
        let color = to_macroquad_color(maze_chase_rendering::Color::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(
            (color.r, color.g, color.b, color.a),
            (0.1, 0.2, 0.3, 0.4)
        );
    }
}
