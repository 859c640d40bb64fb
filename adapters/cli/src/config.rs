//! Optional TOML configuration for the binary.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use maze_chase_system_camera::CameraSettings;
use maze_chase_system_round::{Reseed, RoundConfig, DEFAULT_ADVERSARY_COUNT};
use maze_chase_world::{Rules, DEFAULT_ANIMATION_CADENCE, DEFAULT_SPEED};
use serde::Deserialize;

/// How adversaries pick a seed each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ReseedMode {
    /// Unix seconds; the same for every frame within a second.
    #[default]
    WallClock,
    /// `seed` on every frame.
    Fixed,
    /// `seed` plus the frame index.
    FrameCounter,
}

/// Window options for the interactive mode.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) title: String,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Maze Chase".to_string(),
            vsync: true,
            show_fps: false,
        }
    }
}

/// Settings read from the configuration file. Every key is optional.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) level: Option<PathBuf>,
    pub(crate) adversaries: usize,
    pub(crate) speed: f32,
    pub(crate) animation_cadence: u32,
    pub(crate) adversary_collision_ends_round: bool,
    pub(crate) reseed: ReseedMode,
    pub(crate) seed: u64,
    pub(crate) spawn_seed: u64,
    pub(crate) mouse_sensitivity: f32,
    pub(crate) initial_yaw_degrees: f32,
    pub(crate) window: WindowConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        let rules = Rules::default();
        let camera = CameraSettings::default();
        Self {
            level: None,
            adversaries: DEFAULT_ADVERSARY_COUNT,
            speed: DEFAULT_SPEED,
            animation_cadence: DEFAULT_ANIMATION_CADENCE,
            adversary_collision_ends_round: rules.adversary_collision_ends_round,
            reseed: ReseedMode::default(),
            seed: 0,
            spawn_seed: 0,
            mouse_sensitivity: camera.sensitivity,
            initial_yaw_degrees: camera.initial_yaw_degrees,
            window: WindowConfig::default(),
        }
    }
}

impl GameConfig {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid config toml")
    }

    /// Round settings described by this configuration.
    pub(crate) fn round_config(&self) -> RoundConfig {
        let reseed = match self.reseed {
            ReseedMode::WallClock => Reseed::WallClock,
            ReseedMode::Fixed => Reseed::Fixed(self.seed),
            ReseedMode::FrameCounter => Reseed::FrameCounter { base: self.seed },
        };
        RoundConfig {
            rules: Rules {
                speed: self.speed,
                animation_cadence: self.animation_cadence,
                adversary_collision_ends_round: self.adversary_collision_ends_round,
            },
            adversaries: self.adversaries,
            spawn_seed: self.spawn_seed,
            reseed,
            camera: CameraSettings {
                sensitivity: self.mouse_sensitivity,
                initial_yaw_degrees: self.initial_yaw_degrees,
                ..CameraSettings::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let config = GameConfig::parse("").expect("empty config parses");
        assert_eq!(config, GameConfig::default());

        let round = config.round_config();
        assert_eq!(round.adversaries, DEFAULT_ADVERSARY_COUNT);
        assert_eq!(round.reseed, Reseed::WallClock);
        assert_eq!(round.rules, Rules::default());
    }

    #[test]
    fn file_values_flow_into_the_round() {
        let config = GameConfig::parse(
            r#"
                level = "levels/level0"
                adversaries = 2
                speed = 3.5
                reseed = "frame-counter"
                seed = 40
                spawn_seed = 7
                adversary_collision_ends_round = false

                [window]
                width = 640
                vsync = false
            "#,
        )
        .expect("config parses");

        assert_eq!(config.level, Some(PathBuf::from("levels/level0")));
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, WindowConfig::default().height);
        assert!(!config.window.vsync);
        assert!(!config.window.show_fps);

        let round = config.round_config();
        assert_eq!(round.adversaries, 2);
        assert_eq!(round.spawn_seed, 7);
        assert_eq!(round.reseed, Reseed::FrameCounter { base: 40 });
        assert_eq!(round.rules.speed, 3.5);
        assert!(!round.rules.adversary_collision_ends_round);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = GameConfig::parse("ghosts = 4").expect_err("unknown key");
        assert!(
            format!("{error:#}").contains("ghosts"),
            "error should name the key: {error:#}"
        );
        assert!(GameConfig::parse("[window]\nfullscreen = true").is_err());
    }

    #[test]
    fn frame_rate_logging_is_opt_in() {
        let config = GameConfig::parse("[window]\nshow_fps = true").expect("config parses");
        assert!(config.window.show_fps);
        assert!(!GameConfig::default().window.show_fps);
    }

    #[test]
    fn fixed_reseed_uses_the_seed() {
        let config = GameConfig::parse("reseed = \"fixed\"\nseed = 9").expect("config parses");
        assert_eq!(config.round_config().reseed, Reseed::Fixed(9));
    }
}
