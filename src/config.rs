use crate::display::{Key, KeyInput};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Scale must be a power of two in [{min}, {max}], got {0}", min = RenderConfig::MIN_SCALE, max = RenderConfig::MAX_SCALE)]
    InvalidScale(u32),

    #[error("Max depth must be in [{min}, {max}], got {0}", min = RenderConfig::MIN_DEPTH, max = RenderConfig::MAX_DEPTH)]
    InvalidDepth(u32),
}

/// Per-frame render parameters, owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    scale: u32,
    max_depth: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 8,
            max_depth: 4,
        }
    }
}

impl RenderConfig {
    pub const MIN_SCALE: u32 = 1;
    pub const MAX_SCALE: u32 = 16;
    pub const MIN_DEPTH: u32 = 1;
    pub const MAX_DEPTH: u32 = 4;

    pub fn new(scale: u32, max_depth: u32) -> Result<Self, ConfigError> {
        Self::check_scale(scale)?;
        Self::check_depth(max_depth)?;
        Ok(Self { scale, max_depth })
    }

    pub fn check_scale(scale: u32) -> Result<u32, ConfigError> {
        if scale.is_power_of_two() && (Self::MIN_SCALE..=Self::MAX_SCALE).contains(&scale) {
            Ok(scale)
        } else {
            Err(ConfigError::InvalidScale(scale))
        }
    }

    pub fn check_depth(max_depth: u32) -> Result<u32, ConfigError> {
        if (Self::MIN_DEPTH..=Self::MAX_DEPTH).contains(&max_depth) {
            Ok(max_depth)
        } else {
            Err(ConfigError::InvalidDepth(max_depth))
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn scale_down(&mut self) -> bool {
        if self.scale > Self::MIN_SCALE {
            self.scale /= 2;
            true
        } else {
            false
        }
    }

    pub fn scale_up(&mut self) -> bool {
        if self.scale < Self::MAX_SCALE {
            self.scale *= 2;
            true
        } else {
            false
        }
    }

    pub fn depth_down(&mut self) -> bool {
        if self.max_depth > Self::MIN_DEPTH {
            self.max_depth -= 1;
            true
        } else {
            false
        }
    }

    pub fn depth_up(&mut self) -> bool {
        if self.max_depth < Self::MAX_DEPTH {
            self.max_depth += 1;
            true
        } else {
            false
        }
    }

    /// Applies this frame's key presses. At most one scale and one depth
    /// change per frame; the "down" key wins when both are pressed.
    /// Returns true if anything changed.
    pub fn apply_keys(&mut self, input: &impl KeyInput) -> bool {
        let scale_changed = if self.scale > Self::MIN_SCALE && input.key_pressed(Key::ScaleDown) {
            self.scale_down()
        } else if self.scale < Self::MAX_SCALE && input.key_pressed(Key::ScaleUp) {
            self.scale_up()
        } else {
            false
        };

        let depth_changed = if self.max_depth > Self::MIN_DEPTH && input.key_pressed(Key::DepthDown)
        {
            self.depth_down()
        } else if self.max_depth < Self::MAX_DEPTH && input.key_pressed(Key::DepthUp) {
            self.depth_up()
        } else {
            false
        };

        if scale_changed || depth_changed {
            tracing::info!(scale = self.scale, max_depth = self.max_depth, "render config changed");
        }
        scale_changed || depth_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::InputState;
    use proptest::prelude::*;

    #[test]
    fn new_validates_bounds() {
        assert!(RenderConfig::new(8, 4).is_ok());
        assert_eq!(RenderConfig::new(3, 2), Err(ConfigError::InvalidScale(3)));
        assert_eq!(RenderConfig::new(32, 2), Err(ConfigError::InvalidScale(32)));
        assert_eq!(RenderConfig::new(0, 2), Err(ConfigError::InvalidScale(0)));
        assert_eq!(RenderConfig::new(2, 0), Err(ConfigError::InvalidDepth(0)));
        assert_eq!(RenderConfig::new(2, 5), Err(ConfigError::InvalidDepth(5)));
    }

    #[test]
    fn scale_saturates_at_bounds() {
        let mut config = RenderConfig::new(16, 1).unwrap();
        assert!(!config.scale_up());
        assert!(!config.depth_down());
        assert_eq!(config.scale(), 16);
        for _ in 0..10 {
            config.scale_down();
        }
        assert_eq!(config.scale(), 1);
    }

    #[test]
    fn down_key_wins_over_up_key() {
        let mut config = RenderConfig::new(4, 2).unwrap();
        let mut input = InputState::new();
        input.set(Key::ScaleDown, true);
        input.set(Key::ScaleUp, true);
        input.set(Key::DepthDown, true);
        input.set(Key::DepthUp, true);
        assert!(config.apply_keys(&input));
        assert_eq!(config.scale(), 2);
        assert_eq!(config.max_depth(), 1);
    }

    #[test]
    fn up_key_applies_when_down_is_saturated() {
        let mut config = RenderConfig::new(1, 1).unwrap();
        let mut input = InputState::new();
        input.set(Key::ScaleDown, true);
        input.set(Key::ScaleUp, true);
        input.set(Key::DepthDown, true);
        input.set(Key::DepthUp, true);
        assert!(config.apply_keys(&input));
        assert_eq!(config.scale(), 2);
        assert_eq!(config.max_depth(), 2);
    }

    #[test]
    fn no_keys_no_change() {
        let mut config = RenderConfig::default();
        assert!(!config.apply_keys(&InputState::new()));
        assert_eq!(config, RenderConfig::default());
    }

    fn any_key() -> impl Strategy<Value = Key> {
        prop_oneof![
            Just(Key::ScaleDown),
            Just(Key::ScaleUp),
            Just(Key::DepthDown),
            Just(Key::DepthUp),
        ]
    }

    proptest! {
        #[test]
        fn config_stays_in_bounds(frames in prop::collection::vec(prop::collection::vec(any_key(), 0..4), 0..64)) {
            let mut config = RenderConfig::default();
            let mut input = InputState::new();
            for keys in frames {
                for key in &keys {
                    input.set(*key, true);
                }
                config.apply_keys(&input);
                for key in &keys {
                    input.set(*key, false);
                }
                input.end_frame();

                prop_assert!(config.scale().is_power_of_two());
                prop_assert!((1..=16).contains(&config.scale()));
                prop_assert!((1..=4).contains(&config.max_depth()));
            }
        }
    }
}
