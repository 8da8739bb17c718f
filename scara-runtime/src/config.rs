use std::path::Path;

use crate::math::Point;
use crate::robot::{Chain, ChainBuilder};

pub trait Configurable: Clone {
    fn global(&self) -> &GlobalConfig;
}

/// Global configuration.
#[derive(Clone, Debug, Default)]
pub struct GlobalConfig {
    /// Name of the binary.
    pub bin_name: String,

    /// Whether the application runs as daemon.
    pub daemon: bool,
}

impl Configurable for GlobalConfig {
    fn global(&self) -> &GlobalConfig {
        self
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "{}", e),
            ConfigError::Parse(e) => write!(f, "{}", e),
            ConfigError::Invalid(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Parse(value)
    }
}

#[derive(Clone, Debug, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct BaseConfig {
    pub x: f64,
    pub y: f64,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

#[derive(Clone, Debug, PartialEq, serde_derive::Deserialize)]
pub struct LinkConfig {
    /// Link length.
    pub length: f64,
    /// Initial local angle in degrees.
    #[serde(default)]
    pub angle: f64,
}

#[derive(Clone, Debug, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Joint step in degrees per tick.
    pub step_size: f64,
    /// Controller ticks per second.
    pub tick_rate: f64,
}

impl MotionConfig {
    /// Highest supported controller rate in Hz.
    pub const MAX_TICK_RATE: f64 = 1_000.0;
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            step_size: 0.5,
            tick_rate: 60.0,
        }
    }
}

/// Machine description.
///
/// Sections left out of the file take their default, which is a two link
/// arm of 80 and 40 units mounted at the origin.
#[derive(Clone, Debug, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub base: BaseConfig,
    #[serde(rename = "link")]
    pub links: Vec<LinkConfig>,
    pub motion: MotionConfig,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            links: vec![
                LinkConfig {
                    length: 80.0,
                    angle: 0.0,
                },
                LinkConfig {
                    length: 40.0,
                    angle: 0.0,
                },
            ],
            motion: MotionConfig::default(),
        }
    }
}

impl MachineConfig {
    /// Read the configuration from the first existing file.
    ///
    /// Falls back to the default configuration if none of the files exist.
    pub fn try_from_file<P: AsRef<Path>>(
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Self, ConfigError> {
        for path in paths {
            let path = path.as_ref();
            if path.exists() {
                log::debug!("Reading configuration from {}", path.display());

                return Self::from_toml(&std::fs::read_to_string(path)?);
            }
        }

        log::debug!("No configuration file found, using defaults");

        Ok(Self::default())
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.links.is_empty() {
            return Err(ConfigError::Invalid("at least one link is required"));
        }
        if self
            .links
            .iter()
            .any(|link| !(link.length.is_finite() && link.length > 0.0))
        {
            return Err(ConfigError::Invalid("link length must be positive"));
        }
        if !(self.motion.step_size.is_finite() && self.motion.step_size > 0.0) {
            return Err(ConfigError::Invalid("step size must be positive"));
        }
        if !(self.motion.tick_rate.is_finite() && self.motion.tick_rate > 0.0) {
            return Err(ConfigError::Invalid("tick rate must be positive"));
        }
        if self.motion.tick_rate > MotionConfig::MAX_TICK_RATE {
            return Err(ConfigError::Invalid("tick rate exceeds 1000 Hz"));
        }

        Ok(())
    }

    #[inline]
    pub fn base_point(&self) -> Point {
        Point::new(self.base.x, self.base.y)
    }

    /// Construct the closed chain described by this configuration.
    pub fn build_chain(&self) -> crate::runtime::Result<Chain> {
        let links = self
            .links
            .iter()
            .map(|link| (link.length, link.angle))
            .collect::<Vec<_>>();

        ChainBuilder::planar_arm(self.base_point(), &links).build()
    }
}

impl std::fmt::Display for MachineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Base: ({:.2}, {:.2}); Links: {}; Step: {:.2}°; Rate: {:.1}Hz",
            self.base.x,
            self.base.y,
            self.links.len(),
            self.motion.step_size,
            self.motion.tick_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let config = MachineConfig::from_toml(
            r#"
            [base]
            x = 10.0
            y = -5.0

            [[link]]
            length = 80.0
            angle = 30.0

            [[link]]
            length = 40.0

            [motion]
            step_size = 1.0
            "#,
        )
        .unwrap();

        assert_eq!(config.base_point(), Point::new(10.0, -5.0));
        assert_eq!(config.links.len(), 2);
        assert_eq!(config.links[0].angle, 30.0);
        assert_eq!(config.links[1].angle, 0.0);
        assert_eq!(config.motion.step_size, 1.0);
        assert_eq!(config.motion.tick_rate, 60.0);

        let chain = config.build_chain().unwrap();
        assert!(chain.is_closed());
        assert_eq!(chain.base_point(), Some(Point::new(10.0, -5.0)));
        assert_eq!(chain.local_angles(), vec![30.0, 0.0]);
    }

    #[test]
    fn test_defaults() {
        let config = MachineConfig::from_toml("").unwrap();

        assert_eq!(config, MachineConfig::default());
        assert_eq!(config.build_chain().unwrap().link_lengths(), vec![80.0, 40.0]);
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            MachineConfig::from_toml("link = []"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MachineConfig::from_toml("[[link]]\nlength = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MachineConfig::from_toml("[motion]\nstep_size = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MachineConfig::from_toml("[[link]]\nangle = 1.0"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_tick_rate_bounds() {
        let mut config = MachineConfig::default();

        config.motion.tick_rate = MotionConfig::MAX_TICK_RATE;
        assert!(config.validate().is_ok());

        config.motion.tick_rate = 1e300;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.motion.tick_rate = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        assert!(matches!(
            MachineConfig::from_toml("[motion]\ntick_rate = 5000.0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_try_from_file() {
        let config = MachineConfig::try_from_file(["/nonexistent/scara.toml"]).unwrap();
        assert_eq!(config, MachineConfig::default());

        let path = std::env::temp_dir().join(format!("scara-{}.toml", std::process::id()));
        std::fs::write(&path, "[[link]]\nlength = 25.0\n").unwrap();

        let config =
            MachineConfig::try_from_file([Path::new("/nonexistent/scara.toml"), path.as_path()])
                .unwrap();
        assert_eq!(config.links.len(), 1);
        assert_eq!(config.links[0].length, 25.0);

        std::fs::remove_file(path).unwrap();
    }
}
