//! Configuration for PSF-filtered flux measurement.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::warp::WarpingKernel;

/// Filtered-flux configuration.
///
/// The warping kernel is kept as a name so that configuration files can carry
/// any string; it is resolved by [`Config::warping_kernel`] at measurement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Resampling family used for the sub-pixel shift: `"bilinear"` or
    /// `"lanczos2"` to `"lanczos5"`.
    pub warping_kernel_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            warping_kernel_name: WarpingKernel::default().to_string(),
        }
    }
}

impl Config {
    pub fn new(kernel: WarpingKernel) -> Self {
        Self {
            warping_kernel_name: kernel.to_string(),
        }
    }

    /// Resolve the configured warping kernel.
    pub fn warping_kernel(&self) -> Result<WarpingKernel> {
        WarpingKernel::from_name(&self.warping_kernel_name)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<()> {
        self.warping_kernel().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.warping_kernel_name, "lanczos3");
        assert_eq!(config.warping_kernel().unwrap(), WarpingKernel::Lanczos3);
        config.validate().unwrap();
    }

    #[test]
    fn test_config_from_kernel() {
        let config = Config::new(WarpingKernel::Bilinear);
        assert_eq!(config.warping_kernel_name, "bilinear");
    }

    #[test]
    fn test_config_invalid_kernel() {
        let config = Config {
            warping_kernel_name: "sinc".to_string(),
        };
        assert_eq!(
            config.validate().unwrap_err(),
            Error::UnknownWarpingKernel {
                name: "sinc".to_string()
            }
        );
    }

    #[test]
    fn test_config_deserialize() {
        let config: Config = serde_json::from_str(r#"{"warping_kernel_name": "lanczos4"}"#).unwrap();
        assert_eq!(config.warping_kernel().unwrap(), WarpingKernel::Lanczos4);

        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let result = serde_json::from_str::<Config>(r#"{"warping_kernel": "lanczos4"}"#);
        assert!(result.is_err());
    }
}
