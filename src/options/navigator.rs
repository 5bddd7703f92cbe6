use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::KernelError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Navigation", inline)]
#[serde(default)]
/// Free-flight navigator tuning.
pub struct NavigatorOptions {
    /// Acceleration while a movement action is held, in units/s².
    #[schemars(
        title = "Acceleration",
        range(min = 0.5, max = 50.0),
        extend("step" = 0.5)
    )]
    pub acceleration: f32,
    /// Speed cap in units/s.
    #[schemars(
        title = "Max Speed",
        range(min = 0.5, max = 50.0),
        extend("step" = 0.5)
    )]
    pub max_speed: f32,
    /// Speed cap multiplier while fast-move is held.
    #[schemars(
        title = "Fast Multiplier",
        range(min = 1.0, max = 10.0),
        extend("step" = 0.5)
    )]
    pub fast_multiplier: f32,
    /// Exponential damping rate once movement is released, per second.
    #[schemars(skip)]
    pub damping: f32,
    /// Radians of yaw/pitch per pixel of pointer motion.
    #[schemars(
        title = "Look Sensitivity",
        range(min = 0.0005, max = 0.02),
        extend("step" = 0.0005)
    )]
    pub look_sensitivity: f32,
    /// Squared speed below which the velocity snaps to zero.
    #[schemars(skip)]
    pub stop_threshold: f32,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            acceleration: 5.0,
            max_speed: 5.0,
            fast_multiplier: 3.0,
            damping: 10.0,
            look_sensitivity: 0.005,
            stop_threshold: 1e-6,
        }
    }
}

impl NavigatorOptions {
    /// Reject tuning that would feed NaN or reversed motion into the
    /// camera: every rate must be finite and non-negative, and the fast
    /// multiplier at least 1.
    pub fn validate(&self) -> Result<(), KernelError> {
        let rates = [
            ("acceleration", self.acceleration),
            ("max_speed", self.max_speed),
            ("damping", self.damping),
            ("look_sensitivity", self.look_sensitivity),
            ("stop_threshold", self.stop_threshold),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(KernelError::InvalidOptions(format!(
                    "navigator.{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        let multiplier = self.fast_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(KernelError::InvalidOptions(format!(
                "navigator.fast_multiplier must be finite and >= 1, \
                 got {multiplier}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(NavigatorOptions::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_finite_and_negative_rates() {
        let bad = [
            NavigatorOptions {
                acceleration: f32::NAN,
                ..NavigatorOptions::default()
            },
            NavigatorOptions {
                max_speed: -5.0,
                ..NavigatorOptions::default()
            },
            NavigatorOptions {
                damping: f32::INFINITY,
                ..NavigatorOptions::default()
            },
            NavigatorOptions {
                look_sensitivity: -0.1,
                ..NavigatorOptions::default()
            },
            NavigatorOptions {
                fast_multiplier: 0.5,
                ..NavigatorOptions::default()
            },
        ];
        for options in bad {
            let err = options.validate().unwrap_err();
            assert!(matches!(err, KernelError::InvalidOptions(_)), "{err}");
        }
    }

    #[test]
    fn zero_rates_are_allowed() {
        let options = NavigatorOptions {
            acceleration: 0.0,
            damping: 0.0,
            look_sensitivity: 0.0,
            fast_multiplier: 1.0,
            ..NavigatorOptions::default()
        };
        assert!(options.validate().is_ok());
    }
}
