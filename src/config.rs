//! Backlight configuration parameters
//!
//! Dwell durations for the timed states and the brightness levels the
//! transitions request.  Hosts may load an override from JSON or from a
//! postcard blob kept in flash.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highest brightness value accepted by the backlight port (percent).
pub const MAX_BRIGHTNESS: u8 = 100;

/// Core backlight configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacklightConfig {
    // --- Timing ---
    /// Time spent in Warmup before the backlight is considered on (milliseconds)
    pub warmup_ms: u32,
    /// Inactivity window while On, restarted by every user action (milliseconds)
    pub inactivity_timeout_ms: u32,
    /// Dimming period before the backlight powers off (milliseconds)
    pub shutdown_ms: u32,

    // --- Brightness (0-100%) ---
    /// Brightness the hardware is powered on with during warmup
    pub min_brightness: u8,
    /// Brightness while On
    pub full_brightness: u8,
    /// Brightness while dimming in Shutdown
    pub dim_brightness: u8,
}

impl Default for BacklightConfig {
    fn default() -> Self {
        Self {
            // Timing
            warmup_ms: 500,
            inactivity_timeout_ms: 30_000,
            shutdown_ms: 5_000,

            // Brightness
            min_brightness: 10,
            full_brightness: MAX_BRIGHTNESS,
            dim_brightness: 30,
        }
    }
}

impl BacklightConfig {
    pub fn warmup(&self) -> Duration {
        Duration::from_millis(u64::from(self.warmup_ms))
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.inactivity_timeout_ms))
    }

    pub fn shutdown(&self) -> Duration {
        Duration::from_millis(u64::from(self.shutdown_ms))
    }

    /// Reject values that would break the timing or dimming contract.
    pub fn validate(&self) -> Result<()> {
        if self.warmup_ms == 0 {
            return Err(Error::Config("warmup_ms must be non-zero"));
        }
        if self.inactivity_timeout_ms == 0 {
            return Err(Error::Config("inactivity_timeout_ms must be non-zero"));
        }
        if self.shutdown_ms == 0 {
            return Err(Error::Config("shutdown_ms must be non-zero"));
        }
        if self.full_brightness > MAX_BRIGHTNESS
            || self.min_brightness > MAX_BRIGHTNESS
            || self.dim_brightness > MAX_BRIGHTNESS
        {
            return Err(Error::Config("brightness above 100%"));
        }
        if self.full_brightness == 0 {
            return Err(Error::Config("full_brightness must be non-zero"));
        }
        if self.min_brightness > self.full_brightness {
            return Err(Error::Config("min_brightness above full_brightness"));
        }
        if self.dim_brightness >= self.full_brightness {
            return Err(Error::Config("dim_brightness must be below full_brightness"));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.  Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Compact encoding for flash storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| Error::Config("encode failed"))
    }

    /// Decode and validate a blob produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self =
            postcard::from_bytes(bytes).map_err(|_| Error::Config("corrupted blob"))?;
        config.validate()?;
        Ok(config)
    }
}
