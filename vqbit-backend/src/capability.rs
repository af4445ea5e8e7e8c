//! Device-capability inputs for backend selection.
//!
//! Detection itself lives outside this core: the platform layer probes the
//! device and hands in one of these values. Tier → dimension is a pure
//! lookup, not an algorithm.

use serde::{Deserialize, Serialize};

/// Device tier, ordered from most to least power-constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    Wearable,
    Handheld,
    Tablet,
    Desktop,
    Workstation,
}

impl DeviceTier {
    /// Default amplitude-space dimension for the tier.
    pub fn default_dimension(&self) -> usize {
        match self {
            DeviceTier::Wearable => 512,
            DeviceTier::Handheld => 2048,
            DeviceTier::Tablet => 4096,
            DeviceTier::Desktop => 8096,
            DeviceTier::Workstation => 16384,
        }
    }

    /// Tiers where battery life outweighs GPU throughput.
    pub fn is_power_constrained(&self) -> bool {
        matches!(self, DeviceTier::Wearable)
    }
}

impl std::fmt::Display for DeviceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeviceTier::Wearable => "wearable",
            DeviceTier::Handheld => "handheld",
            DeviceTier::Tablet => "tablet",
            DeviceTier::Desktop => "desktop",
            DeviceTier::Workstation => "workstation",
        };
        write!(f, "{name}")
    }
}

/// What the platform layer knows about the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapability {
    pub tier: DeviceTier,
    /// Whether a compatible GPU device exists.
    pub gpu_available: bool,
}

impl DeviceCapability {
    pub fn new(tier: DeviceTier, gpu_available: bool) -> Self {
        Self {
            tier,
            gpu_available,
        }
    }

    /// Default dimension for this device.
    pub fn default_dimension(&self) -> usize {
        self.tier.default_dimension()
    }
}

impl std::fmt::Display for DeviceCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tier)
    }
}
