//! Backend selection and construction.

use tracing::{info, warn};

use crate::attest::AttestationSuite;
use crate::capability::DeviceCapability;
use crate::contract::{VQbitBackend, VQbitConfig};
use crate::vector::VectorBackend;
use vqbit_core::{VQbitError, VQbitResult};

/// Backend implementations the factory can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Gpu,
    Vector,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Gpu => write!(f, "gpu"),
            BackendKind::Vector => write!(f, "vector"),
        }
    }
}

/// Whether a complete GPU backend is linked into this build.
///
/// TODO: flip once the wgpu compute path lands; until then selection always
/// falls through to the vector backend.
const fn gpu_backend_ready() -> bool {
    false
}

/// Pure selection rule: every gate must pass for GPU, anything else means
/// the vector backend.
pub fn select_backend(capability: &DeviceCapability, config: &VQbitConfig) -> BackendKind {
    let gpu = config.use_gpu
        && capability.gpu_available
        && !capability.tier.is_power_constrained()
        && gpu_backend_ready();
    if gpu {
        BackendKind::Gpu
    } else {
        BackendKind::Vector
    }
}

/// Default configuration sized for the device.
pub fn default_config_for(capability: &DeviceCapability) -> VQbitConfig {
    VQbitConfig {
        dimension: capability.default_dimension(),
        ..VQbitConfig::default()
    }
}

/// Builds and configures a backend for the device.
///
/// `force` overrides selection; forcing an unavailable backend is an error,
/// never a silent substitution.
pub async fn create(
    config: Option<VQbitConfig>,
    force: Option<BackendKind>,
    capability: DeviceCapability,
    attestation: AttestationSuite,
) -> VQbitResult<Box<dyn VQbitBackend>> {
    let config = config.unwrap_or_else(|| default_config_for(&capability));

    let kind = match force {
        Some(kind) => kind,
        None => {
            let selected = select_backend(&capability, &config);
            if config.use_gpu && selected == BackendKind::Vector {
                warn!(device = %capability, "GPU requested but unavailable, using vector backend");
            }
            selected
        }
    };

    let backend: Box<dyn VQbitBackend> = match kind {
        BackendKind::Gpu => return Err(VQbitError::GpuNotAvailable),
        BackendKind::Vector => Box::new(VectorBackend::new(capability, attestation)),
    };

    backend.configure(config.clone()).await?;

    info!(
        backend = %kind,
        device = %capability,
        dimension = config.dimension,
        seeded = config.seed.is_some(),
        "backend ready"
    );
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::DeviceTier;

    fn capability(tier: DeviceTier, gpu: bool) -> DeviceCapability {
        DeviceCapability::new(tier, gpu)
    }

    #[test]
    fn test_selection_falls_back_without_gpu_backend() {
        // All gates open except the build-time one.
        let config = VQbitConfig::default();
        assert_eq!(
            select_backend(&capability(DeviceTier::Desktop, true), &config),
            BackendKind::Vector
        );
    }

    #[test]
    fn test_selection_respects_caller_opt_out() {
        let config = VQbitConfig {
            use_gpu: false,
            ..VQbitConfig::default()
        };
        assert_eq!(
            select_backend(&capability(DeviceTier::Desktop, true), &config),
            BackendKind::Vector
        );
    }

    #[test]
    fn test_selection_never_picks_gpu_on_wearables() {
        let config = VQbitConfig::default();
        assert_eq!(
            select_backend(&capability(DeviceTier::Wearable, true), &config),
            BackendKind::Vector
        );
    }

    #[test]
    fn test_default_config_sized_for_device() {
        let config = default_config_for(&capability(DeviceTier::Handheld, false));
        assert_eq!(config.dimension, 2048);
        assert!(config.seed.is_none());
    }
}
