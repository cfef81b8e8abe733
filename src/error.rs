use thiserror::Error;

/// Invalid tunable or environment setting. Always fatal at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A size, interval or speed that must be strictly positive and finite.
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    /// An offset that may be negative but must be a real number.
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    /// A probability outside [0, 1].
    #[error("{name} must lie in [0, 1], got {value}")]
    NotProbability { name: &'static str, value: f64 },

    #[error("min margin {min} exceeds max margin {max}")]
    MarginRange { min: f64, max: f64 },

    #[error("at least 2 iso-levels are required, got {0}")]
    TooFewLevels(u32),

    /// An environment variable that could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },
}

/// Failures while bringing up the GPU presentation path.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,
}

/// Top-level error returned from `main`.
#[derive(Debug, Error)]
pub enum BackdropError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
