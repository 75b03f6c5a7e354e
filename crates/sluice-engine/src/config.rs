//! Executor configuration, validation, and error types.
//!
//! [`ExecutorConfig`] carries the shape parameters of one executor: stencil
//! radius, pipeline depth and tile capacity. They are plain runtime values
//! checked once by [`validate()`](ExecutorConfig::validate) when the
//! executor is built; every buffer is sized from them afterwards.

use std::error::Error;
use std::fmt;

use sluice_core::Position;
use sluice_kernel::PaddedLayout;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ExecutorConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `stencil_radius` is zero.
    ZeroRadius,
    /// `pipeline_length` is zero.
    ZeroPipelineLength,
    /// `tile_width` or `tile_height` is zero.
    ZeroTileExtent {
        /// The configured `(tile_width, tile_height)`.
        tile: Position,
    },
    /// `channel_capacity` is zero.
    ZeroChannelCapacity,
    /// The halo-padded tile does not fit in `usize`.
    PaddedOverflow {
        /// The configured stencil radius.
        radius: usize,
        /// The configured `(tile_width, tile_height)`.
        tile: Position,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroRadius => write!(f, "stencil_radius must be at least 1"),
            Self::ZeroPipelineLength => write!(f, "pipeline_length must be at least 1"),
            Self::ZeroTileExtent { tile } => write!(
                f,
                "tile extents must be non-zero, got {}x{}",
                tile.c, tile.r
            ),
            Self::ZeroChannelCapacity => write!(f, "channel_capacity must be at least 1"),
            Self::PaddedOverflow { radius, tile } => write!(
                f,
                "tile {}x{} padded by radius {radius} overflows usize",
                tile.c, tile.r
            ),
        }
    }
}

impl Error for ConfigError {}

// ── ExecutorConfig ─────────────────────────────────────────────────

/// Shape and resource parameters of a
/// [`MonotileExecutor`](crate::monotile::MonotileExecutor).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Stencil radius `R`. Windows are `(2R+1) x (2R+1)`. Default: 1.
    pub stencil_radius: usize,
    /// Maximum generations evaluated per kernel pass. Default: 4.
    pub pipeline_length: usize,
    /// Tile capacity in columns. Default: 64.
    pub tile_width: usize,
    /// Tile capacity in rows. Default: 64.
    pub tile_height: usize,
    /// Capacity of each channel between stream stages. Default: 1024.
    pub channel_capacity: usize,
    /// Record compute-stage durations in the runtime sample. Default: false.
    pub runtime_analysis: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            stencil_radius: 1,
            pipeline_length: 4,
            tile_width: 64,
            tile_height: 64,
            channel_capacity: 1024,
            runtime_analysis: false,
        }
    }
}

impl ExecutorConfig {
    /// Set the stencil radius.
    pub fn with_stencil_radius(mut self, radius: usize) -> Self {
        self.stencil_radius = radius;
        self
    }

    /// Set the pipeline length.
    pub fn with_pipeline_length(mut self, length: usize) -> Self {
        self.pipeline_length = length;
        self
    }

    /// Set the tile capacity.
    pub fn with_tile(mut self, width: usize, height: usize) -> Self {
        self.tile_width = width;
        self.tile_height = height;
        self
    }

    /// Set the stream channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Enable or disable runtime analysis.
    pub fn with_runtime_analysis(mut self, enabled: bool) -> Self {
        self.runtime_analysis = enabled;
        self
    }

    /// Tile capacity as a position.
    pub fn tile_extent(&self) -> Position {
        Position::new(self.tile_width, self.tile_height)
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stencil_radius == 0 {
            return Err(ConfigError::ZeroRadius);
        }
        if self.pipeline_length == 0 {
            return Err(ConfigError::ZeroPipelineLength);
        }
        let tile = self.tile_extent();
        if tile.c == 0 || tile.r == 0 {
            return Err(ConfigError::ZeroTileExtent { tile });
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        if PaddedLayout::padded_extent(self.stencil_radius, tile).is_none() {
            return Err(ConfigError::PaddedOverflow {
                radius: self.stencil_radius,
                tile,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ExecutorConfig::default().validate().is_ok());
    }

    #[test]
    fn builders_set_fields() {
        let cfg = ExecutorConfig::default()
            .with_stencil_radius(2)
            .with_pipeline_length(8)
            .with_tile(16, 32)
            .with_channel_capacity(7)
            .with_runtime_analysis(true);
        assert_eq!(cfg.stencil_radius, 2);
        assert_eq!(cfg.pipeline_length, 8);
        assert_eq!(cfg.tile_extent(), Position::new(16, 32));
        assert_eq!(cfg.channel_capacity, 7);
        assert!(cfg.runtime_analysis);
    }

    #[test]
    fn zero_values_rejected() {
        let base = ExecutorConfig::default();
        assert_eq!(
            base.clone().with_stencil_radius(0).validate(),
            Err(ConfigError::ZeroRadius)
        );
        assert_eq!(
            base.clone().with_pipeline_length(0).validate(),
            Err(ConfigError::ZeroPipelineLength)
        );
        assert_eq!(
            base.clone().with_tile(0, 4).validate(),
            Err(ConfigError::ZeroTileExtent {
                tile: Position::new(0, 4)
            })
        );
        assert_eq!(
            base.with_channel_capacity(0).validate(),
            Err(ConfigError::ZeroChannelCapacity)
        );
    }

    #[test]
    fn padded_overflow_rejected() {
        let cfg = ExecutorConfig::default().with_tile(usize::MAX, 1);
        match cfg.validate() {
            Err(ConfigError::PaddedOverflow { radius: 1, .. }) => {}
            other => panic!("expected PaddedOverflow, got {other:?}"),
        }
    }

    #[test]
    fn display_names_the_field() {
        assert!(ConfigError::ZeroChannelCapacity
            .to_string()
            .contains("channel_capacity"));
    }
}
