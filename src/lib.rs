//! # fx2d
//!
//! 2D sprite and UI image effects driven through bindable shader materials.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`EffectBinder`] - Attaches the black hole effect to one surface and
//!   owns its material lifecycle
//! - [`Surface`] - Trait for the things effects bind to, with
//!   [`SpriteSurface`] and [`ImageSurface`] implementations
//! - [`RenderDevice`] - Allocates and tracks materials, holds scene-wide
//!   lighting switches
//! - [`EffectParams`] / [`CompositeMode`] - The artist-facing knobs and the
//!   fixed blend mode table behind them
//!
//! ## Example
//!
//! ```
//! use fx2d::{CompositeMode, EffectBinder, EffectParams, EffectShaders};
//! use fx2d::{RenderDevice, ShaderLibrary, SpriteSurface};
//!
//! # fn main() -> Result<(), fx2d::EffectError> {
//! let library = ShaderLibrary::standard();
//! let shaders = EffectShaders::resolve(&library)?;
//! let device = RenderDevice::new();
//!
//! let mut sprite = SpriteSurface::new();
//! let mut binder = EffectBinder::new(device, shaders)
//!     .with_params(EffectParams::new().with_hole_size(0.3))
//!     .with_composite(CompositeMode::Additive);
//!
//! binder.enable(&mut sprite);
//! binder.tick(&mut sprite);
//! binder.disable(&mut sprite);
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod blend;
pub mod color;
pub mod device;
pub mod error;
pub mod material;
pub mod params;
pub mod shader;
pub mod surface;

// Re-export main types for convenience
pub use binder::{BinderState, EffectBinder, MaterialBinding, SwapState};
pub use blend::{BlendComponent, BlendFactor, BlendOperation, CompositeMode};
pub use color::Color;
pub use device::RenderDevice;
pub use error::{EffectError, EffectResult};
pub use material::{
    Material, MaterialDescriptor, MaterialDirty, QUEUE_ALPHA_TEST, QUEUE_TRANSPARENT,
};
pub use params::{uniform, EffectParams, EffectUniformData};
pub use shader::{
    EffectShaders, ShaderHandle, ShaderLibrary, BLACK_HOLE_SHADER, DEFAULT_SPRITE_SHADER,
};
pub use surface::{ImageSurface, ShadowMode, SpriteSurface, Surface};

/// Effect library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the effect subsystem.
///
/// This should be called before using any effect functionality.
pub fn init() {
    log::info!("fx2d v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_standard_library_resolves() {
        let library = ShaderLibrary::standard();
        assert!(EffectShaders::resolve(&library).is_ok());
    }

    #[test]
    fn test_device_creation() {
        let device = RenderDevice::new();
        assert_eq!(device.material_count(), 0);
        assert!(device.shadows_enabled());
    }
}
