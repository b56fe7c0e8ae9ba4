//! Common utilities for effect binder integration tests.
//!
//! This module provides shared test infrastructure: surface construction
//! parameterized over the surface kinds, and helpers for building devices,
//! binders and host-side materials.

use std::sync::Arc;

use fx2d::{
    EffectBinder, EffectShaders, ImageSurface, Material, MaterialDescriptor, RenderDevice,
    ShaderLibrary, SpriteSurface, Surface,
};

/// Initialize logging for test output.
#[allow(dead_code)]
pub fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

// ============================================================================
// Surface Kinds
// ============================================================================

/// The surface kinds an effect can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// World-space sprite, takes part in shadow passes.
    Sprite,
    /// Screen-space UI image, no shadow participation.
    Image,
}

impl SurfaceKind {
    /// Create a bare surface of this kind.
    pub fn make_surface(self) -> Box<dyn Surface> {
        match self {
            SurfaceKind::Sprite => Box::new(SpriteSurface::new()),
            SurfaceKind::Image => Box::new(ImageSurface::new()),
        }
    }

    /// Create a surface of this kind with a material already installed.
    #[allow(dead_code)]
    pub fn make_surface_with(self, material: Arc<Material>) -> Box<dyn Surface> {
        match self {
            SurfaceKind::Sprite => Box::new(SpriteSurface::with_material(material)),
            SurfaceKind::Image => Box::new(ImageSurface::with_material(material)),
        }
    }
}

// ============================================================================
// Binder Helpers
// ============================================================================

/// Resolve the standard shader pair.
pub fn test_shaders() -> EffectShaders {
    let library = ShaderLibrary::standard();
    EffectShaders::resolve(&library).expect("standard library must hold the effect shaders")
}

/// Create a device and a stock binder on it.
pub fn test_binder() -> (Arc<RenderDevice>, EffectBinder) {
    let device = RenderDevice::new();
    let binder = EffectBinder::new(device.clone(), test_shaders());
    (device, binder)
}

/// Create a host-side material running the plain fallback shader.
#[allow(dead_code)]
pub fn plain_material(device: &Arc<RenderDevice>, label: &str) -> Arc<Material> {
    let shaders = test_shaders();
    device.create_material(&MaterialDescriptor::new(shaders.fallback).with_label(label))
}
