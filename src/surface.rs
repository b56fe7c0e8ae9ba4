//! Renderable surfaces.
//!
//! A [`Surface`] is the thing an effect binds to: it owns one material
//! slot and knows whether it participates in the scene shadow passes.
//! Sprites do, UI images do not, and the capability split is expressed
//! through the trait instead of downcasts: plain surfaces keep the no-op
//! defaults for the shadow methods and effects simply never branch on a
//! concrete type.

use std::sync::Arc;

use crate::material::Material;

/// Whether a surface casts into the shadow pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShadowMode {
    /// The surface is skipped by the shadow pass.
    #[default]
    Off,
    /// The surface casts shadows.
    On,
}

/// A renderable surface an effect can bind to.
pub trait Surface {
    /// The material currently installed on this surface.
    fn material(&self) -> Option<Arc<Material>>;

    /// Install a material, replacing whatever was installed before.
    fn set_material(&mut self, material: Option<Arc<Material>>);

    /// Whether the surface is active in the scene.
    fn is_active(&self) -> bool;

    /// Whether the surface participates in the shadow passes at all.
    fn supports_shadows(&self) -> bool {
        false
    }

    /// Set whether the surface casts shadows. No-op for plain surfaces.
    fn set_shadow_mode(&mut self, _mode: ShadowMode) {}

    /// Set whether the surface receives shadows. No-op for plain surfaces.
    fn set_receive_shadows(&mut self, _receive: bool) {}
}

/// A world-space sprite surface.
///
/// Sprites are lit scene objects, so they carry shadow state and report
/// `supports_shadows() == true`.
#[derive(Debug)]
pub struct SpriteSurface {
    material: Option<Arc<Material>>,
    active: bool,
    shadow_mode: ShadowMode,
    receive_shadows: bool,
}

impl SpriteSurface {
    /// Create an active sprite surface with no material installed.
    pub fn new() -> Self {
        Self {
            material: None,
            active: true,
            shadow_mode: ShadowMode::Off,
            receive_shadows: false,
        }
    }

    /// Create a sprite surface with a material already installed.
    pub fn with_material(material: Arc<Material>) -> Self {
        Self {
            material: Some(material),
            ..Self::new()
        }
    }

    /// Activate or deactivate the surface.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// The current shadow casting mode.
    pub fn shadow_mode(&self) -> ShadowMode {
        self.shadow_mode
    }

    /// Whether the surface currently receives shadows.
    pub fn receive_shadows(&self) -> bool {
        self.receive_shadows
    }
}

impl Default for SpriteSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for SpriteSurface {
    fn material(&self) -> Option<Arc<Material>> {
        self.material.clone()
    }

    fn set_material(&mut self, material: Option<Arc<Material>>) {
        log::trace!(
            "SpriteSurface: install material {:?}",
            material.as_ref().and_then(|m| m.label())
        );
        self.material = material;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn supports_shadows(&self) -> bool {
        true
    }

    fn set_shadow_mode(&mut self, mode: ShadowMode) {
        self.shadow_mode = mode;
    }

    fn set_receive_shadows(&mut self, receive: bool) {
        self.receive_shadows = receive;
    }
}

/// A screen-space UI image surface.
///
/// Images never take part in the shadow passes, so the shadow methods
/// keep their no-op defaults.
#[derive(Debug)]
pub struct ImageSurface {
    material: Option<Arc<Material>>,
    active: bool,
}

impl ImageSurface {
    /// Create an active image surface with no material installed.
    pub fn new() -> Self {
        Self {
            material: None,
            active: true,
        }
    }

    /// Create an image surface with a material already installed.
    pub fn with_material(material: Arc<Material>) -> Self {
        Self {
            material: Some(material),
            ..Self::new()
        }
    }

    /// Activate or deactivate the surface.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Default for ImageSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for ImageSurface {
    fn material(&self) -> Option<Arc<Material>> {
        self.material.clone()
    }

    fn set_material(&mut self, material: Option<Arc<Material>>) {
        log::trace!(
            "ImageSurface: install material {:?}",
            material.as_ref().and_then(|m| m.label())
        );
        self.material = material;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
