//! Render device.
//!
//! The [`RenderDevice`] stands in for the rendering host: it allocates
//! materials, tracks which of them are still alive, and owns the
//! scene-wide lighting switches that effect bindings consult every frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, Weak};

use crate::material::{Material, MaterialDescriptor};

/// A device for creating and tracking materials.
///
/// # Thread Safety
///
/// `RenderDevice` is `Send + Sync` and can be safely shared across
/// threads. All mutation goes through interior mutability.
///
/// # Example
///
/// ```
/// use fx2d::{MaterialDescriptor, RenderDevice, ShaderLibrary};
///
/// let mut library = ShaderLibrary::standard();
/// let shader = library.register("fx2d/example");
///
/// let device = RenderDevice::new();
/// let material = device.create_material(&MaterialDescriptor::new(shader));
/// assert_eq!(material.shader(), shader);
/// assert_eq!(device.material_count(), 1);
/// ```
pub struct RenderDevice {
    // Track allocated materials (weak references for cleanup/debugging)
    materials: RwLock<Vec<Weak<Material>>>,
    shadows_enabled: AtomicBool,
}

impl RenderDevice {
    /// Create a new render device with scene shadows enabled.
    pub fn new() -> Arc<Self> {
        log::debug!("RenderDevice created");
        Arc::new(Self {
            materials: RwLock::new(Vec::new()),
            shadows_enabled: AtomicBool::new(true),
        })
    }

    /// Create a material.
    pub fn create_material(self: &Arc<Self>, descriptor: &MaterialDescriptor) -> Arc<Material> {
        let material = Arc::new(Material::new(Arc::downgrade(self), descriptor.clone()));

        // Track it
        if let Ok(mut materials) = self.materials.write() {
            materials.push(Arc::downgrade(&material));
        }

        log::trace!("RenderDevice: created material {:?}", descriptor.label);

        material
    }

    /// Get the number of live materials created by this device.
    pub fn material_count(&self) -> usize {
        self.materials
            .read()
            .map(|m| m.iter().filter(|w| w.strong_count() > 0).count())
            .unwrap_or(0)
    }

    /// Clean up dead weak references to released materials.
    pub fn cleanup_dead_resources(&self) {
        if let Ok(mut materials) = self.materials.write() {
            materials.retain(|w| w.strong_count() > 0);
        }
    }

    /// Whether scene shadows are enabled.
    ///
    /// When this is off, every effect binding drops its surface out of the
    /// shadow passes on the next tick regardless of its own shadow flags.
    pub fn shadows_enabled(&self) -> bool {
        self.shadows_enabled.load(Ordering::Relaxed)
    }

    /// Turn scene shadows on or off.
    pub fn set_shadows_enabled(&self, enabled: bool) {
        self.shadows_enabled.store(enabled, Ordering::Relaxed);
        log::debug!("RenderDevice: shadows_enabled={}", enabled);
    }
}

impl std::fmt::Debug for RenderDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderDevice")
            .field("materials", &self.material_count())
            .field("shadows_enabled", &self.shadows_enabled())
            .finish()
    }
}

// Ensure RenderDevice is Send + Sync
static_assertions::assert_impl_all!(RenderDevice: Send, Sync);
