//! Shader materials.
//!
//! A [`Material`] is the shared record of everything the host renderer
//! needs to draw a surface: which shader to run, which render queue to
//! sort into, and a bag of named property values the shader reads. It is
//! created by [`RenderDevice::create_material`] and reference-counted;
//! effect bindings and surfaces both hold [`Arc`]s to the same material.
//!
//! All mutation goes through interior mutability, so a material can be
//! shared across threads and across several bound surfaces at once.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use bitflags::bitflags;

use crate::color::Color;
use crate::device::RenderDevice;
use crate::shader::ShaderHandle;

/// Render queue for depth-tested cutout geometry.
///
/// Effects move their material here when the surface takes part in the
/// scene depth pass (shadow receiving).
pub const QUEUE_ALPHA_TEST: i32 = 2450;

/// Render queue for back-to-front transparent geometry.
///
/// The default queue for effect materials.
pub const QUEUE_TRANSPARENT: i32 = 3000;

bitflags! {
    /// Which parts of a material changed since the flags were last taken.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MaterialDirty: u32 {
        /// A named property value changed.
        const PROPERTIES = 1 << 0;
        /// The shader was replaced.
        const SHADER = 1 << 1;
        /// The render queue moved.
        const QUEUE = 1 << 2;
    }
}

/// Descriptor for creating a material.
#[derive(Debug, Clone)]
pub struct MaterialDescriptor {
    /// Shader the material starts out bound to.
    pub shader: ShaderHandle,
    /// Render queue the material starts out in.
    pub render_queue: i32,
    /// Optional debug label.
    pub label: Option<String>,
}

impl MaterialDescriptor {
    /// Create a descriptor for the given shader.
    ///
    /// The material starts in [`QUEUE_TRANSPARENT`] with no label.
    pub fn new(shader: ShaderHandle) -> Self {
        Self {
            shader,
            render_queue: QUEUE_TRANSPARENT,
            label: None,
        }
    }

    /// Set the initial render queue.
    pub fn with_render_queue(mut self, render_queue: i32) -> Self {
        self.render_queue = render_queue;
        self
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Mutable material state behind the lock.
struct MaterialState {
    shader: ShaderHandle,
    render_queue: i32,
    floats: HashMap<String, f32>,
    ints: HashMap<String, i32>,
    colors: HashMap<String, Color>,
    dirty: MaterialDirty,
}

/// A shader material with named properties.
///
/// Materials are created by [`RenderDevice::create_material`] and are
/// reference-counted. They hold a weak reference back to their parent
/// device.
///
/// Property setters only mark the material dirty when the stored value
/// actually changes, so a host can poll [`Material::take_dirty`] once per
/// frame and skip re-uploading untouched materials.
pub struct Material {
    device: Weak<RenderDevice>,
    descriptor: MaterialDescriptor,
    state: RwLock<MaterialState>,
}

impl Material {
    /// Create a new material (called by RenderDevice).
    pub(crate) fn new(device: Weak<RenderDevice>, descriptor: MaterialDescriptor) -> Self {
        let state = MaterialState {
            shader: descriptor.shader,
            render_queue: descriptor.render_queue,
            floats: HashMap::new(),
            ints: HashMap::new(),
            colors: HashMap::new(),
            dirty: MaterialDirty::empty(),
        };
        Self {
            device,
            descriptor,
            state: RwLock::new(state),
        }
    }

    /// Get the parent device, if it still exists.
    pub fn device(&self) -> Option<Arc<RenderDevice>> {
        self.device.upgrade()
    }

    /// Get the material label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }

    /// The shader this material is currently bound to.
    pub fn shader(&self) -> ShaderHandle {
        self.state
            .read()
            .map(|s| s.shader)
            .unwrap_or(self.descriptor.shader)
    }

    /// Bind the material to a different shader.
    pub fn set_shader(&self, shader: ShaderHandle) {
        if let Ok(mut state) = self.state.write() {
            if state.shader != shader {
                log::trace!(
                    "Material {:?}: shader {:?} -> {:?}",
                    self.label(),
                    state.shader,
                    shader
                );
                state.shader = shader;
                state.dirty |= MaterialDirty::SHADER;
            }
        }
    }

    /// The render queue this material sorts into.
    pub fn render_queue(&self) -> i32 {
        self.state
            .read()
            .map(|s| s.render_queue)
            .unwrap_or(self.descriptor.render_queue)
    }

    /// Move the material to a different render queue.
    pub fn set_render_queue(&self, render_queue: i32) {
        if let Ok(mut state) = self.state.write() {
            if state.render_queue != render_queue {
                state.render_queue = render_queue;
                state.dirty |= MaterialDirty::QUEUE;
            }
        }
    }

    /// Set a named float property.
    pub fn set_float(&self, name: &str, value: f32) {
        if let Ok(mut state) = self.state.write() {
            let state = &mut *state;
            match state.floats.get_mut(name) {
                Some(slot) if *slot == value => {}
                Some(slot) => {
                    *slot = value;
                    state.dirty |= MaterialDirty::PROPERTIES;
                }
                None => {
                    state.floats.insert(name.to_string(), value);
                    state.dirty |= MaterialDirty::PROPERTIES;
                }
            }
        }
    }

    /// Get a named float property.
    pub fn float(&self, name: &str) -> Option<f32> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.floats.get(name).copied())
    }

    /// Set a named integer property.
    pub fn set_int(&self, name: &str, value: i32) {
        if let Ok(mut state) = self.state.write() {
            let state = &mut *state;
            match state.ints.get_mut(name) {
                Some(slot) if *slot == value => {}
                Some(slot) => {
                    *slot = value;
                    state.dirty |= MaterialDirty::PROPERTIES;
                }
                None => {
                    state.ints.insert(name.to_string(), value);
                    state.dirty |= MaterialDirty::PROPERTIES;
                }
            }
        }
    }

    /// Get a named integer property.
    pub fn int(&self, name: &str) -> Option<i32> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.ints.get(name).copied())
    }

    /// Set a named color property.
    pub fn set_color(&self, name: &str, value: Color) {
        if let Ok(mut state) = self.state.write() {
            let state = &mut *state;
            match state.colors.get_mut(name) {
                Some(slot) if *slot == value => {}
                Some(slot) => {
                    *slot = value;
                    state.dirty |= MaterialDirty::PROPERTIES;
                }
                None => {
                    state.colors.insert(name.to_string(), value);
                    state.dirty |= MaterialDirty::PROPERTIES;
                }
            }
        }
    }

    /// Get a named color property.
    pub fn color(&self, name: &str) -> Option<Color> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.colors.get(name).copied())
    }

    /// Take and clear the accumulated dirty flags.
    pub fn take_dirty(&self) -> MaterialDirty {
        self.state
            .write()
            .map(|mut s| std::mem::replace(&mut s.dirty, MaterialDirty::empty()))
            .unwrap_or(MaterialDirty::empty())
    }

    /// Whether any part of the material changed since the last take.
    pub fn is_dirty(&self) -> bool {
        self.state
            .read()
            .map(|s| !s.dirty.is_empty())
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("Material");
        debug
            .field("label", &self.descriptor.label)
            .field("shader", &self.shader())
            .field("render_queue", &self.render_queue());
        if let Ok(state) = self.state.read() {
            debug
                .field("floats", &state.floats.len())
                .field("ints", &state.ints.len())
                .field("colors", &state.colors.len());
        }
        debug.finish()
    }
}

// Ensure Material is Send + Sync
static_assertions::assert_impl_all!(Material: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn test_material() -> Material {
        Material::new(Weak::new(), MaterialDescriptor::new(ShaderHandle(0)))
    }

    #[test]
    fn test_descriptor_defaults() {
        let desc = MaterialDescriptor::new(ShaderHandle(3));
        assert_eq!(desc.shader, ShaderHandle(3));
        assert_eq!(desc.render_queue, QUEUE_TRANSPARENT);
        assert!(desc.label.is_none());
    }

    #[test]
    fn test_descriptor_builders() {
        let desc = MaterialDescriptor::new(ShaderHandle(1))
            .with_render_queue(QUEUE_ALPHA_TEST)
            .with_label("fx");
        assert_eq!(desc.render_queue, 2450);
        assert_eq!(desc.label.as_deref(), Some("fx"));
    }

    #[test]
    fn test_float_properties() {
        let material = test_material();
        assert_eq!(material.float("_Alpha"), None);
        material.set_float("_Alpha", 0.25);
        assert_eq!(material.float("_Alpha"), Some(0.25));
        material.set_float("_Alpha", 0.75);
        assert_eq!(material.float("_Alpha"), Some(0.75));
    }

    #[test]
    fn test_int_and_color_properties() {
        let material = test_material();
        material.set_int("_BlendOp", 2);
        material.set_color("_ColorX", Color::BLACK);
        assert_eq!(material.int("_BlendOp"), Some(2));
        assert_eq!(material.color("_ColorX"), Some(Color::BLACK));
    }

    #[test]
    fn test_shader_swap() {
        let material = test_material();
        assert_eq!(material.shader(), ShaderHandle(0));
        material.set_shader(ShaderHandle(7));
        assert_eq!(material.shader(), ShaderHandle(7));
    }

    #[test]
    fn test_dirty_tracking() {
        let material = test_material();
        assert!(!material.is_dirty());

        material.set_float("_Hole", 0.3);
        material.set_shader(ShaderHandle(2));
        material.set_render_queue(QUEUE_ALPHA_TEST);
        let dirty = material.take_dirty();
        assert!(dirty.contains(MaterialDirty::PROPERTIES));
        assert!(dirty.contains(MaterialDirty::SHADER));
        assert!(dirty.contains(MaterialDirty::QUEUE));

        // Taking clears the flags.
        assert!(!material.is_dirty());
    }

    #[test]
    fn test_unchanged_writes_stay_clean() {
        let material = test_material();
        material.set_float("_Speed", 4.0);
        material.take_dirty();

        material.set_float("_Speed", 4.0);
        material.set_shader(ShaderHandle(0));
        material.set_render_queue(QUEUE_TRANSPARENT);
        assert!(!material.is_dirty());
    }

    #[test]
    fn test_material_debug() {
        let material = Material::new(
            Weak::new(),
            MaterialDescriptor::new(ShaderHandle(0)).with_label("debug_me"),
        );
        let debug = format!("{material:?}");
        assert!(debug.contains("Material"));
        assert!(debug.contains("debug_me"));
    }
}
