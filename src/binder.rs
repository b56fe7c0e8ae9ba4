//! The effect binder.
//!
//! [`EffectBinder`] attaches the black hole effect to one [`Surface`]. It
//! owns the whole material story for that surface: which material is
//! installed, who allocated it, what happens when the host hands over a
//! shared material mid-flight, and what gets restored when the effect is
//! turned off. Parameter and blend state is pushed into the installed
//! material on every [`EffectBinder::tick`].
//!
//! # Material ownership
//!
//! At most one owned temporary material exists per binder at a time. It
//! is allocated when no shared material is supplied and released on every
//! transition away from that state: a shared material arriving, a
//! disable, or the binder being dropped. Shared materials are never
//! released by the binder; it only forces their shader and hands them to
//! the surface.
//!
//! # Example
//!
//! ```
//! use fx2d::{EffectBinder, EffectShaders, RenderDevice, ShaderLibrary, SpriteSurface};
//!
//! # fn main() -> Result<(), fx2d::EffectError> {
//! let library = ShaderLibrary::standard();
//! let shaders = EffectShaders::resolve(&library)?;
//! let device = RenderDevice::new();
//!
//! let mut sprite = SpriteSurface::new();
//! let mut binder = EffectBinder::new(device, shaders);
//! binder.enable(&mut sprite);
//! binder.tick(&mut sprite);
//! binder.disable(&mut sprite);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::blend::CompositeMode;
use crate::device::RenderDevice;
use crate::material::{Material, MaterialDescriptor, QUEUE_ALPHA_TEST, QUEUE_TRANSPARENT};
use crate::params::{uniform, EffectParams};
use crate::shader::EffectShaders;
use crate::surface::{ShadowMode, Surface};

/// Whether the binder currently drives a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BinderState {
    /// Not driving anything; the surface keeps whatever material it has.
    #[default]
    Disabled,
    /// Driving a surface; ticks push parameters into its material.
    Bound,
}

/// Pending material swap, resolved at the start of the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwapState {
    /// Nothing to do.
    #[default]
    Idle,
    /// A shared material arrived; install it on the next tick.
    PendingApply,
    /// The shared material was withdrawn; fall back to an owned
    /// temporary on the next tick.
    PendingRevert,
}

/// The material currently installed on the bound surface, tagged with
/// who owns it.
#[derive(Debug, Clone, Default)]
pub enum MaterialBinding {
    /// No material installed by this binder.
    #[default]
    Unbound,
    /// A temporary material this binder allocated and will release.
    Owned(Arc<Material>),
    /// A host-supplied material this binder must never release.
    Shared(Arc<Material>),
}

impl MaterialBinding {
    /// The installed material, regardless of ownership.
    pub fn material(&self) -> Option<&Arc<Material>> {
        match self {
            MaterialBinding::Unbound => None,
            MaterialBinding::Owned(material) | MaterialBinding::Shared(material) => Some(material),
        }
    }

    /// Whether the binder owns the installed material.
    pub fn is_owned(&self) -> bool {
        matches!(self, MaterialBinding::Owned(_))
    }

    /// Whether the installed material is host-supplied.
    pub fn is_shared(&self) -> bool {
        matches!(self, MaterialBinding::Shared(_))
    }
}

/// Binds the black hole effect to a single surface.
///
/// The binder is driven by three lifecycle calls: [`enable`] installs an
/// effect material on the surface, [`tick`] resolves pending material
/// swaps and pushes the current parameters, and [`disable`] restores the
/// captured default material. Shadow flags and render queue moves only
/// apply to surfaces that report [`Surface::supports_shadows`]; plain
/// surfaces just get the parameter floats.
///
/// [`enable`]: EffectBinder::enable
/// [`tick`]: EffectBinder::tick
/// [`disable`]: EffectBinder::disable
#[derive(Debug)]
pub struct EffectBinder {
    device: Arc<RenderDevice>,
    shaders: EffectShaders,
    /// Animatable effect parameters, pushed every tick while enabled.
    pub params: EffectParams,
    apply_params: bool,
    cast_shadows: bool,
    receive_shadows: bool,
    composite: CompositeMode,
    shared_material: Option<Arc<Material>>,
    binding: MaterialBinding,
    default_material: Option<Arc<Material>>,
    state: BinderState,
    swap: SwapState,
}

impl EffectBinder {
    /// Create a binder with stock parameters.
    ///
    /// Shadow casting starts on, shadow receiving off, compositing in
    /// [`CompositeMode::Normal`]. Nothing touches the surface until
    /// [`EffectBinder::enable`].
    pub fn new(device: Arc<RenderDevice>, shaders: EffectShaders) -> Self {
        Self {
            device,
            shaders,
            params: EffectParams::default(),
            apply_params: true,
            cast_shadows: true,
            receive_shadows: false,
            composite: CompositeMode::Normal,
            shared_material: None,
            binding: MaterialBinding::Unbound,
            default_material: None,
            state: BinderState::Disabled,
            swap: SwapState::Idle,
        }
    }

    /// Set the starting parameters.
    pub fn with_params(mut self, params: EffectParams) -> Self {
        self.params = params;
        self
    }

    /// Set the composite mode.
    pub fn with_composite(mut self, composite: CompositeMode) -> Self {
        self.composite = composite;
        self
    }

    /// Supply a shared material before the first enable.
    pub fn with_shared_material(mut self, material: Arc<Material>) -> Self {
        self.shared_material = Some(material);
        self
    }

    /// Set whether the surface casts shadows while the effect runs.
    pub fn with_cast_shadows(mut self, cast: bool) -> Self {
        self.cast_shadows = cast;
        self
    }

    /// Set whether the surface receives shadows while the effect runs.
    pub fn with_receive_shadows(mut self, receive: bool) -> Self {
        self.receive_shadows = receive;
        self
    }

    /// The device this binder allocates materials from.
    pub fn device(&self) -> &Arc<RenderDevice> {
        &self.device
    }

    /// The shader pair this binder works with.
    pub fn shaders(&self) -> EffectShaders {
        self.shaders
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BinderState {
        self.state
    }

    /// Pending material swap, if any.
    pub fn swap_state(&self) -> SwapState {
        self.swap
    }

    /// The material currently installed by this binder.
    pub fn binding(&self) -> &MaterialBinding {
        &self.binding
    }

    /// The default material captured on first enable, if any.
    pub fn default_material(&self) -> Option<&Arc<Material>> {
        self.default_material.as_ref()
    }

    /// The shared material the host supplied, if any.
    pub fn shared_material(&self) -> Option<&Arc<Material>> {
        self.shared_material.as_ref()
    }

    /// Whether ticks push parameters into the installed material.
    pub fn apply_params(&self) -> bool {
        self.apply_params
    }

    /// Suspend or resume the per-tick parameter push.
    ///
    /// Material install, swap and restore all keep working while the
    /// push is suspended.
    pub fn set_apply_params(&mut self, apply: bool) {
        self.apply_params = apply;
    }

    /// Whether the surface casts shadows while the effect runs.
    pub fn cast_shadows(&self) -> bool {
        self.cast_shadows
    }

    /// Set whether the surface casts shadows while the effect runs.
    pub fn set_cast_shadows(&mut self, cast: bool) {
        self.cast_shadows = cast;
    }

    /// Whether the surface receives shadows while the effect runs.
    pub fn receive_shadows(&self) -> bool {
        self.receive_shadows
    }

    /// Set whether the surface receives shadows while the effect runs.
    pub fn set_receive_shadows(&mut self, receive: bool) {
        self.receive_shadows = receive;
    }

    /// Current composite mode.
    pub fn composite(&self) -> CompositeMode {
        self.composite
    }

    /// Change the composite mode. Takes effect on the next tick.
    pub fn set_composite(&mut self, composite: CompositeMode) {
        self.composite = composite;
    }

    /// Bind the effect to a surface.
    ///
    /// On the first enable the surface's current material is captured as
    /// the default to restore later; a bare surface gets a fallback
    /// default fabricated for it. Then either an owned temporary bound to
    /// the effect shader is installed, or, when a shared material was
    /// supplied, that material is installed with its shader forced.
    ///
    /// Enabling an already bound binder does nothing.
    pub fn enable(&mut self, surface: &mut dyn Surface) {
        if self.state == BinderState::Bound {
            log::debug!("EffectBinder: enable while already bound, ignored");
            return;
        }

        if self.default_material.is_none() {
            let default = match surface.material() {
                Some(current) => current,
                None => self.device.create_material(
                    &MaterialDescriptor::new(self.shaders.fallback).with_label("surface_default"),
                ),
            };
            self.default_material = Some(default);
        }

        match self.shared_material.clone() {
            None => {
                // An owned effect always pushes its parameters.
                self.apply_params = true;
                let material = self.create_effect_material();
                surface.set_material(Some(material.clone()));
                self.binding = MaterialBinding::Owned(material);
                log::debug!("EffectBinder: bound with owned material");
            }
            Some(shared) => {
                shared.set_shader(self.shaders.effect);
                surface.set_material(Some(shared.clone()));
                self.binding = MaterialBinding::Shared(shared);
                log::debug!("EffectBinder: bound with shared material");
            }
        }

        self.swap = SwapState::Idle;
        self.state = BinderState::Bound;
    }

    /// Advance the binder by one frame.
    ///
    /// Resolves any pending material swap, then pushes the current
    /// parameters into the installed material unless the push is
    /// suspended. Ticking a disabled binder does nothing.
    pub fn tick(&mut self, surface: &mut dyn Surface) {
        if self.state != BinderState::Bound {
            log::trace!("EffectBinder: tick while disabled, ignored");
            return;
        }

        self.resolve_swap(surface);

        #[cfg(feature = "editor")]
        self.repair(surface);

        if self.apply_params {
            self.push_params(surface);
        }
    }

    /// Unbind the effect from a surface.
    ///
    /// Releases the owned temporary material if one exists. If the
    /// surface is still active and a default material was captured, the
    /// default is reinstalled. Disabling twice is a no-op; the restore
    /// happens exactly once.
    pub fn disable(&mut self, surface: &mut dyn Surface) {
        if self.state == BinderState::Disabled {
            log::trace!("EffectBinder: disable while already disabled, ignored");
            return;
        }

        self.release_owned();
        self.binding = MaterialBinding::Unbound;

        if surface.is_active() {
            if let Some(default) = self.default_material.clone() {
                surface.set_material(Some(default));
                log::debug!("EffectBinder: restored default material");
            }
        }

        self.swap = SwapState::Idle;
        self.state = BinderState::Disabled;
    }

    /// Hand the binder a host-owned material.
    ///
    /// While bound, going from no shared material to having one arms a
    /// swap that the next tick resolves: the owned temporary is released
    /// and the shared material is installed with its shader forced.
    /// Replacing an already supplied shared material is stored but does
    /// not re-arm the swap; the replacement takes effect on the next
    /// revert or re-enable.
    pub fn set_shared_material(&mut self, material: Arc<Material>) {
        let had_shared = self.shared_material.is_some();
        self.shared_material = Some(material);
        if self.state == BinderState::Bound && !had_shared {
            self.swap = SwapState::PendingApply;
            log::trace!("EffectBinder: shared material supplied, apply pending");
        }
    }

    /// Withdraw the host-owned material.
    ///
    /// If the shared material is currently installed, the next tick
    /// releases the binder's claim on it and reverts to a fresh owned
    /// temporary. If the shared material was supplied but never applied,
    /// the pending swap is cancelled instead.
    pub fn clear_shared_material(&mut self) {
        let had_shared = self.shared_material.take().is_some();
        if self.state == BinderState::Bound && had_shared {
            if self.binding.is_shared() {
                self.swap = SwapState::PendingRevert;
                log::trace!("EffectBinder: shared material withdrawn, revert pending");
            } else if self.swap == SwapState::PendingApply {
                // Armed but never applied; nothing to revert.
                self.swap = SwapState::Idle;
            }
        }
    }

    /// Re-force the effect after a host editor reset the surface.
    ///
    /// Some host editors rebuild surfaces behind the scenes and put the
    /// plain fallback material back. When the surface's material is gone
    /// or runs the fallback shader, this reinstalls the binder's material
    /// and re-forces the effect shader. With the `editor` feature enabled
    /// every tick runs this check automatically.
    pub fn repair(&self, surface: &mut dyn Surface) {
        if self.state != BinderState::Bound {
            return;
        }
        let Some(bound) = self.binding.material() else {
            return;
        };
        let reset = match surface.material() {
            None => true,
            Some(current) => current.shader() == self.shaders.fallback,
        };
        if reset {
            bound.set_shader(self.shaders.effect);
            surface.set_material(Some(bound.clone()));
            log::debug!("EffectBinder: repaired externally reset material");
        }
    }

    fn create_effect_material(&self) -> Arc<Material> {
        self.device
            .create_material(&MaterialDescriptor::new(self.shaders.effect).with_label("black_hole"))
    }

    fn release_owned(&mut self) {
        if self.binding.is_owned() {
            self.binding = MaterialBinding::Unbound;
            log::trace!("EffectBinder: released owned material");
        }
    }

    fn resolve_swap(&mut self, surface: &mut dyn Surface) {
        match self.swap {
            SwapState::Idle => {}
            SwapState::PendingApply => {
                if let Some(shared) = self.shared_material.clone() {
                    self.release_owned();
                    shared.set_shader(self.shaders.effect);
                    surface.set_material(Some(shared.clone()));
                    self.binding = MaterialBinding::Shared(shared);
                    log::debug!("EffectBinder: applied shared material");
                }
                self.swap = SwapState::Idle;
            }
            SwapState::PendingRevert => {
                self.release_owned();
                let material = self.create_effect_material();
                surface.set_material(Some(material.clone()));
                self.binding = MaterialBinding::Owned(material);
                self.swap = SwapState::Idle;
                log::debug!("EffectBinder: reverted to owned material");
            }
        }
    }

    fn push_params(&self, surface: &mut dyn Surface) {
        let material = match self.binding.material() {
            Some(material) => material.clone(),
            None => return,
        };
        let data = self.params.uniform_data();

        material.set_float(uniform::ALPHA, data.alpha);

        if surface.supports_shadows() {
            if self.device.shadows_enabled() && self.cast_shadows {
                surface.set_shadow_mode(ShadowMode::On);
                if self.receive_shadows {
                    surface.set_receive_shadows(true);
                    material.set_render_queue(QUEUE_ALPHA_TEST);
                    material.set_int(uniform::DEPTH, 1);
                } else {
                    surface.set_receive_shadows(false);
                    material.set_render_queue(QUEUE_TRANSPARENT);
                    material.set_int(uniform::DEPTH, 0);
                }
            } else {
                surface.set_shadow_mode(ShadowMode::Off);
                surface.set_receive_shadows(false);
                material.set_render_queue(QUEUE_TRANSPARENT);
                material.set_int(uniform::DEPTH, 0);
            }

            let blend = self.composite.blend();
            material.set_int(uniform::BLEND_OP, blend.operation as i32);
            material.set_int(uniform::SRC_BLEND, blend.src_factor as i32);
            material.set_int(uniform::DST_BLEND, blend.dst_factor as i32);
        }

        material.set_float(uniform::DISTORTION, data.distortion);
        material.set_float(uniform::HOLE, data.hole_size);
        material.set_float(uniform::SPEED, data.speed);
        material.set_color(uniform::COLOR, data.color);
    }
}

// Ensure EffectBinder is Send + Sync
static_assertions::assert_impl_all!(EffectBinder: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{EffectShaders, ShaderLibrary};
    use crate::surface::SpriteSurface;

    fn test_binder() -> EffectBinder {
        let library = ShaderLibrary::standard();
        let shaders = EffectShaders::resolve(&library).unwrap();
        EffectBinder::new(RenderDevice::new(), shaders)
    }

    #[test]
    fn test_new_binder_defaults() {
        let binder = test_binder();
        assert_eq!(binder.state(), BinderState::Disabled);
        assert_eq!(binder.swap_state(), SwapState::Idle);
        assert!(matches!(binder.binding(), MaterialBinding::Unbound));
        assert!(binder.apply_params());
        assert!(binder.cast_shadows());
        assert!(!binder.receive_shadows());
        assert_eq!(binder.composite(), CompositeMode::Normal);
        assert!(binder.default_material().is_none());
    }

    #[test]
    fn test_enable_installs_owned_material() {
        let mut binder = test_binder();
        let mut sprite = SpriteSurface::new();

        binder.enable(&mut sprite);
        assert_eq!(binder.state(), BinderState::Bound);
        assert!(binder.binding().is_owned());
        assert!(binder.default_material().is_some());

        let installed = sprite.material().unwrap();
        assert_eq!(installed.shader(), binder.shaders().effect);
    }

    #[test]
    fn test_enable_twice_allocates_once() {
        let mut binder = test_binder();
        let mut sprite = SpriteSurface::new();

        binder.enable(&mut sprite);
        let count = binder.device().material_count();
        binder.enable(&mut sprite);
        assert_eq!(binder.device().material_count(), count);
    }

    #[test]
    fn test_owned_enable_forces_apply_params() {
        let mut binder = test_binder();
        binder.set_apply_params(false);

        let mut sprite = SpriteSurface::new();
        binder.enable(&mut sprite);
        assert!(binder.apply_params());
    }

    #[test]
    fn test_shared_material_arms_apply() {
        let mut binder = test_binder();
        let mut sprite = SpriteSurface::new();
        binder.enable(&mut sprite);

        let shared = binder
            .device()
            .create_material(&MaterialDescriptor::new(binder.shaders().fallback));
        binder.set_shared_material(shared.clone());
        assert_eq!(binder.swap_state(), SwapState::PendingApply);

        binder.tick(&mut sprite);
        assert_eq!(binder.swap_state(), SwapState::Idle);
        assert!(binder.binding().is_shared());
        assert_eq!(shared.shader(), binder.shaders().effect);
    }

    #[test]
    fn test_clear_before_tick_cancels_swap() {
        let mut binder = test_binder();
        let mut sprite = SpriteSurface::new();
        binder.enable(&mut sprite);

        let shared = binder
            .device()
            .create_material(&MaterialDescriptor::new(binder.shaders().fallback));
        binder.set_shared_material(shared);
        binder.clear_shared_material();
        assert_eq!(binder.swap_state(), SwapState::Idle);

        binder.tick(&mut sprite);
        assert!(binder.binding().is_owned());
    }

    #[test]
    fn test_disable_restores_default() {
        let mut binder = test_binder();
        let mut sprite = SpriteSurface::new();

        binder.enable(&mut sprite);
        binder.disable(&mut sprite);

        assert_eq!(binder.state(), BinderState::Disabled);
        assert!(matches!(binder.binding(), MaterialBinding::Unbound));
        let restored = sprite.material().unwrap();
        let default = binder.default_material().unwrap();
        assert!(Arc::ptr_eq(&restored, default));
    }

    #[test]
    fn test_tick_while_disabled_is_noop() {
        let mut binder = test_binder();
        let mut sprite = SpriteSurface::new();
        binder.tick(&mut sprite);
        assert!(sprite.material().is_none());
    }
}
