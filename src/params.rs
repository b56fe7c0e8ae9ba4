//! Effect parameters.
//!
//! [`EffectParams`] is the artist-facing parameter block of the black
//! hole effect. The fields are plain and public so hosts can animate
//! them every frame; [`EffectParams::uniform_data`] converts the block
//! into the exact float layout the shader reads.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use crate::color::Color;

/// Names of the shader properties the effect writes.
pub mod uniform {
    /// Coverage removal, stored as `1 - opacity`.
    pub const ALPHA: &str = "_Alpha";
    /// Swirl strength around the hole.
    pub const DISTORTION: &str = "_Distortion";
    /// Radius of the fully swallowed region.
    pub const HOLE: &str = "_Hole";
    /// Rotation speed of the swirl.
    pub const SPEED: &str = "_Speed";
    /// RGBA tint.
    pub const COLOR: &str = "_ColorX";
    /// Depth-pass participation flag, `0` or `1`.
    pub const DEPTH: &str = "_Z";
    /// GPU blend operation word.
    pub const BLEND_OP: &str = "_BlendOp";
    /// GPU source blend factor word.
    pub const SRC_BLEND: &str = "_SrcBlend";
    /// GPU destination blend factor word.
    pub const DST_BLEND: &str = "_DstBlend";
}

/// Animatable parameters of the black hole effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    /// Opacity of the effect, `0.0` to `1.0`.
    pub alpha: f32,
    /// Swirl strength, editable range `-1.0` to `1.0`.
    pub distortion: f32,
    /// Hole radius, `0.0` to `0.5`.
    pub hole_size: f32,
    /// Swirl speed, `-10.0` to `10.0`.
    pub speed: f32,
    /// Tint applied to the distorted pixels.
    pub color: Color,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            // Stock value sits above the editable range on purpose; the
            // builders clamp, the field does not.
            distortion: 1.6,
            hole_size: 0.0,
            speed: 4.0,
            color: Color::WHITE,
        }
    }
}

impl EffectParams {
    /// Create the stock parameter block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the opacity, clamped to `[0, 1]`.
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Set the swirl strength, clamped to `[-1, 1]`.
    pub fn with_distortion(mut self, distortion: f32) -> Self {
        self.distortion = distortion.clamp(-1.0, 1.0);
        self
    }

    /// Set the hole radius, clamped to `[0, 0.5]`.
    pub fn with_hole_size(mut self, hole_size: f32) -> Self {
        self.hole_size = hole_size.clamp(0.0, 0.5);
        self
    }

    /// Set the swirl speed, clamped to `[-10, 10]`.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.clamp(-10.0, 10.0);
        self
    }

    /// Set the tint color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Create the uniform data struct the shader reads.
    ///
    /// The opacity is inverted on the way out: the shader's `_Alpha`
    /// uniform holds coverage removal, so `1.0` here becomes `0.0` there.
    pub fn uniform_data(&self) -> EffectUniformData {
        EffectUniformData {
            color: self.color,
            alpha: 1.0 - self.alpha,
            distortion: self.distortion,
            hole_size: self.hole_size,
            speed: self.speed,
        }
    }
}

/// Effect uniform data for GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct EffectUniformData {
    /// RGBA tint.
    pub color: Color,
    /// Coverage removal, `1 - opacity`.
    pub alpha: f32,
    /// Swirl strength.
    pub distortion: f32,
    /// Hole radius.
    pub hole_size: f32,
    /// Swirl speed.
    pub speed: f32,
}

// Two vec4s on the GPU side.
const_assert_eq!(std::mem::size_of::<EffectUniformData>(), 32);
