//! Blend state vocabulary and the composite mode table.
//!
//! The numeric values of [`BlendFactor`] and [`BlendOperation`] are a wire
//! contract shared with the effect shaders: they are pushed into materials
//! as integer properties and consumed verbatim as GPU blend-state words.
//! Renumbering them breaks every compiled shader, so the discriminants are
//! pinned explicitly.

/// Blend factor for blending operations.
///
/// Discriminants are the GPU blend words read by the effect shaders.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendFactor {
    /// 0.0
    #[default]
    Zero = 0,
    /// 1.0
    One = 1,
    /// Destination color
    Dst = 2,
    /// Source color
    Src = 3,
    /// 1 - destination color
    OneMinusDst = 4,
    /// Source alpha
    SrcAlpha = 5,
    /// 1 - source color
    OneMinusSrc = 6,
    /// Destination alpha
    DstAlpha = 7,
    /// 1 - destination alpha
    OneMinusDstAlpha = 8,
    /// min(source alpha, 1 - destination alpha)
    SrcAlphaSaturated = 9,
    /// 1 - source alpha
    OneMinusSrcAlpha = 10,
}

/// Blend operation for combining colors.
///
/// Discriminants are the GPU blend words read by the effect shaders.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendOperation {
    /// source + destination
    #[default]
    Add = 0,
    /// source - destination
    Subtract = 1,
    /// destination - source
    ReverseSubtract = 2,
    /// min(source, destination)
    Min = 3,
    /// max(source, destination)
    Max = 4,
}

/// Blend component configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendComponent {
    /// Source factor.
    pub src_factor: BlendFactor,
    /// Destination factor.
    pub dst_factor: BlendFactor,
    /// Blend operation.
    pub operation: BlendOperation,
}

impl Default for BlendComponent {
    fn default() -> Self {
        CompositeMode::Normal.blend()
    }
}

/// How the effect output is composited over the scene behind it.
///
/// The variant order matches the mode index shown to artists, so the
/// discriminants are pinned. [`CompositeMode::blend`] maps each mode to the
/// blend component the shaders expect for it; the table is fixed and must
/// not be edited without recompiling the shaders against it.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompositeMode {
    /// Premultiplied alpha compositing.
    #[default]
    Normal = 0,
    /// Sum with the backdrop.
    Additive = 1,
    /// Darkens the backdrop.
    Darken = 2,
    /// Lightens the backdrop.
    Lighten = 3,
    /// Subtractive darkening.
    LinearBurn = 4,
    /// Additive lightening weighted by coverage.
    LinearDodge = 5,
    /// Multiplies with the backdrop.
    Multiply = 6,
    /// Additive with backdrop-complement weighting, avoids blowout.
    SoftAdditive = 7,
    /// Doubled multiplicative darkening.
    TwoXMultiplicative = 8,
}

impl CompositeMode {
    /// Every mode, in index order.
    pub const ALL: [CompositeMode; 9] = [
        CompositeMode::Normal,
        CompositeMode::Additive,
        CompositeMode::Darken,
        CompositeMode::Lighten,
        CompositeMode::LinearBurn,
        CompositeMode::LinearDodge,
        CompositeMode::Multiply,
        CompositeMode::SoftAdditive,
        CompositeMode::TwoXMultiplicative,
    ];

    /// Looks up a mode by its artist-facing index.
    ///
    /// Returns `None` when the index is out of range.
    pub fn from_index(index: u8) -> Option<CompositeMode> {
        CompositeMode::ALL.get(index as usize).copied()
    }

    /// The artist-facing index of this mode.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The blend component the effect shaders expect for this mode.
    pub fn blend(self) -> BlendComponent {
        match self {
            CompositeMode::Normal => BlendComponent {
                src_factor: BlendFactor::One,
                dst_factor: BlendFactor::OneMinusSrcAlpha,
                operation: BlendOperation::Add,
            },
            CompositeMode::Additive => BlendComponent {
                src_factor: BlendFactor::One,
                dst_factor: BlendFactor::One,
                operation: BlendOperation::Add,
            },
            CompositeMode::Darken => BlendComponent {
                src_factor: BlendFactor::One,
                dst_factor: BlendFactor::Dst,
                operation: BlendOperation::ReverseSubtract,
            },
            CompositeMode::Lighten => BlendComponent {
                src_factor: BlendFactor::One,
                dst_factor: BlendFactor::One,
                operation: BlendOperation::Max,
            },
            CompositeMode::LinearBurn => BlendComponent {
                src_factor: BlendFactor::One,
                dst_factor: BlendFactor::One,
                operation: BlendOperation::ReverseSubtract,
            },
            CompositeMode::LinearDodge => BlendComponent {
                src_factor: BlendFactor::OneMinusSrcAlpha,
                dst_factor: BlendFactor::OneMinusSrcAlpha,
                operation: BlendOperation::Max,
            },
            CompositeMode::Multiply => BlendComponent {
                src_factor: BlendFactor::Dst,
                dst_factor: BlendFactor::OneMinusSrcAlpha,
                operation: BlendOperation::Add,
            },
            CompositeMode::SoftAdditive => BlendComponent {
                src_factor: BlendFactor::OneMinusDst,
                dst_factor: BlendFactor::One,
                operation: BlendOperation::Add,
            },
            CompositeMode::TwoXMultiplicative => BlendComponent {
                src_factor: BlendFactor::DstAlpha,
                dst_factor: BlendFactor::Dst,
                operation: BlendOperation::ReverseSubtract,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_words_are_pinned() {
        assert_eq!(BlendFactor::Zero as i32, 0);
        assert_eq!(BlendFactor::Dst as i32, 2);
        assert_eq!(BlendFactor::SrcAlpha as i32, 5);
        assert_eq!(BlendFactor::OneMinusSrcAlpha as i32, 10);
        assert_eq!(BlendOperation::Add as i32, 0);
        assert_eq!(BlendOperation::ReverseSubtract as i32, 2);
        assert_eq!(BlendOperation::Max as i32, 4);
    }

    #[test]
    fn test_mode_index_roundtrip() {
        for (i, mode) in CompositeMode::ALL.iter().enumerate() {
            assert_eq!(mode.index() as usize, i);
            assert_eq!(CompositeMode::from_index(i as u8), Some(*mode));
        }
        assert_eq!(CompositeMode::from_index(9), None);
    }

    #[test]
    fn test_default_mode_is_normal() {
        assert_eq!(CompositeMode::default(), CompositeMode::Normal);
        assert_eq!(BlendComponent::default(), CompositeMode::Normal.blend());
    }

    #[test]
    fn test_normal_is_premultiplied_over() {
        let blend = CompositeMode::Normal.blend();
        assert_eq!(blend.src_factor, BlendFactor::One);
        assert_eq!(blend.dst_factor, BlendFactor::OneMinusSrcAlpha);
        assert_eq!(blend.operation, BlendOperation::Add);
    }

    #[test]
    fn test_multiply_uses_destination_color() {
        let blend = CompositeMode::Multiply.blend();
        assert_eq!(blend.src_factor, BlendFactor::Dst);
        assert_eq!(blend.dst_factor, BlendFactor::OneMinusSrcAlpha);
        assert_eq!(blend.operation, BlendOperation::Add);
    }
}
