//! Shader registry and handles.
//!
//! Rendering hosts register the shader programs they compiled under
//! well-known names; effects look the names up once at setup time and
//! hold [`ShaderHandle`]s from then on. The per-frame path never touches
//! strings.

use crate::error::{EffectError, EffectResult};

/// Name of the black hole distortion shader.
pub const BLACK_HOLE_SHADER: &str = "fx2d/black_hole";

/// Name of the plain sprite shader used when no effect is applied.
///
/// Also the shader a material falls back to when a host editor resets it,
/// which is what the repair path watches for.
pub const DEFAULT_SPRITE_SHADER: &str = "sprites/default";

/// Opaque handle to a registered shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub(crate) u32);

impl ShaderHandle {
    /// The registry index of this handle.
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Collection of shader names known to the rendering host.
///
/// The library only maps names to handles; compiling and binding the
/// actual programs is the host's business.
#[derive(Debug, Default)]
pub struct ShaderLibrary {
    names: Vec<String>,
}

impl ShaderLibrary {
    /// Create an empty shader library.
    pub fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Create the standard library for 2D effects.
    ///
    /// This registers the shaders every effect binding needs:
    /// - [`BLACK_HOLE_SHADER`] - the distortion effect itself
    /// - [`DEFAULT_SPRITE_SHADER`] - the plain fallback
    pub fn standard() -> Self {
        let mut library = Self::new();
        library.register(BLACK_HOLE_SHADER);
        library.register(DEFAULT_SPRITE_SHADER);
        library
    }

    /// Register a shader name and return its handle.
    ///
    /// Registering a name twice returns the original handle.
    pub fn register(&mut self, name: impl Into<String>) -> ShaderHandle {
        let name = name.into();
        if let Some(handle) = self.find(&name) {
            return handle;
        }
        let handle = ShaderHandle(self.names.len() as u32);
        log::trace!("ShaderLibrary: registered '{}' as {:?}", name, handle);
        self.names.push(name);
        handle
    }

    /// Look up a shader by name.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::ShaderNotFound`] when no shader with that
    /// name is registered.
    pub fn get(&self, name: &str) -> EffectResult<ShaderHandle> {
        self.find(name).ok_or_else(|| EffectError::ShaderNotFound {
            name: name.to_string(),
        })
    }

    /// Look up a shader by name, returning `None` when it is missing.
    pub fn find(&self, name: &str) -> Option<ShaderHandle> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| ShaderHandle(i as u32))
    }

    /// The name a handle was registered under.
    pub fn name(&self, handle: ShaderHandle) -> Option<&str> {
        self.names.get(handle.0 as usize).map(String::as_str)
    }

    /// Number of registered shaders.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The pair of shader handles an effect binding works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectShaders {
    /// The effect shader forced onto installed materials.
    pub effect: ShaderHandle,
    /// The plain shader used for fabricated defaults and reset detection.
    pub fallback: ShaderHandle,
}

impl EffectShaders {
    /// Create the pair from already-resolved handles.
    pub fn new(effect: ShaderHandle, fallback: ShaderHandle) -> Self {
        Self { effect, fallback }
    }

    /// Resolve the pair from a library using the standard shader names.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::ShaderNotFound`] when either name is not
    /// registered in `library`.
    pub fn resolve(library: &ShaderLibrary) -> EffectResult<Self> {
        Ok(Self {
            effect: library.get(BLACK_HOLE_SHADER)?,
            fallback: library.get(DEFAULT_SPRITE_SHADER)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_library_shaders() {
        let library = ShaderLibrary::standard();
        assert_eq!(library.len(), 2);
        assert!(library.find(BLACK_HOLE_SHADER).is_some());
        assert!(library.find(DEFAULT_SPRITE_SHADER).is_some());
    }

    #[test]
    fn test_empty_library() {
        let library = ShaderLibrary::new();
        assert!(library.is_empty());
        assert_eq!(library.find(BLACK_HOLE_SHADER), None);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut library = ShaderLibrary::new();
        let first = library.register("fx2d/test");
        let second = library.register("fx2d/test");
        assert_eq!(first, second);
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_get_missing_shader_fails() {
        let library = ShaderLibrary::standard();
        let err = library.get("fx2d/unknown");
        assert_eq!(
            err,
            Err(EffectError::ShaderNotFound {
                name: "fx2d/unknown".to_string()
            })
        );
    }

    #[test]
    fn test_handle_name_roundtrip() {
        let library = ShaderLibrary::standard();
        let handle = library.get(BLACK_HOLE_SHADER).ok();
        assert!(handle.is_some());
        if let Some(handle) = handle {
            assert_eq!(library.name(handle), Some(BLACK_HOLE_SHADER));
        }
    }

    #[test]
    fn test_resolve_effect_shaders() {
        let library = ShaderLibrary::standard();
        let shaders = EffectShaders::resolve(&library);
        assert!(shaders.is_ok());

        let empty = ShaderLibrary::new();
        assert!(EffectShaders::resolve(&empty).is_err());
    }
}
