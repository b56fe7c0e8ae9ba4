//! Effect error types.

use thiserror::Error;

/// Errors that can occur while wiring up an effect.
///
/// The per-frame path has no error surface at all: a missing installed
/// material, an inactive surface, or an uncaptured default are handled by
/// silent guards. Only setup-time registry lookups can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    /// No shader with the given name is registered in the library.
    #[error("shader not found: {name}")]
    ShaderNotFound {
        /// The name that was looked up.
        name: String,
    },
}

/// Convenience result alias for effect setup operations.
pub type EffectResult<T> = Result<T, EffectError>;
