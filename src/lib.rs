pub mod adaptive;
pub mod axes;
pub mod core;
pub mod curves;
pub mod histogram;
pub mod monte_carlo;
pub mod physics;
#[cfg(all(feature = "preview", not(target_arch = "wasm32")))]
pub mod render;
#[cfg(all(feature = "preview", not(target_arch = "wasm32")))]
pub mod runtime;
pub mod stack;

use thiserror::Error;

/// Failure raised synchronously at the start of a geometry call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Sample data is empty or malformed.
    #[error("invalid input data")]
    InvalidInput,

    /// Bin edges, axis ranges or scale ceilings are malformed.
    #[error("invalid configuration")]
    Configuration,
}

pub type Result<T> = std::result::Result<T, error_stack::Report<SceneError>>;

pub mod prelude {
    pub use crate::SceneError;
    pub use crate::adaptive::*;
    pub use crate::axes::*;
    pub use crate::core::*;
    pub use crate::curves::*;
    pub use crate::histogram::*;
    pub use crate::monte_carlo::*;
    pub use crate::physics::*;
    #[cfg(all(feature = "preview", not(target_arch = "wasm32")))]
    pub use crate::runtime::*;
    pub use crate::stack::*;
    pub use bevy_math::Vec2;
}
