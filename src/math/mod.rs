pub mod error;
pub mod geometry;
pub mod probability;
pub mod types;
pub mod utils;

// Re-exports für einfache Verwendung
pub use error::{MathError, MathResult};
pub use types::*;

// Öffentliche API
pub mod prelude {
    pub use super::{
        error::{MathError, MathResult},
        geometry::{kernel::*, spatial_index::SpatialMeshIndex, surface::Surface},
        probability::SeedResource,
        types::*,
    };
}
