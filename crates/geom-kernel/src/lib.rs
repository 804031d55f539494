pub mod body;
pub mod metrics;
pub mod native;
pub mod recipe;
pub mod traits;
pub mod types;

pub use body::SolidBody;
pub use native::NativeKernel;
pub use recipe::{Dim, Primitive, Recipe, RecipeStep};
pub use traits::ParametricKernel;
pub use types::*;
