pub mod renderer;
pub mod traits;
pub mod components;

pub use renderer::*;
pub use traits::*;
pub use components::*;
