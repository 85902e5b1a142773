pub mod image;
pub mod surface;
pub mod window;

pub use image::*;
pub use surface::*;
pub use window::*;
