pub mod any_surface;
pub mod dib;
pub mod image;
pub mod presentation_buffer;
pub mod probe;
pub mod surface;

pub use any_surface::{AnySurface, SurfaceTarget};
pub use dib::{Blit, DibCompression, DibDescriptor, RgbQuad, StretchMode, COLOR_TABLE_LEN};
pub use image::{pack_bgra, SoftwareImage};
pub use presentation_buffer::PresentationBuffer;
pub use probe::probe;
pub use surface::{PresentStats, Surface, SurfaceCreateInfo};
