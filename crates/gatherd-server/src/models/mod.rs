pub mod community;
pub mod event;
pub mod image;

pub use community::*;
pub use event::*;
pub use image::*;
