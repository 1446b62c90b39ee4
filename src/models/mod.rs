mod category;
mod color_preset;
mod note;

pub use category::*;
pub use color_preset::*;
pub use note::*;
