pub mod boundary;
pub mod f32;
pub mod io;
pub mod traits;

pub use self::boundary::{mirror_bounds, set_bounds};
pub use self::f32::ImageF32;
pub use self::traits::{ImageView, ImageViewMut, Rows};
