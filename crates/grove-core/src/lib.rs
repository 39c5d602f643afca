pub mod constants;
pub mod control;
pub mod ease;
pub mod formation;
pub mod gesture;
pub mod instances;
pub mod morph;
pub mod particles;
pub mod photos;
pub mod scene;

pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");
pub static MARKERS_WGSL: &str = include_str!("../shaders/markers.wgsl");
pub static BILLBOARD_WGSL: &str = include_str!("../shaders/billboard.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use control::*;
pub use ease::*;
pub use formation::*;
pub use gesture::*;
pub use instances::*;
pub use morph::*;
pub use particles::*;
pub use photos::*;
pub use scene::*;
