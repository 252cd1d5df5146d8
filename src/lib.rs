pub mod canvas;
pub mod lighting;
pub mod material;
pub mod math;
pub mod render;
pub mod scene;
pub mod viewer;
