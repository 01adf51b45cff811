//! Interactive bounding-box annotation for images.

pub mod app;
pub mod canvas;
pub mod config;
pub mod error;
pub mod history;
pub mod persist;
pub mod record;
pub mod render;
pub mod shapes;
pub mod view;

pub use canvas::{BoxCanvas, Hit};
pub use error::AnnotateError;
pub use record::ShapeRecord;
pub use shapes::BoundingBox;
