pub mod chart_data;
pub mod color;
pub mod dataset;
pub mod error;
pub mod gotest;
pub mod model;
pub mod options;
pub mod pattern;
pub mod render;
pub mod sample;
pub mod session;
pub mod settings;
pub mod sort;
pub mod stats;

pub use error::{VizError, VizResult};
pub use session::Session;
