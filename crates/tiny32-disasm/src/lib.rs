pub mod listing;
pub mod model;

// Re-export commonly used types/functions for consumers
pub use listing::{listing, Row};
pub use model::{load_image, parse_image, Image};
