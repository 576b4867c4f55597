pub mod dates;
pub mod loader;
pub mod metadata;
pub mod model;
pub mod output;
pub mod tables;
