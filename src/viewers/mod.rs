//! Viewer (passive display endpoint) tracking and primary election (§4.7).

pub mod registry;

pub use registry::ViewerRegistry;
