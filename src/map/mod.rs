//! Interactive offline map generation (Leaflet document tree).

pub mod annotations;
pub mod builder;
pub mod checkpoints;
pub mod components;
pub mod document;
pub mod filters;

pub use builder::MapBuilder;
pub use document::MapDocument;
