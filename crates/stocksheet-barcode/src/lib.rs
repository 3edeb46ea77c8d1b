//! Stocksheet Barcode Encoder
//!
//! Pure function from barcode text to a PNG raster: Code 128 (character set
//! B), fixed 3x module width, quiet zones, and the human-readable text baked
//! beneath the bars. Deterministic for a given input and crate version.
//!
//! Persisting the PNG anywhere is the caller's responsibility; any such file
//! is a transient resource that the caller must clean up.

mod encoder;
mod font;

pub use encoder::{encode, BAR_HEIGHT_PX, MODULE_WIDTH_PX};
