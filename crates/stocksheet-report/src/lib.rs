//! Stocksheet Report Composer
//!
//! Lays out one text/image block per inventory entry into a paginated PDF:
//! a title block, then per entry the barcode text and stock count, the
//! generated barcode image on the left, and the uploaded photo (when
//! present) on the right. Layout advances by a fixed step per entry and a
//! block never splits across pages.

mod composer;
mod layout;
mod temp;

pub use composer::{compose, ReportComposer};
