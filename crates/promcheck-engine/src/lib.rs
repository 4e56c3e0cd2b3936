//! Rule evaluation engine for replaying alerting rules against history.
//!
//! [`evaluate`] takes one rule and the matrix of series its query returned
//! over the replay window, and classifies each series as SILENT, PENDING, or
//! FIRING based on how long the series has been present relative to the
//! rule's `for` duration. Firing results carry annotations rendered by
//! [`render_annotations`].
//!
//! Both functions are pure transformations over already-fetched data; they
//! perform no I/O and never fail the run.

pub mod evaluate;
pub mod render;


pub use evaluate::evaluate;
pub use render::render_annotations;
