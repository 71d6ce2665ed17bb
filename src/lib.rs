//! Interactive time/value ruler for zoomable timeline views.
//!
//! The [`ruler`] module holds the tick generator, the value/pixel mapping,
//! the renderer, and the scrub controller that drags the playhead.

pub mod ruler;
