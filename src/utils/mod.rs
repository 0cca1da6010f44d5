//! Shared helpers.
//!
//! - [`date`]: front-matter date parsing
//! - [`html`]: escaping and breadth-first element lookup
//! - [`mime`]: MIME guesses for feed enclosures

pub mod date;
pub mod html;
pub mod mime;
