//! Data models exchanged over the HTTP surface.
//!
//! `ContactRecord` is the normalized contact returned by `/qr`; `ResearchSubject`
//! carries the details `/search-web` forwards to the research agent.

pub mod contact;
pub mod research;

pub use contact::ContactRecord;
pub use research::{ResearchResult, ResearchSubject};
