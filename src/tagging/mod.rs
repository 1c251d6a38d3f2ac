//! Automatic tagging of procurement texts.
//!
//! A fixed table of regular-expression rules recognises legal references,
//! procurement modalities, deadlines and planning artefacts in free text.
//! Detection is pure and synchronous; the compiled table is shared by all
//! callers without locking.

mod detector;
mod patterns;

pub use detector::{detect_entry_tags, detect_tags, TagSet, MODALITY_DISPENSA, MODALITY_PREGAO};
pub use patterns::{rules, PatternRule};
