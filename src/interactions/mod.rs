//! Drug-drug interaction data: name normalization, keyword classification and
//! the bidirectional lookup index.

pub mod classify;
pub mod index;
pub mod normalize;
pub mod source;
pub mod types;

pub use index::{IndexStatus, InteractionIndex, LazyInteractionIndex};
pub use normalize::SynonymTable;
pub use source::{CsvInteractionSource, InteractionSource, MemoryInteractionSource};
pub use types::{InteractionError, InteractionRecord, RawInteraction};
