//! Repository layer: table-scoped database operations.

mod interaction;
mod report;

pub use interaction::*;
pub use report::*;

// ═══════════════════════════════════════════════════════════
// rusqlite optional helper
// ═══════════════════════════════════════════════════════════

/// Extension trait to convert NotFound into None.
pub(crate) trait OptionalRow<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalRow<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
