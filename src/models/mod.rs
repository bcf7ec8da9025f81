pub mod analysis;
pub mod enums;
pub mod patient;

pub use analysis::*;
pub use enums::{AdjustmentType, AnalysisStatus, Severity};
pub use patient::*;
