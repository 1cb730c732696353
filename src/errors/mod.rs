pub mod types;

pub use types::TriageError;
