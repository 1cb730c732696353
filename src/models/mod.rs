pub mod advisory;
pub mod classification;

pub use advisory::{Advisory, AdvisorySummary};
pub use classification::Classification;
