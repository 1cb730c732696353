pub mod advisories;
pub mod cache;
pub mod connection;
pub mod overrides;
pub mod schema;
pub mod synthesis;

pub use advisories::ReviewCandidate;
pub use connection::Database;
pub use synthesis::SynthesizedClassification;
