pub mod clarify;
pub mod classify;
pub mod decision;
pub mod enhance;
pub mod findings;
pub mod guidelines;
pub mod models;
pub mod prescription;
pub mod scoring;
pub mod text;
pub mod traits;

pub use findings::{ClinicalFindings, Sex, Sign};
pub use guidelines::{GuidelineError, GuidelineStore};
pub use models::{GuidelineMetadata, GuidelineRecord, SearchHit};
pub use traits::{Embedder, LlmClient, VectorSearch};
