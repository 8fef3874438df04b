pub mod embedder;
pub mod vector;

pub use embedder::{select_embedder, HashEmbedder, OllamaEmbedder, OpenAiEmbedder};
pub use vector::{cosine_distance, VectorIndex};
