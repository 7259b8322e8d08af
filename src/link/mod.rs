//! Semantic linking of fragments through externally computed embeddings.

mod embedding;
mod graph;
mod options;

pub use embedding::{EmbeddingProvider, PrecomputedEmbeddings};
pub use graph::{build_connections, cosine_similarity, ConnectionGraphBuilder};
pub use options::{LinkOptions, SIMILARITY_THRESHOLD};
