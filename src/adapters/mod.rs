// Adapters layer: concrete clients for the hosted embedding, vector index and chat APIs.

pub mod http;
pub mod openai;
pub mod pinecone;

pub use http::{HttpInvoker, RetryPolicy};
pub use openai::OpenAiClient;
pub use pinecone::PineconeIndex;
