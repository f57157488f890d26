use crate::domain::model::{ChatRequest, ClassMatch};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait EmbeddingService: Send + Sync {
    fn check_credentials(&self) -> Result<()>;
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    fn check_credentials(&self) -> Result<()>;
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<ClassMatch>>;
}

#[async_trait]
pub trait ChatService: Send + Sync {
    fn check_credentials(&self) -> Result<()>;
    /// Returns the content of the first choice.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

#[async_trait]
impl<T: EmbeddingService + ?Sized> EmbeddingService for Arc<T> {
    fn check_credentials(&self) -> Result<()> {
        (**self).check_credentials()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text).await
    }
}

#[async_trait]
impl<T: VectorIndex + ?Sized> VectorIndex for Arc<T> {
    fn check_credentials(&self) -> Result<()> {
        (**self).check_credentials()
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<ClassMatch>> {
        (**self).query(vector, top_k, include_metadata).await
    }
}

#[async_trait]
impl<T: ChatService + ?Sized> ChatService for Arc<T> {
    fn check_credentials(&self) -> Result<()> {
        (**self).check_credentials()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        (**self).complete(request).await
    }
}
