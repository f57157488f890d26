pub mod assistant;
pub mod classify;
pub mod normalize;
pub mod objectives;
pub mod prompt;

pub use crate::domain::model::{ClassMatch, NicEntry, NicParse, Objective, ObjectiveOutcome};
pub use crate::domain::ports::{ChatService, EmbeddingService, VectorIndex};
pub use crate::utils::error::Result;
