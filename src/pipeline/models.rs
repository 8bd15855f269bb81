use serde::{Deserialize, Serialize};

use crate::pipeline::classifier::{Language, TaskCategory};

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: Option<String>,
    /// `None` or `"auto"` lets the classifier pick.
    pub language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub conversation_id: String,
    pub message: String,
    pub code: String,
    pub complexity: String,
    pub docs: String,
    pub language: Language,
    pub task: TaskCategory,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TestResponse {
    pub tests: String,
    pub language: Language,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareRequest {
    pub code: String,
    pub language: Language,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareResponse {
    pub share_id: String,
    pub share_url: String,
}
