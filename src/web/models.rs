use serde::{Deserialize, Serialize};

use crate::pipeline::classifier::Language;
use crate::share::SharedCodeRecord;

pub use crate::pipeline::models::{
    ChatRequest, ChatResponse, ShareRequest, ShareResponse, TestResponse,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct TestRequest {
    pub code: String,
    pub language: Language,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SharedCodesResponse {
    pub shared_codes: Vec<SharedCodeRecord>,
}
