use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Oracle, OracleError};

/// Replays scripted replies in order and records every prompt it was given.
///
/// `None` in the script makes that call fail with an API error.
#[derive(Default)]
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| r.map(Into::into)).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Some(*r)))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Some(reply)) => Ok(reply),
            Some(None) => Err(OracleError::Api {
                status: 503,
                message: "upstream unavailable".to_string(),
            }),
            None => Err(OracleError::InvalidResponse("script exhausted".to_string())),
        }
    }
}
