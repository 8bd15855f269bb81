pub mod classifier;
pub mod models;
pub mod prompts;

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::model::{Oracle, OracleError};
use crate::share::{ShareStore, SharedCodeRecord, StoreError};
use classifier::{classify, Language};
use models::{ChatRequest, ChatResponse, ShareRequest, ShareResponse, TestResponse};
use prompts::Prompts;

/// How many fresh ids to try before giving up on a share.
const MAX_SHARE_ATTEMPTS: usize = 5;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{step} failed: {source}")]
    Oracle {
        step: &'static str,
        #[source]
        source: OracleError,
    },

    #[error("prompt template error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Shared code not found")]
    NotFound(String),

    #[error("could not allocate a unique share id after {0} attempts")]
    ShareIdExhausted(usize),
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub default_language: Language,
    pub share_base_url: String,
    pub share_id_length: usize,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            default_language: config.default_language.clone(),
            share_base_url: config.share_base_url.clone(),
            share_id_length: config.share_id_length,
        }
    }
}

type ShareIdSource = Box<dyn Fn(usize) -> String + Send + Sync>;

/// Drives the chat, test and share flows on top of an oracle and a share store.
pub struct Orchestrator {
    oracle: Arc<dyn Oracle>,
    store: Arc<dyn ShareStore>,
    prompts: Prompts,
    config: PipelineConfig,
    share_ids: ShareIdSource,
}

impl Orchestrator {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        store: Arc<dyn ShareStore>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            oracle,
            store,
            prompts: Prompts::new()?,
            config,
            share_ids: Box::new(random_share_id),
        })
    }

    #[cfg(test)]
    fn with_share_ids<F>(mut self, source: F) -> Self
    where
        F: Fn(usize) -> String + Send + Sync + 'static,
    {
        self.share_ids = Box::new(source);
        self
    }

    async fn ask(&self, step: &'static str, prompt: String) -> Result<String, PipelineError> {
        debug!("{} prompt: {}", step, prompt);
        self.oracle
            .complete(&prompt)
            .await
            .map_err(|source| PipelineError::Oracle { step, source })
    }

    /// Code, then complexity, then docs. Each step feeds the next, so they run in order.
    pub async fn handle_chat(&self, request: ChatRequest) -> Result<ChatResponse, PipelineError> {
        let conversation_id = request
            .conversation_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let classification = classify(
            &request.message,
            request.language.as_deref(),
            &self.config.default_language,
        );
        let language = classification.language;
        info!(
            "Chat request in conversation {}: language={} task={}",
            conversation_id, language, classification.task
        );

        let code = self
            .ask("code generation", self.prompts.code_gen(language.as_str(), &request.message)?)
            .await?;
        info!("Generated {} characters of {} code", code.len(), language);

        let complexity = self
            .ask("complexity analysis", self.prompts.complexity(language.as_str(), &code)?)
            .await?;

        let docs = self
            .ask(
                "documentation",
                self.prompts.docs(language.as_str(), &code, &complexity)?,
            )
            .await?;

        Ok(ChatResponse {
            conversation_id,
            message: request.message,
            code,
            complexity,
            docs,
            language,
            task: classification.task,
        })
    }

    pub async fn handle_generate_tests(
        &self,
        code: &str,
        language: Language,
    ) -> Result<TestResponse, PipelineError> {
        let framework = language.test_framework();
        info!("Generating {} tests with {}", language, framework);

        let prompt = self.prompts.tests(language.as_str(), code, framework)?;
        let tests = self.ask("test generation", prompt).await?;

        Ok(TestResponse { tests, language })
    }

    pub async fn handle_share(&self, request: ShareRequest) -> Result<ShareResponse, PipelineError> {
        let mut record = SharedCodeRecord {
            share_id: String::new(),
            code: request.code,
            language: request.language,
            title: request.title,
            description: request.description,
            created_at: Utc::now(),
        };

        for _ in 0..MAX_SHARE_ATTEMPTS {
            let share_id = (self.share_ids)(self.config.share_id_length);
            record.share_id = share_id.clone();

            match self.store.put(record.clone()).await {
                Ok(()) => {
                    info!("Shared \"{}\" as {}", record.title, share_id);
                    return Ok(ShareResponse {
                        share_url: format!("{}?share={}", self.config.share_base_url, share_id),
                        share_id,
                    });
                }
                Err(StoreError::Conflict(taken)) => {
                    warn!("Share id {} already taken, regenerating", taken);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(PipelineError::ShareIdExhausted(MAX_SHARE_ATTEMPTS))
    }

    pub async fn get_shared(&self, share_id: &str) -> Result<SharedCodeRecord, PipelineError> {
        self.store
            .get(share_id)
            .await?
            .ok_or_else(|| PipelineError::NotFound(share_id.to_string()))
    }

    pub async fn list_shared(&self) -> Result<Vec<SharedCodeRecord>, PipelineError> {
        Ok(self.store.list().await?)
    }
}

fn random_share_id(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::model::mock::ScriptedOracle;
    use crate::pipeline::classifier::TaskCategory;
    use crate::share::InMemoryShareStore;

    fn config() -> PipelineConfig {
        PipelineConfig {
            default_language: Language::Python,
            share_base_url: "http://localhost:8501".to_string(),
            share_id_length: 8,
        }
    }

    fn orchestrator(oracle: Arc<ScriptedOracle>) -> Orchestrator {
        Orchestrator::new(oracle, Arc::new(InMemoryShareStore::new()), config()).unwrap()
    }

    fn chat(message: &str, language: Option<&str>) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            conversation_id: None,
            language: language.map(str::to_string),
        }
    }

    fn share(title: &str) -> ShareRequest {
        ShareRequest {
            code: format!("// {title}"),
            language: Language::Javascript,
            title: title.to_string(),
            description: Some(format!("about {title}")),
        }
    }

    #[actix_web::test]
    async fn chat_runs_three_steps_in_order() {
        let oracle = Arc::new(ScriptedOracle::replying(&[
            "def search(xs, x): ...",
            "O(log n) time, O(1) space",
            "Binary search docs",
        ]));
        let pipeline = orchestrator(oracle.clone());

        let response = pipeline
            .handle_chat(chat("Write a binary search in Python", None))
            .await
            .unwrap();

        assert_eq!(response.language, Language::Python);
        assert_eq!(response.task, TaskCategory::Generate);
        assert_eq!(response.message, "Write a binary search in Python");
        assert_eq!(response.code, "def search(xs, x): ...");
        assert_eq!(response.complexity, "O(log n) time, O(1) space");
        assert_eq!(response.docs, "Binary search docs");
        assert!(Uuid::parse_str(&response.conversation_id).is_ok());

        let prompts = oracle.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("Task: Write a binary search in Python"));
        assert!(prompts[1].contains("def search(xs, x): ..."));
        assert!(prompts[2].contains("def search(xs, x): ..."));
        assert!(prompts[2].contains("Complexity: O(log n) time, O(1) space"));
    }

    #[actix_web::test]
    async fn chat_echoes_conversation_and_explicit_language() {
        let oracle = Arc::new(ScriptedOracle::replying(&["code", "complexity", "docs"]));
        let pipeline = orchestrator(oracle.clone());

        let mut request = chat("explain this python snippet", Some("Go"));
        request.conversation_id = Some("conv-42".to_string());
        let response = pipeline.handle_chat(request).await.unwrap();

        assert_eq!(response.conversation_id, "conv-42");
        assert_eq!(response.language, Language::Other("Go".to_string()));
        assert_eq!(response.task, TaskCategory::Explain);
        assert!(oracle.prompts()[0].starts_with("You are an expert Go programmer."));
    }

    #[actix_web::test]
    async fn oracle_failure_stops_the_chain() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Some("code"), None, Some("unused")]));
        let pipeline = orchestrator(oracle.clone());

        let err = pipeline
            .handle_chat(chat("write fizzbuzz", None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Oracle { step: "complexity analysis", .. }
        ));
        assert!(err.to_string().contains("upstream unavailable"));
        assert_eq!(oracle.prompts().len(), 2);
    }

    #[actix_web::test]
    async fn tests_use_language_framework() {
        let oracle = Arc::new(ScriptedOracle::replying(&["TEST(A, B) {}", "def test_x(): pass"]));
        let pipeline = orchestrator(oracle.clone());

        let cpp = pipeline
            .handle_generate_tests("int f();", Language::Cpp)
            .await
            .unwrap();
        assert_eq!(cpp.tests, "TEST(A, B) {}");
        assert_eq!(cpp.language, Language::Cpp);

        let other = pipeline
            .handle_generate_tests("fn f() {}", Language::from("rust"))
            .await
            .unwrap();
        assert_eq!(other.language.as_str(), "rust");

        let prompts = oracle.prompts();
        assert!(prompts[0].contains("(Google Test or Catch2)"));
        assert!(prompts[1].contains("(appropriate testing framework)"));
    }

    #[actix_web::test]
    async fn share_then_get_round_trips_fields() {
        let pipeline = orchestrator(Arc::new(ScriptedOracle::default()));

        let shared = pipeline.handle_share(share("debounce")).await.unwrap();
        assert_eq!(shared.share_id.len(), 8);
        assert!(shared.share_id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(
            shared.share_url,
            format!("http://localhost:8501?share={}", shared.share_id)
        );

        let record = pipeline.get_shared(&shared.share_id).await.unwrap();
        assert_eq!(record.share_id, shared.share_id);
        assert_eq!(record.code, "// debounce");
        assert_eq!(record.language, Language::Javascript);
        assert_eq!(record.title, "debounce");
        assert_eq!(record.description.as_deref(), Some("about debounce"));
    }

    #[actix_web::test]
    async fn unknown_share_is_not_found() {
        let pipeline = orchestrator(Arc::new(ScriptedOracle::default()));
        let err = pipeline.get_shared("nope1234").await.unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(id) if id == "nope1234"));
    }

    #[actix_web::test]
    async fn list_keeps_share_order() {
        let pipeline = orchestrator(Arc::new(ScriptedOracle::default()));
        let mut ids = Vec::new();
        for title in ["one", "two", "three"] {
            ids.push(pipeline.handle_share(share(title)).await.unwrap().share_id);
        }

        let listed = pipeline.list_shared().await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
        let listed_ids: Vec<String> = listed.into_iter().map(|r| r.share_id).collect();
        assert_eq!(listed_ids, ids);
    }

    #[actix_web::test]
    async fn colliding_share_id_is_regenerated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let pipeline = orchestrator(Arc::new(ScriptedOracle::default())).with_share_ids(move |_| {
            // first two draws collide, third is fresh
            match counter.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => "same".to_string(),
                _ => "fresh".to_string(),
            }
        });

        assert_eq!(pipeline.handle_share(share("a")).await.unwrap().share_id, "same");
        assert_eq!(pipeline.handle_share(share("b")).await.unwrap().share_id, "fresh");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(pipeline.get_shared("same").await.unwrap().title, "a");
    }

    #[actix_web::test]
    async fn share_gives_up_after_repeated_collisions() {
        let pipeline = orchestrator(Arc::new(ScriptedOracle::default()))
            .with_share_ids(|_| "stuck".to_string());

        pipeline.handle_share(share("first")).await.unwrap();
        let err = pipeline.handle_share(share("second")).await.unwrap_err();
        assert!(matches!(err, PipelineError::ShareIdExhausted(MAX_SHARE_ATTEMPTS)));
        assert_eq!(pipeline.list_shared().await.unwrap().len(), 1);
    }
}
