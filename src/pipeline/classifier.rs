use std::fmt;

use serde::{Deserialize, Serialize};

/// Target language for generated code.
///
/// Caller-supplied names that are not one of the known languages are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    Python,
    Javascript,
    Java,
    Cpp,
    Other(String),
}

impl Language {
    pub fn as_str(&self) -> &str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::Other(name) => name,
        }
    }

    /// Suggested unit-testing framework, used in the test-generation prompt.
    pub fn test_framework(&self) -> &'static str {
        match self {
            Language::Python => "pytest or unittest",
            Language::Javascript => "Jest or Mocha",
            Language::Java => "JUnit",
            Language::Cpp => "Google Test or Catch2",
            Language::Other(_) => "appropriate testing framework",
        }
    }
}

impl From<String> for Language {
    fn from(name: String) -> Self {
        match name.as_str() {
            "python" => Language::Python,
            "javascript" => Language::Javascript,
            "java" => Language::Java,
            "cpp" => Language::Cpp,
            _ => Language::Other(name),
        }
    }
}

impl From<&str> for Language {
    fn from(name: &str) -> Self {
        Language::from(name.to_string())
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        match language {
            Language::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Generate,
    Explain,
    Refactor,
    Debug,
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskCategory::Generate => "generate",
            TaskCategory::Explain => "explain",
            TaskCategory::Refactor => "refactor",
            TaskCategory::Debug => "debug",
        };
        f.write_str(name)
    }
}

/// One row of a keyword table: any keyword occurring in the message selects `outcome`.
struct Rule<T> {
    keywords: &'static [&'static str],
    outcome: T,
}

impl<T> Rule<T> {
    fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|keyword| haystack.contains(keyword))
    }
}

// Order matters: "javascript" must be tried before "java", and the bare "c"
// catches nearly anything so it stays last.
const LANGUAGE_RULES: &[Rule<Language>] = &[
    Rule { keywords: &["python"], outcome: Language::Python },
    Rule { keywords: &["py"], outcome: Language::Python },
    Rule { keywords: &["javascript"], outcome: Language::Javascript },
    Rule { keywords: &["js"], outcome: Language::Javascript },
    Rule { keywords: &["node"], outcome: Language::Javascript },
    Rule { keywords: &["java"], outcome: Language::Java },
    Rule { keywords: &["c++"], outcome: Language::Cpp },
    Rule { keywords: &["cpp"], outcome: Language::Cpp },
    Rule { keywords: &["c"], outcome: Language::Cpp },
];

const TASK_RULES: &[Rule<TaskCategory>] = &[
    Rule {
        keywords: &["explain", "understand", "what does"],
        outcome: TaskCategory::Explain,
    },
    Rule {
        keywords: &["refactor", "improve", "optimize"],
        outcome: TaskCategory::Refactor,
    },
    Rule {
        keywords: &["debug", "fix", "error", "bug"],
        outcome: TaskCategory::Debug,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub language: Language,
    pub task: TaskCategory,
}

/// Decide target language and task category for a chat message.
///
/// An explicit language other than `"auto"` wins over anything in the message.
pub fn classify(message: &str, explicit: Option<&str>, fallback: &Language) -> Classification {
    let lowered = message.to_lowercase();

    let language = match explicit.filter(|name| !name.is_empty() && *name != "auto") {
        Some(name) => Language::from(name),
        None => detect_language(&lowered).unwrap_or_else(|| fallback.clone()),
    };

    Classification {
        language,
        task: detect_task(&lowered),
    }
}

fn detect_language(lowered: &str) -> Option<Language> {
    LANGUAGE_RULES
        .iter()
        .find(|rule| rule.matches(lowered))
        .map(|rule| rule.outcome.clone())
}

fn detect_task(lowered: &str) -> TaskCategory {
    TASK_RULES
        .iter()
        .find(|rule| rule.matches(lowered))
        .map(|rule| rule.outcome)
        .unwrap_or(TaskCategory::Generate)
}
