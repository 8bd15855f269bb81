use tera::{Context, Tera};

pub const CODE_GEN: &str = "code_gen.txt";
pub const COMPLEXITY: &str = "complexity.txt";
pub const DOCS: &str = "docs.txt";
pub const TESTS: &str = "tests.txt";

const CODE_GEN_TEMPLATE: &str = r#"You are an expert {{ language }} programmer.

Task: {{ query }}

Requirements:
- Write clean, readable {{ language }} code
- Use proper naming conventions for {{ language }}
- Add clear comments explaining the logic
- Include proper error handling where appropriate
- Use the most efficient algorithm with optimal time/space complexity
- Follow {{ language }} best practices and coding standards

Return ONLY the code without markdown formatting or explanations."#;

const COMPLEXITY_TEMPLATE: &str = r#"Analyze this {{ language }} code and provide:

{{ code }}

1. Time Complexity: O(?)
2. Space Complexity: O(?)
3. Brief explanation (2-3 sentences) of why this complexity is achieved.

Provide a clear, concise analysis."#;

const DOCS_TEMPLATE: &str = r#"Create clear documentation for this {{ language }} code:

{{ code }}

Include:
1. Overview of what the code does
2. Function/method descriptions
3. Usage example
4. Complexity: {{ complexity }}

Keep it concise and user-friendly."#;

const TESTS_TEMPLATE: &str = r#"Generate comprehensive unit tests for this {{ language }} code:

{{ code }}

Requirements:
- Use appropriate testing framework ({{ framework }})
- Cover edge cases and normal cases
- Include setup and teardown if needed
- Add clear test names and assertions
- Follow {{ language }} testing best practices

Return ONLY the test code without markdown formatting or explanations."#;

/// Registry of the prompt templates sent to the oracle.
///
/// Template names end in `.txt`, so Tera leaves code and user text unescaped.
pub struct Prompts {
    tera: Tera,
}

impl Prompts {
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (CODE_GEN, CODE_GEN_TEMPLATE),
            (COMPLEXITY, COMPLEXITY_TEMPLATE),
            (DOCS, DOCS_TEMPLATE),
            (TESTS, TESTS_TEMPLATE),
        ])?;
        Ok(Self { tera })
    }

    pub fn code_gen(&self, language: &str, query: &str) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("language", language);
        context.insert("query", query);
        self.tera.render(CODE_GEN, &context)
    }

    pub fn complexity(&self, language: &str, code: &str) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("language", language);
        context.insert("code", code);
        self.tera.render(COMPLEXITY, &context)
    }

    pub fn docs(&self, language: &str, code: &str, complexity: &str) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("language", language);
        context.insert("code", code);
        context.insert("complexity", complexity);
        self.tera.render(DOCS, &context)
    }

    pub fn tests(&self, language: &str, code: &str, framework: &str) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("language", language);
        context.insert("code", code);
        context.insert("framework", framework);
        self.tera.render(TESTS, &context)
    }
}
