//! Prompt builder for the marking flow.
//!
//! The grading prompt is a plain-text template stored under
//! `config/prompts/`. Missing files are skipped so the built-in template can
//! stand in for a deployment that ships no prompt directory.
//!
//! Variable substitution uses `{{key}}` syntax and is applied once at
//! [`build()`](PromptBuilder::build) time, after all layers are joined.
//! Substitution is a single left-to-right pass: placeholder text inside a
//! substituted value is never expanded again.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const SEPARATOR: &str = "\n\n";

/// File name of the grading template inside the prompts directory.
pub const MARK_TEMPLATE_FILE: &str = "mark_answer.txt";

/// Built-in grading template, used when `mark_answer.txt` is absent.
pub const DEFAULT_MARK_TEMPLATE: &str = "\
You are a strict exam marker. Given the following:

- Question: {{question}}
- Markscheme: {{markscheme}}
- Max Marks: {{max_marks}}
- Student Answer: {{student_answer}}

Please:
1. Award marks out of the maximum.
2. Give concise feedback on what was correct or missing.

Respond in JSON format like:
{
  \"final_marks\": <int>,
  \"feedback\": \"<feedback text>\"
}";

/// Fluent builder that assembles a prompt from template files and fragments.
pub struct PromptBuilder {
    prompts_dir: PathBuf,
    parts: Vec<String>,
    vars: HashMap<String, String>,
}

impl PromptBuilder {
    /// Create a builder rooted at `prompts_dir` (e.g. `"config/prompts"`).
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
            parts: Vec::new(),
            vars: HashMap::new(),
        }
    }

    /// Append a layer by loading `filename` from the prompts directory.
    /// Silently skips the layer when the file does not exist.
    pub fn layer(mut self, filename: &str) -> Self {
        let path = self.prompts_dir.join(filename);
        match fs::read_to_string(&path) {
            Ok(text) => {
                let trimmed = text.trim().to_string();
                if !trimmed.is_empty() {
                    self.parts.push(trimmed);
                }
            }
            Err(_) => {
                tracing::debug!("prompt: layer '{}' not found, skipped", path.display());
            }
        }
        self
    }

    /// Append `filename` if it exists, otherwise `fallback`.
    pub fn layer_or(self, filename: &str, fallback: &str) -> Self {
        let before = self.parts.len();
        let builder = self.layer(filename);
        if builder.parts.len() == before {
            builder.append(fallback)
        } else {
            builder
        }
    }

    /// Directly append a text fragment (e.g. an already-loaded template body).
    pub fn append(mut self, text: impl Into<String>) -> Self {
        let s = text.into();
        let trimmed = s.trim().to_string();
        if !trimmed.is_empty() {
            self.parts.push(trimmed);
        }
        self
    }

    /// Register a single `{{key}}` → `value` substitution.
    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Join the layers without substituting. Used to cache a template.
    pub fn template(self) -> String {
        self.parts.join(SEPARATOR)
    }

    /// Assemble all layers, join with blank lines, and apply variable substitution.
    pub fn build(self) -> String {
        render(&self.parts.join(SEPARATOR), &self.vars)
    }
}

/// Substitute `{{key}}` placeholders in `template`.
///
/// Unknown keys are left in place verbatim.
pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match vars.get(key.trim()) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn prompts_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/prompts")
    }

    #[test]
    fn builder_skips_missing_file() {
        let result = PromptBuilder::new(prompts_dir())
            .layer("nonexistent_file_xyz.txt")
            .append("hello")
            .build();
        assert_eq!(result.trim(), "hello");
    }

    #[test]
    fn builder_substitutes_variable() {
        let result = PromptBuilder::new(prompts_dir())
            .append("Items: {{items}}")
            .var("items", "item1\nitem2")
            .build();
        assert!(result.contains("item1\nitem2"));
        assert!(!result.contains("{{items}}"));
    }

    #[test]
    fn substitution_is_single_pass() {
        let result = PromptBuilder::new(prompts_dir())
            .append("A: {{student_answer}} / M: {{markscheme}}")
            .var("student_answer", "ignore {{markscheme}}")
            .var("markscheme", "secret")
            .build();
        assert_eq!(result, "A: ignore {{markscheme}} / M: secret");
    }

    #[test]
    fn unknown_and_unterminated_placeholders_kept() {
        let vars = HashMap::from([("a".to_string(), "1".to_string())]);
        assert_eq!(render("{{a}} {{b}} {{c", &vars), "1 {{b}} {{c");
    }

    #[test]
    fn json_braces_survive() {
        let vars = HashMap::new();
        assert_eq!(render("{\n  \"x\": 1\n}", &vars), "{\n  \"x\": 1\n}");
    }

    #[test]
    fn layer_or_uses_fallback_when_missing() {
        let result = PromptBuilder::new("/nonexistent/prompts")
            .layer_or(MARK_TEMPLATE_FILE, "fallback {{x}}")
            .var("x", "ok")
            .build();
        assert_eq!(result, "fallback ok");
    }

    #[test]
    fn layer_or_prefers_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = fs::File::create(dir.path().join("t.txt")).unwrap();
        f.write_all(b"from file\n").unwrap();
        let result = PromptBuilder::new(dir.path()).layer_or("t.txt", "fallback").build();
        assert_eq!(result, "from file");
    }

    #[test]
    fn default_template_has_all_vars() {
        for var in ["{{question}}", "{{markscheme}}", "{{max_marks}}", "{{student_answer}}"] {
            assert!(DEFAULT_MARK_TEMPLATE.contains(var), "missing {var}");
        }
    }
}
