//! Tests for the shipped config and prompt files under config/

use std::fs;
use std::path::Path;

use exam_relay::config::{load_from, Overrides};
use exam_relay::llm::ProviderKind;
use exam_relay::subsystems::relay::prompt::{PromptBuilder, MARK_TEMPLATE_FILE};

#[test]
fn test_mark_prompt_file_exists() {
    let path = "config/prompts/mark_answer.txt";
    assert!(fs::metadata(path).is_ok(), "mark_answer.txt prompt file missing");
}

#[test]
fn test_mark_prompt_template_vars() {
    let text = fs::read_to_string("config/prompts/mark_answer.txt").unwrap();
    for var in ["{{question}}", "{{markscheme}}", "{{max_marks}}", "{{student_answer}}"] {
        assert!(text.contains(var), "mark_answer.txt should contain {var} variable");
    }
    assert!(text.contains("\"final_marks\""), "mark_answer.txt should ask for final_marks");
    assert!(text.contains("\"feedback\""), "mark_answer.txt should ask for feedback");
}

#[test]
fn test_mark_prompt_renders_from_directory() {
    let prompt = PromptBuilder::new("config/prompts")
        .layer(MARK_TEMPLATE_FILE)
        .var("question", "Define force.")
        .var("markscheme", "F = ma")
        .var("max_marks", "3")
        .var("student_answer", "A push or a pull.")
        .build();
    assert!(prompt.contains("- Question: Define force."));
    assert!(prompt.contains("- Max Marks: 3"));
    assert!(!prompt.contains("{{"));
}

#[test]
fn test_default_config_parses() {
    let cfg = load_from(Path::new("config/default.toml"), &Overrides::default()).unwrap();
    assert_eq!(cfg.server.bind, "127.0.0.1:8000");
    assert_eq!(cfg.gemini.model, "gemini-2.0-flash");
    assert_eq!(cfg.openai.model, "gpt-4o");
    assert_eq!(cfg.marking.default_provider, ProviderKind::OpenAi);
    assert_eq!(cfg.marking.system_prompt, "You are a strict exam marker.");
}
