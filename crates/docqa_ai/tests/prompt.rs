use docqa_ai::prompt::build_prompt;
use pretty_assertions::assert_eq;

fn context_portion(prompt: &str) -> &str {
    let start = prompt.find("Context:\n").expect("context header") + "Context:\n".len();
    let end = prompt.rfind("\n\nQuestion: ").expect("question header");
    &prompt[start..end]
}

#[test]
fn preamble_then_document_then_question() {
    let p = build_prompt(
        "The refund policy allows returns within 30 days.",
        "What is the refund policy?",
        1000,
    );
    let preamble = p.text.find("Rules:").expect("preamble");
    let doc = p.text.find("The refund policy allows").expect("document");
    let question = p.text.find("Question: What is the refund policy?").expect("question");
    assert!(preamble < doc && doc < question);
    assert!(p.text.trim_end().ends_with("short phrase):"));
    assert!(!p.truncated);
    assert_eq!(p.context_chars, 48);
}

#[test]
fn document_portion_never_exceeds_the_limit() {
    let text = "Ünïcödé text with emoji 🚀 and more. ".repeat(40);
    let total = text.chars().count();
    for limit in [0, 1, 7, 25, 100, total - 1, total, total + 10] {
        let p = build_prompt(&text, "q", limit);
        let portion = context_portion(&p.text);
        assert!(portion.chars().count() <= limit, "limit={limit}");
        assert_eq!(portion.chars().count(), p.context_chars);
        assert_eq!(p.truncated, total > limit);
        assert!(text.starts_with(portion));
    }
}

#[test]
fn building_is_deterministic() {
    let a = build_prompt("doc", "  question?  ", 10);
    let b = build_prompt("doc", "question?", 10);
    assert_eq!(a, b);
}
