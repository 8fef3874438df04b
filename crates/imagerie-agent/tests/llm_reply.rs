mod common;

use common::ScriptedClient;
use imagerie_agent::prompts::FORMAT_REMINDER;
use imagerie_agent::{ask_llm, LlmReply};

#[tokio::test]
async fn test_retries_with_reminder_then_accepts() {
    let client = ScriptedClient::new(&[
        "Je recommanderais probablement une IRM.",
        "Recommandation: IRM cérébrale - non urgente",
    ]);

    let reply = ask_llm(&client, "PROMPT", 2).await.unwrap();

    assert_eq!(
        reply,
        LlmReply::Recommendation {
            text: "IRM cérébrale - non urgente".to_string()
        }
    );
    let prompts = client.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], "PROMPT");
    assert!(prompts[1].starts_with("PROMPT"));
    assert!(prompts[1].ends_with(FORMAT_REMINDER));
}

#[tokio::test]
async fn test_falls_back_to_canned_questions() {
    let client = ScriptedClient::new(&["bla", "", "toujours pas"]);

    let reply = ask_llm(&client, "PROMPT", 2).await.unwrap();

    assert_eq!(client.calls(), 3);
    assert_eq!(reply, LlmReply::fallback());
    let LlmReply::Clarify { questions } = reply else {
        panic!("fallback must clarify");
    };
    assert_eq!(questions.len(), 3);
}

#[tokio::test]
async fn test_zero_retries_means_single_call() {
    let client = ScriptedClient::new(&["bla"]);
    let reply = ask_llm(&client, "PROMPT", 0).await.unwrap();
    assert_eq!(client.calls(), 1);
    assert_eq!(reply, LlmReply::fallback());
}

#[tokio::test]
async fn test_transport_error_propagates() {
    let client = ScriptedClient::with_results(vec![Err("connection refused".to_string())]);
    let err = ask_llm(&client, "PROMPT", 2).await.unwrap_err();
    assert!(err.to_string().contains("connection refused"));
    assert_eq!(client.calls(), 1);
}
