use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chat_summarizer::config::OllamaConfig;
use chat_summarizer::host::{ChatMessage, MemoryNotifier, ToastLevel};
use chat_summarizer::providers::{
    CompletionResponse, GenerationOptions, Message, OllamaProvider, Provider,
};
use chat_summarizer::summarizer::{ChatSummarizer, ChunkOutcome};

fn chat(len: usize) -> Vec<ChatMessage> {
    (0..len).map(|i| ChatMessage::new(format!("m{}", i))).collect()
}

/// Records prompts and answers with the prompt's first line
#[derive(Default)]
struct RecordingProvider {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl Provider for RecordingProvider {
    async fn complete(
        &self,
        messages: &[Message],
        _options: GenerationOptions,
    ) -> chat_summarizer::Result<CompletionResponse> {
        let prompt = messages[0].content.clone();
        let first = prompt.lines().next().unwrap_or_default().to_string();
        self.prompts.lock().unwrap().push(prompt);
        Ok(CompletionResponse::new(Message::assistant(first)))
    }
}

#[tokio::test]
async fn test_window_count_and_coverage() {
    for len in 0..=12usize {
        for chunk_size in 1..=5u32 {
            let provider = Arc::new(RecordingProvider::default());
            let summarizer =
                ChatSummarizer::new(provider.clone(), Arc::new(MemoryNotifier::new()));

            let report = summarizer.summarize(&chat(len), chunk_size, "").await.unwrap();

            let size = chunk_size as usize;
            let expected_calls = len.div_ceil(size);
            assert_eq!(report.generator_calls(), expected_calls, "L={} C={}", len, size);

            let prompts = provider.prompts.lock().unwrap().clone();
            for (i, prompt) in prompts.iter().enumerate() {
                let expected: Vec<String> = (i * size..((i + 1) * size).min(len))
                    .map(|n| format!("m{}", n))
                    .collect();
                assert_eq!(prompt, &expected.join("\n\n"), "L={} C={} window {}", len, size, i);
            }
        }
    }
}

#[tokio::test]
async fn test_zero_chunk_size_is_treated_as_one() {
    let provider = Arc::new(RecordingProvider::default());
    let summarizer = ChatSummarizer::new(provider.clone(), Arc::new(MemoryNotifier::new()));

    let report = summarizer.summarize(&chat(3), 0, "").await.unwrap();

    assert_eq!(report.generator_calls(), 3);
    assert_eq!(report.summary.as_deref(), Some("m0\n\nm1\n\nm2"));
}

#[tokio::test]
async fn test_ollama_failure_in_middle_window_is_skipped() {
    let server = MockServer::start().await;

    for (content, reply) in [("m0\n\nm1", "one"), ("m4", "three")] {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "messages": [{ "role": "user", "content": content }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": { "role": "assistant", "content": reply },
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "messages": [{ "role": "user", "content": "m2\n\nm3" }]
        })))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(OllamaConfig {
        host: server.uri(),
        model: "llama3.2:latest".to_string(),
    })
    .unwrap();
    let notifier = Arc::new(MemoryNotifier::new());
    let summarizer = ChatSummarizer::new(Arc::new(provider), notifier.clone());

    let report = summarizer.summarize(&chat(5), 2, "").await.unwrap();

    assert_eq!(report.summary.as_deref(), Some("one\n\nthree"));
    assert!(matches!(report.outcomes[1], ChunkOutcome::Failed(_)));

    let errors = notifier.of_level(ToastLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.starts_with("Chunk 2 of 3 failed"));
}
