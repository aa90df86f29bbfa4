use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use tempfile::{tempdir, NamedTempFile};

use chat_summarizer::config::{PluginConfig, SummarizerDefaults};
use chat_summarizer::host::{ChatMessage, MemoryNotifier, StaticChatContext, ToastLevel};
use chat_summarizer::providers::{CompletionResponse, GenerationOptions, Message, Provider};
use chat_summarizer::settings::{SettingsPersistence, SqliteSettingsStore};
use chat_summarizer::ui::{
    UiAction, UiEvent, ECHO_BUTTON, GET_LAST_MESSAGE_BUTTON, SUMMARIZE_BUTTON, SUMMARY_CHUNK_SIZE,
    SUMMARY_CHUNK_SIZE_VALUE, SUMMARY_INPUT, SUMMARY_OUTPUT, SUMMARY_PROMPT, SUMMARY_WORD_COUNT,
};
use chat_summarizer::{SettingsRecord, SettingsStore, SummarizerPlugin};

/// Answers each window with the number of messages it received
struct CountingProvider;

#[async_trait]
impl Provider for CountingProvider {
    async fn complete(
        &self,
        messages: &[Message],
        options: GenerationOptions,
    ) -> chat_summarizer::Result<CompletionResponse> {
        let body = messages[0].content.split("\n\n").filter(|p| p.starts_with("msg")).count();
        Ok(CompletionResponse::new(Message::assistant(format!(
            "{} messages (limit {:?})",
            body, options.response_length
        ))))
    }
}

fn fragment_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(include_str!("../assets/settings.html").as_bytes())
        .unwrap();
    file
}

fn plugin_with(
    fragment: &NamedTempFile,
    persistence: Arc<dyn SettingsPersistence>,
    chat: StaticChatContext,
    notifier: Arc<MemoryNotifier>,
) -> SummarizerPlugin {
    let config = PluginConfig {
        fragment_path: fragment.path().to_path_buf(),
        ..PluginConfig::default()
    };
    let store = SettingsStore::new(config.id.clone(), SummarizerDefaults::default(), persistence);
    SummarizerPlugin::new(
        config,
        store,
        Arc::new(CountingProvider),
        Arc::new(chat),
        notifier,
    )
}

fn messages(len: usize) -> Vec<ChatMessage> {
    (0..len)
        .map(|i| ChatMessage::from_speaker("Ava", i % 2 == 0, format!("msg {}", i)))
        .collect()
}

#[tokio::test]
async fn test_full_panel_session_persists_through_sqlite() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("settings.db");
    let fragment = fragment_file();

    {
        let persistence = Arc::new(SqliteSettingsStore::new_with_path(&db).unwrap());
        let plugin = plugin_with(
            &fragment,
            persistence,
            StaticChatContext::new(messages(7)),
            Arc::new(MemoryNotifier::new()),
        );

        let record = plugin.activate().await.unwrap();
        assert_eq!(record, SettingsRecord::default());

        let action = plugin
            .handle_event(UiEvent::input(SUMMARY_CHUNK_SIZE, "3"))
            .await
            .unwrap();
        assert_eq!(action, UiAction::SettingChanged(chat_summarizer::SettingsField::ChunkSize));
        plugin
            .handle_event(UiEvent::input(SUMMARY_PROMPT, "Recap ({{words}} words)"))
            .await
            .unwrap();
        plugin
            .handle_event(UiEvent::input(SUMMARY_WORD_COUNT, "60"))
            .await
            .unwrap();

        plugin
            .handle_event(UiEvent::click(SUMMARIZE_BUTTON))
            .await
            .unwrap();

        let panel = plugin.panel().unwrap();
        let expected = "3 messages (limit None)\n\n3 messages (limit None)\n\n1 messages (limit None)";
        assert_eq!(panel.value(SUMMARY_OUTPUT), Some(expected));
        plugin.shutdown().unwrap();
    }

    let persistence = Arc::new(SqliteSettingsStore::new_with_path(&db).unwrap());
    assert!(persistence.updated_at("chat-summarizer").unwrap().is_some());

    let plugin = plugin_with(
        &fragment,
        persistence,
        StaticChatContext::new(vec![]),
        Arc::new(MemoryNotifier::new()),
    );
    let record = plugin.activate().await.unwrap();

    assert_eq!(record.chunk_size, 3);
    assert_eq!(record.word_count, 60);
    assert_eq!(record.prompt, "Recap ({{words}} words)");
    assert!(record.summary.starts_with("3 messages"));

    let panel = plugin.panel().unwrap();
    assert_eq!(panel.value(SUMMARY_CHUNK_SIZE), Some("3"));
    assert_eq!(panel.value(SUMMARY_CHUNK_SIZE_VALUE), Some("3"));
    assert_eq!(panel.value(SUMMARY_OUTPUT), Some(record.summary.as_str()));
}

#[tokio::test]
async fn test_last_message_then_echo() {
    let dir = tempdir().unwrap();
    let fragment = fragment_file();
    let notifier = Arc::new(MemoryNotifier::new());
    let persistence = Arc::new(SqliteSettingsStore::new_with_path(dir.path().join("s.db")).unwrap());
    let plugin = plugin_with(
        &fragment,
        persistence,
        StaticChatContext::new(messages(4)),
        notifier.clone(),
    );
    plugin.activate().await.unwrap();

    plugin
        .handle_event(UiEvent::click(GET_LAST_MESSAGE_BUTTON))
        .await
        .unwrap();
    plugin
        .handle_event(UiEvent::click(ECHO_BUTTON))
        .await
        .unwrap();

    assert_eq!(plugin.panel().unwrap().value(SUMMARY_INPUT), Some("msg 3"));
    let infos = notifier.of_level(ToastLevel::Info);
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].message, "Summary: msg 3");
}

#[tokio::test]
async fn test_response_length_reaches_provider() {
    let dir = tempdir().unwrap();
    let fragment = fragment_file();
    let persistence = Arc::new(SqliteSettingsStore::new_with_path(dir.path().join("s.db")).unwrap());
    let plugin = plugin_with(
        &fragment,
        persistence,
        StaticChatContext::new(messages(2)),
        Arc::new(MemoryNotifier::new()),
    );
    plugin.activate().await.unwrap();
    plugin
        .set_setting(chat_summarizer::SettingsField::ResponseLength, "128")
        .unwrap();

    let report = plugin.summarize().await.unwrap();

    assert_eq!(report.summary.as_deref(), Some("2 messages (limit Some(128))"));
}

#[tokio::test]
async fn test_missing_container_aborts_activation() {
    let fragment = fragment_file();
    let config = PluginConfig {
        fragment_path: fragment.path().to_path_buf(),
        container_id: "no_such_panel".to_string(),
        ..PluginConfig::default()
    };
    let store = SettingsStore::new(
        config.id.clone(),
        SummarizerDefaults::default(),
        Arc::new(chat_summarizer::settings::MemorySettingsStore::new()),
    );
    let plugin = SummarizerPlugin::new(
        config,
        store,
        Arc::new(CountingProvider),
        Arc::new(StaticChatContext::new(vec![])),
        Arc::new(MemoryNotifier::new()),
    );

    let err = plugin.activate().await.unwrap_err();
    assert!(err.to_string().contains("#no_such_panel"));
}
