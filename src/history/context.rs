//! Conversation summaries for the context viewer and sidebar previews

use crate::truncate_chars;
use crate::types::chat::{ChatContext, ChatPreview, ChatRecord, ConversationStats};
use crate::types::message::{ChatMessage, Role};

const PREVIEW_MAX_CHARS: usize = 100;

/// Short description of what a conversation is about.
///
/// Collects the first five words of the first three user messages and keeps
/// up to five purely alphabetic ones longer than three characters.
pub fn context_summary(messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return "Conversa vazia".to_string();
    }

    let topics: Vec<String> = messages
        .iter()
        .filter(|m| m.role == Role::User)
        .take(3)
        .flat_map(|m| {
            m.content
                .to_lowercase()
                .split_whitespace()
                .take(5)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|w| w.chars().count() > 3 && w.chars().all(char::is_alphabetic))
        .take(5)
        .collect();

    if !topics.is_empty() {
        return format!("Tópicos: {}", topics.join(", "));
    }

    let first = truncate_chars(&messages[0].content, 50);
    if first.is_empty() {
        "Conversa sem contexto claro".to_string()
    } else {
        format!("Início: {first}...")
    }
}

pub fn conversation_stats(messages: &[ChatMessage]) -> ConversationStats {
    ConversationStats {
        total_messages: messages.len(),
        user_messages: messages.iter().filter(|m| m.role == Role::User).count(),
        assistant_messages: messages.iter().filter(|m| m.role == Role::Assistant).count(),
        has_thinking: messages
            .iter()
            .any(|m| m.role == Role::Assistant && m.has_thinking()),
    }
}

/// Sidebar preview computed from a loaded record
pub fn preview(record: &ChatRecord) -> ChatPreview {
    let first_user = record
        .messages
        .iter()
        .find(|m| m.role == Role::User)
        .map(|m| truncate_chars(&m.content, PREVIEW_MAX_CHARS).to_string())
        .unwrap_or_default();
    let last_assistant = record
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant)
        .map(|m| truncate_chars(&m.content, PREVIEW_MAX_CHARS).to_string())
        .unwrap_or_default();

    ChatPreview {
        first_user_message: first_user,
        last_assistant_message: last_assistant,
        message_count: record.messages.len(),
        has_thinking: record.thinking_mode || conversation_stats(&record.messages).has_thinking,
    }
}

/// Context of a chat whose messages are loaded locally
pub fn build_context(record: &ChatRecord) -> ChatContext {
    ChatContext {
        chat_id: record.id.clone(),
        title: record.title.clone(),
        messages: record.messages.clone(),
        created_at: Some(record.created_at),
        updated_at: Some(record.updated_at),
        thinking_enabled: record.thinking_mode,
        context_summary: context_summary(&record.messages),
        conversation_stats: conversation_stats(&record.messages),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant(content: &str, thinking: Option<&str>) -> ChatMessage {
        let mut msg = ChatMessage::new(Role::Assistant, content);
        msg.thinking = thinking.map(str::to_string);
        msg
    }

    #[test]
    fn test_summary_of_empty_conversation() {
        assert_eq!(context_summary(&[]), "Conversa vazia");
    }

    #[test]
    fn test_summary_collects_topics() {
        let messages = vec![
            ChatMessage::user("Quero aprender Rust hoje"),
            assistant("Claro!", None),
            ChatMessage::user("monads são difíceis"),
        ];
        assert_eq!(
            context_summary(&messages),
            "Tópicos: quero, aprender, rust, hoje, monads"
        );
    }

    #[test]
    fn test_summary_falls_back_to_first_message() {
        let messages = vec![ChatMessage::user("2+2=? ok")];
        assert_eq!(context_summary(&messages), "Início: 2+2=? ok...");

        let messages = vec![ChatMessage::user("")];
        assert_eq!(context_summary(&messages), "Conversa sem contexto claro");
    }

    #[test]
    fn test_stats_and_preview() {
        let mut record = ChatRecord::new("c", "T");
        record.messages = vec![
            ChatMessage::user("first question"),
            assistant("first answer", Some("reasoning")),
            ChatMessage::user("second"),
            assistant(&"x".repeat(150), None),
        ];

        let stats = conversation_stats(&record.messages);
        assert_eq!(stats.total_messages, 4);
        assert_eq!(stats.user_messages, 2);
        assert_eq!(stats.assistant_messages, 2);
        assert!(stats.has_thinking);

        let preview = preview(&record);
        assert_eq!(preview.first_user_message, "first question");
        assert_eq!(preview.last_assistant_message.chars().count(), 100);
        assert_eq!(preview.message_count, 4);
        assert!(preview.has_thinking);

        let context = build_context(&record);
        assert_eq!(context.chat_id, "c");
        assert_eq!(context.conversation_stats, stats);
        assert_eq!(context.context_summary, "Tópicos: first, question, second");
    }
}
