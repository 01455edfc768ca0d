//! Chat ids and titles

use chrono::Utc;
use uuid::Uuid;

use crate::types::chat::DEFAULT_TITLE;

const TITLE_MAX_CHARS: usize = 50;
const SMART_TITLE_MAX_CHARS: usize = 40;
/// Words that select a title pattern and so never serve as its keyword
const TRIGGER_WORDS: [&str; 3] = ["como", "ajuda", "explique"];

/// Generate a chat id of the form `chat_<unix millis>_<6 chars>`
pub fn generate_chat_id() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(6).collect();
    format!("chat_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Quick title from the first user message.
///
/// Takes the first 50 characters, marks truncation with `...`, and drops
/// anything that is not alphanumeric, whitespace or `-_.,!?`.
pub fn generate_chat_title(first_message: &str) -> String {
    let first_message = first_message.trim();
    if first_message.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    let mut title: String = first_message.chars().take(TITLE_MAX_CHARS).collect();
    if first_message.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }

    let title: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || "-_.,!?".contains(*c))
        .collect();
    let title = title.trim();

    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title.to_string()
    }
}

/// Keyword-based title for a new chat.
///
/// Recognises a few Portuguese question shapes ("como", "o que", "por que",
/// "ajuda", "explique") and otherwise joins the first two keywords. Falls
/// back to [`generate_chat_title`] for short or keyword-less messages.
pub fn smart_title(first_message: &str) -> String {
    if first_message.chars().count() < 10 {
        return generate_chat_title(first_message);
    }

    let lowered = first_message.to_lowercase();
    let normalized: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect();
    let keywords: Vec<&str> = normalized
        .split_whitespace()
        .filter(|w| w.chars().count() > 3 && !TRIGGER_WORDS.contains(w))
        .take(5)
        .collect();

    let Some(first) = keywords.first() else {
        return generate_chat_title(first_message);
    };

    let title = if lowered.contains("como ") {
        format!("Como {first}")
    } else if lowered.contains("o que ") {
        format!("Sobre {first}")
    } else if lowered.contains("por que ") {
        format!("Por que {first}")
    } else if lowered.contains("ajuda") {
        format!("Ajuda com {first}")
    } else if lowered.contains("explique") {
        format!("Explicação {first}")
    } else {
        let mut title = capitalize(first);
        if let Some(second) = keywords.get(1) {
            title.push_str(" e ");
            title.push_str(second);
        }
        title
    };

    let title: String = title
        .chars()
        .take(SMART_TITLE_MAX_CHARS)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();
    let title = title.trim();

    if title.is_empty() {
        generate_chat_title(first_message)
    } else {
        title.to_string()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
