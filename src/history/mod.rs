//! Chat history
//!
//! In-memory list of saved chats, mirrored to the backend's `/api/chats`
//! endpoints by the controller. Ordered pinned-first, then most recently
//! updated.

pub mod context;
pub mod titles;

use chrono::{DateTime, Duration, Utc};

use crate::types::chat::ChatRecord;

pub use context::{build_context, context_summary, conversation_stats, preview};
pub use titles::{generate_chat_id, generate_chat_title, smart_title};

/// Sidebar filter tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryFilter {
    #[default]
    All,
    Pinned,
    /// Updated within the last seven days
    Recent,
}

impl HistoryFilter {
    pub fn label(&self) -> &'static str {
        match self {
            HistoryFilter::All => "Todas",
            HistoryFilter::Pinned => "Fixadas",
            HistoryFilter::Recent => "Recentes",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatHistory {
    chats: Vec<ChatRecord>,
    current: Option<String>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list, e.g. after fetching it from the backend.
    ///
    /// The current selection survives if the chat is still present.
    pub fn replace_all(&mut self, chats: Vec<ChatRecord>) {
        self.chats = chats;
        self.sort();
        if let Some(id) = &self.current {
            if !self.chats.iter().any(|c| &c.id == id) {
                self.current = None;
            }
        }
    }

    /// Insert a chat or replace the one with the same id
    pub fn upsert(&mut self, chat: ChatRecord) {
        match self.chats.iter_mut().find(|c| c.id == chat.id) {
            Some(existing) => *existing = chat,
            None => self.chats.insert(0, chat),
        }
        self.sort();
    }

    pub fn remove(&mut self, id: &str) -> Option<ChatRecord> {
        let index = self.chats.iter().position(|c| c.id == id)?;
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        Some(self.chats.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&ChatRecord> {
        self.chats.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ChatRecord> {
        self.chats.iter_mut().find(|c| c.id == id)
    }

    /// Mark a chat as the open one. Returns false if it is unknown.
    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_some() {
            self.current = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&ChatRecord> {
        self.current.as_deref().and_then(|id| self.get(id))
    }

    pub fn rename(&mut self, id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(chat) => {
                chat.title = title.to_string();
                chat.needs_ai_title = false;
                true
            }
            None => false,
        }
    }

    /// Chats matching a search term and a filter tab, relative to `now`
    pub fn filter(&self, query: &str, filter: HistoryFilter, now: DateTime<Utc>) -> Vec<&ChatRecord> {
        let query = query.trim().to_lowercase();
        let week_ago = now - Duration::days(7);

        self.chats
            .iter()
            .filter(|chat| match filter {
                HistoryFilter::All => true,
                HistoryFilter::Pinned => chat.is_pinned,
                HistoryFilter::Recent => chat.updated_at > week_ago,
            })
            .filter(|chat| {
                query.is_empty()
                    || chat.title.to_lowercase().contains(&query)
                    || chat
                        .messages
                        .iter()
                        .any(|m| m.content.to_lowercase().contains(&query))
                    || chat.preview.as_ref().is_some_and(|p| {
                        p.first_user_message.to_lowercase().contains(&query)
                            || p.last_assistant_message.to_lowercase().contains(&query)
                    })
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatRecord> {
        self.chats.iter()
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    pub fn clear(&mut self) {
        self.chats.clear();
        self.current = None;
    }

    fn sort(&mut self) {
        self.chats.sort_by(|a, b| {
            b.is_pinned
                .cmp(&a.is_pinned)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
    }
}
