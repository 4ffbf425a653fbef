use crate::instructions;
use crate::techniques::Technique;
use muse_agent::RunContext;
use muse_core::{Message, Role, SessionId, Timestamp};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    pub at: Timestamp,
}

/// Everything one brainstorming session remembers.
///
/// History and ideas only ever grow. The topic is overwritten by each
/// `set_topic`. A session is owned by the loop driving it and lent out by
/// `&mut` to one turn at a time.
#[derive(Debug)]
pub struct SessionContext {
    id: SessionId,
    started_at: Timestamp,
    history: Vec<HistoryEntry>,
    topic: Option<String>,
    ideas: Vec<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            started_at: Timestamp::now(),
            history: Vec::new(),
            topic: None,
            ideas: Vec::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn ideas(&self) -> &[String] {
        &self.ideas
    }

    pub fn append_message(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(HistoryEntry {
            role,
            content: content.into(),
            at: Timestamp::now(),
        });
    }

    pub fn record_idea(&mut self, idea: impl Into<String>) -> String {
        let idea = idea.into();
        let reply = format!("Idea recorded: {}", idea);
        self.ideas.push(idea);
        debug!(session = %self.id, ideas = self.ideas.len(), "Recorded idea");
        reply
    }

    pub fn summarize_ideas(&self) -> String {
        if self.ideas.is_empty() {
            return "No ideas have been recorded yet. Let's keep brainstorming!".to_string();
        }

        let mut out = format!(
            "Here's a summary of the {} ideas we've discussed so far:",
            self.ideas.len()
        );
        for (i, idea) in self.ideas.iter().enumerate() {
            out.push_str(&format!("\n{}. {}", i + 1, idea));
        }
        out
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) -> String {
        let topic = topic.into();
        let reply = format!("Topic set to: {}", topic);
        debug!(session = %self.id, topic = %topic, "Set topic");
        self.topic = Some(topic);
        reply
    }

    pub fn suggest_technique(&self, stuck_level: i64) -> String {
        let technique = Technique::for_stuck_level(stuck_level);
        match &self.topic {
            Some(topic) => format!("For your topic '{}', you might try: {}", topic, technique),
            None => format!("For the topic at hand, you might try: {}", technique),
        }
    }

    pub fn render_instructions(&self) -> String {
        instructions::compose(self.topic(), &self.ideas)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RunContext for SessionContext {
    fn history(&self) -> Vec<Message> {
        self.history
            .iter()
            .map(|entry| Message::text(entry.role, &entry.content))
            .collect()
    }
}
