//! The human-readable log stream shown beside the nation table.

use std::collections::VecDeque;
use std::fmt;

use bevy_ecs::prelude::Resource;
use colored::Color;
use serde::{Deserialize, Serialize};

use crate::simulation::GameDate;
use crate::simulation::constants::MAX_LOG_ENTRIES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    System,
    Era,
    Policy,
    Budget,
    Diplomacy,
    War,
    Occupation,
    Rejection,
    GameOver,
}

impl LogCategory {
    pub fn label(&self) -> &'static str {
        match self {
            LogCategory::System => "System",
            LogCategory::Era => "Era",
            LogCategory::Policy => "Policy",
            LogCategory::Budget => "Budget",
            LogCategory::Diplomacy => "Diplomacy",
            LogCategory::War => "War",
            LogCategory::Occupation => "Occupation",
            LogCategory::Rejection => "Rejected",
            LogCategory::GameOver => "Game Over",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            LogCategory::System => Color::BrightWhite,
            LogCategory::Era => Color::BrightBlue,
            LogCategory::Policy => Color::BrightCyan,
            LogCategory::Budget => Color::Yellow,
            LogCategory::Diplomacy => Color::BrightGreen,
            LogCategory::War => Color::Red,
            LogCategory::Occupation => Color::BrightMagenta,
            LogCategory::Rejection => Color::BrightBlack,
            LogCategory::GameOver => Color::BrightRed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub category: LogCategory,
    pub date: Option<GameDate>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.date {
            Some(date) => write!(f, "[{}] {}", date, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Capped, newest-first log plus the current status headline.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct GameLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    /// Entries not yet printed by the log pulse.
    #[serde(skip)]
    fresh: Vec<LogEntry>,
    status_message: String,
}

impl GameLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            fresh: Vec::new(),
            status_message: String::new(),
        }
    }

    pub fn push(&mut self, category: LogCategory, date: Option<&GameDate>, message: impl Into<String>) {
        let entry = LogEntry {
            category,
            date: date.cloned(),
            message: message.into(),
        };
        self.entries.push_front(entry.clone());
        self.entries.truncate(self.capacity);
        self.fresh.push(entry);
    }

    /// Logs `message` and makes it the status headline.
    pub fn headline(&mut self, category: LogCategory, date: Option<&GameDate>, message: impl Into<String>) {
        let message = message.into();
        self.status_message = message.clone();
        self.push(category, date, message);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn lines(&self, limit: usize) -> Vec<String> {
        self.entries.iter().take(limit).map(ToString::to_string).collect()
    }

    pub fn drain_fresh(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.fresh)
    }
}

impl Default for GameLog {
    fn default() -> Self {
        Self::new(MAX_LOG_ENTRIES)
    }
}
