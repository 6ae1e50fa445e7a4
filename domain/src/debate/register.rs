//! Adaptive vocabulary register.
//!
//! Derived from the human participant's average message length across the
//! session. A heuristic only: long messages suggest a participant who wants
//! technical depth, short ones suggest plain language.

use super::message::DebateMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRegister {
    #[default]
    General,
    Informed,
    Expert,
}

impl UserRegister {
    /// Average word count above which the user is treated as informed.
    pub const INFORMED_WORDS: usize = 15;
    /// Average word count above which the user is treated as an expert.
    pub const EXPERT_WORDS: usize = 40;

    /// Classify from the whole transcript (only user messages count).
    pub fn detect(transcript: &[DebateMessage]) -> Self {
        let (count, words) = transcript
            .iter()
            .filter(|m| m.speaker.is_user())
            .fold((0usize, 0usize), |(c, w), m| (c + 1, w + m.word_count()));
        if count == 0 {
            return UserRegister::General;
        }
        let avg = (words as f64 / count as f64).round() as usize;
        Self::from_average_words(avg)
    }

    pub fn from_average_words(avg: usize) -> Self {
        if avg > Self::EXPERT_WORDS {
            UserRegister::Expert
        } else if avg > Self::INFORMED_WORDS {
            UserRegister::Informed
        } else {
            UserRegister::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRegister::General => "general",
            UserRegister::Informed => "informed",
            UserRegister::Expert => "expert",
        }
    }
}

impl std::fmt::Display for UserRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::message::{MessageId, Speaker};

    fn user(words: usize) -> DebateMessage {
        DebateMessage::from_user(MessageId(0), vec!["word"; words].join(" "))
    }

    #[test]
    fn test_no_user_messages_is_general() {
        let node = DebateMessage::new(MessageId(1), Speaker::Node("a".into()), "x ".repeat(100));
        assert_eq!(UserRegister::detect(&[node]), UserRegister::General);
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(UserRegister::from_average_words(15), UserRegister::General);
        assert_eq!(UserRegister::from_average_words(16), UserRegister::Informed);
        assert_eq!(UserRegister::from_average_words(40), UserRegister::Informed);
        assert_eq!(UserRegister::from_average_words(41), UserRegister::Expert);
    }

    #[test]
    fn test_average_across_session() {
        let transcript = vec![user(10), user(30)];
        assert_eq!(UserRegister::detect(&transcript), UserRegister::Informed);
        let transcript = vec![user(60), user(50)];
        assert_eq!(UserRegister::detect(&transcript), UserRegister::Expert);
    }
}
