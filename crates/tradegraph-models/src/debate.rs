use std::fmt;

use serde::{Deserialize, Serialize};

/// Advocates in the investment debate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DebateSpeaker {
    Bull,
    Bear,
}

impl fmt::Display for DebateSpeaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bull => f.write_str("Bull Analyst"),
            Self::Bear => f.write_str("Bear Analyst"),
        }
    }
}

/// Risk-posture roles in the risk discussion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskSpeaker {
    Risky,
    Safe,
    Neutral,
}

impl fmt::Display for RiskSpeaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Risky => f.write_str("Risky Analyst"),
            Self::Safe => f.write_str("Safe Analyst"),
            Self::Neutral => f.write_str("Neutral Analyst"),
        }
    }
}

/// A debate or risk turn together with the role that spoke it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaggedResponse<S> {
    pub speaker: S,
    pub content: String,
}

impl<S: fmt::Display> TaggedResponse<S> {
    /// Rendered as `"<Speaker>: <content>"` for downstream prompts.
    pub fn tagged_text(&self) -> String {
        format!("{}: {}", self.speaker, self.content)
    }
}

/// Bull/Bear debate progress for one session.
///
/// `count == 0` implies `current_response` is `None`; the router rejects
/// states that break this.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DebateState {
    pub count: u32,
    pub current_response: Option<TaggedResponse<DebateSpeaker>>,
    pub history: Vec<TaggedResponse<DebateSpeaker>>,
    pub judge_decision: Option<String>,
}

impl DebateState {
    /// Record one completed debate turn.
    pub fn record_turn(&mut self, speaker: DebateSpeaker, content: impl Into<String>) {
        let response = TaggedResponse {
            speaker,
            content: content.into(),
        };
        self.history.push(response.clone());
        self.current_response = Some(response);
        self.count += 1;
    }

    pub fn current_speaker(&self) -> Option<DebateSpeaker> {
        self.current_response.as_ref().map(|r| r.speaker)
    }

    pub fn turns_by(&self, speaker: DebateSpeaker) -> impl Iterator<Item = &str> {
        self.history
            .iter()
            .filter(move |r| r.speaker == speaker)
            .map(|r| r.content.as_str())
    }
}

/// Risky/Safe/Neutral discussion progress for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskState {
    pub count: u32,
    pub latest_speaker: Option<RiskSpeaker>,
    pub history: Vec<TaggedResponse<RiskSpeaker>>,
    pub judge_decision: Option<String>,
}

impl RiskState {
    /// Record one completed risk-discussion turn.
    pub fn record_turn(&mut self, speaker: RiskSpeaker, content: impl Into<String>) {
        self.history.push(TaggedResponse {
            speaker,
            content: content.into(),
        });
        self.latest_speaker = Some(speaker);
        self.count += 1;
    }

    /// Most recent response from the given role, if it has spoken.
    pub fn latest_from(&self, speaker: RiskSpeaker) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|r| r.speaker == speaker)
            .map(|r| r.content.as_str())
    }
}
