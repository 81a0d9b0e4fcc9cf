use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BrainrotError, BrainrotResult};

pub const MIN_TURNS: usize = 2;
pub const MAX_TURNS: usize = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueTurn {
    pub agent_id: String,
    pub text: String,
}

/// A validated, ordered transcript. Only the validator builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialogue {
    turns: Vec<DialogueTurn>,
}

impl Dialogue {
    pub fn turns(&self) -> &[DialogueTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn into_turns(self) -> Vec<DialogueTurn> {
        self.turns
    }
}

/// Speaker ids end up in file names, so they must not be able to leave the
/// asset directories or break the manifest.
fn is_safe_agent_id(id: &str) -> bool {
    !id.trim().is_empty()
        && !id.contains("..")
        && !id.chars().any(|c| c == '/' || c == '\\' || c.is_control())
}

#[derive(Debug, Deserialize)]
struct TranscriptEnvelope {
    transcript: Option<Value>,
}

/// Checks raw backend output against the transcript schema.
///
/// Lenient mode only requires a `transcript` array of `{agentId, text}`
/// objects whose ids are safe to use in file names. Strict mode also rejects the whole dialogue when its length is
/// out of range, the opening speaker is not `agent_a`, a speaker is not one
/// of the pair, or a line is blank.
#[derive(Debug, Clone)]
pub struct TranscriptValidator {
    agent_a: String,
    agent_b: String,
    strict: bool,
}

impl TranscriptValidator {
    pub fn new(agent_a: impl Into<String>, agent_b: impl Into<String>, strict: bool) -> Self {
        Self {
            agent_a: agent_a.into(),
            agent_b: agent_b.into(),
            strict,
        }
    }

    pub fn validate(&self, raw: &str) -> BrainrotResult<Dialogue> {
        if raw.trim().is_empty() {
            return Err(BrainrotError::TranscriptParse("empty response".into()));
        }

        let envelope: TranscriptEnvelope = serde_json::from_str(raw)
            .map_err(|e| BrainrotError::TranscriptParse(format!("invalid JSON: {e}")))?;

        let turns = match envelope.transcript {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(BrainrotError::TranscriptParse(
                    "`transcript` is not an array".into(),
                ));
            }
            None => {
                return Err(BrainrotError::TranscriptParse(
                    "missing `transcript` field".into(),
                ));
            }
        };

        let turns: Vec<DialogueTurn> = turns
            .into_iter()
            .map(serde_json::from_value::<DialogueTurn>)
            .collect::<Result<_, _>>()
            .map_err(|e| BrainrotError::TranscriptParse(format!("malformed turn: {e}")))?;

        for (i, turn) in turns.iter().enumerate() {
            if !is_safe_agent_id(&turn.agent_id) {
                return Err(BrainrotError::TranscriptParse(format!(
                    "turn {i} has unusable speaker id {:?}",
                    turn.agent_id
                )));
            }
        }

        if self.strict {
            self.check_turns(&turns)?;
        }

        Ok(Dialogue { turns })
    }

    fn check_turns(&self, turns: &[DialogueTurn]) -> BrainrotResult<()> {
        if !(MIN_TURNS..=MAX_TURNS).contains(&turns.len()) {
            return Err(BrainrotError::TranscriptParse(format!(
                "expected {MIN_TURNS}..={MAX_TURNS} turns, got {}",
                turns.len()
            )));
        }
        if turns[0].agent_id != self.agent_a {
            return Err(BrainrotError::TranscriptParse(format!(
                "dialogue must open with {}, got {}",
                self.agent_a, turns[0].agent_id
            )));
        }
        for (i, turn) in turns.iter().enumerate() {
            if turn.agent_id != self.agent_a && turn.agent_id != self.agent_b {
                return Err(BrainrotError::TranscriptParse(format!(
                    "turn {i} has unexpected speaker {}",
                    turn.agent_id
                )));
            }
            if turn.text.trim().is_empty() {
                return Err(BrainrotError::TranscriptParse(format!("turn {i} has no text")));
            }
        }
        Ok(())
    }
}
