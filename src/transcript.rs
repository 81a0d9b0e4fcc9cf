use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::dialogue::{Dialogue, TranscriptValidator};
use crate::error::{BrainrotError, BrainrotResult};
use crate::llm::{DialogueRequester, build_prompt};

/// Bounded retries with a fixed pause between failed attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_secs(15),
        }
    }
}

#[cfg(test)]
impl RetryPolicy {
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: Duration::ZERO,
        }
    }
}

pub struct RetryingTranscriptGenerator {
    requester: Arc<dyn DialogueRequester>,
    policy: RetryPolicy,
    strict: bool,
}

impl RetryingTranscriptGenerator {
    pub fn new(requester: Arc<dyn DialogueRequester>, policy: RetryPolicy, strict: bool) -> Self {
        Self {
            requester,
            policy,
            strict,
        }
    }

    pub async fn generate(&self, topic: &str, agent_a: &str, agent_b: &str) -> BrainrotResult<Dialogue> {
        info!("Generating transcript on {:?} ({} / {})", topic, agent_a, agent_b);
        let prompt = build_prompt(topic, agent_a, agent_b);
        let validator = TranscriptValidator::new(agent_a, agent_b, self.strict);

        let mut attempts = 0;
        while attempts < self.policy.max_attempts {
            attempts += 1;
            info!("Attempt {}/{}", attempts, self.policy.max_attempts);

            let outcome = match self.requester.request(&prompt.system, &prompt.user).await {
                Ok(raw) => validator.validate(&raw),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(dialogue) => {
                    info!("Valid transcript with {} lines", dialogue.len());
                    for (i, turn) in dialogue.turns().iter().enumerate() {
                        debug!("{}. {}: {:?}", i + 1, turn.agent_id, turn.text);
                    }
                    return Ok(dialogue);
                }
                Err(e) => warn!("Attempt {} failed: {}", attempts, e),
            }

            if attempts < self.policy.max_attempts && !self.policy.backoff.is_zero() {
                info!("Waiting {:?} before next attempt", self.policy.backoff);
                tokio::time::sleep(self.policy.backoff).await;
            }
        }

        error!("All {} attempts failed for topic {:?}", attempts, topic);
        Err(BrainrotError::GenerationExhausted {
            topic: topic.to_string(),
            attempts,
        })
    }
}
