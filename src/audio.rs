use hound::WavReader;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::{AssetLayout, VoiceResolver};
use crate::dialogue::Dialogue;
use crate::error::{BrainrotError, BrainrotResult};
use crate::tts::Synthesizer;

pub fn wav_duration_seconds(path: &Path) -> BrainrotResult<f64> {
    let reader = WavReader::open(path).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("unreadable wav {}: {e}", path.display()),
        )
    })?;
    let spec = reader.spec();
    let samples = reader.len();
    let frames = samples as f64 / spec.channels as f64;
    Ok(frames / spec.sample_rate as f64)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioDescriptor {
    pub speaker: String,
    pub file_path: PathBuf,
    pub index: usize,
}

pub struct AudioSynthesisPipeline {
    resolver: VoiceResolver,
    synthesizer: Arc<dyn Synthesizer>,
    layout: AssetLayout,
}

impl AudioSynthesisPipeline {
    pub fn new(resolver: VoiceResolver, synthesizer: Arc<dyn Synthesizer>, layout: AssetLayout) -> Self {
        Self {
            resolver,
            synthesizer,
            layout,
        }
    }

    /// Synthesizes turns one at a time, in dialogue order. The first failure
    /// aborts the run; files already written are left on disk.
    pub async fn synthesize(&self, dialogue: Dialogue) -> BrainrotResult<Vec<AudioDescriptor>> {
        let total = dialogue.len();
        let mut audios = Vec::with_capacity(total);

        for (index, turn) in dialogue.into_turns().into_iter().enumerate() {
            let voice_id = self.resolver.resolve(&turn.agent_id);
            info!(
                "Synthesizing turn {}/{} for {} (voice {})",
                index + 1,
                total,
                turn.agent_id,
                voice_id
            );

            if let Err(e) = self
                .synthesizer
                .synthesize(voice_id, &turn.agent_id, &turn.text, index)
                .await
            {
                error!("Synthesis failed on turn {}: {}", index, e);
                return Err(BrainrotError::Synthesis {
                    index,
                    speaker: turn.agent_id,
                    reason: e.to_string(),
                });
            }

            audios.push(AudioDescriptor {
                file_path: self.layout.audio_path(&turn.agent_id, index),
                speaker: turn.agent_id,
                index,
            });
        }

        Ok(audios)
    }
}
