use tracing::info;

use crate::audio::{AudioDescriptor, AudioSynthesisPipeline};
use crate::dialogue::Dialogue;
use crate::error::BrainrotResult;
use crate::manifest::{ManifestAssembler, SessionManifest};
use crate::status::{GENERATING_AUDIO, GENERATING_TRANSCRIPT, ProgressReporter};
use crate::transcript::RetryingTranscriptGenerator;

#[derive(Debug, Clone)]
pub struct SessionParams {
    pub topic: String,
    pub agent_a: String,
    pub agent_b: String,
    pub music: String,
}

#[derive(Debug)]
pub struct SessionOutput {
    pub dialogue: Dialogue,
    pub audios: Vec<AudioDescriptor>,
    pub manifest: SessionManifest,
}

pub struct Session {
    pub generator: RetryingTranscriptGenerator,
    pub pipeline: AudioSynthesisPipeline,
    pub assembler: ManifestAssembler,
    pub reporter: ProgressReporter,
}

impl Session {
    /// Transcript, then audio, then manifest. Any fatal error returns before
    /// the manifest is written.
    pub async fn run(&self, params: &SessionParams) -> BrainrotResult<SessionOutput> {
        self.reporter.checkpoint(GENERATING_TRANSCRIPT).await?;
        let dialogue = self
            .generator
            .generate(&params.topic, &params.agent_a, &params.agent_b)
            .await?;

        self.reporter.checkpoint(GENERATING_AUDIO).await?;
        let audios = self.pipeline.synthesize(dialogue.clone()).await?;
        info!("Synthesized {} audio files", audios.len());

        let manifest = self.assembler.assemble(&audios, &params.music)?;
        self.assembler.write(&manifest).await?;

        Ok(SessionOutput {
            dialogue,
            audios,
            manifest,
        })
    }
}
