mod args;
mod audio;
mod config;
mod dialogue;
mod error;
mod llm;
mod manifest;
mod session;
mod status;
mod transcript;
mod tts;

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::{Args, SynthBackend};
use crate::audio::AudioSynthesisPipeline;
use crate::config::{AssetLayout, VoiceConfig, VoiceResolver};
use crate::llm::{GroqConfig, GroqRequester};
use crate::manifest::{FsOutput, ManifestAssembler};
use crate::session::{Session, SessionParams};
use crate::status::{HttpStatusStore, ProgressReporter, StatusPolicy};
use crate::transcript::{RetryPolicy, RetryingTranscriptGenerator};
use crate::tts::{ElevenLabsSynthesizer, PiperSynthesizer, Synthesizer};

/// Progress goes to the status endpoint only for a non-local run that names a job.
fn reporter_for(args: &Args) -> ProgressReporter {
    match (&args.job_id, &args.status_url) {
        (Some(job_id), Some(url)) if !args.local => {
            let status_policy = if args.status_fail_fast {
                StatusPolicy::FailFast
            } else {
                StatusPolicy::BestEffort
            };
            let store = Arc::new(HttpStatusStore::new(url.clone(), args.status_token.clone()));
            ProgressReporter::new(store, job_id.clone(), status_policy)
        }
        (Some(_), None) if !args.local => {
            warn!("--job-id given without STATUS_URL; progress will not be reported");
            ProgressReporter::disabled()
        }
        _ => ProgressReporter::disabled(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    info!("Starting dialogue session on {:?}", args.topic);

    let layout = AssetLayout {
        voice_root: args.voice_root.clone(),
        audio_ext: match args.synth {
            SynthBackend::Elevenlabs => "mp3".into(),
            SynthBackend::Piper => "wav".into(),
        },
        srt_root: args.srt_root.clone(),
        music_root: args.music_root.clone(),
        ..AssetLayout::default()
    };

    let voices = VoiceConfig::from_env().context("loading voice ids")?;
    info!("Default voice: {}", voices.default_voice());

    let synthesizer: Arc<dyn Synthesizer> = match args.synth {
        SynthBackend::Elevenlabs => {
            let key = args
                .elevenlabs_api_key
                .clone()
                .context("ELEVENLABS_API_KEY is required for the elevenlabs backend")?;
            Arc::new(ElevenLabsSynthesizer::new(key, layout.clone()).with_base_url(args.elevenlabs_url.clone()))
        }
        SynthBackend::Piper => Arc::new(
            PiperSynthesizer::new(args.piper_model.clone(), layout.clone()).with_program(args.piper_bin.clone()),
        ),
    };

    let policy = RetryPolicy {
        max_attempts: args.max_attempts,
        backoff: Duration::from_secs(args.backoff_secs),
    };
    let requester = Arc::new(GroqRequester::new(GroqConfig::new(args.groq_api_key.clone())));

    let reporter = reporter_for(&args);
    if reporter.is_enabled() {
        info!("Reporting progress for job {:?}", args.job_id);
    }

    let session = Session {
        generator: RetryingTranscriptGenerator::new(requester, policy, !args.lenient),
        pipeline: AudioSynthesisPipeline::new(VoiceResolver::new(voices), synthesizer, layout.clone()),
        assembler: ManifestAssembler::new(
            layout,
            Arc::new(FsOutput),
            args.manifest_format,
            args.manifest_out.clone(),
        ),
        reporter,
    };

    let params = SessionParams {
        topic: args.topic.clone(),
        agent_a: args.agent_a.clone(),
        agent_b: args.agent_b.clone(),
        music: args.music.clone(),
    };

    match session.run(&params).await {
        Ok(out) => {
            info!(
                "Session complete: {} turns, {} audio files, opened by {}, manifest at {}",
                out.dialogue.len(),
                out.audios.len(),
                out.manifest.initial_agent_name,
                args.manifest_out.display()
            );
            Ok(())
        }
        Err(e) => {
            error!("Session failed: {}", e);
            Err(e).context(format!("dialogue session on {:?}", args.topic))
        }
    }
}
