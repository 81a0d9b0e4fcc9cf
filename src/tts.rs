use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{error, info};

use crate::audio::wav_duration_seconds;
use crate::config::AssetLayout;
use crate::error::{BrainrotError, BrainrotResult};

pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";

/// Writes one turn's audio to `layout.audio_path(speaker, index)`.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(
        &self,
        voice_id: &str,
        speaker: &str,
        text: &str,
        index: usize,
    ) -> BrainrotResult<()>;
}

async fn prepare_output(layout: &AssetLayout) -> BrainrotResult<()> {
    tokio::fs::create_dir_all(&layout.voice_root).await?;
    Ok(())
}

pub struct ElevenLabsSynthesizer {
    api_key: String,
    base_url: String,
    model_id: String,
    layout: AssetLayout,
    http: reqwest::Client,
}

impl ElevenLabsSynthesizer {
    pub fn new(api_key: impl Into<String>, layout: AssetLayout) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: ELEVENLABS_BASE_URL.into(),
            model_id: "eleven_multilingual_v2".into(),
            layout,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Synthesizer for ElevenLabsSynthesizer {
    async fn synthesize(
        &self,
        voice_id: &str,
        speaker: &str,
        text: &str,
        index: usize,
    ) -> BrainrotResult<()> {
        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            voice_id
        );
        let resp = self
            .http
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("accept", "audio/mpeg")
            .json(&serde_json::json!({ "text": text, "model_id": self.model_id }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!("ElevenLabs rejected turn {} ({}): {}", index, status, body);
            return Err(BrainrotError::Request(format!(
                "ElevenLabs API error {}: {}",
                status, body
            )));
        }

        let audio = resp.bytes().await?;
        prepare_output(&self.layout).await?;
        let out = self.layout.audio_path(speaker, index);
        tokio::fs::write(&out, &audio).await?;
        info!("Wrote {} bytes to {}", audio.len(), out.display());
        Ok(())
    }
}

/// Local synthesis through the `piper` CLI. Voice ids are ignored; the
/// model decides the voice.
pub struct PiperSynthesizer {
    program: String,
    model: String,
    layout: AssetLayout,
}

impl PiperSynthesizer {
    pub fn new(model: impl Into<String>, layout: AssetLayout) -> Self {
        Self {
            program: "piper".into(),
            model: model.into(),
            layout,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl Synthesizer for PiperSynthesizer {
    async fn synthesize(
        &self,
        _voice_id: &str,
        speaker: &str,
        text: &str,
        index: usize,
    ) -> BrainrotResult<()> {
        prepare_output(&self.layout).await?;
        let out = self.layout.audio_path(speaker, index);

        let mut child = Command::new(&self.program)
            .arg("--model")
            .arg(&self.model)
            .arg("--output_file")
            .arg(&out)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            error!("Piper TTS command failed for {}", out.display());
            return Err(BrainrotError::Request(format!("piper exited with {status}")));
        }

        let dur = wav_duration_seconds(&out)?;
        info!("Turn {} duration: {:.2} seconds", index, dur);
        Ok(())
    }
}
