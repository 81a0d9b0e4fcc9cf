use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

use crate::error::{BrainrotError, BrainrotResult};

/// Personas with a dedicated voice. Each one is looked up as `<NAME>_VOICE_ID`.
pub const PERSONAS: [&str; 8] = [
    "JOE_ROGAN",
    "BARACK_OBAMA",
    "BEN_SHAPIRO",
    "DONALD_TRUMP",
    "JOE_BIDEN",
    "KAMALA_HARRIS",
    "ANDREW_TATE",
    "JORDAN_PETERSON",
];

const FALLBACK_PERSONA: &str = "JORDAN_PETERSON";

/// Immutable speaker -> voice id table, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceConfig {
    voices: HashMap<String, String>,
    default_voice: String,
}

impl VoiceConfig {
    pub fn new(voices: HashMap<String, String>, default_voice: impl Into<String>) -> Self {
        Self {
            voices,
            default_voice: default_voice.into(),
        }
    }

    pub fn from_env() -> BrainrotResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the table from any key/value source. `DEFAULT_VOICE_ID` wins over
    /// the fallback persona's voice.
    pub fn from_lookup<F>(lookup: F) -> BrainrotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut voices = HashMap::new();
        for persona in PERSONAS {
            match lookup(format!("{persona}_VOICE_ID").as_str()).filter(|v| !v.trim().is_empty()) {
                Some(id) => {
                    voices.insert(persona.to_string(), id);
                }
                None => warn!("No voice id configured for {}", persona),
            }
        }

        let default_voice = lookup("DEFAULT_VOICE_ID")
            .filter(|v| !v.trim().is_empty())
            .or_else(|| voices.get(FALLBACK_PERSONA).cloned())
            .ok_or_else(|| {
                BrainrotError::Config(format!(
                    "set DEFAULT_VOICE_ID or {FALLBACK_PERSONA}_VOICE_ID"
                ))
            })?;

        Ok(Self::new(voices, default_voice))
    }

    pub fn default_voice(&self) -> &str {
        &self.default_voice
    }
}

pub struct VoiceResolver {
    config: VoiceConfig,
}

impl VoiceResolver {
    pub fn new(config: VoiceConfig) -> Self {
        Self { config }
    }

    /// Unknown speakers get the default voice instead of an error.
    pub fn resolve(&self, speaker: &str) -> &str {
        match self.config.voices.get(speaker) {
            Some(id) => id,
            None => {
                warn!(
                    "Unknown speaker {}; using default voice {}",
                    speaker, self.config.default_voice
                );
                &self.config.default_voice
            }
        }
    }
}

/// Where session assets live. Audio and subtitle paths share the
/// `<speaker>-<index>` naming so the renderer can pair them.
#[derive(Debug, Clone)]
pub struct AssetLayout {
    pub voice_root: PathBuf,
    pub audio_ext: String,
    pub srt_root: String,
    pub music_root: String,
    pub background: String,
    pub mode: String,
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self {
            voice_root: PathBuf::from("public/voice"),
            audio_ext: "mp3".into(),
            srt_root: "srt".into(),
            music_root: "/music".into(),
            background: "/background/MINECRAFT-0.mp4".into(),
            mode: "brainrot".into(),
        }
    }
}

impl AssetLayout {
    pub fn audio_path(&self, speaker: &str, index: usize) -> PathBuf {
        self.voice_root
            .join(format!("{}-{}.{}", speaker, index, self.audio_ext))
    }

    pub fn subtitle_path(&self, speaker: &str, index: usize) -> String {
        format!("{}/{}-{}.srt", self.srt_root.trim_end_matches('/'), speaker, index)
    }

    pub fn music_path(&self, name: &str) -> String {
        format!("{}/{}.MP3", self.music_root.trim_end_matches('/'), name)
    }
}
