use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::manifest::ManifestFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SynthBackend {
    Elevenlabs,
    Piper,
}

#[derive(Parser, Debug)]
pub struct Args {
    #[clap(long)]
    pub topic: String,

    #[clap(long, default_value = "JOE_ROGAN")]
    pub agent_a: String,

    #[clap(long, default_value = "JORDAN_PETERSON")]
    pub agent_b: String,

    /// Track name under the music root, or NONE.
    #[clap(long, default_value = "NONE")]
    pub music: String,

    /// Job to report progress on. Ignored with --local.
    #[clap(long)]
    pub job_id: Option<String>,

    #[clap(long)]
    pub local: bool,

    #[clap(long, value_enum, default_value_t = SynthBackend::Elevenlabs)]
    pub synth: SynthBackend,

    #[clap(long, default_value = "./tts/en_US-hfc_male-medium.onnx")]
    pub piper_model: String,

    /// Piper executable, looked up on PATH unless given as a path.
    #[clap(long, default_value = "piper")]
    pub piper_bin: String,

    #[clap(long, env = "ELEVENLABS_BASE_URL", default_value = crate::tts::ELEVENLABS_BASE_URL)]
    pub elevenlabs_url: String,

    #[clap(long, value_enum, default_value_t = ManifestFormat::Json)]
    pub manifest_format: ManifestFormat,

    #[clap(long, default_value = "src/tmp/context.json")]
    pub manifest_out: PathBuf,

    #[clap(long, default_value = "public/voice")]
    pub voice_root: PathBuf,

    #[clap(long, default_value = "srt")]
    pub srt_root: String,

    #[clap(long, default_value = "/music")]
    pub music_root: String,

    #[clap(long, default_value_t = 5)]
    pub max_attempts: u32,

    #[clap(long, default_value_t = 15)]
    pub backoff_secs: u64,

    /// Only check that the response has a transcript array.
    #[clap(long)]
    pub lenient: bool,

    /// Abort the session when a status update fails.
    #[clap(long)]
    pub status_fail_fast: bool,

    #[clap(long, env = "STATUS_URL")]
    pub status_url: Option<String>,

    #[clap(long, env = "STATUS_API_TOKEN", hide_env_values = true)]
    pub status_token: Option<String>,

    #[clap(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: String,

    #[clap(long, env = "ELEVENLABS_API_KEY", hide_env_values = true)]
    pub elevenlabs_api_key: Option<String>,
}
