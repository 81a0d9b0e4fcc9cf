use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::audio::AudioDescriptor;
use crate::config::AssetLayout;
use crate::error::{BrainrotError, BrainrotResult};

pub const NO_MUSIC: &str = "NONE";

#[async_trait]
pub trait FileOutput: Send + Sync {
    async fn write(&self, path: &Path, content: &str) -> BrainrotResult<()>;
}

pub struct FsOutput;

#[async_trait]
impl FileOutput for FsOutput {
    async fn write(&self, path: &Path, content: &str) -> BrainrotResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleRef {
    pub name: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionManifest {
    pub music: String,
    pub initial_agent_name: String,
    pub video_file_name: String,
    pub video_mode: String,
    pub subtitles_file_name: Vec<SubtitleRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ManifestFormat {
    /// Plain JSON document.
    #[default]
    Json,
    /// Remotion `context.tsx` module.
    Tsx,
}

impl ManifestFormat {
    pub fn render(self, manifest: &SessionManifest) -> BrainrotResult<String> {
        match self {
            ManifestFormat::Json => Ok(serde_json::to_string_pretty(manifest)?),
            ManifestFormat::Tsx => render_context_module(manifest),
        }
    }
}

/// A JSON string literal is also a valid TS string literal, escapes included.
fn ts_string(s: &str) -> BrainrotResult<String> {
    Ok(serde_json::to_string(s)?)
}

/// Renders the manifest as the declarative module the renderer imports.
pub fn render_context_module(manifest: &SessionManifest) -> BrainrotResult<String> {
    let subtitles = manifest
        .subtitles_file_name
        .iter()
        .map(|s| {
            Ok(format!(
                "{{\n    name: {},\n    file: staticFile({}),\n  }}",
                ts_string(&s.name)?,
                ts_string(&s.file)?
            ))
        })
        .collect::<BrainrotResult<Vec<_>>>()?
        .join(",\n  ");

    Ok(format!(
        "import {{ staticFile }} from 'remotion';\n\n\
         export const music: string = {};\n\
         export const initialAgentName = {};\n\
         export const videoFileName = {};\n\
         export const videoMode = {};\n\n\
         export const subtitlesFileName = [\n  {}\n];\n",
        ts_string(&manifest.music)?,
        ts_string(&manifest.initial_agent_name)?,
        ts_string(&manifest.video_file_name)?,
        ts_string(&manifest.video_mode)?,
        subtitles
    ))
}

pub struct ManifestAssembler {
    layout: AssetLayout,
    output: Arc<dyn FileOutput>,
    format: ManifestFormat,
    path: PathBuf,
}

impl ManifestAssembler {
    pub fn new(layout: AssetLayout, output: Arc<dyn FileOutput>, format: ManifestFormat, path: PathBuf) -> Self {
        Self {
            layout,
            output,
            format,
            path,
        }
    }

    pub fn assemble(&self, audios: &[AudioDescriptor], music: &str) -> BrainrotResult<SessionManifest> {
        let first = audios.first().ok_or(BrainrotError::EmptyDialogue)?;

        let music = if music == NO_MUSIC {
            NO_MUSIC.to_string()
        } else {
            self.layout.music_path(music)
        };

        let subtitles_file_name = audios
            .iter()
            .map(|a| SubtitleRef {
                name: a.speaker.clone(),
                file: self.layout.subtitle_path(&a.speaker, a.index),
            })
            .collect();

        Ok(SessionManifest {
            music,
            initial_agent_name: first.speaker.clone(),
            video_file_name: self.layout.background.clone(),
            video_mode: self.layout.mode.clone(),
            subtitles_file_name,
        })
    }

    pub async fn write(&self, manifest: &SessionManifest) -> BrainrotResult<()> {
        let content = self.format.render(manifest)?;
        self.output.write(&self.path, &content).await?;
        info!("Manifest written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct MemoryOutput {
        pub(crate) files: Mutex<Vec<(PathBuf, String)>>,
    }

    #[async_trait]
    impl FileOutput for MemoryOutput {
        async fn write(&self, path: &Path, content: &str) -> BrainrotResult<()> {
            self.files
                .lock()
                .unwrap()
                .push((path.to_path_buf(), content.to_string()));
            Ok(())
        }
    }

    fn audios() -> Vec<AudioDescriptor> {
        ["JOE_ROGAN", "BEN_SHAPIRO", "JOE_ROGAN"]
            .iter()
            .enumerate()
            .map(|(index, speaker)| AudioDescriptor {
                speaker: speaker.to_string(),
                file_path: PathBuf::from(format!("public/voice/{speaker}-{index}.mp3")),
                index,
            })
            .collect()
    }

    fn assembler(format: ManifestFormat) -> (ManifestAssembler, Arc<MemoryOutput>) {
        let out = Arc::new(MemoryOutput::default());
        let assembler = ManifestAssembler::new(
            AssetLayout::default(),
            out.clone(),
            format,
            PathBuf::from("src/tmp/context.tsx"),
        );
        (assembler, out)
    }

    #[test]
    fn subtitles_follow_descriptor_order() {
        let (assembler, _) = assembler(ManifestFormat::Json);
        let manifest = assembler.assemble(&audios(), "WII_SHOP").unwrap();

        assert_eq!(manifest.initial_agent_name, "JOE_ROGAN");
        assert_eq!(manifest.music, "/music/WII_SHOP.MP3");
        assert_eq!(manifest.video_file_name, "/background/MINECRAFT-0.mp4");
        assert_eq!(manifest.video_mode, "brainrot");
        let files: Vec<&str> = manifest.subtitles_file_name.iter().map(|s| s.file.as_str()).collect();
        assert_eq!(
            files,
            ["srt/JOE_ROGAN-0.srt", "srt/BEN_SHAPIRO-1.srt", "srt/JOE_ROGAN-2.srt"]
        );
    }

    #[test]
    fn none_music_is_kept_as_sentinel() {
        let (assembler, _) = assembler(ManifestFormat::Json);
        let manifest = assembler.assemble(&audios(), "NONE").unwrap();
        assert_eq!(manifest.music, "NONE");

        // only the exact sentinel counts
        let manifest = assembler.assemble(&audios(), "none").unwrap();
        assert_eq!(manifest.music, "/music/none.MP3");
    }

    #[test]
    fn empty_descriptors_are_rejected() {
        let (assembler, _) = assembler(ManifestFormat::Json);
        assert!(matches!(
            assembler.assemble(&[], "NONE"),
            Err(BrainrotError::EmptyDialogue)
        ));
    }

    #[tokio::test]
    async fn json_output_uses_renderer_field_names() {
        let (assembler, out) = assembler(ManifestFormat::Json);
        let manifest = assembler.assemble(&audios(), "NONE").unwrap();
        assembler.write(&manifest).await.unwrap();

        let files = out.files.lock().unwrap();
        let value: serde_json::Value = serde_json::from_str(&files[0].1).unwrap();
        assert_eq!(value["initialAgentName"], "JOE_ROGAN");
        assert_eq!(value["subtitlesFileName"][1]["name"], "BEN_SHAPIRO");
        assert_eq!(value["videoMode"], "brainrot");
    }

    #[test]
    fn tsx_module_exports_manifest() {
        let (assembler, _) = assembler(ManifestFormat::Tsx);
        let manifest = assembler.assemble(&audios()[..1], "NONE").unwrap();
        let module = ManifestFormat::Tsx.render(&manifest).unwrap();

        assert!(module.starts_with("import { staticFile } from 'remotion';"));
        assert!(module.contains(r#"export const music: string = "NONE";"#));
        assert!(module.contains(r#"export const initialAgentName = "JOE_ROGAN";"#));
        assert!(module.contains(r#"file: staticFile("srt/JOE_ROGAN-0.srt"),"#));
    }

    #[test]
    fn tsx_strings_are_escaped() {
        assert_eq!(ts_string("it's").unwrap(), r#""it's""#);
        assert_eq!(ts_string(r#"say "hi""#).unwrap(), r#""say \"hi\"""#);
        assert_eq!(ts_string("line\nbreak\r").unwrap(), r#""line\nbreak\r""#);
        assert_eq!(ts_string("bell\u{7}").unwrap(), r#""bell\u0007""#);
    }

    #[test]
    fn tsx_module_stays_on_one_line_per_export_with_odd_music_names() {
        let (assembler, _) = assembler(ManifestFormat::Tsx);
        let manifest = assembler.assemble(&audios()[..1], "LO\nFI").unwrap();
        let module = ManifestFormat::Tsx.render(&manifest).unwrap();

        let music_line = module
            .lines()
            .find(|l| l.starts_with("export const music"))
            .unwrap();
        assert_eq!(music_line, r#"export const music: string = "/music/LO\nFI.MP3";"#);
    }

    #[tokio::test]
    async fn fs_output_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("src/tmp/context.json");
        FsOutput.write(&path, "{}").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }
}
