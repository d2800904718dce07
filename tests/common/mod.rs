//! Shared test utilities: a scripted engine and directory helpers.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use voice_clone_rs::{BoxError, SynthesisResult, VoiceCloningEngine};

/// What the fake engine does when asked to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Write a short WAV to the output path.
    Succeed,
    /// Fail without writing anything.
    FailBeforeOutput,
    /// Write half a file to the output path, then fail.
    FailAfterPartialOutput,
}

/// Everything the fake engine saw, shared with the test.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: usize,
    /// Reference file contents at the time of each call.
    pub references: Vec<Vec<u8>>,
    pub texts: Vec<String>,
    pub languages: Vec<String>,
}

pub struct FakeEngine {
    pub script: Script,
    pub recorder: Arc<Mutex<Recorder>>,
}

impl FakeEngine {
    pub fn new(script: Script) -> (Self, Arc<Mutex<Recorder>>) {
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        (
            Self {
                script,
                recorder: Arc::clone(&recorder),
            },
            recorder,
        )
    }
}

impl VoiceCloningEngine for FakeEngine {
    type ModelParams = ();

    fn load_model_with_params(&mut self, _model_name: &str, _params: ()) -> Result<(), BoxError> {
        Ok(())
    }

    fn unload_model(&mut self) {}

    fn synthesize_to_file(
        &mut self,
        text: &str,
        speaker_wav: &Path,
        language: &str,
        output_path: &Path,
    ) -> Result<(), BoxError> {
        {
            let mut rec = self.recorder.lock().unwrap();
            rec.calls += 1;
            rec.references.push(std::fs::read(speaker_wav)?);
            rec.texts.push(text.to_string());
            rec.languages.push(language.to_string());
        }

        match self.script {
            Script::Succeed => tone().write_wav(output_path),
            Script::FailBeforeOutput => Err("reference audio could not be decoded".into()),
            Script::FailAfterPartialOutput => {
                std::fs::write(output_path, b"RIFF\x00\x00")?;
                Err("vocoder crashed mid-write".into())
            }
        }
    }
}

/// The audio the fake engine produces on success.
pub fn tone() -> SynthesisResult {
    SynthesisResult {
        samples: (0..240).map(|i| (i as f32 / 240.0) - 0.5).collect(),
        sample_rate: 24000,
    }
}

/// Names of every entry in `dir`.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read work dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
