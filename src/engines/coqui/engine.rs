use std::path::{Path, PathBuf};

use derive_builder::Builder;

use crate::{BoxError, VoiceCloningEngine};

use super::worker::{CoquiError, Worker};

/// Parameters for configuring Coqui model loading.
#[derive(Debug, Clone, Builder)]
#[builder(default, setter(into))]
pub struct CoquiModelParams {
    /// Instantiate the model on the GPU.
    pub use_cuda: bool,
    /// Python interpreter with the `TTS` package installed. A bare name is
    /// looked up on PATH.
    pub python: PathBuf,
    /// Accept the Coqui Public Model License non-interactively.
    pub tos_agreed: bool,
}

impl Default for CoquiModelParams {
    fn default() -> Self {
        Self {
            use_cuda: false,
            python: PathBuf::from("python3"),
            tos_agreed: false,
        }
    }
}

/// Coqui XTTS voice-cloning engine.
///
/// Loading starts a Python worker that instantiates the model once and keeps
/// it in memory. Syntheses are handed to that worker, so the weights are not
/// reloaded per call. A worker that died is restarted on the next synthesis.
///
/// ```rust,no_run
/// use voice_clone_rs::{VoiceCloningEngine, engines::coqui::{CoquiEngine, XTTS_V2}};
/// use std::path::Path;
///
/// let mut engine = CoquiEngine::new();
/// engine.load_model(XTTS_V2)?;
/// let result = engine.synthesize("Hello, world!", Path::new("me.wav"), "en")?;
/// println!("{:.1}s of audio", result.duration_secs());
/// # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
/// ```
#[derive(Debug, Default)]
pub struct CoquiEngine {
    model: Option<LoadedModel>,
}

#[derive(Debug)]
struct LoadedModel {
    name: String,
    params: CoquiModelParams,
    worker: Worker,
}

impl LoadedModel {
    fn start(name: &str, params: CoquiModelParams) -> Result<Self, CoquiError> {
        let worker = Worker::spawn(&params.python, name, params.use_cuda, params.tos_agreed)?;
        Ok(Self {
            name: name.to_string(),
            params,
            worker,
        })
    }
}

impl CoquiEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the loaded model, if any.
    pub fn model_name(&self) -> Option<&str> {
        self.model.as_ref().map(|m| m.name.as_str())
    }

    /// Whether synthesis runs on the GPU.
    pub fn uses_cuda(&self) -> bool {
        self.model.as_ref().is_some_and(|m| m.params.use_cuda)
    }
}

impl VoiceCloningEngine for CoquiEngine {
    type ModelParams = CoquiModelParams;

    fn load_model_with_params(
        &mut self,
        model_name: &str,
        params: Self::ModelParams,
    ) -> Result<(), BoxError> {
        self.model = None;
        let model = LoadedModel::start(model_name, params)?;
        log::info!(
            "Coqui model '{model_name}' instantiated (python={}, cuda={})",
            model.params.python.display(),
            model.params.use_cuda
        );
        self.model = Some(model);
        Ok(())
    }

    fn unload_model(&mut self) {
        self.model = None;
    }

    fn synthesize_to_file(
        &mut self,
        text: &str,
        speaker_wav: &Path,
        language: &str,
        output_path: &Path,
    ) -> Result<(), BoxError> {
        let model = self.model.as_mut().ok_or(CoquiError::ModelNotLoaded)?;

        if !model.worker.is_running() {
            log::warn!("Coqui worker for '{}' has exited, restarting it", model.name);
            model.worker = Worker::spawn(
                &model.params.python,
                &model.name,
                model.params.use_cuda,
                model.params.tos_agreed,
            )?;
        }

        model
            .worker
            .synthesize(text, speaker_wav, language, output_path)?;

        let written = std::fs::metadata(output_path).is_ok_and(|m| m.len() > 0);
        if !written {
            return Err(CoquiError::MissingOutput(output_path.display().to_string()).into());
        }
        Ok(())
    }
}
