use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};

/// Model identifier of Coqui XTTS v2.
pub const XTTS_V2: &str = "tts_models/multilingual/multi-dataset/xtts_v2";

/// Environment variable Coqui checks before prompting for the model license.
const TOS_ENV: &str = "COQUI_TOS_AGREED";

/// Python program run by the worker: `<python> -u -c <script> <model> <gpu 0|1>`.
const WORKER_SCRIPT: &str = include_str!("worker.py");

#[derive(thiserror::Error, Debug)]
pub enum CoquiError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(
        "Python interpreter not found at '{0}'. Install Python with the `TTS` package \
         (`pip install TTS`) or point --python at it."
    )]
    PythonNotFound(String),
    #[error("{0}")]
    ModelLoad(String),
    #[error("{0}")]
    SynthesisFailed(String),
    #[error("Coqui worker exited unexpectedly ({0})")]
    WorkerExited(String),
    #[error("Malformed message from Coqui worker: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error("Coqui finished but wrote no audio to {0}")]
    MissingOutput(String),
    #[error("Model not loaded. Call load_model() first.")]
    ModelNotLoaded,
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    speaker_wav: &'a Path,
    language: &'a str,
    file_path: &'a Path,
}

#[derive(Deserialize)]
struct Reply {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl Reply {
    fn error_message(self) -> String {
        self.error.unwrap_or_else(|| "unknown error".to_string())
    }
}

/// A Python process holding one instantiated Coqui model.
///
/// The model is built once when the process starts; every synthesis is a
/// JSON line on stdin answered by a JSON line on stdout. The process is
/// killed when the worker is dropped.
#[derive(Debug)]
pub struct Worker {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Worker {
    /// Start the process and wait until the model is instantiated.
    pub fn spawn(
        python: &Path,
        model_name: &str,
        use_cuda: bool,
        tos_agreed: bool,
    ) -> Result<Self, CoquiError> {
        let mut command = Command::new(python);
        command
            .arg("-u")
            .arg("-c")
            .arg(WORKER_SCRIPT)
            .arg(model_name)
            .arg(if use_cuda { "1" } else { "0" })
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if tos_agreed {
            command.env(TOS_ENV, "1");
        }

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                CoquiError::PythonNotFound(python.display().to_string())
            } else {
                CoquiError::Io(e)
            }
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("worker stdin not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("worker stdout not captured"))?;

        let mut worker = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        };
        let ready = worker.read_reply()?;
        if !ready.ok {
            return Err(CoquiError::ModelLoad(ready.error_message()));
        }
        Ok(worker)
    }

    /// Ask the loaded model to clone `speaker_wav` and speak `text` into `output`.
    pub fn synthesize(
        &mut self,
        text: &str,
        speaker_wav: &Path,
        language: &str,
        output: &Path,
    ) -> Result<(), CoquiError> {
        let mut line = serde_json::to_string(&SynthesisRequest {
            text,
            speaker_wav,
            language,
            file_path: output,
        })?;
        line.push('\n');

        if let Err(e) = self
            .stdin
            .write_all(line.as_bytes())
            .and_then(|()| self.stdin.flush())
        {
            if e.kind() == io::ErrorKind::BrokenPipe {
                return Err(self.exited());
            }
            return Err(e.into());
        }

        let reply = self.read_reply()?;
        if reply.ok {
            Ok(())
        } else {
            Err(CoquiError::SynthesisFailed(reply.error_message()))
        }
    }

    /// Whether the process is still alive.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn read_reply(&mut self) -> Result<Reply, CoquiError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(self.exited());
            }
            if !line.trim().is_empty() {
                break;
            }
        }
        Ok(serde_json::from_str(line.trim())?)
    }

    fn exited(&mut self) -> CoquiError {
        let status = match self.child.wait() {
            Ok(status) => status.to_string(),
            Err(e) => e.to_string(),
        };
        CoquiError::WorkerExited(status)
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
