//! Accelerator detection.
//!
//! XTTS runs far faster on a CUDA device, but most hosted deployments have
//! none. Detection probes `nvidia-smi`; a probe that cannot run counts as
//! "no accelerator" and inference falls back to the CPU.

use std::process::{Command, Stdio};

/// Which compute device the operator asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DevicePreference {
    /// Use CUDA when a GPU is visible, otherwise the CPU.
    #[default]
    Auto,
    /// Always run on the CPU.
    Cpu,
    /// Always request CUDA, even if the probe finds no GPU.
    Cuda,
}

impl DevicePreference {
    /// Resolve the preference into an accelerator flag.
    pub fn use_accelerator(self) -> bool {
        self.resolve_with(cuda_available)
    }

    fn resolve_with(self, probe: impl FnOnce() -> bool) -> bool {
        match self {
            DevicePreference::Auto => probe(),
            DevicePreference::Cpu => false,
            DevicePreference::Cuda => true,
        }
    }
}

/// Returns true when `nvidia-smi -L` runs and lists at least one GPU.
pub fn cuda_available() -> bool {
    let output = match Command::new("nvidia-smi")
        .arg("-L")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            log::debug!("nvidia-smi not runnable, assuming no GPU: {e}");
            return false;
        }
    };

    output.status.success()
        && String::from_utf8_lossy(&output.stdout)
            .lines()
            .any(|line| line.starts_with("GPU "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_preferences_skip_the_probe() {
        assert!(!DevicePreference::Cpu.resolve_with(|| panic!("probed")));
        assert!(DevicePreference::Cuda.resolve_with(|| panic!("probed")));
    }

    #[test]
    fn auto_follows_the_probe() {
        assert!(DevicePreference::Auto.resolve_with(|| true));
        assert!(!DevicePreference::Auto.resolve_with(|| false));
    }
}
