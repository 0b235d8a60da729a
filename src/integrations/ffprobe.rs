// src/integrations/ffprobe.rs
//
// Quality Probe - ffprobe subprocess
//
// The only trusted height is the one measured here on a materialized
// file; provider-declared heights are advisory. A probe failure means
// "no usable file" to callers, never a fatal error.

use std::path::Path;
use std::process::Command;

use crate::error::{AppError, AppResult};
use crate::integrations::{MediaProbe, ProbedMedia};

pub struct FfprobeProbe {
    binary: String,
}

impl FfprobeProbe {
    pub fn new() -> Self {
        Self {
            binary: "ffprobe".to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_binary(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> AppResult<ProbedMedia> {
        if !path.is_file() {
            return Err(AppError::Probe(format!("not a file: {}", path.display())));
        }

        let output = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=height",
                "-of",
                "csv=p=0",
            ])
            .arg(path)
            .output()
            .map_err(|e| AppError::Probe(format!("cannot run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            return Err(AppError::Probe(format!(
                "{} exited with {} for {}",
                self.binary,
                output.status,
                path.display()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let height: u32 = stdout
            .trim()
            .parse()
            .map_err(|_| AppError::Probe(format!("no video height in {}", path.display())))?;

        if height == 0 {
            return Err(AppError::Probe(format!(
                "zero-height video stream in {}",
                path.display()
            )));
        }

        Ok(ProbedMedia {
            height,
            extension: extension_of(path),
        })
    }
}

/// Container extension, lowercase, no dot; empty when absent.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
