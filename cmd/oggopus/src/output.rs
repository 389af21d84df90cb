//! Report serialization for `oggopus`.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

/// Report encoding, chosen by `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Yaml }
    }
}

/// Where the report goes: the `-o` file, or stdout.
pub struct Output {
    pub format: OutputFormat,
    pub path: Option<PathBuf>,
}

impl Output {
    pub fn new(format: OutputFormat, path: Option<impl Into<PathBuf>>) -> Self {
        Self {
            format,
            path: path.map(Into::into),
        }
    }

    /// Serializes the report. JSON is pretty-printed and both formats end
    /// in a newline.
    pub fn render<T: Serialize>(&self, report: &T) -> anyhow::Result<String> {
        let mut text = match self.format {
            OutputFormat::Yaml => serde_yaml::to_string(report)?,
            OutputFormat::Json => serde_json::to_string_pretty(report)?,
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }

    pub fn write<T: Serialize>(&self, report: &T) -> anyhow::Result<()> {
        let text = self.render(report)?;
        match &self.path {
            Some(path) => {
                let mut file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                file.write_all(text.as_bytes())
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            None => io::stdout().lock().write_all(text.as_bytes())?,
        }
        Ok(())
    }
}
