use std::{ffi::OsStr, path::Path};

use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use modelgen::RawInput;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum InputFormat {
  #[default]
  #[strum(to_string = "JSON")]
  Json,
  #[strum(to_string = "YAML")]
  Yaml,
}

impl InputFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }

  pub fn from_path(path: &Path) -> Self {
    path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(Self::default(), Self::from_extension)
  }
}

/// A schema document mapped from disk.
pub struct InputFile {
  file: AsyncMmapFile,
  format: InputFormat,
}

impl InputFile {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = InputFormat::from_path(path);
    let file = AsyncMmapFile::open(path).await?;
    Ok(Self { file, format })
  }

  pub fn format(&self) -> InputFormat {
    self.format
  }

  pub fn to_raw_input(&self) -> anyhow::Result<RawInput> {
    let content = std::str::from_utf8(self.file.as_slice())?;
    Ok(match self.format {
      InputFormat::Json => RawInput::json(content),
      InputFormat::Yaml => RawInput::yaml(content),
    })
  }
}
