//! Leveled diagnostics emitted while processing and generating models.
//!
//! Every pipeline stage reports through a [`Diagnostics`] sink. A sink can be injected
//! per [`ModelPipeline`](crate::ModelPipeline); without one the process-wide default is
//! used, which stays a no-op until [`install`] is called.

use std::sync::{Arc, LazyLock, Mutex, RwLock};

use strum::{Display, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum DiagnosticLevel {
  Debug,
  Info,
  Warn,
  Error,
}

pub trait Diagnostics: Send + Sync {
  fn emit(&self, level: DiagnosticLevel, message: &str);

  fn debug(&self, message: &str) {
    self.emit(DiagnosticLevel::Debug, message);
  }

  fn info(&self, message: &str) {
    self.emit(DiagnosticLevel::Info, message);
  }

  fn warn(&self, message: &str) {
    self.emit(DiagnosticLevel::Warn, message);
  }

  fn error(&self, message: &str) {
    self.emit(DiagnosticLevel::Error, message);
  }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
  fn emit(&self, _level: DiagnosticLevel, _message: &str) {}
}

/// Forwards messages to the `tracing` subscriber under the `modelgen` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
  fn emit(&self, level: DiagnosticLevel, message: &str) {
    match level {
      DiagnosticLevel::Debug => tracing::debug!(target: "modelgen", "{message}"),
      DiagnosticLevel::Info => tracing::info!(target: "modelgen", "{message}"),
      DiagnosticLevel::Warn => tracing::warn!(target: "modelgen", "{message}"),
      DiagnosticLevel::Error => tracing::error!(target: "modelgen", "{message}"),
    }
  }
}

/// Keeps every message in memory; handy for tests and for tools that report after the fact.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
  messages: Mutex<Vec<(DiagnosticLevel, String)>>,
}

impl CollectingDiagnostics {
  pub fn messages(&self) -> Vec<(DiagnosticLevel, String)> {
    self.messages.lock().map(|guard| guard.clone()).unwrap_or_default()
  }

  pub fn at_level(&self, level: DiagnosticLevel) -> Vec<String> {
    self
      .messages()
      .into_iter()
      .filter_map(|(l, message)| (l == level).then_some(message))
      .collect()
  }
}

impl Diagnostics for CollectingDiagnostics {
  fn emit(&self, level: DiagnosticLevel, message: &str) {
    if let Ok(mut guard) = self.messages.lock() {
      guard.push((level, message.to_string()));
    }
  }
}

static DEFAULT_SINK: LazyLock<RwLock<Option<Arc<dyn Diagnostics>>>> = LazyLock::new(|| RwLock::new(None));

/// Installs the process-wide default sink, replacing any previous one.
pub fn install(sink: Arc<dyn Diagnostics>) {
  if let Ok(mut slot) = DEFAULT_SINK.write() {
    *slot = Some(sink);
  }
}

/// Restores the no-op default.
pub fn reset() {
  if let Ok(mut slot) = DEFAULT_SINK.write() {
    *slot = None;
  }
}

/// The sink used when a pipeline was not given one explicitly.
pub fn current() -> Arc<dyn Diagnostics> {
  DEFAULT_SINK
    .read()
    .ok()
    .and_then(|slot| slot.clone())
    .unwrap_or_else(|| Arc::new(NoopDiagnostics))
}
