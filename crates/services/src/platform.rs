//! Optional device capabilities: speech capture and haptic feedback.
//!
//! Both degrade to a fallback when the platform lacks them. Nothing here is
//! ever fatal to a tracking session.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::PlatformError;

/// Speech-to-text source for voice set entry.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Capture one utterance.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` when nothing could be captured.
    async fn capture(&self) -> Result<String, PlatformError>;
}

/// Replays prepared transcripts in order.
#[derive(Debug, Default)]
pub struct ScriptedTranscripts {
    queue: Mutex<VecDeque<String>>,
}

impl ScriptedTranscripts {
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(lines.into_iter().map(Into::into).collect()),
        }
    }

    /// Queue another transcript.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Failed` if the queue lock is poisoned.
    pub fn push(&self, line: impl Into<String>) -> Result<(), PlatformError> {
        let mut queue = self
            .queue
            .lock()
            .map_err(|e| PlatformError::Failed(e.to_string()))?;
        queue.push_back(line.into());
        Ok(())
    }
}

#[async_trait]
impl TranscriptSource for ScriptedTranscripts {
    fn is_supported(&self) -> bool {
        true
    }

    async fn capture(&self) -> Result<String, PlatformError> {
        let mut queue = self
            .queue
            .lock()
            .map_err(|e| PlatformError::Failed(e.to_string()))?;
        queue.pop_front().ok_or(PlatformError::NoTranscript)
    }
}

/// Fallback for platforms without speech recognition.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedTranscripts;

#[async_trait]
impl TranscriptSource for UnsupportedTranscripts {
    fn is_supported(&self) -> bool {
        false
    }

    async fn capture(&self) -> Result<String, PlatformError> {
        Err(PlatformError::Unavailable)
    }
}

/// Vibration or similar physical alert.
#[async_trait]
pub trait Haptics: Send + Sync {
    /// Fire one pulse.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the device rejects the request.
    async fn pulse(&self) -> Result<(), PlatformError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHaptics;

#[async_trait]
impl Haptics for NoopHaptics {
    async fn pulse(&self) -> Result<(), PlatformError> {
        Ok(())
    }
}
