use std::fmt;

use reel_core::ReelError;

/// Named checkpoints of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    VoiceGenerated,
    AudioAnalyzed,
    Compositing,
    RenderingFinal,
}

impl Milestone {
    pub fn label(&self) -> &'static str {
        match self {
            Milestone::VoiceGenerated => "voice generated",
            Milestone::AudioAnalyzed => "audio analyzed",
            Milestone::Compositing => "compositing",
            Milestone::RenderingFinal => "rendering final",
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives progress reports. Purely observational.
pub trait ProgressObserver: Send + Sync {
    fn milestone(&self, milestone: Milestone);

    fn failed(&self, _error: &ReelError) {}
}

/// Reports milestones as log events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn milestone(&self, milestone: Milestone) {
        tracing::info!(milestone = milestone.label(), "progress");
    }

    fn failed(&self, error: &ReelError) {
        tracing::error!(error = %error, "generation failed");
    }
}
