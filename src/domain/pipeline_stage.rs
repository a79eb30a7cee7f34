use std::fmt;

/// Progress of a single request through the reply pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Received,
    Stored,
    Transcribed,
    Replied,
    Synthesized,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "RECEIVED",
            PipelineStage::Stored => "STORED",
            PipelineStage::Transcribed => "TRANSCRIBED",
            PipelineStage::Replied => "REPLIED",
            PipelineStage::Synthesized => "SYNTHESIZED",
            PipelineStage::Done => "DONE",
            PipelineStage::Failed => "FAILED",
        }
    }

    /// The stage that follows a successful transition, `None` once terminal.
    pub fn next(&self) -> Option<PipelineStage> {
        match self {
            PipelineStage::Received => Some(PipelineStage::Stored),
            PipelineStage::Stored => Some(PipelineStage::Transcribed),
            PipelineStage::Transcribed => Some(PipelineStage::Replied),
            PipelineStage::Replied => Some(PipelineStage::Synthesized),
            PipelineStage::Synthesized => Some(PipelineStage::Done),
            PipelineStage::Done | PipelineStage::Failed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
