//! Progress notification port
//!
//! Defines the interface for reporting progress during a council run.

use council_domain::{Node, ResponseStatus, Stage};

/// Callback for progress updates during a council run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_phase_start(&self, stage: &Stage, total_tasks: usize);

    /// Called when one node's task completes within a stage
    fn on_task_complete(&self, stage: &Stage, node: &Node, status: &ResponseStatus);

    /// Called when a stage completes
    fn on_phase_complete(&self, stage: &Stage);

    // ==================== Verdict Stream Callbacks ====================

    /// Called when the chairman starts streaming.
    fn on_synthesis_start(&self, _chairman: &Node) {}

    /// Called for each text chunk of the verdict.
    fn on_synthesis_chunk(&self, _chunk: &str) {}

    /// Called when the verdict stream ends, cleanly or not.
    fn on_synthesis_end(&self, _complete: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _stage: &Stage, _total_tasks: usize) {}
    fn on_task_complete(&self, _stage: &Stage, _node: &Node, _status: &ResponseStatus) {}
    fn on_phase_complete(&self, _stage: &Stage) {}
}
