//! Progress reporting for council runs

use colored::Colorize;
use council_application::ports::progress::ProgressNotifier;
use council_domain::{Node, ResponseStatus, Stage};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Mutex;

/// Reports progress with indicatif bars and streams the verdict to stdout
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
    stream_verdict: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
            stream_verdict: true,
        }
    }

    /// Whether verdict chunks are echoed as they arrive
    pub fn with_verdict_stream(mut self, enabled: bool) -> Self {
        self.stream_verdict = enabled;
        self
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn task_line(node: &Node, status: &ResponseStatus) -> String {
        match status {
            ResponseStatus::Ok => format!("{} {}", "v".green(), node.name),
            ResponseStatus::Skipped => format!("{} {} (skipped)", "-".yellow(), node.name),
            ResponseStatus::Unauthorized => format!("{} {} (unauthorized)", "x".red(), node.name),
            ResponseStatus::Error { .. } => format!("{} {} (error)", "x".red(), node.name),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, stage: &Stage, total_tasks: usize) {
        if *stage == Stage::Synthesizing && self.stream_verdict {
            return;
        }
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(stage.display_name());
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.phase_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_task_complete(&self, _stage: &Stage, node: &Node, status: &ResponseStatus) {
        if let Ok(bar) = self.phase_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(Self::task_line(node, status));
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, stage: &Stage) {
        if let Ok(mut bar) = self.phase_bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(format!("{} complete", stage.display_name().green()));
        }
    }

    fn on_synthesis_start(&self, chairman: &Node) {
        if self.stream_verdict {
            println!(
                "\n{}\n",
                format!("── Verdict: {} ──", chairman.name).cyan().bold()
            );
        }
    }

    fn on_synthesis_chunk(&self, chunk: &str) {
        if self.stream_verdict {
            print!("{}", chunk);
            let _ = std::io::stdout().flush();
        }
    }

    fn on_synthesis_end(&self, complete: bool) {
        if self.stream_verdict {
            println!();
            if !complete {
                println!("{}", "[Incomplete] Verdict stream interrupted.".red().bold());
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, stage: &Stage, total_tasks: usize) {
        eprintln!("{} {} ({} tasks)", "->".cyan(), stage.display_name().bold(), total_tasks);
    }

    fn on_task_complete(&self, _stage: &Stage, node: &Node, status: &ResponseStatus) {
        eprintln!("  {}", ProgressReporter::task_line(node, status));
    }

    fn on_phase_complete(&self, _stage: &Stage) {
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::ProviderKind;

    #[test]
    fn test_task_line_marks_degraded_status() {
        let node = Node::new("g", "Critic", ProviderKind::Groq, "llama3");
        assert!(ProgressReporter::task_line(&node, &ResponseStatus::Skipped).contains("(skipped)"));
        assert!(
            ProgressReporter::task_line(&node, &ResponseStatus::Unauthorized)
                .contains("(unauthorized)")
        );
        assert!(ProgressReporter::task_line(&node, &ResponseStatus::Ok).contains("Critic"));
    }
}
