use async_trait::async_trait;
use skillcage_tools::{ApprovalGate, ScriptApproval};
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Asks on the terminal before every script run.
///
/// The summary goes to stderr and the answer is read from stdin; anything but
/// `y` or `yes` is a denial.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalApproval;

#[async_trait]
impl ApprovalGate for TerminalApproval {
    async fn confirm(&self, request: &ScriptApproval) -> bool {
        let summary = request.summary();
        let answer = tokio::task::spawn_blocking(move || prompt(&summary)).await;

        match answer {
            Ok(Ok(line)) => is_yes(&line),
            Ok(Err(e)) => {
                warn!("Failed to read approval answer: {}", e);
                false
            }
            Err(e) => {
                warn!("Approval prompt task failed: {}", e);
                false
            }
        }
    }
}

fn prompt(summary: &str) -> io::Result<String> {
    let mut stderr = io::stderr().lock();
    writeln!(stderr, "A skill wants to run a script:")?;
    writeln!(stderr, "{summary}")?;
    write!(stderr, "Allow? [y/N] ")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
