use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Detect if we're running in a CI environment
fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Create a spinner with a message.
/// Returns a hidden spinner in CI environments or when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = if is_ci() || !std::io::stderr().is_terminal() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };

    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ci_detects_ci_env() {
        let ci_orig = std::env::var("CI").ok();

        std::env::set_var("CI", "true");
        assert!(is_ci());

        if let Some(val) = ci_orig {
            std::env::set_var("CI", val);
        } else {
            std::env::remove_var("CI");
        }
    }

    #[test]
    fn test_spinner_creates_progressbar() {
        let pb = spinner("Extracting queries...");
        pb.finish_and_clear();
    }
}
