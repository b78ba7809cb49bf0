mod exit_code;
mod extract;
mod progress;

use clap::Parser;
use std::path::PathBuf;

pub use exit_code::ExitCode;

#[derive(Parser)]
#[command(name = "graphql-persist")]
#[command(
    about = "Extract GraphQL operations into a persisted query manifest",
    long_about = None
)]
#[command(version)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    #[command(flatten)]
    extract: extract::ExtractArgs,

    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Force colored output even when not a TTY
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Suppress progress indicators (spinners)
    #[arg(long)]
    no_progress: bool,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show progress indicators (spinners)
    pub show_progress: bool,
    /// Whether to show informational output (success messages)
    pub show_info: bool,
}

fn main() {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    let output_opts = OutputOptions {
        show_progress: !cli.quiet && !cli.no_progress,
        show_info: !cli.quiet,
    };

    extract::run(&cli.extract, cli.config.as_deref(), output_opts);
}

/// Initialize tracing, filtered by `RUST_LOG` and off by default
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output from flags and the environment.
///
/// Flags win, then `NO_COLOR` (any value disables), then `CLICOLOR_FORCE`
/// (non-empty and non-zero enables), then `CLICOLOR=0` (disables). Otherwise
/// the `colored` crate falls back to TTY detection.
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color || no_color {
        control::set_override(force_color);
    } else if std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if std::env::var("CLICOLOR").is_ok_and(|val| val == "0") {
        control::set_override(false);
    }
}

#[cfg(test)]
mod color_tests {
    use super::configure_colors;
    use colored::control::{self, SHOULD_COLORIZE};
    use std::sync::Mutex;

    // Env vars and the color override are process-global
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 3] = ["NO_COLOR", "CLICOLOR", "CLICOLOR_FORCE"];

    fn with_clean_env<F: FnOnce()>(f: F) {
        let _lock = TEST_MUTEX.lock().unwrap();

        let saved: Vec<_> = VARS.iter().map(|var| std::env::var_os(var)).collect();
        for var in VARS {
            std::env::remove_var(var);
        }
        control::unset_override();

        f();

        control::unset_override();
        for (var, value) in VARS.iter().zip(saved) {
            if let Some(value) = value {
                std::env::set_var(var, value);
            }
        }
    }

    #[test]
    fn color_flag_forces_colors_on() {
        with_clean_env(|| {
            std::env::set_var("NO_COLOR", "1");
            configure_colors(true, false);
            assert!(SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn no_color_flag_forces_colors_off() {
        with_clean_env(|| {
            std::env::set_var("CLICOLOR_FORCE", "1");
            configure_colors(false, true);
            assert!(!SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn no_color_env_with_empty_value_disables_colors() {
        with_clean_env(|| {
            std::env::set_var("NO_COLOR", "");
            configure_colors(false, false);
            assert!(!SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn clicolor_force_enables_colors() {
        with_clean_env(|| {
            std::env::set_var("CLICOLOR_FORCE", "1");
            configure_colors(false, false);
            assert!(SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn clicolor_zero_disables_colors() {
        with_clean_env(|| {
            std::env::set_var("CLICOLOR", "0");
            configure_colors(false, false);
            assert!(!SHOULD_COLORIZE.should_colorize());
        });
    }
}
