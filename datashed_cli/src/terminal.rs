//! Terminal detection and capability utilities

use is_terminal::IsTerminal;
use std::env;
use std::io::{stderr, stdout};

/// Check if stdout is connected to an interactive terminal
pub fn is_interactive() -> bool {
    // Check if stdout is a terminal
    if !stdout().is_terminal() {
        return false;
    }

    // Check for CI environments that might have TTY but shouldn't be interactive
    if is_ci_environment() {
        return false;
    }

    // Check for non-interactive shell indicators
    if env::var("DEBIAN_FRONTEND").unwrap_or_default() == "noninteractive" {
        return false;
    }

    true
}

/// Check if the terminal supports ANSI escape codes for colors and progress bars
pub fn supports_ansi() -> bool {
    // If not interactive, no ANSI support
    if !is_interactive() {
        return false;
    }

    // Check TERM environment variable
    let term = env::var("TERM").unwrap_or_default();
    if term == "dumb" || term.is_empty() {
        return false;
    }

    // Windows Terminal, ConEmu, and modern Windows consoles support ANSI
    #[cfg(windows)]
    {
        // Check for Windows Terminal
        if env::var("WT_SESSION").is_ok() {
            return true;
        }
        // Check for ConEmu
        if env::var("ConEmuANSI").unwrap_or_default() == "ON" {
            return true;
        }
        // Assume modern Windows consoles support ANSI natively
        return true;
    }

    // Unix-like systems generally support ANSI unless TERM=dumb
    #[cfg(unix)]
    {
        true
    }
}

/// Check if stderr is connected to a terminal (for progress display)
pub fn stderr_is_terminal() -> bool {
    stderr().is_terminal()
}

/// Detect if running in a CI environment
fn is_ci_environment() -> bool {
    // Check common CI environment variables
    let ci_vars = [
        "CI",
        "CONTINUOUS_INTEGRATION",
        "JENKINS_URL",
        "GITHUB_ACTIONS",
        "GITLAB_CI",
        "TRAVIS",
        "CIRCLECI",
        "BUILDKITE",
        "DRONE",
        "TEAMCITY_VERSION",
        "TF_BUILD", // Azure DevOps
    ];

    ci_vars.iter().any(|var| env::var(var).is_ok())
}

/// Determine if progress bars should be shown by default
pub fn should_show_progress_by_default() -> bool {
    // Progress bars should only be shown when:
    // 1. Connected to an interactive terminal
    // 2. Stderr is a terminal (progress goes to stderr)
    // 3. Terminal supports ANSI codes
    is_interactive() && stderr_is_terminal() && supports_ansi()
}
