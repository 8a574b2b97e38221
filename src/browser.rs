//! Opens URLs and files with the system's default handler.

use std::{io, process::Command};

/// Open `target`, a URL or file path, in the default browser.
///
/// Returns once the opener process has started, without waiting for the
/// browser.
pub fn open(target: &str) -> io::Result<()> {
    tracing::debug!("Opening {target}");
    opener_command(target).spawn().map(|_| ())
}

#[cfg(target_os = "macos")]
fn opener_command(target: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(target);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(target: &str) -> Command {
    let mut command = Command::new("cmd");
    // The empty string is the window title, otherwise `start` would treat a
    // quoted target as the title.
    command.args(["/C", "start", ""]).arg(target);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(target: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(target);
    command
}
