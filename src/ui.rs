// UI module for consistent terminal output with progress bars and styling
//
// All printing goes through here; the rest of the crate is denied
// print_stdout/print_stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use crate::download::{Status, Transfer};
use crate::status::StatusHandler;
use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Spinner style similar to uv/pnpm
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Check if stderr is a TTY (for interactive output)
fn is_tty() -> bool {
    Term::stderr().is_term()
}

fn styled_bar(pb: ProgressBar, template: &str) -> ProgressBar {
    // Templates are constants; a parse failure would only lose the styling
    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        pb.set_style(style.tick_chars(SPINNER_CHARS).progress_chars("━━╺"));
    }
    if !is_tty() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb
}

/// Create a progress bar for downloads with size
fn download_bar(total_size: u64) -> ProgressBar {
    styled_bar(
        ProgressBar::new(total_size),
        "{spinner:.cyan} {msg} [{bar:25.cyan/dim}] {bytes}/{total_bytes} ({bytes_per_sec})",
    )
}

/// Create an indeterminate progress bar (when size is unknown)
fn download_bar_indeterminate() -> ProgressBar {
    let pb = styled_bar(
        ProgressBar::new_spinner(),
        "{spinner:.cyan} {msg} {bytes} ({bytes_per_sec})",
    );
    if is_tty() {
        pb.enable_steady_tick(Duration::from_millis(80));
    }
    pb
}

/// Create a spinner for catalog lookups
pub fn spinner(message: &str) -> ProgressBar {
    let pb = styled_bar(ProgressBar::new_spinner(), "{spinner:.cyan} {msg}");
    pb.set_message(message.to_string());
    if is_tty() {
        pb.enable_steady_tick(Duration::from_millis(80));
    }
    pb
}

/// Build a status dispatcher that renders download progress as a progress bar
pub fn progress_reporter() -> StatusHandler<Status, Transfer> {
    let handler = StatusHandler::new();
    let bar: Arc<Mutex<Option<ProgressBar>>> = Arc::new(Mutex::new(None));

    let current = Arc::clone(&bar);
    handler.register_handler(Status::Started, move |transfer: Transfer| {
        let pb = match transfer.total {
            Some(total) => download_bar(total),
            None => download_bar_indeterminate(),
        };
        pb.set_message(transfer.name);
        *current
            .lock()
            .map_err(|_| anyhow::anyhow!("progress bar lock poisoned"))? = Some(pb);
        Ok(())
    });

    let current = Arc::clone(&bar);
    handler.register_handler(Status::Progress, move |transfer: Transfer| {
        let current = current
            .lock()
            .map_err(|_| anyhow::anyhow!("progress bar lock poisoned"))?;
        if let Some(pb) = current.as_ref() {
            pb.set_position(transfer.downloaded);
        }
        Ok(())
    });

    handler.register_handler(Status::Finished, move |transfer: Transfer| {
        let finished = bar
            .lock()
            .map_err(|_| anyhow::anyhow!("progress bar lock poisoned"))?
            .take();
        let size = style(format!("({})", indicatif::HumanBytes(transfer.downloaded))).dim();
        let message = format!("{} {}", transfer.name, size);
        match finished {
            Some(pb) => finish_bar(&pb, &message),
            None => success(&message),
        }
        Ok(())
    });

    debug_assert!(
        [Status::Started, Status::Progress, Status::Finished]
            .iter()
            .all(|status| handler.is_registered(status))
    );
    handler
}

fn finish_bar(pb: &ProgressBar, message: &str) {
    let msg = format!("{} {}", style("✓").green(), message);
    if is_tty() {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            pb.set_style(style);
        }
        pb.finish_with_message(msg);
    } else {
        pb.finish_and_clear();
        println!("{}", msg);
    }
}

/// Clear a spinner without leaving a message
pub fn clear_bar(pb: &ProgressBar) {
    pb.finish_and_clear();
}

/// Print a success message with checkmark
pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print an info/action message with arrow
pub fn action(message: &str) {
    println!("{} {}", style("→").cyan(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}

/// Print a header/section message
pub fn header(message: &str) {
    println!("{}", style(message).bold());
}

/// Print a dimmed/secondary message
pub fn dim(message: &str) {
    println!("{}", style(message).dim());
}

/// Print a labelled field, e.g. "Version: 1.20.4"
pub fn field(label: &str, value: &str) {
    println!("{} {}", style(format!("{}:", label)).cyan().bold(), value);
}

/// Print a plain line of output
pub fn line(message: &str) {
    println!("{}", message);
}

/// Print rows as fixed-width columns separated by " - ", with a header and rule.
///
/// Every column but the last is padded to `width`.
pub fn table(headers: &[&str], rows: &[Vec<String>], width: usize) {
    let render = |cells: &[&str]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i + 1 < cells.len() {
                    format!("{:<width$}", cell, width = width)
                } else {
                    cell.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" - ")
    };

    let heading = render(headers);
    header(&heading);
    println!("{}", "=".repeat(heading.chars().count()));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        println!("{}", render(&cells));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_reporter_handles_every_download_status() {
        let reporter = progress_reporter();
        for status in [Status::Started, Status::Progress, Status::Finished] {
            assert!(reporter.is_registered(&status));
        }

        let hook = reporter.get_hook();
        let transfer = |downloaded| Transfer {
            name: "paper.jar".to_string(),
            downloaded,
            total: Some(4),
        };
        hook.call(Status::Started, transfer(0)).unwrap();
        hook.call(Status::Progress, transfer(4)).unwrap();
        hook.call(Status::Finished, transfer(4)).unwrap();
    }

    #[test]
    fn test_progress_without_started_is_ignored() {
        let hook = progress_reporter().get_hook();
        let transfer = Transfer {
            name: "x.jar".to_string(),
            downloaded: 1,
            total: None,
        };
        hook.call(Status::Progress, transfer.clone()).unwrap();
        hook.call(Status::Finished, transfer).unwrap();
    }
}
