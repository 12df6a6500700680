//! Terminal UX helpers: styled output and progress indicators.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::search::SearchHit;
use crate::types::Project;

/// Create a spinner for indeterminate operations.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// One numbered, styled line per search hit, snippet first line below.
pub fn print_hit(index: usize, hit: &SearchHit) {
    println!(
        "{}. {} ({}) {} {}:{}-{} [score: {}]",
        index + 1,
        style(&hit.unit.name).cyan().bold(),
        hit.unit.kind,
        style(&hit.unit.project).dim(),
        hit.unit.file_path,
        hit.unit.line_start,
        hit.unit.line_end,
        style(hit.score).yellow(),
    );
    if let Some(first_line) = hit.unit.snippet.lines().next() {
        println!("   {}", style(first_line).dim());
    }
}

/// One line per project for `list` output.
pub fn print_project(project: &Project) {
    println!(
        "  {}  {} files  {}",
        style(&project.name).cyan().bold(),
        project.file_count,
        style(&project.root_path).dim(),
    );
}

pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}
