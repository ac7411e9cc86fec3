//! Output formatting utilities for the CLI
//!
//! Tables for the audit log, the gateway status block and colored status
//! messages.

use tabled::{
    settings::{Style, Width},
    Table, Tabled,
};

use sg_core::api::ServiceInfo;
use sg_core::time::{age_secs, current_time_millis};
use sg_core::AuditRecord;

/// Format audit records as a table, newest first as received
///
/// The detailed view adds the captured output and wraps to the terminal.
pub fn format_logs(records: &[AuditRecord], detailed: bool) -> String {
    if records.is_empty() {
        return "No executions recorded".to_string();
    }

    #[derive(Tabled)]
    struct LogRow {
        #[tabled(rename = "WHEN")]
        when: String,
        #[tabled(rename = "REQUEST")]
        request: String,
        #[tabled(rename = "HOST")]
        host: String,
        #[tabled(rename = "COMMAND")]
        command: String,
        #[tabled(rename = "RESULT")]
        result: String,
        #[tabled(rename = "TIME")]
        elapsed: String,
    }

    #[derive(Tabled)]
    struct LogRowDetailed {
        #[tabled(rename = "WHEN")]
        when: String,
        #[tabled(rename = "REQUEST")]
        request: String,
        #[tabled(rename = "HOST")]
        host: String,
        #[tabled(rename = "COMMAND")]
        command: String,
        #[tabled(rename = "RESULT")]
        result: String,
        #[tabled(rename = "TIME")]
        elapsed: String,
        #[tabled(rename = "OUTPUT")]
        output: String,
    }

    let now = current_time_millis();

    if detailed {
        let rows: Vec<LogRowDetailed> = records
            .iter()
            .map(|r| LogRowDetailed {
                when: format_age(now, r.timestamp),
                request: r.request_id.clone(),
                host: r.host.clone(),
                command: r.command.clone(),
                result: result_label(r.success),
                elapsed: format!("{:.2}s", r.elapsed_seconds),
                output: if r.success {
                    r.stdout.trim_end().to_string()
                } else {
                    r.stderr.trim_end().to_string()
                },
            })
            .collect();

        Table::new(rows)
            .with(Style::rounded())
            .with(Width::wrap(120))
            .to_string()
    } else {
        let rows: Vec<LogRow> = records
            .iter()
            .map(|r| LogRow {
                when: format_age(now, r.timestamp),
                request: truncate(&r.request_id, 16),
                host: r.host.clone(),
                command: truncate(&r.command, 40),
                result: result_label(r.success),
                elapsed: format!("{:.2}s", r.elapsed_seconds),
            })
            .collect();

        Table::new(rows).with(Style::rounded()).to_string()
    }
}

/// Format the gateway banner
pub fn format_status(url: &str, info: &ServiceInfo) -> String {
    let mut output = String::new();

    output.push_str("Gateway Status: Running\n");
    output.push_str(&format!("Address: {}\n", url));
    output.push_str(&format!("Service: {}\n", info.message));
    output.push_str(&format!("API Version: {}\n", info.version));

    output
}

fn result_label(success: bool) -> String {
    if success { "ok" } else { "failed" }.to_string()
}

/// How long ago `timestamp` (Unix ms) was
fn format_age(now: u64, timestamp: u64) -> String {
    format!("{} ago", format_duration(age_secs(now, timestamp)))
}

/// Format duration in human-readable form
fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}m {}s", mins, remaining_secs)
    } else if secs < 86400 {
        let hours = secs / 3600;
        let remaining_mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, remaining_mins)
    } else {
        let days = secs / 86400;
        let remaining_hours = (secs % 86400) / 3600;
        format!("{}d {}h", days, remaining_hours)
    }
}

/// Truncate a string with ellipsis if too long
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a success message in green with a checkmark prefix
pub fn print_success(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Green),
        Print("✓ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an error message in red with an X prefix
///
/// Goes to stderr.
pub fn print_error(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an informational message in cyan with an info symbol prefix
///
/// Goes to stderr so command output on stdout stays clean.
pub fn print_info(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Cyan),
        Print("ℹ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}
