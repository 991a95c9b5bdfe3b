use crate::config::ReportFormat;
use crate::report::{percent, Report};
use std::fmt::Write;

pub fn render(report: &Report, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(report),
        ReportFormat::Markdown => Ok(render_markdown(report)),
        ReportFormat::Text => Ok(render_text(report)),
    }
}

pub fn render_text(r: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Simulation summary ({})", r.generated_at.to_rfc3339());
    let _ = writeln!(
        out,
        "  attempts: {}  successes: {}  failures: {}  skipped: {}  simulated: {}",
        r.total_attempts, r.successes, r.failures, r.skipped, r.simulated
    );
    let _ = writeln!(
        out,
        "  exploitation: {} ({}%)  exploration: {} ({}%)",
        r.exploitation,
        percent(r.exploitation, r.total_attempts),
        r.exploration,
        percent(r.exploration, r.total_attempts)
    );

    if !r.by_status.is_empty() {
        let _ = writeln!(out, "  statuses:");
        for (status, count) in &r.by_status {
            let _ = writeln!(out, "    {:<12} {}", status.as_str(), count);
        }
    }

    if !r.per_connector.is_empty() {
        let _ = writeln!(out, "  connectors:");
        for (name, s) in &r.per_connector {
            let _ = writeln!(
                out,
                "    {:<24} attempts={:<5} ok={:<5} failed={:<5} success={}%",
                name, s.attempts, s.successes, s.failures, s.success_pct
            );
        }
    }

    if !r.per_phase.is_empty() {
        let _ = writeln!(out, "  phases:");
        for (phase, s) in &r.per_phase {
            let _ = writeln!(
                out,
                "    {:<16} attempts={:<5} success={}% exploitation={} exploration={}",
                phase.as_str(),
                s.attempts,
                percent(s.successes, s.attempts),
                s.exploitation,
                s.exploration
            );
        }
    }

    if !r.top_errors.is_empty() {
        let _ = writeln!(out, "  top errors:");
        for e in &r.top_errors {
            let _ = writeln!(out, "    {:>4}x {}", e.count, e.message);
        }
    }

    if let Some(narrative) = &r.narrative {
        let _ = writeln!(out, "\n{}", narrative.trim_end());
    }
    out
}

pub fn render_markdown(r: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Routing simulation report\n");
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Attempts | {} |", r.total_attempts);
    let _ = writeln!(out, "| Successes | {} |", r.successes);
    let _ = writeln!(out, "| Failures | {} |", r.failures);
    let _ = writeln!(out, "| Skipped | {} |", r.skipped);
    let _ = writeln!(out, "| Simulated executions | {} |", r.simulated);
    let _ = writeln!(out, "| Exploitation | {} |", r.exploitation);
    let _ = writeln!(out, "| Exploration | {} |", r.exploration);

    if !r.per_connector.is_empty() {
        let _ = writeln!(out, "\n## Connectors\n");
        let _ = writeln!(out, "| Connector | Attempts | Successes | Failures | Success % |");
        let _ = writeln!(out, "|---|---|---|---|---|");
        for (name, s) in &r.per_connector {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                name, s.attempts, s.successes, s.failures, s.success_pct
            );
        }
    }

    if !r.per_phase.is_empty() {
        let _ = writeln!(out, "\n## Phases\n");
        let _ = writeln!(out, "| Phase | Attempts | Success % | Exploitation | Exploration |");
        let _ = writeln!(out, "|---|---|---|---|---|");
        for (phase, s) in &r.per_phase {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                phase.as_str(),
                s.attempts,
                percent(s.successes, s.attempts),
                s.exploitation,
                s.exploration
            );
        }
    }

    if !r.top_errors.is_empty() {
        let _ = writeln!(out, "\n## Most common errors\n");
        for e in &r.top_errors {
            let _ = writeln!(out, "- {} ({})", e.message, e.count);
        }
    }

    if let Some(narrative) = &r.narrative {
        let _ = writeln!(out, "\n## Analysis\n\n{}", narrative.trim_end());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::summarize;

    #[test]
    fn empty_report_renders_in_every_format() {
        let r = summarize(&[]);
        assert!(render_text(&r).contains("attempts: 0"));
        assert!(render_markdown(&r).contains("| Attempts | 0 |"));
        let json = render(&r, ReportFormat::Json).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["total_attempts"], 0);
        assert!(v["narrative"].is_null());
    }
}
