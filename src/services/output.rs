use crate::domain::models::{JsonOut, VerifyReport};
use serde::Serialize;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

/// Prints suite reports; `ok` in the JSON envelope mirrors the verdict.
pub fn print_reports(json: bool, reports: &[VerifyReport]) -> anyhow::Result<()> {
    let ok = reports.iter().all(VerifyReport::is_ok);
    if json {
        let out = match reports {
            [single] => serde_json::to_string_pretty(&JsonOut { ok, data: single })?,
            _ => serde_json::to_string_pretty(&JsonOut { ok, data: reports })?,
        };
        println!("{}", out);
        return Ok(());
    }

    for report in reports {
        for c in &report.checks {
            match &c.detail {
                Some(detail) => println!("{}\t{}\t{}", c.status.as_str(), c.name, detail),
                None => println!("{}\t{}", c.status.as_str(), c.name),
            }
        }
        println!("{}", summary_line(report));
    }
    Ok(())
}

pub fn summary_line(report: &VerifyReport) -> String {
    format!(
        "{}: {} ({} passed, {} failed, {} skipped)",
        report.suite, report.overall, report.passed, report.failed, report.skipped
    )
}
