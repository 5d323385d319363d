//! Text output formatter

use crate::commands::lint::FileResult;

pub fn output_text(results: &[FileResult], timings: bool) {
    for result in results {
        if result.diagnostics.is_empty() {
            continue;
        }

        println!("\n{}:", result.path.display());
        for diag in &result.diagnostics {
            // 1-based, like compiler output.
            println!(
                "  {}:{} {} {}",
                diag.span.from.line + 1,
                diag.span.from.column + 1,
                diag.severity,
                diag.message
            );
        }
    }

    let total_files = results.len();
    let total_issues: usize = results.iter().map(|r| r.diagnostics.len()).sum();

    println!();
    println!("Checked {} files, found {} issues", total_files, total_issues);

    if timings {
        output_timings(results);
    }
}

fn output_timings(results: &[FileResult]) {
    if results.is_empty() {
        return;
    }

    let mut sorted: Vec<_> = results.iter().collect();
    sorted.sort_by(|a, b| b.report.elapsed.cmp(&a.report.elapsed));

    println!("\nPerformance Timings:");
    println!("{:<40} | {:<15}", "File", "Duration");
    println!("{:-<40}-+-{:-<15}", "", "");
    for result in sorted {
        println!(
            "{:<40} | {:<15?}",
            result.path.display().to_string(),
            result.report.elapsed
        );
    }
}
