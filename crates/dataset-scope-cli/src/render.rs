use colored::*;
use dataset_scope_core::{CsvSummary, ScanReport};

pub fn print_summary(summary: &CsvSummary) {
    println!("{}", summary.filename.bold());

    if let Some(error) = &summary.error {
        println!("  {} {}", "error:".red().bold(), error);
        return;
    }

    println!(
        "  {} rows, {} columns",
        summary.row_count.to_string().cyan(),
        summary.column_count.to_string().cyan()
    );
    println!("  columns: {}", summary.columns.join(", "));

    let Some(fl) = &summary.function_list else {
        println!("  functionList: {}", "absent".dimmed());
        return;
    };

    println!(
        "  functionList: {} distinct functions, {} calls in {} rows, {} normal QA rows",
        fl.unique_count().to_string().green(),
        fl.total_calls().to_string().green(),
        fl.function_call_rows.to_string().green(),
        fl.normal_qa_count.to_string().yellow(),
    );
    if fl.unparseable_count > 0 {
        println!(
            "    ({} normal QA rows could not be decoded)",
            fl.unparseable_count.to_string().red()
        );
    }

    let width = fl
        .function_counts
        .iter()
        .map(|fc| fc.name.len())
        .max()
        .unwrap_or(0);
    for fc in &fl.function_counts {
        println!("    {:<width$}  {}", fc.name, fc.count, width = width);
    }
}

pub fn print_report(report: &ScanReport) {
    if report.summaries.is_empty() {
        println!(
            "No CSV files found in {}",
            report.dataset_dir.display().to_string().yellow()
        );
        return;
    }

    for summary in &report.summaries {
        print_summary(summary);
        println!();
    }

    let totals = &report.totals;
    println!(
        "{} files, {} with functionList, {} errors; {} function-call rows, {} normal QA rows",
        totals.files.to_string().cyan(),
        totals.files_with_function_list.to_string().cyan(),
        totals.files_with_errors.to_string().red(),
        totals.function_call_rows.to_string().green(),
        totals.normal_qa_rows.to_string().yellow(),
    );
}
