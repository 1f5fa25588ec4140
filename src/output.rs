//! Human and JSON rendering for scan and search results.

use crate::index::ReindexSummary;
use crate::search::SearchStats;
use crate::store::Scan;
use crate::utils;
use colored::*;
use std::path::Path;

pub fn print_reindex_summary(summary: &ReindexSummary) {
    println!(
        "{} {} files indexed across {} folders",
        "Scan complete:".green().bold(),
        summary.total_files.to_string().cyan(),
        summary.total_folders.to_string().cyan()
    );
}

pub fn print_search_results(stats: &SearchStats, term: &str) {
    println!();
    println!("{}", format!("Folders containing \"{}\"", term).bold());
    println!("{}", "─".repeat(60));
    if stats.folders_with_file.is_empty() {
        println!("  {}", "no matches".yellow());
    }
    for folder in &stats.folders_with_file {
        println!(
            "{} {}",
            "✓".green(),
            utils::display_path(Path::new(&folder.folder_path))
        );
        for file in &folder.found_files {
            println!(
                "    {} ({})",
                file.name,
                bytesize::to_string(file.size, true)
            );
        }
    }

    println!();
    println!("{}", format!("Folders without \"{}\"", term).bold());
    println!("{}", "─".repeat(60));
    for folder in &stats.folders_without_file {
        println!(
            "{} {}",
            "✗".red(),
            utils::display_path(Path::new(&folder.folder_path)).dimmed()
        );
    }

    println!();
    println!(
        "{} folders scanned: {} with matches, {} without, {} files found",
        stats.total_folders_scanned,
        stats.total_folders_with_file.to_string().green(),
        stats.total_folders_without_file.to_string().red(),
        stats.total_files_found.to_string().cyan()
    );
}

pub fn print_scan_status(scan: &Scan) {
    println!(
        "{}",
        utils::display_path(Path::new(&scan.root_path)).bold()
    );
    println!("  scan id:    {}", scan.id);
    println!(
        "  indexed at: {}",
        scan.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  folders:    {}", scan.total_folders);
    println!("  files:      {}", scan.total_files);
}

pub fn print_scan_list(scans: &[Scan]) {
    if scans.is_empty() {
        println!("{}", "No folders indexed yet.".yellow());
        return;
    }
    for scan in scans {
        println!(
            "{}  {} folders, {} files, indexed {}",
            utils::display_path(Path::new(&scan.root_path)).bold(),
            scan.total_folders,
            scan.total_files,
            scan.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
