use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};

use alertsift_analysis::{Clustering, SimilarPair};

pub fn print_header(title: &str) {
    let width = title.len() + 6;
    let border = "─".repeat(width);
    println!();
    println!("  ╭{}╮", border.cyan());
    println!("  │   {}   │", title.bright_cyan().bold());
    println!("  ╰{}╯", border.cyan());
    println!();
}

fn build_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold))
        .collect();
    table.set_header(cells);
    table
}

const PAIR_PREVIEW_ROWS: usize = 15;

pub fn print_pair_report(pairs: &[SimilarPair], written_to: &str) {
    print_header("Similar pairs");
    if pairs.is_empty() {
        println!("  {}", "No pairs above the threshold".dimmed());
        return;
    }
    let mut table = build_table(&["First", "Second", "Score"]);
    for pair in pairs.iter().take(PAIR_PREVIEW_ROWS) {
        table.add_row(vec![
            pair.first.clone(),
            pair.second.clone(),
            pair.score.to_string(),
        ]);
    }
    println!("{table}");
    if pairs.len() > PAIR_PREVIEW_ROWS {
        println!(
            "  {}",
            format!("… and {} more", pairs.len() - PAIR_PREVIEW_ROWS).dimmed()
        );
    }
    println!(
        "  {} {} pairs written to {}",
        "✓".green().bold(),
        pairs.len(),
        written_to
    );
}

pub fn print_cluster_report(clustering: &Clustering) {
    println!("Found {} clusters", clustering.cluster_count());
    if clustering.cluster_count() == 0 {
        return;
    }
    println!(
        "Median {} queries per cluster\n",
        clustering.median_cluster_size()
    );

    for label in 0..clustering.cluster_count() {
        println!("{}", format!("Cluster {label}").bold());
        println!("{}", "--------".dimmed());
        for query in clustering.cluster_queries(label) {
            println!("{query}");
        }
        println!();
    }
}
