//! Terminal rendering for extraction matches and comparison reports.

use lexalign_core::{EntityMatch, MismatchRecord, Report};

// ── Public API ──

pub fn print_matches(matches: &[EntityMatch]) {
    for m in matches {
        println!("{}", match_line(m));
    }
}

/// Print one diagnostic block per mismatch record.
pub fn print_mismatches(report: &Report) {
    for record in &report.mismatches {
        println!("{}", mismatch_block(record));
        println!();
    }
}

pub fn print_summary(report: &Report) {
    println!("{}", summary_text(report));
}

// ── Formatting ──

fn match_line(m: &EntityMatch) -> String {
    format!("{:<10}  {} → {}", m.tag.as_str(), m.raw, m.canonical)
}

fn mismatch_block(record: &MismatchRecord) -> String {
    format!(
        "Para {} — {} mismatch\n  {}-only: {}\n  {}-only: {}",
        record.para_number,
        record.tag,
        record.lang_a,
        value_list(&record.only_a),
        record.lang_b,
        value_list(&record.only_b),
    )
}

fn value_list<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    let quoted: Vec<String> = values.into_iter().map(|v| format!("'{v}'")).collect();
    format!("[{}]", quoted.join(", "))
}

fn summary_text(report: &Report) -> String {
    let s = &report.summary;
    let pair = match report.compared_pair() {
        Some((a, b)) => format!("{a} vs {b}: "),
        None => String::new(),
    };
    let mut out = format!(
        "{pair}{} paragraphs  green {}  yellow {}  red {}",
        s.rows, s.green, s.yellow, s.red
    );
    if s.refined > 0 {
        out.push_str(&format!("  refined {}", s.refined));
    }
    if !s.mismatches_by_tag.is_empty() {
        let tags: Vec<String> = s
            .mismatches_by_tag
            .iter()
            .map(|(tag, n)| format!("{tag}={n}"))
            .collect();
        out.push_str(&format!("\nMismatches: {}", tags.join(" ")));
    }
    out
}
