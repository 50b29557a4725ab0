//! Info command implementation

use anyhow::{Context, Result};
use clap::Args;
use fractus_shamir::{RecoverError, Share};
use std::collections::HashMap;

use crate::config::Config;
use crate::formats::{InputFormat, ShareDocument};
use crate::utils;

#[derive(Args)]
pub struct InfoCommand {
    /// Share document to analyze (use '-' for stdin)
    #[arg(value_name = "FILE", default_value = utils::STDIO)]
    pub input: String,

    /// Document format (detected from extension or content if not specified)
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormat>,

    /// Show detailed information
    #[arg(short, long)]
    pub detailed: bool,

    /// Output format for information
    #[arg(long, value_enum, default_value = "table")]
    pub output_format: InfoOutputFormat,
}

#[derive(clap::ValueEnum, Clone)]
pub enum InfoOutputFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Debug, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ShareStatus {
    Valid,
    Skipped,
    Invalid,
}

#[derive(Debug, serde::Serialize)]
struct ShareInfo {
    index: String,
    status: ShareStatus,
    base: String,
    digits: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    problem: Option<String>,
}

#[derive(Debug, serde::Serialize)]
struct ShareSetInfo {
    threshold: usize,
    declared_shares: Option<usize>,
    total_entries: usize,
    valid_shares: usize,
    skipped_entries: Vec<String>,
    shares: Vec<ShareInfo>,
    consistency_issues: Vec<String>,
    sufficient: bool,
}

impl InfoCommand {
    pub fn execute(&self, _config: &Config) -> Result<()> {
        let content = utils::read_input(&self.input)
            .with_context(|| format!("Failed to read share document: {}", self.input))?;
        let format = utils::resolve_format(self.input_format, &self.input, &content);

        let document =
            ShareDocument::parse(&content, format).context("Failed to parse share document")?;

        let set_info = analyze_document(&document);
        self.output_info(&set_info)?;

        Ok(())
    }

    fn output_info(&self, info: &ShareSetInfo) -> Result<()> {
        match self.output_format {
            InfoOutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(info)?);
            }
            InfoOutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(info)?);
            }
            InfoOutputFormat::Table => {
                self.output_table(info);
            }
        }
        Ok(())
    }

    fn output_table(&self, info: &ShareSetInfo) {
        println!("Share Set Information");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━");

        println!("Threshold (k): {}", info.threshold);
        if let Some(n) = info.declared_shares {
            println!("Declared shares (n): {}", n);
        }
        println!("Entries: {}", info.total_entries);
        println!("Valid shares: {}", info.valid_shares);

        if !info.skipped_entries.is_empty() {
            println!("Skipped entries: {}", info.skipped_entries.join(", "));
        }

        if !info.consistency_issues.is_empty() {
            println!("\n⚠️  Consistency Issues:");
            for issue in &info.consistency_issues {
                println!("  • {}", issue);
            }
        }

        if self.detailed && !info.shares.is_empty() {
            println!("\nIndividual Shares:");
            println!("┌──────────┬──────────┬──────┬──────────────┐");
            println!("│ Index    │ Status   │ Base │ Length       │");
            println!("├──────────┼──────────┼──────┼──────────────┤");

            for share in &info.shares {
                println!(
                    "│ {:<8} │ {:<8} │ {:<4} │ {:<12} │",
                    share.index,
                    format!("{:?}", share.status),
                    share.base,
                    utils::format_digits(share.digits)
                );
            }
            println!("└──────────┴──────────┴──────┴──────────────┘");
        }

        println!("\nRecovery Status:");
        if info.sufficient {
            println!(
                "✅ Sufficient shares for recovery ({} >= {})",
                info.valid_shares, info.threshold
            );
        } else {
            println!(
                "❌ Cannot recover ({} valid of {} required)",
                info.valid_shares, info.threshold
            );
        }
    }
}

fn analyze_document(document: &ShareDocument) -> ShareSetInfo {
    let mut consistency_issues = Vec::new();
    let mut skipped_entries = document.skipped.clone();
    let mut x_coord_counts = HashMap::new();

    let shares: Vec<ShareInfo> = document
        .records
        .iter()
        .map(|record| {
            let (status, problem) = match record.decode() {
                Ok(point) => {
                    *x_coord_counts.entry(point.x().clone()).or_insert(0usize) += 1;
                    (ShareStatus::Valid, None)
                }
                Err(RecoverError::InvalidIndex(index)) => {
                    skipped_entries.push(index);
                    (ShareStatus::Skipped, Some("index is not an integer".to_string()))
                }
                Err(err) => {
                    consistency_issues.push(format!("Share {}: {}", record.index, err));
                    (ShareStatus::Invalid, Some(err.to_string()))
                }
            };
            share_info(record, status, problem)
        })
        .collect();

    let mut duplicates: Vec<_> = x_coord_counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .collect();
    duplicates.sort();
    for (x, count) in duplicates {
        consistency_issues.push(format!(
            "Duplicate x-coordinate: {} (appears {} times)",
            x, count
        ));
    }

    if let Some(n) = document.keys.n {
        if n != document.records.len() + document.skipped.len() {
            consistency_issues.push(format!(
                "Document declares {} shares but contains {} entries",
                n,
                document.records.len() + document.skipped.len()
            ));
        }
    }

    let valid_shares = shares
        .iter()
        .filter(|s| s.status == ShareStatus::Valid)
        .count();
    let has_invalid = shares.iter().any(|s| s.status == ShareStatus::Invalid);
    let has_duplicates = x_coord_counts.values().any(|&count| count > 1);
    let threshold = document.keys.k;

    ShareSetInfo {
        threshold,
        declared_shares: document.keys.n,
        total_entries: document.records.len() + document.skipped.len(),
        valid_shares,
        skipped_entries,
        shares,
        consistency_issues,
        sufficient: threshold > 0 && valid_shares >= threshold && !has_invalid && !has_duplicates,
    }
}

fn share_info(record: &Share, status: ShareStatus, problem: Option<String>) -> ShareInfo {
    ShareInfo {
        index: record.index.clone(),
        status,
        base: record.base.clone(),
        digits: record.value.chars().count(),
        problem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::Keys;

    fn document(k: usize, n: Option<usize>, records: Vec<Share>) -> ShareDocument {
        ShareDocument {
            keys: Keys { n, k },
            records,
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_sufficient_document() {
        let doc = document(
            2,
            Some(3),
            vec![
                Share::new("1", "10", "4"),
                Share::new("2", "16", "ff"),
                Share::new("3", "2", "111"),
            ],
        );
        let info = analyze_document(&doc);
        assert_eq!(info.valid_shares, 3);
        assert!(info.sufficient);
        assert!(info.consistency_issues.is_empty());
    }

    #[test]
    fn test_skipped_and_invalid_shares() {
        let doc = document(
            2,
            None,
            vec![
                Share::new("1", "10", "4"),
                Share::new("two", "10", "4"),
                Share::new("3", "2", "121"),
            ],
        );
        let info = analyze_document(&doc);
        assert_eq!(info.valid_shares, 1);
        assert_eq!(info.skipped_entries, vec!["two".to_string()]);
        assert_eq!(info.consistency_issues.len(), 1);
        assert!(!info.sufficient);
        assert_eq!(info.shares[2].status, ShareStatus::Invalid);
    }

    #[test]
    fn test_duplicates_and_declared_count() {
        let doc = document(
            1,
            Some(5),
            vec![Share::new("1", "10", "4"), Share::new("01", "10", "4")],
        );
        let info = analyze_document(&doc);
        assert!(!info.sufficient);
        assert!(info
            .consistency_issues
            .iter()
            .any(|issue| issue.starts_with("Duplicate x-coordinate: 1")));
        assert!(info
            .consistency_issues
            .iter()
            .any(|issue| issue.contains("declares 5 shares")));
    }
}
