//! Subcommand implementations. Each writes its report to `out`.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use copurchase_catalog::{Catalog, FileLayout, LoadReport, LoaderOptions, ResolverOptions, load_directory, resolve};
use copurchase_orders::{parse_order_text, split_blocks};
use copurchase_session::PurchaseSession;

use crate::config::{Cli, Command};

pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Command::Catalog { json } => {
            let (catalog, report) = load_catalog(&cli.prices_dir);
            if json {
                serde_json::to_writer_pretty(&mut *out, &catalog)?;
                writeln!(out)?;
            } else {
                write_catalog(out, &catalog, &report)?;
            }
        }
        Command::Resolve { query, limit } => {
            let (catalog, _) = load_catalog(&cli.prices_dir);
            let options = ResolverOptions {
                limit,
                ..ResolverOptions::default()
            };
            let hits = resolve(&query, &catalog, &options);
            if hits.is_empty() {
                writeln!(out, "no matches for {query:?}")?;
            }
            for (rank, entry) in hits.iter().enumerate() {
                writeln!(
                    out,
                    "{:>2}. {}  {}  {} руб.  норма {} шт.",
                    rank + 1,
                    entry.name(),
                    entry.weight(),
                    entry.unit_price().grouped(),
                    entry.standard_pack_quantity()
                )?;
            }
        }
        Command::Parse { input, json } => {
            let text = read_input(&input)?;
            let outcome = parse_order_text(&text);
            if json {
                serde_json::to_writer_pretty(&mut *out, &outcome)?;
                writeln!(out)?;
            } else {
                for line in &outcome.lines {
                    writeln!(
                        out,
                        "{} | {} | {} | {}",
                        line.name, line.weight, line.unit_price, line.quantity
                    )?;
                }
                for skipped in &outcome.skipped {
                    writeln!(out, "skipped ({}): {}", skipped.reason, skipped.text)?;
                }
            }
        }
        Command::Reconcile { input, markup, json } => {
            let text = read_input(&input)?;
            let (catalog, _) = load_catalog(&cli.prices_dir);
            let session = reconcile(catalog, &text, markup.then_some(cli.markup_percent), out)?;
            let now = Utc::now();
            if json {
                serde_json::to_writer_pretty(&mut *out, &session.snapshot(now))?;
                writeln!(out)?;
            } else {
                match session.order_summary(now) {
                    Some(summary) => writeln!(out, "{summary}")?,
                    None => writeln!(out, "no orders")?,
                }
                writeln!(out)?;
                writeln!(out, "{}", session.rows_summary(now))?;
            }
        }
    }
    Ok(())
}

/// Import every block of `text` into a fresh session over `catalog`.
///
/// Blocks that fail (e.g. no customer line) are reported to `out` and skipped.
pub fn reconcile(
    catalog: Catalog,
    text: &str,
    markup_percent: Option<u32>,
    out: &mut impl Write,
) -> Result<PurchaseSession> {
    let mut session = PurchaseSession::new(catalog);
    session.set_markup(markup_percent);

    for (number, block) in split_blocks(text).iter().enumerate() {
        match session.import_pasted(block, Utc::now()) {
            Ok(report) => {
                for skipped in &report.skipped {
                    writeln!(out, "[{}] skipped ({}): {}", report.customer, skipped.reason, skipped.text)?;
                }
                for name in &report.not_found {
                    writeln!(out, "[{}] not in price list, added as is: {name}", report.customer)?;
                }
            }
            Err(err) => {
                tracing::warn!(block = number + 1, error = %err, "order block rejected");
                writeln!(out, "block {} rejected: {err}", number + 1)?;
            }
        }
    }

    Ok(session)
}

fn load_catalog(dir: &Path) -> (Catalog, LoadReport) {
    let load = load_directory(dir, &LoaderOptions::default());
    (load.catalog, load.report)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read orders from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_catalog(out: &mut impl Write, catalog: &Catalog, report: &LoadReport) -> io::Result<()> {
    for file in &report.files {
        match &file.outcome {
            Ok(summary) => {
                let layout = match summary.layout {
                    FileLayout::Headered { header_row, .. } => format!("header at row {}", header_row + 1),
                    FileLayout::Positional => "positional".to_string(),
                    FileLayout::Empty => "empty".to_string(),
                };
                writeln!(
                    out,
                    "{}: {} rows ({layout}, delimiter {:?})",
                    file.file, summary.accepted, summary.delimiter
                )?;
                for row in &summary.malformed {
                    writeln!(out, "  row {}: {}", row.row, row.defect)?;
                }
            }
            Err(err) => writeln!(out, "{}: {err}", file.file)?,
        }
    }

    writeln!(out, "{} entries", catalog.len())?;
    for entry in catalog.iter() {
        writeln!(
            out,
            "  {}  {}  {} руб.  норма {} шт.  [{}]",
            entry.name(),
            entry.weight(),
            entry.unit_price().grouped(),
            entry.standard_pack_quantity(),
            entry.source()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use copurchase_catalog::{CatalogEntry, EntrySource};
    use copurchase_core::Money;

    fn catalog() -> Catalog {
        [CatalogEntry::new("Оливки", "300 г", Money::from_cents(100_00), 10, EntrySource::Manual).unwrap()]
            .into_iter()
            .collect()
    }

    #[test]
    fn reconcile_imports_each_block() {
        let text = "Маша\nОливки 300 г 100 - 4шт\n\nОля\nОливки 300 г 100 - 3шт\nчепуха\n";
        let mut out = Vec::new();
        let session = reconcile(catalog(), text, None, &mut out).unwrap();

        assert_eq!(session.ledger().len(), 2);
        assert_eq!(session.rows().len(), 1);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("[Оля] skipped (no weight token): чепуха"));
    }

    #[test]
    fn reconcile_reports_blocks_without_orders() {
        let mut out = Vec::new();
        let session = reconcile(catalog(), "Маша\nпривет", Some(13), &mut out).unwrap();
        assert!(session.ledger().is_empty());
        assert_eq!(session.markup_percent(), Some(13));
    }
}
