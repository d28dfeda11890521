//! Catalog Loader: a directory of delimited price files → [`Catalog`].
//!
//! Loading is never fatal. A bad row is skipped and reported as a
//! [`MalformedRow`]; a file that cannot be read is skipped and reported as a
//! [`LoadError`]; a missing directory is created and yields an empty catalog.
//! Every file gets a [`FileReport`] so callers can surface diagnostics.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use copurchase_core::Money;

use crate::columns::{ColumnMap, detect_columns, looks_like_header};
use crate::delimited::{DEFAULT_DELIMITER, sniff_delimiter, split_rows};
use crate::entry::{Catalog, CatalogEntry, EntrySource};
use crate::weight::{DEFAULT_UNIT_SUFFIX, normalize_weight};

/// First-cell values that mark a header line in headerless (positional) files.
const POSITIONAL_HEADER_WORDS: [&str; 7] = ["наименование", "название", "name", "товар", "product", "№", "#"];

/// Tunables for [`load_directory`].
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Bytes of each file inspected when sniffing the delimiter.
    pub sniff_window: usize,
    /// How many leading rows are searched for a header row.
    pub header_scan_rows: usize,
    /// Appended to header-mode weights that carry no unit.
    pub default_weight_suffix: String,
    /// Lowercase file extensions that are treated as price files.
    pub extensions: Vec<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            sniff_window: 4096,
            header_scan_rows: 20,
            default_weight_suffix: DEFAULT_UNIT_SUFFIX.to_string(),
            extensions: vec!["csv".to_string(), "txt".to_string()],
        }
    }
}

/// A whole file was skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {file}: {source}")]
    UnreadableFile {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a data row was excluded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowDefect {
    #[error("name column is missing or empty")]
    MissingName,
    #[error("price {0:?} is not a number")]
    UnparseablePrice(String),
    #[error("price {0:?} is not positive")]
    NonPositivePrice(String),
    #[error("pack quantity {0:?} is not a whole number")]
    UnparseableQuantity(String),
    #[error("rejected: {0}")]
    Rejected(String),
}

/// A skipped data row (1-based row number within the split file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    pub row: usize,
    pub defect: RowDefect,
}

/// How a file's columns were interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLayout {
    /// Header found at the given 0-based row; roles mapped by keyword.
    Headered { header_row: usize, columns: ColumnMap },
    /// No header: `name; weight; price; standard quantity`.
    Positional,
    /// The file had no content.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub delimiter: char,
    pub layout: FileLayout,
    pub accepted: usize,
    pub malformed: Vec<MalformedRow>,
}

#[derive(Debug)]
pub struct FileReport {
    pub file: String,
    pub outcome: Result<FileSummary, LoadError>,
}

/// Per-file diagnostics for one load pass, in processing order.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub files: Vec<FileReport>,
}

impl LoadReport {
    /// Rows accepted across all files (before key de-duplication).
    pub fn rows_accepted(&self) -> usize {
        self.files
            .iter()
            .filter_map(|f| f.outcome.as_ref().ok())
            .map(|s| s.accepted)
            .sum()
    }

    pub fn unreadable(&self) -> impl Iterator<Item = &LoadError> {
        self.files.iter().filter_map(|f| f.outcome.as_ref().err())
    }
}

/// Result of a load pass: the new catalog plus its diagnostics.
#[derive(Debug)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    pub report: LoadReport,
}

/// Load every price file in `dir`, in sorted file-name order.
///
/// A later file (or a later row) overwrites an earlier entry with the same key.
/// The returned catalog is built from scratch; callers swap it in only once the
/// whole pass has finished.
pub fn load_directory(dir: &Path, options: &LoaderOptions) -> CatalogLoad {
    let mut catalog = Catalog::new();
    let mut report = LoadReport::default();

    if !dir.exists() {
        if let Err(err) = fs::create_dir_all(dir) {
            warn!(dir = %dir.display(), error = %err, "cannot create price directory");
        } else {
            info!(dir = %dir.display(), "created empty price directory");
        }
        return CatalogLoad { catalog, report };
    }

    let files = match price_files(dir, options) {
        Ok(files) => files,
        Err(err) => {
            warn!(dir = %dir.display(), error = %err, "cannot list price directory");
            return CatalogLoad { catalog, report };
        }
    };

    for path in files {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let outcome = match fs::read_to_string(&path) {
            Ok(content) => {
                let summary = load_text(&content, &file, options, &mut catalog);
                info!(
                    file = %file,
                    accepted = summary.accepted,
                    malformed = summary.malformed.len(),
                    "price file loaded"
                );
                Ok(summary)
            }
            Err(source) => {
                warn!(file = %file, error = %source, "skipping unreadable price file");
                Err(LoadError::UnreadableFile { file: file.clone(), source })
            }
        };
        report.files.push(FileReport { file, outcome });
    }

    info!(entries = catalog.len(), files = report.files.len(), "catalog load finished");
    CatalogLoad { catalog, report }
}

/// Parse one file's text and merge its entries into `catalog`.
///
/// Entries from this file are staged first and merged at the end, so the
/// catalog only ever sees complete, validated entries.
pub fn load_text(content: &str, file: &str, options: &LoaderOptions, catalog: &mut Catalog) -> FileSummary {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return FileSummary {
            delimiter: DEFAULT_DELIMITER,
            layout: FileLayout::Empty,
            accepted: 0,
            malformed: Vec::new(),
        };
    }

    let delimiter = sniff_delimiter(content, options.sniff_window).unwrap_or(DEFAULT_DELIMITER);
    let rows = split_rows(content, delimiter);
    let source = EntrySource::File(file.to_string());

    let header = rows
        .iter()
        .take(options.header_scan_rows)
        .position(|row| looks_like_header(row))
        .and_then(|i| detect_columns(&rows[i]).map(|columns| (i, columns)));

    let (layout, staged) = match header {
        Some((header_row, columns)) => (
            FileLayout::Headered { header_row, columns },
            headered_rows(&rows, header_row, columns, options, &source),
        ),
        None => (FileLayout::Positional, positional_rows(&rows, &source)),
    };

    let mut summary = FileSummary {
        delimiter,
        layout,
        accepted: 0,
        malformed: Vec::new(),
    };
    for staged_row in staged {
        match staged_row {
            Ok(entry) => {
                catalog.insert(entry);
                summary.accepted += 1;
            }
            Err(bad) => {
                debug!(file = %file, row = bad.row, defect = %bad.defect, "skipping malformed row");
                summary.malformed.push(bad);
            }
        }
    }
    summary
}

type StagedRow = Result<CatalogEntry, MalformedRow>;

fn headered_rows(
    rows: &[Vec<String>],
    header_row: usize,
    columns: ColumnMap,
    options: &LoaderOptions,
    source: &EntrySource,
) -> Vec<StagedRow> {
    rows.iter()
        .enumerate()
        .skip(header_row + 1)
        .filter(|(_, row)| row.first().is_some_and(|c| is_ordinal(c)))
        .map(|(i, row)| {
            let weight = columns
                .weight
                .and_then(|wi| row.get(wi))
                .map(|raw| normalize_weight(raw, &options.default_weight_suffix))
                .unwrap_or_default();
            build_entry(
                i + 1,
                row.get(columns.name).map(String::as_str),
                &weight,
                row.get(columns.price).map(String::as_str),
                columns.pack_quantity.and_then(|qi| row.get(qi)).map(String::as_str),
                source,
            )
        })
        .collect()
}

fn positional_rows(rows: &[Vec<String>], source: &EntrySource) -> Vec<StagedRow> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| {
            let first = row.first().map(|c| c.trim()).unwrap_or_default();
            !first.is_empty() && !POSITIONAL_HEADER_WORDS.contains(&first.to_lowercase().as_str())
        })
        .map(|(i, row)| {
            let weight = row.get(1).map(|w| w.trim()).unwrap_or_default();
            build_entry(
                i + 1,
                row.first().map(String::as_str),
                weight,
                row.get(2).map(String::as_str),
                row.get(3).map(String::as_str),
                source,
            )
        })
        .collect()
}

fn build_entry(
    row: usize,
    name: Option<&str>,
    weight: &str,
    price: Option<&str>,
    pack_quantity: Option<&str>,
    source: &EntrySource,
) -> StagedRow {
    let malformed = |defect| MalformedRow { row, defect };

    let name = name.map(|n| n.replace(['\r', '\n'], " ")).unwrap_or_default();
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed(RowDefect::MissingName));
    }

    let raw_price = price.unwrap_or_default().trim();
    let unit_price =
        Money::parse_decimal(raw_price).ok_or_else(|| malformed(RowDefect::UnparseablePrice(raw_price.to_string())))?;
    if !unit_price.is_positive() {
        return Err(malformed(RowDefect::NonPositivePrice(raw_price.to_string())));
    }

    let quantity = parse_pack_quantity(pack_quantity)
        .ok_or_else(|| malformed(RowDefect::UnparseableQuantity(pack_quantity.unwrap_or_default().trim().to_string())))?;

    CatalogEntry::new(name, weight, unit_price, quantity, source.clone())
        .map_err(|err| malformed(RowDefect::Rejected(err.to_string())))
}

/// Absent, blank or zero → 1; anything that is not a whole number → `None`.
fn parse_pack_quantity(raw: Option<&str>) -> Option<u32> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Some(1);
    }
    raw.parse::<u32>().ok().map(|q| q.max(1))
}

fn is_ordinal(cell: &str) -> bool {
    let cell = cell.trim();
    !cell.is_empty() && cell.chars().all(|c| c.is_ascii_digit())
}

fn price_files(dir: &Path, options: &LoaderOptions) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| options.extensions.iter().any(|e| *e == ext))
        })
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
