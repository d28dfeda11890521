//! Delimited-text reading: delimiter sniffing and quote-aware row splitting.

/// Delimiters a price file may use, in tie-break priority order.
pub const CANDIDATE_DELIMITERS: [char; 3] = [';', '\t', ','];

/// Fallback when sniffing finds no consistent delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// Guess the field delimiter from the first `window` bytes of `content`.
///
/// A candidate scores one point for every sampled line whose (quote-aware)
/// occurrence count equals that candidate's most common non-zero count. The
/// best-scoring candidate wins; ties go to the earlier candidate. Returns
/// `None` when no candidate occurs at all.
pub fn sniff_delimiter(content: &str, window: usize) -> Option<char> {
    let sample = head(content, window);
    let lines: Vec<&str> = sample.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return None;
    }

    let mut best: Option<(char, usize)> = None;
    for &delimiter in &CANDIDATE_DELIMITERS {
        let counts: Vec<usize> = lines.iter().map(|l| count_unquoted(l, delimiter)).collect();
        let Some(modal) = modal_nonzero(&counts) else {
            continue;
        };
        let score = counts.iter().filter(|&&c| c == modal).count();
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((delimiter, score));
        }
    }
    best.map(|(d, _)| d)
}

/// Split `content` into rows of fields.
///
/// Handles double-quoted fields (with `""` escapes), quoted line breaks, and
/// `\r\n` / `\r` line endings. Blank lines yield no row.
pub fn split_rows(content: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;

    let mut chars = content.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => {
                in_quotes = true;
                field_started = true;
            }
            c if c == delimiter => {
                row.push(std::mem::take(&mut field));
                field_started = true;
            }
            '\r' | '\n' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                finish_row(&mut rows, &mut row, &mut field, field_started);
                field_started = false;
            }
            c => {
                field.push(c);
                field_started = true;
            }
        }
    }
    finish_row(&mut rows, &mut row, &mut field, field_started);
    rows
}

fn finish_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>, field: &mut String, started: bool) {
    if started || !row.is_empty() {
        row.push(std::mem::take(field));
        rows.push(std::mem::take(row));
    }
    field.clear();
}

fn head(content: &str, window: usize) -> &str {
    if content.len() <= window {
        return content;
    }
    let mut end = window;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

fn count_unquoted(line: &str, delimiter: char) -> usize {
    let mut in_quotes = false;
    line.chars()
        .filter(|&c| {
            if c == '"' {
                in_quotes = !in_quotes;
            }
            !in_quotes && c == delimiter
        })
        .count()
}

fn modal_nonzero(counts: &[usize]) -> Option<usize> {
    let mut tally: Vec<(usize, usize)> = Vec::new();
    for &c in counts.iter().filter(|&&c| c > 0) {
        match tally.iter_mut().find(|(value, _)| *value == c) {
            Some((_, n)) => *n += 1,
            None => tally.push((c, 1)),
        }
    }
    tally
        .into_iter()
        .fold(None, |best: Option<(usize, usize)>, (value, n)| match best {
            Some((_, bn)) if bn >= n => best,
            _ => Some((value, n)),
        })
        .map(|(value, _)| value)
}
