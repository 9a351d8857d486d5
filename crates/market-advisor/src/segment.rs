//! Response Segmentation
//!
//! Splits a raw agent reply into the regions the dashboard renders
//! separately: news snippets, a markdown table, and advisory notes.
//!
//! Agent replies are unstructured markdown-ish text. This module classifies
//! blank-line-delimited blocks by trigger phrase ("latest news", "note:",
//! "please note") or table syntax, then extracts each region. Malformed input
//! degrades to empty or partial results; `segment` never fails.

/// Minimum news snippet length after trimming. Shorter fragments are noise
/// left over from sentence splitting.
const MIN_NEWS_CHARS: usize = 11;

const NEWS_MARKER: &str = "latest news";
const NOTE_MARKERS: [&str; 2] = ["note:", "please note"];

/// A parsed markdown table: headers plus uniform rows.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The three display regions extracted from one agent reply.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Segmentation {
    /// News snippets, in order of first appearance.
    pub news: Vec<String>,
    /// The last table found, if any block parsed into at least one row.
    pub table: Option<TableData>,
    /// All advisory blocks, concatenated with newlines.
    pub notes: String,
}

impl Segmentation {
    pub fn is_empty(&self) -> bool {
        self.news.is_empty() && self.table.is_none() && self.notes.is_empty()
    }
}

/// Split an agent reply into news, table, and notes regions.
///
/// Pure and total: any input, however malformed, yields a `Segmentation`.
/// Input with no recognizable markers yields the empty result.
pub fn segment(text: &str) -> Segmentation {
    let mut result = Segmentation::default();

    for block in blocks(text) {
        match classify(&block) {
            BlockKind::News => result.news.extend(extract_news(&block)),
            BlockKind::Table => {
                // Later tables overwrite earlier ones; a block that fails to
                // parse leaves any previous table in place.
                if let Some(table) = extract_table(&block) {
                    result.table = Some(table);
                }
            }
            BlockKind::Notes => {
                result.notes.push_str(block.trim());
                result.notes.push('\n');
            }
            BlockKind::Ignored => {}
        }
    }

    result.notes = result.notes.trim().to_string();
    result
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BlockKind {
    News,
    Table,
    Notes,
    Ignored,
}

/// Split input into classifiable blocks.
///
/// Primary split is on blank lines. When that yields a single multi-line
/// block the reply used single newlines throughout, so fall back to grouping
/// lines by marker: a news line absorbs following plain lines, contiguous
/// table lines form one block, and each notes line stands alone.
fn blocks(text: &str) -> Vec<String> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else if !is_artifact(line) {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    if blocks.len() == 1 && blocks[0].len() > 1 {
        return regroup_lines(&blocks[0]);
    }

    blocks.into_iter().map(|lines| lines.join("\n")).collect()
}

/// Line-oriented recovery for single-newline-delimited replies.
fn regroup_lines(lines: &[&str]) -> Vec<String> {
    #[derive(PartialEq)]
    enum Mode {
        None,
        News,
        Table,
    }

    let mut groups: Vec<String> = Vec::new();
    let mut mode = Mode::None;

    for line in lines {
        if contains_ignore_case(line, NEWS_MARKER) {
            groups.push((*line).to_string());
            mode = Mode::News;
        } else if line.contains('|') {
            if mode == Mode::Table {
                if let Some(last) = groups.last_mut() {
                    last.push('\n');
                    last.push_str(line);
                }
            } else {
                groups.push((*line).to_string());
                mode = Mode::Table;
            }
        } else if NOTE_MARKERS.iter().any(|m| contains_ignore_case(line, m)) {
            groups.push((*line).to_string());
            mode = Mode::None;
        } else if mode == Mode::News {
            if let Some(last) = groups.last_mut() {
                last.push(' ');
                last.push_str(line.trim());
            }
        } else {
            mode = Mode::None;
        }
    }

    groups
}

/// Internal task-transfer echoes are framework noise, not content.
fn is_artifact(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("Running:") || trimmed.contains("transfer_task_to")
}

fn classify(block: &str) -> BlockKind {
    if contains_ignore_case(block, NEWS_MARKER) {
        return BlockKind::News;
    }

    if block
        .lines()
        .any(|line| line.contains('|') && !is_separator_row(line))
    {
        return BlockKind::Table;
    }

    if NOTE_MARKERS.iter().any(|m| contains_ignore_case(block, m)) {
        return BlockKind::Notes;
    }

    BlockKind::Ignored
}

/// A row consisting only of `|`, `-`, and whitespace.
fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c == '|' || c == '-' || c.is_whitespace())
}

/// Split a news block into snippets: everything after the trigger phrase,
/// split on ". " (falling back to ", "), each fragment trimmed, short
/// fragments dropped.
fn extract_news(block: &str) -> Vec<String> {
    let text = block
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");

    let Some(idx) = find_ignore_case(&text, NEWS_MARKER) else {
        return Vec::new();
    };

    let rest = text[idx + NEWS_MARKER.len()..].trim_start();
    let rest = rest.strip_prefix(':').map_or(rest, str::trim_start);

    let candidates: Vec<&str> = if rest.contains(". ") {
        rest.split(". ").collect()
    } else if rest.contains(", ") {
        rest.split(", ").collect()
    } else {
        vec![rest]
    };

    candidates
        .into_iter()
        .map(|c| {
            c.trim_matches(|ch: char| ch.is_whitespace() || ch == '.' || ch == ',')
                .to_string()
        })
        .filter(|c| c.chars().count() >= MIN_NEWS_CHARS)
        .collect()
}

/// Parse a markdown table block. Line 0 is the header, line 1 the discarded
/// separator, the rest data rows. Ragged rows are dropped; a table with no
/// surviving rows is absent.
fn extract_table(block: &str) -> Option<TableData> {
    let lines: Vec<&str> = block.lines().filter(|l| l.contains('|')).collect();
    if lines.len() < 2 {
        return None;
    }

    let headers = split_cells(lines[0]);
    if headers.is_empty() {
        return None;
    }

    let rows: Vec<Vec<String>> = lines[2..]
        .iter()
        .map(|line| split_cells(line))
        .filter(|cells| cells.len() == headers.len())
        .collect();

    if rows.is_empty() {
        return None;
    }

    Some(TableData { headers, rows })
}

/// Split a table row on `|`, trimming cells and collapsing empty columns.
fn split_cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(String::from)
        .collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    find_ignore_case(haystack, needle).is_some()
}

/// Byte offset of the first case-insensitive match. Needles are ASCII, so a
/// match boundary is always a valid char boundary.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let result = segment("");
        assert!(result.news.is_empty());
        assert!(result.table.is_none());
        assert_eq!(result.notes, "");
        assert!(result.is_empty());
    }

    #[test]
    fn test_news_sentence_split() {
        let result = segment(
            "Latest news: Apple reported strong earnings. Google announced a new product. Short.",
        );

        assert_eq!(
            result.news,
            vec![
                "Apple reported strong earnings",
                "Google announced a new product"
            ]
        );
        assert!(result.table.is_none());
        assert_eq!(result.notes, "");
    }

    #[test]
    fn test_news_comma_fallback() {
        let result =
            segment("Latest news: Apple hit a record high, Google expanded cloud coverage");
        assert_eq!(
            result.news,
            vec!["Apple hit a record high", "Google expanded cloud coverage"]
        );
    }

    #[test]
    fn test_news_single_item() {
        let result = segment("LATEST NEWS: NVIDIA announced a new GPU architecture");
        assert_eq!(result.news, vec!["NVIDIA announced a new GPU architecture"]);
    }

    #[test]
    fn test_news_not_deduplicated() {
        let result =
            segment("Latest news: markets rallied today. Markets rallied today. Ok.");
        assert_eq!(
            result.news,
            vec!["markets rallied today", "Markets rallied today"]
        );
    }

    #[test]
    fn test_markdown_table() {
        let input = "| Ticker | Recommendation |\n|---|---|\n| AAPL | Buy |\n| GOOG | Hold |";
        let result = segment(input);

        let table = result.table.unwrap();
        assert_eq!(table.headers, vec!["Ticker", "Recommendation"]);
        assert_eq!(
            table.rows,
            vec![vec!["AAPL", "Buy"], vec!["GOOG", "Hold"]]
        );
    }

    #[test]
    fn test_ragged_row_dropped() {
        let input = "| Ticker | Rating |\n|---|---|\n| AAPL | Buy | Extra |\n| GOOG | Hold |";
        let result = segment(input);

        let table = result.table.unwrap();
        assert_eq!(table.rows, vec![vec!["GOOG", "Hold"]]);
    }

    #[test]
    fn test_table_with_no_rows_is_absent() {
        assert!(segment("| Ticker | Rating |\n|---|---|").table.is_none());
        assert!(segment("| Ticker | Rating |").table.is_none());
    }

    #[test]
    fn test_empty_columns_collapsed() {
        let input = "| Ticker || Rating |\n|---|---|\n| AAPL | | Buy |";
        let result = segment(input);

        let table = result.table.unwrap();
        assert_eq!(table.headers, vec!["Ticker", "Rating"]);
        assert_eq!(table.rows, vec![vec!["AAPL", "Buy"]]);
    }

    #[test]
    fn test_last_table_wins() {
        let input = "| A | B |\n|---|---|\n| 1 | 2 |\n\n| C | D |\n|---|---|\n| 3 | 4 |";
        let result = segment(input);

        let table = result.table.unwrap();
        assert_eq!(table.headers, vec!["C", "D"]);
    }

    #[test]
    fn test_unparseable_table_keeps_earlier() {
        let input = "| A | B |\n|---|---|\n| 1 | 2 |\n\n| lone cell |";
        let result = segment(input);

        let table = result.table.unwrap();
        assert_eq!(table.headers, vec!["A", "B"]);
    }

    #[test]
    fn test_notes_block() {
        let result = segment("Please note: data may be delayed by 15 minutes.");

        assert_eq!(result.notes, "Please note: data may be delayed by 15 minutes.");
        assert!(result.news.is_empty());
        assert!(result.table.is_none());
    }

    #[test]
    fn test_multiple_notes_concatenate() {
        let input = "Note: prices are indicative.\n\nPlease note: not financial advice.";
        let result = segment(input);

        assert_eq!(
            result.notes,
            "Note: prices are indicative.\nPlease note: not financial advice."
        );
    }

    #[test]
    fn test_notes_idempotent() {
        let first = segment("note: data sourced from a delayed feed today.");
        let second = segment(&first.notes);
        assert_eq!(first.notes, second.notes);
    }

    #[test]
    fn test_plain_prose_ignored() {
        let result = segment("The market was mixed today with tech leading gains.");
        assert!(result.is_empty());
    }

    #[test]
    fn test_artifact_lines_skipped() {
        let input = "Running: stock_quote(symbols=NVDA)\n\ntransfer_task_to_finance_ai_agent\n\nNote: quotes are real-time.";
        let result = segment(input);

        assert_eq!(result.notes, "Note: quotes are real-time.");
        assert!(result.news.is_empty());
    }

    #[test]
    fn test_mixed_blocks_in_order() {
        let input = "Latest news: Apple reported stronger than expected services revenue. Fin.\n\n| Ticker | Rating |\n|---|---|\n| AAPL | Buy |\n\nPlease note: analyst data updates overnight.";
        let result = segment(input);

        assert_eq!(
            result.news,
            vec!["Apple reported stronger than expected services revenue"]
        );
        assert_eq!(result.table.unwrap().rows, vec![vec!["AAPL", "Buy"]]);
        assert_eq!(result.notes, "Please note: analyst data updates overnight.");
    }

    #[test]
    fn test_single_newline_recovery() {
        // No blank lines anywhere: line-scan mode must still find all three
        // regions.
        let input = "Latest news: Tesla deliveries missed estimates this quarter. End.\n| Ticker | Rating |\n|---|---|\n| TSLA | Hold |\nPlease note: delivery figures are preliminary.";
        let result = segment(input);

        assert_eq!(
            result.news,
            vec!["Tesla deliveries missed estimates this quarter"]
        );
        assert_eq!(result.table.unwrap().rows, vec![vec!["TSLA", "Hold"]]);
        assert_eq!(result.notes, "Please note: delivery figures are preliminary.");
    }

    #[test]
    fn test_news_continuation_lines_absorbed() {
        let input = "Here is the latest news for Apple:\nApple reported stronger than expected services revenue. Apple expands AI features to older iPhones.\nUnrelated trailing line.";
        let result = segment(input);

        assert!(result
            .news
            .iter()
            .any(|n| n.contains("services revenue")));
        assert!(result.news.iter().any(|n| n.contains("AI features")));
    }

    #[test]
    fn test_separator_only_block_ignored() {
        let result = segment("|---|---|\n\n| - | - |");
        assert!(result.table.is_none());
        assert!(result.is_empty());
    }

    #[test]
    fn test_never_panics_on_garbage() {
        for input in [
            "|||||",
            "latest news",
            "Latest news:",
            "note:",
            "\u{0}\u{1}|\u{2}",
            "| ünïcode | ïn | çells |\n|---|---|---|\n| a | b | c |",
            "....  ,,,, ||",
            "\n\n\n\n",
        ] {
            let _ = segment(input);
        }
    }

    #[test]
    fn test_news_length_invariant() {
        let result = segment("Latest news: a. bb. ccc. a genuinely long news headline here.");
        for item in &result.news {
            assert!(item.chars().count() > 10);
        }
        assert_eq!(result.news, vec!["a genuinely long news headline here"]);
    }

    #[test]
    fn test_table_row_width_invariant() {
        let input = "| A | B | C |\n|---|---|---|\n| 1 | 2 | 3 |\n| 1 | 2 |\n| x | y | z |";
        let table = segment(input).table.unwrap();
        for row in &table.rows {
            assert_eq!(row.len(), table.headers.len());
        }
        assert_eq!(table.rows.len(), 2);
    }
}
