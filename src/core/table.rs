// LogTab - core/table.rs
//
// First-table extraction from HTML documents.
// Core layer: accepts document text, never touches the filesystem.
//
// Rules:
//   - Tables are taken in document order. Hidden tables and tables without
//     rows are skipped; the first remaining one wins.
//   - Row order is <thead>, then body rows (<tbody> or bare <tr>), then
//     <tfoot>. Rows of nested tables stay with their own table.
//   - colspan / rowspan are expanded by repeating the cell text. Spans are
//     clamped to 1..=MAX_CELL_SPAN, so `rowspan="0"` (HTML's "to the end of
//     the section") covers one row only.
//   - Header comes from <thead>, else from leading all-<th> rows. Without a
//     header the columns are numbered from 0.

use crate::core::model::Table;
use crate::util::constants::MAX_CELL_SPAN;
use crate::util::error::TableError;
use scraper::{ElementRef, Html, Node};
use std::collections::HashMap;
use std::path::Path;

/// Extract the first table of `html`.
///
/// `source` is only used for error context and log fields.
pub fn extract_first_table(html: &str, source: &Path) -> Result<Table, TableError> {
    let document = Html::parse_document(html);

    let tables = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "table");

    for (index, table) in tables.enumerate() {
        if is_hidden(&table) {
            tracing::debug!(file = %source.display(), index, "Skipping hidden table");
            continue;
        }
        if let Some(extracted) = build_table(&table) {
            tracing::debug!(
                file = %source.display(),
                index,
                columns = extracted.columns.len(),
                rows = extracted.len(),
                "Table extracted"
            );
            return Ok(extracted);
        }
        tracing::debug!(file = %source.display(), index, "Skipping table without rows");
    }

    Err(TableError::NoTables {
        path: source.to_path_buf(),
    })
}

// =============================================================================
// Row collection
// =============================================================================

#[derive(Debug)]
struct RawCell {
    text: String,
    is_header: bool,
    colspan: usize,
    rowspan: usize,
}

type RawRow = Vec<RawCell>;

/// Rows of one table grouped by section, ignoring nested tables.
#[derive(Debug, Default)]
struct Sections {
    head: Vec<RawRow>,
    body: Vec<RawRow>,
    foot: Vec<RawRow>,
}

fn child_elements<'a>(el: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

fn collect_sections(table: &ElementRef<'_>) -> Sections {
    let mut sections = Sections::default();

    for child in child_elements(table) {
        if is_hidden(&child) {
            continue;
        }
        match child.value().name() {
            "thead" => sections.head.extend(collect_rows(&child)),
            "tbody" => sections.body.extend(collect_rows(&child)),
            "tfoot" => sections.foot.extend(collect_rows(&child)),
            "tr" => sections.body.extend(read_row(&child)),
            _ => {}
        }
    }

    sections
}

fn collect_rows(section: &ElementRef<'_>) -> Vec<RawRow> {
    child_elements(section)
        .filter(|el| el.value().name() == "tr")
        .filter_map(|tr| read_row(&tr))
        .collect()
}

/// Read the visible cells of one `<tr>`. Hidden rows yield `None`.
fn read_row(tr: &ElementRef<'_>) -> Option<RawRow> {
    if is_hidden(tr) {
        return None;
    }
    let cells = child_elements(tr)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .filter(|el| !is_hidden(el))
        .map(|cell| RawCell {
            text: cell_text(&cell),
            is_header: cell.value().name() == "th",
            colspan: span_attr(&cell, "colspan"),
            rowspan: span_attr(&cell, "rowspan"),
        })
        .collect();
    Some(cells)
}

fn span_attr(cell: &ElementRef<'_>, name: &str) -> usize {
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_CELL_SPAN)
}

/// True when the element carries an inline `display: none` style.
fn is_hidden(el: &ElementRef<'_>) -> bool {
    el.value().attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        compact.contains("display:none")
    })
}

/// Visible text of a cell with whitespace runs collapsed to one space.
fn cell_text(cell: &ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_visible_text(cell, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_visible_text(el: &ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                if element.name() == "br" {
                    out.push(' ');
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    if !is_hidden(&child_el) {
                        push_visible_text(&child_el, out);
                    }
                }
            }
            _ => {}
        }
    }
}

// =============================================================================
// Grid expansion
// =============================================================================

#[derive(Debug, Clone)]
struct Carry {
    text: String,
    is_header: bool,
    remaining: usize,
}

/// One expanded row.
#[derive(Debug)]
struct GridRow {
    cells: Vec<String>,
    /// Row came from `<thead>`.
    in_head: bool,
    /// Every cell, carried ones included, was a `<th>`.
    all_header: bool,
}

/// Emit the row-spanned cells that continue at `*col`, advancing past them.
fn take_carries(
    carries: &mut [Option<Carry>],
    col: &mut usize,
    cells: &mut Vec<String>,
    all_header: &mut bool,
) {
    while let Some(Some(carry)) = carries.get_mut(*col) {
        cells.push(carry.text.clone());
        *all_header &= carry.is_header;
        carry.remaining -= 1;
        if carry.remaining == 0 {
            carries[*col] = None;
        }
        *col += 1;
    }
}

/// Emit every row-spanned cell at or right of `col` once a row's own cells
/// are exhausted. Columns without a carry up to the last one become `""`.
fn take_trailing_carries(
    carries: &mut [Option<Carry>],
    mut col: usize,
    cells: &mut Vec<String>,
    all_header: &mut bool,
) {
    let Some(last) = carries.iter().rposition(Option::is_some) else {
        return;
    };
    while col <= last {
        if carries[col].is_some() {
            take_carries(carries, &mut col, cells, all_header);
        } else {
            cells.push(String::new());
            *all_header = false;
            col += 1;
        }
    }
}

/// Expand colspan / rowspan. Row spans carry across section boundaries in
/// the order the rows are given. Rows that end up with no cells are dropped.
fn expand_spans(rows: Vec<(bool, RawRow)>) -> Vec<GridRow> {
    let mut carries: Vec<Option<Carry>> = Vec::new();
    let mut grid = Vec::with_capacity(rows.len());

    for (in_head, row) in rows {
        let mut cells: Vec<String> = Vec::new();
        let mut all_header = !row.is_empty();
        let mut col = 0usize;

        for cell in row {
            take_carries(&mut carries, &mut col, &mut cells, &mut all_header);
            all_header &= cell.is_header;
            for _ in 0..cell.colspan {
                if cell.rowspan > 1 {
                    if carries.len() <= col {
                        carries.resize(col + 1, None);
                    }
                    carries[col] = Some(Carry {
                        text: cell.text.clone(),
                        is_header: cell.is_header,
                        remaining: cell.rowspan - 1,
                    });
                }
                cells.push(cell.text.clone());
                col += 1;
            }
        }
        take_trailing_carries(&mut carries, col, &mut cells, &mut all_header);

        if cells.is_empty() {
            continue;
        }
        grid.push(GridRow {
            cells,
            in_head,
            all_header,
        });
    }

    grid
}

// =============================================================================
// Table assembly
// =============================================================================

fn build_table(table: &ElementRef<'_>) -> Option<Table> {
    let sections = collect_sections(table);
    let has_head = !sections.head.is_empty();

    let ordered: Vec<(bool, RawRow)> = sections
        .head
        .into_iter()
        .map(|row| (true, row))
        .chain(sections.body.into_iter().map(|row| (false, row)))
        .chain(sections.foot.into_iter().map(|row| (false, row)))
        .collect();

    let grid = expand_spans(ordered);
    if grid.is_empty() {
        return None;
    }

    // Header: explicit <thead> rows, or leading rows made only of <th>.
    let header_len = if has_head {
        grid.iter().take_while(|row| row.in_head).count()
    } else {
        grid.iter().take_while(|row| row.all_header).count()
    };

    let width = grid.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    let (header, body) = grid.split_at(header_len);

    let columns = header_labels(header, width);
    let rows = body
        .iter()
        .map(|row| {
            let mut cells = row.cells.clone();
            cells.resize(width, String::new());
            cells
        })
        .collect();

    Some(Table { columns, rows })
}

/// Derive one label per column from the header rows.
fn header_labels(header: &[GridRow], width: usize) -> Vec<String> {
    if header.is_empty() {
        return (0..width).map(|i| i.to_string()).collect();
    }

    let labels = (0..width).map(|col| {
        let mut parts: Vec<&str> = Vec::new();
        for row in header {
            if let Some(text) = row.cells.get(col) {
                if !text.is_empty() && !parts.contains(&text.as_str()) {
                    parts.push(text);
                }
            }
        }
        if parts.is_empty() {
            format!("Unnamed: {col}")
        } else {
            parts.join(" ")
        }
    });

    dedupe_labels(labels)
}

/// Suffix repeated labels with `.1`, `.2`, ... in order of appearance.
fn dedupe_labels(labels: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::new();

    for label in labels {
        let mut candidate = label.clone();
        while let Some(n) = seen.get(&candidate).copied() {
            seen.insert(candidate.clone(), n + 1);
            candidate = format!("{label}.{}", n + 1);
        }
        seen.insert(candidate.clone(), 0);
        out.push(candidate);
    }

    out
}
