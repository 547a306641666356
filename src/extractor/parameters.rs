use super::predicates::element_text;
use crate::models::ParameterRecord;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th, td").unwrap());

/// Column headers recognised by name, in positional-fallback order.
const COLUMNS: [&str; 4] = ["name", "description", "type", "required"];

/// Column index for each field of a [`ParameterRecord`]; `None` reads as "".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    name: Option<usize>,
    description: Option<usize>,
    param_type: Option<usize>,
    required: Option<usize>,
}

impl ColumnMap {
    /// Matching header text wins; anything unmatched keeps its positional
    /// column. An empty header row maps nothing.
    fn from_headers(headers: &[String]) -> Self {
        let [name, description, param_type, required] = std::array::from_fn(|position| {
            if headers.is_empty() {
                return None;
            }
            let named = headers.iter().position(|header| header == COLUMNS[position]);
            Some(named.unwrap_or(position))
        });
        Self {
            name,
            description,
            param_type,
            required,
        }
    }
}

/// Parse a parameter table. The first row is taken as the header row; every
/// later row with at least one cell becomes a record, missing cells as "".
pub fn parse_parameter_table(table: ElementRef<'_>) -> Vec<ParameterRecord> {
    let mut rows = table.select(&ROW);
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };

    let headers: Vec<String> = header_row
        .select(&CELL)
        .map(|cell| element_text(cell).to_lowercase())
        .collect();
    let columns = ColumnMap::from_headers(&headers);

    rows.filter_map(|row| {
        let cells: Vec<String> = row.select(&CELL).map(element_text).collect();
        if cells.is_empty() {
            return None;
        }
        let cell = |idx: Option<usize>| {
            idx.and_then(|idx| cells.get(idx))
                .cloned()
                .unwrap_or_default()
        };
        Some(ParameterRecord {
            name: cell(columns.name),
            description: cell(columns.description),
            param_type: cell(columns.param_type),
            required: cell(columns.required),
        })
    })
    .collect()
}
