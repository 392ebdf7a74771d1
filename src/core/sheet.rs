use crate::config::SheetConfig;
use crate::domain::ports::ObjectStore;
use crate::utils::error::{MirrorError, Result};
use calamine::{open_workbook_auto_from_rs, Reader};
use std::io::Cursor;

/// Where the URLs live inside the workbook. Rows and columns are 0-based here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub sheet_name: String,
    pub column: u32,
    pub first_row: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            column: 0,
            first_row: 1,
        }
    }
}

impl SheetLayout {
    pub fn from_config(config: &SheetConfig) -> Result<Self> {
        let column = column_index(&config.column).ok_or_else(|| {
            MirrorError::InvalidConfigValueError {
                field: "sheet.column".to_string(),
                value: config.column.clone(),
                reason: "Column must be letters only, e.g. A".to_string(),
            }
        })?;

        Ok(Self {
            sheet_name: config.sheet_name.clone(),
            column,
            first_row: config.first_row.saturating_sub(1),
        })
    }
}

/// `A` -> 0, `Z` -> 25, `AA` -> 26.
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0u32, |acc, c| {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
    .map(|n| n - 1)
}

/// Reads the workbook at `key` from `store` and extracts its URL column.
pub async fn read_urls<S: ObjectStore>(
    store: &S,
    key: &str,
    layout: &SheetLayout,
) -> Result<Vec<String>> {
    let data = store.get_object(key).await?;
    tracing::debug!("Fetched workbook {} ({} bytes)", key, data.len());
    parse_url_column(key, data, layout)
}

/// Non-empty, trimmed cell texts of one column, in row order.
///
/// `key` only labels parse errors.
pub fn parse_url_column(key: &str, data: Vec<u8>, layout: &SheetLayout) -> Result<Vec<String>> {
    let parse_error = |message: String| MirrorError::ParseError {
        key: key.to_string(),
        message,
    };

    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(data)).map_err(|e| parse_error(e.to_string()))?;

    if !workbook
        .sheet_names()
        .iter()
        .any(|name| name == &layout.sheet_name)
    {
        return Err(parse_error(format!(
            "sheet '{}' not found",
            layout.sheet_name
        )));
    }

    let range = workbook
        .worksheet_range(&layout.sheet_name)
        .map_err(|e| parse_error(e.to_string()))?;

    let Some((last_row, _)) = range.end() else {
        return Ok(Vec::new());
    };

    let urls = (layout.first_row..=last_row)
        .filter_map(|row| range.get_value((row, layout.column)))
        .map(|cell| cell.to_string().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    Ok(urls)
}
