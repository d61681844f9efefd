use crate::error::{Result, StudioError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_PINNED: usize = 5;

const STANDARD_COLUMNS: &[&str] = &["Title", "Format", "Platform", "Hook", "Notes"];

/// Id of the empty row a new table starts with. Fixed so an unsaved table
/// reads the same on every load.
pub const FIRST_ROW_ID: &str = "row-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Standard,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaRow {
    pub id: String,
    /// Cell text keyed by column id.
    #[serde(default)]
    pub cells: BTreeMap<String, String>,
}

impl IdeaRow {
    fn new() -> Self {
        Self {
            id: paths::new_id(),
            cells: BTreeMap::new(),
        }
    }
}

/// The content ideation table: editable columns, rows of ideas and up to
/// [`MAX_PINNED`] pinned rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaTable {
    pub columns: Vec<Column>,
    pub rows: Vec<IdeaRow>,
    #[serde(default)]
    pub pinned: Vec<String>,
}

impl Default for IdeaTable {
    fn default() -> Self {
        Self {
            columns: STANDARD_COLUMNS
                .iter()
                .map(|name| Column {
                    id: name.to_lowercase(),
                    name: name.to_string(),
                    kind: ColumnKind::Standard,
                })
                .collect(),
            rows: vec![IdeaRow {
                id: FIRST_ROW_ID.to_string(),
                cells: BTreeMap::new(),
            }],
            pinned: Vec::new(),
        }
    }
}

impl IdeaTable {
    // ---------------------------------------------------------------------------
    // Columns
    // ---------------------------------------------------------------------------

    pub fn add_column(&mut self, name: &str) -> Result<String> {
        let name = column_name(name)?;
        let column = Column {
            id: paths::new_id(),
            name,
            kind: ColumnKind::Custom,
        };
        let id = column.id.clone();
        self.columns.push(column);
        Ok(id)
    }

    pub fn rename_column(&mut self, id: &str, name: &str) -> Result<()> {
        let name = column_name(name)?;
        self.column_mut(id)?.name = name;
        Ok(())
    }

    /// Remove a column and its cells. The last standard column stays.
    pub fn delete_column(&mut self, id: &str) -> Result<Column> {
        let pos = self
            .columns
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StudioError::ColumnNotFound(id.to_string()))?;
        let standard = self
            .columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Standard)
            .count();
        if self.columns[pos].kind == ColumnKind::Standard && standard <= 1 {
            return Err(StudioError::LastStandardColumn);
        }
        let column = self.columns.remove(pos);
        for row in &mut self.rows {
            row.cells.remove(&column.id);
        }
        Ok(column)
    }

    // ---------------------------------------------------------------------------
    // Rows
    // ---------------------------------------------------------------------------

    pub fn add_row(&mut self) -> String {
        let row = IdeaRow::new();
        let id = row.id.clone();
        self.rows.push(row);
        id
    }

    pub fn set_cell(&mut self, row_id: &str, column_id: &str, text: impl Into<String>) -> Result<()> {
        if !self.columns.iter().any(|c| c.id == column_id) {
            return Err(StudioError::ColumnNotFound(column_id.to_string()));
        }
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.id == row_id)
            .ok_or_else(|| StudioError::RowNotFound(row_id.to_string()))?;
        let text = text.into();
        if text.is_empty() {
            row.cells.remove(column_id);
        } else {
            row.cells.insert(column_id.to_string(), text);
        }
        Ok(())
    }

    /// Remove a row (unpinning it). The last row stays.
    pub fn delete_row(&mut self, id: &str) -> Result<IdeaRow> {
        let pos = self
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StudioError::RowNotFound(id.to_string()))?;
        if self.rows.len() <= 1 {
            return Err(StudioError::LastRow);
        }
        self.pinned.retain(|p| p != id);
        Ok(self.rows.remove(pos))
    }

    // ---------------------------------------------------------------------------
    // Pins
    // ---------------------------------------------------------------------------

    /// Pin a row. Re-pinning is a no-op; a pin beyond [`MAX_PINNED`] fails.
    pub fn pin(&mut self, row_id: &str) -> Result<()> {
        if !self.rows.iter().any(|r| r.id == row_id) {
            return Err(StudioError::RowNotFound(row_id.to_string()));
        }
        if self.pinned.iter().any(|p| p == row_id) {
            return Ok(());
        }
        if self.pinned.len() >= MAX_PINNED {
            return Err(StudioError::PinLimit(MAX_PINNED));
        }
        self.pinned.push(row_id.to_string());
        Ok(())
    }

    /// Returns `false` if the row was not pinned.
    pub fn unpin(&mut self, row_id: &str) -> bool {
        let before = self.pinned.len();
        self.pinned.retain(|p| p != row_id);
        self.pinned.len() < before
    }

    pub fn pinned_rows(&self) -> Vec<&IdeaRow> {
        self.pinned
            .iter()
            .filter_map(|id| self.rows.iter().find(|r| &r.id == id))
            .collect()
    }

    fn column_mut(&mut self, id: &str) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StudioError::ColumnNotFound(id.to_string()))
    }
}

fn column_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StudioError::InvalidName("column name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_rows(n: usize) -> IdeaTable {
        let mut table = IdeaTable::default();
        while table.rows.len() < n {
            table.add_row();
        }
        table
    }

    #[test]
    fn default_table_has_standard_columns_and_one_row() {
        let table = IdeaTable::default();
        assert_eq!(table.columns.len(), STANDARD_COLUMNS.len());
        assert!(table.columns.iter().all(|c| c.kind == ColumnKind::Standard));
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn default_table_is_stable() {
        assert_eq!(IdeaTable::default(), IdeaTable::default());
        assert_eq!(IdeaTable::default().rows[0].id, FIRST_ROW_ID);
    }

    #[test]
    fn sixth_pin_rejected() {
        let mut table = table_with_rows(6);
        let ids: Vec<String> = table.rows.iter().map(|r| r.id.clone()).collect();
        for id in &ids[..5] {
            table.pin(id).unwrap();
        }
        assert!(matches!(table.pin(&ids[5]), Err(StudioError::PinLimit(5))));
        assert_eq!(table.pinned.len(), MAX_PINNED);

        // Re-pinning an existing pin at the limit is fine.
        table.pin(&ids[0]).unwrap();
        assert_eq!(table.pinned.len(), MAX_PINNED);
    }

    #[test]
    fn unpin_frees_a_slot() {
        let mut table = table_with_rows(6);
        let ids: Vec<String> = table.rows.iter().map(|r| r.id.clone()).collect();
        for id in &ids[..5] {
            table.pin(id).unwrap();
        }
        assert!(table.unpin(&ids[2]));
        assert!(!table.unpin(&ids[2]));
        table.pin(&ids[5]).unwrap();
        assert_eq!(table.pinned_rows().len(), MAX_PINNED);
    }

    #[test]
    fn last_standard_column_cannot_be_deleted() {
        let mut table = IdeaTable::default();
        let custom = table.add_column("Sound").unwrap();
        let standard: Vec<String> = table
            .columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Standard)
            .map(|c| c.id.clone())
            .collect();
        for id in &standard[..standard.len() - 1] {
            table.delete_column(id).unwrap();
        }
        let before = table.clone();
        assert!(matches!(
            table.delete_column(standard.last().unwrap()),
            Err(StudioError::LastStandardColumn)
        ));
        assert_eq!(table, before);

        // Custom columns are never protected.
        table.delete_column(&custom).unwrap();
    }

    #[test]
    fn last_row_cannot_be_deleted() {
        let mut table = IdeaTable::default();
        let only = table.rows[0].id.clone();
        let before = table.clone();
        assert!(matches!(table.delete_row(&only), Err(StudioError::LastRow)));
        assert_eq!(table, before);
    }

    #[test]
    fn delete_row_unpins() {
        let mut table = table_with_rows(2);
        let id = table.rows[1].id.clone();
        table.pin(&id).unwrap();
        table.delete_row(&id).unwrap();
        assert!(table.pinned.is_empty());
    }

    #[test]
    fn delete_column_drops_cells() {
        let mut table = IdeaTable::default();
        let col = table.add_column("Sound").unwrap();
        let row = table.rows[0].id.clone();
        table.set_cell(&row, &col, "trending audio").unwrap();
        table.delete_column(&col).unwrap();
        assert!(table.rows[0].cells.is_empty());
    }

    #[test]
    fn set_cell_unknown_column() {
        let mut table = IdeaTable::default();
        let row = table.rows[0].id.clone();
        assert!(matches!(
            table.set_cell(&row, "nope", "x"),
            Err(StudioError::ColumnNotFound(_))
        ));
    }
}
