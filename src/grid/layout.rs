//! Layout templates: rows x columns of `"<class>-<flag>"` cell codes.
//!
//! The same template is applied to every floor. Cell decoding is permissive:
//! anything that does not name a known class with flag `1` yields an inactive
//! spot rather than an error.

use serde::{Deserialize, Serialize};

use super::class::VehicleClass;

/// Decoded cell code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpec {
    pub class: Option<VehicleClass>,
    pub active: bool,
}

impl CellSpec {
    pub const INACTIVE: CellSpec = CellSpec { class: None, active: false };

    /// Decode `"<class>-<flag>"`. Flag `"1"` is active, anything else is not.
    /// An unrecognized class forces the spot inactive regardless of the flag.
    pub fn parse(code: &str) -> Self {
        let mut parts = code.split('-');
        let class = parts.next().and_then(VehicleClass::from_code);
        let flag = parts.next();
        Self {
            class,
            active: class.is_some() && flag == Some("1"),
        }
    }
}

/// A rows x columns grid of cell codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutTemplate {
    rows: Vec<Vec<String>>,
}

impl LayoutTemplate {
    pub fn new<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Parse the inline form: rows separated by `;`, cells by `,`.
    /// Whitespace around cells is ignored; empty rows are skipped.
    pub fn parse_inline(text: &str) -> Self {
        Self {
            rows: text
                .split(';')
                .map(str::trim)
                .filter(|row| !row.is_empty())
                .map(|row| row.split(',').map(|cell| cell.trim().to_string()).collect())
                .collect(),
        }
    }

    /// Render back to the inline form.
    pub fn to_inline(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join(","))
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row in the template.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Decoded cell, or inactive when the template has no such cell.
    pub fn spec_at(&self, row: usize, col: usize) -> CellSpec {
        self.cell(row, col).map_or(CellSpec::INACTIVE, CellSpec::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_decoding() {
        assert_eq!(
            CellSpec::parse("B-1"),
            CellSpec { class: Some(VehicleClass::Bicycle), active: true }
        );
        assert_eq!(
            CellSpec::parse("A-0"),
            CellSpec { class: Some(VehicleClass::Automobile), active: false }
        );
        assert_eq!(CellSpec::parse("X-1"), CellSpec::INACTIVE);
        assert_eq!(CellSpec::parse("X-0"), CellSpec::INACTIVE);
    }

    #[test]
    fn test_malformed_cells_are_inactive() {
        for code in ["", "M", "M-", "M-2", "-1", "m-1"] {
            assert!(!CellSpec::parse(code).active, "{code:?}");
        }
        // Extra segments are ignored past the flag.
        assert!(CellSpec::parse("M-1-x").active);
    }

    #[test]
    fn test_inline_round_trip() {
        let template = LayoutTemplate::parse_inline(" B-1, M-1 ,A-1 ; B-0,M-1,A-0 ;");
        assert_eq!(template.row_count(), 2);
        assert_eq!(template.column_count(), 3);
        assert_eq!(template.cell(1, 2), Some("A-0"));
        assert_eq!(template.to_inline(), "B-1,M-1,A-1;B-0,M-1,A-0");
    }

    #[test]
    fn test_missing_cell_is_inactive() {
        let template = LayoutTemplate::new([vec!["B-1"]]);
        assert_eq!(template.spec_at(0, 0).class, Some(VehicleClass::Bicycle));
        assert_eq!(template.spec_at(0, 5), CellSpec::INACTIVE);
        assert_eq!(template.spec_at(3, 0), CellSpec::INACTIVE);
    }
}
