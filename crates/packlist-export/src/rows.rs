//! # Export Rows
//!
//! Flattens a packing list into one row per (box, product) pair.
//!
//! ```text
//! PackingList                         Rows
//! ───────────                         ────
//! WB_100 ─┬─ ABC123 ×2      ──►      ABC123 | 2 | WB_100 | no
//!         └─ XYZ789 ×1      ──►      XYZ789 | 1 | WB_100 | no
//! WB_200 ─── ABC123 ×4      ──►      ABC123 | 4 | WB_200 | no
//! ```
//!
//! Rows come out box id first, then barcode, both ascending. The iterator
//! borrows the list and is `Clone`, so it can be restarted freely.

use std::collections::btree_map;

use packlist_core::{PackingList, ProductRecord, ProductTally};
use serde::{Deserialize, Serialize};

/// One spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub barcode: String,
    pub quantity: u32,
    pub box_id: String,
    pub has_marking: bool,
}

impl ExportRow {
    fn from_record(box_id: &str, record: &ProductRecord) -> Self {
        ExportRow {
            barcode: record.barcode.clone(),
            quantity: record.quantity,
            box_id: box_id.to_string(),
            has_marking: record.has_marking,
        }
    }
}

/// Lazy iterator over the rows of a packing list.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    boxes: btree_map::Iter<'a, String, ProductTally>,
    current: Option<(&'a str, btree_map::Values<'a, String, ProductRecord>)>,
}

impl<'a> Iterator for Rows<'a> {
    type Item = ExportRow;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((box_id, products)) = self.current.as_mut() {
                if let Some(record) = products.next() {
                    return Some(ExportRow::from_record(box_id, record));
                }
            }

            let (box_id, tally) = self.boxes.next()?;
            self.current = Some((box_id.as_str(), tally.products.values()));
        }
    }
}

/// Builds the row sequence for `list`.
pub fn build_rows(list: &PackingList) -> Rows<'_> {
    Rows {
        boxes: list.boxes.iter(),
        current: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(boxes: Vec<(&str, Vec<(&str, u32, bool)>)>) -> PackingList {
        let mut list = PackingList::new();
        for (box_id, products) in boxes {
            let tally = list.boxes.entry(box_id.to_string()).or_default();
            for (barcode, quantity, has_marking) in products {
                let mut record = ProductRecord::new(barcode, has_marking);
                record.quantity = quantity;
                tally.products.insert(barcode.to_string(), record);
            }
        }
        list
    }

    fn row(barcode: &str, quantity: u32, box_id: &str, has_marking: bool) -> ExportRow {
        ExportRow {
            barcode: barcode.to_string(),
            quantity,
            box_id: box_id.to_string(),
            has_marking,
        }
    }

    #[test]
    fn test_empty_list_has_no_rows() {
        let list = PackingList::new();
        assert_eq!(build_rows(&list).count(), 0);
    }

    #[test]
    fn test_rows_ordered_by_box_then_barcode() {
        let list = list_of(vec![
            ("WB_200", vec![("ABC123", 4, false)]),
            ("WB_100", vec![("XYZ789", 1, true), ("ABC123", 2, false)]),
        ]);

        let rows: Vec<ExportRow> = build_rows(&list).collect();

        assert_eq!(
            rows,
            vec![
                row("ABC123", 2, "WB_100", false),
                row("XYZ789", 1, "WB_100", true),
                row("ABC123", 4, "WB_200", false),
            ]
        );
    }

    #[test]
    fn test_empty_boxes_are_skipped() {
        let list = list_of(vec![
            ("WB_1", vec![]),
            ("WB_2", vec![("A", 1, false)]),
            ("WB_3", vec![]),
        ]);

        let rows: Vec<ExportRow> = build_rows(&list).collect();

        assert_eq!(rows, vec![row("A", 1, "WB_2", false)]);
    }

    #[test]
    fn test_rows_are_restartable() {
        let list = list_of(vec![("WB_1", vec![("A", 1, false), ("B", 3, false)])]);
        let mut rows = build_rows(&list);
        rows.next();

        let restarted = rows.clone();

        assert_eq!(rows.count(), 1);
        assert_eq!(restarted.count(), 1);
        assert_eq!(build_rows(&list).count(), list.line_count());
    }
}
