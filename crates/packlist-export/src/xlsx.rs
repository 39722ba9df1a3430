//! # XLSX Encoding
//!
//! Writes rows into a single-sheet workbook and reads such workbooks back.
//!
//! ## Sheet Layout
//! ```text
//! ┌──────────────────┬──────────┬──────────────────┬─────────┐
//! │ Barcode          │ Quantity │ Box Barcode      │ Has KIZ │  ← bold header
//! ├──────────────────┼──────────┼──────────────────┼─────────┤
//! │ ABC123           │        2 │ WB_100           │ нет     │
//! │ 0104601234567890 │        1 │ WB_100           │ да      │
//! └──────────────────┴──────────┴──────────────────┴─────────┘
//!   width 32           width 10   width 32           width 10
//! ```

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::rows::ExportRow;
use crate::DEFAULT_SHEET_NAME;

/// Column headers, in order.
pub const HEADERS: [&str; 4] = ["Barcode", "Quantity", "Box Barcode", "Has KIZ"];

const COLUMN_WIDTHS: [f64; 4] = [32.0, 10.0, 32.0, 10.0];

// =============================================================================
// Layout
// =============================================================================

/// Localized tokens for the marking column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkingLabels {
    pub yes: String,
    pub no: String,
}

impl MarkingLabels {
    /// Returns the token for `has_marking`.
    pub fn render(&self, has_marking: bool) -> &str {
        if has_marking {
            &self.yes
        } else {
            &self.no
        }
    }

    /// Parses a token back; unknown tokens yield `None`.
    pub fn parse(&self, token: &str) -> Option<bool> {
        let token = token.trim();
        if token == self.yes {
            Some(true)
        } else if token == self.no {
            Some(false)
        } else {
            None
        }
    }
}

impl Default for MarkingLabels {
    fn default() -> Self {
        MarkingLabels {
            yes: "да".to_string(),
            no: "нет".to_string(),
        }
    }
}

/// How the workbook is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLayout {
    pub sheet_name: String,
    pub labels: MarkingLabels,
}

impl Default for ExportLayout {
    fn default() -> Self {
        ExportLayout {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            labels: MarkingLabels::default(),
        }
    }
}

// =============================================================================
// Serialize
// =============================================================================

/// Encodes `rows` as an `.xlsx` document.
pub fn serialize<I>(rows: I, layout: &ExportLayout) -> ExportResult<Vec<u8>>
where
    I: IntoIterator<Item = ExportRow>,
{
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let mut written: usize = 0;
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(&layout.sheet_name)?;
        write_headers(sheet, &header_format)?;

        for (index, row) in rows.into_iter().enumerate() {
            let excel_row = u32::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            sheet.write_string(excel_row, 0, &row.barcode)?;
            sheet.write_number(excel_row, 1, f64::from(row.quantity))?;
            sheet.write_string(excel_row, 2, &row.box_id)?;
            sheet.write_string(excel_row, 3, layout.labels.render(row.has_marking))?;
            written += 1;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    debug!(rows = written, bytes = bytes.len(), "Packing list serialized");
    Ok(bytes)
}

fn write_headers(sheet: &mut Worksheet, format: &Format) -> Result<(), XlsxError> {
    for (col, (header, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *header, format)?;
        sheet.set_column_width(col, width)?;
    }
    Ok(())
}

// =============================================================================
// Decode
// =============================================================================

/// Reads a workbook produced by [`serialize`] back into rows.
///
/// ## Errors
/// - `MissingSheet` if the layout's sheet is absent
/// - `UnexpectedHeader` if the first row is not [`HEADERS`]
/// - `MalformedRow` for empty barcodes, non-integer quantities or unknown
///   marking tokens (row numbers are 1-based, header = 1)
pub fn decode(bytes: &[u8], layout: &ExportLayout) -> ExportResult<Vec<ExportRow>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    if !workbook.sheet_names().contains(&layout.sheet_name) {
        return Err(ExportError::MissingSheet(layout.sheet_name.clone()));
    }
    let range = workbook.worksheet_range(&layout.sheet_name)?;

    let mut sheet_rows = range.rows();
    let header: Vec<String> = sheet_rows
        .next()
        .map(|cells| cells.iter().map(cell_text).collect())
        .unwrap_or_default();
    if header.iter().map(String::as_str).ne(HEADERS) {
        return Err(ExportError::UnexpectedHeader { found: header });
    }

    let mut rows = Vec::new();
    for (index, cells) in sheet_rows.enumerate() {
        let row_number = index + 2;
        let cell = |col: usize| cells.get(col).cloned().unwrap_or(Data::Empty);

        let barcode = cell_text(&cell(0));
        if barcode.is_empty() {
            return Err(ExportError::malformed(row_number, "empty barcode"));
        }

        let quantity = cell_u32(&cell(1))
            .ok_or_else(|| ExportError::malformed(row_number, "quantity is not a whole number"))?;

        let box_id = cell_text(&cell(2));
        if box_id.is_empty() {
            return Err(ExportError::malformed(row_number, "empty box barcode"));
        }

        let marking_token = cell_text(&cell(3));
        let has_marking = layout.labels.parse(&marking_token).ok_or_else(|| {
            ExportError::malformed(row_number, format!("unknown marking '{marking_token}'"))
        })?;

        rows.push(ExportRow {
            barcode,
            quantity,
            box_id,
            has_marking,
        });
    }

    debug!(rows = rows.len(), "Packing list decoded");
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => unescape_ooxml(s),
        Data::Float(v) => format!("{v}"),
        Data::Int(v) => format!("{v}"),
        Data::Bool(v) => v.to_string(),
        other => other.to_string(),
    }
}

/// Reverses the `_xHHHH_` escaping applied to shared strings on write.
///
/// Control characters are stored as `_x001D_` and a literal `_xHHHH_` run
/// as `_x005F_xHHHH_`. The reader hands both back verbatim.
fn unescape_ooxml(text: &str) -> String {
    if !text.contains("_x") {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match escaped_char(tail) {
            Some(ch) => {
                out.push(ch);
                rest = &tail[7..];
            }
            None => {
                out.push_str("_x");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes a leading `_xHHHH_` escape.
fn escaped_char(tail: &str) -> Option<char> {
    if tail.as_bytes().get(6) != Some(&b'_') {
        return None;
    }
    let hex = tail.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

fn cell_u32(cell: &Data) -> Option<u32> {
    match cell {
        Data::Int(v) => u32::try_from(*v).ok(),
        Data::Float(v) if v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX) => {
            Some(*v as u32)
        }
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::rows::build_rows;
    use packlist_core::ScanSession;

    fn row(barcode: &str, quantity: u32, box_id: &str, has_marking: bool) -> ExportRow {
        ExportRow {
            barcode: barcode.to_string(),
            quantity,
            box_id: box_id.to_string(),
            has_marking,
        }
    }

    #[test]
    fn test_marking_labels() {
        let labels = MarkingLabels::default();
        assert_eq!(labels.render(true), "да");
        assert_eq!(labels.render(false), "нет");
        assert_eq!(labels.parse(" да "), Some(true));
        assert_eq!(labels.parse("нет"), Some(false));
        assert_eq!(labels.parse("yes"), None);
    }

    #[test]
    fn test_serialize_produces_zip_container() {
        let bytes = serialize(vec![row("A", 1, "WB_1", false)], &ExportLayout::default()).unwrap();
        // XLSX is a ZIP archive: "PK\x03\x04".
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_round_trip_matches_rows() {
        let layout = ExportLayout::default();
        let rows = vec![
            row("ABC123", 2, "WB_100", false),
            row("0104601234567890", 1, "WB_100", true),
            row("ABC123", 7, "WB_200", false),
        ];

        let bytes = serialize(rows.clone(), &layout).unwrap();
        let decoded = decode(&bytes, &layout).unwrap();

        let expected: BTreeSet<ExportRow> = rows.into_iter().collect();
        let actual: BTreeSet<ExportRow> = decoded.into_iter().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_round_trip_keeps_escape_lookalikes_and_gs1() {
        let layout = ExportLayout::default();
        let kiz = "0104601234567890 21abcDEF1234567\u{1d}91EE06\u{1d}92dGVzdA==";
        let rows = vec![
            row("_x0041_", 1, "WB_1", false),
            row(kiz, 2, "WB_1", true),
            row("snake_x_case", 3, "WB_x0042_", false),
        ];

        let bytes = serialize(rows.clone(), &layout).unwrap();

        assert_eq!(decode(&bytes, &layout).unwrap(), rows);
    }

    #[test]
    fn test_unescape_ooxml() {
        assert_eq!(unescape_ooxml("ABC123"), "ABC123");
        assert_eq!(unescape_ooxml("01_x001D_21"), "01\u{1d}21");
        assert_eq!(unescape_ooxml("_x005F_x0041_"), "_x0041_");
        assert_eq!(unescape_ooxml("_x_x005F_x0041_"), "_x_x0041_");
        assert_eq!(unescape_ooxml("_x00G1_"), "_x00G1_");
        assert_eq!(unescape_ooxml("tail_x00"), "tail_x00");
        assert_eq!(unescape_ooxml("_xд001_"), "_xд001_");
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let layout = ExportLayout::default();
        let bytes = serialize(Vec::<ExportRow>::new(), &layout).unwrap();
        assert!(decode(&bytes, &layout).unwrap().is_empty());
    }

    #[test]
    fn test_session_scenario_round_trip() {
        let mut session = ScanSession::new();
        session.request_new_box();
        session.on_decode("WB_100").unwrap();
        for _ in 0..2 {
            session.request_product_scan();
            session.on_decode("ABC123").unwrap();
        }

        let layout = ExportLayout::default();
        let bytes = serialize(build_rows(session.packing_list()), &layout).unwrap();
        let decoded = decode(&bytes, &layout).unwrap();

        assert_eq!(decoded, vec![row("ABC123", 2, "WB_100", false)]);
    }

    #[test]
    fn test_custom_layout() {
        let layout = ExportLayout {
            sheet_name: "Packing".to_string(),
            labels: MarkingLabels {
                yes: "yes".to_string(),
                no: "no".to_string(),
            },
        };
        let bytes = serialize(vec![row("A", 3, "WB_1", true)], &layout).unwrap();

        assert_eq!(decode(&bytes, &layout).unwrap(), vec![row("A", 3, "WB_1", true)]);

        let err = decode(&bytes, &ExportLayout::default()).unwrap_err();
        assert!(matches!(err, ExportError::MissingSheet(ref name) if name == "My Sheet"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode(b"not a workbook", &ExportLayout::default()).unwrap_err();
        assert!(matches!(err, ExportError::Read(_)));
    }

    #[test]
    fn test_cell_u32() {
        assert_eq!(cell_u32(&Data::Float(2.0)), Some(2));
        assert_eq!(cell_u32(&Data::Int(5)), Some(5));
        assert_eq!(cell_u32(&Data::String(" 4 ".to_string())), Some(4));
        assert_eq!(cell_u32(&Data::Float(2.5)), None);
        assert_eq!(cell_u32(&Data::Float(-1.0)), None);
        assert_eq!(cell_u32(&Data::Empty), None);
    }
}
