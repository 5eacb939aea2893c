//! PDF inventory report
//!
//! Renders the full record collection as a downloadable report: a "Current
//! Bag" table followed by a "Locker Room" table, one row per record. Row
//! assembly is pure and tested; the PDF drawing itself stays thin.

use bagtag_common::model::{EquipmentRecord, Location};
use bagtag_common::normalize::{format_display_date, format_display_price, format_set_label};
use bagtag_common::{Error, Result};
use chrono::NaiveDate;
use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 14.0;
const ROW_HEIGHT_MM: f32 = 6.5;

/// Column headers, matching the app's table layout
const COLUMNS: [&str; 6] = ["Type", "Brand", "Model", "Specs", "Purchase Date", "Price"];

/// Column x offsets in mm from the left edge
const COLUMN_X_MM: [f32; 6] = [14.0, 42.0, 74.0, 110.0, 146.0, 178.0];

/// Report file name stamped with the generation date
pub fn report_file_name(today: NaiveDate) -> String {
    format!("BagTag_Inventory_{}.pdf", today.format("%Y-%m-%d"))
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub cells: [String; 6],
}

/// Specs summary column: set range for iron sets, then loft and
/// stiffness ("5-PW (6) S", "10.5° R", "56°", or empty)
fn specs_summary(record: &EquipmentRecord) -> String {
    let mut out = String::new();
    if let Some(label) = record
        .set_composition
        .as_deref()
        .and_then(format_set_label)
    {
        out.push_str(&format!("{} ({})", label.text, label.count));
    }
    if let Some(loft) = &record.loft {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(loft);
        out.push('°');
    }
    if let Some(stiffness) = &record.shaft_stiffness {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(stiffness);
    }
    out
}

/// Build the table row for one record
fn report_row(record: &EquipmentRecord) -> ReportRow {
    ReportRow {
        cells: [
            record.category.as_str().to_string(),
            record.brand.clone(),
            record.model.clone(),
            specs_summary(record),
            format_display_date(record.purchase_date.as_deref()),
            format_display_price(record.price),
        ],
    }
}

/// Group records into (bag, locker) row lists, preserving list order
pub fn report_rows(records: &[EquipmentRecord]) -> (Vec<ReportRow>, Vec<ReportRow>) {
    let bag = records
        .iter()
        .filter(|r| r.location == Location::Bag)
        .map(report_row)
        .collect();
    let locker = records
        .iter()
        .filter(|r| r.location == Location::Locker)
        .map(report_row)
        .collect();
    (bag, locker)
}

/// Render the inventory report as PDF bytes
pub fn render_pdf(records: &[EquipmentRecord], today: NaiveDate) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "BagTag Inventory Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Internal(format!("PDF font error: {}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| Error::Internal(format!("PDF font error: {}", e)))?;

    let mut layer_ref = doc.get_page(page).get_layer(layer);
    // y measured from the bottom edge; start near the top
    let mut y = PAGE_HEIGHT_MM - 20.0;

    layer_ref.use_text("BagTag Inventory Report", 22.0, Mm(MARGIN_MM), Mm(y), &bold);
    y -= 8.0;
    layer_ref.use_text(
        format!("Generated on {}", today.format("%Y-%m-%d")),
        10.0,
        Mm(MARGIN_MM),
        Mm(y),
        &regular,
    );
    y -= 12.0;

    let (bag_rows, locker_rows) = report_rows(records);
    let sections = [
        ("Current Bag", bag_rows),
        ("Locker Room (Backup/Retired)", locker_rows),
    ];

    for (title, rows) in sections {
        if rows.is_empty() {
            continue;
        }

        // Keep the section title together with at least the header row
        if y < 40.0 {
            let (next_page, next_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer_ref = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT_MM - 20.0;
        }

        layer_ref.use_text(title, 14.0, Mm(MARGIN_MM), Mm(y), &bold);
        y -= ROW_HEIGHT_MM + 1.0;

        for (i, header) in COLUMNS.iter().enumerate() {
            layer_ref.use_text(*header, 10.0, Mm(COLUMN_X_MM[i]), Mm(y), &bold);
        }
        y -= ROW_HEIGHT_MM;

        for row in &rows {
            if y < 20.0 {
                let (next_page, next_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer_ref = doc.get_page(next_page).get_layer(next_layer);
                y = PAGE_HEIGHT_MM - 20.0;
            }
            for (i, cell) in row.cells.iter().enumerate() {
                layer_ref.use_text(cell, 9.0, Mm(COLUMN_X_MM[i]), Mm(y), &regular);
            }
            y -= ROW_HEIGHT_MM;
        }

        y -= ROW_HEIGHT_MM;
    }

    doc.save_to_bytes()
        .map_err(|e| Error::Internal(format!("PDF render error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bagtag_common::model::Category;
    use bagtag_common::normalize::{normalize_for_save, RecordForm};

    fn record(brand: &str, location: Location) -> EquipmentRecord {
        let form = RecordForm {
            category: Category::Driver,
            location,
            brand: brand.to_string(),
            model: "M4".to_string(),
            loft: "10.5".to_string(),
            is_set: false,
            set_composition: Vec::new(),
            shaft_make_model: String::new(),
            shaft_stiffness: "R".to_string(),
            price: "149.99".to_string(),
            purchase_date: "2018-06-15".to_string(),
            notes: String::new(),
            photo_url: String::new(),
            receipt_url: String::new(),
            launch_data: None,
        };
        normalize_for_save(&form, None).unwrap()
    }

    #[test]
    fn rows_group_bag_before_locker() {
        let records = [
            record("Locker Brand", Location::Locker),
            record("Bag Brand", Location::Bag),
        ];
        let (bag, locker) = report_rows(&records);
        assert_eq!(bag.len(), 1);
        assert_eq!(locker.len(), 1);
        assert_eq!(bag[0].cells[1], "Bag Brand");
        assert_eq!(locker[0].cells[1], "Locker Brand");
    }

    #[test]
    fn row_cells_format_specs_date_and_price() {
        let rec = record("TaylorMade", Location::Bag);
        let row = report_row(&rec);
        assert_eq!(row.cells[0], "Driver");
        assert_eq!(row.cells[3], "10.5° R");
        assert_eq!(row.cells[4], "Jun 2018");
        assert_eq!(row.cells[5], "$149.99");
    }

    #[test]
    fn iron_set_row_shows_the_range_label() {
        let form = RecordForm {
            category: Category::Iron,
            location: Location::Bag,
            brand: "Mizuno".to_string(),
            model: "JPX 923".to_string(),
            loft: "34".to_string(),
            is_set: true,
            set_composition: ["5", "6", "7", "8", "9", "PW"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            shaft_make_model: String::new(),
            shaft_stiffness: "S".to_string(),
            price: "1099.00".to_string(),
            purchase_date: String::new(),
            notes: String::new(),
            photo_url: String::new(),
            receipt_url: String::new(),
            launch_data: None,
        };
        let rec = normalize_for_save(&form, None).unwrap();

        // Loft is suppressed for sets; the range label takes its place
        let row = report_row(&rec);
        assert_eq!(row.cells[3], "5-PW (6) S");
    }

    #[test]
    fn missing_optionals_render_placeholders() {
        let mut rec = record("Ping", Location::Bag);
        rec.loft = None;
        rec.shaft_stiffness = None;
        rec.purchase_date = None;
        rec.price = None;

        let row = report_row(&rec);
        assert_eq!(row.cells[3], "");
        assert_eq!(row.cells[4], "—");
        assert_eq!(row.cells[5], "—");
    }

    #[test]
    fn file_name_is_date_stamped() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        assert_eq!(report_file_name(today), "BagTag_Inventory_2026-08-25.pdf");
    }

    #[test]
    fn render_produces_pdf_bytes() {
        let records = [
            record("TaylorMade", Location::Bag),
            record("Ping", Location::Locker),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let bytes = render_pdf(&records, today).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
