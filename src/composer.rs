use time::macros::format_description;

use crate::bundle::QuotationBundle;
use crate::error::RenderError;
use crate::fonts::Face;
use crate::layout::{self, PageCursor, TextRun, CONTENT_WIDTH, MARGIN};
use crate::pdf::PdfDocument;

const COMPANY_NAME: &str = "HEADS Interior";

const TEAL: [f32; 3] = [0.13, 0.54, 0.54];
const GREY: [f32; 3] = [0.4, 0.4, 0.4];
const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

/// Renders the quotation bundle into the final PDF byte buffer. Rendering is
/// pure: the same bundle always yields byte-identical output.
pub fn render(bundle: &QuotationBundle) -> Result<Vec<u8>, RenderError> {
    let pages = compose(bundle)?;

    let mut document = PdfDocument::new(&bundle.quote.id);
    for runs in &pages {
        let page_index = document.add_page();
        for run in runs {
            document.write_text(page_index, run)?;
        }
    }
    document.save_to_bytes()
}

/// Lays the whole document out as abstract text runs, one `Vec<TextRun>` per
/// page. The fixed section order is header, customer details, then the
/// selected items grouped by room; see the vertical gaps inline.
pub fn compose(bundle: &QuotationBundle) -> Result<Vec<Vec<TextRun>>, RenderError> {
    validate(bundle)?;

    let mut cursor = PageCursor::new();

    // Header.
    cursor.write(MARGIN, COMPANY_NAME, Face::Bold, 24.0, TEAL);
    cursor.advance(30.0);
    cursor.write(MARGIN, "Quotation", Face::Bold, 18.0, BLACK);
    cursor.advance(20.0);
    let date_line = format!("Date: {}", format_quote_date(bundle)?);
    cursor.write(MARGIN, date_line, Face::Regular, 10.0, GREY);
    cursor.advance(30.0);

    // Customer details.
    cursor.ensure_room(80.0);
    cursor.write(MARGIN, "Customer Details", Face::Bold, 14.0, TEAL);
    cursor.advance(20.0);
    let customer = &bundle.customer;
    cursor.write(
        MARGIN,
        format!("Name: {}", customer.name),
        Face::Regular,
        11.0,
        BLACK,
    );
    cursor.advance(15.0);
    cursor.write(
        MARGIN,
        format!("Phone: {}", customer.phone),
        Face::Regular,
        11.0,
        BLACK,
    );
    cursor.advance(15.0);
    if let Some(alternate_phone) = &customer.alternate_phone {
        cursor.write(
            MARGIN,
            format!("Alternate Phone: {alternate_phone}"),
            Face::Regular,
            11.0,
            BLACK,
        );
        cursor.advance(15.0);
    }
    cursor.write(
        MARGIN,
        format!("Address: {}", customer.address),
        Face::Regular,
        11.0,
        BLACK,
    );
    cursor.advance(30.0);

    // Items, grouped by room.
    cursor.ensure_room(40.0);
    cursor.write(MARGIN, "Selected Items", Face::Bold, 14.0, TEAL);
    cursor.advance(25.0);

    for (room_name, room_items) in &bundle.items_by_room {
        cursor.ensure_room(60.0);
        cursor.write(MARGIN, room_name.clone(), Face::Bold, 12.0, BLACK);
        cursor.advance(20.0);

        for item in room_items {
            let item_height = if item.description.is_some() { 35.0 } else { 20.0 };
            cursor.ensure_room(item_height + 20.0);

            let item_line = format!(
                "\u{2022} {} (Qty: {})",
                item.item_name,
                item.effective_quantity()
            );
            cursor.write(MARGIN + 15.0, item_line, Face::Regular, 10.0, BLACK);
            cursor.advance(15.0);

            if let Some(description) = &item.description {
                let max_width = CONTENT_WIDTH - 30.0;
                for line in layout::wrap_paragraphs(description, Face::Oblique, 9.0, max_width) {
                    cursor.ensure_room(15.0);
                    cursor.write(MARGIN + 30.0, line, Face::Oblique, 9.0, GREY);
                    cursor.advance(12.0);
                }
            }

            cursor.advance(8.0);
        }

        cursor.advance(10.0);
    }

    Ok(cursor.into_pages())
}

fn validate(bundle: &QuotationBundle) -> Result<(), RenderError> {
    if bundle.quote.id.trim().is_empty() {
        return Err(RenderError::MissingBundleData("quote id"));
    }
    if bundle.customer.name.trim().is_empty() {
        return Err(RenderError::MissingBundleData("customer name"));
    }
    if bundle.customer.phone.trim().is_empty() {
        return Err(RenderError::MissingBundleData("customer phone"));
    }
    if bundle.customer.address.trim().is_empty() {
        return Err(RenderError::MissingBundleData("customer address"));
    }
    Ok(())
}

/// Formats the quote date as e.g. `05 Mar 2025`.
fn format_quote_date(bundle: &QuotationBundle) -> Result<String, RenderError> {
    let format = format_description!("[day] [month repr:short] [year]");
    Ok(bundle.quote.quote_date.format(&format)?)
}
