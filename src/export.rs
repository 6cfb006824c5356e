//! Renderers for people registry downloads.
//!
//! All three formats are pure functions over an already sorted and
//! filtered snapshot; callers decide ordering and supply the generation
//! timestamp.

use anyhow::Result;
use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_xlsxwriter::{Color, Format, Workbook};
use std::fmt::Write;

use crate::db::Person;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 25.0;
const CONTENT_TOP_MM: f32 = PAGE_HEIGHT_MM - MARGIN_MM;
const ROW_STEP_MM: f32 = 8.0;
const FOOTER_Y_MM: f32 = 15.0;
const HEADER_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 9.0;

/// Rows rendered per PDF page before a page break.
const ROWS_PER_PAGE: usize = 28;

const COL_ID_MM: f32 = MARGIN_MM;
const COL_FORENAME_MM: f32 = 45.0;
const COL_FAMILY_NAME_MM: f32 = 90.0;
const COL_GENDER_MM: f32 = 135.0;
const COL_YEAR_MM: f32 = 165.0;

const HEADER_FILL: Color = Color::RGB(0x00AD_D8E6);

pub fn people_csv(people: &[Person]) -> String {
    let mut csv = String::from("id,forename,family_name,gender,year_of_birth\n");
    for person in people {
        let _ = writeln!(
            csv,
            "{},\"{}\",\"{}\",\"{}\",{}",
            person.id,
            person.forename.replace('"', "\"\""),
            person.family_name.replace('"', "\"\""),
            person.gender.replace('"', "\"\""),
            person.year_of_birth
        );
    }
    csv
}

pub fn people_workbook(people: &[Person]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("People")?;

    let header_format = Format::new().set_bold().set_background_color(HEADER_FILL);

    let headers = ["ID", "Forename", "Family Name", "Gender", "Year of Birth"];
    for (col, title) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
    }

    for (idx, person) in people.iter().enumerate() {
        let row = idx as u32 + 1;
        worksheet.write_number(row, 0, f64::from(person.id))?;
        worksheet.write_string(row, 1, &person.forename)?;
        worksheet.write_string(row, 2, &person.family_name)?;
        worksheet.write_string(row, 3, &person.gender)?;
        worksheet.write_number(row, 4, f64::from(person.year_of_birth))?;
    }

    worksheet.set_column_width(0, 8)?;
    worksheet.set_column_width(1, 22)?;
    worksheet.set_column_width(2, 22)?;
    worksheet.set_column_width(3, 14)?;
    worksheet.set_column_width(4, 14)?;

    let buffer = workbook.save_to_buffer()?;
    Ok(buffer)
}

pub fn people_pdf(people: &[Person], generated_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "People Export",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow::anyhow!("Failed to load PDF font: {e}"))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow::anyhow!("Failed to load PDF font: {e}"))?;

    // An empty registry still renders one page with headers and footer.
    let mut pages: Vec<&[Person]> = people.chunks(ROWS_PER_PAGE).collect();
    if pages.is_empty() {
        pages.push(&[]);
    }
    let total_pages = pages.len();

    let footer_left = format!("Generated {} UTC", generated_at.format("%Y-%m-%d %H:%M:%S"));

    for (page_index, chunk) in pages.iter().enumerate() {
        let layer = if page_index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        draw_table(&layer, chunk, &font, &bold);

        layer.use_text(
            footer_left.as_str(),
            FOOTER_SIZE,
            Mm(MARGIN_MM),
            Mm(FOOTER_Y_MM),
            &font,
        );
        layer.use_text(
            format!("Page {} of {}", page_index + 1, total_pages),
            FOOTER_SIZE,
            Mm(PAGE_WIDTH_MM - MARGIN_MM - 22.0),
            Mm(FOOTER_Y_MM),
            &font,
        );
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow::anyhow!("Failed to render PDF: {e}"))
}

fn draw_table(
    layer: &PdfLayerReference,
    chunk: &[Person],
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    layer.use_text("ID", HEADER_SIZE, Mm(COL_ID_MM), Mm(CONTENT_TOP_MM), bold);
    layer.use_text(
        "Forename",
        HEADER_SIZE,
        Mm(COL_FORENAME_MM),
        Mm(CONTENT_TOP_MM),
        bold,
    );
    layer.use_text(
        "Family Name",
        HEADER_SIZE,
        Mm(COL_FAMILY_NAME_MM),
        Mm(CONTENT_TOP_MM),
        bold,
    );
    layer.use_text(
        "Gender",
        HEADER_SIZE,
        Mm(COL_GENDER_MM),
        Mm(CONTENT_TOP_MM),
        bold,
    );
    layer.use_text(
        "Year of Birth",
        HEADER_SIZE,
        Mm(COL_YEAR_MM),
        Mm(CONTENT_TOP_MM),
        bold,
    );

    let mut y = CONTENT_TOP_MM - ROW_STEP_MM;
    for person in chunk {
        layer.use_text(
            person.id.to_string(),
            BODY_SIZE,
            Mm(COL_ID_MM),
            Mm(y),
            font,
        );
        layer.use_text(
            person.forename.as_str(),
            BODY_SIZE,
            Mm(COL_FORENAME_MM),
            Mm(y),
            font,
        );
        layer.use_text(
            person.family_name.as_str(),
            BODY_SIZE,
            Mm(COL_FAMILY_NAME_MM),
            Mm(y),
            font,
        );
        layer.use_text(
            person.gender.as_str(),
            BODY_SIZE,
            Mm(COL_GENDER_MM),
            Mm(y),
            font,
        );
        layer.use_text(
            person.year_of_birth.to_string(),
            BODY_SIZE,
            Mm(COL_YEAR_MM),
            Mm(y),
            font,
        );
        y -= ROW_STEP_MM;
    }
}
