use std::io::BufWriter;
use std::mem;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, Stream, StringFormat};
use time::OffsetDateTime;

use crate::error::RenderError;
use crate::fonts::{self, Face};
use crate::layout::{TextRun, PAGE_HEIGHT, PAGE_WIDTH};

/// A thin layer over `lopdf` which holds the pages of the quotation document
/// while it is being written. Content streams are kept as operation lists and
/// only serialized when the document is saved.
pub struct PdfDocument {
    /// The underlying PDF document. This is a low-level interface and is not
    /// meant to be interacted with directly.
    inner_document: lopdf::Document,
    /// Written into the trailer `ID` and the info `Subject`, making a render
    /// of the same quotation reproducible byte for byte.
    identifier: String,
    pages: Vec<PdfPage>,
}

struct PdfPage {
    operations: Vec<Operation>,
}

impl PdfDocument {
    /// Creates an empty document targeting version 1.5 of the PDF
    /// specification, identified by the quote it renders.
    pub fn new(identifier: &str) -> Self {
        PdfDocument {
            inner_document: lopdf::Document::with_version("1.5"),
            identifier: identifier.to_string(),
            pages: Vec::new(),
        }
    }

    /// Appends an empty page and returns its index, to be passed to
    /// `write_text`.
    pub fn add_page(&mut self) -> usize {
        self.pages.push(PdfPage {
            operations: Vec::new(),
        });
        self.pages.len() - 1
    }

    /// Writes one text run onto the given page. The position is in points
    /// from the bottom-left corner, as the layout produces it.
    pub fn write_text(&mut self, page_index: usize, run: &TextRun) -> Result<(), RenderError> {
        let page = self
            .pages
            .get_mut(page_index)
            .ok_or(RenderError::PageOutOfBounds(page_index))?;

        page.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![run.face.resource_name().into(), run.size.into()],
            ),
            Operation::new("Td", vec![run.x.into(), run.y.into()]),
            Operation::new(
                "rg",
                run.color.iter().copied().map(Object::Real).collect(),
            ),
            Operation::new(
                "Tj",
                vec![Object::String(
                    fonts::encode_win_ansi(&run.text),
                    StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ]);

        Ok(())
    }

    /// Finalizes the document and serializes it to bytes. Timestamps are
    /// pinned to the Unix epoch and the trailer `ID` repeats the quote
    /// identifier, so the output carries no run-dependent state.
    pub fn save_to_bytes(mut self) -> Result<Vec<u8>, RenderError> {
        self.write_all()?;

        let mut pdf_document_bytes = Vec::new();
        let mut writer = BufWriter::new(&mut pdf_document_bytes);
        self.inner_document.save_to(&mut writer)?;
        mem::drop(writer);

        Ok(pdf_document_bytes)
    }

    /// Inserts the info dictionary, the catalog, the font resources and the
    /// page tree into the underlying document and wires up the trailer.
    fn write_all(&mut self) -> Result<(), RenderError> {
        use lopdf::Object::{Dictionary as DictionaryObject, Integer, Reference, String};
        use lopdf::StringFormat::Literal;

        let epoch_timestamp = to_pdf_timestamp_format(&OffsetDateTime::UNIX_EPOCH);
        let document_info = Dictionary::from_iter(vec![
            ("Title", String("Quotation".into(), Literal)),
            ("Producer", String("quotr".into(), Literal)),
            (
                "CreationDate",
                String(epoch_timestamp.clone().into_bytes(), Literal),
            ),
            ("ModDate", String(epoch_timestamp.into_bytes(), Literal)),
            (
                "Subject",
                String(self.identifier.clone().into_bytes(), Literal),
            ),
        ]);
        let document_info_id = self.inner_document.add_object(document_info);

        let pages_id = self.inner_document.new_object_id();
        let catalog = Dictionary::from_iter(vec![
            ("Type", "Catalog".into()),
            ("PageLayout", "OneColumn".into()),
            ("PageMode", "UseNone".into()),
            ("Pages", Reference(pages_id)),
        ]);
        let catalog_id = self.inner_document.add_object(catalog);

        // The three Helvetica faces are Base-14 fonts, so a simple Type1
        // dictionary per face suffices and no font program is embedded.
        let mut fonts_dictionary = Dictionary::new();
        for face in Face::ALL {
            let font = Dictionary::from_iter(vec![
                ("Type", "Font".into()),
                ("Subtype", "Type1".into()),
                ("BaseFont", face.base_font().into()),
                ("Encoding", "WinAnsiEncoding".into()),
            ]);
            let font_id = self.inner_document.add_object(font);
            fonts_dictionary.set(face.resource_name(), Reference(font_id));
        }
        let fonts_dictionary_id = self.inner_document.add_object(fonts_dictionary);
        let resources = Dictionary::from_iter(vec![("Font", Reference(fonts_dictionary_id))]);
        let resources_id = self.inner_document.add_object(resources);

        let page_box: Object = vec![
            0.into(),
            0.into(),
            PAGE_WIDTH.into(),
            PAGE_HEIGHT.into(),
        ]
        .into();

        let mut page_ids = Vec::<Object>::new();
        for page in mem::take(&mut self.pages) {
            let content = Content {
                operations: page.operations,
            };
            // Streams stay uncompressed so renders remain byte-reproducible.
            let content_stream = Stream::new(Dictionary::new(), content.encode()?);
            let page_content_id = self.inner_document.add_object(content_stream);

            let page_dictionary = Dictionary::from_iter(vec![
                ("Type", "Page".into()),
                ("Rotate", Integer(0)),
                ("MediaBox", page_box.clone()),
                ("TrimBox", page_box.clone()),
                ("CropBox", page_box.clone()),
                ("Parent", Reference(pages_id)),
                ("Resources", Reference(resources_id)),
                ("Contents", Reference(page_content_id)),
            ]);
            let page_id = self.inner_document.add_object(page_dictionary);
            page_ids.push(Reference(page_id));
        }

        let pages = Dictionary::from_iter(vec![
            ("Type", "Pages".into()),
            ("Count", Integer(page_ids.len() as i64)),
            ("Kids", page_ids.into()),
        ]);
        self.inner_document
            .objects
            .insert(pages_id, DictionaryObject(pages));

        self.inner_document
            .trailer
            .set("Root", Reference(catalog_id));
        self.inner_document
            .trailer
            .set("Info", Reference(document_info_id));
        self.inner_document.trailer.set(
            "ID",
            Object::Array(vec![
                String(self.identifier.clone().into_bytes(), Literal),
                String(self.identifier.clone().into_bytes(), Literal),
            ]),
        );

        Ok(())
    }
}

/// Formats the given time so that it matches what the PDF specification
/// expects, for example `D:20170505150224+02'00'`.
fn to_pdf_timestamp_format(date: &OffsetDateTime) -> String {
    let offset = date.offset();
    let offset_sign = if offset.is_negative() { '-' } else { '+' };
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{offset_sign}{:02}'{:02}'",
        date.year(),
        u8::from(date.month()),
        date.day(),
        date.hour(),
        date.minute(),
        date.second(),
        offset.whole_hours().abs(),
        offset.minutes_past_hour().abs(),
    )
}
