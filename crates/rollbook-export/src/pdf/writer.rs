use chrono::{DateTime, Utc};

use super::font::Font;
use super::literal;
use super::page::{PAGE_HEIGHT, PAGE_WIDTH, Page};

const CATALOG: u32 = 1;
const PAGES: u32 = 2;
const FONT_REGULAR: u32 = 3;
const FONT_BOLD: u32 = 4;
const INFO: u32 = 5;
const FIRST_FREE: u32 = 6;

pub struct PdfWriter {
    position: usize,
    /// Byte offset of each object, indexed by object number.
    offsets: Vec<usize>,
    next_id: u32,
    pages: Vec<u32>,
    title: String,
    created: DateTime<Utc>,
}

impl PdfWriter {
    pub fn new(title: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            position: 0,
            offsets: vec![0; FIRST_FREE as usize],
            next_id: FIRST_FREE,
            pages: Vec::new(),
            title: title.into(),
            created,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// File header and the two font resources.
    pub fn begin(&mut self) -> Vec<u8> {
        let mut out = Vec::new();
        self.raw(&mut out, b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");
        for (id, font) in [(FONT_REGULAR, Font::Regular), (FONT_BOLD, Font::Bold)] {
            let body = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            );
            self.object(&mut out, id, body.as_bytes());
        }
        out
    }

    /// Content stream and page object for a finished page.
    pub fn page(&mut self, page: &Page) -> Vec<u8> {
        let mut out = Vec::new();
        let content_id = self.allocate();
        let page_id = self.allocate();

        let content = page.content();
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(content);
        stream.extend_from_slice(b"\nendstream");
        self.object(&mut out, content_id, &stream);

        let body = format!(
            "<< /Type /Page /Parent {PAGES} 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 {FONT_REGULAR} 0 R /F2 {FONT_BOLD} 0 R >> >> \
             /Contents {content_id} 0 R >>",
            PAGE_WIDTH, PAGE_HEIGHT
        );
        self.object(&mut out, page_id, body.as_bytes());
        self.pages.push(page_id);
        out
    }

    /// Page tree, catalog, document info, cross-reference table and trailer.
    pub fn finish(&mut self) -> Vec<u8> {
        let mut out = Vec::new();

        let kids = self
            .pages
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        let pages = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            self.pages.len()
        );
        self.object(&mut out, PAGES, pages.as_bytes());

        let catalog = format!("<< /Type /Catalog /Pages {PAGES} 0 R >>");
        self.object(&mut out, CATALOG, catalog.as_bytes());

        let info = format!(
            "<< /Title {} /Producer (Rollbook) /CreationDate (D:{}Z) >>",
            literal(&self.title),
            self.created.format("%Y%m%d%H%M%S")
        );
        self.object(&mut out, INFO, info.as_bytes());

        let xref_at = self.position;
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.next_id);
        for offset in &self.offsets[1..] {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root {CATALOG} 0 R /Info {INFO} 0 R >>\nstartxref\n{}\n%%EOF\n",
            self.next_id, xref_at
        ));
        self.raw(&mut out, xref.as_bytes());
        out
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.offsets.push(0);
        id
    }

    fn object(&mut self, out: &mut Vec<u8>, id: u32, body: &[u8]) {
        self.offsets[id as usize] = self.position;
        self.raw(out, format!("{} 0 obj\n", id).as_bytes());
        self.raw(out, body);
        self.raw(out, b"\nendobj\n");
    }

    fn raw(&mut self, out: &mut Vec<u8>, bytes: &[u8]) {
        out.extend_from_slice(bytes);
        self.position += bytes.len();
    }
}
