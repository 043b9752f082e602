mod logo;
mod table;

pub use logo::Logo;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::fonts::{StandardFont, register_standard_fonts, to_winansi_bytes};
use crate::sheet::{Block, LogoBlock, Page, StampBlock, TextBlock};

use table::render_grid;

const LOGO_XOBJECT: &str = "Im1";

/// Accumulates finished pages of one generation request. Not shared between
/// requests: each call to the assembler owns a fresh canvas.
pub struct Canvas {
    page_width: f32,
    page_height: f32,
    pages: Vec<Vec<u8>>, // compressed content streams
    logo: Option<Logo>,
}

impl Canvas {
    pub fn new(page_width: f32, page_height: f32) -> Self {
        Self {
            page_width,
            page_height,
            pages: Vec::new(),
            logo: None,
        }
    }

    pub fn set_logo(&mut self, logo: Logo) {
        self.logo = Some(logo);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Draw every block of `page` in order, then close the page. A failure
    /// leaves no trace of the page on the canvas.
    pub fn render_page(&mut self, page: &Page) -> Result<(), Error> {
        let mut content = Content::new();
        for block in &page.blocks {
            match block {
                Block::Title(t)
                | Block::Subtitle(t)
                | Block::Info(t)
                | Block::Certification(t)
                | Block::PageNumber(t) => draw_text(&mut content, t)?,
                Block::Grid(g) => render_grid(&mut content, g)?,
                Block::Stamp(s) => draw_stamp(&mut content, s)?,
                Block::Logo(l) => self.draw_logo(&mut content, l)?,
            }
        }
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        self.pages.push(compressed);
        Ok(())
    }

    fn draw_logo(&self, content: &mut Content, block: &LogoBlock) -> Result<(), Error> {
        if self.logo.is_none() {
            return Err(Error::RenderingFailed(
                "logo block on a canvas without a logo".into(),
            ));
        }
        content.save_state();
        content.transform([block.width, 0.0, 0.0, block.height, block.x, block.y]);
        content.x_object(Name(LOGO_XOBJECT.as_bytes()));
        content.restore_state();
        Ok(())
    }

    /// Serialize all pages into one PDF.
    pub fn finish(self) -> Result<Vec<u8>, Error> {
        if self.pages.is_empty() {
            return Err(Error::RenderingFailed("document has no pages".into()));
        }

        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let info_id = alloc();

        let fonts = register_standard_fonts(&mut pdf, &mut alloc);

        let logo_ref = self
            .logo
            .as_ref()
            .map(|logo| logo.embed(&mut pdf, &mut alloc));

        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

        for (i, stream) in self.pages.iter().enumerate() {
            pdf.stream(content_ids[i], stream).filter(Filter::FlateDecode);
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);
        pdf.document_info(info_id)
            .title(TextStr("Feuille d'émargement"))
            .producer(TextStr(concat!("feuille-emargement ", env!("CARGO_PKG_VERSION"))));

        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(Rect::new(0.0, 0.0, self.page_width, self.page_height))
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            {
                let mut font_dict = resources.fonts();
                for (font, font_ref) in &fonts {
                    font_dict.pair(Name(font.pdf_name().as_bytes()), *font_ref);
                }
            }
            if let Some(xobj_ref) = logo_ref {
                resources
                    .x_objects()
                    .pair(Name(LOGO_XOBJECT.as_bytes()), xobj_ref);
            }
        }

        Ok(pdf.finish())
    }
}

fn draw_text(content: &mut Content, t: &TextBlock) -> Result<(), Error> {
    draw_text_at(content, &t.text, t.font, t.font_size, t.x, t.baseline, t.color)
}

fn draw_text_at(
    content: &mut Content,
    text: &str,
    font: StandardFont,
    font_size: f32,
    x: f32,
    baseline: f32,
    color: Option<[u8; 3]>,
) -> Result<(), Error> {
    if !x.is_finite() || !baseline.is_finite() {
        return Err(Error::RenderingFailed(format!(
            "non-finite position ({x}, {baseline}) for {text:?}"
        )));
    }
    let bytes = to_winansi_bytes(text)?;
    content.save_state();
    if let Some([r, g, b]) = color {
        content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    }
    content.begin_text();
    content.set_font(Name(font.pdf_name().as_bytes()), font_size);
    content.next_line(x, baseline);
    content.show(Str(&bytes));
    content.end_text();
    content.restore_state();
    Ok(())
}

fn draw_stamp(content: &mut Content, stamp: &StampBlock) -> Result<(), Error> {
    content.save_state();
    content.set_line_width(1.0);
    content.rect(stamp.x, stamp.y, stamp.width, stamp.height);
    content.stroke();
    content.restore_state();
    draw_text(content, &stamp.caption)
}
