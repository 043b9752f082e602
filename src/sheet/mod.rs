mod grid;
mod policy;

pub use grid::{Column, Grid, GridRow, build_grid};
pub use policy::{LayoutPolicy, inter_block_spacing, row_height};

use crate::error::Error;
use crate::fonts::StandardFont;
use crate::model::{Candidate, CandidateId, Period, PeriodId, Session};
use crate::options::{LayoutOptions, LogoAlignment};

pub const TITLE: &str = "FEUILLE D'ÉMARGEMENT CFA";
pub const CERTIFICATION: &str = "Certifié exact pour le CFA GH le :";
pub const STAMP_CAPTION: &str = "Cachet de l'entreprise";

const TITLE_OFFSET: f32 = 60.0;
const TITLE_GAP: f32 = 20.0;
const SUBTITLE_GAP: f32 = 20.0;
const INFO_INDENT: f32 = 50.0;
const INFO_LINE_GAP: f32 = 12.0;
const INFO_GRID_GAP: f32 = 15.0;
const GRID_X: f32 = 50.0;
const CERTIFICATION_X: f32 = 260.0;
const STAMP_X: f32 = 50.0;
const STAMP_DROP: f32 = 30.0;
const STAMP_WIDTH: f32 = 200.0;
const STAMP_HEIGHT: f32 = 50.0;
const STAMP_PADDING: f32 = 10.0;
const LOGO_MARGIN: f32 = 20.0;
const LOGO_HEIGHT: f32 = 50.0;
const LOGO_MAX_WIDTH: f32 = 120.0;
const FOOTER_BASELINE: f32 = 20.0;

// Helvetica ascender/descender, per 1000 units.
const ASCENT: f32 = 0.718;
const DESCENT: f32 = 0.207;

/// Header row fill, #2FAC66.
pub const HEADER_BACKGROUND: [u8; 3] = [0x2F, 0xAC, 0x66];
/// Header label colour (whitesmoke).
pub const HEADER_TEXT: [u8; 3] = [245, 245, 245];

#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub font: StandardFont,
    pub font_size: f32,
    pub x: f32,
    pub baseline: f32,
    pub color: Option<[u8; 3]>, // None = black
}

impl TextBlock {
    fn new(text: String, font: StandardFont, font_size: f32, x: f32, baseline: f32) -> Self {
        Self {
            text,
            font,
            font_size,
            x,
            baseline,
            color: None,
        }
    }

    fn centered(
        text: String,
        font: StandardFont,
        font_size: f32,
        page_width: f32,
        baseline: f32,
    ) -> Self {
        let width = font.text_width(&text, font_size);
        Self::new(text, font, font_size, (page_width - width) / 2.0, baseline)
    }

    pub fn width(&self) -> f32 {
        self.font.text_width(&self.text, self.font_size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridBlock {
    pub grid: Grid,
    pub x: f32,
    pub top: f32,
    pub row_height: f32,
    pub header_font_size: f32,
    pub header_bottom_padding: f32,
    pub body_font_size: f32,
    pub line_width: f32,
}

impl GridBlock {
    /// Header row plus one row per date.
    pub fn height(&self) -> f32 {
        self.row_height * (self.grid.rows.len() + 1) as f32
    }

    pub fn bottom(&self) -> f32 {
        self.top - self.height()
    }
}

/// Empty bordered box for the employer's stamp, caption inside its top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct StampBlock {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub caption: TextBlock,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogoBlock {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Title(TextBlock),
    Subtitle(TextBlock),
    Info(TextBlock),
    Grid(GridBlock),
    Certification(TextBlock),
    Stamp(StampBlock),
    Logo(LogoBlock),
    PageNumber(TextBlock),
}

impl Block {
    /// Vertical extent as (top, bottom), in page coordinates.
    pub fn extent(&self) -> (f32, f32) {
        match self {
            Block::Title(t)
            | Block::Subtitle(t)
            | Block::Info(t)
            | Block::Certification(t)
            | Block::PageNumber(t) => (
                t.baseline + t.font_size * ASCENT,
                t.baseline - t.font_size * DESCENT,
            ),
            Block::Grid(g) => (g.top, g.bottom()),
            Block::Stamp(s) => (s.y + s.height, s.y),
            Block::Logo(l) => (l.y + l.height, l.y),
        }
    }
}

/// One attendance sheet: a single (period, candidate) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub period_id: PeriodId,
    pub candidate_id: CandidateId,
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn grid(&self) -> Option<&GridBlock> {
        self.blocks.iter().find_map(|b| match b {
            Block::Grid(g) => Some(g),
            _ => None,
        })
    }

    /// Lowest point reached by any block.
    pub fn bottom(&self) -> f32 {
        self.blocks
            .iter()
            .map(|b| b.extent().1)
            .fold(f32::INFINITY, f32::min)
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Title(t)
            | Block::Subtitle(t)
            | Block::Info(t)
            | Block::Certification(t)
            | Block::PageNumber(t) => Some(t),
            Block::Stamp(s) => Some(&s.caption),
            Block::Grid(_) | Block::Logo(_) => None,
        })
    }
}

/// Ordered sheets of one generation request.
#[derive(Clone, Debug, PartialEq)]
pub struct AttendanceDocument {
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<Page>,
}

/// Lays out the blocks of one sheet with a top-down vertical cursor.
pub struct SheetBuilder<'a> {
    options: &'a LayoutOptions,
    page_width: f32,
    page_height: f32,
    logo_pixels: Option<(u32, u32)>,
}

impl<'a> SheetBuilder<'a> {
    pub fn new(options: &'a LayoutOptions) -> Self {
        let (page_width, page_height) = options.page_size.dimensions();
        Self {
            options,
            page_width,
            page_height,
            logo_pixels: None,
        }
    }

    /// Reserve a logo slot sized from the image's pixel dimensions.
    pub fn with_logo(mut self, pixel_width: u32, pixel_height: u32) -> Self {
        if pixel_width > 0 && pixel_height > 0 {
            self.logo_pixels = Some((pixel_width, pixel_height));
        }
        self
    }

    pub fn page_size(&self) -> (f32, f32) {
        (self.page_width, self.page_height)
    }

    pub fn build_page(
        &self,
        session: &Session,
        candidate: &Candidate,
        period: &Period,
    ) -> Result<Page, Error> {
        let mut grid = build_grid(period.start, period.end)?;
        if !self.options.include_candidate_signature_column {
            grid = grid.without_column(Column::CandidateSignature);
        }
        let date_count = grid.rows.len();
        let policy = &self.options.policy;
        let row_height = policy.row_height(date_count);

        let mut blocks = Vec::with_capacity(10);

        let title_y = self.page_height - TITLE_OFFSET;
        blocks.push(Block::Title(TextBlock::centered(
            TITLE.to_string(),
            StandardFont::HelveticaBold,
            18.0,
            self.page_width,
            title_y,
        )));

        let mut cursor = title_y - TITLE_GAP;
        blocks.push(Block::Subtitle(TextBlock::centered(
            session.display_name(),
            StandardFont::HelveticaOblique,
            14.0,
            self.page_width,
            cursor,
        )));
        cursor -= SUBTITLE_GAP;

        let info_lines = [
            format!("Candidat : {}", candidate.full_name()),
            format!("Période : {}", period.range_label()),
            format!("Nombre d'heures à effectuer : {}", period.duration_hours()),
        ];
        for (i, line) in info_lines.into_iter().enumerate() {
            if i > 0 {
                cursor -= INFO_LINE_GAP;
            }
            blocks.push(Block::Info(TextBlock::new(
                line,
                StandardFont::Helvetica,
                10.0,
                INFO_INDENT,
                cursor,
            )));
        }
        cursor -= INFO_GRID_GAP;

        let grid_block = GridBlock {
            grid,
            x: GRID_X,
            top: cursor,
            row_height,
            header_font_size: 8.0,
            header_bottom_padding: 10.0,
            body_font_size: 10.0,
            line_width: 0.5,
        };
        cursor = grid_block.bottom() - policy.inter_block_spacing(date_count);
        blocks.push(Block::Grid(grid_block));

        blocks.push(Block::Certification(TextBlock::new(
            CERTIFICATION.to_string(),
            StandardFont::Helvetica,
            10.0,
            CERTIFICATION_X,
            cursor,
        )));

        let stamp_y = cursor - STAMP_DROP;
        let caption_size = 8.0;
        blocks.push(Block::Stamp(StampBlock {
            x: STAMP_X,
            y: stamp_y,
            width: STAMP_WIDTH,
            height: STAMP_HEIGHT,
            caption: TextBlock::new(
                STAMP_CAPTION.to_string(),
                StandardFont::HelveticaOblique,
                caption_size,
                STAMP_X + STAMP_PADDING,
                stamp_y + STAMP_HEIGHT - STAMP_PADDING - caption_size,
            ),
        }));

        if let Some(logo) = self.logo_block() {
            blocks.push(Block::Logo(logo));
        }

        let page = Page {
            period_id: period.id,
            candidate_id: candidate.id,
            blocks,
        };

        let bottom = page.bottom();
        if bottom < 0.0 {
            log::warn!(
                "Sheet for period {} / candidate {} runs {:.1}pt below the page ({} dates)",
                period.id,
                candidate.id,
                -bottom,
                date_count
            );
        }
        log::debug!(
            "PAGE period={} candidate={} dates={} row_h={:.1} bottom={:.1}",
            period.id,
            candidate.id,
            date_count,
            row_height,
            bottom
        );

        Ok(page)
    }

    fn logo_block(&self) -> Option<LogoBlock> {
        if !self.options.include_logo {
            return None;
        }
        let (pw, ph) = self.logo_pixels?;
        let aspect = pw as f32 / ph as f32;
        let (width, height) = if LOGO_HEIGHT * aspect > LOGO_MAX_WIDTH {
            (LOGO_MAX_WIDTH, LOGO_MAX_WIDTH / aspect)
        } else {
            (LOGO_HEIGHT * aspect, LOGO_HEIGHT)
        };
        let x = match self.options.logo_alignment {
            LogoAlignment::Left => LOGO_MARGIN,
            LogoAlignment::Right => self.page_width - LOGO_MARGIN - width,
        };
        Some(LogoBlock {
            x,
            y: self.page_height - LOGO_MARGIN - height,
            width,
            height,
        })
    }

    /// Append the "Page n / N" footer; `number` is 1-based.
    pub fn number_page(&self, page: &mut Page, number: usize, total: usize) {
        if !self.options.footer_page_number {
            return;
        }
        page.blocks.push(Block::PageNumber(TextBlock::centered(
            format!("Page {number} / {total}"),
            StandardFont::Helvetica,
            8.0,
            self.page_width,
            FOOTER_BASELINE,
        )));
    }
}
