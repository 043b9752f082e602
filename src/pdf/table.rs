use pdf_writer::Content;

use crate::error::Error;
use crate::fonts::StandardFont;
use crate::sheet::{GridBlock, HEADER_BACKGROUND, HEADER_TEXT};

use super::draw_text_at;

/// Padding above cell text in every row.
const CELL_TOP_PADDING: f32 = 3.0;
/// Padding below cell text in body rows (the header has its own).
const CELL_BOTTOM_PADDING: f32 = 3.0;

fn rgb(content: &mut Content, [r, g, b]: [u8; 3]) {
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

/// Baseline that vertically centres a line of `font_size` text inside the
/// padded cell box.
fn middle_baseline(
    row_bottom: f32,
    row_h: f32,
    pad_top: f32,
    pad_bottom: f32,
    font_size: f32,
) -> f32 {
    let avail = (row_h - pad_top - pad_bottom).max(0.0);
    let center = row_bottom + pad_bottom + avail / 2.0;
    center - font_size * 0.35
}

pub(super) fn render_grid(content: &mut Content, block: &GridBlock) -> Result<(), Error> {
    let col_widths = block.grid.col_widths();
    let total_w: f32 = col_widths.iter().sum();
    let row_h = block.row_height;
    let col_lefts: Vec<f32> = col_widths
        .iter()
        .scan(block.x, |x, w| {
            let left = *x;
            *x += w;
            Some(left)
        })
        .collect();

    // Header fill goes first so the grid lines stay on top of it.
    let header_bottom = block.top - row_h;
    content.save_state();
    rgb(content, HEADER_BACKGROUND);
    content.rect(block.x, header_bottom, total_w, row_h);
    content.fill_nonzero();
    content.restore_state();

    let header_baseline = middle_baseline(
        header_bottom,
        row_h,
        CELL_TOP_PADDING,
        block.header_bottom_padding,
        block.header_font_size,
    );
    for ((column, &left), &w) in block.grid.columns.iter().zip(&col_lefts).zip(&col_widths) {
        draw_centered(
            content,
            column.label(),
            StandardFont::HelveticaBold,
            block.header_font_size,
            left,
            w,
            header_baseline,
            Some(HEADER_TEXT),
        )?;
    }

    for (ri, row) in block.grid.rows.iter().enumerate() {
        let row_bottom = header_bottom - row_h * (ri + 1) as f32;
        let baseline = middle_baseline(
            row_bottom,
            row_h,
            CELL_TOP_PADDING,
            CELL_BOTTOM_PADDING,
            block.body_font_size,
        );
        for ((&column, &left), &w) in block.grid.columns.iter().zip(&col_lefts).zip(&col_widths) {
            let text = row.cell(column);
            if text.is_empty() {
                continue;
            }
            draw_centered(
                content,
                &text,
                StandardFont::Helvetica,
                block.body_font_size,
                left,
                w,
                baseline,
                None,
            )?;
        }
    }

    let bottom = block.bottom();
    content.save_state();
    content.set_line_width(block.line_width);
    content.set_stroke_gray(0.0);
    for i in 0..=block.grid.rows.len() + 1 {
        let y = block.top - row_h * i as f32;
        content.move_to(block.x, y);
        content.line_to(block.x + total_w, y);
    }
    for x in col_lefts.iter().copied().chain(std::iter::once(block.x + total_w)) {
        content.move_to(x, block.top);
        content.line_to(x, bottom);
    }
    content.stroke();
    content.restore_state();

    log::debug!(
        "GRID cols={} rows={} row_h={:.1} top={:.1} bottom={:.1}",
        block.grid.columns.len(),
        block.grid.rows.len(),
        row_h,
        block.top,
        bottom
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_centered(
    content: &mut Content,
    text: &str,
    font: StandardFont,
    font_size: f32,
    cell_x: f32,
    cell_w: f32,
    baseline: f32,
    color: Option<[u8; 3]>,
) -> Result<(), Error> {
    let x = cell_x + (cell_w - font.text_width(text, font_size)) / 2.0;
    draw_text_at(content, text, font, font_size, x, baseline, color)
}
