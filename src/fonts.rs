use pdf_writer::{Name, Pdf, Ref};

use crate::error::Error;

/// The three base-14 faces used on a sheet. None are embedded; every reader
/// ships them, so only widths are needed for centring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl StandardFont {
    pub const ALL: [StandardFont; 3] = [
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
    ];

    /// Resource name used in page content streams.
    pub(crate) fn pdf_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "F1",
            StandardFont::HelveticaBold => "F2",
            StandardFont::HelveticaOblique => "F3",
        }
    }

    pub(crate) fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            // Oblique shares the upright metrics.
            StandardFont::Helvetica | StandardFont::HelveticaOblique => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Width of a single character in 1000-units.
    pub(crate) fn char_width_1000(self, ch: char) -> f32 {
        let ch = match ch {
            '\u{2019}' | '\u{2018}' if self == StandardFont::HelveticaBold => return 278.0,
            '\u{2019}' | '\u{2018}' => return 222.0,
            'ì'..='ï' => return 278.0,
            '\u{00A0}' => ' ',
            c => base_letter(c),
        };
        match ch as u32 {
            0x20..=0x7E => self.widths()[(ch as u32 - 0x20) as usize] as f32,
            _ => 556.0,
        }
    }

    /// Advance width of `text` at `font_size` points.
    pub fn text_width(self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }
}

/// Helvetica AFM widths for ASCII 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // p..~
];

/// Helvetica-Bold AFM widths for ASCII 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Accented Latin-1 letters share the advance of their base letter.
fn base_letter(c: char) -> char {
    match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        c => c,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Any character outside the code page fails the whole string.
pub(crate) fn to_winansi_bytes(s: &str) -> Result<Vec<u8>, Error> {
    s.chars()
        .map(|c| match char_to_winansi(c) {
            0 => Err(Error::RenderingFailed(format!(
                "character {c:?} in {s:?} has no WinAnsi encoding"
            ))),
            b => Ok(b),
        })
        .collect()
}

/// Write the Type1 font dictionaries for every face and return their refs in
/// `StandardFont::ALL` order.
pub(crate) fn register_standard_fonts(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
) -> Vec<(StandardFont, Ref)> {
    StandardFont::ALL
        .into_iter()
        .map(|font| {
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(font.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            log::debug!("register_font: {} as /{}", font.base_font(), font.pdf_name());
            (font, font_ref)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accented_capital_encodes_to_latin1_byte() {
        let bytes = to_winansi_bytes("FEUILLE D'ÉMARGEMENT").unwrap();
        assert!(bytes.contains(&0xC9));
        assert_eq!(bytes.len(), "FEUILLE D'ÉMARGEMENT".chars().count());
    }

    #[test]
    fn unmappable_character_is_an_error() {
        let err = to_winansi_bytes("Łukasz").unwrap_err();
        assert!(matches!(err, Error::RenderingFailed(_)));
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let text = "Signature CFA";
        assert!(
            StandardFont::HelveticaBold.text_width(text, 8.0)
                > StandardFont::Helvetica.text_width(text, 8.0)
        );
    }

    #[test]
    fn digits_are_fixed_width() {
        let w = StandardFont::Helvetica.text_width("08/01/2024", 10.0);
        // eight digits at 556 and two slashes at 278
        assert!((w - (8.0 * 5.56 + 2.0 * 2.78)).abs() < 0.01);
    }
}
