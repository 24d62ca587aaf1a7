use unicode_normalization::UnicodeNormalization as _;

/// The three faces of the Helvetica family used by the quotation document.
/// These are PDF Base-14 fonts: every conforming reader ships them, so the
/// document embeds no font programs and the advance widths below are the
/// standard Adobe metrics in 1/1000 em units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Regular,
    Bold,
    Oblique,
}

impl Face {
    pub const ALL: [Face; 3] = [Face::Regular, Face::Bold, Face::Oblique];

    /// The `BaseFont` name written into the font dictionary.
    pub fn base_font(self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "Helvetica-Bold",
            Face::Oblique => "Helvetica-Oblique",
        }
    }

    /// The resource name the content streams select the face by.
    pub fn resource_name(self) -> &'static str {
        match self {
            Face::Regular => "F0",
            Face::Bold => "F1",
            Face::Oblique => "F2",
        }
    }

    /// The horizontal advance of a WinAnsi-encoded byte, in 1/1000 em.
    pub fn advance_width_units(self, byte: u8) -> u16 {
        let bold = matches!(self, Face::Bold);
        match byte {
            0x20..=0x7e => {
                let table: &[u16; 95] = if bold {
                    &HELVETICA_BOLD_ASCII_WIDTHS
                } else {
                    // Helvetica-Oblique shares the upright metrics.
                    &HELVETICA_ASCII_WIDTHS
                };
                table[(byte - 0x20) as usize]
            }
            0x91 | 0x92 => {
                if bold {
                    278
                } else {
                    222
                }
            }
            0x93 | 0x94 => {
                if bold {
                    500
                } else {
                    333
                }
            }
            0x95 => 350,
            0x96 => 556,
            0x97 => 1000,
            0x80 => 556,
            0xa0..=0xff => {
                let table: &[u16; 96] = if bold {
                    &HELVETICA_BOLD_LATIN1_WIDTHS
                } else {
                    &HELVETICA_LATIN1_WIDTHS
                };
                table[(byte - 0xa0) as usize]
            }
            // Remaining CP-1252 control-range bytes, which the encoder never
            // emits.
            _ => {
                if bold {
                    611
                } else {
                    556
                }
            }
        }
    }
}

/// Encodes text into WinAnsi bytes for a content stream. The text is first
/// normalized in the NFC form; characters outside WinAnsi are substituted
/// with `?` and logged, so measurement and emission always agree.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for character in text.nfc() {
        match win_ansi_byte(character) {
            Some(byte) => bytes.push(byte),
            None => {
                log::warn!(
                    "Unable to map the character {:?} to WinAnsi, substituting '?'",
                    character
                );
                bytes.push(b'?');
            }
        }
    }
    bytes
}

/// The width of `text` in user-space points at the given font size, measured
/// over the same WinAnsi substitution the emission path applies.
pub fn text_width(face: Face, text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .nfc()
        .map(|character| {
            let byte = win_ansi_byte(character).unwrap_or(b'?');
            u32::from(face.advance_width_units(byte))
        })
        .sum();
    units as f32 * font_size / 1000.0
}

fn win_ansi_byte(character: char) -> Option<u8> {
    match character {
        '\u{20}'..='\u{7e}' => Some(character as u8),
        '\u{a0}'..='\u{ff}' => Some(character as u32 as u8),
        '\u{20ac}' => Some(0x80),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201c}' => Some(0x93),
        '\u{201d}' => Some(0x94),
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        _ => None,
    }
}

// Advance widths for the printable ASCII range 0x20..=0x7E, from the Adobe
// AFM files for the Helvetica family.
#[rustfmt::skip]
const HELVETICA_ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

// Advance widths for the Latin-1 range 0xA0..=0xFF, from the same AFM files.
#[rustfmt::skip]
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_widths_vary() {
        let narrow = text_width(Face::Regular, "i", 12.0);
        let wide = text_width(Face::Regular, "W", 12.0);
        assert!(narrow < wide);
    }

    #[test]
    fn bold_face_is_wider_where_the_metrics_differ() {
        // 'f' is 278 upright and 333 bold.
        assert!(
            Face::Bold.advance_width_units(b'f') > Face::Regular.advance_width_units(b'f')
        );
        // The oblique face shares the upright metrics.
        assert_eq!(
            Face::Oblique.advance_width_units(b'f'),
            Face::Regular.advance_width_units(b'f')
        );
    }

    #[test]
    fn latin_1_range_carries_the_afm_metrics() {
        // degree, middle dot and one-half differ from the letter widths.
        assert_eq!(Face::Regular.advance_width_units(0xb0), 400);
        assert_eq!(Face::Regular.advance_width_units(0xb7), 278);
        assert_eq!(Face::Regular.advance_width_units(0xbd), 834);
        assert_eq!(Face::Bold.advance_width_units(0xa6), 280);
        // Accented letters keep the width of their base letter.
        assert_eq!(
            Face::Regular.advance_width_units(0xe9),
            Face::Regular.advance_width_units(b'e')
        );
        assert_eq!(
            Face::Bold.advance_width_units(0xc9),
            Face::Bold.advance_width_units(b'E')
        );
    }

    #[test]
    fn bullet_maps_into_win_ansi() {
        assert_eq!(encode_win_ansi("\u{2022} Item"), b"\x95 Item".to_vec());
    }

    #[test]
    fn unmappable_characters_are_substituted() {
        let encoded = encode_win_ansi("a\u{20b9}b");
        assert_eq!(encoded, b"a?b".to_vec());
        // The measurement path applies the same substitution.
        assert_eq!(
            text_width(Face::Regular, "a\u{20b9}b", 9.0),
            text_width(Face::Regular, "a?b", 9.0)
        );
    }

    #[test]
    fn text_width_scales_with_font_size() {
        let at_ten = text_width(Face::Regular, "Quotation", 10.0);
        let at_twenty = text_width(Face::Regular, "Quotation", 20.0);
        assert!((at_twenty - 2.0 * at_ten).abs() < 1.0e-4);
    }
}
