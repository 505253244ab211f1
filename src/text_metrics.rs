use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::unsync::OnceCell;
use std::cell::RefCell;
use std::collections::HashMap;
use ttf_parser::Face;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.4;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextSize {
    pub width: f32,
    pub height: f32,
}

/// Text measurement oracle consumed by node sizing.
///
/// Implementations must be deterministic: identical arguments always give
/// identical sizes, otherwise layouts are not reproducible.
pub trait TextMeasure {
    /// Width of a single line of text, without line breaks.
    fn line_width(&self, line: &str, font_size: f32, font_family: &str, font_weight: u16) -> f32;

    /// Size of possibly multi-line text. Lines are split on `\n`; the width
    /// is the widest line and the height is one line height per line.
    fn measure(&self, text: &str, font_size: f32, font_family: &str, font_weight: u16) -> TextSize {
        if font_size <= 0.0 {
            return TextSize::default();
        }
        let lines = split_lines(text);
        let width = lines
            .iter()
            .map(|line| self.line_width(line, font_size, font_family, font_weight))
            .fold(0.0, f32::max);
        TextSize {
            width,
            height: LINE_HEIGHT_FACTOR * font_size * lines.len() as f32,
        }
    }

    /// Greedy word wrap. Explicit line breaks are kept; a single word wider
    /// than `max_width` gets a line of its own.
    fn wrap(
        &self,
        text: &str,
        max_width: f32,
        font_size: f32,
        font_family: &str,
        font_weight: u16,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        for raw in split_lines(text) {
            if self.line_width(raw, font_size, font_family, font_weight) <= max_width {
                lines.push(raw.to_string());
                continue;
            }
            let mut current = String::new();
            for word in raw.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if self.line_width(&candidate, font_size, font_family, font_weight) > max_width {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    current.push_str(word);
                } else {
                    current = candidate;
                }
            }
            lines.push(current);
        }
        lines
    }
}

pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Calibrated per-character widths. Needs no fonts, so results are the same
/// on every machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMetrics;

impl TextMeasure for HeuristicMetrics {
    fn line_width(&self, line: &str, font_size: f32, _font_family: &str, font_weight: u16) -> f32 {
        let units: f32 = line
            .chars()
            .map(|ch| match ch {
                '\t' => char_width_factor(' ') * 4.0,
                _ => char_width_factor(ch),
            })
            .sum();
        units * font_size * weight_factor(font_weight)
    }
}

fn weight_factor(font_weight: u16) -> f32 {
    if font_weight >= 600 { 1.06 } else { 1.0 }
}

pub(crate) fn char_width_factor(ch: char) -> f32 {
    // Calibrated against a trebuchet/verdana stack at a 16px baseline.
    match ch {
        ' ' => 0.306,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        'A' => 0.652,
        'B' => 0.648,
        'C' => 0.734,
        'D' => 0.723,
        'E' => 0.594,
        'F' => 0.575,
        'G' | 'H' => 0.742,
        'I' => 0.272,
        'J' => 0.557,
        'K' => 0.648,
        'L' => 0.559,
        'M' => 0.903,
        'N' => 0.763,
        'O' => 0.754,
        'P' => 0.623,
        'Q' => 0.755,
        'R' => 0.637,
        'S' => 0.633,
        'T' => 0.599,
        'U' => 0.746,
        'V' => 0.661,
        'W' => 0.958,
        'X' => 0.655,
        'Y' => 0.646,
        'Z' => 0.621,
        'a' => 0.550,
        'b' => 0.603,
        'c' => 0.547,
        'd' => 0.609,
        'e' => 0.570,
        'f' => 0.340,
        'g' | 'h' => 0.600,
        'i' => 0.235,
        'j' => 0.227,
        'k' => 0.522,
        'l' => 0.239,
        'm' => 0.867,
        'n' => 0.585,
        'o' => 0.574,
        'p' => 0.595,
        'q' => 0.585,
        'r' => 0.364,
        's' => 0.523,
        't' => 0.305,
        'u' => 0.585,
        'v' => 0.545,
        'w' => 0.811,
        'x' => 0.538,
        'y' => 0.556,
        'z' => 0.550,
        '0' => 0.613,
        '1' => 0.396,
        '2' => 0.609,
        '3' => 0.597,
        '4' => 0.614,
        '5' => 0.586,
        '6' => 0.608,
        '7' => 0.559,
        '8' => 0.611,
        '9' => 0.595,
        '@' | '#' | '%' | '&' => 0.946,
        c if is_wide(c) => 1.0,
        _ => 0.568,
    }
}

fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F | 0xFF00..=0xFF60 | 0xFFE0..=0xFFE6 | 0x1F300..=0x1FAFF)
}

/// Measures text with system fonts.
///
/// The font database is loaded on first use and faces are cached per
/// (family, weight) for the lifetime of the measurer. Characters with no
/// glyph, or families that resolve to no face at all, fall back to the
/// heuristic table.
#[derive(Default)]
pub struct FontMetrics {
    db: OnceCell<Database>,
    faces: RefCell<HashMap<(String, u16), Option<FontFace>>>,
}

impl FontMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an already populated database instead of the system fonts.
    pub fn with_database(db: Database) -> Self {
        let metrics = Self::default();
        let _ = metrics.db.set(db);
        metrics
    }

    fn database(&self) -> &Database {
        self.db.get_or_init(|| {
            let mut db = Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts");
            db
        })
    }

    fn load_face(&self, font_family: &str, font_weight: u16) -> Option<FontFace> {
        let names = parse_family_list(font_family);
        let families: Vec<Family<'_>> = names
            .iter()
            .map(|token| match token {
                FamilyToken::Generic(family) => *family,
                FamilyToken::Name(name) => Family::Name(name.as_str()),
            })
            .collect();
        let query = Query {
            families: &families,
            weight: Weight(font_weight),
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let db = self.database();
        let id = db.query(&query)?;
        let face = db
            .with_face_data(id, |data, index| FontFace::parse(data.to_vec(), index))
            .flatten();
        if face.is_none() {
            tracing::warn!(family = font_family, "font face failed to parse");
        }
        face
    }
}

impl TextMeasure for FontMetrics {
    fn line_width(&self, line: &str, font_size: f32, font_family: &str, font_weight: u16) -> f32 {
        if line.is_empty() || font_size <= 0.0 {
            return 0.0;
        }
        let key = (normalize_family_key(font_family), font_weight);
        let mut faces = self.faces.borrow_mut();
        let face = faces
            .entry(key)
            .or_insert_with(|| self.load_face(font_family, font_weight));
        match face {
            Some(face) => face.line_width(line, font_size),
            None => HeuristicMetrics.line_width(line, font_size, font_family, font_weight),
        }
    }
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
    advance_cache: HashMap<char, Option<u16>>,
}

impl FontFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph_id) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph_id).unwrap_or(0);
            }
        }
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
            advance_cache: HashMap::new(),
        })
    }

    fn advance(&mut self, ch: char) -> Option<u16> {
        if ch.is_ascii() {
            let advance = self.ascii_advances[ch as usize];
            return (advance != 0).then_some(advance);
        }
        if let Some(cached) = self.advance_cache.get(&ch) {
            return *cached;
        }
        let advance = Face::parse(&self.data, self.index).ok().and_then(|face| {
            let glyph = face.glyph_index(ch)?;
            face.glyph_hor_advance(glyph)
        });
        self.advance_cache.insert(ch, advance);
        advance
    }

    fn line_width(&mut self, line: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em as f32;
        let mut width = 0.0f32;
        for ch in line.chars() {
            let ch = if ch == '\t' { ' ' } else { ch };
            width += match self.advance(ch) {
                Some(advance) => advance as f32 * scale,
                None => char_width_factor(ch) * font_size,
            };
        }
        width.max(0.0)
    }
}

enum FamilyToken {
    Generic(Family<'static>),
    Name(String),
}

fn parse_family_list(font_family: &str) -> Vec<FamilyToken> {
    let mut tokens = Vec::new();
    for part in font_family.split(',') {
        let raw = part.trim().trim_matches('"').trim_matches('\'');
        if raw.is_empty() {
            continue;
        }
        let token = match raw.to_ascii_lowercase().as_str() {
            "serif" => FamilyToken::Generic(Family::Serif),
            "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                FamilyToken::Generic(Family::SansSerif)
            }
            "monospace" | "ui-monospace" => FamilyToken::Generic(Family::Monospace),
            "cursive" => FamilyToken::Generic(Family::Cursive),
            "fantasy" => FamilyToken::Generic(Family::Fantasy),
            _ => FamilyToken::Name(raw.to_string()),
        };
        tokens.push(token);
    }
    if tokens.is_empty() {
        tokens.push(FamilyToken::Generic(Family::SansSerif));
    }
    tokens
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_measure_uses_widest_line() {
        let metrics = HeuristicMetrics;
        let single = metrics.measure("a much longer line", 16.0, "sans-serif", 400);
        let multi = metrics.measure("short\na much longer line", 16.0, "sans-serif", 400);
        assert_eq!(multi.width, single.width);
        assert!((single.height - 1.4 * 16.0).abs() < 1e-4);
        assert!((multi.height - 2.0 * 1.4 * 16.0).abs() < 1e-4);
    }

    #[test]
    fn width_scales_with_font_size() {
        let metrics = HeuristicMetrics;
        let w16 = metrics.line_width("Hello", 16.0, "sans-serif", 400);
        let w32 = metrics.line_width("Hello", 32.0, "sans-serif", 400);
        assert!((w32 - w16 * 2.0).abs() < 0.01);
    }

    #[test]
    fn bold_text_is_wider() {
        let metrics = HeuristicMetrics;
        let regular = metrics.line_width("Topic", 16.0, "sans-serif", 400);
        let bold = metrics.line_width("Topic", 16.0, "sans-serif", 700);
        assert!(bold > regular);
    }

    #[test]
    fn non_positive_font_size_measures_nothing() {
        assert_eq!(
            HeuristicMetrics.measure("abc", 0.0, "sans-serif", 400),
            TextSize::default()
        );
    }

    #[test]
    fn wrap_keeps_short_lines() {
        let lines = HeuristicMetrics.wrap("short", 1000.0, 16.0, "sans-serif", 400);
        assert_eq!(lines, vec!["short"]);
    }

    #[test]
    fn wrap_splits_long_lines_greedily() {
        let lines = HeuristicMetrics.wrap(
            "this is a rather long line that should be wrapped",
            100.0,
            16.0,
            "sans-serif",
            400,
        );
        assert!(lines.len() > 1, "expected wrapping, got {lines:?}");
        for line in &lines {
            let fits = HeuristicMetrics.line_width(line, 16.0, "sans-serif", 400) <= 100.0;
            assert!(fits || !line.contains(' '), "line {line:?} overflows");
        }
        assert_eq!(
            lines.join(" "),
            "this is a rather long line that should be wrapped"
        );
    }

    #[test]
    fn wrap_preserves_explicit_breaks() {
        let lines = HeuristicMetrics.wrap("one\ntwo", 1000.0, 16.0, "sans-serif", 400);
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn split_lines_strips_carriage_returns() {
        assert_eq!(split_lines("a\r\nb"), vec!["a", "b"]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn empty_font_database_falls_back_to_heuristic() {
        let metrics = FontMetrics::with_database(Database::new());
        let width = metrics.line_width("Hello", 16.0, "sans-serif", 400);
        let expected = HeuristicMetrics.line_width("Hello", 16.0, "sans-serif", 400);
        assert!((width - expected).abs() < 1e-4);
    }

    #[test]
    fn family_list_maps_generics() {
        let tokens = parse_family_list("\"trebuchet ms\", verdana, sans-serif");
        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[0], FamilyToken::Name(ref name) if name == "trebuchet ms"));
        assert!(matches!(tokens[2], FamilyToken::Generic(Family::SansSerif)));
    }
}
