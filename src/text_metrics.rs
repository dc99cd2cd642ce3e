//! Text measurement for person boxes.
//!
//! Backed by system fonts through `fontdb`/`ttf-parser`, with a fixed
//! per-character heuristic as fallback. The `Typesetter` front end snaps
//! everything to whole pixels, which is what the layout passes work in.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Measures `text` in the resolved font, in pixels. `None` when no
/// matching font can be loaded.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure_width(text, font_size, font_family)
}

/// Full line height (ascent + descent + line gap) of the resolved font.
pub fn measure_line_height(font_size: f32, font_family: &str) -> Option<f32> {
    if font_size <= 0.0 {
        return None;
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.line_height(font_size, font_family)
}

/// Heuristic character cell used when system fonts are unavailable or
/// disabled. Roughly a Helvetica 'F' at the given size.
pub fn fallback_char_width(font_size: i32) -> i32 {
    ((font_size * 56 + 50) / 100).max(1)
}

pub fn fallback_line_height(font_size: i32) -> i32 {
    ((font_size * 4 + 2) / 3).max(1)
}

/// Pixel-snapped text measurement bound to one font selection.
///
/// The character cell (`char_width`, `line_height`) is fixed at
/// construction; the tree's spacing constants all derive from it.
#[derive(Debug, Clone)]
pub struct Typesetter {
    family: String,
    font_size: i32,
    use_system_fonts: bool,
    char_width: i32,
    line_height: i32,
}

impl Typesetter {
    pub fn new(family: &str, font_size: i32, use_system_fonts: bool) -> Self {
        let size = font_size.max(1);
        let mut char_width = fallback_char_width(size);
        let mut line_height = fallback_line_height(size);
        if use_system_fonts {
            if let Some(width) = measure_text_width("F", size as f32, family) {
                let width = width.round() as i32;
                if width > 0 {
                    char_width = width;
                }
            }
            if let Some(height) = measure_line_height(size as f32, family) {
                let height = height.round() as i32;
                if height > 0 {
                    line_height = height;
                }
            }
        }
        Self {
            family: family.to_string(),
            font_size: size,
            use_system_fonts,
            char_width,
            line_height,
        }
    }

    pub fn font_size(&self) -> i32 {
        self.font_size
    }

    /// Width of an average character; the unit behind trunk and branch
    /// lengths.
    pub fn char_width(&self) -> i32 {
        self.char_width
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    /// Width of a text run in pixels.
    pub fn text_width(&self, text: &str) -> i32 {
        if text.is_empty() {
            return 0;
        }
        if self.use_system_fonts
            && let Some(width) = measure_text_width(text, self.font_size as f32, &self.family)
        {
            return width.round() as i32;
        }
        self.char_width * text.chars().count() as i32
    }
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<LoadedFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure_width(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let face = self.face_for(font_family)?;
        let scale = font_size / face.units_per_em as f32;
        let fallback = font_size * 0.56;
        let data = face.data.clone();
        let index = face.index;
        let parsed = Face::parse(&data, index).ok()?;
        let face = self.faces.get_mut(&face_key(font_family))?.as_mut()?;

        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = match face.advances.get(&ch) {
                Some(cached) => *cached,
                None => {
                    let advance = parsed
                        .glyph_index(ch)
                        .and_then(|glyph| parsed.glyph_hor_advance(glyph));
                    face.advances.insert(ch, advance);
                    advance
                }
            };
            match advance {
                Some(units) => width += units as f32 * scale,
                None => width += fallback,
            }
        }
        Some(width.max(0.0))
    }

    fn line_height(&mut self, font_size: f32, font_family: &str) -> Option<f32> {
        let face = self.face_for(font_family)?;
        let scale = font_size / face.units_per_em as f32;
        Some(face.line_units as f32 * scale)
    }

    fn face_for(&mut self, font_family: &str) -> Option<&LoadedFace> {
        let key = face_key(font_family);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(font_family);
            self.faces.insert(key.clone(), face);
        }
        self.faces.get(&key)?.as_ref()
    }

    fn load_face(&mut self, font_family: &str) -> Option<LoadedFace> {
        let mut names: Vec<String> = Vec::new();
        let mut families: Vec<Family<'_>> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => families.push(Family::Serif),
                "sans-serif" | "system-ui" => families.push(Family::SansSerif),
                "monospace" | "ui-monospace" => families.push(Family::Monospace),
                "cursive" => families.push(Family::Cursive),
                "fantasy" => families.push(Family::Fantasy),
                _ => names.push(raw.to_string()),
            }
        }
        let named: Vec<Family<'_>> = names.iter().map(|name| Family::Name(name)).collect();
        let mut query_families: Vec<Family<'_>> = named;
        query_families.extend(families);
        if query_families.is_empty() {
            query_families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let id = self.db.query(&Query {
            families: &query_families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        })?;
        let mut loaded = None;
        self.db.with_face_data(id, |data, index| {
            if let Ok(face) = Face::parse(data, index) {
                let units_per_em = face.units_per_em().max(1);
                let line_units = face.ascender() as i32 - face.descender() as i32
                    + face.line_gap() as i32;
                loaded = Some(LoadedFace {
                    data: data.to_vec(),
                    index,
                    units_per_em,
                    line_units,
                    advances: HashMap::new(),
                });
            }
        });
        loaded
    }
}

struct LoadedFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    line_units: i32,
    advances: HashMap<char, Option<u16>>,
}

fn face_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}
