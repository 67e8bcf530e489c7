/*!
 * Speaker color assignment.
 *
 * Each conversion owns one `ColorRegistry`. Speakers receive colors in the
 * order they first appear, drawn without replacement from a shuffled palette;
 * once the palette is used up, colors are drawn at random and may repeat.
 */

use std::collections::HashMap;

use log::trace;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};

use crate::app_config::ColorConfig;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case hex without the leading '#', as WordprocessingML expects
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Relative luminance in 0.0..=1.0 (Rec. 601 weights)
    pub fn luminance(&self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    /// Mix with white; `amount` 0.0 keeps the color, 1.0 gives white
    pub fn tint(&self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f32 + (255.0 - c as f32) * amount).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b))
    }

    /// Euclidean distance in RGB space
    pub fn distance(&self, other: &Rgb) -> f32 {
        let dr = self.r as f32 - other.r as f32;
        let dg = self.g as f32 - other.g as f32;
        let db = self.b as f32 - other.b as f32;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Convert HSV (hue in degrees, saturation and value in 0.0..=1.0)
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = value * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = value - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(to_u8(r), to_u8(g), to_u8(b))
    }
}

/// Colors assigned to one speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpeakerColor {
    /// Font color for the speaker name
    pub text: Rgb,
    /// Pale background shading paired with the font color
    pub highlight: Rgb,
}

impl SpeakerColor {
    /// Pair a text color with its pale tint
    pub fn from_text(text: Rgb) -> Self {
        Self {
            text,
            highlight: text.tint(HIGHLIGHT_TINT),
        }
    }
}

const HIGHLIGHT_TINT: f32 = 0.72;

/// Luminance band accepted for generated colors
const MIN_LUMINANCE: f32 = 0.15;
const MAX_LUMINANCE: f32 = 0.70;

/// Generated colors must be at least this far from every other palette entry
const MIN_DISTANCE: f32 = 48.0;

/// Legible on a white page: none near-white, none near-black.
pub const BASE_TEXT_COLORS: [Rgb; 20] = [
    Rgb::new(192, 0, 0),
    Rgb::new(0, 112, 192),
    Rgb::new(0, 128, 0),
    Rgb::new(112, 48, 160),
    Rgb::new(197, 90, 17),
    Rgb::new(0, 128, 128),
    Rgb::new(204, 0, 153),
    Rgb::new(128, 96, 0),
    Rgb::new(31, 78, 121),
    Rgb::new(153, 51, 0),
    Rgb::new(84, 130, 53),
    Rgb::new(191, 0, 96),
    Rgb::new(0, 102, 204),
    Rgb::new(102, 0, 204),
    Rgb::new(160, 100, 0),
    Rgb::new(0, 153, 102),
    Rgb::new(204, 51, 51),
    Rgb::new(51, 102, 153),
    Rgb::new(153, 0, 153),
    Rgb::new(102, 102, 0),
];

/// Set of colors available to speakers
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<SpeakerColor>,
}

impl Palette {
    /// Palette from explicit colors; falls back to the built-in palette when empty
    pub fn new(colors: Vec<SpeakerColor>) -> Self {
        if colors.is_empty() {
            return Self::builtin();
        }
        Self { colors }
    }

    /// The 20 built-in colors
    pub fn builtin() -> Self {
        Self {
            colors: BASE_TEXT_COLORS.iter().copied().map(SpeakerColor::from_text).collect(),
        }
    }

    /// Palette of `size` colors: built-in colors first, then HSV samples
    /// within fixed saturation/value bands, rejecting too light, too dark,
    /// or too similar results. May return fewer colors than requested when
    /// the color space is exhausted.
    pub fn generate<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let size = size.max(1);
        let mut colors: Vec<SpeakerColor> = BASE_TEXT_COLORS
            .iter()
            .take(size)
            .copied()
            .map(SpeakerColor::from_text)
            .collect();

        let max_attempts = size * 64;
        let mut attempts = 0;
        while colors.len() < size && attempts < max_attempts {
            attempts += 1;
            let candidate = Rgb::from_hsv(
                rng.random_range(0.0..360.0),
                rng.random_range(0.55..0.95),
                rng.random_range(0.45..0.80),
            );
            let luminance = candidate.luminance();
            if !(MIN_LUMINANCE..=MAX_LUMINANCE).contains(&luminance) {
                continue;
            }
            if colors.iter().any(|c| c.text.distance(&candidate) < MIN_DISTANCE) {
                continue;
            }
            colors.push(SpeakerColor::from_text(candidate));
        }

        Self { colors }
    }

    pub fn colors(&self) -> &[SpeakerColor] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Per-conversion mapping from speaker name to colors
#[derive(Debug)]
pub struct ColorRegistry {
    palette: Palette,
    remaining: Vec<SpeakerColor>,
    assigned: HashMap<String, SpeakerColor>,
    order: Vec<String>,
    rng: StdRng,
}

impl ColorRegistry {
    /// Create a registry over `palette`. A seed makes assignment reproducible.
    pub fn new(palette: Palette, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(palette, rng)
    }

    /// Create a registry from configuration, generating the palette when needed
    pub fn from_config(config: &ColorConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let palette = Palette::generate(config.palette_size, &mut rng);
        Self::with_rng(palette, rng)
    }

    fn with_rng(palette: Palette, mut rng: StdRng) -> Self {
        let mut remaining = palette.colors().to_vec();
        remaining.shuffle(&mut rng);
        Self {
            palette,
            remaining,
            assigned: HashMap::new(),
            order: Vec::new(),
            rng,
        }
    }

    /// Colors for `name`, assigning them on first use
    pub fn color_for(&mut self, name: &str) -> SpeakerColor {
        let key = name.trim();
        if let Some(color) = self.assigned.get(key) {
            return *color;
        }

        let color = match self.remaining.pop() {
            Some(color) => color,
            None => self
                .palette
                .colors()
                .choose(&mut self.rng)
                .copied()
                .unwrap_or_else(|| SpeakerColor::from_text(BASE_TEXT_COLORS[0])),
        };

        trace!("Assigned #{} to speaker '{}'", color.text.to_hex(), key);
        self.assigned.insert(key.to_string(), color);
        self.order.push(key.to_string());
        color
    }

    /// Previously assigned colors, without assigning
    pub fn get(&self, name: &str) -> Option<SpeakerColor> {
        self.assigned.get(name.trim()).copied()
    }

    /// Assignments in first-appearance order
    pub fn assigned(&self) -> impl Iterator<Item = (&str, SpeakerColor)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.assigned.get(name).map(|color| (name.as_str(), *color)))
    }

    /// Forget all assignments and reshuffle the full palette
    pub fn reset(&mut self) {
        self.assigned.clear();
        self.order.clear();
        self.remaining = self.palette.colors().to_vec();
        self.remaining.shuffle(&mut self.rng);
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
