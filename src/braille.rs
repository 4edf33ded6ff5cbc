use crate::config::{LayerStyle, Rgba};
use crate::render::Surface;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// Dots fainter than this after layer compositing stay unlit
const MIN_VISIBLE: f32 = 0.04;

/// A single rendered Braille cell with position and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Premultiplied RGBA accumulator for one dot
#[derive(Debug, Clone, Copy, Default)]
struct Dot {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Dot {
    fn blend(&mut self, color: Rgba) {
        let a = color.a.clamp(0.0, 1.0);
        let keep = 1.0 - a;
        self.r = color.r as f32 * a + self.r * keep;
        self.g = color.g as f32 * a + self.g * keep;
        self.b = color.b as f32 * a + self.b * keep;
        self.a = a + self.a * keep;
    }
}

/// Terminal drawing surface: surface space is sampled onto a braille dot grid
pub struct BrailleSurface {
    columns: u16,
    rows: u16,
    /// Surface pixels covered by one dot
    dot_width: f32,
    dot_height: f32,
    dots: Vec<Dot>,
}

impl BrailleSurface {
    /// A surface covering `columns` x `rows` terminal cells, each `cell_width` x `cell_height` px
    pub fn new(columns: u16, rows: u16, cell_width: f32, cell_height: f32) -> Self {
        let dots_len = columns as usize * 2 * rows as usize * 4;
        Self {
            columns,
            rows,
            dot_width: (cell_width / 2.0).max(f32::EPSILON),
            dot_height: (cell_height / 4.0).max(f32::EPSILON),
            dots: vec![Dot::default(); dots_len],
        }
    }

    fn dots_wide(&self) -> usize {
        self.columns as usize * 2
    }

    fn dots_high(&self) -> usize {
        self.rows as usize * 4
    }

    /// Dot index containing surface point (x, y), clamped onto the grid
    fn dot_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let (w, h) = (self.dots_wide(), self.dots_high());
        if w == 0 || h == 0 {
            return None;
        }
        let dx = (x / self.dot_width).floor();
        let dy = (y / self.dot_height).floor();
        if dx < 0.0 || dy < 0.0 || dx > w as f32 || dy > h as f32 {
            return None;
        }
        // The far edge (x == width) belongs to the last dot
        Some(((dx as usize).min(w - 1), (dy as usize).min(h - 1)))
    }

    fn blend_dot(&mut self, dx: usize, dy: usize, color: Rgba) {
        let idx = dy * self.dots_wide() + dx;
        self.dots[idx].blend(color);
    }

    /// Resolve dots into braille glyphs, composited over the background per `style`
    pub fn cells(&self, style: &LayerStyle) -> Vec<BrailleCell> {
        let strength = style.opacity * style.terminal_gain;
        let mut cells = Vec::new();

        for cy in 0..self.rows {
            for cx in 0..self.columns {
                let mut pattern: u8 = 0;
                let (mut r, mut g, mut b, mut a_sum) = (0.0, 0.0, 0.0, 0.0);
                let mut a_max: f32 = 0.0;

                let base_x = cx as usize * 2;
                let base_y = cy as usize * 4;

                for dx in 0..2 {
                    for dy in 0..4 {
                        let dot = self.dots[(base_y + dy) * self.dots_wide() + base_x + dx];
                        if dot.a * strength < MIN_VISIBLE {
                            continue;
                        }
                        pattern |= BRAILLE_DOTS[dx][dy];
                        r += dot.r;
                        g += dot.g;
                        b += dot.b;
                        a_sum += dot.a;
                        a_max = a_max.max(dot.a);
                    }
                }

                if pattern == 0 {
                    continue;
                }

                let ink = Rgba::opaque(
                    (r / a_sum).round().clamp(0.0, 255.0) as u8,
                    (g / a_sum).round().clamp(0.0, 255.0) as u8,
                    (b / a_sum).round().clamp(0.0, 255.0) as u8,
                );
                let shown = style.background.lerp(ink, a_max * strength);

                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' '),
                    color: Color::Rgb(shown.r, shown.g, shown.b),
                });
            }
        }

        cells
    }
}

impl Surface for BrailleSurface {
    fn clear(&mut self) {
        self.dots.fill(Dot::default());
    }

    fn fill_disc(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        let r = radius.max(0.0);
        let (Some(min), Some(max)) = (self.dot_at(x - r, y - r), self.dot_at(x + r, y + r)) else {
            // Partly off-grid: at least mark the dot under the center
            if let Some((dx, dy)) = self.dot_at(x, y) {
                self.blend_dot(dx, dy, color);
            }
            return;
        };
        for dy in min.1..=max.1 {
            for dx in min.0..=max.0 {
                self.blend_dot(dx, dy, color);
            }
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), _width: f32, color: Rgba) {
        // Walk the segment in dot-sized steps; each dot is hit at most once per line
        let span_x = (to.0 - from.0) / self.dot_width;
        let span_y = (to.1 - from.1) / self.dot_height;
        let steps = span_x.abs().max(span_y.abs()).ceil().max(1.0) as usize;

        let mut last = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            if let Some(dot) = self.dot_at(x, y) {
                if last != Some(dot) {
                    self.blend_dot(dot.0, dot.1, color);
                    last = Some(dot);
                }
            }
        }
    }
}

/// Widget that paints the particle layer as the page background
pub struct FieldLayer<'a> {
    pub surface: &'a BrailleSurface,
    pub style: LayerStyle,
}

impl Widget for FieldLayer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg = self.style.background;
        let bg = Color::Rgb(bg.r, bg.g, bg.b);

        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(' ').set_bg(bg);
                }
            }
        }

        for braille in self.surface.cells(&self.style) {
            let x = area.x + braille.x;
            let y = area.y + braille.y;
            if x < area.right() && y < area.bottom() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(braille.char).set_fg(braille.color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bright() -> LayerStyle {
        LayerStyle {
            opacity: 1.0,
            background: Rgba::opaque(0, 0, 0),
            terminal_gain: 1.0,
        }
    }

    #[test]
    fn test_braille_pattern() {
        // Test that single dot patterns work correctly
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        // All dots should give 0xFF
        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_disc_lights_top_left_dot() {
        // 8x16 px cells -> 4x4 px dots
        let mut surface = BrailleSurface::new(4, 2, 8.0, 16.0);
        surface.fill_disc(1.0, 1.0, 0.5, Rgba::opaque(255, 0, 0));

        let cells = surface.cells(&bright());
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].x, 0);
        assert_eq!(cells[0].y, 0);
        assert_eq!(cells[0].char, '\u{2801}');
        assert_eq!(cells[0].color, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn test_far_edge_maps_to_last_dot() {
        let mut surface = BrailleSurface::new(2, 1, 8.0, 16.0);
        surface.fill_disc(16.0, 16.0, 0.0, Rgba::opaque(0, 255, 0));

        let cells = surface.cells(&bright());
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].x, 1);
        assert_eq!(cells[0].char, '\u{2880}');
    }

    #[test]
    fn test_line_spans_cells() {
        let mut surface = BrailleSurface::new(4, 1, 8.0, 16.0);
        surface.stroke_line((0.0, 1.0), (31.0, 1.0), 0.5, Rgba::opaque(0, 255, 255));

        let cells = surface.cells(&bright());
        assert_eq!(cells.len(), 4);
        // Top row of both columns in every cell
        assert!(cells.iter().all(|c| c.char == '\u{2809}'));
    }

    #[test]
    fn test_faint_strokes_stay_dark() {
        let mut surface = BrailleSurface::new(2, 1, 8.0, 16.0);
        surface.stroke_line((0.0, 1.0), (15.0, 1.0), 0.5, Rgba::new(0, 255, 255, 0.001));
        assert!(surface.cells(&LayerStyle::DEFAULT).is_empty());
    }

    #[test]
    fn test_clear_resets_dots() {
        let mut surface = BrailleSurface::new(2, 2, 8.0, 16.0);
        surface.fill_disc(4.0, 4.0, 2.0, Rgba::opaque(255, 255, 255));
        assert!(!surface.cells(&bright()).is_empty());

        surface.clear();
        assert!(surface.cells(&bright()).is_empty());
    }

    #[test]
    fn test_layer_blends_toward_background() {
        let style = LayerStyle {
            opacity: 0.5,
            background: Rgba::opaque(0, 0, 0),
            terminal_gain: 1.0,
        };
        let mut surface = BrailleSurface::new(1, 1, 8.0, 16.0);
        surface.fill_disc(1.0, 1.0, 0.1, Rgba::opaque(200, 100, 0));

        let cells = surface.cells(&style);
        assert_eq!(cells[0].color, Color::Rgb(100, 50, 0));
    }

    #[test]
    fn test_field_layer_widget_paints_background() {
        let mut surface = BrailleSurface::new(3, 1, 8.0, 16.0);
        surface.fill_disc(1.0, 1.0, 0.5, Rgba::opaque(255, 255, 255));

        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        FieldLayer { surface: &surface, style: bright() }.render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "\u{2801}");
        assert_eq!(buf[(1, 0)].symbol(), " ");
        assert_eq!(buf[(2, 0)].bg, Color::Rgb(0, 0, 0));
    }
}
