use crossterm::terminal;

/// Fallback pixel size of one terminal cell when the terminal does not report it
const DEFAULT_CELL_WIDTH: f32 = 8.0;
const DEFAULT_CELL_HEIGHT: f32 = 16.0;

/// Surface size in virtual pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportDimensions {
    pub width: f32,
    pub height: f32,
}

impl ViewportDimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Pixel size of a single terminal cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width: f32,
    pub height: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: DEFAULT_CELL_WIDTH,
            height: DEFAULT_CELL_HEIGHT,
        }
    }
}

impl CellMetrics {
    /// Ask the terminal for its pixel size; many terminals report zero, so fall back to 8x16
    pub fn detect() -> Self {
        match terminal::window_size() {
            Ok(size) if size.width > 0 && size.height > 0 && size.columns > 0 && size.rows > 0 => {
                Self {
                    width: size.width as f32 / size.columns as f32,
                    height: size.height as f32 / size.rows as f32,
                }
            }
            _ => Self::default(),
        }
    }
}

/// Tracks the terminal's size and converts between cells and surface space
#[derive(Debug, Clone)]
pub struct ViewportMonitor {
    pub columns: u16,
    pub rows: u16,
    pub metrics: CellMetrics,
    dimensions: ViewportDimensions,
}

impl ViewportMonitor {
    pub fn new(columns: u16, rows: u16, metrics: CellMetrics) -> Self {
        Self {
            columns,
            rows,
            metrics,
            dimensions: Self::measure(columns, rows, metrics),
        }
    }

    /// A monitor whose surface is exactly `width` x `height` pixels (headless use)
    pub fn with_pixels(width: u32, height: u32) -> Self {
        let metrics = CellMetrics {
            width: 1.0,
            height: 1.0,
        };
        Self::new(
            width.min(u16::MAX as u32) as u16,
            height.min(u16::MAX as u32) as u16,
            metrics,
        )
    }

    fn measure(columns: u16, rows: u16, metrics: CellMetrics) -> ViewportDimensions {
        ViewportDimensions::new(
            columns as f32 * metrics.width,
            rows as f32 * metrics.height,
        )
    }

    pub fn dimensions(&self) -> ViewportDimensions {
        self.dimensions
    }

    /// Record a new terminal size. Returns true when the surface size actually changed.
    pub fn observe(&mut self, columns: u16, rows: u16) -> bool {
        if columns == self.columns && rows == self.rows {
            return false;
        }
        self.columns = columns;
        self.rows = rows;
        self.dimensions = Self::measure(columns, rows, self.metrics);
        true
    }

    /// Center of a terminal cell in surface space
    pub fn cell_to_surface(&self, column: u16, row: u16) -> (f32, f32) {
        (
            (column as f32 + 0.5) * self.metrics.width,
            (row as f32 + 0.5) * self.metrics.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_from_cells() {
        let monitor = ViewportMonitor::new(100, 50, CellMetrics::default());
        assert_eq!(monitor.dimensions(), ViewportDimensions::new(800.0, 800.0));
    }

    #[test]
    fn test_observe_reports_changes_only() {
        let mut monitor = ViewportMonitor::new(100, 50, CellMetrics::default());

        assert!(!monitor.observe(100, 50));
        assert!(monitor.observe(200, 50));
        assert_eq!(monitor.dimensions().width, 1600.0);
        assert!(!monitor.observe(200, 50));
    }

    #[test]
    fn test_cell_to_surface_uses_cell_center() {
        let monitor = ViewportMonitor::new(10, 10, CellMetrics::default());
        assert_eq!(monitor.cell_to_surface(0, 0), (4.0, 8.0));
        assert_eq!(monitor.cell_to_surface(3, 2), (28.0, 40.0));
    }

    #[test]
    fn test_pixel_monitor() {
        let monitor = ViewportMonitor::with_pixels(1000, 800);
        assert_eq!(monitor.dimensions(), ViewportDimensions::new(1000.0, 800.0));
    }
}
