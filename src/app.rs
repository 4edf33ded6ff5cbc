use crate::config::{LayerStyle, SimulationConfig};
use crate::field::ParticleField;
use crate::scheduler::FrameScheduler;
use crate::ui;
use crate::viewport::ViewportMonitor;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use std::time::{Duration, Instant};

/// Frame-rate meter window
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Main application state
pub struct App {
    pub field: ParticleField,
    pub scheduler: FrameScheduler,
    pub style: LayerStyle,
    pub show_content: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub should_quit: bool,
    /// Set by events that change what is on screen while no frame is running
    pub needs_redraw: bool,
    measured_fps: f32,
    window_start: Option<Instant>,
    window_frames: u32,
}

impl App {
    pub fn new(viewport: ViewportMonitor, fps: u32, seed: Option<u64>) -> Self {
        Self {
            field: ParticleField::new(SimulationConfig::DEFAULT, viewport, seed),
            scheduler: FrameScheduler::new(fps),
            style: LayerStyle::DEFAULT,
            show_content: true,
            show_help: false,
            help_scroll: 0,
            should_quit: false,
            needs_redraw: true,
            measured_fps: 0.0,
            window_start: None,
            window_frames: 0,
        }
    }

    pub fn is_paused(&self) -> bool {
        !self.scheduler.is_running()
    }

    pub fn fps(&self) -> f32 {
        self.measured_fps
    }

    /// Begin the frame loop
    pub fn start(&mut self, now: Instant) {
        self.scheduler.start(now);
        self.window_start = Some(now);
        self.window_frames = 0;
    }

    /// Halt future frames; a frame already running finishes
    pub fn stop(&mut self) {
        self.scheduler.stop();
        self.measured_fps = 0.0;
        self.window_start = None;
    }

    /// Run one simulate step if a frame is due. Returns true when the caller should draw.
    pub fn frame(&mut self, now: Instant) -> bool {
        if self.scheduler.fire(now).is_none() {
            return false;
        }
        self.field.tick();
        self.measure(now);
        true
    }

    fn measure(&mut self, now: Instant) {
        self.window_frames += 1;
        let start = *self.window_start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= FPS_WINDOW {
            self.measured_fps = self.window_frames as f32 / elapsed.as_secs_f32();
            self.window_start = Some(now);
            self.window_frames = 0;
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self, now: Instant) {
        if self.is_paused() {
            log::info!("resumed");
            self.start(now);
        } else {
            log::info!("paused");
            self.stop();
        }
        self.needs_redraw = true;
    }

    /// Reseed at the current size
    pub fn reset(&mut self) {
        self.field.reseed();
        self.needs_redraw = true;
    }

    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        self.field.pointer_moved(column, row);
    }

    /// Terminal resized; the field reseeds but the scheduler keeps running
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.field.resize(columns, rows);
        self.needs_redraw = true;
    }

    /// Toggle the content panels drawn above the field
    pub fn toggle_content(&mut self) {
        self.show_content = !self.show_content;
        self.needs_redraw = true;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
        self.needs_redraw = true;
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
        self.needs_redraw = true;
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
        self.needs_redraw = true;
    }

    /// Stop the loop and ask the run loop to exit
    pub fn quit(&mut self) {
        self.stop();
        self.should_quit = true;
    }

    /// Apply one terminal event. The field itself never consumes input; pointer motion
    /// only updates the tracked sample.
    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(mouse) => {
                if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                    self.pointer_moved(mouse.column, mouse.row);
                }
            }
            Event::Resize(columns, rows) => self.resize(columns, rows),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // Only process Press events
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Handle Ctrl+C
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.quit(),
            KeyCode::Esc => {
                if self.show_help {
                    self.toggle_help();
                } else {
                    self.quit();
                }
            }
            KeyCode::Char(' ') => self.toggle_pause(now),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char('v') | KeyCode::Char('V') => self.toggle_content(),
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Char('j') | KeyCode::Char('J') => {
                if self.show_help {
                    self.scroll_help_down(ui::HELP_CONTENT_LINES);
                }
            }
            KeyCode::Char('k') | KeyCode::Char('K') => {
                if self.show_help {
                    self.scroll_help_up();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::PointerSample;
    use crate::viewport::CellMetrics;
    use crossterm::event::{MouseButton, MouseEvent};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn app() -> App {
        App::new(ViewportMonitor::new(100, 40, CellMetrics::default()), 50, Some(1))
    }

    #[test]
    fn test_new_app_is_idle_until_started() {
        let mut app = app();
        assert!(app.is_paused());
        assert!(!app.frame(Instant::now()));
    }

    #[test]
    fn test_frame_runs_when_due() {
        let now = Instant::now();
        let mut app = app();
        let before = app.field.pool.particles.clone();

        app.start(now);
        assert!(app.frame(now));
        assert_ne!(app.field.pool.particles, before);
        assert!(!app.frame(now));
        assert!(app.frame(now + Duration::from_millis(20)));
    }

    #[test]
    fn test_pause_and_resume() {
        let now = Instant::now();
        let mut app = app();
        app.start(now);

        app.toggle_pause(now);
        assert!(app.is_paused());
        assert!(!app.frame(now + Duration::from_secs(1)));

        app.toggle_pause(now + Duration::from_secs(2));
        assert!(!app.is_paused());
        assert!(app.frame(now + Duration::from_secs(2)));
    }

    #[test]
    fn test_resize_reseeds_without_restarting() {
        let now = Instant::now();
        let mut app = app();
        app.start(now);
        let generation = app.field.pool.generation;
        let pending = app.scheduler.pending();

        app.resize(200, 60);

        assert_eq!(app.field.pool.generation, generation + 1);
        assert_eq!(app.scheduler.pending(), pending);
    }

    #[test]
    fn test_quit_stops_scheduler() {
        let mut app = app();
        app.start(Instant::now());
        app.quit();
        app.quit();
        assert!(app.should_quit);
        assert!(!app.scheduler.is_running());
    }

    #[test]
    fn test_fps_measurement() {
        let now = Instant::now();
        let mut app = app();
        app.start(now);

        // 50 fps for one second
        for i in 0..=50 {
            app.frame(now + Duration::from_millis(20 * i));
        }
        assert!((app.fps() - 50.0).abs() < 5.0, "fps {}", app.fps());
    }

    #[test]
    fn test_help_scroll_bounds() {
        let mut app = app();
        app.toggle_help();
        app.scroll_help_up();
        assert_eq!(app.help_scroll, 0);
        app.scroll_help_down(1);
        app.scroll_help_down(1);
        assert_eq!(app.help_scroll, 1);
        app.toggle_help();
        app.toggle_help();
        assert_eq!(app.help_scroll, 0);
    }

    #[test]
    fn test_pointer_events_update_sample() {
        let now = Instant::now();
        let mut app = app();

        app.handle_event(mouse(MouseEventKind::Moved, 10, 5), now);
        assert_eq!(app.field.pointer.sample(), PointerSample::new(84.0, 88.0));

        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 0, 0), now);
        assert_eq!(app.field.pointer.sample(), PointerSample::new(4.0, 8.0));

        // Clicks and scrolls don't move the sample
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 50, 20), now);
        app.handle_event(mouse(MouseEventKind::ScrollDown, 50, 20), now);
        assert_eq!(app.field.pointer.sample(), PointerSample::new(4.0, 8.0));
    }

    #[test]
    fn test_resize_event_reseeds() {
        let mut app = app();
        let generation = app.field.pool.generation;
        app.handle_event(Event::Resize(200, 60), Instant::now());
        assert_eq!(app.field.pool.generation, generation + 1);
        assert_eq!(app.field.dimensions().width, 1600.0);
    }

    #[test]
    fn test_keys() {
        let now = Instant::now();
        let mut app = app();
        app.start(now);

        app.handle_event(press(KeyCode::Char(' ')), now);
        assert!(app.is_paused());

        app.handle_event(press(KeyCode::Char('v')), now);
        assert!(!app.show_content);

        let generation = app.field.pool.generation;
        app.handle_event(press(KeyCode::Char('r')), now);
        assert_eq!(app.field.pool.generation, generation + 1);

        app.handle_event(press(KeyCode::Char('?')), now);
        assert!(app.show_help);
        app.handle_event(press(KeyCode::Esc), now);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        app.handle_event(press(KeyCode::Char('q')), now);
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_and_releases_ignored() {
        let now = Instant::now();
        let mut app = app();
        app.start(now);

        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        app.handle_event(Event::Key(release), now);
        assert!(!app.should_quit);

        app.handle_event(
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            now,
        );
        assert!(app.should_quit);
        assert!(!app.scheduler.is_running());
    }
}
