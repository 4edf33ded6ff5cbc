use crate::app::App;
use crate::braille::{BrailleSurface, FieldLayer};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 30;

const CARD_WIDTH: u16 = 56;
const CARD_HEIGHT: u16 = 10;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function. The particle field is always the bottom layer.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    render_field(frame, area, app);

    if app.show_content {
        render_content(frame, area, app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

fn render_field(frame: &mut Frame, area: Rect, app: &App) {
    let metrics = app.field.viewport.metrics;
    let mut surface = BrailleSurface::new(area.width, area.height, metrics.width, metrics.height);
    app.field.render(&mut surface);

    frame.render_widget(
        FieldLayer {
            surface: &surface,
            style: app.style,
        },
        area,
    );
}

/// Center a `width` x `height` box inside `area`, shrinking it to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    let card = centered(area, CARD_WIDTH, CARD_HEIGHT);
    if card.width < 10 || card.height < 4 {
        return;
    }

    let dims = app.field.dimensions();
    let pointer = app.field.pointer.sample();

    let pointer_text = if app.field.pointer.has_moved() {
        format!(
            "pointer {:.0}, {:.0}  ·  frame {}",
            pointer.x,
            pointer.y,
            app.scheduler.frames_run()
        )
    } else {
        format!("move the mouse  ·  frame {}", app.scheduler.frames_run())
    };
    let particles_text = if app.field.pool.is_empty() {
        "too small for particles".to_string()
    } else {
        format!("{} particles", app.field.pool.len())
    };

    let (status_text, status_color) = if app.is_paused() {
        ("PAUSED".to_string(), HIGHLIGHT_COLOR)
    } else {
        (format!("{:.0} fps", app.fps()), Color::Green)
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "AMBIENT PARTICLE FIELD",
            Style::default().fg(BORDER_COLOR).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Drifting points, drawn together by proximity and your pointer.",
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(particles_text, Style::default().fg(TEXT_COLOR)),
            Span::styled("  ·  ", Style::default().fg(DIM_TEXT_COLOR)),
            Span::styled(
                format!("{:.0}x{:.0}", dims.width, dims.height),
                Style::default().fg(TEXT_COLOR),
            ),
            Span::styled("  ·  ", Style::default().fg(DIM_TEXT_COLOR)),
            Span::styled(status_text, Style::default().fg(status_color)),
        ]),
        Line::from(Span::styled(
            pointer_text,
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    frame.render_widget(Clear, card);
    let paragraph = Paragraph::new(content)
        .block(styled_block(" H help "))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, card);

    render_footer(frame, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    if area.height < 3 {
        return;
    }
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let footer = Line::from(vec![
        Span::styled("Space", key_style),
        Span::styled(" pause  ", desc_style),
        Span::styled("R", key_style),
        Span::styled(" reseed  ", desc_style),
        Span::styled("V", key_style),
        Span::styled(" hide  ", desc_style),
        Span::styled("Q", key_style),
        Span::styled(" quit", desc_style),
    ]);

    let row = Rect {
        x: area.x,
        y: area.y + area.height - 1,
        width: area.width,
        height: 1,
    };
    frame.render_widget(Paragraph::new(footer).alignment(Alignment::Center), row);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let help_area = centered(area, 56, area.height.saturating_sub(4).min(24));
    if help_area.width < 10 || help_area.height < 4 {
        return;
    }

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("AMBIENT PARTICLE FIELD", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Particles drift slowly and are pulled gently toward the pointer. Nearby particles are joined by faint lines that fade with distance."),
        Line::from(""),
        Line::from("Resizing the terminal scatters a fresh set of particles sized to the new area."),
        Line::from(""),
        Line::from(Span::styled("CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Mouse - attract particles"),
        Line::from("Space - pause/resume"),
        Line::from("R - reseed particles"),
        Line::from("V - hide/show content"),
        Line::from("H/? - toggle help, J/K scroll"),
        Line::from("Q/Esc - quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_area.height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    // Update title to show scroll hint if scrollable
    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}
