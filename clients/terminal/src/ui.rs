use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Clear, Paragraph, Widget},
    DefaultTerminal,
};
use rebound_core::{
    LabelSize, Renderer, ServiceError, Side, Sprite, SpriteKind, TextMetrics, COURT_HEIGHT,
    COURT_WIDTH,
};

/// Court units per character cell when measuring text
const CELL_WIDTH: i16 = 8;
const CELL_HEIGHT: i16 = 16;

/// Smallest court, in cells, worth drawing
const MIN_FIELD_WIDTH: u16 = 32;
const MIN_FIELD_HEIGHT: u16 = 12;

/// Terminal cells are roughly twice as tall as they are wide
const CHAR_ASPECT_RATIO: u32 = 2;

const CONTROLS_TEXT: &str =
    "↑/↓ or W/S: move  F2/R: restart  P: pause  M: mute  9/0: volume  Esc/Q: quit";

/// Maps court coordinates onto a block of terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CourtMapping {
    field: Rect,
}

impl CourtMapping {
    /// Largest field with the court's proportions that fits in `area`, centered
    fn fit(area: Rect) -> Option<Self> {
        let (court_w, court_h) = (COURT_WIDTH as u32, COURT_HEIGHT as u32);
        let max_w = area.width as u32;
        let max_h = area.height as u32;

        let width_for_height = max_h * court_w * CHAR_ASPECT_RATIO / court_h;
        let (width, height) = if width_for_height <= max_w {
            (width_for_height, max_h)
        } else {
            (max_w, max_w * court_h / (court_w * CHAR_ASPECT_RATIO))
        };

        let (width, height) = (width as u16, height as u16);
        if width < MIN_FIELD_WIDTH || height < MIN_FIELD_HEIGHT {
            return None;
        }

        Some(Self {
            field: Rect {
                x: area.x + (area.width - width) / 2,
                y: area.y + (area.height - height) / 2,
                width,
                height,
            },
        })
    }

    fn column(&self, x: i16) -> u16 {
        let col = i32::from(x) * i32::from(self.field.width) / i32::from(COURT_WIDTH);
        self.field.x + col.clamp(0, i32::from(self.field.width) - 1) as u16
    }

    fn row(&self, y: i16) -> u16 {
        let row = i32::from(y) * i32::from(self.field.height) / i32::from(COURT_HEIGHT);
        self.field.y + row.clamp(0, i32::from(self.field.height) - 1) as u16
    }

    /// Cells covered by a court rectangle; `None` when it lies outside the court
    fn cells(&self, bounds: rebound_core::Rect) -> Option<Rect> {
        if bounds.right() <= 0
            || bounds.x >= COURT_WIDTH
            || bounds.bottom() <= 0
            || bounds.y >= COURT_HEIGHT
        {
            return None;
        }

        let (left, top) = (self.column(bounds.x), self.row(bounds.y));
        let right = self.column(bounds.right() - 1);
        let bottom = self.row(bounds.bottom() - 1);

        Some(Rect {
            x: left,
            y: top,
            width: right - left + 1,
            height: bottom - top + 1,
        })
    }
}

/// Colours picked on the command line; `None` keeps the built-in colours
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette {
    /// Ball, paddles, net and labels
    pub fg: Option<Color>,
    /// Court background
    pub bg: Option<Color>,
}

impl Palette {
    fn fg_or(&self, default: Color) -> Style {
        Style::default().fg(self.fg.unwrap_or(default))
    }
}

/// Parses an `RRGGBB` hex colour, with or without a leading `#`
pub fn parse_hex_color(value: &str) -> Result<Color, String> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.is_empty() || digits.len() > 6 {
        return Err(format!("invalid color: {value}"));
    }

    let rgb = u32::from_str_radix(digits, 16).map_err(|_| format!("invalid color: {value}"))?;
    Ok(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

/// One frame of the court: everything drawn since the last present
pub struct CourtWidget<'a> {
    pub sprites: &'a [Sprite],
    pub palette: Palette,
}

impl Widget for &CourtWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(1)])
            .split(area);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Rebound")
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(Color::White));
        let inner = block.inner(chunks[0]);
        block.render(chunks[0], buf);

        Paragraph::new(CONTROLS_TEXT)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let Some(mapping) = CourtMapping::fit(inner) else {
            Paragraph::new(format!(
                "Terminal too small!\n\nMinimum court: {MIN_FIELD_WIDTH}×{MIN_FIELD_HEIGHT}"
            ))
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .render(inner, buf);
            return;
        };

        if let Some(bg) = self.palette.bg {
            buf.set_style(mapping.field, Style::default().bg(bg));
        }
        render_net(&mapping, self.palette.fg_or(Color::DarkGray), buf);

        let palette = &self.palette;
        for sprite in self.sprites {
            match &sprite.kind {
                SpriteKind::Ball => {
                    fill(&mapping, sprite, '●', palette.fg_or(Color::LightRed), buf)
                }
                SpriteKind::Paddle(Side::Left) => {
                    fill(&mapping, sprite, '█', palette.fg_or(Color::Blue), buf)
                }
                SpriteKind::Paddle(Side::Right) => {
                    fill(&mapping, sprite, '█', palette.fg_or(Color::Green), buf)
                }
                SpriteKind::Label { text, size } => {
                    render_label(&mapping, sprite, text, *size, palette, buf)
                }
                SpriteKind::PausePanel => render_pause_panel(&mapping, buf),
            }
        }
    }
}

/// Dashed center line
fn render_net(mapping: &CourtMapping, style: Style, buf: &mut Buffer) {
    let x = mapping.column(COURT_WIDTH / 2);
    for y in (mapping.field.top()..mapping.field.bottom()).step_by(2) {
        buf.set_string(x, y, "┊", style);
    }
}

fn fill(mapping: &CourtMapping, sprite: &Sprite, glyph: char, style: Style, buf: &mut Buffer) {
    let Some(cells) = mapping.cells(sprite.bounds) else {
        return;
    };

    let row: String = std::iter::repeat(glyph).take(cells.width as usize).collect();
    for y in cells.top()..cells.bottom() {
        buf.set_string(cells.x, y, &row, style);
    }
}

/// Text is re-centered on the label's own center, since cells are coarser than court units
fn render_label(
    mapping: &CourtMapping,
    sprite: &Sprite,
    text: &str,
    size: LabelSize,
    palette: &Palette,
    buf: &mut Buffer,
) {
    let bounds = sprite.bounds;
    let center = mapping.column(bounds.x + bounds.width / 2);
    let width = text.chars().count() as u16;
    let x = center.saturating_sub(width / 2).max(mapping.field.x);
    let y = mapping.row(bounds.y);

    let style = match size {
        LabelSize::Score => palette.fg_or(Color::Yellow),
        LabelSize::Banner => palette.fg_or(Color::Cyan),
    }
    .add_modifier(Modifier::BOLD);
    buf.set_stringn(x, y, text, mapping.field.right().saturating_sub(x) as usize, style);
}

fn render_pause_panel(mapping: &CourtMapping, buf: &mut Buffer) {
    let field = mapping.field;
    let width = 20.min(field.width);
    let height = 3.min(field.height);
    let panel = Rect {
        x: field.x + (field.width - width) / 2,
        y: field.y + (field.height - height) / 2,
        width,
        height,
    };

    Clear.render(panel, buf);
    Paragraph::new("PAUSED")
        .style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_type(BorderType::Rounded))
        .render(panel, buf);
}

/// Renderer that collects sprites and paints them with ratatui on present
pub struct TerminalRenderer {
    terminal: DefaultTerminal,
    palette: Palette,
    sprites: Vec<Sprite>,
}

impl TerminalRenderer {
    pub fn new(terminal: DefaultTerminal, palette: Palette) -> Self {
        Self {
            terminal,
            palette,
            sprites: Vec::new(),
        }
    }
}

impl TextMetrics for TerminalRenderer {
    fn text_width(&self, text: &str, _size: LabelSize) -> i16 {
        text.chars().count() as i16 * CELL_WIDTH
    }

    fn line_height(&self, _size: LabelSize) -> i16 {
        CELL_HEIGHT
    }
}

impl Renderer for TerminalRenderer {
    fn draw(&mut self, sprite: &Sprite) -> Result<(), ServiceError> {
        self.sprites.push(sprite.clone());
        Ok(())
    }

    fn present(&mut self) -> Result<(), ServiceError> {
        let widget = CourtWidget {
            sprites: &self.sprites,
            palette: self.palette,
        };
        let result = self
            .terminal
            .draw(|frame| frame.render_widget(&widget, frame.area()));
        self.sprites.clear();
        result?;
        Ok(())
    }
}
