// 🖥️ Terminal UI - list pane, text pane, validation banner, modals
//
// Rows are two lines tall so the pointer can land on either half of the
// hovered row during a drag.

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pokemon_priority::client::InstanceApi;
use pokemon_priority::modal::ModalBody;
use pokemon_priority::reorder::{RankCommit, RankEdit, RowBounds};
use pokemon_priority::session::{Session, COPIED_MESSAGE};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Instant;
use tracing::{info, warn};

/// Terminal lines per list row
const ROW_HEIGHT: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Text,
    Search,
}

pub struct App {
    pub session: Session,
    api: Box<dyn InstanceApi>,
    pub state: TableState,
    pub focus: Focus,
    pub query: String,
    pub hits: Vec<usize>,
    /// Where the list table was last drawn, for mouse hit-testing
    list_area: Rect,
    quit: bool,
}

impl App {
    pub fn new(session: Session, api: Box<dyn InstanceApi>) -> Self {
        let mut state = TableState::default();
        if !session.list().is_empty() {
            state.select(Some(0));
        }

        Self {
            session,
            api,
            state,
            focus: Focus::List,
            query: String::new(),
            hits: Vec::new(),
            list_area: Rect::default(),
            quit: false,
        }
    }

    fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    fn select(&mut self, row: usize) {
        let len = self.session.list().len();
        if len == 0 {
            self.state.select(None);
        } else {
            self.state.select(Some(row.min(len - 1)));
        }
    }

    /// The list may have been rebuilt underneath the selection
    fn clamp_selection(&mut self) {
        match self.state.selected() {
            Some(row) => self.select(row),
            None => self.select(0),
        }
    }

    pub fn next(&mut self) {
        let len = self.session.list().len();
        if len == 0 {
            return;
        }
        let i = match self.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.session.list().len();
        if len == 0 {
            return;
        }
        let i = match self.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let row = self.selected().map(|i| i + 20).unwrap_or(0);
        self.select(row);
    }

    pub fn page_up(&mut self) {
        let row = self.selected().map(|i| i.saturating_sub(20)).unwrap_or(0);
        self.select(row);
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    fn update_search(&mut self) {
        self.hits = self.session.list().search(self.session.catalog(), &self.query);
        if let Some(&first) = self.hits.first() {
            self.select(first);
        }
    }

    fn next_hit(&mut self) {
        let current = self.selected().unwrap_or(0);
        let next = self
            .hits
            .iter()
            .copied()
            .find(|&row| row > current)
            .or_else(|| self.hits.first().copied());
        if let Some(row) = next {
            self.select(row);
        }
    }

    fn clear_search(&mut self) {
        self.query.clear();
        self.hits.clear();
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    fn copy_to_clipboard(&mut self) {
        let text = self.session.text().text();
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => self.session.notify(COPIED_MESSAGE),
            Err(err) => {
                warn!("clipboard unavailable: {err}");
                self.session.show_error(format!("Clipboard unavailable: {err}"));
            }
        }
    }

    fn toggle_login(&mut self) {
        if self.session.is_logged_in() {
            self.session.logout();
        } else {
            self.session.open_login();
        }
    }

    fn after_list_rebuild(&mut self) {
        self.clamp_selection();
        if !self.query.is_empty() {
            self.hits = self.session.list().search(self.session.catalog(), &self.query);
        }
    }

    // ========================================================================
    // KEYBOARD
    // ========================================================================

    fn handle_key(&mut self, key: KeyEvent) {
        if !self.session.modals.is_empty() {
            self.handle_modal_key(key);
            return;
        }

        match self.focus {
            Focus::List if self.session.rank_editor.is_editing() => self.handle_rank_key(key),
            Focus::List => self.handle_list_key(key),
            Focus::Text => self.handle_text_key(key),
            Focus::Search => self.handle_search_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home => self.select(0),
            KeyCode::End => self.select(usize::MAX),
            KeyCode::Enter | KeyCode::Char('r') => {
                if let Some(row) = self.selected() {
                    self.session.begin_rank_edit(row);
                    // Typing replaces the current rank
                    self.session.rank_editor.clear();
                }
            }
            KeyCode::Tab => self.focus = Focus::Text,
            KeyCode::Char('/') => {
                self.clear_search();
                self.focus = Focus::Search;
            }
            KeyCode::Char('n') => self.next_hit(),
            KeyCode::Esc => self.clear_search(),
            KeyCode::Char('f') => {
                self.session.apply_fix();
                self.after_list_rebuild();
            }
            KeyCode::Char('y') => self.copy_to_clipboard(),
            KeyCode::Char('l') => self.toggle_login(),
            KeyCode::Char('i') => self.session.open_import(&*self.api),
            KeyCode::Char('s') => self.session.open_save(&*self.api),
            _ => {}
        }
    }

    fn handle_rank_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.session.rank_editor.push(c),
            KeyCode::Backspace => self.session.rank_editor.backspace(),
            KeyCode::Enter => {
                if let RankCommit::Moved { to } = self.session.commit_rank_edit() {
                    self.select(to);
                    self.after_list_rebuild();
                }
            }
            KeyCode::Esc => self.session.rank_editor.cancel(),
            _ => {}
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        let text = self.session.text_mut();
        let changed = match key.code {
            KeyCode::Esc | KeyCode::Tab => {
                self.focus = Focus::List;
                return;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                text.insert_char(c);
                true
            }
            KeyCode::Enter => {
                text.insert_newline();
                true
            }
            KeyCode::Backspace => text.backspace(),
            KeyCode::Delete => text.delete(),
            KeyCode::Left => {
                text.move_left();
                false
            }
            KeyCode::Right => {
                text.move_right();
                false
            }
            KeyCode::Up => {
                text.move_up();
                false
            }
            KeyCode::Down => {
                text.move_down();
                false
            }
            KeyCode::Home => {
                text.move_home();
                false
            }
            KeyCode::End => {
                text.move_end();
                false
            }
            _ => false,
        };

        if changed {
            self.session.text_changed();
            self.after_list_rebuild();
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.focus = Focus::List,
            KeyCode::Esc => {
                self.clear_search();
                self.focus = Focus::List;
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.update_search();
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.update_search();
            }
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let Some(body) = self.session.modals.top_mut().map(|modal| &mut modal.body) else {
            return;
        };

        match body {
            ModalBody::Login { input } => match key.code {
                KeyCode::Char(c) => input.push(c),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Enter => self.session.confirm_modal(&*self.api),
                KeyCode::Esc => self.session.cancel_modal(),
                _ => {}
            },
            ModalBody::Import { .. } | ModalBody::Save { .. } => match key.code {
                KeyCode::Down | KeyCode::Char('j') => body.select_next(),
                KeyCode::Up | KeyCode::Char('k') => body.select_previous(),
                KeyCode::Enter => {
                    let importing = matches!(body, ModalBody::Import { .. });
                    self.session.confirm_modal(&*self.api);
                    if importing && self.session.modals.is_empty() {
                        self.clear_search();
                        self.select(0);
                    }
                }
                KeyCode::Esc | KeyCode::Char('q') => self.session.cancel_modal(),
                _ => {}
            },
            ModalBody::ConfirmSave { .. } => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => self.session.confirm_modal(&*self.api),
                KeyCode::Esc | KeyCode::Char('n') => self.session.cancel_modal(),
                _ => {}
            },
            ModalBody::Error { .. } | ModalBody::Notice { .. } => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.session.confirm_modal(&*self.api),
                KeyCode::Esc => self.session.cancel_modal(),
                _ => {}
            },
        }
    }

    // ========================================================================
    // MOUSE
    // ========================================================================

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !self.session.modals.is_empty() {
            return;
        }

        let hit = row_at(self.list_area, self.state.offset(), mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((row, _)) = hit {
                    if row < self.session.list().len() {
                        self.focus = Focus::List;
                        self.session.rank_editor.cancel();
                        self.state.select(Some(row));
                        self.session.begin_drag(row);
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some((row, pointer_y)) = hit else {
                    return;
                };
                let bounds = RowBounds::new(0.0, f64::from(ROW_HEIGHT));
                if self.session.drag_over(row, bounds, pointer_y, Instant::now()) {
                    let dragged = self.session.drag.dragged_id().map(str::to_string);
                    if let Some(position) = dragged.and_then(|id| self.session.list().position(&id)) {
                        self.state.select(Some(position));
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(row) = self.session.end_drag() {
                    self.state.select(Some(row));
                    self.after_list_rebuild();
                }
            }
            MouseEventKind::ScrollDown => self.next(),
            MouseEventKind::ScrollUp => self.previous(),
            _ => {}
        }
    }
}

/// Map a terminal cell to a list row and the pointer's offset inside it.
///
/// `area` is the bordered table area; data rows start below the border and
/// the one-line header.
fn row_at(area: Rect, offset: usize, column: u16, y: u16) -> Option<(usize, f64)> {
    let first = area.y.saturating_add(2);
    let last = area.bottom().saturating_sub(1);
    if column < area.x || column >= area.right() || y < first || y >= last {
        return None;
    }

    let relative = y - first;
    let row = offset + usize::from(relative / ROW_HEIGHT);
    let inside = f64::from(relative % ROW_HEIGHT) + 0.5;
    Some((row, inside))
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    info!(entries = app.session.list().len(), "editor started");

    while !app.quit {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }

    Ok(())
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // List + text
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    app.list_area = content[0];
    render_list(f, content[0], app);
    render_text_pane(f, content[1], app);

    render_status_bar(f, chunks[2], app);

    if let Some(modal) = app.session.modals.top() {
        render_modal(f, &modal.body);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let (state, color) = if session.report().is_valid() {
        ("✓ in sync", Color::Green)
    } else {
        ("✗ text differs", Color::Red)
    };
    let login = if session.is_logged_in() {
        Span::styled("logged in", Style::default().fg(Color::Green))
    } else {
        Span::styled("logged out", Style::default().fg(Color::DarkGray))
    };

    let spans = vec![
        Span::styled(
            "Pokemon Priority",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Entries: {}/{}", session.list().len(), session.catalog().len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(state, Style::default().fg(color)),
        Span::raw("  |  "),
        login,
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_list(f: &mut Frame, area: Rect, app: &mut App) {
    let session = &app.session;
    let dragged = session.drag.dragged_id();
    let editing = match session.rank_editor.state() {
        RankEdit::Editing { row, buffer } => Some((*row, buffer.as_str())),
        RankEdit::Idle => None,
    };

    let header_cells = ["Rank", "Pokemon"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = session.list().ids().iter().enumerate().map(|(i, id)| {
        let (label, image) = match session.catalog().get(id) {
            Some(entry) => (entry.label(), entry.image_url()),
            None => (id.clone(), String::new()),
        };

        let rank = match editing {
            Some((row, buffer)) if row == i => Cell::from(format!("[{}_]", buffer))
                .style(Style::default().fg(Color::Black).bg(Color::Yellow)),
            _ => Cell::from(format!("{}", i + 1)),
        };

        let mut style = Style::default().fg(Color::White);
        if app.hits.contains(&i) {
            style = style.fg(Color::Yellow);
        }
        if dragged == Some(id.as_str()) {
            style = style.fg(Color::Magenta).add_modifier(Modifier::BOLD);
        }

        let text = Text::from(vec![
            Line::styled(label, style),
            Line::styled(image, Style::default().fg(Color::DarkGray)),
        ]);

        Row::new(vec![rank, Cell::from(text)]).height(ROW_HEIGHT)
    });

    let table = Table::new(rows, [Constraint::Length(7), Constraint::Min(20)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if app.focus == Focus::List {
                    Color::Cyan
                } else {
                    Color::White
                }))
                .title(" Priority "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_text_pane(f: &mut Frame, area: Rect, app: &App) {
    let banner = app.session.report().banner_lines();
    let banner_height = if banner.is_empty() {
        0
    } else {
        banner.len() as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(banner_height), Constraint::Min(3)])
        .split(area);

    if !banner.is_empty() {
        // One row per set; a full catalog's Missing line would otherwise fill the pane
        let width = usize::from(chunks[0].width.saturating_sub(2));
        let lines: Vec<Line> = banner
            .iter()
            .map(|line| Line::styled(fit_line(line, width), Style::default().fg(Color::Red)))
            .collect();

        let title = Line::from(vec![
            Span::raw(" Discrepancies ("),
            Span::styled("f", Style::default().fg(Color::Yellow)),
            Span::raw(" Fix) "),
        ]);
        let warning = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(title),
        );
        f.render_widget(warning, chunks[0]);
    }

    let editor_area = chunks[1];
    let text = app.session.text();
    let (cursor_row, cursor_col) = text.cursor();
    let visible = editor_area.height.saturating_sub(2) as usize;
    let scroll = cursor_row.saturating_sub(visible.saturating_sub(1));

    let lines: Vec<Line> = text.lines().iter().map(|l| Line::raw(l.as_str())).collect();
    let focused = app.focus == Focus::Text;
    let editor = Paragraph::new(lines).scroll((scroll as u16, 0)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::White }))
            .title(" Order (one id per line) "),
    );
    f.render_widget(editor, editor_area);

    if focused && app.session.modals.is_empty() {
        let x = editor_area.x + 1 + cursor_col as u16;
        let y = editor_area.y + 1 + (cursor_row - scroll) as u16;
        f.set_cursor(x.min(editor_area.right().saturating_sub(2)), y);
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let spans = if app.focus == Focus::Search {
        vec![
            Span::styled(" Search: ", Style::default().fg(Color::Cyan)),
            Span::raw(app.query.clone()),
            Span::styled("_", Style::default().fg(Color::Yellow)),
            Span::raw(format!("  ({} matches)", app.hits.len())),
        ]
    } else {
        let mut spans = Vec::new();
        if let Some(status) = app.session.status() {
            spans.push(Span::styled(
                format!(" {} ", status),
                Style::default().fg(Color::Green),
            ));
            spans.push(Span::raw("| "));
        }
        spans.extend([
            key("Enter"),
            Span::raw(" Rank | "),
            key("Tab"),
            Span::raw(" Text | "),
            key("/"),
            Span::raw(" Search | "),
            key("f"),
            Span::raw(" Fix | "),
            key("y"),
            Span::raw(" Copy | "),
            key("i"),
            Span::raw(" Import | "),
            key("s"),
            Span::raw(" Save | "),
            key("l"),
            Span::raw(if app.session.is_logged_in() { " Logout | " } else { " Login | " }),
            Span::styled("q", Style::default().fg(Color::Red)),
            Span::raw(" Quit"),
        ]);
        spans
    };

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_modal(f: &mut Frame, body: &ModalBody) {
    let area = centered_rect(60, 40, f.size());

    let mut lines = vec![Line::from("")];
    let hint = match body {
        ModalBody::Login { input } => {
            lines.push(Line::from(vec![
                Span::styled("  Password: ", Style::default().fg(Color::Cyan)),
                Span::raw("*".repeat(input.chars().count())),
                Span::styled("_", Style::default().fg(Color::Yellow)),
            ]));
            "Enter login · Esc cancel"
        }
        ModalBody::Import { instances, selected } | ModalBody::Save { instances, selected } => {
            if instances.is_empty() {
                lines.push(Line::from("  No saved instances"));
            }
            for (i, instance) in instances.iter().enumerate() {
                let style = if i == *selected {
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let marker = if i == *selected { "→ " } else { "  " };
                lines.push(Line::styled(format!("{}{}", marker, instance.name), style));
            }
            "↑/↓ choose · Enter select · Esc cancel"
        }
        ModalBody::ConfirmSave { instance } => {
            lines.push(Line::from(format!(
                "  Are you sure you want to save to {}?",
                instance.name
            )));
            "y confirm · n cancel"
        }
        ModalBody::Error { message } => {
            lines.push(Line::styled(
                format!("  {}", message),
                Style::default().fg(Color::Red),
            ));
            "Enter close"
        }
        ModalBody::Notice { message } => {
            lines.push(Line::from(format!("  {}", message)));
            "Enter close"
        }
    };
    lines.push(Line::from(""));
    lines.push(Line::styled(
        format!("  {}", hint),
        Style::default().fg(Color::DarkGray),
    ));

    let border = match body {
        ModalBody::Error { .. } => Color::Red,
        _ => Color::Yellow,
    };
    let popup = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", body.title())),
    );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

/// Cut a line to `width` characters, marking the cut with an ellipsis
fn fit_line(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = line.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_hit_testing() {
        // Border at y=0, header at y=1, rows from y=2
        let area = Rect::new(0, 0, 40, 12);

        assert_eq!(row_at(area, 0, 5, 1), None);
        assert_eq!(row_at(area, 0, 5, 2), Some((0, 0.5)));
        assert_eq!(row_at(area, 0, 5, 3), Some((0, 1.5)));
        assert_eq!(row_at(area, 3, 5, 4), Some((4, 0.5)));
        // Bottom border and outside the pane
        assert_eq!(row_at(area, 0, 5, 11), None);
        assert_eq!(row_at(area, 0, 45, 4), None);
    }

    #[test]
    fn test_banner_lines_fit_pane_width() {
        let missing = (1..=1000).map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
        let line = format!("Missing IDs: {}", missing);

        let fitted = fit_line(&line, 30);
        assert_eq!(fitted.chars().count(), 30);
        assert!(fitted.starts_with("Missing IDs: 1, 2"));
        assert!(fitted.ends_with('…'));

        assert_eq!(fit_line("Extra IDs: 99", 30), "Extra IDs: 99");
        assert_eq!(fit_line("Extra IDs: 99", 0), "");
    }

    #[test]
    fn test_pointer_halves_pick_side() {
        use pokemon_priority::reorder::DropSide;

        let bounds = RowBounds::new(0.0, f64::from(ROW_HEIGHT));
        let area = Rect::new(0, 0, 40, 12);

        let (_, upper) = row_at(area, 0, 1, 2).unwrap();
        let (_, lower) = row_at(area, 0, 1, 3).unwrap();
        assert_eq!(bounds.side_for(upper), DropSide::Before);
        assert_eq!(bounds.side_for(lower), DropSide::After);
    }
}
