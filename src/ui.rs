use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::dispatch::DispatchOutcome;
use crate::types::{AppState, FormField, InputMode};

const BASE_FG: Color = Color::Rgb(216, 222, 233);
const BASE_BG: Color = Color::Rgb(46, 52, 64);
const ACCENT_COLOR: Color = Color::Rgb(136, 192, 208);
const SUCCESS_COLOR: Color = Color::Rgb(163, 190, 140);
const WARNING_COLOR: Color = Color::Rgb(235, 203, 139);
const ERROR_COLOR: Color = Color::Rgb(191, 97, 106);
const HIGHLIGHT_BG: Color = Color::Rgb(59, 66, 82);
const BORDER_COLOR: Color = Color::Rgb(76, 86, 106);
const INPUT_TEXT: Color = Color::Rgb(235, 203, 139);

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    app.initialize().await?;
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if crossterm::event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Normal => {
                            if let Err(e) =
                                handle_normal_input(&mut app, key.code, key.modifiers).await
                            {
                                app.error = Some(e.to_string());
                            }
                        }
                        InputMode::Editing => {
                            handle_edit_input(&mut app, key.code).await?;
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

pub async fn handle_normal_input(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
    if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    match key {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => {
            if app.error.is_some() {
                app.error = None;
            } else if app.show_help {
                app.toggle_help();
            } else if app.picker.is_some() {
                app.close_picker();
            } else {
                match app.state {
                    AppState::EditingForm => app.cancel(),
                    AppState::Submitting | AppState::LoadingUniverse => {}
                    AppState::BackupsListing | AppState::Error(_) => app.should_quit = true,
                }
            }
        }
        KeyCode::Char('h') => app.toggle_help(),
        KeyCode::Up => app.move_selection_up(),
        KeyCode::Down | KeyCode::Tab => app.move_selection_down(),
        KeyCode::Enter => app.select_current_item().await?,
        KeyCode::Char(' ') => app.toggle_current(),
        KeyCode::Char('n') => {
            if app.state == AppState::BackupsListing {
                app.new_backup();
            }
        }
        KeyCode::Char('r') => {
            if matches!(app.state, AppState::Error(_)) {
                app.initialize().await?;
            }
        }
        _ => {}
    }
    Ok(())
}

pub async fn handle_edit_input(app: &mut App, key: KeyCode) -> Result<()> {
    match key {
        KeyCode::Enter => app.finish_editing(),
        KeyCode::Esc => app.cancel_editing(),
        KeyCode::Char(c) => app.edit_buffer.push(c),
        KeyCode::Backspace => {
            app.edit_buffer.pop();
        }
        _ => {}
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, main_chunks[0], app);
    render_content(f, main_chunks[1], app);
    render_footer(f, main_chunks[2], app);

    if app.picker.is_some() {
        render_picker_popup(f, app);
    }
    if app.input_mode == InputMode::Editing {
        render_edit_popup(f, app);
    }
    if app.show_help {
        render_help_popup(f);
    }
    if app.error.is_some() {
        render_error_popup(f, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title = if app.dry_run_mode {
        format!(" {} - DRY RUN MODE ", app.modal_title())
    } else {
        format!(" {} ", app.modal_title())
    };

    let subtitle = match &app.state {
        AppState::LoadingUniverse => "Loading storage configs and tables...".to_string(),
        AppState::EditingForm if app.is_scheduled => {
            format!("Scheduled backup of universe {}", app.universe_uuid)
        }
        AppState::EditingForm => format!("One-off backup of universe {}", app.universe_uuid),
        AppState::Submitting => "Submitting backup request...".to_string(),
        AppState::BackupsListing => app.modal.route.clone().unwrap_or_default(),
        AppState::Error(_) => "Error Occurred".to_string(),
    };

    let header_block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(if app.dry_run_mode {
            Style::default().fg(WARNING_COLOR).bg(BASE_BG)
        } else {
            Style::default().fg(BASE_FG).bg(BASE_BG)
        });

    let header_content = Paragraph::new(subtitle)
        .style(Style::default().fg(ACCENT_COLOR))
        .alignment(Alignment::Center)
        .block(header_block);

    f.render_widget(header_content, area);
}

fn render_content(f: &mut Frame, area: Rect, app: &App) {
    match &app.state {
        AppState::LoadingUniverse => render_loading(f, area, "Loading universe..."),
        AppState::EditingForm | AppState::Submitting => render_form(f, area, app),
        AppState::BackupsListing => render_backups_listing(f, area, app),
        AppState::Error(msg) => render_error(f, area, msg),
    }
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let flags = app.flags();
    let fields: Vec<FormField> = flags
        .visible_fields()
        .into_iter()
        .filter(|f| !matches!(f, FormField::Submit | FormField::Cancel))
        .collect();

    let mut constraints = Vec::new();
    for field in &fields {
        constraints.push(Constraint::Length(3));
        if app.field_errors.for_field(*field).is_some() {
            constraints.push(Constraint::Length(1));
        }
        if *field == FormField::SchedulingFrequency {
            constraints.push(Constraint::Length(1));
        }
    }
    constraints.push(Constraint::Length(3));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut slot = 0;
    for field in &fields {
        render_field(f, chunks[slot], app, *field, flags.is_read_only(*field));
        slot += 1;

        if let Some(message) = app.field_errors.for_field(*field) {
            f.render_widget(
                Paragraph::new(format!("  {}", message)).style(Style::default().fg(ERROR_COLOR)),
                chunks[slot],
            );
            slot += 1;
        }

        if *field == FormField::SchedulingFrequency {
            f.render_widget(
                Paragraph::new("OR")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(BORDER_COLOR)),
                chunks[slot],
            );
            slot += 1;
        }
    }

    render_buttons(f, chunks[slot], app);
}

fn render_field(f: &mut Frame, area: Rect, app: &App, field: FormField, read_only: bool) {
    let focused = app.focus == field;
    let has_error = app.field_errors.for_field(field).is_some();

    let style = if has_error {
        Style::default().fg(ERROR_COLOR)
    } else if focused {
        Style::default().fg(ACCENT_COLOR)
    } else if read_only {
        Style::default().fg(BORDER_COLOR)
    } else {
        Style::default().fg(BASE_FG)
    };

    let title = if read_only {
        format!("{} (read-only)", field.label())
    } else {
        field.label().to_string()
    };

    let value = app.field_value(field);
    let content = if value.is_empty() {
        Span::styled(placeholder(field), Style::default().fg(BORDER_COLOR))
    } else {
        Span::styled(value, Style::default().fg(BASE_FG))
    };

    let marker = if focused { "► " } else { "  " };

    f.render_widget(
        Paragraph::new(Line::from(vec![Span::raw(marker), content])).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(if focused {
                    BorderType::Thick
                } else {
                    BorderType::Rounded
                })
                .style(style),
        ),
        area,
    );
}

fn placeholder(field: FormField) -> &'static str {
    match field {
        FormField::SchedulingFrequency => "Interval in ms",
        FormField::CronExpression => "Cron expression",
        FormField::StorageConfig => "Select storage...",
        FormField::TableKeyspace => "Select keyspace...",
        FormField::BackupTables => "Select tables...",
        _ => "",
    }
}

fn render_buttons(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    for (field, chunk, color) in [
        (FormField::Submit, chunks[1], SUCCESS_COLOR),
        (FormField::Cancel, chunks[2], BORDER_COLOR),
    ] {
        let label = if field == FormField::Submit && app.state == AppState::Submitting {
            "Submitting..."
        } else {
            field.label()
        };
        let style = if app.focus == field {
            Style::default()
                .fg(color)
                .bg(HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };

        f.render_widget(
            Paragraph::new(label)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .style(style),
                ),
            chunk,
        );
    }
}

fn render_backups_listing(f: &mut Frame, area: Rect, app: &App) {
    let route = app.modal.route.clone().unwrap_or_default();
    let (status, task) = match &app.last_outcome {
        Some(DispatchOutcome::Submitted { task_uuid }) => {
            ("✅ Backup request accepted", format!("Task: {}", task_uuid))
        }
        Some(DispatchOutcome::NoRequest) => ("No backup target was selected.", String::new()),
        _ => ("", String::new()),
    };
    let submitted_at = app
        .submitted_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            status,
            Style::default().fg(SUCCESS_COLOR).add_modifier(Modifier::BOLD),
        )),
        Line::from(task),
        Line::from(""),
        Line::from(format!("Submitted at: {}", submitted_at)),
        Line::from(format!("Backups: {}", route)),
        Line::from(""),
        Line::from(Span::styled(
            "[N] New backup | [Q] Quit",
            Style::default().fg(WARNING_COLOR),
        )),
    ];

    f.render_widget(
        Paragraph::new(text)
            .block(
                Block::default()
                    .title("Backups")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .style(Style::default().fg(ACCENT_COLOR)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_loading(f: &mut Frame, area: Rect, message: &str) {
    f.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(WARNING_COLOR))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            ),
        area,
    );
}

fn render_error(f: &mut Frame, area: Rect, error_msg: &str) {
    let text = vec![
        Line::from(""),
        Line::from(error_msg),
        Line::from(""),
        Line::from(Span::styled(
            "[R] Retry | [Q] Quit",
            Style::default().fg(WARNING_COLOR),
        )),
    ];

    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(ERROR_COLOR))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title("Error")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            ),
        area,
    );
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let hints = if app.input_mode == InputMode::Editing {
        "[Enter] Save | [Esc] Discard"
    } else if app.picker.is_some() {
        "[↑/↓] Move | [Space] Mark table | [Enter] Choose | [Esc] Close"
    } else {
        match app.state {
            AppState::EditingForm => {
                "[↑/↓] Field | [Enter] Edit/Choose | [Space] Toggle | [H] Help | [Esc] Cancel"
            }
            AppState::BackupsListing => "[N] New backup | [Q] Quit",
            AppState::Error(_) => "[R] Retry | [Q] Quit",
            _ => "[Q] Quit",
        }
    };

    let user = app
        .authenticated_user
        .as_deref()
        .map(|u| format!(" Customer: {} ", u))
        .unwrap_or_default();

    f.render_widget(
        Paragraph::new(hints)
            .style(Style::default().fg(BASE_FG))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(user)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .style(Style::default().fg(BORDER_COLOR)),
            ),
        area,
    );
}

fn render_picker_popup(f: &mut Frame, app: &App) {
    let Some(picker) = &app.picker else {
        return;
    };
    let popup_area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, popup_area);

    let multi = picker.field == FormField::BackupTables;
    let labels = app.picker_labels(picker.field);
    let items: Vec<ListItem> = if labels.is_empty() {
        vec![ListItem::new("  No options available").style(Style::default().fg(BORDER_COLOR))]
    } else {
        labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                let text = if multi {
                    let mark = if picker.marked.contains(&i) { "[x]" } else { "[ ]" };
                    format!("{} {}", mark, label)
                } else {
                    label
                };
                ListItem::new(text).style(Style::default().fg(BASE_FG))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(picker.field.label())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(ACCENT_COLOR).bg(BASE_BG)),
        )
        .highlight_style(
            Style::default()
                .bg(HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("► ");

    let mut state = ListState::default();
    state.select(Some(picker.cursor));

    f.render_stateful_widget(list, popup_area, &mut state);
}

fn render_edit_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let min_width = 50;
    let max_width = 80;
    let width = if area.width < min_width + 10 {
        area.width.saturating_sub(4)
    } else {
        (area.width * 60 / 100).min(max_width).max(min_width)
    };
    let height = 6;

    let popup_area = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    f.render_widget(Clear, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(popup_area);

    let input = Paragraph::new(app.edit_buffer.as_str())
        .style(Style::default().fg(INPUT_TEXT))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(app.focus.label())
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(ACCENT_COLOR).bg(BASE_BG)),
        );
    f.render_widget(input, chunks[0]);

    f.set_cursor_position((
        chunks[0].x + app.edit_buffer.width() as u16 + 1,
        chunks[0].y + 1,
    ));

    let hint = if app.focus == FormField::CronExpression {
        "Min Hour Day Mon Weekday   e.g. */5 * * * *"
    } else {
        "Interval in milliseconds"
    };
    let help = Paragraph::new(vec![
        Line::from(Span::styled(hint, Style::default().fg(BORDER_COLOR))),
        Line::from(Span::styled(
            "[Enter] Confirm | [Esc] Cancel",
            Style::default().fg(WARNING_COLOR),
        )),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().bg(BASE_BG));
    f.render_widget(help, chunks[1]);
}

fn render_error_popup(f: &mut Frame, app: &App) {
    if let Some(error_msg) = &app.error {
        let popup_area = centered_rect(60, 25, f.area());
        f.render_widget(Clear, popup_area);

        let error_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "❌ ERROR ❌",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(error_msg.as_str()),
        ];

        let block = Block::default()
            .title("Error")
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .style(Style::default().fg(Color::Red));

        let paragraph = Paragraph::new(error_text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, popup_area);
    }
}

fn render_help_popup(f: &mut Frame) {
    let popup_area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            "HELP - YugabyteDB Backup",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("General:"),
        Line::from("  --scheduled               Show frequency / cron fields"),
        Line::from("  --table <uuid>            Back up a single table"),
        Line::from("  --dry-run                 Log requests without sending them"),
        Line::from(""),
        section("Form:"),
        Line::from("  ↑/↓       Move between fields or options"),
        Line::from("  Enter     Edit text, open option list, confirm choice"),
        Line::from("  Space     Flip a toggle, mark a table in the list"),
        Line::from("  Esc       Close list or popup, cancel the form"),
        Line::from(""),
        section("Scheduling:"),
        Line::from("  Fill either the frequency or the cron expression;"),
        Line::from("  the other field becomes read-only."),
        Line::from("  Cron: Min(0-59) Hour(0-23) Day(1-31) Mon(1-12) Weekday(0-6)"),
        Line::from(""),
        section("Commands:"),
        Line::from("  N         Start a new backup after submitting"),
        Line::from("  R         Retry loading after an error"),
        Line::from("  H         Toggle this help screen"),
        Line::from("  Q         Quit application"),
        Line::from(""),
        Line::from(Span::styled(
            "Press H or Esc to close this help",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(Color::Black));

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockPlatformClientTrait;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_form_renders_field_labels() {
        let mock_client = MockPlatformClientTrait::new();
        let mut app = App::new(Box::new(mock_client), "u1", true);
        app.state = AppState::EditingForm;
        app.reset_form();

        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|f| ui(f, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Create Backup"));
        assert!(content.contains("Backup frequency"));
        assert!(content.contains("Storage"));
    }
}
