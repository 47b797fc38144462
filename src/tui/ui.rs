//! Main UI renderer

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use crate::core::board::Column;
use crate::core::thread;
use crate::tui::app::{App, Screen};
use crate::tui::theme::Theme;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    if app.edit_mode {
        render_edit_popup(frame, app);
    }

    if let Some(popup) = &app.error_popup {
        render_error_popup(frame, &popup.title, &popup.message);
    }

    // Render help overlay on top if active
    if app.show_help {
        render_help_overlay(frame, app);
    }
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let week = app.board.week_start.format("%b %-d %Y");
    let handle = app
        .config
        .accounts
        .active()
        .map(|a| a.handle.as_str())
        .unwrap_or("no account");

    let title = match app.current_screen {
        Screen::Board => format!(" threadline │ Week of {} │ {} ", week, handle),
        Screen::Thread => format!(" threadline │ Thread │ {} ", handle),
    };

    let header = Paragraph::new(title)
        .style(Theme::header())
        .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(header, area);
}

/// Render the main content area based on current screen
fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.current_screen {
        Screen::Board => render_board(frame, area, app),
        Screen::Thread => render_thread(frame, area, app),
    }
}

/// Render the seven day columns
fn render_board(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(chunks[0]);

    for (column, rect) in app.board.columns.iter().zip(columns.iter()) {
        render_column(frame, *rect, app, column);
    }

    let help = Paragraph::new(
        " [h/l] Day  [j/k] Post  [H/L] Move  [J/K] Reorder  [a] Add  [e] Edit  [t] Thread  [?] Help",
    )
    .style(Theme::muted());
    frame.render_widget(help, chunks[1]);
}

fn render_column(frame: &mut Frame, area: Rect, app: &App, column: &Column) {
    let focused = column.day == app.focus;
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = if column.posts.is_empty() {
        vec![ListItem::new(Line::styled(" No posts", Theme::muted()))]
    } else {
        column
            .posts
            .iter()
            .enumerate()
            .map(|(i, post)| {
                let mut meta = vec![
                    Span::styled(
                        post.scheduled_at.format("%H:%M").to_string(),
                        Style::default().fg(Theme::SECONDARY),
                    ),
                    Span::raw(" "),
                    Span::styled(truncate(&post.author.handle, width.saturating_sub(6)), Theme::muted()),
                ];
                if !post.thread.is_empty() {
                    meta.push(Span::styled(
                        format!(" +{}", post.thread.len()),
                        Style::default().fg(Theme::PRIMARY),
                    ));
                }

                let mut body = Span::raw(truncate(&post.content, width.max(4) * 2));
                if post.is_over_limit(app.config.max_chars) {
                    body = body.style(Style::default().fg(Theme::ERROR));
                }

                let item = ListItem::new(Text::from(vec![
                    Line::from(meta),
                    Line::from(body),
                    Line::raw(""),
                ]));

                if focused && i == app.post_selection.selected {
                    item.style(Theme::selected())
                } else {
                    item
                }
            })
            .collect()
    };

    let border_style = if focused {
        Theme::focused_border()
    } else {
        Theme::normal()
    };

    let title = format!(" {} {} ({}) ", column.title(), column.date.format("%-d"), column.posts.len());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );

    frame.render_widget(list, area);
}

/// Render the thread screen for the open post
fn render_thread(frame: &mut Frame, area: Rect, app: &App) {
    let Some(post) = app.thread_root() else {
        let paragraph = Paragraph::new("\n  The post is no longer on the board.").block(
            Block::default().title(" Thread ").borders(Borders::ALL),
        );
        frame.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let root = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                post.scheduled_at.format("%a %b %-d %H:%M:%S").to_string(),
                Style::default().fg(Theme::SECONDARY),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{} ({})", post.author.name, post.author.handle),
                Theme::muted(),
            ),
        ]),
        Line::raw(post.content.clone()),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Main post ")
            .borders(Borders::ALL)
            .border_style(Theme::normal()),
    );
    frame.render_widget(root, chunks[0]);

    let gap = app.board.gap;
    let violation = thread::first_violation(post.scheduled_at, &post.thread, gap);
    let width = chunks[1].width.saturating_sub(36) as usize;

    let items: Vec<ListItem> = if post.thread.is_empty() {
        vec![ListItem::new("  No replies yet. Press [a] to add one.")]
    } else {
        post.thread
            .iter()
            .enumerate()
            .map(|(i, reply)| {
                let text = format!(
                    "  {:>2}. {}  {:<6} {}",
                    i + 1,
                    reply.scheduled_at.format("%b %-d %H:%M:%S"),
                    thread::offset_label(i, gap),
                    truncate(&reply.content, width.max(10)),
                );
                let item = ListItem::new(text);

                if i == app.reply_selection.selected {
                    item.style(Theme::selected())
                } else if violation == Some(i) {
                    item.style(Style::default().fg(Theme::WARNING))
                } else {
                    item
                }
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Replies ({}) · {}s apart ", post.thread.len(), gap.num_seconds()))
            .borders(Borders::ALL)
            .border_style(Theme::focused_border()),
    );
    frame.render_widget(list, chunks[1]);

    let help = Paragraph::new(
        " [a] Add  [d] Delete  [+/-] ±1 min  [>/<] ±1 day  [r] Regenerate  [Esc] Back",
    )
    .style(Theme::muted());
    frame.render_widget(help, chunks[2]);
}

/// Truncate to `max_len` characters with an ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status_text = if let Some(msg) = &app.status_message {
        format!(" {}", msg)
    } else {
        format!(
            " {} posts │ {} replies │ ? for help ",
            app.board.total_posts(),
            app.board.total_replies()
        )
    };

    let status = Paragraph::new(status_text)
        .style(Theme::status_bar())
        .block(Block::default().borders(Borders::TOP));

    frame.render_widget(status, area);
}

/// Centered popup area
fn popup_area(area: Rect, percent_x: u16, max_width: u16, height: u16) -> Rect {
    let width = (area.width * percent_x / 100).min(max_width);
    let height = height.min(area.height);
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Render the post editor
fn render_edit_popup(frame: &mut Frame, app: &App) {
    let area = popup_area(frame.area(), 70, 72, 10);
    frame.render_widget(Clear, area);

    let count = app.edit_buffer.chars().count();
    let count_style = if count > app.config.max_chars {
        Style::default().fg(Theme::ERROR)
    } else {
        Theme::muted()
    };

    let text = vec![
        Line::from(vec![
            Span::raw(app.edit_buffer.clone()),
            Span::styled("█", Style::default().fg(Color::Yellow)), // cursor
        ]),
        Line::raw(""),
        Line::styled(format!("{}/{}", count, app.config.max_chars), count_style),
    ];

    let editor = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Edit post · Enter save · Esc cancel ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(editor, area);
}

/// Render an error popup
fn render_error_popup(frame: &mut Frame, title: &str, message: &str) {
    let area = popup_area(frame.area(), 60, 60, 7);
    frame.render_widget(Clear, area);

    let popup = Paragraph::new(vec![
        Line::raw(message.to_string()),
        Line::raw(""),
        Line::styled("Press Enter to dismiss", Theme::muted()),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::ERROR)),
    )
    .style(Style::default().bg(Color::Black));

    frame.render_widget(popup, area);
}

/// Render the help overlay
fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Calculate centered popup area (60% width, 70% height)
    let popup_width = (area.width * 60 / 100).min(60);
    let popup_height = (area.height * 70 / 100).min(20);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let (title, help_lines) = get_help_content(app.current_screen);

    let text: Vec<Line> = help_lines
        .into_iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("  {:12}", key), Style::default().fg(Color::Cyan)),
                Span::raw(desc),
            ])
        })
        .collect();

    let help = Paragraph::new(text)
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help, popup_area);
}

/// Get help content for the current screen
fn get_help_content(screen: Screen) -> (&'static str, Vec<(&'static str, &'static str)>) {
    match screen {
        Screen::Board => (
            "Help - Board",
            vec![
                ("h / l", "Previous / next day"),
                ("j / k", "Next / previous post"),
                ("H / L", "Move post to previous / next day"),
                ("J / K", "Move post down / up"),
                ("a", "Add post"),
                ("d", "Delete post"),
                ("r", "Regenerate content"),
                ("e", "Edit content"),
                ("t / Enter", "Open thread"),
                ("q", "Quit application"),
                ("?", "Show this help"),
            ],
        ),
        Screen::Thread => (
            "Help - Thread",
            vec![
                ("j / k", "Next / previous reply"),
                ("a", "Add reply"),
                ("d", "Delete reply"),
                ("+ / -", "One minute later / earlier"),
                ("> / <", "One day later / earlier"),
                ("r", "Regenerate reply"),
                ("Esc / q", "Back to board"),
                ("?", "Show this help"),
            ],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    use crate::core::board::Board;
    use crate::core::config::Config;
    use crate::core::mock::MockContent;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_board_renders_day_titles() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut content = MockContent::seeded(3);
        let board = Board::mock(date, &mut content);
        let app = App::with_board(Config::default(), board, content);

        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let rendered: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(rendered.contains("Monday"));
        assert!(rendered.contains("Week of Oct 19 2026"));
    }
}
