//! Main TUI application state and logic

use std::io::{self, Stdout};
use std::time::Duration;

use chrono::{Local, NaiveTime};
use crossterm::event::{KeyCode, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::Terminal;
use tracing::debug;

use crate::core::board::Board;
use crate::core::config::Config;
use crate::core::mock::{ContentSource, MockContent};
use crate::core::post::{validate_content, Author, DayOfWeek, Post};
use crate::core::thread::{self, ThreadItem};
use crate::error::{Result, ThreadlineError};
use crate::tui::event::{is_back_key, is_quit_key, AppEvent, EventHandler};
use crate::tui::ui;

/// Current screen in the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Board,
    Thread,
}

/// List selection state
#[derive(Debug, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total items in the list
    pub total: usize,
}

impl ListState {
    pub fn new(total: usize) -> Self {
        Self { selected: 0, total }
    }

    pub fn next(&mut self) {
        if self.total > 0 {
            self.selected = (self.selected + 1) % self.total;
        }
    }

    pub fn previous(&mut self) {
        if self.total > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.total - 1);
        }
    }

    /// Update the total, keeping the selection in range
    pub fn resize(&mut self, total: usize) {
        self.total = total;
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    /// Select `index`, clamped to the list
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.total.saturating_sub(1));
    }
}

/// Error popup for displaying errors that require user acknowledgment
#[derive(Debug, Clone)]
pub struct ErrorPopup {
    pub title: String,
    pub message: String,
}

/// Main TUI application
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Current screen
    pub current_screen: Screen,
    /// Navigation history for back navigation
    pub navigation_stack: Vec<Screen>,
    /// Status message to display
    pub status_message: Option<String>,
    /// Whether to show the help overlay
    pub show_help: bool,
    /// Error popup to display (requires user dismissal)
    pub error_popup: Option<ErrorPopup>,

    // ─────────────────────────────────────────────────────────────────────────
    // Board
    // ─────────────────────────────────────────────────────────────────────────
    /// The week being planned
    pub board: Board,
    /// Column with keyboard focus
    pub focus: DayOfWeek,
    /// Selection within the focused column
    pub post_selection: ListState,
    /// Whether the selected post's text is being edited
    pub edit_mode: bool,
    /// Text being typed in edit mode
    pub edit_buffer: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Thread screen
    // ─────────────────────────────────────────────────────────────────────────
    /// Post whose thread is open
    pub thread_post: Option<String>,
    /// Selected reply
    pub reply_selection: ListState,

    /// Loaded settings
    pub config: Config,
    content: MockContent,
}

impl App {
    /// Create a new app with this week's mock board
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let mut content = MockContent::new();
        let board = Board::mock(Local::now().date_naive(), &mut content).with_gap(config.gap()?);
        Ok(Self::with_board(config, board, content))
    }

    /// Create an app over an existing board
    pub fn with_board(config: Config, board: Board, content: MockContent) -> Self {
        let focus = DayOfWeek::of(Local::now().date_naive());
        let focus = if board.column(focus).date == Local::now().date_naive() {
            focus
        } else {
            DayOfWeek::Monday
        };
        let total = board.column(focus).posts.len();

        Self {
            running: true,
            current_screen: Screen::Board,
            navigation_stack: Vec::new(),
            status_message: None,
            show_help: false,
            error_popup: None,
            board,
            focus,
            post_selection: ListState::new(total),
            edit_mode: false,
            edit_buffer: String::new(),
            thread_post: None,
            reply_selection: ListState::default(),
            config,
            content,
        }
    }

    /// Setup terminal for TUI
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode().map_err(|e| ThreadlineError::Terminal(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| ThreadlineError::Terminal(e.to_string()))?;
        let backend = CrosstermBackend::new(stdout);
        let terminal =
            Terminal::new(backend).map_err(|e| ThreadlineError::Terminal(e.to_string()))?;
        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode().map_err(|e| ThreadlineError::Terminal(e.to_string()))?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| ThreadlineError::Terminal(e.to_string()))?;
        terminal
            .show_cursor()
            .map_err(|e| ThreadlineError::Terminal(e.to_string()))?;
        Ok(())
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = Self::setup_terminal()?;
        let mut events = EventHandler::new(Duration::from_millis(250));

        while self.running {
            terminal
                .draw(|frame| ui::render(frame, self))
                .map_err(|e| ThreadlineError::Terminal(e.to_string()))?;

            if let Some(event) = events.next().await {
                match event {
                    AppEvent::Key(key) => self.handle_key_event(key),
                    AppEvent::Resize(_, _) => {
                        // Terminal resize is handled automatically by ratatui
                    }
                    AppEvent::Tick => {}
                }
            }
        }

        Self::restore_terminal(&mut terminal)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    /// Posts in the focused column
    pub fn focused_posts(&self) -> &[Post] {
        &self.board.column(self.focus).posts
    }

    /// The highlighted post on the board
    pub fn selected_post(&self) -> Option<&Post> {
        self.focused_posts().get(self.post_selection.selected)
    }

    /// The post whose thread is open
    pub fn thread_root(&self) -> Option<&Post> {
        let id = self.thread_post.as_deref()?;
        self.board.find_post(id).map(|(_, _, post)| post)
    }

    fn author(&self) -> Author {
        self.config
            .accounts
            .active()
            .map(|a| a.author())
            .unwrap_or_else(|| Author::new("You", "@you"))
    }

    fn post_time(&self) -> NaiveTime {
        self.config
            .post_time()
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Key handling
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_key_event(&mut self, key: KeyEvent) {
        // If help is shown, any key dismisses it
        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.error_popup.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                self.error_popup = None;
            }
            return;
        }

        // Text input bypasses global handlers
        if self.edit_mode {
            self.handle_edit_key(key);
            return;
        }

        if key.code == KeyCode::Char('?') {
            self.show_help = true;
            return;
        }

        if is_quit_key(&key) {
            if self.current_screen == Screen::Board {
                self.quit();
            } else {
                self.go_back();
            }
            return;
        }

        if is_back_key(&key) {
            self.go_back();
            return;
        }

        match self.current_screen {
            Screen::Board => self.handle_board_key(key),
            Screen::Thread => self.handle_thread_key(key),
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.focus_column(-1),
            KeyCode::Char('l') | KeyCode::Right => self.focus_column(1),
            KeyCode::Char('j') | KeyCode::Down => self.post_selection.next(),
            KeyCode::Char('k') | KeyCode::Up => self.post_selection.previous(),
            KeyCode::Char('H') => self.move_selected_day(-1),
            KeyCode::Char('L') => self.move_selected_day(1),
            KeyCode::Char('J') => self.reorder_selected(1),
            KeyCode::Char('K') => self.reorder_selected(-1),
            KeyCode::Char('a') => self.add_post(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('r') => self.regenerate_selected(),
            KeyCode::Char('e') => self.start_edit(),
            KeyCode::Char('t') | KeyCode::Enter => self.open_thread(),
            _ => {}
        }
    }

    fn handle_thread_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.reply_selection.next(),
            KeyCode::Char('k') | KeyCode::Up => self.reply_selection.previous(),
            KeyCode::Char('a') => self.add_reply(),
            KeyCode::Char('d') => self.delete_reply(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.shift_reply_minutes(1),
            KeyCode::Char('-') => self.shift_reply_minutes(-1),
            KeyCode::Char('>') | KeyCode::Char('.') => self.shift_reply_days(1),
            KeyCode::Char('<') | KeyCode::Char(',') => self.shift_reply_days(-1),
            KeyCode::Char('r') => self.regenerate_reply(),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.edit_mode = false;
                self.edit_buffer.clear();
                self.status_message = Some("Edit cancelled".to_string());
            }
            KeyCode::Enter => self.save_edit(),
            KeyCode::Backspace => {
                self.edit_buffer.pop();
            }
            KeyCode::Char(c) => self.edit_buffer.push(c),
            _ => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn navigate_to(&mut self, screen: Screen) {
        if self.current_screen != screen {
            self.navigation_stack.push(self.current_screen);
            self.current_screen = screen;
            self.status_message = None;
        }
    }

    pub fn go_back(&mut self) {
        if let Some(screen) = self.navigation_stack.pop() {
            if self.current_screen == Screen::Thread {
                self.thread_post = None;
            }
            self.current_screen = screen;
            self.status_message = None;
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    fn focus_column(&mut self, delta: i64) {
        let index = (self.focus.index() as i64 + delta).clamp(0, 6) as usize;
        if let Some(day) = DayOfWeek::from_index(index) {
            self.focus = day;
            self.post_selection.resize(self.focused_posts().len());
        }
    }

    /// Focus the column holding `id` and select it
    fn select_post(&mut self, id: &str) {
        if let Some((day, index, _)) = self.board.find_post(id) {
            self.focus = day;
            self.post_selection.resize(self.focused_posts().len());
            self.post_selection.select(index);
        } else {
            self.post_selection.resize(self.focused_posts().len());
        }
    }

    /// Apply a board operation, keeping the board unchanged on error
    fn update_board<F>(&mut self, op: F) -> bool
    where
        F: FnOnce(Board) -> Result<Board>,
    {
        match op(self.board.clone()) {
            Ok(board) => {
                self.board = board;
                true
            }
            Err(e) => {
                self.status_message = Some(format!("Error: {}", e));
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Board operations
    // ─────────────────────────────────────────────────────────────────────────

    fn move_selected_day(&mut self, delta: i64) {
        let Some(id) = self.selected_post().map(|p| p.id.clone()) else {
            return;
        };
        let target = self.focus.index() as i64 + delta;
        let Some(to) = usize::try_from(target).ok().and_then(DayOfWeek::from_index) else {
            return;
        };

        let from = self.focus;
        let from_index = self.post_selection.selected;
        let to_index = self.board.column(to).posts.len();
        if self.update_board(|b| b.move_post(from, from_index, to, to_index)) {
            self.select_post(&id);
            self.status_message = Some(format!("Moved post to {}", to));
        }
    }

    fn reorder_selected(&mut self, delta: i64) {
        let Some(id) = self.selected_post().map(|p| p.id.clone()) else {
            return;
        };
        let from_index = self.post_selection.selected;
        let Some(to_index) = from_index.checked_add_signed(delta as isize) else {
            return;
        };
        if to_index >= self.focused_posts().len() {
            return;
        }

        let day = self.focus;
        if self.update_board(|b| b.move_post(day, from_index, day, to_index)) {
            self.select_post(&id);
        }
    }

    fn add_post(&mut self) {
        let day = self.focus;
        let time = self.post_time();
        let author = self.author();
        let (board, id) = self
            .board
            .clone()
            .add_post(day, time, author, &mut self.content);
        self.board = board;
        self.select_post(&id);
        self.status_message = Some(format!("Added post on {}", day));
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_post().map(|p| p.id.clone()) else {
            return;
        };
        let day = self.focus;
        if self.update_board(|b| b.delete_post(&id, day)) {
            self.post_selection.resize(self.focused_posts().len());
            self.status_message = Some("Post deleted".to_string());
        }
    }

    fn regenerate_selected(&mut self) {
        let Some(id) = self.selected_post().map(|p| p.id.clone()) else {
            return;
        };
        let day = self.focus;
        let board = self.board.clone();
        match board.regenerate_content(&id, day, &mut self.content) {
            Ok(board) => {
                self.board = board;
                self.status_message = Some("Content regenerated".to_string());
            }
            Err(e) => self.status_message = Some(format!("Error: {}", e)),
        }
    }

    fn start_edit(&mut self) {
        if let Some(post) = self.selected_post() {
            self.edit_buffer = post.content.clone();
            self.edit_mode = true;
        }
    }

    fn save_edit(&mut self) {
        let Some(post) = self.selected_post().cloned() else {
            self.edit_mode = false;
            return;
        };

        if let Err(e) = validate_content(&self.edit_buffer, self.config.max_chars) {
            self.error_popup = Some(ErrorPopup {
                title: "Cannot Save Post".to_string(),
                message: e.to_string(),
            });
            return;
        }

        let post = Post {
            content: std::mem::take(&mut self.edit_buffer),
            ..post
        };
        let id = post.id.clone();
        let day = self.focus;
        if self.update_board(|board| board.save_post(post, day)) {
            self.edit_mode = false;
            self.select_post(&id);
            self.status_message = Some("Post saved".to_string());
        }
    }

    fn open_thread(&mut self) {
        let Some(post) = self.selected_post() else {
            return;
        };
        let id = post.id.clone();
        let total = post.thread.len();
        debug!(%id, "opening thread");

        self.thread_post = Some(id);
        self.reply_selection = ListState::new(total);
        self.navigate_to(Screen::Thread);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Thread operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a timeline operation to the open thread
    fn update_thread<F>(&mut self, op: F) -> bool
    where
        F: FnOnce(&Post, chrono::Duration) -> Result<Vec<ThreadItem>>,
    {
        let Some(post) = self.thread_root().cloned() else {
            return false;
        };
        let gap = self.board.gap;

        let applied = op(&post, gap).and_then(|replies| self.board.clone().set_thread(&post.id, replies));
        match applied {
            Ok(board) => {
                self.board = board;
                let total = self.thread_root().map_or(0, |p| p.thread.len());
                self.reply_selection.resize(total);
                true
            }
            Err(e) => {
                self.status_message = Some(format!("Error: {}", e));
                false
            }
        }
    }

    fn add_reply(&mut self) {
        let content = self.content.next_reply();
        if self.update_thread(|post, gap| {
            let id = thread::fresh_reply_id(&post.thread);
            thread::insert(post.scheduled_at, &post.thread, gap, id, content)
        }) {
            let last = self.reply_selection.total.saturating_sub(1);
            self.reply_selection.select(last);
            self.status_message = Some("Reply added".to_string());
        }
    }

    fn delete_reply(&mut self) {
        let index = self.reply_selection.selected;
        if self.reply_selection.total == 0 {
            return;
        }
        if self.update_thread(|post, gap| thread::remove(post.scheduled_at, &post.thread, gap, index)) {
            self.status_message = Some("Reply deleted".to_string());
        }
    }

    fn shift_reply_minutes(&mut self, minutes: i64) {
        let index = self.reply_selection.selected;
        if self.reply_selection.total == 0 {
            return;
        }

        let mut clamped = false;
        self.update_thread(|post, gap| {
            let current = post.thread[index].scheduled_at;
            let proposed = current
                .checked_add_signed(chrono::Duration::minutes(minutes))
                .ok_or_else(|| out_of_range(index))?;
            let replies = thread::edit_item_time(post.scheduled_at, &post.thread, gap, index, proposed)?;
            clamped = replies[index].scheduled_at != proposed;
            Ok(replies)
        });

        if clamped {
            self.status_message = Some(format!(
                "Reply {} cannot be earlier than {}s after the one before it",
                index + 1,
                self.board.gap.num_seconds()
            ));
        }
    }

    fn shift_reply_days(&mut self, days: i64) {
        let index = self.reply_selection.selected;
        if self.reply_selection.total == 0 {
            return;
        }

        self.update_thread(|post, gap| {
            let date = post.thread[index]
                .scheduled_at
                .date()
                .checked_add_signed(chrono::Duration::days(days))
                .ok_or_else(|| out_of_range(index))?;
            thread::edit_item_date(post.scheduled_at, &post.thread, gap, index, date)
        });
    }

    fn regenerate_reply(&mut self) {
        let index = self.reply_selection.selected;
        if self.reply_selection.total == 0 {
            return;
        }

        let content = self.content.next_reply();
        if self.update_thread(|post, _| {
            let mut replies = post.thread.clone();
            replies[index].content = content;
            Ok(replies)
        }) {
            self.status_message = Some("Reply regenerated".to_string());
        }
    }
}

fn out_of_range(index: usize) -> ThreadlineError {
    ThreadlineError::InvalidInput(format!("Reply {} cannot move that far", index + 1))
}
