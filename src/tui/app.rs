use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io;
use crate::io::folder_store::get_folders;
use crate::io::lock::WriteLock;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::store::{FileStore, KeyValueStore};
use crate::io::todo_store::get_todos;
use crate::io::watcher::{DataWatcher, FileEvent};
use crate::model::config::AppConfig;
use crate::model::folder::{Folder, INBOX_ID};
use crate::model::todo::Todo;
use crate::motion::arbiter::{InteractionConfig, Intent, Interactions};
use crate::motion::fab::FabAction;
use crate::ops::search::{self, QuickFindResults};
use crate::ops::{folder_ops, todo_ops};

use super::input;
use super::layout::ScreenLayout;
use super::render;
use super::text_input::TextInput;
use super::theme::Theme;

/// Tick while something is moving
const FRAME_TICK: Duration = Duration::from_millis(16);
/// Tick while idle
const IDLE_TICK: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing into the sidebar search box
    Search,
    /// Typing into the bottom prompt
    Input(InputKind),
    Confirm,
    QuickFind,
}

/// What the bottom prompt is collecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    NewTodo,
    NewFolder,
    EditTodo(u64),
    AddTag(u64),
    RemoveTag(u64),
    MoveTodo(u64),
    RenameFolder(String),
}

impl InputKind {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputKind::NewTodo => "new to-do",
            InputKind::NewFolder => "new list",
            InputKind::EditTodo(_) => "edit",
            InputKind::AddTag(_) => "add tag",
            InputKind::RemoveTag(_) => "remove tag",
            InputKind::MoveTodo(_) => "move to",
            InputKind::RenameFolder(_) => "rename",
        }
    }
}

/// Which pane keyboard navigation drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Todos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteFolder(String),
    DeleteTodo(u64),
}

/// A blocking yes/no question
#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub title: String,
    pub message: String,
    pub action: ConfirmAction,
}

#[derive(Debug, Clone, Default)]
pub struct QuickFindState {
    pub input: TextInput,
    /// Index into folders-then-todos of the current results
    pub cursor: usize,
}

/// Main application state
pub struct App {
    /// None when running against an in-memory store
    pub data_dir: Option<PathBuf>,
    pub store: Box<dyn KeyValueStore>,
    pub config: AppConfig,
    pub theme: Theme,
    pub folders: Vec<Folder>,
    pub todos: Vec<Todo>,
    pub selected_folder: String,
    pub focus: Focus,
    pub sidebar_cursor: usize,
    pub todo_cursor: usize,
    pub todo_scroll: usize,
    pub mode: Mode,
    /// Sidebar search term; non-empty switches the main pane to results
    pub search: TextInput,
    /// Bottom prompt buffer
    pub input: TextInput,
    pub confirm: Option<ConfirmState>,
    pub quick_find: Option<QuickFindState>,
    pub interactions: Interactions,
    /// Geometry of the last draw; pointer events hit-test against it
    pub layout: ScreenLayout,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

fn interaction_config(config: &AppConfig) -> InteractionConfig {
    let cells = config.cells;
    InteractionConfig {
        folder: config.magnet.folder(),
        search: config.magnet.search(),
        fab: config.magnet.fab(),
        reveal_width: config.swipe.reveal_width,
        permanent: config.permanent_folders.clone(),
        sidebar_width: cells.columns_to_px(config.ui.sidebar_width),
        sidebar_min: cells.columns_to_px(config.ui.min_sidebar_width),
        sidebar_max: cells.columns_to_px(config.ui.max_sidebar_width),
    }
}

impl App {
    pub fn new(store: Box<dyn KeyValueStore>, config: AppConfig, data_dir: Option<PathBuf>) -> Self {
        let mut app = App {
            data_dir,
            store,
            theme: Theme::from_config(&config.ui),
            interactions: Interactions::new(interaction_config(&config)),
            layout: ScreenLayout {
                cells: config.cells,
                ..ScreenLayout::default()
            },
            config,
            folders: Vec::new(),
            todos: Vec::new(),
            selected_folder: INBOX_ID.to_string(),
            focus: Focus::Sidebar,
            sidebar_cursor: 0,
            todo_cursor: 0,
            todo_scroll: 0,
            mode: Mode::Navigate,
            search: TextInput::default(),
            input: TextInput::default(),
            confirm: None,
            quick_find: None,
            status_message: None,
            should_quit: false,
        };
        app.reload();
        app
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Re-read folders and todos from the store and repair cursors.
    pub fn reload(&mut self) {
        self.folders = get_folders(&mut *self.store);
        self.todos = get_todos(&*self.store);
        if !self.folders.iter().any(|f| f.id == self.selected_folder) {
            self.selected_folder = INBOX_ID.to_string();
        }
        let order = self.sidebar_order();
        self.sidebar_cursor = order
            .iter()
            .position(|id| *id == self.selected_folder)
            .unwrap_or(self.sidebar_cursor.min(order.len().saturating_sub(1)));
        self.interactions.sync_folders(order);
        self.clamp_todo_cursor();
    }

    /// Re-read config.toml after an external edit. A file that no longer
    /// parses leaves the running config untouched.
    pub fn reload_config(&mut self) {
        let Some(dir) = self.data_dir.clone() else {
            return;
        };
        match config_io::read_config(&dir) {
            Ok(config) => {
                let width = self.interactions.sidebar_width();
                self.theme = Theme::from_config(&config.ui);
                self.layout.cells = config.cells;
                self.interactions = Interactions::new(interaction_config(&config));
                self.interactions.set_sidebar_width(width);
                self.config = config;
                self.reload();
                tracing::info!("config reloaded");
            }
            Err(e) => {
                tracing::warn!(error = %e, "config reload failed");
                self.flash(format!("config.toml: {}", e));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Folder ids in sidebar display order.
    pub fn sidebar_order(&self) -> Vec<String> {
        folder_ops::sidebar_sections(&self.folders)
            .into_iter()
            .flat_map(|(_, members)| members.into_iter().map(|f| f.id.clone()))
            .collect()
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn is_searching(&self) -> bool {
        !self.search.buffer.is_empty()
    }

    pub fn visible_todos(&self) -> Vec<&Todo> {
        search::visible_todos(&self.todos, &self.selected_folder, &self.search.buffer)
    }

    pub fn cursor_todo_id(&self) -> Option<u64> {
        self.visible_todos().get(self.todo_cursor).map(|t| t.id)
    }

    pub fn todo_count(&self, folder_id: &str) -> usize {
        self.todos
            .iter()
            .filter(|t| t.folder_id == folder_id && !t.completed)
            .count()
    }

    pub fn sidebar_columns(&self) -> u16 {
        self.config
            .cells
            .px_to_columns(self.interactions.sidebar_width())
            .max(0) as u16
    }

    pub fn quick_find_results(&self) -> QuickFindResults<'_> {
        let term = self.quick_find.as_ref().map_or("", |q| q.input.buffer.as_str());
        search::quick_find(&self.folders, &self.todos, term)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn select_folder(&mut self, id: &str) {
        if self.folder(id).is_none() {
            return;
        }
        self.selected_folder = id.to_string();
        self.search.clear();
        self.todo_cursor = 0;
        self.todo_scroll = 0;
        if let Some(pos) = self.sidebar_order().iter().position(|f| f == id) {
            self.sidebar_cursor = pos;
        }
        tracing::debug!(folder = id, "folder selected");
    }

    /// Keyboard move through the sidebar. Any open swipe row closes first.
    pub fn move_sidebar_cursor(&mut self, delta: isize) {
        let order = self.sidebar_order();
        if order.is_empty() {
            return;
        }
        let next = self.sidebar_cursor.saturating_add_signed(delta).min(order.len() - 1);
        self.sidebar_cursor = next;
        self.interactions.close_swipe();
        let id = &order[next];
        if self.interactions.select_row(id) {
            self.select_folder(id);
        }
    }

    pub fn move_todo_cursor(&mut self, delta: isize) {
        self.todo_cursor = self.todo_cursor.saturating_add_signed(delta);
        self.clamp_todo_cursor();
    }

    fn clamp_todo_cursor(&mut self) {
        let len = self.visible_todos().len();
        self.todo_cursor = self.todo_cursor.min(len.saturating_sub(1));
    }

    /// Keep the todo cursor inside a viewport of `height` rows.
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.todo_cursor < self.todo_scroll {
            self.todo_scroll = self.todo_cursor;
        } else if self.todo_cursor >= self.todo_scroll + height {
            self.todo_scroll = self.todo_cursor + 1 - height;
        }
    }

    pub fn resize_sidebar(&mut self, columns: i32) {
        let cells = self.config.cells;
        let width = self.interactions.sidebar_width() + f64::from(columns) * cells.cell_width;
        self.interactions.set_sidebar_width(width);
    }

    pub fn flash(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    // -----------------------------------------------------------------------
    // Interaction outcomes
    // -----------------------------------------------------------------------

    pub fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::SelectFolder(id) => {
                self.focus = Focus::Sidebar;
                self.select_folder(&id);
            }
            Intent::ConfirmDelete(id) => self.request_delete_folder(&id),
            Intent::RunAction(action) => self.run_fab_action(action),
            Intent::FocusSearch => self.mode = Mode::Search,
            Intent::SidebarResized(_) => {}
        }
    }

    pub fn run_fab_action(&mut self, action: FabAction) {
        tracing::debug!(%action, "fab action");
        match action {
            FabAction::NewTodo => self.begin_input(InputKind::NewTodo),
            FabAction::NewList => self.begin_input(InputKind::NewFolder),
            FabAction::QuickFind => self.open_quick_find(),
        }
    }

    pub fn begin_input(&mut self, kind: InputKind) {
        let initial = match &kind {
            InputKind::EditTodo(id) => self
                .todos
                .iter()
                .find(|t| t.id == *id)
                .map(|t| t.text.clone())
                .unwrap_or_default(),
            InputKind::RenameFolder(id) => self.folder(id).map(|f| f.name.clone()).unwrap_or_default(),
            _ => String::new(),
        };
        self.input = TextInput::with_text(&initial);
        self.mode = Mode::Input(kind);
    }

    pub fn cancel_input(&mut self) {
        self.input.clear();
        self.mode = Mode::Navigate;
    }

    /// Apply the bottom prompt. The prompt closes whether or not the write
    /// succeeds; failures show in the status row.
    pub fn submit_input(&mut self) {
        let Mode::Input(kind) = std::mem::replace(&mut self.mode, Mode::Navigate) else {
            return;
        };
        let text = std::mem::take(&mut self.input).buffer;
        if text.trim().is_empty() {
            return;
        }
        let folders = self.folders.clone();
        match kind {
            InputKind::NewTodo => {
                let folder_id = self.selected_folder.clone();
                if let Some(todo) = self.write(|store| {
                    todo_ops::create_todo(store, &folders, &text, &folder_id, &[])
                }) {
                    self.focus = Focus::Todos;
                    self.search.clear();
                    if let Some(pos) = self.visible_todos().iter().position(|t| t.id == todo.id) {
                        self.todo_cursor = pos;
                    }
                }
            }
            InputKind::NewFolder => {
                if let Some(folder) = self.write(|store| folder_ops::create_folder(store, &text, None)) {
                    self.select_folder(&folder.id);
                }
            }
            InputKind::EditTodo(id) => {
                self.write(|store| todo_ops::edit_text(store, id, &text));
            }
            InputKind::AddTag(id) => {
                self.write(|store| todo_ops::add_tag(store, id, &text));
            }
            InputKind::RemoveTag(id) => {
                self.write(|store| todo_ops::remove_tag(store, id, &text));
            }
            InputKind::MoveTodo(id) => match folder_ops::resolve(&folders, text.trim()) {
                Some(folder) => {
                    let target = folder.id.clone();
                    if self
                        .write(|store| todo_ops::move_todo(store, &folders, id, &target))
                        .is_some()
                    {
                        self.flash(format!("moved to {}", folder.name));
                    }
                }
                None => self.flash(format!("no list named \"{}\"", text.trim())),
            },
            InputKind::RenameFolder(id) => {
                self.write(|store| folder_ops::rename_folder(store, &id, &text));
            }
        }
    }

    pub fn toggle_todo(&mut self, id: u64) {
        self.write(|store| todo_ops::toggle_todo(store, id));
    }

    // -----------------------------------------------------------------------
    // Confirmation
    // -----------------------------------------------------------------------

    pub fn request_delete_folder(&mut self, id: &str) {
        let Some(name) = self.folder(id).map(|f| f.name.clone()) else {
            return;
        };
        if self.config.is_permanent(id) {
            self.flash(format!("{} cannot be deleted", name));
            return;
        }
        let count = self.todos.iter().filter(|t| t.folder_id == id).count();
        let message = match count {
            0 => format!("Delete \"{}\"?", name),
            1 => format!("Delete \"{}\" and its to-do?", name),
            n => format!("Delete \"{}\" and its {} to-dos?", name, n),
        };
        self.confirm = Some(ConfirmState {
            title: "Delete list".into(),
            message,
            action: ConfirmAction::DeleteFolder(id.to_string()),
        });
        self.mode = Mode::Confirm;
    }

    pub fn request_delete_todo(&mut self, id: u64) {
        let Some(message) = self
            .todos
            .iter()
            .find(|t| t.id == id)
            .map(|t| format!("Delete \"{}\"?", t.text))
        else {
            return;
        };
        self.confirm = Some(ConfirmState {
            title: "Delete to-do".into(),
            message,
            action: ConfirmAction::DeleteTodo(id),
        });
        self.mode = Mode::Confirm;
    }

    pub fn confirm_accept(&mut self) {
        self.mode = Mode::Navigate;
        let Some(confirm) = self.confirm.take() else {
            return;
        };
        match confirm.action {
            ConfirmAction::DeleteFolder(id) => {
                let permanent = self.config.permanent_folders.clone();
                let was_selected = self.selected_folder == id;
                if let Some(deleted) =
                    self.write(|store| folder_ops::delete_folder(store, &permanent, &id))
                {
                    if was_selected {
                        self.select_folder(INBOX_ID);
                    }
                    self.flash(format!("deleted {}", deleted.folder.name));
                }
            }
            ConfirmAction::DeleteTodo(id) => {
                self.write(|store| todo_ops::delete_todo(store, id));
            }
        }
    }

    /// Declining leaves everything as it was, including an open swipe row.
    pub fn confirm_decline(&mut self) {
        self.confirm = None;
        self.mode = Mode::Navigate;
    }

    // -----------------------------------------------------------------------
    // Quick find
    // -----------------------------------------------------------------------

    pub fn open_quick_find(&mut self) {
        self.interactions.close_menu();
        self.quick_find = Some(QuickFindState::default());
        self.mode = Mode::QuickFind;
    }

    pub fn close_quick_find(&mut self) {
        self.quick_find = None;
        self.mode = Mode::Navigate;
    }

    /// Jump to the highlighted result.
    pub fn quick_find_pick(&mut self) {
        let cursor = self.quick_find.as_ref().map_or(0, |q| q.cursor);
        let results = self.quick_find_results();
        let pick = if cursor < results.folders.len() {
            results.folders.get(cursor).map(|f| (f.id.clone(), None))
        } else {
            results
                .todos
                .get(cursor - results.folders.len())
                .map(|hit| (hit.todo.folder_id.clone(), Some(hit.todo.id)))
        };
        self.close_quick_find();

        let Some((folder_id, todo_id)) = pick else {
            return;
        };
        self.interactions.close_swipe();
        self.select_folder(&folder_id);
        if let Some(id) = todo_id {
            self.focus = Focus::Todos;
            if let Some(pos) = self.visible_todos().iter().position(|t| t.id == id) {
                self.todo_cursor = pos;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Run a store mutation under the data-dir lock, then reload. Errors are
    /// logged and shown in the status row.
    fn write<T, E, F>(&mut self, op: F) -> Option<T>
    where
        F: FnOnce(&mut dyn KeyValueStore) -> Result<T, E>,
        E: std::fmt::Display,
    {
        let _lock = match self.data_dir.as_deref().map(WriteLock::for_dir).transpose() {
            Ok(lock) => lock,
            Err(e) => {
                self.flash(e.to_string());
                return None;
            }
        };
        let result = op(&mut *self.store);
        self.reload();
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "write failed");
                self.flash(e.to_string());
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // UI state
    // -----------------------------------------------------------------------

    pub fn ui_state(&self) -> UiState {
        UiState {
            selected_folder: Some(self.selected_folder.clone()),
            sidebar_width: Some(self.sidebar_columns()),
            last_search: self.is_searching().then(|| self.search.buffer.clone()),
        }
    }

    pub fn restore_ui_state(&mut self, state: UiState) {
        if let Some(width) = state.sidebar_width {
            let px = self.config.cells.columns_to_px(width);
            self.interactions.set_sidebar_width(px);
        }
        if let Some(id) = state.selected_folder {
            self.select_folder(&id);
        }
        if let Some(term) = state.last_search {
            self.search = TextInput::with_text(&term);
        }
    }
}

fn save_ui_state(app: &App) {
    let Some(dir) = &app.data_dir else {
        return;
    };
    if let Err(e) = write_ui_state(dir, &app.ui_state()) {
        tracing::warn!(error = %e, "could not save ui state");
    }
}

/// Open the data directory and run the TUI until the user quits.
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::read_config(data_dir)?;
    let store = FileStore::new(data_dir);

    let mut app = {
        let _lock = WriteLock::for_store(&store)?;
        App::new(Box::new(store), config, Some(data_dir.to_path_buf()))
    };
    if let Some(state) = read_ui_state(data_dir) {
        app.restore_ui_state(state);
    }

    let watcher = match DataWatcher::start(data_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "file watching disabled");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&DataWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        app.interactions.frame_tick(&app.layout);
        terminal.draw(|frame| render::render(frame, app))?;

        let tick = if app.interactions.is_animating() {
            FRAME_TICK
        } else {
            IDLE_TICK
        };

        // Drain everything that is ready before drawing again
        let mut timeout = tick;
        while event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                    // Debounced state save: every ~5 key presses
                    save_counter += 1;
                    if save_counter >= 5 {
                        save_ui_state(app);
                        save_counter = 0;
                    }
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
            timeout = Duration::ZERO;
        }

        if let Some(watcher) = watcher {
            let events = watcher.poll();
            if !events.is_empty() {
                let config_changed = events.iter().any(|FileEvent::Changed(paths)| {
                    paths
                        .iter()
                        .any(|p| p.file_name().is_some_and(|n| n == config_io::CONFIG_FILE))
                });
                if config_changed {
                    app.reload_config();
                } else {
                    app.reload();
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
