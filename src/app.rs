//! Main application state and event loop.
//!
//! The gallery follows The Elm Architecture (TEA): [`App::update`] folds
//! events into state and [`App::view`] draws it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::events::{Event, KeyBindings, KeyContext};
use crate::ui::{
    render_context_help, theme, Combobox, ComboboxAction, PointerListeners, SearchableSelect,
    SelectAction, SelectOption, SelectionValue, TagInput, TagInputAction, TreeAction, TreeNode,
    TreeView,
};

/// Which control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Single-select combobox.
    #[default]
    Fruit,
    /// Multi-select combobox (controlled by the app).
    Frameworks,
    /// Searchable select.
    Status,
    /// Tag input.
    Labels,
    /// Tree view.
    Files,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::Fruit,
        Focus::Frameworks,
        Focus::Status,
        Focus::Labels,
        Focus::Files,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// The next control in tab order.
    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    /// The previous control in tab order.
    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// The main application struct that holds all state.
pub struct App {
    /// Whether the application should quit.
    should_quit: bool,
    /// Application configuration.
    config: Config,
    /// Outside-click listeners shared by every control.
    listeners: PointerListeners,
    focus: Focus,
    fruit: Combobox,
    frameworks: Combobox,
    /// The app's copy of the controlled multi-select value.
    framework_values: Vec<String>,
    status: SearchableSelect,
    labels: TagInput,
    files: TreeView,
    /// Last committed change, shown above the hint bar.
    status_line: String,
}

impl App {
    /// Create a new application instance from the default config file.
    pub fn new() -> Self {
        let config = Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using default: {}", e);
            Config::default()
        });
        Self::with_config(config)
    }

    /// Create a new application instance with the given configuration.
    pub fn with_config(config: Config) -> Self {
        debug!(?config, "Creating application");
        let listeners = PointerListeners::new();

        let mut fruit = Combobox::new("Fruit", &listeners);
        fruit.set_options(vec![
            SelectOption::new("apple", "Apple").with_icon("🍎"),
            SelectOption::new("banana", "Banana"),
            SelectOption::new("cherry", "Cherry").with_description("seasonal"),
            SelectOption::new("durian", "Durian").with_disabled(true),
            SelectOption::new("elderberry", "Elderberry"),
            SelectOption::new("fig", "Fig"),
        ]);
        fruit.set_clearable(true);

        let mut frameworks = Combobox::new("Frameworks", &listeners);
        frameworks.set_multiple(true);
        frameworks.set_options(vec![
            SelectOption::new("ratatui", "Ratatui"),
            SelectOption::new("cursive", "Cursive"),
            SelectOption::new("egui", "egui"),
            SelectOption::new("iced", "Iced"),
            SelectOption::new("slint", "Slint"),
        ]);
        frameworks.set_value(Some(SelectionValue::Multiple(Vec::new())));

        let mut status = SearchableSelect::new("Status", &listeners);
        status.set_options(vec![
            SelectOption::new("todo", "To Do"),
            SelectOption::new("in_progress", "In Progress"),
            SelectOption::new("review", "In Review"),
            SelectOption::new("done", "Done"),
        ]);

        let mut labels = TagInput::new("Labels", &listeners);
        labels.set_options(vec![
            SelectOption::new("bug", "bug"),
            SelectOption::new("feature", "feature"),
            SelectOption::new("docs", "docs"),
            SelectOption::new("performance", "performance"),
        ]);
        labels.set_allow_create(true);

        let mut files = TreeView::new("Files");
        files.set_nodes(vec![
            TreeNode::new("src", "src").with_icon("📁").with_children(vec![
                TreeNode::new("src/ui", "ui").with_icon("📁").with_children(vec![
                    TreeNode::new("src/ui/combobox.rs", "combobox.rs"),
                    TreeNode::new("src/ui/tree_view.rs", "tree_view.rs"),
                ]),
                TreeNode::new("src/main.rs", "main.rs"),
                TreeNode::new("src/lib.rs", "lib.rs"),
            ]),
            TreeNode::new("Cargo.toml", "Cargo.toml"),
            TreeNode::new("Cargo.lock", "Cargo.lock").with_disabled(true),
            TreeNode::new("README.md", "README.md"),
        ]);
        files.set_multi_select(true);

        let mut app = Self {
            should_quit: false,
            config,
            listeners,
            focus: Focus::default(),
            fruit,
            frameworks,
            framework_values: Vec::new(),
            status,
            labels,
            files,
            status_line: String::new(),
        };
        app.apply_settings();
        app
    }

    /// Push the configured texts and key bindings into every control.
    fn apply_settings(&mut self) {
        let settings = &self.config.settings;
        let bindings = KeyBindings::new(settings.vim_mode);

        for combobox in [&mut self.fruit, &mut self.frameworks] {
            combobox.set_placeholder(settings.placeholder.clone());
            combobox.set_search_placeholder(settings.search_placeholder.clone());
            combobox.set_empty_text(settings.empty_text.clone());
            combobox.set_max_visible(settings.max_visible_options);
            combobox.set_key_bindings(bindings);
        }

        self.status.set_placeholder(settings.placeholder.clone());
        self.status.set_search_placeholder(settings.search_placeholder.clone());
        self.status.set_empty_text(settings.empty_text.clone());
        self.status.set_max_visible(settings.max_visible_options);
        self.status.set_key_bindings(bindings);

        self.labels.set_empty_text(settings.empty_text.clone());
        self.labels.set_max_visible(settings.max_visible_options);
        self.labels.set_key_bindings(bindings);

        self.files.set_key_bindings(bindings);
    }

    /// Returns true if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Get the application configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The focused control.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// The last committed change.
    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    /// The app-held value of the multi-select combobox.
    pub fn framework_values(&self) -> &[String] {
        &self.framework_values
    }

    pub fn fruit(&self) -> &Combobox {
        &self.fruit
    }

    pub fn frameworks(&self) -> &Combobox {
        &self.frameworks
    }

    pub fn status(&self) -> &SearchableSelect {
        &self.status
    }

    pub fn labels(&self) -> &TagInput {
        &self.labels
    }

    pub fn files(&self) -> &TreeView {
        &self.files
    }

    /// Number of outside-click listeners currently installed.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn focused_is_open(&self) -> bool {
        match self.focus {
            Focus::Fruit => self.fruit.is_open(),
            Focus::Frameworks => self.frameworks.is_open(),
            Focus::Status => self.status.is_open(),
            Focus::Labels => self.labels.is_open(),
            Focus::Files => false,
        }
    }

    fn key_context(&self) -> KeyContext {
        if self.focused_is_open() {
            return KeyContext::Panel;
        }
        match self.focus {
            Focus::Labels => KeyContext::TagInput,
            Focus::Files => KeyContext::Tree,
            _ => KeyContext::Trigger,
        }
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Quit => {
                info!("Quit event received");
                self.should_quit = true;
            }
            Event::Key(key_event) => {
                trace!(key = ?key_event.code, modifiers = ?key_event.modifiers, "Key event");
                self.handle_key_event(key_event);
            }
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
                info!("Quit requested");
                self.should_quit = true;
                return;
            }
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
                // An open panel sees the Tab first so it can dismiss itself.
                if self.focused_is_open() {
                    self.forward_key(key);
                }
                self.focus = if key.code == KeyCode::BackTab {
                    self.focus.prev()
                } else {
                    self.focus.next()
                };
                debug!(focus = ?self.focus, "Focus moved");
                return;
            }
            _ => {}
        }
        self.forward_key(key);
    }

    fn forward_key(&mut self, key: KeyEvent) {
        match self.focus {
            Focus::Fruit => {
                let action = self.fruit.handle_input(key);
                self.on_fruit(action);
            }
            Focus::Frameworks => {
                let action = self.frameworks.handle_input(key);
                self.on_frameworks(action);
            }
            Focus::Status => {
                let action = self.status.handle_input(key);
                self.on_status(action);
            }
            Focus::Labels => {
                let action = self.labels.handle_input(key);
                self.on_labels(action);
            }
            Focus::Files => {
                let action = self.files.handle_input(key);
                self.on_files(action);
            }
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        // Outside-click dismissal runs before the click is routed.
        let notified = self.listeners.dispatch(&mouse);
        if notified > 0 {
            let dismissed = [
                self.fruit.poll_dismissal(),
                self.frameworks.poll_dismissal(),
                self.status.poll_dismissal(),
                self.labels.poll_dismissal(),
            ];
            trace!(?dismissed, "Outside click");
        }

        let position = Position::new(mouse.column, mouse.row);
        if self.fruit.contains(position) {
            self.focus = Focus::Fruit;
            let action = self.fruit.handle_mouse(mouse);
            self.on_fruit(action);
        } else if self.frameworks.contains(position) {
            self.focus = Focus::Frameworks;
            let action = self.frameworks.handle_mouse(mouse);
            self.on_frameworks(action);
        } else if self.status.contains(position) {
            self.focus = Focus::Status;
            let action = self.status.handle_mouse(mouse);
            self.on_status(action);
        } else if self.labels.contains(position) {
            self.focus = Focus::Labels;
            let action = self.labels.handle_mouse(mouse);
            self.on_labels(action);
        } else if self.files.contains(position) {
            self.focus = Focus::Files;
            let action = self.files.handle_mouse(mouse);
            self.on_files(action);
        }
    }

    fn on_fruit(&mut self, action: Option<ComboboxAction>) {
        if let Some(ComboboxAction::Change(value)) = action {
            info!(?value, "Fruit changed");
            self.status_line = match value.as_slice().first() {
                Some(v) => format!("Fruit: {}", v),
                None => "Fruit cleared".to_string(),
            };
        }
    }

    fn on_frameworks(&mut self, action: Option<ComboboxAction>) {
        if let Some(ComboboxAction::Change(value)) = action {
            info!(?value, "Frameworks changed");
            // Controlled: nothing changes on screen until the value comes back.
            self.framework_values = value.as_slice().to_vec();
            self.frameworks
                .set_value(Some(SelectionValue::Multiple(self.framework_values.clone())));
            self.status_line = format!("Frameworks: [{}]", self.framework_values.join(", "));
        }
    }

    fn on_status(&mut self, action: Option<SelectAction>) {
        if let Some(SelectAction::Change(value)) = action {
            info!(?value, "Status changed");
            self.status_line = format!("Status: {}", value.as_deref().unwrap_or("none"));
        }
    }

    fn on_labels(&mut self, action: Option<TagInputAction>) {
        match action {
            Some(TagInputAction::Change(tags)) => {
                info!(?tags, "Labels changed");
                self.status_line = format!("Labels: [{}]", tags.join(", "));
            }
            Some(TagInputAction::Create { tag, tags }) => {
                info!(%tag, "Label created");
                self.status_line = format!("Created label \"{}\"; labels: [{}]", tag, tags.join(", "));
            }
            Some(TagInputAction::Cancel) | Some(TagInputAction::Dismiss) | None => {}
        }
    }

    fn on_files(&mut self, action: Option<TreeAction>) {
        match action {
            Some(TreeAction::Change(ids)) => {
                info!(?ids, "File selection changed");
                self.status_line = format!("Files: [{}]", ids.join(", "));
            }
            Some(TreeAction::Expand(id)) => debug!(%id, "Expanded"),
            Some(TreeAction::Collapse(id)) => debug!(%id, "Collapsed"),
            None => {}
        }
    }

    /// Render the application UI.
    pub fn view(&mut self, frame: &mut Frame) {
        let screen = frame.area();
        let t = theme();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(1),    // Controls
                Constraint::Length(1), // Status line
                Constraint::Length(1), // Hints
            ])
            .split(screen);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("selectkit", Style::default().fg(t.accent).add_modifier(Modifier::BOLD)),
            Span::styled(" gallery", Style::default().fg(t.muted)),
        ]));
        frame.render_widget(header, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(columns[0]);

        self.fruit.render(frame, left[0], self.focus == Focus::Fruit);
        self.frameworks.render(frame, left[1], self.focus == Focus::Frameworks);
        self.status.render(frame, left[2], self.focus == Focus::Status);
        self.labels.render(frame, left[3], self.focus == Focus::Labels);
        self.files.render(frame, columns[1], self.focus == Focus::Files);

        self.render_status(frame, rows[2]);
        render_context_help(frame, rows[3], self.key_context());

        // Panels go last so they draw over the other controls.
        self.fruit.render_panel(frame, screen);
        self.frameworks.render_panel(frame, screen);
        self.status.render_panel(frame, screen);
        self.labels.render_panel(frame, screen);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let text = if self.status_line.is_empty() {
            "Nothing selected yet"
        } else {
            self.status_line.as_str()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text.to_string(), Style::default().fg(t.fg))),
            area,
        );
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
