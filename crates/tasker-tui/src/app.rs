use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use tasker_core::calendar::{self, CalendarEvent};
use tasker_core::sort::upcoming;
use tasker_core::{
    Category, CategoryId, CategoryIndex, ConfirmOutcome, Confirmation, DeadlineClass, Field,
    ProfileUpdate, Session, SortKey, Task, TaskId, TaskPayload, TaskerError, UserDraft, UserId,
    ValidationRules,
};
use tasker_service::workflow::CreateOutcome;
use tasker_service::{BlockingHttpService, ServiceError};
use tracing::{info, warn};

use crate::components::calendar::CalendarPanel;
use crate::components::form::FormEvent;
use crate::components::task_board::TaskBoard;
use crate::components::task_form::TaskForm;
use crate::components::task_table::TaskTable;
use crate::components::user_form::{PasswordForm, ProfileForm, UserForm};
use crate::components::user_table::UserTable;
use crate::components::{class_style, logistics, priority_style};
use crate::nav::{self, Navigation, Route};
use crate::store::{AdminStore, TaskStore};

/// Shown under the profile form when the backend reports a taken username.
pub const USERNAME_TAKEN_INLINE: &str = "Username is already taken.";

const UPCOMING_COUNT: usize = 3;

/// What the app is currently doing
#[derive(Debug, Clone)]
pub enum Mode {
    /// Browsing the current route's view
    Normal,
    /// Viewing one task and its category
    TaskDetail {
        task: Task,
        category: Option<Category>,
    },
    /// Editing a task from the user views
    EditTask {
        task: Task,
        previous: Option<CategoryId>,
        form: TaskForm,
    },
    /// Editing any task from the admin console
    AdminEditTask { task: Task, form: TaskForm },
    /// Filling in a new task
    NewTask { form: TaskForm },
    /// Typing a category name on top of the creation form
    NewCategory { form: TaskForm, input: String },
    EditProfile { form: ProfileForm },
    ChangePassword { form: PasswordForm },
    /// Admin create (`user_id` is `None`) or edit of a user
    UserForm {
        user_id: Option<UserId>,
        form: UserForm,
    },
    /// Waiting for yes/no; `back` is restored when the answer is no
    Confirm {
        confirmation: Confirmation<PendingAction>,
        back: Box<Mode>,
    },
    /// Blocking message; any key returns to `back`
    Alert { message: String, back: Box<Mode> },
}

/// A mutation held behind a confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    SaveTask {
        task_id: TaskId,
        payload: TaskPayload,
        previous: Option<CategoryId>,
        category: Option<CategoryId>,
    },
    DeleteTask { task_id: TaskId },
    SaveProfile { update: ProfileUpdate },
    ChangePassword { current: String, new: String },
    CreateUser { draft: UserDraft },
    UpdateUser { user_id: UserId, draft: UserDraft },
    DeleteUser { user_id: UserId },
    AdminSaveTask { task_id: TaskId, payload: TaskPayload },
    AdminDeleteTask { task_id: TaskId },
}

impl PendingAction {
    pub fn op(&self) -> &'static str {
        match self {
            PendingAction::SaveTask { .. } => "save task",
            PendingAction::DeleteTask { .. } => "delete task",
            PendingAction::SaveProfile { .. } => "update profile",
            PendingAction::ChangePassword { .. } => "change password",
            PendingAction::CreateUser { .. } => "create user",
            PendingAction::UpdateUser { .. } => "update user",
            PendingAction::DeleteUser { .. } => "delete user",
            PendingAction::AdminSaveTask { .. } => "admin save task",
            PendingAction::AdminDeleteTask { .. } => "admin delete task",
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            PendingAction::DeleteTask { .. }
                | PendingAction::DeleteUser { .. }
                | PendingAction::AdminDeleteTask { .. }
        )
    }
}

/// Startup options taken from the command line.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub initial_route: Route,
    pub edit_rules: ValidationRules,
    pub today: NaiveDate,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_route: Route::Home,
            edit_rules: ValidationRules::edit(),
            today: Local::now().date_naive(),
        }
    }
}

pub struct App {
    service: BlockingHttpService,
    session: Session,
    route: Route,
    edit_rules: ValidationRules,
    today: NaiveDate,
    tasks: TaskStore,
    admin: AdminStore,
    board: TaskBoard,
    table: TaskTable,
    calendar: CalendarPanel,
    events: Vec<CalendarEvent>,
    admin_menu: ListState,
    users: UserTable,
    admin_tasks: TaskTable,
    mode: Mode,
    status_message: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(service: BlockingHttpService, config: AppConfig) -> Result<Self> {
        let is_admin = service
            .is_admin()
            .with_context(|| format!("failed to reach backend at {}", service.base_url()))?;
        let profile = match service.get_profile() {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(op = "load profile", error = %e, "request failed");
                None
            }
        };
        info!(is_admin, "session loaded");

        let mut admin_menu = ListState::default();
        admin_menu.select(Some(0));

        let mut app = Self {
            service,
            session: Session::new(is_admin, profile),
            route: Route::Home,
            edit_rules: config.edit_rules,
            today: config.today,
            tasks: TaskStore::default(),
            admin: AdminStore::default(),
            board: TaskBoard::new(&[]),
            table: TaskTable::new(true),
            calendar: CalendarPanel::new(config.today),
            events: Vec::new(),
            admin_menu,
            users: UserTable::new(),
            admin_tasks: TaskTable::new(false),
            mode: Mode::Normal,
            status_message: None,
            should_quit: false,
        };
        app.navigate(config.initial_route);
        Ok(app)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn task_store(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn admin_store(&self) -> &AdminStore {
        &self.admin
    }

    pub fn table(&self) -> &TaskTable {
        &self.table
    }

    pub fn calendar(&self) -> &CalendarPanel {
        &self.calendar
    }

    /// Set once the user has logged out; the event loop exits on it.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(
            self.mode,
            Mode::EditTask { .. }
                | Mode::AdminEditTask { .. }
                | Mode::NewTask { .. }
                | Mode::NewCategory { .. }
                | Mode::EditProfile { .. }
                | Mode::ChangePassword { .. }
                | Mode::UserForm { .. }
        )
    }

    /// True while a form or an overlay owns the keyboard, so global keys like `q`
    /// go to the app instead of quitting.
    pub fn is_modal(&self) -> bool {
        self.is_input_mode() || matches!(self.mode, Mode::Confirm { .. } | Mode::Alert { .. })
    }

    // -- Navigation and data loading --

    fn navigate(&mut self, route: Route) {
        let nav = nav::resolve(route, &self.session);
        if let Navigation::Redirected { notice, .. } = nav {
            warn!(route = %route, "{notice}");
            self.status_message = Some(notice.to_string());
        }
        self.route = nav.route();
        self.mode = Mode::Normal;
        self.load_route();
    }

    fn load_route(&mut self) {
        match self.route {
            Route::Root | Route::Home | Route::Table | Route::Calendar => self.refresh_tasks(),
            Route::Settings => self.refresh_profile(),
            Route::AdminTools => {}
            Route::AdminUsers | Route::AdminTasks | Route::AdminLogistics => self.refresh_admin(),
        }
    }

    fn refresh_tasks(&mut self) {
        if let Err(e) = self.tasks.refresh_tasks(&self.service) {
            self.report("list tasks", &e);
        }
        if let Err(e) = self.tasks.refresh_categories(&self.service) {
            self.report("list categories", &e);
        }
        self.sync_task_views();
    }

    fn sync_task_views(&mut self) {
        let selected = self.board.selected_task().map(|t| t.id);
        self.board = TaskBoard::new(self.tasks.tasks());
        if let Some(id) = selected {
            self.board.select_task_by_id(id);
        }
        self.table.set_tasks(self.tasks.tasks());
        self.events = calendar::events_for(self.tasks.tasks(), self.today);
    }

    fn refresh_profile(&mut self) {
        match self.service.get_profile() {
            Ok(user) => self.session.profile = Some(user),
            Err(e) => self.report("load profile", &e),
        }
    }

    fn refresh_admin(&mut self) {
        if let Err(e) = self.admin.refresh(&self.service) {
            self.report("load admin lists", &e);
        }
        self.users.set_users(self.admin.users());
        self.admin_tasks.set_tasks(self.admin.tasks());
    }

    /// Log a failed call and surface it in the status bar. Views keep
    /// whatever they showed before.
    fn report(&mut self, op: &str, e: &ServiceError) {
        warn!(op, error = %e, "request failed");
        self.status_message = Some(format!("{op} failed: {}", e.message()));
    }

    fn logout(&mut self) {
        match self.service.logout() {
            Ok(()) => info!("logged out"),
            Err(e) => warn!(op = "logout", error = %e, "request failed"),
        }
        self.should_quit = true;
    }

    // -- Key handling --

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::TaskDetail { task, category } => self.handle_task_detail(key, task, category),
            Mode::EditTask {
                task,
                previous,
                form,
            } => self.handle_edit_task(key, task, previous, form),
            Mode::AdminEditTask { task, form } => self.handle_admin_edit_task(key, task, form),
            Mode::NewTask { form } => self.handle_new_task(key, form),
            Mode::NewCategory { form, input } => self.handle_new_category(key, form, input),
            Mode::EditProfile { form } => self.handle_edit_profile(key, form),
            Mode::ChangePassword { form } => self.handle_change_password(key, form),
            Mode::UserForm { user_id, form } => self.handle_user_form(key, user_id, form),
            Mode::Confirm { confirmation, back } => self.handle_confirm(key, confirmation, *back),
            // any key dismisses
            Mode::Alert { back, .. } => self.mode = *back,
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('1') => self.navigate(Route::Home),
            KeyCode::Char('2') => self.navigate(Route::Table),
            KeyCode::Char('3') => self.navigate(Route::Calendar),
            KeyCode::Char('4') => self.navigate(Route::Settings),
            KeyCode::Char('5') => self.navigate(Route::AdminTools),
            KeyCode::Char('L') => self.logout(),
            KeyCode::Char('r') => {
                self.load_route();
                if self.status_message.is_none() {
                    self.status_message = Some("Refreshed".into());
                }
            }
            _ => match self.route {
                Route::Root | Route::Home => self.handle_home(key),
                Route::Table => self.handle_table(key),
                Route::Calendar => self.handle_calendar(key),
                Route::Settings => self.handle_settings(key),
                Route::AdminTools => self.handle_admin_tools(key),
                Route::AdminUsers => self.handle_admin_users(key),
                Route::AdminTasks => self.handle_admin_tasks(key),
                Route::AdminLogistics => {
                    if key.code == KeyCode::Esc {
                        self.go_back();
                    }
                }
            },
        }
    }

    fn handle_home(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => self.open_new_task(),
            KeyCode::Enter => {
                if let Some(task) = self.board.selected_task().cloned() {
                    self.open_detail(task);
                }
            }
            KeyCode::Char('s') => {
                if let Some(task) = self.board.selected_task().cloned() {
                    self.toggle_status(&task);
                }
            }
            _ => self.board.handle_key(key),
        }
    }

    fn handle_table(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('t') => self.table.toggle_sort(SortKey::Title),
            KeyCode::Char('p') => self.table.toggle_sort(SortKey::Priority),
            KeyCode::Char('d') => self.table.toggle_sort(SortKey::Deadline),
            KeyCode::Char('n') => self.open_new_task(),
            KeyCode::Char('s') => {
                if let Some(task) = self.table.selected_task().cloned() {
                    self.toggle_status(&task);
                }
            }
            KeyCode::Enter => {
                if let Some(task) = self.table.selected_task().cloned() {
                    self.open_detail(task);
                }
            }
            _ => self.table.handle_key(key),
        }
    }

    fn handle_calendar(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => self.open_new_task(),
            KeyCode::Enter => {
                let task = self
                    .calendar
                    .selected_task_id(&self.events)
                    .and_then(|id| self.tasks.find(id))
                    .cloned();
                match task {
                    Some(task) => self.open_detail(task),
                    None => self.status_message = Some("No task on this day".into()),
                }
            }
            _ => {
                self.calendar.handle_key(key);
            }
        }
    }

    fn handle_settings(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('e') => match &self.session.profile {
                Some(user) => {
                    self.mode = Mode::EditProfile {
                        form: ProfileForm::new(user),
                    };
                }
                None => self.status_message = Some("Profile not loaded; press r to retry".into()),
            },
            KeyCode::Char('p') => {
                self.mode = Mode::ChangePassword {
                    form: PasswordForm::new(),
                };
            }
            _ => {}
        }
    }

    fn handle_admin_tools(&mut self, key: KeyEvent) {
        let last = Route::ADMIN_MENU.len() - 1;
        let current = self.admin_menu.selected().unwrap_or(0);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.admin_menu.select(Some((current + 1).min(last))),
            KeyCode::Char('k') | KeyCode::Up => self.admin_menu.select(Some(current.saturating_sub(1))),
            KeyCode::Enter => {
                if let Some(route) = Route::ADMIN_MENU.get(current) {
                    self.navigate(*route);
                }
            }
            _ => {}
        }
    }

    fn handle_admin_users(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Char('n') => {
                self.mode = Mode::UserForm {
                    user_id: None,
                    form: UserForm::create(),
                };
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(user) = self.users.selected_user() {
                    self.mode = Mode::UserForm {
                        user_id: Some(user.user_id),
                        form: UserForm::edit(user),
                    };
                }
            }
            KeyCode::Char('d') => {
                if let Some(user) = self.users.selected_user() {
                    let message = format!("Delete user \"{}\"?", user.username);
                    let action = PendingAction::DeleteUser {
                        user_id: user.user_id,
                    };
                    self.confirm(message, action, Mode::Normal);
                }
            }
            _ => self.users.handle_key(key),
        }
    }

    fn handle_admin_tasks(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.admin_tasks.selected_task().cloned() {
                    self.mode = Mode::AdminEditTask {
                        form: TaskForm::admin_edit(&task),
                        task,
                    };
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.admin_tasks.selected_task() {
                    let message = format!("Delete \"{}\"?", task.title);
                    let action = PendingAction::AdminDeleteTask { task_id: task.id };
                    self.confirm(message, action, Mode::Normal);
                }
            }
            KeyCode::Char('t') => self.admin_tasks.toggle_sort(SortKey::Title),
            KeyCode::Char('p') => self.admin_tasks.toggle_sort(SortKey::Priority),
            _ => self.admin_tasks.handle_key(key),
        }
    }

    fn go_back(&mut self) {
        if let Some(parent) = self.route.parent() {
            self.navigate(parent);
        }
    }

    fn toggle_status(&mut self, task: &Task) {
        let mut payload = task.to_payload();
        payload.status = payload.status.toggled();
        match self.service.update_task(task.id, &payload) {
            Ok(updated) => {
                info!(task_id = task.id, status = %updated.status, "status toggled");
                self.refresh_tasks();
            }
            Err(e) => self.report("toggle status", &e),
        }
    }

    fn open_detail(&mut self, task: Task) {
        let category = match self.service.category_of_task(task.id) {
            Ok(category) => category,
            // fall back to the batched index so a later save relinks
            Err(e) => {
                self.report("category lookup", &e);
                self.tasks.index().category_for(task.id).cloned()
            }
        };
        self.mode = Mode::TaskDetail { task, category };
    }

    fn open_new_task(&mut self) {
        self.mode = Mode::NewTask {
            form: TaskForm::creation(self.tasks.categories()),
        };
    }

    fn confirm(&mut self, message: String, action: PendingAction, back: Mode) {
        self.mode = Mode::Confirm {
            confirmation: Confirmation::new(message, action),
            back: Box::new(back),
        };
    }

    fn alert(&mut self, error: TaskerError, back: Mode) {
        self.mode = Mode::Alert {
            message: error.to_string(),
            back: Box::new(back),
        };
    }

    fn handle_task_detail(&mut self, key: KeyEvent, task: Task, category: Option<Category>) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Char('e') => {
                let previous = category.as_ref().map(|c| c.id);
                self.mode = Mode::EditTask {
                    form: TaskForm::edit(&task, self.tasks.categories(), previous),
                    task,
                    previous,
                };
            }
            KeyCode::Char('d') => {
                let message = format!("Delete \"{}\"?", task.title);
                let action = PendingAction::DeleteTask { task_id: task.id };
                self.confirm(message, action, Mode::TaskDetail { task, category });
            }
            _ => {}
        }
    }

    fn handle_edit_task(
        &mut self,
        key: KeyEvent,
        task: Task,
        previous: Option<CategoryId>,
        mut form: TaskForm,
    ) {
        match form.handle_key(key) {
            FormEvent::Cancel => self.mode = Mode::Normal,
            FormEvent::Submit => {
                let draft = form.draft();
                let category = draft.category;
                let task_id = task.id;
                let back = Mode::EditTask {
                    task,
                    previous,
                    form,
                };
                match draft.validate(&self.edit_rules) {
                    Ok(payload) => {
                        let message = format!("Save changes to \"{}\"?", payload.title);
                        let action = PendingAction::SaveTask {
                            task_id,
                            payload,
                            previous,
                            category,
                        };
                        self.confirm(message, action, back);
                    }
                    Err(e) => self.alert(e, back),
                }
            }
            FormEvent::Continue | FormEvent::Unhandled(_) => {
                self.mode = Mode::EditTask {
                    task,
                    previous,
                    form,
                };
            }
        }
    }

    fn handle_admin_edit_task(&mut self, key: KeyEvent, task: Task, mut form: TaskForm) {
        match form.handle_key(key) {
            FormEvent::Cancel => self.mode = Mode::Normal,
            FormEvent::Submit => {
                let rules = ValidationRules::new([Field::Title, Field::Status]);
                let draft = form.draft();
                let task_id = task.id;
                let back = Mode::AdminEditTask { task, form };
                match draft.validate(&rules) {
                    Ok(payload) => {
                        let message = format!("Save changes to \"{}\"?", payload.title);
                        self.confirm(message, PendingAction::AdminSaveTask { task_id, payload }, back);
                    }
                    Err(e) => self.alert(e, back),
                }
            }
            FormEvent::Continue | FormEvent::Unhandled(_) => {
                self.mode = Mode::AdminEditTask { task, form };
            }
        }
    }

    fn handle_new_task(&mut self, key: KeyEvent, mut form: TaskForm) {
        match form.handle_key(key) {
            FormEvent::Cancel => self.mode = Mode::Normal,
            FormEvent::Submit => match form.draft().validate(&ValidationRules::creation()) {
                Ok(payload) => {
                    let category = form.category();
                    self.create_task(payload, category);
                }
                Err(e) => self.alert(e, Mode::NewTask { form }),
            },
            FormEvent::Unhandled(k)
                if k.code == KeyCode::Char('n') && k.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.mode = Mode::NewCategory {
                    form,
                    input: String::new(),
                };
            }
            FormEvent::Continue | FormEvent::Unhandled(_) => self.mode = Mode::NewTask { form },
        }
    }

    fn create_task(&mut self, payload: TaskPayload, category: Option<CategoryId>) {
        self.mode = Mode::Normal;
        match self.service.create_task_with_category(&payload, category) {
            Ok(CreateOutcome::Created(task)) => {
                self.refresh_tasks();
                self.board.select_task_by_id(task.id);
                self.status_message = Some("Task created".into());
            }
            Ok(CreateOutcome::CreatedUnlinked { task, error }) => {
                warn!(op = "link category", task_id = task.id, error = %error, "request failed");
                self.refresh_tasks();
                self.board.select_task_by_id(task.id);
                self.status_message =
                    Some(format!("Task created without category: {}", error.message()));
            }
            Err(e) => self.report("create task", &e),
        }
    }

    fn handle_new_category(&mut self, key: KeyEvent, mut form: TaskForm, mut input: String) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::NewTask { form },
            KeyCode::Enter => {
                let name = input.trim();
                if name.is_empty() {
                    self.mode = Mode::NewCategory { form, input };
                    return;
                }
                match self.service.create_category(name) {
                    Ok(category) => {
                        if let Err(e) = self.tasks.refresh_categories(&self.service) {
                            self.report("list categories", &e);
                        }
                        let mut categories = self.tasks.categories().to_vec();
                        if !categories.iter().any(|c| c.id == category.id) {
                            categories.push(category.clone());
                            self.tasks.set_categories(categories.clone());
                        }
                        form.set_categories(&categories, Some(category.id));
                        if self.status_message.is_none() {
                            self.status_message =
                                Some(format!("Category \"{}\" created", category.name.display()));
                        }
                    }
                    Err(e) => self.report("create category", &e),
                }
                self.mode = Mode::NewTask { form };
            }
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::NewCategory { form, input };
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.push(c);
                self.mode = Mode::NewCategory { form, input };
            }
            _ => {}
        }
    }

    fn handle_edit_profile(&mut self, key: KeyEvent, mut form: ProfileForm) {
        match form.handle_key(key) {
            FormEvent::Cancel => self.mode = Mode::Normal,
            FormEvent::Submit => match form.to_update() {
                Ok(update) => {
                    form.set_error(None);
                    self.confirm(
                        "Save changes to your profile?".into(),
                        PendingAction::SaveProfile { update },
                        Mode::EditProfile { form },
                    );
                }
                Err(e) => {
                    form.set_error(Some(e.to_string()));
                    self.mode = Mode::EditProfile { form };
                }
            },
            FormEvent::Continue | FormEvent::Unhandled(_) => self.mode = Mode::EditProfile { form },
        }
    }

    fn handle_change_password(&mut self, key: KeyEvent, mut form: PasswordForm) {
        match form.handle_key(key) {
            FormEvent::Cancel => self.mode = Mode::Normal,
            FormEvent::Submit => {
                let change = form.to_change();
                // mismatches never reach the server
                if let Err(e) = change.validate() {
                    form.set_error(Some(e.to_string()));
                    self.mode = Mode::ChangePassword { form };
                    return;
                }
                form.set_error(None);
                self.confirm(
                    "Change your password?".into(),
                    PendingAction::ChangePassword {
                        current: change.current,
                        new: change.new,
                    },
                    Mode::ChangePassword { form },
                );
            }
            FormEvent::Continue | FormEvent::Unhandled(_) => {
                self.mode = Mode::ChangePassword { form };
            }
        }
    }

    fn handle_user_form(&mut self, key: KeyEvent, user_id: Option<UserId>, mut form: UserForm) {
        match form.handle_key(key) {
            FormEvent::Cancel => self.mode = Mode::Normal,
            FormEvent::Submit => {
                let draft = match form.to_draft() {
                    Ok(draft) => draft,
                    Err(e) => {
                        self.alert(e, Mode::UserForm { user_id, form });
                        return;
                    }
                };
                let back = Mode::UserForm { user_id, form };
                match user_id {
                    Some(user_id) => self.confirm(
                        format!("Save changes to user \"{}\"?", draft.username),
                        PendingAction::UpdateUser { user_id, draft },
                        back,
                    ),
                    None => self.confirm(
                        format!("Create user \"{}\"?", draft.username),
                        PendingAction::CreateUser { draft },
                        back,
                    ),
                }
            }
            FormEvent::Continue | FormEvent::Unhandled(_) => {
                self.mode = Mode::UserForm { user_id, form };
            }
        }
    }

    fn handle_confirm(&mut self, key: KeyEvent, confirmation: Confirmation<PendingAction>, back: Mode) {
        let confirmed = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
        let action = confirmation.action().clone();
        match confirmation.resolve(confirmed, |action| self.execute(action)) {
            ConfirmOutcome::Declined => self.mode = back,
            ConfirmOutcome::Done(message) => {
                info!(op = action.op(), "confirmed action done");
                self.mode = Mode::Normal;
                self.load_route();
                if self.status_message.is_none() {
                    self.status_message = Some(message);
                }
            }
            ConfirmOutcome::Failed(e) => self.recover(action, e, back),
        }
    }

    fn execute(&mut self, action: PendingAction) -> Result<String, ServiceError> {
        match action {
            PendingAction::SaveTask {
                task_id,
                payload,
                previous,
                category,
            } => {
                self.service
                    .save_task_with_category(task_id, &payload, previous, category)?;
                Ok("Task updated".into())
            }
            PendingAction::DeleteTask { task_id } | PendingAction::AdminDeleteTask { task_id } => {
                self.service.delete_task_with_link(task_id)?;
                Ok("Task deleted".into())
            }
            PendingAction::SaveProfile { update } => {
                let user = self.service.update_profile(&update)?;
                self.session.profile = Some(user);
                Ok("User information updated successfully.".into())
            }
            PendingAction::ChangePassword { current, new } => {
                self.service.change_password(&current, &new)?;
                Ok("Password updated successfully.".into())
            }
            PendingAction::CreateUser { draft } => {
                let user = self.service.admin_create_user(&draft)?;
                Ok(format!("User \"{}\" created", user.username))
            }
            PendingAction::UpdateUser { user_id, draft } => {
                let user = self.service.admin_update_user(user_id, &draft)?;
                Ok(format!("User \"{}\" updated", user.username))
            }
            PendingAction::DeleteUser { user_id } => {
                self.service.admin_delete_user(user_id)?;
                Ok("User deleted".into())
            }
            PendingAction::AdminSaveTask { task_id, payload } => {
                self.service.update_task(task_id, &payload)?;
                Ok("Task updated".into())
            }
        }
    }

    /// A confirmed action failed. Profile and password errors go back to
    /// their form inline; everything else lands in the status bar.
    fn recover(&mut self, action: PendingAction, e: ServiceError, back: Mode) {
        match (&action, back) {
            (PendingAction::SaveProfile { .. }, Mode::EditProfile { mut form })
                if e.is_username_conflict() =>
            {
                warn!(op = action.op(), error = %e, "username taken");
                form.set_error(Some(USERNAME_TAKEN_INLINE.into()));
                self.mode = Mode::EditProfile { form };
            }
            (PendingAction::ChangePassword { .. }, Mode::ChangePassword { mut form }) => {
                warn!(op = action.op(), error = %e, "request failed");
                form.set_error(Some(format!("Error updating password: {}", e.message())));
                self.mode = Mode::ChangePassword { form };
            }
            _ => {
                self.mode = Mode::Normal;
                self.load_route();
                self.report(action.op(), &e);
            }
        }
    }

    // -- Rendering --

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        self.render_body(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        self.render_overlay(frame, &self.mode, area);
    }

    fn render_overlay(&self, frame: &mut Frame, mode: &Mode, area: Rect) {
        match mode {
            Mode::Normal => {}
            Mode::TaskDetail { task, category } => {
                self.render_task_detail(frame, task, category.as_ref(), area)
            }
            Mode::EditTask { form, .. }
            | Mode::AdminEditTask { form, .. }
            | Mode::NewTask { form } => form.render(frame, centered_rect(60, 50, area)),
            Mode::NewCategory { form, input } => {
                form.render(frame, centered_rect(60, 50, area));
                self.render_input_bar(frame, " New category ", input, area);
            }
            Mode::EditProfile { form } => form.render(frame, centered_rect(60, 50, area)),
            Mode::ChangePassword { form } => form.render(frame, centered_rect(60, 40, area)),
            Mode::UserForm { form, .. } => form.render(frame, centered_rect(60, 55, area)),
            Mode::Confirm { confirmation, back } => {
                self.render_overlay(frame, back, area);
                self.render_confirm_dialog(frame, confirmation, area);
            }
            Mode::Alert { message, back } => {
                self.render_overlay(frame, back, area);
                self.render_alert(frame, message, area);
            }
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" tasker ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled(self.route.title(), Style::default().fg(Color::Yellow)),
            Span::styled(
                format!(" ({})", self.route.path()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(" | "),
            Span::raw(self.session.greeting()),
        ];
        if self.session.is_admin {
            spans.push(Span::styled(" [admin]", Style::default().fg(Color::Magenta)));
        }
        frame.render_widget(Line::from(spans), area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        match self.route {
            Route::Root | Route::Home => self.render_home(frame, area),
            Route::Table => {
                self.table
                    .render(frame, area, "Tasks", self.tasks.index(), self.today)
            }
            Route::Calendar => self.calendar.render(frame, area, &self.events),
            Route::Settings => self.render_settings(frame, area),
            Route::AdminTools => self.render_admin_menu(frame, area),
            Route::AdminUsers => self.users.render(frame, area),
            Route::AdminTasks => self.admin_tasks.render(
                frame,
                area,
                "All Tasks",
                &CategoryIndex::default(),
                self.today,
            ),
            Route::AdminLogistics => logistics::render(frame, area, self.admin.logistics()),
        }
    }

    fn render_home(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(UPCOMING_COUNT as u16 + 2),
                Constraint::Min(0),
            ])
            .split(area);

        let items: Vec<ListItem> = upcoming(self.tasks.tasks(), UPCOMING_COUNT)
            .into_iter()
            .map(|task| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", task.priority.symbol()),
                        priority_style(task.priority),
                    ),
                    Span::styled(task.title.clone(), class_style(task.classify(self.today))),
                    Span::styled(
                        format!("  due {}", task.deadline_label()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();
        let upcoming_list = List::new(items).block(
            Block::default()
                .title(" Upcoming Tasks ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(upcoming_list, chunks[0]);

        self.board.render(frame, chunks[1], self.today);
    }

    fn render_settings(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" User Settings ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let lines = match &self.session.profile {
            Some(user) => {
                let row = |label: &'static str, value: String| {
                    Line::from(vec![
                        Span::styled(format!("{label:<12}"), Style::default().bold()),
                        Span::raw(value),
                    ])
                };
                vec![
                    row("Username", user.username.clone()),
                    row("First Name", user.first_name.clone().unwrap_or_default()),
                    row("Last Name", user.last_name.clone().unwrap_or_default()),
                    row("Email", user.email.clone()),
                    row(
                        "Age",
                        user.age.map(|a| a.to_string()).unwrap_or_default(),
                    ),
                    row("Role", user.role.as_str().to_string()),
                ]
            }
            None => vec![Line::from(Span::styled(
                "Profile unavailable",
                Style::default().fg(Color::DarkGray),
            ))],
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_admin_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = Route::ADMIN_MENU
            .iter()
            .map(|r| ListItem::new(r.title()))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Admin Tools ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta)),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Magenta).bold())
            .highlight_symbol("> ");
        let mut state = self.admin_menu.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(line, area);
            return;
        }

        let form_hints = vec![
            ("Tab", "next"),
            ("←/→", "choose"),
            ("Enter", "save"),
            ("Esc", "cancel"),
        ];
        let hints = match &self.mode {
            Mode::Normal => {
                let mut hints = match self.route {
                    Route::Root | Route::Home => vec![
                        ("h/l", "cols"),
                        ("j/k", "tasks"),
                        ("Enter", "detail"),
                        ("n", "new"),
                        ("s", "status"),
                    ],
                    Route::Table => vec![
                        ("j/k", "rows"),
                        ("t/p/d", "sort"),
                        ("s", "status"),
                        ("Enter", "detail"),
                        ("n", "new"),
                    ],
                    Route::Calendar => vec![
                        ("[/]", "month"),
                        (".", "today"),
                        ("hjkl", "day"),
                        ("Enter", "detail"),
                        ("n", "new"),
                    ],
                    Route::Settings => vec![("e", "edit profile"), ("p", "password")],
                    Route::AdminTools => vec![("j/k", "nav"), ("Enter", "open")],
                    Route::AdminUsers => vec![
                        ("j/k", "nav"),
                        ("n", "new"),
                        ("e", "edit"),
                        ("d", "del"),
                        ("Esc", "back"),
                    ],
                    Route::AdminTasks => vec![
                        ("j/k", "nav"),
                        ("e", "edit"),
                        ("d", "del"),
                        ("t/p", "sort"),
                        ("Esc", "back"),
                    ],
                    Route::AdminLogistics => vec![("Esc", "back")],
                };
                hints.extend([("1-5", "views"), ("r", "refresh"), ("L", "logout"), ("q", "quit")]);
                hints
            }
            Mode::TaskDetail { .. } => vec![("e", "edit"), ("d", "del"), ("Esc", "back")],
            Mode::NewTask { .. } => {
                let mut hints = form_hints;
                hints.insert(3, ("Ctrl+N", "new category"));
                hints
            }
            Mode::NewCategory { .. } => vec![("Enter", "create"), ("Esc", "cancel")],
            Mode::EditTask { .. }
            | Mode::AdminEditTask { .. }
            | Mode::EditProfile { .. }
            | Mode::ChangePassword { .. }
            | Mode::UserForm { .. } => form_hints,
            Mode::Confirm { .. } => vec![("y", "confirm"), ("any", "cancel")],
            Mode::Alert { .. } => vec![("any", "dismiss")],
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(format!(" {key}"), Style::default().fg(Color::Yellow).bold()),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_input_bar(&self, frame: &mut Frame, label: &str, input: &str, area: Rect) {
        let input_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(3),
            width: area.width,
            height: 3.min(area.height),
        };
        frame.render_widget(Clear, input_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(label);
        let paragraph = Paragraph::new(input).block(block);
        frame.render_widget(paragraph, input_area);
    }

    fn render_task_detail(
        &self,
        frame: &mut Frame,
        task: &Task,
        category: Option<&Category>,
        area: Rect,
    ) {
        let popup = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Task Detail ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let class = task.classify(self.today);
        let deadline = if class == DeadlineClass::Overdue {
            format!("{} (overdue)", task.deadline_label())
        } else {
            task.deadline_label()
        };
        let category_name = category
            .map(|c| c.name.display().to_string())
            .unwrap_or_else(|| tasker_core::category::NO_CATEGORY.to_string());

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Title: ", Style::default().bold()),
                Span::raw(task.title.as_str()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Status: ", Style::default().bold()),
                Span::styled(task.status.display_name(), class_style(class)),
            ]),
            Line::from(vec![
                Span::styled("Priority: ", Style::default().bold()),
                Span::styled(task.priority.display_name(), priority_style(task.priority)),
            ]),
            Line::from(vec![
                Span::styled("Deadline: ", Style::default().bold()),
                Span::styled(deadline, class_style(class)),
            ]),
            Line::from(vec![
                Span::styled("Category: ", Style::default().bold()),
                Span::raw(category_name),
            ]),
            Line::from(""),
        ];
        match task.description.as_deref() {
            Some(desc) if !desc.trim().is_empty() => {
                lines.push(Line::from(Span::styled(
                    "Description:",
                    Style::default().bold(),
                )));
                lines.extend(desc.lines().map(|l| Line::from(l.to_string())));
            }
            _ => lines.push(Line::from(Span::styled(
                "(no description)",
                Style::default().fg(Color::DarkGray),
            ))),
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);
    }

    fn render_confirm_dialog(
        &self,
        frame: &mut Frame,
        confirmation: &Confirmation<PendingAction>,
        area: Rect,
    ) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let (title, color) = if confirmation.action().is_destructive() {
            (" Confirm Delete ", Color::Red)
        } else {
            (" Confirm ", Color::Yellow)
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        let text = format!("{}\n\n(y)es / (any key) cancel", confirmation.message());
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }

    fn render_alert(&self, frame: &mut Frame, message: &str, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Alert ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let text = format!("{message}\n\n(any key) dismiss");
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
