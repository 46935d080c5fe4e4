//! State machine tests for the TUI App.
//!
//! Each test spawns an in-memory backend on a separate thread (to avoid nested tokio runtime
//! panics), creates a BlockingHttpService, builds an App, and simulates key events to test mode
//! transitions.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tasker_core::{Priority, Role, SortDirection, SortKey, Status, TaskId, TaskPayload, ValidationRules};
use tasker_service::BlockingHttpService;
use tasker_testkit::{spawn_detached, AppState};
use tasker_tui::app::{App, AppConfig, Mode, USERNAME_TAKEN_INLINE};
use tasker_tui::nav::Route;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        app.handle_key(char_key(c));
    }
}

fn config(route: Route) -> AppConfig {
    AppConfig {
        initial_route: route,
        edit_rules: ValidationRules::edit(),
        today: today(),
    }
}

fn start(base_url: &str, route: Route) -> App {
    let svc = BlockingHttpService::new(base_url).unwrap();
    App::new(svc, config(route)).unwrap()
}

fn make_app() -> (App, AppState) {
    let server = spawn_detached();
    let app = start(&server.base_url, Route::Home);
    (app, server.state)
}

fn payload(title: &str, deadline: Option<NaiveDate>) -> TaskPayload {
    TaskPayload {
        title: title.into(),
        description: Some("A test description".into()),
        status: Status::Todo,
        priority: Priority::Medium,
        deadline,
    }
}

/// Create an app with one categorised task already stored, returning
/// (app, state, task_id, category_id).
fn make_app_with_task() -> (App, AppState, TaskId, i64) {
    let server = spawn_detached();
    let task = server
        .state
        .seed_task(payload("Test Task", NaiveDate::from_ymd_opt(2024, 6, 20)));
    let category = server.state.seed_category("Work");
    server.state.seed_link(task.id, category.id);
    let app = start(&server.base_url, Route::Home);
    (app, server.state, task.id, category.id)
}

fn make_admin_app(route: Route) -> (App, AppState) {
    let server = spawn_detached();
    server.state.set_admin(true);
    let app = start(&server.base_url, route);
    (app, server.state)
}

/// Open the creation form and fill in a title and deadline.
fn fill_new_task(app: &mut App, title: &str) {
    app.handle_key(char_key('n'));
    type_str(app, title);
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Tab));
    type_str(app, "2024-06-20");
}

// ---- Startup and navigation ----

#[test]
fn app_starts_normal_on_home() {
    let (app, _state) = make_app();
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.route(), Route::Home);
    assert!(!app.is_input_mode());
    assert!(!app.session().is_admin);
    assert_eq!(app.session().greeting(), "Welcome, Jane Doe");
}

#[test]
fn number_keys_switch_routes() {
    let (mut app, _state) = make_app();
    app.handle_key(char_key('2'));
    assert_eq!(app.route(), Route::Table);
    app.handle_key(char_key('3'));
    assert_eq!(app.route(), Route::Calendar);
    app.handle_key(char_key('4'));
    assert_eq!(app.route(), Route::Settings);
    app.handle_key(char_key('1'));
    assert_eq!(app.route(), Route::Home);
}

#[test]
fn admin_route_redirects_non_admin() {
    let (mut app, _state) = make_app();
    app.handle_key(char_key('5'));
    assert_eq!(app.route(), Route::Home);
    assert_eq!(app.status_message(), Some("Admin access required"));
}

#[test]
fn initial_admin_route_redirects_non_admin() {
    let server = spawn_detached();
    let app = start(&server.base_url, Route::AdminUsers);
    assert_eq!(app.route(), Route::Home);
    assert_eq!(app.status_message(), Some("Admin access required"));
}

#[test]
fn root_lands_on_home() {
    let server = spawn_detached();
    let app = start(&server.base_url, Route::Root);
    assert_eq!(app.route(), Route::Home);
    assert_eq!(app.status_message(), None);
}

#[test]
fn logout_quits_and_reaches_backend() {
    let (mut app, state) = make_app();
    app.handle_key(char_key('L'));
    assert!(app.should_quit());
    assert!(state.logged_out());
}

// ---- Task creation ----

#[test]
fn new_task_opens_and_cancels() {
    let (mut app, _state) = make_app();
    app.handle_key(char_key('n'));
    assert!(matches!(app.mode(), Mode::NewTask { .. }));
    assert!(app.is_input_mode());
    app.handle_key(key(KeyCode::Esc));
    assert!(matches!(app.mode(), Mode::Normal));
}

#[test]
fn new_task_blank_submit_alerts() {
    let (mut app, state) = make_app();
    app.handle_key(char_key('n'));
    app.handle_key(key(KeyCode::Enter));
    match app.mode() {
        Mode::Alert { message, .. } => {
            assert_eq!(message, "Please fill in all required fields.")
        }
        other => panic!("expected alert, got {other:?}"),
    }
    // any key goes back to the form
    app.handle_key(char_key('x'));
    assert!(matches!(app.mode(), Mode::NewTask { .. }));
    assert_eq!(state.task_count(), 0);
}

#[test]
fn new_task_bad_deadline_alerts() {
    let (mut app, state) = make_app();
    app.handle_key(char_key('n'));
    type_str(&mut app, "Buy milk");
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "soon");
    app.handle_key(key(KeyCode::Enter));
    match app.mode() {
        Mode::Alert { message, .. } => assert!(message.contains("YYYY-MM-DD")),
        other => panic!("expected alert, got {other:?}"),
    }
    assert_eq!(state.task_count(), 0);
}

#[test]
fn new_task_creates() {
    let (mut app, state) = make_app();
    fill_new_task(&mut app, "Buy milk");
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.status_message(), Some("Task created"));
    assert_eq!(state.task_count(), 1);
    assert_eq!(app.task_store().tasks().len(), 1);
    assert_eq!(app.task_store().tasks()[0].title, "Buy milk");
    assert_eq!(app.task_store().tasks()[0].status, Status::Todo);
}

#[test]
fn new_task_links_preselected_category() {
    let server = spawn_detached();
    let category = server.state.seed_category("Work");
    let mut app = start(&server.base_url, Route::Home);

    fill_new_task(&mut app, "Report");
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(server.state.link_count(), 1);
    let task_id = app.task_store().tasks()[0].id;
    assert_eq!(app.task_store().category_id_of(task_id), Some(category.id));
}

#[test]
fn new_task_survives_link_failure() {
    let server = spawn_detached();
    server.state.seed_category("Work");
    server.state.fail_linking(true);
    let mut app = start(&server.base_url, Route::Home);

    fill_new_task(&mut app, "Report");
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(server.state.task_count(), 1);
    assert_eq!(server.state.link_count(), 0);
    let msg = app.status_message().unwrap();
    assert!(msg.starts_with("Task created without category"), "{msg}");
}

#[test]
fn ctrl_n_creates_category_inline() {
    let (mut app, state) = make_app();
    app.handle_key(char_key('n'));
    app.handle_key(ctrl('n'));
    assert!(matches!(app.mode(), Mode::NewCategory { .. }));
    assert!(app.is_input_mode());

    type_str(&mut app, "Errands");
    app.handle_key(key(KeyCode::Enter));

    let created = state.lock().list_categories();
    assert_eq!(created.len(), 1);
    match app.mode() {
        Mode::NewTask { form } => assert_eq!(form.category(), Some(created[0].id)),
        other => panic!("expected new task form, got {other:?}"),
    }
    assert_eq!(app.task_store().categories().len(), 1);
}

#[test]
fn category_input_esc_keeps_form() {
    let (mut app, state) = make_app();
    app.handle_key(char_key('n'));
    type_str(&mut app, "Half typed");
    app.handle_key(ctrl('n'));
    type_str(&mut app, "Nope");
    app.handle_key(key(KeyCode::Esc));
    match app.mode() {
        Mode::NewTask { form } => assert_eq!(form.draft().title, "Half typed"),
        other => panic!("expected new task form, got {other:?}"),
    }
    assert!(state.lock().list_categories().is_empty());
}

// ---- Detail, edit, delete ----

#[test]
fn enter_opens_detail_with_category() {
    let (mut app, _state, task_id, category_id) = make_app_with_task();
    app.handle_key(key(KeyCode::Enter));
    match app.mode() {
        Mode::TaskDetail { task, category } => {
            assert_eq!(task.id, task_id);
            assert_eq!(category.as_ref().map(|c| c.id), Some(category_id));
        }
        other => panic!("expected detail, got {other:?}"),
    }
    app.handle_key(key(KeyCode::Esc));
    assert!(matches!(app.mode(), Mode::Normal));
}

#[test]
fn edit_requires_confirmation() {
    let (mut app, _state, _task_id, category_id) = make_app_with_task();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('e'));
    match app.mode() {
        Mode::EditTask { previous, .. } => assert_eq!(*previous, Some(category_id)),
        other => panic!("expected edit, got {other:?}"),
    }
    assert!(app.is_input_mode());

    type_str(&mut app, "!");
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Confirm { .. }));

    // declining goes back to the form with edits intact
    app.handle_key(char_key('n'));
    match app.mode() {
        Mode::EditTask { form, .. } => assert_eq!(form.draft().title, "Test Task!"),
        other => panic!("expected edit, got {other:?}"),
    }
    assert_eq!(app.task_store().tasks()[0].title, "Test Task");

    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('y'));
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.status_message(), Some("Task updated"));
    assert_eq!(app.task_store().tasks()[0].title, "Test Task!");
}

#[test]
fn failed_category_lookup_keeps_indexed_category() {
    let (mut app, state, _task_id, category_id) = make_app_with_task();
    state.fail_category_lookup(true);
    app.handle_key(key(KeyCode::Enter));
    match app.mode() {
        Mode::TaskDetail { category, .. } => {
            assert_eq!(category.as_ref().map(|c| c.id), Some(category_id))
        }
        other => panic!("expected detail, got {other:?}"),
    }
    assert!(app
        .status_message()
        .is_some_and(|m| m.starts_with("category lookup failed")));

    app.handle_key(char_key('e'));
    match app.mode() {
        Mode::EditTask { previous, .. } => assert_eq!(*previous, Some(category_id)),
        other => panic!("expected edit, got {other:?}"),
    }
    type_str(&mut app, "!");
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('y'));
    assert_eq!(app.status_message(), Some("Task updated"));
    assert_eq!(state.link_count(), 1);
}

#[test]
fn q_answers_overlays_instead_of_quitting() {
    let (mut app, _state, _task_id, _category_id) = make_app_with_task();
    assert!(!app.is_modal());

    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('d'));
    assert!(matches!(app.mode(), Mode::Confirm { .. }));
    assert!(app.is_modal());
    app.handle_key(char_key('q'));
    assert!(matches!(app.mode(), Mode::TaskDetail { .. }));
    assert!(!app.should_quit());

    app.handle_key(char_key('e'));
    assert!(app.is_modal());
    for _ in 0.."Test Task".len() {
        app.handle_key(key(KeyCode::Backspace));
    }
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Alert { .. }));
    assert!(app.is_modal());
    app.handle_key(char_key('q'));
    assert!(matches!(app.mode(), Mode::EditTask { .. }));
    assert!(!app.should_quit());
}

#[test]
fn edit_empty_title_alerts() {
    let (mut app, _state, _task_id, _category_id) = make_app_with_task();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('e'));
    for _ in 0.."Test Task".len() {
        app.handle_key(key(KeyCode::Backspace));
    }
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Alert { .. }));
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::EditTask { .. }));
}

#[test]
fn delete_from_detail() {
    let (mut app, state, _task_id, _category_id) = make_app_with_task();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('d'));
    assert!(matches!(app.mode(), Mode::Confirm { .. }));

    // anything but y cancels back to the detail view
    app.handle_key(char_key('x'));
    assert!(matches!(app.mode(), Mode::TaskDetail { .. }));
    assert_eq!(state.task_count(), 1);

    app.handle_key(char_key('d'));
    app.handle_key(char_key('y'));
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.status_message(), Some("Task deleted"));
    assert_eq!(state.task_count(), 0);
    assert_eq!(state.link_count(), 0);
    assert!(app.task_store().tasks().is_empty());
}

#[test]
fn s_toggles_status_on_board() {
    let (mut app, _state, task_id, _category_id) = make_app_with_task();
    app.handle_key(char_key('s'));
    let task = app.task_store().find(task_id).unwrap();
    assert_eq!(task.status, Status::Completed);

    app.handle_key(char_key('s'));
    let task = app.task_store().find(task_id).unwrap();
    assert_eq!(task.status, Status::Todo);
}

// ---- Table and calendar ----

#[test]
fn table_sort_keys_toggle() {
    let server = spawn_detached();
    server
        .state
        .seed_task(payload("b", NaiveDate::from_ymd_opt(2024, 6, 1)));
    server
        .state
        .seed_task(payload("a", NaiveDate::from_ymd_opt(2024, 7, 1)));
    let mut app = start(&server.base_url, Route::Table);

    app.handle_key(char_key('t'));
    assert_eq!(app.table().sort().key(), Some(SortKey::Title));
    assert_eq!(app.table().rows()[0].title, "a");

    app.handle_key(char_key('t'));
    assert_eq!(app.table().sort().direction(), Some(SortDirection::Descending));
    assert_eq!(app.table().rows()[0].title, "b");

    app.handle_key(char_key('d'));
    assert_eq!(app.table().sort().key(), Some(SortKey::Deadline));
    assert_eq!(app.table().rows()[0].title, "b");

    app.handle_key(char_key('p'));
    assert_eq!(app.table().sort().key(), Some(SortKey::Priority));
}

#[test]
fn calendar_enter_opens_task_due_that_day() {
    let server = spawn_detached();
    let task = server.state.seed_task(payload("Due today", Some(today())));
    let mut app = start(&server.base_url, Route::Calendar);

    assert_eq!(app.calendar().selected_day(), today());
    app.handle_key(key(KeyCode::Enter));
    match app.mode() {
        Mode::TaskDetail { task: shown, .. } => assert_eq!(shown.id, task.id),
        other => panic!("expected detail, got {other:?}"),
    }
}

#[test]
fn calendar_enter_on_empty_day() {
    let (mut app, _state) = make_app();
    app.handle_key(char_key('3'));
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.status_message(), Some("No task on this day"));
}

// ---- Settings ----

#[test]
fn profile_save_succeeds() {
    let (mut app, _state) = make_app();
    app.handle_key(char_key('4'));
    app.handle_key(char_key('e'));
    assert!(matches!(app.mode(), Mode::EditProfile { .. }));
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Confirm { .. }));
    app.handle_key(char_key('y'));
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(
        app.status_message(),
        Some("User information updated successfully.")
    );
}

#[test]
fn profile_username_conflict_is_inline() {
    let (mut app, state) = make_app();
    state.seed_user("taken", Some(33), Role::User);
    app.handle_key(char_key('4'));
    app.handle_key(char_key('e'));
    for _ in 0.."jdoe".len() {
        app.handle_key(key(KeyCode::Backspace));
    }
    type_str(&mut app, "taken");
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('y'));

    match app.mode() {
        Mode::EditProfile { form } => assert_eq!(form.error(), Some(USERNAME_TAKEN_INLINE)),
        other => panic!("expected profile form, got {other:?}"),
    }
    assert_eq!(app.session().profile.as_ref().unwrap().username, "jdoe");
}

#[test]
fn password_mismatch_never_reaches_backend() {
    let (mut app, state) = make_app();
    app.handle_key(char_key('4'));
    app.handle_key(char_key('p'));
    assert!(matches!(app.mode(), Mode::ChangePassword { .. }));

    type_str(&mut app, "secret");
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "one");
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "two");
    app.handle_key(key(KeyCode::Enter));

    match app.mode() {
        Mode::ChangePassword { form } => assert_eq!(
            form.error(),
            Some("New password and confirm password do not match.")
        ),
        other => panic!("expected password form, got {other:?}"),
    }
    assert_eq!(state.password(), "secret");
}

#[test]
fn wrong_current_password_is_inline() {
    let (mut app, state) = make_app();
    app.handle_key(char_key('4'));
    app.handle_key(char_key('p'));
    type_str(&mut app, "wrong");
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "n1");
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "n1");
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('y'));

    match app.mode() {
        Mode::ChangePassword { form } => {
            assert!(form.error().unwrap().starts_with("Error updating password:"))
        }
        other => panic!("expected password form, got {other:?}"),
    }
    assert_eq!(state.password(), "secret");
}

#[test]
fn password_change_succeeds() {
    let (mut app, state) = make_app();
    app.handle_key(char_key('4'));
    app.handle_key(char_key('p'));
    type_str(&mut app, "secret");
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "n1");
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "n1");
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('y'));

    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.status_message(), Some("Password updated successfully."));
    assert_eq!(state.password(), "n1");
}

// ---- Admin console ----

#[test]
fn admin_menu_navigates() {
    let (mut app, _state) = make_admin_app(Route::Home);
    assert!(app.session().is_admin);
    app.handle_key(char_key('5'));
    assert_eq!(app.route(), Route::AdminTools);
    app.handle_key(char_key('j'));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.route(), Route::AdminTasks);
    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.route(), Route::AdminTools);
}

#[test]
fn esc_returns_every_admin_page_to_the_menu() {
    for route in Route::ADMIN_MENU {
        let (mut app, _state) = make_admin_app(*route);
        assert_eq!(app.route(), *route);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.route(), Route::AdminTools);
    }
}

#[test]
fn admin_creates_user() {
    let (mut app, _state) = make_admin_app(Route::AdminUsers);
    assert_eq!(app.admin_store().users().len(), 1);

    app.handle_key(char_key('n'));
    assert!(matches!(app.mode(), Mode::UserForm { user_id: None, .. }));
    type_str(&mut app, "kim");
    // Email, Age, First, Last, Role, Password
    for _ in 0..6 {
        app.handle_key(key(KeyCode::Tab));
    }
    type_str(&mut app, "pw");
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Confirm { .. }));
    app.handle_key(char_key('y'));

    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.status_message(), Some("User \"kim\" created"));
    assert_eq!(app.admin_store().users().len(), 2);
}

#[test]
fn admin_duplicate_user_reports_conflict() {
    let (mut app, _state) = make_admin_app(Route::AdminUsers);
    app.handle_key(char_key('n'));
    type_str(&mut app, "jdoe");
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('y'));

    assert!(matches!(app.mode(), Mode::Normal));
    let msg = app.status_message().unwrap();
    assert!(msg.starts_with("create user failed"), "{msg}");
    assert_eq!(app.admin_store().users().len(), 1);
}

#[test]
fn admin_bad_age_alerts() {
    let (mut app, _state) = make_admin_app(Route::AdminUsers);
    app.handle_key(char_key('e'));
    assert!(matches!(app.mode(), Mode::UserForm { user_id: Some(_), .. }));
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "x");
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Alert { .. }));
}

#[test]
fn admin_edits_and_deletes_tasks() {
    let server = spawn_detached();
    server.state.set_admin(true);
    server.state.seed_task(payload("Shared", None));
    let mut app = start(&server.base_url, Route::AdminTasks);
    assert_eq!(app.admin_store().tasks().len(), 1);

    app.handle_key(char_key('e'));
    assert!(matches!(app.mode(), Mode::AdminEditTask { .. }));
    type_str(&mut app, "d");
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('y'));
    assert_eq!(app.status_message(), Some("Task updated"));
    assert_eq!(app.admin_store().tasks()[0].title, "Sharedd");

    app.handle_key(char_key('d'));
    app.handle_key(char_key('y'));
    assert_eq!(app.status_message(), Some("Task deleted"));
    assert_eq!(server.state.task_count(), 0);
}

#[test]
fn admin_logistics_loads() {
    let server = spawn_detached();
    server.state.set_admin(true);
    server.state.seed_task(payload("one", None));
    let mut done = payload("two", None);
    done.status = Status::Completed;
    server.state.seed_task(done);
    let app = start(&server.base_url, Route::AdminLogistics);

    let stats = &app.admin_store().logistics().task_statistics;
    assert_eq!(stats.total_tasks, 2);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(app.admin_store().logistics().completion_rate_label(), "50.00%");
}

// ---- Render smoke tests ----

fn draw(app: &App) {
    let backend = ratatui::backend::TestBackend::new(120, 40);
    let mut terminal = ratatui::Terminal::new(backend).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
}

#[test]
fn render_every_user_route() {
    let (mut app, _state, _task_id, _category_id) = make_app_with_task();
    for c in ['1', '2', '3', '4'] {
        app.handle_key(char_key(c));
        draw(&app);
    }
}

#[test]
fn render_admin_routes() {
    let (mut app, _state) = make_admin_app(Route::AdminTools);
    draw(&app);
    for route in Route::ADMIN_MENU {
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.route(), *route);
        draw(&app);
        app.handle_key(key(KeyCode::Esc));
        app.handle_key(char_key('j'));
    }
}

#[test]
fn render_detail_and_confirm() {
    let (mut app, _state, _task_id, _category_id) = make_app_with_task();
    app.handle_key(key(KeyCode::Enter));
    draw(&app);
    app.handle_key(char_key('d'));
    draw(&app);
}

#[test]
fn render_forms_and_alert() {
    let (mut app, _state) = make_app();
    app.handle_key(char_key('n'));
    draw(&app);
    app.handle_key(ctrl('n'));
    draw(&app);
    app.handle_key(key(KeyCode::Esc));
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Alert { .. }));
    draw(&app);
}
