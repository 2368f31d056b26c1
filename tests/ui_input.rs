use yb_backup_tui::app::App;
use yb_backup_tui::client::MockPlatformClientTrait;
use yb_backup_tui::types::{
    AppState, FormField, InputMode, StorageOption, StorageProvider,
};
use yb_backup_tui::ui::{handle_edit_input, handle_normal_input};
use crossterm::event::{KeyCode, KeyModifiers};

fn create_test_app() -> App {
    let mock_client = MockPlatformClientTrait::new();
    let mut app = App::new(Box::new(mock_client), "u1", true);
    app.state = AppState::EditingForm;
    app.reset_form();
    app
}

#[tokio::test]
async fn test_handle_normal_input_toggle_help() {
    let mut app = create_test_app();
    assert!(!app.show_help);

    handle_normal_input(&mut app, KeyCode::Char('h'), KeyModifiers::NONE)
        .await
        .unwrap();
    assert!(app.show_help);

    handle_normal_input(&mut app, KeyCode::Char('h'), KeyModifiers::NONE)
        .await
        .unwrap();
    assert!(!app.show_help);
}

#[tokio::test]
async fn test_escape_closes_picker_before_form() {
    let mut app = create_test_app();
    app.focus = FormField::StorageConfig;

    handle_normal_input(&mut app, KeyCode::Enter, KeyModifiers::NONE)
        .await
        .unwrap();
    assert!(app.picker.is_some());

    handle_normal_input(&mut app, KeyCode::Esc, KeyModifiers::NONE)
        .await
        .unwrap();
    assert!(app.picker.is_none());
    assert!(app.modal.visible);
    assert!(!app.should_quit);
}

#[tokio::test]
async fn test_space_toggles_sse_for_s3() {
    let mut app = create_test_app();
    app.form.storage_config = Some(StorageOption {
        value: "c1".to_string(),
        label: "S3 Storage".to_string(),
        provider: StorageProvider::S3,
    });
    app.focus = FormField::EnableSse;

    handle_normal_input(&mut app, KeyCode::Char(' '), KeyModifiers::NONE)
        .await
        .unwrap();
    assert!(app.form.enable_sse);

    handle_normal_input(&mut app, KeyCode::Enter, KeyModifiers::NONE)
        .await
        .unwrap();
    assert!(!app.form.enable_sse);
}

#[tokio::test]
async fn test_frequency_edit_locks_cron() {
    let mut app = create_test_app();
    assert_eq!(app.focus, FormField::SchedulingFrequency);

    handle_normal_input(&mut app, KeyCode::Enter, KeyModifiers::NONE)
        .await
        .unwrap();
    assert_eq!(app.input_mode, InputMode::Editing);

    for c in "86400000".chars() {
        handle_edit_input(&mut app, KeyCode::Char(c)).await.unwrap();
    }
    handle_edit_input(&mut app, KeyCode::Enter).await.unwrap();

    assert_eq!(app.form.scheduling_frequency, "86400000");
    assert!(app.flags().is_cron_expression_read_only);

    handle_normal_input(&mut app, KeyCode::Down, KeyModifiers::NONE)
        .await
        .unwrap();
    assert_eq!(app.focus, FormField::CronExpression);
    handle_normal_input(&mut app, KeyCode::Enter, KeyModifiers::NONE)
        .await
        .unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[tokio::test]
async fn test_handle_edit_input_escape() {
    let mut app = create_test_app();
    app.start_editing();
    app.edit_buffer = "some text".to_string();

    handle_edit_input(&mut app, KeyCode::Esc).await.unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.edit_buffer.is_empty());
}

#[tokio::test]
async fn test_escape_on_form_cancels() {
    let mut app = create_test_app();

    handle_normal_input(&mut app, KeyCode::Esc, KeyModifiers::NONE)
        .await
        .unwrap();
    assert!(!app.modal.visible);
    assert!(app.should_quit);
}

#[tokio::test]
async fn test_edit_cron_expression_with_backspace() {
    let mut app = create_test_app();
    app.focus = FormField::CronExpression;

    handle_normal_input(&mut app, KeyCode::Enter, KeyModifiers::NONE)
        .await
        .unwrap();
    for c in "*/5 * * * *x".chars() {
        handle_edit_input(&mut app, KeyCode::Char(c)).await.unwrap();
    }
    handle_edit_input(&mut app, KeyCode::Backspace).await.unwrap();
    assert_eq!(app.edit_buffer, "*/5 * * * *");

    handle_edit_input(&mut app, KeyCode::Enter).await.unwrap();
    assert_eq!(app.form.cron_expression, "*/5 * * * *");
    assert!(app.flags().is_scheduling_frequency_read_only);
}

#[tokio::test]
async fn test_quit_key() {
    let mut app = create_test_app();
    handle_normal_input(&mut app, KeyCode::Char('q'), KeyModifiers::NONE)
        .await
        .unwrap();
    assert!(app.should_quit);
}
