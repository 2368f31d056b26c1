use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::client::PlatformClientTrait;
use crate::dispatch::{create_backup, DispatchOutcome, ModalHost};
use crate::error::{BackupFormError, ValidationErrors};
use crate::options;
use crate::render::RenderFlags;
use crate::state::backup_form::{backup_table_changed, FormValues};
use crate::types::{
    AppState, FormField, InputMode, KeyspaceChoice, SelectOption, StorageConfig, StorageOption,
    TableInfo, TableOption, TableSelection, UniverseTable,
};
use crate::validation::validate;

/// Visibility and route of the backup form.
#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub visible: bool,
    pub route: Option<String>,
}

impl Default for Modal {
    fn default() -> Self {
        Self {
            visible: true,
            route: None,
        }
    }
}

impl ModalHost for Modal {
    fn hide(&mut self) {
        self.visible = false;
    }

    fn navigate(&mut self, path: &str) {
        debug!(path, "Navigating");
        self.route = Some(path.to_string());
    }
}

/// An open option list for one of the select fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Picker {
    pub field: FormField,
    pub cursor: usize,
    /// Marked entries of the tables list, in the order they were marked.
    pub marked: Vec<usize>,
    /// Set once an entry was marked or unmarked.
    pub touched: bool,
}

pub struct App {
    pub state: AppState,
    pub dry_run_mode: bool,
    pub input_mode: InputMode,
    pub client: Box<dyn PlatformClientTrait>,
    pub universe_uuid: String,
    pub is_scheduled: bool,
    pub locked_table_uuid: Option<String>,
    pub table_info: Option<TableInfo>,
    pub authenticated_user: Option<String>,
    pub storage_configs: Vec<StorageConfig>,
    pub universe_tables: Vec<UniverseTable>,
    pub form: FormValues,
    pub focus: FormField,
    pub picker: Option<Picker>,
    pub edit_buffer: String,
    pub field_errors: ValidationErrors,
    pub submit_attempted: bool,
    pub modal: Modal,
    pub last_outcome: Option<DispatchOutcome>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub loading: bool,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(client: Box<dyn PlatformClientTrait>, universe_uuid: &str, is_scheduled: bool) -> Self {
        Self {
            state: AppState::LoadingUniverse,
            dry_run_mode: false,
            input_mode: InputMode::Normal,
            client,
            universe_uuid: universe_uuid.to_string(),
            is_scheduled,
            locked_table_uuid: None,
            table_info: None,
            authenticated_user: None,
            storage_configs: Vec::new(),
            universe_tables: Vec::new(),
            form: FormValues::new(),
            focus: FormField::StorageConfig,
            picker: None,
            edit_buffer: String::new(),
            field_errors: ValidationErrors::default(),
            submit_attempted: false,
            modal: Modal::default(),
            last_outcome: None,
            submitted_at: None,
            error: None,
            loading: false,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn with_locked_table(mut self, table_uuid: &str) -> Self {
        self.locked_table_uuid = Some(table_uuid.to_string());
        self
    }

    pub fn with_dry_run(mut self, dry_run_mode: bool) -> Self {
        self.dry_run_mode = dry_run_mode;
        self
    }

    pub async fn initialize(&mut self) -> Result<()> {
        self.state = AppState::LoadingUniverse;
        self.loading = true;

        match self.load_universe().await {
            Ok(()) => {
                self.reset_form();
                self.state = AppState::EditingForm;
            }
            Err(e) => {
                warn!(universe = %self.universe_uuid, "Failed to load universe: {e:#}");
                self.state = AppState::Error(e.to_string());
            }
        }
        self.loading = false;

        Ok(())
    }

    async fn load_universe(&mut self) -> Result<()> {
        let user = self.client.check_connection().await?;
        self.authenticated_user = Some(user);

        self.storage_configs = self
            .client
            .list_storage_configs()
            .await
            .map_err(|e| anyhow!("Failed to load storage configs: {}", e))?;
        self.universe_tables = self
            .client
            .list_universe_tables(&self.universe_uuid)
            .await
            .map_err(|e| anyhow!("Failed to load universe tables: {}", e))?;

        self.table_info = match &self.locked_table_uuid {
            Some(uuid) => {
                let table = self
                    .universe_tables
                    .iter()
                    .find(|t| &t.table_uuid == uuid)
                    .ok_or_else(|| anyhow!("Table {} not found in universe {}", uuid, self.universe_uuid))?;
                Some(TableInfo::from(table))
            }
            None => None,
        };

        info!(
            universe = %self.universe_uuid,
            storage_configs = self.storage_configs.len(),
            tables = self.universe_tables.len(),
            "Universe loaded"
        );
        Ok(())
    }

    /// Opens a fresh form.
    pub fn reset_form(&mut self) {
        let table_options = self.table_options();
        self.form = FormValues::initial(FormValues::new(), self.table_info.as_ref(), &table_options);
        self.modal = Modal::default();
        self.picker = None;
        self.edit_buffer.clear();
        self.input_mode = InputMode::Normal;
        self.field_errors = ValidationErrors::default();
        self.submit_attempted = false;
        self.focus = self
            .flags()
            .visible_fields()
            .first()
            .copied()
            .unwrap_or(FormField::Submit);
    }

    pub fn new_backup(&mut self) {
        self.last_outcome = None;
        self.submitted_at = None;
        self.reset_form();
        self.state = AppState::EditingForm;
    }

    pub fn flags(&self) -> RenderFlags {
        RenderFlags::from_values(&self.form, self.is_scheduled, self.table_info.is_some())
    }

    pub fn modal_title(&self) -> String {
        options::modal_title(self.table_info.as_ref())
    }

    pub fn storage_options(&self) -> Vec<StorageOption> {
        options::storage_options(&self.storage_configs)
    }

    pub fn table_options(&self) -> Vec<TableOption> {
        options::table_options(&self.universe_tables, self.table_info.as_ref())
    }

    pub fn keyspace_options(&self) -> Vec<KeyspaceChoice> {
        options::keyspace_options(&self.universe_tables, self.table_info.as_ref())
    }

    pub fn displayed_tables(&self) -> Vec<SelectOption> {
        options::displayed_table_options(&self.table_options(), self.form.table_keyspace.as_ref())
    }

    /// Labels listed by the picker for `field`.
    pub fn picker_labels(&self, field: FormField) -> Vec<String> {
        match field {
            FormField::StorageConfig => self.storage_options().into_iter().map(|o| o.label).collect(),
            FormField::TableKeyspace => self
                .keyspace_options()
                .iter()
                .map(|k| k.label().to_string())
                .collect(),
            FormField::BackupTables => self.displayed_tables().into_iter().map(|o| o.label).collect(),
            _ => Vec::new(),
        }
    }

    /// Display text of a field's current value.
    pub fn field_value(&self, field: FormField) -> String {
        match field {
            FormField::SchedulingFrequency => self.form.scheduling_frequency.clone(),
            FormField::CronExpression => self.form.cron_expression.clone(),
            FormField::StorageConfig => self
                .form
                .storage_config
                .as_ref()
                .map(|s| s.label.clone())
                .unwrap_or_default(),
            FormField::TableKeyspace => self
                .form
                .table_keyspace
                .as_ref()
                .map(|k| k.label().to_string())
                .unwrap_or_default(),
            FormField::BackupTables => self
                .form
                .backup_tables
                .options()
                .iter()
                .map(|o| o.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            FormField::TransactionalBackup => on_off(self.form.transactional_backup),
            FormField::EnableSse => on_off(self.form.enable_sse),
            FormField::Submit | FormField::Cancel => String::new(),
        }
    }

    pub fn move_selection_up(&mut self) {
        if let Some(picker) = &mut self.picker {
            if picker.cursor > 0 {
                picker.cursor -= 1;
            }
            return;
        }

        let fields = self.flags().visible_fields();
        if let Some(index) = fields.iter().position(|f| *f == self.focus) {
            if index > 0 {
                self.focus = fields[index - 1];
            }
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.picker.is_some() {
            let len = self.picker_len();
            if let Some(picker) = &mut self.picker {
                if picker.cursor < len.saturating_sub(1) {
                    picker.cursor += 1;
                }
            }
            return;
        }

        let fields = self.flags().visible_fields();
        if let Some(index) = fields.iter().position(|f| *f == self.focus) {
            if index + 1 < fields.len() {
                self.focus = fields[index + 1];
            }
        }
    }

    fn picker_len(&self) -> usize {
        self.picker
            .as_ref()
            .map(|p| self.picker_labels(p.field).len())
            .unwrap_or(0)
    }

    pub async fn select_current_item(&mut self) -> Result<()> {
        if self.state != AppState::EditingForm {
            return Ok(());
        }
        if self.picker.is_some() {
            self.confirm_picker();
            return Ok(());
        }

        let field = self.focus;
        if self.flags().is_read_only(field) {
            return Ok(());
        }

        match field {
            FormField::Submit => self.submit().await?,
            FormField::Cancel => self.cancel(),
            f if f.is_text() => self.start_editing(),
            f if f.is_select() => self.open_picker(f),
            f => self.toggle_field(f),
        }
        Ok(())
    }

    /// Space: marks a table in the tables picker, or flips a toggle.
    pub fn toggle_current(&mut self) {
        if let Some(picker) = &mut self.picker {
            if picker.field == FormField::BackupTables {
                let cursor = picker.cursor;
                picker.touched = true;
                match picker.marked.iter().position(|i| *i == cursor) {
                    Some(index) => {
                        picker.marked.remove(index);
                    }
                    None => picker.marked.push(cursor),
                }
            }
            return;
        }

        if self.focus.is_toggle() {
            self.toggle_field(self.focus);
        }
    }

    fn toggle_field(&mut self, field: FormField) {
        match field {
            FormField::TransactionalBackup => {
                self.form.transactional_backup = !self.form.transactional_backup
            }
            FormField::EnableSse => self.form.enable_sse = !self.form.enable_sse,
            _ => return,
        }
        self.refresh();
    }

    pub fn open_picker(&mut self, field: FormField) {
        let (cursor, marked) = match field {
            FormField::StorageConfig => {
                let cursor = self.form.storage_config.as_ref().and_then(|current| {
                    self.storage_options()
                        .iter()
                        .position(|o| o.value == current.value)
                });
                (cursor.unwrap_or(0), Vec::new())
            }
            FormField::TableKeyspace => {
                let cursor = self
                    .form
                    .table_keyspace
                    .as_ref()
                    .and_then(|current| self.keyspace_options().iter().position(|k| k == current));
                (cursor.unwrap_or(0), Vec::new())
            }
            FormField::BackupTables => {
                let displayed = self.displayed_tables();
                let marked: Vec<usize> = self
                    .form
                    .backup_tables
                    .options()
                    .iter()
                    .filter_map(|selected| displayed.iter().position(|o| o.value == selected.value))
                    .collect();
                (marked.first().copied().unwrap_or(0), marked)
            }
            _ => return,
        };

        self.picker = Some(Picker {
            field,
            cursor,
            marked,
            touched: false,
        });
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    pub fn confirm_picker(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };

        match picker.field {
            FormField::StorageConfig => {
                if let Some(option) = self.storage_options().into_iter().nth(picker.cursor) {
                    self.form.storage_config = Some(option);
                }
            }
            FormField::TableKeyspace => {
                if let Some(choice) = self.keyspace_options().into_iter().nth(picker.cursor) {
                    if self.form.table_keyspace.as_ref() != Some(&choice) {
                        self.form.backup_tables = TableSelection::None;
                    }
                    self.form.table_keyspace = Some(choice);
                }
            }
            FormField::BackupTables => {
                let displayed = self.displayed_tables();
                // Enter without marking picks the highlighted entry
                let marked = if picker.marked.is_empty() && !picker.touched {
                    vec![picker.cursor]
                } else {
                    picker.marked
                };
                let selected: Vec<SelectOption> = marked
                    .into_iter()
                    .filter_map(|i| displayed.get(i).cloned())
                    .collect();
                self.form.backup_tables = backup_table_changed(TableSelection::Many(selected));
            }
            _ => {}
        }
        self.refresh();
    }

    pub fn start_editing(&mut self) {
        self.edit_buffer = self.field_value(self.focus);
        self.input_mode = InputMode::Editing;
    }

    pub fn finish_editing(&mut self) {
        let value = self.edit_buffer.trim().to_string();
        match self.focus {
            FormField::SchedulingFrequency => self.form.scheduling_frequency = value,
            FormField::CronExpression => self.form.cron_expression = value,
            _ => {}
        }
        self.edit_buffer.clear();
        self.input_mode = InputMode::Normal;
        self.refresh();
    }

    pub fn cancel_editing(&mut self) {
        self.edit_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Re-derives everything that depends on the form values.
    fn refresh(&mut self) {
        let fields = self.flags().visible_fields();
        if !fields.contains(&self.focus) {
            self.focus = FormField::Submit;
        }
        if self.submit_attempted {
            self.field_errors = validate(&self.form).err().unwrap_or_default();
        }
    }

    pub async fn submit(&mut self) -> Result<()> {
        self.submit_attempted = true;

        let result = match validate(&self.form) {
            Ok(()) => {
                self.field_errors = ValidationErrors::default();
                self.loading = true;
                self.state = AppState::Submitting;
                let result = create_backup(
                    self.client.as_ref(),
                    &mut self.modal,
                    &self.universe_uuid,
                    &self.form,
                    &self.universe_tables,
                )
                .await;
                self.loading = false;
                result
            }
            Err(errors) => Err(BackupFormError::Validation(errors)),
        };

        match result {
            Ok(DispatchOutcome::Skipped) => {
                self.state = AppState::EditingForm;
            }
            Ok(outcome) => {
                self.last_outcome = Some(outcome);
                self.submitted_at = Some(Utc::now());
                self.state = AppState::BackupsListing;
            }
            Err(BackupFormError::Validation(errors)) => {
                debug!(errors = %errors, "Backup form is invalid");
                let visible = self.flags().visible_fields();
                if let Some(first) = errors.errors.iter().find(|e| visible.contains(&e.field)) {
                    self.focus = first.field;
                }
                self.field_errors = errors;
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.state = AppState::EditingForm;
            }
        }
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.modal.hide();
        self.should_quit = true;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}

fn on_off(value: bool) -> String {
    let text = if value { "On" } else { "Off" };
    text.to_string()
}
