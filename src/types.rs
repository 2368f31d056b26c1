use serde::{Deserialize, Serialize};

/// Value of the "All Keyspaces" keyspace option.
pub const ALL_KEYSPACES: &str = "allkeyspaces";
/// Value of the "All Tables in Keyspace" table option.
pub const ALL_TABLES: &str = "alltables";

pub const ALL_KEYSPACES_LABEL: &str = "All Keyspaces";
pub const ALL_TABLES_LABEL: &str = "All Tables in Keyspace";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProvider {
    S3,
    Gcs,
    Azure,
    Nfs,
    Other(String),
}

impl StorageProvider {
    pub fn from_config_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "S3" => StorageProvider::S3,
            "GCS" => StorageProvider::Gcs,
            "AZ" | "AZURE" => StorageProvider::Azure,
            "NFS" => StorageProvider::Nfs,
            _ => StorageProvider::Other(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub config_uuid: String,
    pub name: String,
    pub provider: StorageProvider,
}

impl StorageConfig {
    pub fn new(config_uuid: &str, name: &str) -> Self {
        Self {
            config_uuid: config_uuid.to_string(),
            name: name.to_string(),
            provider: StorageProvider::from_config_name(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniverseTable {
    pub table_uuid: String,
    pub table_name: String,
    pub key_space: String,
}

/// A single table the form is locked to.
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub table_id: String,
    pub table_name: String,
    pub key_space: String,
}

impl From<&UniverseTable> for TableInfo {
    fn from(table: &UniverseTable) -> Self {
        Self {
            table_id: table.table_uuid.clone(),
            table_name: table.table_name.clone(),
            key_space: table.key_space.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }

    pub fn all_tables() -> Self {
        Self::new(ALL_TABLES, ALL_TABLES_LABEL)
    }

    pub fn is_all_tables(&self) -> bool {
        self.value == ALL_TABLES
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageOption {
    pub value: String,
    pub label: String,
    pub provider: StorageProvider,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableOption {
    pub value: String,
    pub label: String,
    pub keyspace: String,
}

impl From<&TableOption> for SelectOption {
    fn from(option: &TableOption) -> Self {
        SelectOption::new(&option.value, &option.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyspaceChoice {
    All,
    Named(String),
}

impl KeyspaceChoice {
    pub fn value(&self) -> &str {
        match self {
            KeyspaceChoice::All => ALL_KEYSPACES,
            KeyspaceChoice::Named(name) => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            KeyspaceChoice::All => ALL_KEYSPACES_LABEL,
            KeyspaceChoice::Named(name) => name,
        }
    }
}

/// Current value of the multi-select tables field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TableSelection {
    #[default]
    None,
    Single(SelectOption),
    Many(Vec<SelectOption>),
}

impl TableSelection {
    pub fn is_empty(&self) -> bool {
        match self {
            TableSelection::None => true,
            TableSelection::Single(_) => false,
            TableSelection::Many(options) => options.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TableSelection::None => 0,
            TableSelection::Single(_) => 1,
            TableSelection::Many(options) => options.len(),
        }
    }

    pub fn options(&self) -> Vec<&SelectOption> {
        match self {
            TableSelection::None => Vec::new(),
            TableSelection::Single(option) => vec![option],
            TableSelection::Many(options) => options.iter().collect(),
        }
    }

    /// Flat list of selected table identifiers, in selection order.
    pub fn values(&self) -> Vec<String> {
        self.options().into_iter().map(|o| o.value.clone()).collect()
    }

    pub fn first_is_all_tables(&self) -> bool {
        self.options()
            .first()
            .map(|o| o.is_all_tables())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    Create,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupPayload {
    #[serde(rename = "storageConfigUUID")]
    pub storage_config_uuid: String,
    pub sse: bool,
    #[serde(rename = "transactionalBackup")]
    pub transactional_backup: bool,
    #[serde(rename = "schedulingFrequency")]
    pub scheduling_frequency: Option<String>,
    #[serde(rename = "cronExpression")]
    pub cron_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyspace: Option<String>,
    #[serde(rename = "tableUUIDList", skip_serializing_if = "Option::is_none")]
    pub table_uuid_list: Option<Vec<String>>,
    #[serde(rename = "tableName", skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(rename = "actionType", skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackupRequest {
    Table {
        table_uuid: String,
        payload: BackupPayload,
    },
    Universe {
        payload: BackupPayload,
    },
}

impl BackupRequest {
    pub fn payload(&self) -> &BackupPayload {
        match self {
            BackupRequest::Table { payload, .. } | BackupRequest::Universe { payload } => payload,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CustomerConfigResponse {
    #[serde(rename = "configUUID")]
    pub config_uuid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub config_type: String,
}

#[derive(Debug, Deserialize)]
pub struct TableResponse {
    #[serde(rename = "tableUUID")]
    pub table_uuid: String,
    #[serde(rename = "tableName")]
    pub table_name: String,
    #[serde(rename = "keySpace")]
    pub key_space: String,
}

#[derive(Debug, Deserialize)]
pub struct CustomerResponse {
    pub name: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BackupTaskResponse {
    #[serde(rename = "taskUUID")]
    pub task_uuid: Option<String>,
    #[serde(rename = "scheduleUUID")]
    pub schedule_uuid: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    LoadingUniverse,
    EditingForm,
    Submitting,
    BackupsListing,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    SchedulingFrequency,
    CronExpression,
    StorageConfig,
    TableKeyspace,
    BackupTables,
    TransactionalBackup,
    EnableSse,
    Submit,
    Cancel,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::SchedulingFrequency => "Backup frequency",
            FormField::CronExpression => "Cron expression",
            FormField::StorageConfig => "Storage",
            FormField::TableKeyspace => "Keyspace",
            FormField::BackupTables => "Tables to backup",
            FormField::TransactionalBackup => "Create a transactional backup across tables",
            FormField::EnableSse => "Enable Server-Side Encryption",
            FormField::Submit => "Create Backup",
            FormField::Cancel => "Cancel",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::SchedulingFrequency | FormField::CronExpression
        )
    }

    pub fn is_select(&self) -> bool {
        matches!(
            self,
            FormField::StorageConfig | FormField::TableKeyspace | FormField::BackupTables
        )
    }

    pub fn is_toggle(&self) -> bool {
        matches!(
            self,
            FormField::TransactionalBackup | FormField::EnableSse
        )
    }
}
