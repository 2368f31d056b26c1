use crate::cron::is_valid_cron;
use crate::error::ValidationErrors;
use crate::state::backup_form::FormValues;
use crate::types::{FormField, KeyspaceChoice};

pub const STORAGE_REQUIRED: &str = "Storage Config is Required";
pub const KEYSPACE_AND_TABLE_REQUIRED: &str = "Backup keyspace and table are required";
pub const FREQUENCY_NOT_NUMBER: &str = "Frequency must be a number";
pub const INVALID_CRON: &str = "Does not look like a valid cron expression";

/// Checks the form and reports every failing field.
pub fn validate(values: &FormValues) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if values.storage_config.is_none() {
        errors.push(FormField::StorageConfig, STORAGE_REQUIRED);
    }

    if values.table_keyspace.is_none() {
        errors.push(FormField::TableKeyspace, KEYSPACE_AND_TABLE_REQUIRED);
    }

    // the keyspace alone names the target unless it is missing or "all"
    let tables_required = matches!(values.table_keyspace, None | Some(KeyspaceChoice::All));
    if tables_required && values.backup_tables.is_empty() {
        errors.push(FormField::BackupTables, KEYSPACE_AND_TABLE_REQUIRED);
    }

    let frequency = values.scheduling_frequency.trim();
    let is_number = frequency.parse::<f64>().is_ok_and(|n| n.is_finite());
    if !frequency.is_empty() && !is_number {
        errors.push(FormField::SchedulingFrequency, FREQUENCY_NOT_NUMBER);
    }

    let cron_expression = values.cron_expression.trim();
    if !cron_expression.is_empty() && !is_valid_cron(cron_expression) {
        errors.push(FormField::CronExpression, INVALID_CRON);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
