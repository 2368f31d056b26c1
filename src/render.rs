use crate::state::backup_form::FormValues;
use crate::types::{FormField, KeyspaceChoice, StorageProvider};

/// Visibility and read-only state of the form, recomputed after every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderFlags {
    pub is_scheduling_frequency_read_only: bool,
    pub is_cron_expression_read_only: bool,
    pub is_table_selected: bool,
    pub is_keyspace_selected: bool,
    pub universe_backup_selected: bool,
    pub s3_storage_selected: bool,
    pub show_transactional_toggle: bool,
    pub show_schedule_fields: bool,
    pub is_keyspace_disabled: bool,
    pub is_tables_read_only: bool,
}

impl RenderFlags {
    pub fn from_values(values: &FormValues, is_scheduled: bool, table_locked: bool) -> Self {
        let is_table_selected = !values.backup_tables.is_empty();
        let is_keyspace_selected = values.table_keyspace.is_some();
        let multiple_tables = values.backup_tables.len() > 1;

        Self {
            is_scheduling_frequency_read_only: !values.cron_expression.is_empty(),
            is_cron_expression_read_only: !values.scheduling_frequency.is_empty(),
            is_table_selected,
            is_keyspace_selected,
            universe_backup_selected: values.table_keyspace == Some(KeyspaceChoice::All),
            s3_storage_selected: values
                .storage_config
                .as_ref()
                .is_some_and(|s| s.provider == StorageProvider::S3),
            show_transactional_toggle: is_keyspace_selected
                && is_table_selected
                && (multiple_tables || values.backup_tables.first_is_all_tables()),
            show_schedule_fields: is_scheduled,
            is_keyspace_disabled: table_locked,
            is_tables_read_only: table_locked,
        }
    }

    /// Focusable fields in display order.
    pub fn visible_fields(&self) -> Vec<FormField> {
        let mut fields = Vec::new();
        if self.show_schedule_fields {
            fields.push(FormField::SchedulingFrequency);
            fields.push(FormField::CronExpression);
        }
        fields.push(FormField::StorageConfig);
        fields.push(FormField::TableKeyspace);
        if self.is_keyspace_selected {
            fields.push(FormField::BackupTables);
        }
        if self.show_transactional_toggle {
            fields.push(FormField::TransactionalBackup);
        }
        if self.s3_storage_selected {
            fields.push(FormField::EnableSse);
        }
        fields.push(FormField::Submit);
        fields.push(FormField::Cancel);
        fields
    }

    pub fn is_read_only(&self, field: FormField) -> bool {
        match field {
            FormField::SchedulingFrequency => self.is_scheduling_frequency_read_only,
            FormField::CronExpression => self.is_cron_expression_read_only,
            FormField::TableKeyspace => self.is_keyspace_disabled,
            FormField::BackupTables => self.is_tables_read_only,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SelectOption, StorageOption, TableSelection};

    fn storage(label: &str, provider: StorageProvider) -> StorageOption {
        StorageOption {
            value: "c1".to_string(),
            label: label.to_string(),
            provider,
        }
    }

    #[test]
    fn test_frequency_and_cron_exclude_each_other() {
        let mut values = FormValues::new();
        values.cron_expression = "0 2 * * *".to_string();
        let flags = RenderFlags::from_values(&values, true, false);
        assert!(flags.is_scheduling_frequency_read_only);
        assert!(!flags.is_cron_expression_read_only);

        let mut values = FormValues::new();
        values.scheduling_frequency = "60000".to_string();
        let flags = RenderFlags::from_values(&values, true, false);
        assert!(!flags.is_scheduling_frequency_read_only);
        assert!(flags.is_cron_expression_read_only);
    }

    #[test]
    fn test_schedule_fields_only_when_scheduled() {
        let values = FormValues::new();
        let one_off = RenderFlags::from_values(&values, false, false);
        assert!(!one_off.visible_fields().contains(&FormField::SchedulingFrequency));
        assert!(!one_off.visible_fields().contains(&FormField::CronExpression));

        let scheduled = RenderFlags::from_values(&values, true, false);
        assert_eq!(
            &scheduled.visible_fields()[..2],
            &[FormField::SchedulingFrequency, FormField::CronExpression]
        );
    }

    #[test]
    fn test_s3_selection_uses_provider() {
        let mut values = FormValues::new();
        values.storage_config = Some(storage("Backups Storage", StorageProvider::S3));
        assert!(RenderFlags::from_values(&values, false, false).s3_storage_selected);

        values.storage_config = Some(storage("S3 Storage", StorageProvider::Nfs));
        let flags = RenderFlags::from_values(&values, false, false);
        assert!(!flags.s3_storage_selected);
        assert!(!flags.visible_fields().contains(&FormField::EnableSse));
    }

    #[test]
    fn test_transactional_toggle() {
        let mut values = FormValues::new();
        values.table_keyspace = Some(KeyspaceChoice::Named("sales".to_string()));
        values.backup_tables = TableSelection::Many(vec![SelectOption::new("t1", "sales.t1")]);
        let flags = RenderFlags::from_values(&values, false, false);
        assert!(flags.is_table_selected);
        assert!(!flags.show_transactional_toggle);

        values.backup_tables = TableSelection::Many(vec![
            SelectOption::new("t1", "sales.t1"),
            SelectOption::new("t2", "sales.t2"),
        ]);
        assert!(RenderFlags::from_values(&values, false, false).show_transactional_toggle);

        values.backup_tables = TableSelection::Single(SelectOption::all_tables());
        let flags = RenderFlags::from_values(&values, false, false);
        assert!(flags.show_transactional_toggle);
        assert!(flags.visible_fields().contains(&FormField::TransactionalBackup));

        values.table_keyspace = None;
        assert!(!RenderFlags::from_values(&values, false, false).show_transactional_toggle);
    }

    #[test]
    fn test_keyspace_flags_and_table_field_visibility() {
        let mut values = FormValues::new();
        let flags = RenderFlags::from_values(&values, false, false);
        assert!(!flags.is_keyspace_selected);
        assert!(!flags.visible_fields().contains(&FormField::BackupTables));

        values.table_keyspace = Some(KeyspaceChoice::All);
        let flags = RenderFlags::from_values(&values, false, true);
        assert!(flags.is_keyspace_selected);
        assert!(flags.universe_backup_selected);
        assert!(flags.visible_fields().contains(&FormField::BackupTables));
        assert!(flags.is_read_only(FormField::TableKeyspace));
        assert!(flags.is_read_only(FormField::BackupTables));
    }
}
