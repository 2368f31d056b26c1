use crate::types::{
    KeyspaceChoice, SelectOption, StorageOption, TableInfo, TableOption, TableSelection,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    pub storage_config: Option<StorageOption>,
    pub table_keyspace: Option<KeyspaceChoice>,
    pub backup_tables: TableSelection,
    pub scheduling_frequency: String,
    pub cron_expression: String,
    pub enable_sse: bool,
    pub transactional_backup: bool,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values the form opens with.
    ///
    /// Frequency and cron are always reset. A locked table is preselected
    /// together with its keyspace, since the keyspace field is disabled.
    pub fn initial(
        seed: FormValues,
        table_info: Option<&TableInfo>,
        table_options: &[TableOption],
    ) -> Self {
        let mut values = FormValues {
            scheduling_frequency: String::new(),
            cron_expression: String::new(),
            ..seed
        };

        if let (Some(info), Some(locked)) = (table_info, table_options.first()) {
            values.backup_tables = TableSelection::Single(SelectOption::from(locked));
            values.table_keyspace = Some(KeyspaceChoice::Named(info.key_space.clone()));
        }

        values
    }
}

/// Keeps "All Tables in Keyspace" mutually exclusive with specific tables.
pub fn backup_table_changed(selection: TableSelection) -> TableSelection {
    match selection {
        TableSelection::Single(option) if option.is_all_tables() => TableSelection::Single(option),
        TableSelection::Many(mut options) if !options.is_empty() => {
            match options.iter().position(|o| o.is_all_tables()) {
                Some(index) => TableSelection::Many(vec![options.swap_remove(index)]),
                None => TableSelection::Many(options),
            }
        }
        _ => TableSelection::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(value: &str) -> SelectOption {
        SelectOption::new(value, &format!("sales.{value}"))
    }

    #[test]
    fn test_all_tables_alone_is_kept() {
        let selection = TableSelection::Single(SelectOption::all_tables());
        assert_eq!(backup_table_changed(selection.clone()), selection);
    }

    #[test]
    fn test_all_tables_collapses_other_picks() {
        let selection = TableSelection::Many(vec![
            table("t1"),
            SelectOption::all_tables(),
            table("t2"),
        ]);
        assert_eq!(
            backup_table_changed(selection),
            TableSelection::Many(vec![SelectOption::all_tables()])
        );
    }

    #[test]
    fn test_specific_tables_are_kept() {
        let selection = TableSelection::Many(vec![table("t1"), table("t2")]);
        assert_eq!(backup_table_changed(selection.clone()), selection);
    }

    #[test]
    fn test_cleared_selection() {
        assert_eq!(
            backup_table_changed(TableSelection::Many(Vec::new())),
            TableSelection::None
        );
        assert_eq!(backup_table_changed(TableSelection::None), TableSelection::None);
    }

    #[test]
    fn test_initial_values_reset_schedule_and_lock_table() {
        let seed = FormValues {
            scheduling_frequency: "1000".to_string(),
            cron_expression: "* * * * *".to_string(),
            enable_sse: true,
            ..FormValues::default()
        };
        let info = TableInfo {
            table_id: "t1".to_string(),
            table_name: "orders".to_string(),
            key_space: "sales".to_string(),
        };
        let options = vec![TableOption {
            value: "t1".to_string(),
            label: "sales.orders".to_string(),
            keyspace: "sales".to_string(),
        }];

        let values = FormValues::initial(seed, Some(&info), &options);

        assert!(values.scheduling_frequency.is_empty());
        assert!(values.cron_expression.is_empty());
        assert!(values.enable_sse);
        assert_eq!(
            values.backup_tables,
            TableSelection::Single(SelectOption::new("t1", "sales.orders"))
        );
        assert_eq!(
            values.table_keyspace,
            Some(KeyspaceChoice::Named("sales".to_string()))
        );
    }
}
