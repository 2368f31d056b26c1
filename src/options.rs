use indexmap::IndexSet;

use crate::types::{
    KeyspaceChoice, SelectOption, StorageConfig, StorageOption, TableInfo, TableOption,
    UniverseTable,
};

pub fn storage_options(configs: &[StorageConfig]) -> Vec<StorageOption> {
    configs
        .iter()
        .map(|config| StorageOption {
            value: config.config_uuid.clone(),
            label: format!("{} Storage", config.name),
            provider: config.provider.clone(),
        })
        .collect()
}

/// Table options for the tables field.
///
/// A locked table yields exactly that table. Otherwise every universe table
/// is listed as `<keyspace>.<table>`, ordered case-insensitively by label.
pub fn table_options(tables: &[UniverseTable], table_info: Option<&TableInfo>) -> Vec<TableOption> {
    if let Some(info) = table_info {
        return vec![TableOption {
            value: info.table_id.clone(),
            label: format!("{}.{}", info.key_space, info.table_name),
            keyspace: info.key_space.clone(),
        }];
    }

    let mut options: Vec<TableOption> = tables
        .iter()
        .map(|table| TableOption {
            value: table.table_uuid.clone(),
            label: format!("{}.{}", table.key_space, table.table_name),
            keyspace: table.key_space.clone(),
        })
        .collect();
    // sort_by_cached_key is stable, equal labels keep their input order
    options.sort_by_cached_key(|option| option.label.to_lowercase());
    options
}

/// Keyspace choices: the "All Keyspaces" sentinel followed by each distinct
/// keyspace in the order it was first seen.
pub fn keyspace_options(
    tables: &[UniverseTable],
    table_info: Option<&TableInfo>,
) -> Vec<KeyspaceChoice> {
    let mut choices = vec![KeyspaceChoice::All];
    if table_info.is_some() {
        return choices;
    }

    let keyspaces: IndexSet<&str> = tables.iter().map(|t| t.key_space.as_str()).collect();
    choices.extend(
        keyspaces
            .into_iter()
            .map(|keyspace| KeyspaceChoice::Named(keyspace.to_string())),
    );
    choices
}

/// Entries offered by the tables picker for the chosen keyspace.
pub fn displayed_table_options(
    table_options: &[TableOption],
    keyspace: Option<&KeyspaceChoice>,
) -> Vec<SelectOption> {
    let mut displayed = vec![SelectOption::all_tables()];
    match keyspace {
        Some(KeyspaceChoice::All) => {}
        Some(KeyspaceChoice::Named(name)) => displayed.extend(
            table_options
                .iter()
                .filter(|option| &option.keyspace == name)
                .map(SelectOption::from),
        ),
        None => displayed.extend(table_options.iter().map(SelectOption::from)),
    }
    displayed
}

pub fn modal_title(table_info: Option<&TableInfo>) -> String {
    match table_info {
        Some(info) => format!("Create Backup for {}.{}", info.key_space, info.table_name),
        None => "Create Backup".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StorageProvider;

    fn table(uuid: &str, name: &str, keyspace: &str) -> UniverseTable {
        UniverseTable {
            table_uuid: uuid.to_string(),
            table_name: name.to_string(),
            key_space: keyspace.to_string(),
        }
    }

    #[test]
    fn test_storage_options_label_and_provider() {
        let configs = vec![
            StorageConfig::new("c1", "S3"),
            StorageConfig::new("c2", "NFS"),
        ];
        let options = storage_options(&configs);

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, "c1");
        assert_eq!(options[0].label, "S3 Storage");
        assert_eq!(options[0].provider, StorageProvider::S3);
        assert_eq!(options[1].label, "NFS Storage");
        assert_eq!(options[1].provider, StorageProvider::Nfs);
    }

    #[test]
    fn test_table_options_sorted_case_insensitively() {
        let tables = vec![
            table("t1", "orders", "sales"),
            table("t2", "Accounts", "sales"),
            table("t3", "users", "Auth"),
        ];
        let labels: Vec<String> = table_options(&tables, None)
            .into_iter()
            .map(|o| o.label)
            .collect();

        assert_eq!(labels, vec!["Auth.users", "sales.Accounts", "sales.orders"]);
    }

    #[test]
    fn test_table_options_stable_for_equal_labels() {
        let tables = vec![
            table("t1", "Orders", "sales"),
            table("t0", "alpha", "a"),
            table("t2", "orders", "Sales"),
            table("t3", "ORDERS", "SALES"),
        ];
        let values: Vec<String> = table_options(&tables, None)
            .into_iter()
            .map(|o| o.value)
            .collect();

        assert_eq!(values, vec!["t0", "t1", "t2", "t3"]);
    }

    #[test]
    fn test_table_options_locked_table() {
        let tables = vec![table("t1", "orders", "sales"), table("t2", "items", "sales")];
        let info = TableInfo {
            table_id: "t2".to_string(),
            table_name: "items".to_string(),
            key_space: "sales".to_string(),
        };
        let options = table_options(&tables, Some(&info));

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "t2");
        assert_eq!(options[0].label, "sales.items");
        assert_eq!(modal_title(Some(&info)), "Create Backup for sales.items");
        assert_eq!(keyspace_options(&tables, Some(&info)), vec![KeyspaceChoice::All]);
    }

    #[test]
    fn test_keyspace_options_first_seen_order() {
        let tables = vec![
            table("t1", "orders", "sales"),
            table("t2", "users", "auth"),
            table("t3", "items", "sales"),
            table("t4", "events", "audit"),
        ];
        let choices = keyspace_options(&tables, None);

        assert_eq!(
            choices,
            vec![
                KeyspaceChoice::All,
                KeyspaceChoice::Named("sales".to_string()),
                KeyspaceChoice::Named("auth".to_string()),
                KeyspaceChoice::Named("audit".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(storage_options(&[]).is_empty());
        assert!(table_options(&[], None).is_empty());
        assert_eq!(keyspace_options(&[], None), vec![KeyspaceChoice::All]);
        assert_eq!(modal_title(None), "Create Backup");
    }

    #[test]
    fn test_displayed_table_options_filters_by_keyspace() {
        let tables = vec![
            table("t1", "orders", "sales"),
            table("t2", "users", "auth"),
        ];
        let options = table_options(&tables, None);

        let sales = displayed_table_options(
            &options,
            Some(&KeyspaceChoice::Named("sales".to_string())),
        );
        assert_eq!(sales.len(), 2);
        assert!(sales[0].is_all_tables());
        assert_eq!(sales[1].value, "t1");

        let everything = displayed_table_options(&options, Some(&KeyspaceChoice::All));
        assert_eq!(everything, vec![SelectOption::all_tables()]);

        let unfiltered = displayed_table_options(&options, None);
        assert_eq!(unfiltered.len(), 3);
    }
}
