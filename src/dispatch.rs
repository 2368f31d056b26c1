use tracing::{info, warn};

use crate::client::PlatformClientTrait;
use crate::error::BackupFormError;
use crate::state::backup_form::FormValues;
use crate::types::{ActionType, BackupPayload, BackupRequest, UniverseTable};

/// Whatever presents the form: closes it and moves to another route.
#[mockall::automock]
pub trait ModalHost {
    fn hide(&mut self);
    fn navigate(&mut self, path: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// No storage config was chosen, nothing happened.
    Skipped,
    /// Nothing in the form named a backup target.
    NoRequest,
    Submitted { task_uuid: String },
}

pub fn backups_path(universe_uuid: &str) -> String {
    format!("/universes/{}/backups", universe_uuid)
}

fn blank_to_none(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Builds the request for the current form values.
///
/// Returns `Ok(None)` without a storage config, or when neither tables nor
/// a keyspace were chosen.
pub fn assemble_request(
    values: &FormValues,
    universe_tables: &[UniverseTable],
) -> Result<Option<BackupRequest>, BackupFormError> {
    let Some(storage) = &values.storage_config else {
        return Ok(None);
    };

    let mut payload = BackupPayload {
        storage_config_uuid: storage.value.clone(),
        sse: values.enable_sse,
        transactional_backup: values.transactional_backup,
        scheduling_frequency: blank_to_none(&values.scheduling_frequency),
        cron_expression: blank_to_none(&values.cron_expression),
        keyspace: None,
        table_uuid_list: None,
        table_name: None,
        action_type: None,
    };

    let table_uuids = values.backup_tables.values();
    if !table_uuids.is_empty() {
        if values.backup_tables.first_is_all_tables() {
            payload.keyspace = values.table_keyspace.as_ref().map(|k| k.value().to_string());
            return Ok(Some(BackupRequest::Universe { payload }));
        }

        if table_uuids.len() > 1 {
            payload.table_uuid_list = Some(table_uuids);
            return Ok(Some(BackupRequest::Universe { payload }));
        }

        let table_uuid = &table_uuids[0];
        let table = universe_tables
            .iter()
            .find(|t| &t.table_uuid == table_uuid)
            .ok_or_else(|| BackupFormError::TableNotFound {
                table_uuid: table_uuid.clone(),
            })?;
        payload.table_name = Some(table.table_name.clone());
        payload.keyspace = Some(table.key_space.clone());
        payload.action_type = Some(ActionType::Create);
        return Ok(Some(BackupRequest::Table {
            table_uuid: table_uuid.clone(),
            payload,
        }));
    }

    if let Some(keyspace) = &values.table_keyspace {
        payload.keyspace = Some(keyspace.value().to_string());
        return Ok(Some(BackupRequest::Universe { payload }));
    }

    Ok(None)
}

/// Sends the backup request and, once the platform accepted it, closes the
/// form and navigates to the universe's backups.
pub async fn create_backup(
    client: &dyn PlatformClientTrait,
    host: &mut dyn ModalHost,
    universe_uuid: &str,
    values: &FormValues,
    universe_tables: &[UniverseTable],
) -> Result<DispatchOutcome, BackupFormError> {
    if values.storage_config.is_none() {
        return Ok(DispatchOutcome::Skipped);
    }

    let outcome = match assemble_request(values, universe_tables)? {
        Some(BackupRequest::Table {
            table_uuid,
            payload,
        }) => {
            let task_uuid = client
                .create_table_backup(universe_uuid, &table_uuid, &payload)
                .await
                .map_err(|e| {
                    warn!(universe = universe_uuid, table = %table_uuid, "Table backup failed: {e:#}");
                    BackupFormError::Dispatch(e.to_string())
                })?;
            info!(universe = universe_uuid, table = %table_uuid, task = %task_uuid, "Table backup submitted");
            DispatchOutcome::Submitted { task_uuid }
        }
        Some(BackupRequest::Universe { payload }) => {
            let task_uuid = client
                .create_universe_backup(universe_uuid, &payload)
                .await
                .map_err(|e| {
                    warn!(universe = universe_uuid, "Universe backup failed: {e:#}");
                    BackupFormError::Dispatch(e.to_string())
                })?;
            info!(universe = universe_uuid, task = %task_uuid, "Universe backup submitted");
            DispatchOutcome::Submitted { task_uuid }
        }
        None => {
            info!(universe = universe_uuid, "No backup target selected, nothing submitted");
            DispatchOutcome::NoRequest
        }
    };

    host.hide();
    host.navigate(&backups_path(universe_uuid));
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        KeyspaceChoice, SelectOption, StorageOption, StorageProvider, TableSelection,
    };

    fn values_with(tables: TableSelection) -> FormValues {
        FormValues {
            storage_config: Some(StorageOption {
                value: "c1".to_string(),
                label: "S3 Storage".to_string(),
                provider: StorageProvider::S3,
            }),
            table_keyspace: Some(KeyspaceChoice::Named("sales".to_string())),
            backup_tables: tables,
            ..FormValues::default()
        }
    }

    #[test]
    fn test_base_payload_fields() {
        let mut values = values_with(TableSelection::None);
        values.enable_sse = true;
        values.scheduling_frequency = " ".to_string();
        values.cron_expression = "0 2 * * *".to_string();

        let request = assemble_request(&values, &[]).unwrap().unwrap();
        let payload = request.payload();
        assert_eq!(payload.storage_config_uuid, "c1");
        assert!(payload.sse);
        assert!(!payload.transactional_backup);
        assert_eq!(payload.scheduling_frequency, None);
        assert_eq!(payload.cron_expression.as_deref(), Some("0 2 * * *"));
        assert_eq!(payload.keyspace.as_deref(), Some("sales"));
    }

    #[test]
    fn test_payload_json_shape() {
        let values = values_with(TableSelection::Many(vec![
            SelectOption::new("t1", "sales.orders"),
            SelectOption::new("t2", "sales.items"),
        ]));
        let request = assemble_request(&values, &[]).unwrap().unwrap();
        let json = serde_json::to_value(request.payload()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "storageConfigUUID": "c1",
                "sse": false,
                "transactionalBackup": false,
                "schedulingFrequency": null,
                "cronExpression": null,
                "tableUUIDList": ["t1", "t2"],
            })
        );
    }

    #[test]
    fn test_missing_storage_yields_no_request() {
        let mut values = values_with(TableSelection::None);
        values.storage_config = None;
        assert_eq!(assemble_request(&values, &[]).unwrap(), None);
    }

    #[test]
    fn test_no_keyspace_and_no_tables_yields_no_request() {
        let mut values = values_with(TableSelection::None);
        values.table_keyspace = None;
        assert_eq!(assemble_request(&values, &[]).unwrap(), None);
    }

    #[test]
    fn test_unknown_single_table_is_reported() {
        let values = values_with(TableSelection::Single(SelectOption::new("gone", "sales.gone")));
        let err = assemble_request(&values, &[]).unwrap_err();
        assert!(matches!(err, BackupFormError::TableNotFound { table_uuid } if table_uuid == "gone"));
    }
}
