use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info};

use crate::types::{
    BackupPayload, BackupTaskResponse, CustomerConfigResponse, CustomerResponse, StorageConfig,
    TableResponse, UniverseTable,
};

const AUTH_HEADER: &str = "X-AUTH-YW-API-TOKEN";

#[mockall::automock]
#[async_trait]
pub trait PlatformClientTrait: Send + Sync {
    async fn check_connection(&self) -> Result<String>;
    async fn list_storage_configs(&self) -> Result<Vec<StorageConfig>>;
    async fn list_universe_tables(&self, universe_uuid: &str) -> Result<Vec<UniverseTable>>;
    async fn create_table_backup(
        &self,
        universe_uuid: &str,
        table_uuid: &str,
        payload: &BackupPayload,
    ) -> Result<String>;
    async fn create_universe_backup(
        &self,
        universe_uuid: &str,
        payload: &BackupPayload,
    ) -> Result<String>;
}

/// REST client for a YugabyteDB Anywhere platform.
pub struct PlatformClient {
    client: Client,
    base_url: String,
    customer_uuid: String,
    api_token: String,
}

impl PlatformClient {
    pub fn new(base_url: &str, customer_uuid: &str, api_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            customer_uuid: customer_uuid.to_string(),
            api_token: api_token.to_string(),
        }
    }

    fn customer_url(&self, path: &str) -> String {
        format!(
            "{}/api/v1/customers/{}{}",
            self.base_url, self.customer_uuid, path
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTH_HEADER, &self.api_token)
    }

    async fn checked(response: Response, action: &str) -> Result<Response> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("{} failed ({}): {}", action, status, error_text));
        }
        Ok(response)
    }

    async fn submit_backup(&self, url: &str, payload: &BackupPayload, action: &str) -> Result<String> {
        debug!(url, payload = ?payload, "Submitting backup request");
        let response = self
            .authorized(self.client.put(url))
            .json(payload)
            .send()
            .await?;
        let response = Self::checked(response, action).await?;

        let result: BackupTaskResponse = response.json().await?;
        result
            .task_uuid
            .or(result.schedule_uuid)
            .ok_or_else(|| anyhow!("No task or schedule UUID returned from {} request", action))
    }
}

#[async_trait]
impl PlatformClientTrait for PlatformClient {
    async fn check_connection(&self) -> Result<String> {
        let response = self
            .authorized(self.client.get(self.customer_url("")))
            .send()
            .await?;
        let response = Self::checked(response, "Platform login check").await?;

        let customer: CustomerResponse = response.json().await?;
        let name = customer
            .name
            .or(customer.code)
            .unwrap_or_else(|| self.customer_uuid.clone());
        info!(customer = %name, "Connected to platform");
        Ok(name)
    }

    async fn list_storage_configs(&self) -> Result<Vec<StorageConfig>> {
        let response = self
            .authorized(self.client.get(self.customer_url("/configs")))
            .send()
            .await?;
        let response = Self::checked(response, "Listing storage configs").await?;

        let configs: Vec<CustomerConfigResponse> = response.json().await?;
        Ok(configs
            .into_iter()
            .filter(|c| c.config_type == "STORAGE")
            .map(|c| StorageConfig::new(&c.config_uuid, &c.name))
            .collect())
    }

    async fn list_universe_tables(&self, universe_uuid: &str) -> Result<Vec<UniverseTable>> {
        let url = self.customer_url(&format!("/universes/{}/tables", universe_uuid));
        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::checked(response, "Listing universe tables").await?;

        let tables: Vec<TableResponse> = response.json().await?;
        Ok(tables
            .into_iter()
            .map(|t| UniverseTable {
                table_uuid: t.table_uuid,
                table_name: t.table_name,
                key_space: t.key_space,
            })
            .collect())
    }

    async fn create_table_backup(
        &self,
        universe_uuid: &str,
        table_uuid: &str,
        payload: &BackupPayload,
    ) -> Result<String> {
        let url = self.customer_url(&format!(
            "/universes/{}/tables/{}/create_backup",
            universe_uuid, table_uuid
        ));
        self.submit_backup(&url, payload, "Create table backup").await
    }

    async fn create_universe_backup(
        &self,
        universe_uuid: &str,
        payload: &BackupPayload,
    ) -> Result<String> {
        let url = self.customer_url(&format!("/universes/{}/multi_table_backup", universe_uuid));
        self.submit_backup(&url, payload, "Create universe backup").await
    }
}

/// Reads go to the wrapped client, backup requests are only logged.
pub struct DryRunClient {
    inner: Box<dyn PlatformClientTrait>,
}

impl DryRunClient {
    pub fn new(inner: Box<dyn PlatformClientTrait>) -> Self {
        Self { inner }
    }

    fn fake_task_uuid() -> String {
        format!("dry-run-backup-{}", chrono::Utc::now().timestamp())
    }
}

#[async_trait]
impl PlatformClientTrait for DryRunClient {
    async fn check_connection(&self) -> Result<String> {
        self.inner.check_connection().await
    }

    async fn list_storage_configs(&self) -> Result<Vec<StorageConfig>> {
        self.inner.list_storage_configs().await
    }

    async fn list_universe_tables(&self, universe_uuid: &str) -> Result<Vec<UniverseTable>> {
        self.inner.list_universe_tables(universe_uuid).await
    }

    async fn create_table_backup(
        &self,
        universe_uuid: &str,
        table_uuid: &str,
        payload: &BackupPayload,
    ) -> Result<String> {
        let body = serde_json::to_string(payload)?;
        info!(
            universe = universe_uuid,
            table = table_uuid,
            payload = %body,
            "Dry run: table backup not sent"
        );
        Ok(Self::fake_task_uuid())
    }

    async fn create_universe_backup(
        &self,
        universe_uuid: &str,
        payload: &BackupPayload,
    ) -> Result<String> {
        let body = serde_json::to_string(payload)?;
        info!(
            universe = universe_uuid,
            payload = %body,
            "Dry run: universe backup not sent"
        );
        Ok(Self::fake_task_uuid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_url_strips_trailing_slash() {
        let client = PlatformClient::new("https://yba.example.com/", "cust-1", "token");
        assert_eq!(
            client.customer_url("/universes/u1/tables"),
            "https://yba.example.com/api/v1/customers/cust-1/universes/u1/tables"
        );
    }

    #[tokio::test]
    async fn test_dry_run_does_not_forward_backups() {
        let mut inner = MockPlatformClientTrait::new();
        inner.expect_create_universe_backup().never();
        inner
            .expect_list_universe_tables()
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let client = DryRunClient::new(Box::new(inner));
        let payload = BackupPayload {
            storage_config_uuid: "c1".to_string(),
            sse: false,
            transactional_backup: false,
            scheduling_frequency: None,
            cron_expression: None,
            keyspace: Some("sales".to_string()),
            table_uuid_list: None,
            table_name: None,
            action_type: None,
        };

        let task = client.create_universe_backup("u1", &payload).await.unwrap();
        assert!(task.starts_with("dry-run-backup-"));
        assert!(client.list_universe_tables("u1").await.unwrap().is_empty());
    }
}
