/// カウンターテーブルのプロビジョニング操作
///
/// テーブル作成と初期レコード投入を行う。どちらも再実行しても安全で、
/// 既存テーブルや既存カウンターを壊さない。
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
    ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{COUNT_ATTRIBUTE, CounterRecord, ID_ATTRIBUTE};
use crate::infrastructure::counter_repository::sdk_error_detail;

/// プロビジョニング操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProvisionError {
    /// CreateTableに失敗
    #[error("Create table failed: {0}")]
    CreateTableFailed(String),

    /// DescribeTableに失敗
    #[error("Describe table failed: {0}")]
    DescribeTableFailed(String),

    /// 待機上限までにテーブルがACTIVEにならなかった
    #[error("Table {table} did not become active after {attempts} attempts")]
    TableNotActive { table: String, attempts: u32 },

    /// 初期レコードの書き込みに失敗
    #[error("Seed record failed: {0}")]
    SeedFailed(String),
}

/// テーブル作成の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateTableOutcome {
    /// 新規作成した
    Created,
    /// 既に存在していた
    AlreadyExists,
}

/// 初期レコード投入の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// 新規に投入した
    Seeded,
    /// 既にレコードがあったため何もしなかった
    AlreadySeeded,
}

/// テーブルプロビジョニング用トレイト
#[async_trait]
pub trait TableProvisioner: Send + Sync {
    /// `id`(S)をパーティションキーとするテーブルを作成
    async fn create_table(&self, table_name: &str) -> Result<CreateTableOutcome, ProvisionError>;

    /// テーブルがACTIVEになるまで待機
    async fn wait_until_active(&self, table_name: &str) -> Result<(), ProvisionError>;

    /// 初期レコードを投入（既存レコードは上書きしない）
    async fn seed_record(
        &self,
        table_name: &str,
        record: &CounterRecord,
    ) -> Result<SeedOutcome, ProvisionError>;
}

/// ACTIVE待機のデフォルトポーリング間隔
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// ACTIVE待機のデフォルト試行回数
const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// TableProvisionerのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoTableProvisioner {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// DescribeTableのポーリング間隔
    poll_interval: Duration,
    /// DescribeTableの最大試行回数
    max_attempts: u32,
}

impl DynamoTableProvisioner {
    /// 新しいDynamoTableProvisionerを作成
    pub fn new(client: DynamoDbClient) -> Self {
        Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// ACTIVE待機のポーリング設定を変更
    pub fn with_polling(mut self, poll_interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_attempts = max_attempts.max(1);
        self
    }
}

#[async_trait]
impl TableProvisioner for DynamoTableProvisioner {
    async fn create_table(&self, table_name: &str) -> Result<CreateTableOutcome, ProvisionError> {
        let key_schema = KeySchemaElement::builder()
            .attribute_name(ID_ATTRIBUTE)
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| ProvisionError::CreateTableFailed(e.to_string()))?;

        let attribute_definition = AttributeDefinition::builder()
            .attribute_name(ID_ATTRIBUTE)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .map_err(|e| ProvisionError::CreateTableFailed(e.to_string()))?;

        let result = self
            .client
            .create_table()
            .table_name(table_name)
            .key_schema(key_schema)
            .attribute_definitions(attribute_definition)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await;

        match result {
            Ok(_) => {
                info!(table = table_name, "テーブルを作成");
                Ok(CreateTableOutcome::Created)
            }
            // 既存テーブルはエラーにしない
            Err(err) if err.as_service_error().is_some_and(|e| e.is_resource_in_use_exception()) => {
                info!(table = table_name, "テーブルは既に存在");
                Ok(CreateTableOutcome::AlreadyExists)
            }
            Err(err) => Err(ProvisionError::CreateTableFailed(sdk_error_detail(&err))),
        }
    }

    async fn wait_until_active(&self, table_name: &str) -> Result<(), ProvisionError> {
        for attempt in 1..=self.max_attempts {
            let output = self
                .client
                .describe_table()
                .table_name(table_name)
                .send()
                .await
                .map_err(|e| ProvisionError::DescribeTableFailed(sdk_error_detail(&e)))?;

            let status = output.table().and_then(|table| table.table_status());
            if status == Some(&TableStatus::Active) {
                return Ok(());
            }

            debug!(
                table = table_name,
                attempt = attempt,
                status = ?status,
                "テーブルがACTIVEになるのを待機中"
            );
            tokio::time::sleep(self.poll_interval).await;
        }

        Err(ProvisionError::TableNotActive {
            table: table_name.to_string(),
            attempts: self.max_attempts,
        })
    }

    async fn seed_record(
        &self,
        table_name: &str,
        record: &CounterRecord,
    ) -> Result<SeedOutcome, ProvisionError> {
        let result = self
            .client
            .put_item()
            .table_name(table_name)
            .item(ID_ATTRIBUTE, AttributeValue::S(record.id.clone()))
            .item(COUNT_ATTRIBUTE, AttributeValue::N(record.count.to_string()))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", ID_ATTRIBUTE)
            .send()
            .await;

        match result {
            Ok(_) => Ok(SeedOutcome::Seeded),
            // 既存カウンターはリセットしない
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Ok(SeedOutcome::AlreadySeeded)
            }
            Err(err) => Err(ProvisionError::SeedFailed(sdk_error_detail(&err))),
        }
    }
}
