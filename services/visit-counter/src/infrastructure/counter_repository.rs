/// DynamoDBでカウンターレコードを操作するカウンターリポジトリ
///
/// 加算はDynamoDBの`ADD`式で行い、読み取り→書き込みの2段階更新は行わない。
use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::{COUNT_ATTRIBUTE, ID_ATTRIBUTE};

/// リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CounterRepositoryError {
    /// カウンターレコードが存在しない（自動作成はしない）
    #[error("Counter record not found: {0}")]
    RecordNotFound(String),

    /// ストアへの到達失敗、スロットリング、テーブル欠落など
    #[error("Counter store unavailable: {0}")]
    StoreUnavailable(String),

    /// count属性が欠落、または非負整数として解釈できない
    #[error("Malformed counter value: {0}")]
    MalformedStoredValue(String),
}

/// カウンター永続化用トレイト
///
/// 実際のDynamoDB実装とテスト用のインメモリ実装を差し替えられるようにする。
#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// カウンターに`by`をアトミックに加算し、加算後の値を返す
    ///
    /// # 戻り値
    /// * 成功時は`Ok(加算後のcount)`
    /// * レコードが無い場合は`Err(CounterRepositoryError::RecordNotFound)`
    async fn increment(&self, counter_id: &str, by: u64) -> Result<u64, CounterRepositoryError>;

    /// 現在のカウントを取得（変更しない）
    async fn get(&self, counter_id: &str) -> Result<u64, CounterRepositoryError>;
}

/// SDKエラーを原因の連鎖まで含めた文字列にする
///
/// `DisplayErrorContext`でsourceの連鎖をたどり、通信エラーの原因も残す。
pub(crate) fn sdk_error_detail<E>(err: &E) -> String
where
    E: std::error::Error,
{
    DisplayErrorContext(err).to_string()
}

/// 加算用のUpdateExpression
const INCREMENT_EXPRESSION: &str = "ADD #count :increment";

/// 既存レコードにのみ加算するための条件式
const RECORD_EXISTS_CONDITION: &str = "attribute_exists(#id)";

/// CounterRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoCounterRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// カウンターテーブル名
    table_name: String,
}

impl DynamoCounterRepository {
    /// 新しいDynamoCounterRepositoryを作成
    ///
    /// # 引数
    /// * `client` - DynamoDBクライアント
    /// * `table_name` - カウンターテーブルの名前
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// UpdateItemのエラーをリポジトリエラーに分類
    ///
    /// 条件式の不成立はレコード欠落を意味する。それ以外はすべてストア障害として扱う。
    fn classify_update_error<R>(
        counter_id: &str,
        err: SdkError<UpdateItemError, R>,
    ) -> CounterRepositoryError
    where
        R: std::fmt::Debug,
    {
        match err.as_service_error() {
            Some(service_err) if service_err.is_conditional_check_failed_exception() => {
                CounterRepositoryError::RecordNotFound(counter_id.to_string())
            }
            _ => CounterRepositoryError::StoreUnavailable(sdk_error_detail(&err)),
        }
    }

    /// 属性マップからcountを取り出す
    fn parse_count(
        attributes: Option<&HashMap<String, AttributeValue>>,
    ) -> Result<u64, CounterRepositoryError> {
        let value = attributes
            .and_then(|attrs| attrs.get(COUNT_ATTRIBUTE))
            .ok_or_else(|| {
                CounterRepositoryError::MalformedStoredValue(format!(
                    "Missing {COUNT_ATTRIBUTE} attribute"
                ))
            })?;

        let number = value.as_n().map_err(|_| {
            CounterRepositoryError::MalformedStoredValue(format!(
                "{COUNT_ATTRIBUTE} attribute is not a number"
            ))
        })?;

        number.parse::<u64>().map_err(|_| {
            CounterRepositoryError::MalformedStoredValue(format!(
                "Invalid {COUNT_ATTRIBUTE} value: {number}"
            ))
        })
    }
}

#[async_trait]
impl CounterRepository for DynamoCounterRepository {
    async fn increment(&self, counter_id: &str, by: u64) -> Result<u64, CounterRepositoryError> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(ID_ATTRIBUTE, AttributeValue::S(counter_id.to_string()))
            .update_expression(INCREMENT_EXPRESSION)
            .condition_expression(RECORD_EXISTS_CONDITION)
            .expression_attribute_names("#id", ID_ATTRIBUTE)
            .expression_attribute_names("#count", COUNT_ATTRIBUTE)
            .expression_attribute_values(":increment", AttributeValue::N(by.to_string()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await;

        match result {
            // 加算後の値は同じUpdateItemの結果から読む
            Ok(output) => Self::parse_count(output.attributes()),
            Err(err) => Err(Self::classify_update_error(counter_id, err)),
        }
    }

    async fn get(&self, counter_id: &str) -> Result<u64, CounterRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ID_ATTRIBUTE, AttributeValue::S(counter_id.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| CounterRepositoryError::StoreUnavailable(sdk_error_detail(&e)))?;

        match output.item {
            Some(item) => Self::parse_count(Some(&item)),
            None => Err(CounterRepositoryError::RecordNotFound(counter_id.to_string())),
        }
    }
}
