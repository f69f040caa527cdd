/// カウンターテーブルへの接続設定
///
/// 環境変数:
/// - COUNTER_TABLE: カウンターテーブル名（必須）
/// - DYNAMODB_ENDPOINT_URL: DynamoDBエンドポイントの上書き（任意、DynamoDB Local用）
/// - AWS認証情報・リージョン: aws-configにより自動読み込み
use aws_sdk_dynamodb::config::retry::RetryConfig;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

/// テーブル名の環境変数
pub const TABLE_ENV_VAR: &str = "COUNTER_TABLE";

/// エンドポイント上書きの環境変数
pub const ENDPOINT_ENV_VAR: &str = "DYNAMODB_ENDPOINT_URL";

/// カウンター設定のエラー型
#[derive(Debug, Error)]
pub enum CounterConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// テーブル名とクライアントを持つカウンター設定
#[derive(Debug, Clone)]
pub struct CounterConfig {
    /// DynamoDBクライアントインスタンス
    client: DynamoDbClient,
    /// カウンターテーブル名
    table_name: String,
}

impl CounterConfig {
    /// 環境からAWS設定とテーブル名を読み込んでCounterConfigを作成
    pub async fn from_env() -> Result<Self, CounterConfigError> {
        let table_name = table_name_from_env()?;
        let client = build_client(endpoint_url_from_env()).await;

        Ok(Self { client, table_name })
    }

    /// 明示的な値で新しいCounterConfigを作成（テスト用）
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// DynamoDBクライアントへの参照を取得
    pub fn client(&self) -> &DynamoDbClient {
        &self.client
    }

    /// カウンターテーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// DynamoDBクライアントを作成
///
/// `endpoint_url`が指定された場合はそのエンドポイントに接続する。
/// SDKの自動リトライは無効化し、失敗はそのまま呼び出し元に返す。
pub async fn build_client(endpoint_url: Option<String>) -> DynamoDbClient {
    // 環境からAWS設定を読み込み（認証情報、リージョンなど）
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let mut builder = aws_sdk_dynamodb::config::Builder::from(&aws_config)
        .retry_config(RetryConfig::disabled());
    if let Some(url) = endpoint_url {
        builder = builder.endpoint_url(url);
    }

    DynamoDbClient::from_conf(builder.build())
}

/// COUNTER_TABLEを読み込む（空文字列は未設定扱い）
fn table_name_from_env() -> Result<String, CounterConfigError> {
    non_empty_env(TABLE_ENV_VAR)
        .ok_or_else(|| CounterConfigError::MissingEnvVar(TABLE_ENV_VAR.to_string()))
}

/// DYNAMODB_ENDPOINT_URLを読み込む
fn endpoint_url_from_env() -> Option<String> {
    non_empty_env(ENDPOINT_ENV_VAR)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
