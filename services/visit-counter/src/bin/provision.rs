/// カウンターテーブルのプロビジョニングスクリプト
///
/// テーブル（パーティションキー`id`）を作成し、`{ id: "visits", count: 0 }`を投入する。
/// 既存テーブル・既存カウンターには手を加えないため、何度実行しても安全。
///
/// # ローカル実行
/// ```bash
/// export COUNTER_TABLE=lambda-apigateway
///
/// # テーブル作成と初期レコード投入
/// cargo run --bin provision
///
/// # DynamoDB Localに対して実行
/// cargo run --bin provision -- --endpoint-url http://localhost:8000
///
/// # 既存テーブルにレコードだけ投入
/// cargo run --bin provision -- --skip-create
/// ```
use clap::Parser;
use lambda_runtime::Error;
use std::time::Duration;
use tracing::{error, info};
use visit_counter::application::{ProvisionHandler, ProvisionOptions};
use visit_counter::infrastructure::{build_client, init_logging, DynamoTableProvisioner};

/// コマンドライン引数
#[derive(Parser, Debug)]
#[command(name = "provision")]
#[command(about = "訪問カウンターのDynamoDBテーブルを作成し、初期レコードを投入")]
struct CliArgs {
    /// カウンターテーブル名
    #[arg(long, short = 't', env = "COUNTER_TABLE")]
    table: String,

    /// 初期カウント（既存レコードがある場合は無視される）
    #[arg(long, default_value_t = 0)]
    initial_count: u64,

    /// テーブル作成をスキップし、レコード投入のみ行う
    #[arg(long)]
    skip_create: bool,

    /// DynamoDBエンドポイントの上書き（DynamoDB Local等）
    #[arg(long, env = "DYNAMODB_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// テーブルがACTIVEになるまでのポーリング間隔（秒）
    #[arg(long, default_value_t = 2)]
    poll_interval_secs: u64,

    /// ACTIVE待機の最大試行回数
    #[arg(long, default_value_t = 30)]
    max_attempts: u32,
}

impl CliArgs {
    fn provision_options(&self) -> ProvisionOptions {
        ProvisionOptions {
            table_name: self.table.clone(),
            initial_count: self.initial_count,
            skip_create: self.skip_create,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let args = CliArgs::parse();
    info!(
        table = %args.table,
        endpoint_url = ?args.endpoint_url,
        skip_create = args.skip_create,
        "プロビジョニング開始"
    );

    let client = build_client(args.endpoint_url.clone()).await;
    let provisioner = DynamoTableProvisioner::new(client).with_polling(
        Duration::from_secs(args.poll_interval_secs),
        args.max_attempts,
    );

    match ProvisionHandler::new(provisioner)
        .run(&args.provision_options())
        .await
    {
        Ok(report) => {
            info!(
                table_outcome = ?report.table,
                seed_outcome = ?report.seed,
                "プロビジョニング成功"
            );
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "プロビジョニング失敗");
            Err(err.into())
        }
    }
}
