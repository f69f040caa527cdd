/// 訪問カウンター Lambdaエントリポイント
///
/// API Gateway（REST / HTTP API）またはLambda Function URL経由で呼び出され、
/// DynamoDBのカウンターをアトミックに加算（POST）または読み取り（GET）して返す。
///
/// # 環境変数
/// - COUNTER_TABLE: カウンターテーブル名（必須）
/// - DYNAMODB_ENDPOINT_URL: DynamoDBエンドポイントの上書き（任意）
/// - RUST_LOG: ログレベル（デフォルト: info）
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, Instrument};
use visit_counter::application::CounterHandler;
use visit_counter::domain::CounterResponse;
use visit_counter::infrastructure::{
    init_logging, CounterConfig, CounterRepository, DynamoCounterRepository,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // コールドスタート時に一度だけクライアントを作成し、ハンドラーに注入する
    let counter_handler = match CounterConfig::from_env().await {
        Ok(config) => {
            info!(table = config.table_name(), "カウンター関数を初期化");
            Some(CounterHandler::new(DynamoCounterRepository::new(
                config.client().clone(),
                config.table_name().to_string(),
            )))
        }
        Err(err) => {
            error!(error = %err, "カウンター設定の読み込みに失敗");
            None
        }
    };
    let counter_handler = counter_handler.as_ref();

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        let span = tracing::info_span!("invocation", request_id = %event.context.request_id);
        let response = respond(counter_handler, &event.payload)
            .instrument(span)
            .await;
        Ok::<CounterResponse, Error>(response)
    }))
    .await
}

/// 1回の呼び出しを処理
///
/// 設定読み込みに失敗している場合は500を返す。例外を投げずに必ずレスポンスを返却する。
async fn respond<CR>(counter_handler: Option<&CounterHandler<CR>>, payload: &Value) -> CounterResponse
where
    CR: CounterRepository,
{
    match counter_handler {
        Some(handler) => handler.handle(payload).await,
        None => CounterResponse::internal_error(),
    }
}
