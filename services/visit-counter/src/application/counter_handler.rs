/// カウンターハンドラー
///
/// 呼び出しイベントを解釈し、カウンターの加算または読み取りを実行して
/// プロキシ統合レスポンスを組み立てる。
use serde_json::Value;
use tracing::{error, info, warn};

use crate::domain::{CounterAction, CounterResponse, VISITS_COUNTER_ID};
use crate::infrastructure::{CounterRepository, CounterRepositoryError};

/// 訪問カウンターへのリクエストを処理するハンドラー
///
/// リポジトリは呼び出し側から注入する。ハンドラー自身は状態を持たない。
pub struct CounterHandler<CR>
where
    CR: CounterRepository,
{
    /// カウンターリポジトリ
    counter_repo: CR,
}

impl<CR> CounterHandler<CR>
where
    CR: CounterRepository,
{
    /// 新しいCounterHandlerを作成
    pub fn new(counter_repo: CR) -> Self {
        Self { counter_repo }
    }

    /// 呼び出しイベントを処理
    ///
    /// # 処理フロー
    /// 1. イベントのHTTPメソッドからアクションを決定
    /// 2. POST（またはメソッド無し）ならアトミックに1加算、GET/HEADなら読み取りのみ
    /// 3. 成功時は200とカウント（HEADは空ボディ）、失敗時は5xxとエラーメッセージを返却
    ///
    /// ストア呼び出しは1回だけで、リトライはしない。
    pub async fn handle(&self, event: &Value) -> CounterResponse {
        let action = CounterAction::from_event(event);

        let result = match &action {
            CounterAction::Increment => self.counter_repo.increment(VISITS_COUNTER_ID, 1).await,
            CounterAction::Read | CounterAction::Head => {
                self.counter_repo.get(VISITS_COUNTER_ID).await
            }
            CounterAction::Unsupported(method) => {
                warn!(method = %method, "未対応のHTTPメソッド");
                return CounterResponse::method_not_allowed(method);
            }
        };

        match result {
            Ok(count) => {
                info!(
                    counter_id = VISITS_COUNTER_ID,
                    action = action.as_str(),
                    count = count,
                    "カウンター処理完了"
                );
                let response = CounterResponse::ok(count);
                if action.omits_body() {
                    response.without_body()
                } else {
                    response
                }
            }
            Err(err) => {
                let response = Self::error_response(&err);
                error!(
                    counter_id = VISITS_COUNTER_ID,
                    action = action.as_str(),
                    status_code = response.status_code,
                    error = %err,
                    "カウンター処理失敗"
                );
                response
            }
        }
    }

    /// リポジトリエラーをレスポンスに変換
    ///
    /// - RecordNotFound / MalformedStoredValue: 500
    /// - StoreUnavailable: 503
    pub fn error_response(err: &CounterRepositoryError) -> CounterResponse {
        let status_code = match err {
            CounterRepositoryError::RecordNotFound(_)
            | CounterRepositoryError::MalformedStoredValue(_) => 500,
            CounterRepositoryError::StoreUnavailable(_) => 503,
        };
        CounterResponse::error(status_code, err.to_string())
    }
}
