/// ログ基盤モジュール
///
/// Lambda環境向けの構造化ログ設定を提供する。
/// tracingクレートを使用し、JSON形式での出力をサポートする。
use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログサブスクライバー初期化用の同期プリミティブ
static INIT: Once = Once::new();

/// Lambda環境向けのログサブスクライバーを初期化する
///
/// JSON形式での構造化ログ出力を設定し、環境変数`RUST_LOG`または
/// デフォルトのログレベル（info）でフィルタリングを行う。
/// 複数回呼び出しても最初の呼び出しのみ初期化を実行する。
/// 既に別のグローバルサブスクライバーが設定されている場合はpanicする。
///
/// # 使用例
/// ```ignore
/// use visit_counter::infrastructure::init_logging;
///
/// init_logging();
/// tracing::info!("counter function started");
/// ```
pub fn init_logging() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        // CloudWatch向けのJSONレイヤー
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .flatten_event(true)
            .with_current_span(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .init();
    });
}

/// テスト用のログサブスクライバーを初期化する（人間が読みやすい形式）
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}
