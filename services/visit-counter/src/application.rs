// アプリケーション層モジュール
pub mod counter_handler;
pub mod provision_handler;

// 再エクスポート
pub use counter_handler::CounterHandler;
pub use provision_handler::{ProvisionHandler, ProvisionOptions, ProvisionReport};
