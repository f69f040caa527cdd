/// プロビジョニングハンドラー
///
/// カウンターテーブルの作成と初期レコード投入を順に実行する。
/// カウンター関数のデプロイ前に一度だけ実行する想定だが、再実行しても安全。
use tracing::info;

use crate::domain::CounterRecord;
use crate::infrastructure::{CreateTableOutcome, ProvisionError, SeedOutcome, TableProvisioner};

/// プロビジョニングの実行オプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// 対象テーブル名
    pub table_name: String,
    /// 初期カウント（レコードが既にある場合は使われない）
    pub initial_count: u64,
    /// テーブル作成をスキップし、レコード投入のみ行う
    pub skip_create: bool,
}

/// プロビジョニング結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionReport {
    /// テーブル作成の結果（スキップ時はNone）
    pub table: Option<CreateTableOutcome>,
    /// 初期レコード投入の結果
    pub seed: SeedOutcome,
}

/// テーブル作成と初期レコード投入を行うハンドラー
pub struct ProvisionHandler<TP>
where
    TP: TableProvisioner,
{
    provisioner: TP,
}

impl<TP> ProvisionHandler<TP>
where
    TP: TableProvisioner,
{
    /// 新しいProvisionHandlerを作成
    pub fn new(provisioner: TP) -> Self {
        Self { provisioner }
    }

    /// プロビジョニングを実行
    ///
    /// # 処理フロー
    /// 1. テーブルを作成（既存なら何もしない）し、ACTIVEになるまで待機
    /// 2. `{ id: "visits", count: initial_count }`を投入（既存なら何もしない）
    pub async fn run(&self, options: &ProvisionOptions) -> Result<ProvisionReport, ProvisionError> {
        let table = if options.skip_create {
            None
        } else {
            let outcome = self.provisioner.create_table(&options.table_name).await?;
            self.provisioner
                .wait_until_active(&options.table_name)
                .await?;
            Some(outcome)
        };

        let record = CounterRecord::visits(options.initial_count);
        let seed = self
            .provisioner
            .seed_record(&options.table_name, &record)
            .await?;

        info!(
            table = %options.table_name,
            table_outcome = ?table,
            seed_outcome = ?seed,
            "プロビジョニング完了"
        );

        Ok(ProvisionReport { table, seed })
    }
}
