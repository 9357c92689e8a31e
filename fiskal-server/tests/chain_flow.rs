//! 链追加、日结、导出、提交的端到端测试（嵌入式 RocksDB）

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};
use tempfile::TempDir;

use fiskal_server::closing::{CloseError, CloseOutcome, ClosingSweep, TenantCloseStatus};
use fiskal_server::db::models::{
    AuthorityCredentials, AuthorityEnvironment, FiscalConfig, NewTransaction, TenantStatus,
    Transaction,
};
use fiskal_server::db::repository::{
    ChainEntryRepository, ErrorLogRepository, FiscalConfigRepository, TransactionRepository,
    TransmissionLogRepository, ZReportRepository,
};
use fiskal_server::export::{ExportBuilder, ExportStore};
use fiskal_server::ledger::{ChainLedger, ChainVerification, INITIAL_SIGNATURE};
use fiskal_server::submission::{SubmissionClient, SubmitError};
use fiskal_server::{DailyCloser, db::define_schema};

const SIGN_TIMEOUT: Duration = Duration::from_secs(5);

async fn test_db() -> (TempDir, Surreal<Db>) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path().join("db")).await.unwrap();
    db.use_ns("fiskal").use_db("ledger").await.unwrap();
    define_schema(&db).await.unwrap();
    (tmp, db)
}

fn local_key_config(tenant_id: &str) -> FiscalConfig {
    FiscalConfig {
        tenant_id: tenant_id.to_string(),
        cash_register_id: format!("{}-reg-1", tenant_id),
        cert_serial_number: "0afc3e".into(),
        certificate_pem: None,
        signing_method: fiskal_sign::SigningMethod::LocalKey {
            private_key_pem: rcgen::KeyPair::generate().unwrap().serialize_pem(),
        },
        authority: AuthorityCredentials {
            participant_id: "AT-123".into(),
            user_id: "user".into(),
            secret: "s3cret".into(),
            environment: AuthorityEnvironment::Sandbox,
        },
        status: TenantStatus::Active,
        last_z_report: None,
    }
}

fn smartcard_config(tenant_id: &str) -> FiscalConfig {
    let mut config = local_key_config(tenant_id);
    config.signing_method = fiskal_sign::SigningMethod::RemoteProvider {
        provider: fiskal_sign::RemoteProviderKind::Smartcard,
        endpoint: "usb://0".into(),
        api_key: "-".into(),
    };
    config
}

fn ledger_for(db: &Surreal<Db>) -> ChainLedger {
    ChainLedger::new(
        ChainEntryRepository::new(db.clone()),
        TransactionRepository::new(db.clone()),
        ErrorLogRepository::new(db.clone()),
        SIGN_TIMEOUT,
    )
}

fn closer_for(db: &Surreal<Db>) -> DailyCloser {
    DailyCloser::new(
        ledger_for(db),
        TransactionRepository::new(db.clone()),
        ZReportRepository::new(db.clone()),
    )
}

fn millis_on(date: NaiveDate, offset_secs: u32) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() + (offset_secs as i64) * 1000
}

fn past_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

#[tokio::test]
async fn chain_links_and_hashes_are_recomputable() {
    let (_tmp, db) = test_db().await;
    let ledger = ledger_for(&db);
    let config = local_key_config("demo");

    for cents in [1000i64, 1550, 725] {
        ledger
            .record_transaction(
                &config,
                NewTransaction {
                    total_amount: Decimal::new(cents, 2),
                    timestamp: None,
                },
            )
            .await
            .unwrap();
    }

    let chain = ledger.full_chain("demo").await.unwrap();
    assert_eq!(chain.len(), 3);

    // 链首用哨兵，其后每条引用前一条的签名
    assert_eq!(chain[0].previous_signature, INITIAL_SIGNATURE);
    for i in 1..chain.len() {
        assert_eq!(chain[i].previous_signature, chain[i - 1].signature);
    }

    // 哈希可从存储字段独立重算
    let verification = ChainVerification::run(&chain);
    assert!(verification.chain_intact, "breaks: {:?}", verification.breaks);
    assert_eq!(verification.total_entries, 3);
}

#[tokio::test]
async fn recorded_transaction_is_stamped() {
    let (_tmp, db) = test_db().await;
    let ledger = ledger_for(&db);
    let config = local_key_config("demo");

    let tx = ledger
        .record_transaction(
            &config,
            NewTransaction {
                total_amount: Decimal::new(999, 2),
                timestamp: None,
            },
        )
        .await
        .unwrap();

    assert!(tx.chain_hash.is_some());
    assert!(tx.chain_signature.is_some());

    let chain = ledger.full_chain("demo").await.unwrap();
    assert_eq!(tx.chain_hash.as_deref(), Some(chain[0].hash.as_str()));
}

#[tokio::test]
async fn concurrent_appends_do_not_fork_the_chain() {
    let (_tmp, db) = test_db().await;
    let ledger = ledger_for(&db);
    let config = local_key_config("demo");

    let mut handles = Vec::new();
    for i in 0..8i64 {
        let ledger = ledger.clone();
        let config = config.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .record_transaction(
                    &config,
                    NewTransaction {
                        total_amount: Decimal::new(100 + i, 2),
                        timestamp: None,
                    },
                )
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let chain = ledger.full_chain("demo").await.unwrap();
    assert_eq!(chain.len(), 8);
    assert!(ChainVerification::run(&chain).chain_intact);

    // 没有两条条目引用同一个前签名（分叉的特征）
    let mut prev_sigs: Vec<&str> = chain.iter().map(|e| e.previous_signature.as_str()).collect();
    prev_sigs.sort_unstable();
    prev_sigs.dedup();
    assert_eq!(prev_sigs.len(), 8);
}

#[tokio::test]
async fn close_day_aggregates_and_finalizes() {
    let (_tmp, db) = test_db().await;
    let ledger = ledger_for(&db);
    let closer = closer_for(&db);
    let config = local_key_config("demo");
    let date = past_date();

    for (i, cents) in [1000i64, 1500, 500].iter().enumerate() {
        ledger
            .record_transaction(
                &config,
                NewTransaction {
                    total_amount: Decimal::new(*cents, 2),
                    timestamp: Some(millis_on(date, i as u32 * 60)),
                },
            )
            .await
            .unwrap();
    }

    let outcome = closer.close_day(&config, date).await.unwrap();
    let report = match outcome {
        CloseOutcome::Closed(r) => r,
        CloseOutcome::Skipped => panic!("expected a finalized report"),
    };

    assert_eq!(report.total_sales, Decimal::new(3000, 2));
    assert_eq!(report.transaction_count, 3);
    assert_eq!(report.report_date, "2025-03-01");

    // 日结条目链接到此前最后一笔交易的签名
    let chain = ledger.full_chain("demo").await.unwrap();
    assert_eq!(chain.len(), 4);
    assert_eq!(chain[3].previous_signature, chain[2].signature);
    assert_eq!(chain[3].signature, report.signature);
    assert!(ChainVerification::run(&chain).chain_intact);
}

#[tokio::test]
async fn close_day_without_transactions_is_skipped() {
    let (_tmp, db) = test_db().await;
    let closer = closer_for(&db);
    let ledger = ledger_for(&db);
    let config = local_key_config("demo");

    let outcome = closer.close_day(&config, past_date()).await.unwrap();
    assert!(matches!(outcome, CloseOutcome::Skipped));

    // 跳过是整体的：不上链、不落报告
    assert!(ledger.full_chain("demo").await.unwrap().is_empty());
    assert!(closer.list_reports("demo").await.unwrap().is_empty());
}

#[tokio::test]
async fn close_day_rejects_duplicates_and_future_dates() {
    let (_tmp, db) = test_db().await;
    let ledger = ledger_for(&db);
    let closer = closer_for(&db);
    let config = local_key_config("demo");
    let date = past_date();

    ledger
        .record_transaction(
            &config,
            NewTransaction {
                total_amount: Decimal::new(1000, 2),
                timestamp: Some(millis_on(date, 0)),
            },
        )
        .await
        .unwrap();

    closer.close_day(&config, date).await.unwrap();
    let err = closer.close_day(&config, date).await.unwrap_err();
    assert!(matches!(err, CloseError::AlreadyFinalized(_)));

    let future = chrono::Utc::now().date_naive() + chrono::Duration::days(2);
    let err = closer.close_day(&config, future).await.unwrap_err();
    assert!(matches!(err, CloseError::FutureDate(_)));
}

#[tokio::test]
async fn concurrent_close_days_leave_one_closing_entry() {
    let (_tmp, db) = test_db().await;
    let ledger = ledger_for(&db);
    let closer = closer_for(&db);
    let config = local_key_config("demo");
    let date = past_date();

    ledger
        .record_transaction(
            &config,
            NewTransaction {
                total_amount: Decimal::new(1000, 2),
                timestamp: Some(millis_on(date, 0)),
            },
        )
        .await
        .unwrap();

    let (a, b) = tokio::join!(closer.close_day(&config, date), closer.close_day(&config, date));

    // 恰好一个成功，另一个拿到 AlreadyFinalized
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    for result in [a, b] {
        if let Err(e) = result {
            assert!(matches!(e, CloseError::AlreadyFinalized(_)));
        }
    }

    // append-only 链上只有一条 closing 条目，报告也只有一份
    let chain = ledger.full_chain("demo").await.unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(closer.list_reports("demo").await.unwrap().len(), 1);
}

#[tokio::test]
async fn stalled_signer_times_out_and_releases_the_chain() {
    let (_tmp, db) = test_db().await;
    let ledger = ChainLedger::new(
        ChainEntryRepository::new(db.clone()),
        TransactionRepository::new(db.clone()),
        ErrorLogRepository::new(db.clone()),
        Duration::from_millis(300),
    );

    // 只接受连接、永不响应的签名服务
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let mut stalled = local_key_config("demo");
    stalled.signing_method = fiskal_sign::SigningMethod::RemoteProvider {
        provider: fiskal_sign::RemoteProviderKind::ATrust,
        endpoint,
        api_key: "key".into(),
    };

    let err = ledger
        .record_transaction(
            &stalled,
            NewTransaction {
                total_amount: Decimal::new(1000, 2),
                timestamp: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        fiskal_server::ledger::LedgerError::SignTimeout(_)
    ));

    // 超时不落任何链条目
    assert!(ledger.full_chain("demo").await.unwrap().is_empty());

    // 链锁已释放，同一条链上的后续追加不受影响
    let healthy = local_key_config("demo");
    let tx = ledger
        .record_transaction(
            &healthy,
            NewTransaction {
                total_amount: Decimal::new(500, 2),
                timestamp: None,
            },
        )
        .await
        .unwrap();
    assert!(tx.chain_hash.is_some());
    assert_eq!(ledger.full_chain("demo").await.unwrap().len(), 1);
}

#[tokio::test]
async fn export_is_byte_identical_without_new_entries() {
    let (_tmp, db) = test_db().await;
    let ledger = ledger_for(&db);
    let closer = closer_for(&db);
    let config = local_key_config("demo");
    let date = past_date();

    for cents in [1000i64, 2000] {
        ledger
            .record_transaction(
                &config,
                NewTransaction {
                    total_amount: Decimal::new(cents, 2),
                    timestamp: Some(millis_on(date, 0)),
                },
            )
            .await
            .unwrap();
    }
    closer.close_day(&config, date).await.unwrap();

    let builder = ExportBuilder::new(
        ChainEntryRepository::new(db.clone()),
        ZReportRepository::new(db.clone()),
    );

    let first = builder.build(&config).await.unwrap();
    let second = builder.build(&config).await.unwrap();
    assert_eq!(first.content, second.content);
    assert_eq!(first.created_at, second.created_at);

    let text = String::from_utf8(first.content).unwrap();
    assert!(text.starts_with("FISCAL-CHAIN-EXPORT;V1\n"));
    assert!(text.contains("ENTRIES;3"));
    assert!(text.contains("ZREPORTS;1"));
    assert!(text.contains("Z;2025-03-01;30.00;2;"));
}

#[tokio::test]
async fn export_of_empty_chain_fails() {
    let (_tmp, db) = test_db().await;
    let builder = ExportBuilder::new(
        ChainEntryRepository::new(db.clone()),
        ZReportRepository::new(db.clone()),
    );

    let err = builder.build(&local_key_config("demo")).await.unwrap_err();
    assert!(matches!(
        err,
        fiskal_server::export::ExportError::EmptyChain(_)
    ));
}

#[tokio::test]
async fn submit_without_export_is_not_found_and_not_logged() {
    let (tmp, db) = test_db().await;
    let log = TransmissionLogRepository::new(db.clone());
    let client = SubmissionClient::new(
        "http://127.0.0.1:1/sandbox".into(),
        "http://127.0.0.1:1/production".into(),
        Duration::from_secs(1),
        ExportStore::new(tmp.path()),
        log.clone(),
    )
    .unwrap();

    let err = client
        .submit(&local_key_config("demo"), "2025-03-01")
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::NotFound { .. }));

    // NotFound 在任何网络活动之前返回，也不落提交日志
    assert!(log.list("demo").await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_submission_is_logged_before_error_propagates() {
    let (tmp, db) = test_db().await;
    let store = ExportStore::new(tmp.path());
    store.save("demo", "2025-03-01", 1000, b"EXPORT").unwrap();

    let log = TransmissionLogRepository::new(db.clone());
    // 端口 1 不可达，强制传输层错误
    let client = SubmissionClient::new(
        "http://127.0.0.1:1/sandbox".into(),
        "http://127.0.0.1:1/production".into(),
        Duration::from_secs(1),
        store,
        log.clone(),
    )
    .unwrap();

    let err = client
        .submit(&local_key_config("demo"), "2025-03-01")
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Network(_)));

    let entries = log.list("demo").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].status,
        fiskal_server::db::models::TransmissionStatus::Failed
    );
}

#[tokio::test]
async fn sweep_isolates_failing_tenants() {
    let (_tmp, db) = test_db().await;
    let configs = FiscalConfigRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());
    let ledger = ledger_for(&db);
    let date = past_date();

    // alpha/beta 正常签名，gamma 的签名方式未接入
    let alpha = local_key_config("alpha");
    let beta = local_key_config("beta");
    let gamma = smartcard_config("gamma");
    for config in [&alpha, &beta, &gamma] {
        configs.create(config.clone()).await.unwrap();
    }

    ledger
        .record_transaction(
            &alpha,
            NewTransaction {
                total_amount: Decimal::new(1000, 2),
                timestamp: Some(millis_on(date, 0)),
            },
        )
        .await
        .unwrap();

    // gamma 无法上链，交易直接入库以触发日结时的签名失败
    transactions
        .insert(Transaction {
            transaction_id: 1,
            tenant_id: "gamma".into(),
            total_amount: Decimal::new(500, 2),
            timestamp: millis_on(date, 0),
            chain_hash: None,
            chain_signature: None,
            created_at: millis_on(date, 0),
        })
        .await
        .unwrap();

    let sweep = ClosingSweep::new(
        configs,
        closer_for(&db),
        ErrorLogRepository::new(db.clone()),
        Duration::from_secs(10),
    );
    let mut outcomes = sweep.run(date).await;
    outcomes.sort_by(|a, b| a.tenant_id.cmp(&b.tenant_id));

    // 每个租户恰好一条结果
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].tenant_id, "alpha");
    assert_eq!(outcomes[0].status, TenantCloseStatus::Closed);
    assert_eq!(outcomes[1].tenant_id, "beta");
    assert_eq!(outcomes[1].status, TenantCloseStatus::Skipped);
    assert_eq!(outcomes[2].tenant_id, "gamma");
    assert_eq!(outcomes[2].status, TenantCloseStatus::Failed);

    // 失败在传播前已落错误日志
    let errors = ErrorLogRepository::new(db.clone())
        .list("gamma")
        .await
        .unwrap();
    assert!(!errors.is_empty());
}

#[tokio::test]
async fn sweep_names_tenant_even_when_close_panics() {
    let (_tmp, db) = test_db().await;
    let configs = FiscalConfigRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());
    let date = past_date();

    configs.create(local_key_config("delta")).await.unwrap();

    // 两笔 Decimal::MAX 求和溢出，让日结任务 panic
    for id in [1i64, 2] {
        transactions
            .insert(Transaction {
                transaction_id: id,
                tenant_id: "delta".into(),
                total_amount: Decimal::MAX,
                timestamp: millis_on(date, id as u32),
                chain_hash: None,
                chain_signature: None,
                created_at: millis_on(date, 0),
            })
            .await
            .unwrap();
    }

    let sweep = ClosingSweep::new(
        configs,
        closer_for(&db),
        ErrorLogRepository::new(db.clone()),
        Duration::from_secs(10),
    );
    let outcomes = sweep.run(date).await;

    // panic 的任务也产出一条指名租户的结果
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].tenant_id, "delta");
    assert_eq!(outcomes[0].status, TenantCloseStatus::Failed);
    assert!(
        outcomes[0]
            .detail
            .as_deref()
            .unwrap_or_default()
            .contains("panicked")
    );

    let errors = ErrorLogRepository::new(db.clone())
        .list("delta")
        .await
        .unwrap();
    assert!(!errors.is_empty());
}

#[tokio::test]
async fn suspended_tenant_cannot_append() {
    let (_tmp, db) = test_db().await;
    let ledger = ledger_for(&db);
    let mut config = local_key_config("demo");
    config.status = TenantStatus::Suspended;

    let err = ledger
        .record_transaction(
            &config,
            NewTransaction {
                total_amount: Decimal::new(1000, 2),
                timestamp: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        fiskal_server::ledger::LedgerError::TenantSuspended(_)
    ));
    assert!(ledger.full_chain("demo").await.unwrap().is_empty());
}
