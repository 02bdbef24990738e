// ==========================================
// 端到端测试: 文件导入 → 分析 → 分配 → 结果导出
// ==========================================

mod helpers;

use helpers::mock_config::MockConfig;
use helpers::test_data_builder::*;
use std::sync::Arc;
use stock_allocation::config::{AllocationRules, ExpiryRules};
use stock_allocation::domain::AllocationOutcome;
use stock_allocation::engine::AllocationOrchestrator;
use stock_allocation::export;
use stock_allocation::importer::ImportError;
use stock_allocation::logging;

// ==========================================
// 测试辅助函数
// ==========================================

fn write_inputs(fixture: &CsvFixture) -> (std::path::PathBuf, std::path::PathBuf) {
    let forecast = fixture.write(
        "forecast.csv",
        &[
            "product_id,branch_id,channel_id,forecast_quantity",
            "1,1,10,100",
            "1,1,20,50",
            "1,2,70,40",
            "1,3,10,5",
        ],
    );
    let stock = fixture.write(
        "stock.csv",
        &[
            "product_id,branch_id,stock_available,expiry_date",
            "1,1,30,2027-01-01",
            "1,3,10,2027-01-01",
            "1,1000,60,2026-04-15",
            "1,1000,100,2026-10-01",
        ],
    );
    (forecast, stock)
}

#[test]
fn test_full_flow_writes_expected_tables() {
    logging::init_test();

    let fixture = CsvFixture::new();
    let (forecast, stock) = write_inputs(&fixture);

    // test_now = 2026-03-01 09:00; C70 需 90 天 → 仅 2026-10-01 批次合格
    let config = MockConfig::new().with_rules(
        AllocationRules::new()
            .with_priority_channels([70])
            .with_expiry_rules(ExpiryRules::new().with_rule(70, 90)),
    );
    let orchestrator = AllocationOrchestrator::new(Arc::new(config));

    let (inputs, run) = orchestrator.run(&forecast, &stock, test_now()).unwrap();

    // 分析: B1 净需求 120, B2 40, B3 超储
    assert_eq!(inputs.session.analysis().len(), 4);
    assert_eq!(run.analysis_summary.total_net_need, 160);

    let out = fixture.path("out");
    let files = export::write_outcome_files(&out, &run.outcome).unwrap();

    // C70 先取 40（FEFO 跳过不合格的 04-15 批次）,随后 B1 渠道 10 / 20 取 60 + 60
    let plan = read_csv_rows(&files.allocation_plan);
    assert_eq!(
        plan,
        vec![
            vec!["1", "1000", "2", "70", "40", "2026-10-01"],
            vec!["1", "1000", "1", "10", "60", "2026-04-15"],
            vec!["1", "1000", "1", "10", "40", "2026-10-01"],
            vec!["1", "1000", "1", "20", "20", "2026-10-01"],
        ]
    );

    let unfulfilled = read_csv_rows(&files.unfulfilled_demands);
    assert!(unfulfilled.is_empty());

    let remaining = read_csv_rows(&files.remaining_stock);
    assert!(remaining.is_empty());
    assert_eq!(run.fulfillment.fulfillment_ratio, 1.0);
}

#[test]
fn test_outcome_json_round_trips_through_serde() {
    let fixture = CsvFixture::new();
    let (forecast, stock) = write_inputs(&fixture);
    let orchestrator = AllocationOrchestrator::new(Arc::new(MockConfig::new()));

    let (_, run) = orchestrator.run(&forecast, &stock, test_now()).unwrap();
    let path = export::write_outcome_json_file(&fixture.path("out"), &run.outcome).unwrap();

    let raw = std::fs::read_to_string(path).unwrap();
    let parsed: AllocationOutcome = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.run_id, run.outcome.run_id);
    assert_eq!(parsed.allocation_plan, run.outcome.allocation_plan);
    assert_eq!(parsed.total_allocated(), run.outcome.total_allocated());
}

#[test]
fn test_shortage_is_reported_as_unfulfilled() {
    let fixture = CsvFixture::new();
    let forecast = fixture.write(
        "forecast.csv",
        &[
            "product_id,branch_id,channel_id,forecast_quantity",
            "5,1,10,30",
            "5,2,10,30",
        ],
    );
    let stock = fixture.write(
        "stock.csv",
        &[
            "product_id,branch_id,stock_available,expiry_date",
            "5,1000,45,2026-12-31",
        ],
    );
    let orchestrator = AllocationOrchestrator::new(Arc::new(MockConfig::new()));

    let (_, run) = orchestrator.run(&forecast, &stock, test_now()).unwrap();
    let files = export::write_outcome_files(&fixture.path("out"), &run.outcome).unwrap();

    assert_eq!(
        read_csv_rows(&files.unfulfilled_demands),
        vec![vec!["5", "2", "30", "15", "15"]]
    );
    assert!((run.fulfillment.fulfillment_ratio - 0.75).abs() < 1e-9);
}

#[test]
fn test_config_failure_is_propagated() {
    let fixture = CsvFixture::new();
    let (forecast, stock) = write_inputs(&fixture);
    let mut config = MockConfig::new();
    config.fail_rules = true;
    let orchestrator = AllocationOrchestrator::new(Arc::new(config));

    let result = orchestrator.run(&forecast, &stock, test_now());

    assert!(matches!(result, Err(ImportError::ConfigReadError(_))));
}
