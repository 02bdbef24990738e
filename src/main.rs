// ==========================================
// 中央仓库存分配系统 - 命令行入口
// ==========================================
// 子命令:
// - analyze: 导入预测/库存,输出需求分析表
// - allocate: 需求分析 + 优先级 FEFO 分配,输出调拨计划
// - init-config: 生成默认配置文件
// ==========================================

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stock_allocation::config::{
    AllocationConfig, AllocationRules, ConfigError, ConfigManager, ExpiryRules,
};
use stock_allocation::domain::{AllocationStatus, BranchId, ChannelId, DqReport};
use stock_allocation::engine::{AllocationOrchestrator, AllocationRun, LoadedInputs};
use stock_allocation::{export, logging};

#[derive(Parser)]
#[command(name = "stock-allocation")]
#[command(author, version, about = "中央仓库存分配 - 需求分析与 FEFO 优先级分配")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 需求分析: 计算各门店净需求与分配状态
    Analyze {
        #[command(flatten)]
        inputs: InputArgs,

        /// 输出目录
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// 执行优先级 FEFO 分配
    Allocate {
        #[command(flatten)]
        inputs: InputArgs,

        /// 优先渠道（可重复）
        #[arg(long = "priority-channel", value_name = "CHANNEL_ID")]
        priority_channels: Vec<ChannelId>,

        /// 优先门店（可重复）
        #[arg(long = "priority-branch", value_name = "BRANCH_ID")]
        priority_branches: Vec<BranchId>,

        /// 渠道最短效期天数,格式 CHANNEL=DAYS（可重复）
        #[arg(long = "expiry-rule", value_name = "CHANNEL=DAYS", value_parser = parse_expiry_rule)]
        expiry_rules: Vec<(ChannelId, i64)>,

        /// 使用标准渠道效期规则（--expiry-rule 可覆盖单个渠道）
        #[arg(long)]
        standard_expiry_rules: bool,

        /// 中央仓编号（覆盖配置）
        #[arg(long = "cw-branch", value_name = "BRANCH_ID")]
        cw_branch: Option<BranchId>,

        /// 输出目录
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// 同时输出 outcome.json
        #[arg(long)]
        json: bool,
    },
    /// 生成默认配置文件
    InitConfig {
        /// 配置文件路径（默认: 用户配置目录）
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// 写入标准渠道效期规则
        #[arg(long)]
        standard_expiry_rules: bool,

        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// 预测文件（.csv / .xlsx / .xls）
    #[arg(short, long)]
    forecast: PathBuf,

    /// 库存文件（.csv / .xlsx / .xls）
    #[arg(short, long)]
    stock: PathBuf,

    /// 配置文件（默认: STOCK_ALLOCATION_CONFIG 或用户配置目录）
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    logging::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("命令执行失败: {e:#}");
        eprintln!("错误: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze { inputs, out } => {
            let manager = load_config(inputs.config.as_deref())?;
            let loaded = load_inputs(manager, &inputs)?;

            let path = export::write_analysis_file(&out, loaded.session.analysis())
                .context("写出需求分析表失败")?;

            print_dq_report(&loaded.forecast_report);
            print_dq_report(&loaded.stock_report);
            print_analysis(&loaded);
            println!("需求分析表: {}", path.display());
        }
        Commands::Allocate {
            inputs,
            priority_channels,
            priority_branches,
            expiry_rules,
            standard_expiry_rules,
            cw_branch,
            out,
            json,
        } => {
            let mut manager = load_config(inputs.config.as_deref())?;
            if let Some(cw) = cw_branch {
                manager.override_cw_branch_id(cw);
            }

            let rules = merge_rules(
                manager.config().rules.clone(),
                priority_channels,
                priority_branches,
                standard_expiry_rules,
                expiry_rules,
            );
            manager.override_rules(rules).context("分配规则无效")?;

            let rules = manager.config().rules.clone();
            let orchestrator = AllocationOrchestrator::new(Arc::new(manager));
            let loaded = orchestrator
                .load_inputs(&inputs.forecast, &inputs.stock)
                .context("导入输入文件失败")?;
            let run = orchestrator.execute_allocation_with_rules(
                &loaded.session,
                rules,
                Local::now().naive_local(),
            );

            let files = export::write_outcome_files(&out, &run.outcome)
                .context("写出分配结果失败")?;

            print_dq_report(&loaded.forecast_report);
            print_dq_report(&loaded.stock_report);
            print_allocation(&run);
            println!("调拨计划: {}", files.allocation_plan.display());
            println!("未满足需求: {}", files.unfulfilled_demands.display());
            println!("中央仓剩余库存: {}", files.remaining_stock.display());

            if json {
                let path = export::write_outcome_json_file(&out, &run.outcome)
                    .context("写出 outcome.json 失败")?;
                println!("完整结果: {}", path.display());
            }
        }
        Commands::InitConfig {
            path,
            standard_expiry_rules,
            force,
        } => {
            let path = match path {
                Some(p) => p,
                None => ConfigManager::default_config_path()?,
            };
            if path.exists() && !force {
                bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
            }

            let mut config = AllocationConfig::default();
            if standard_expiry_rules {
                config.rules.expiry_rules = ExpiryRules::standard();
            }
            ConfigManager::from_config(config)?
                .save(&path)
                .with_context(|| format!("写入配置文件失败: {}", path.display()))?;
            println!("配置文件已生成: {}", path.display());
        }
    }
    Ok(())
}

// ==========================================
// 辅助函数
// ==========================================

/// 加载配置: 显式路径必须存在,默认路径不存在时使用默认配置
fn load_config(path: Option<&Path>) -> Result<ConfigManager> {
    match path {
        Some(p) => ConfigManager::load(p)
            .with_context(|| format!("加载配置文件失败: {}", p.display())),
        None => match ConfigManager::default_config_path() {
            Ok(default_path) => ConfigManager::load_or_default(&default_path)
                .with_context(|| format!("加载配置文件失败: {}", default_path.display())),
            Err(ConfigError::NoConfigDir) => {
                Ok(ConfigManager::from_config(AllocationConfig::default())?)
            }
            Err(e) => Err(e.into()),
        },
    }
}

fn load_inputs(manager: ConfigManager, inputs: &InputArgs) -> Result<LoadedInputs> {
    AllocationOrchestrator::new(Arc::new(manager))
        .load_inputs(&inputs.forecast, &inputs.stock)
        .context("导入输入文件失败")
}

/// 命令行参数覆盖配置中的规则（列表非空时整体替换）
fn merge_rules(
    mut rules: AllocationRules,
    priority_channels: Vec<ChannelId>,
    priority_branches: Vec<BranchId>,
    standard_expiry_rules: bool,
    expiry_rules: Vec<(ChannelId, i64)>,
) -> AllocationRules {
    if !priority_channels.is_empty() {
        rules.priority_channels = priority_channels.into_iter().collect();
    }
    if !priority_branches.is_empty() {
        rules.priority_branches = priority_branches.into_iter().collect();
    }
    if standard_expiry_rules {
        for (&channel_id, &days) in ExpiryRules::standard().iter() {
            rules.expiry_rules.insert(channel_id, days);
        }
    }
    for (channel_id, days) in expiry_rules {
        rules.expiry_rules.insert(channel_id, days);
    }
    rules
}

fn parse_expiry_rule(value: &str) -> Result<(ChannelId, i64), String> {
    let (channel, days) = value
        .split_once('=')
        .ok_or_else(|| format!("格式应为 CHANNEL=DAYS: {value}"))?;
    let channel = channel
        .trim()
        .parse::<ChannelId>()
        .map_err(|_| format!("渠道编号无效: {channel}"))?;
    let days = days
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("效期天数无效: {days}"))?;
    if days < 0 {
        return Err(format!("效期天数不能为负: {days}"));
    }
    Ok((channel, days))
}

// ==========================================
// 输出
// ==========================================

fn print_dq_report(report: &DqReport) {
    let s = &report.summary;
    println!(
        "[{}] 共 {} 行, 导入 {} 行, 丢弃 {} 行, 警告 {} 行",
        report.dataset, s.total_rows, s.success, s.dropped, s.warning
    );
    for v in report.violations.iter().take(10) {
        println!("  行 {} {:?} {}: {}", v.row_number, v.level, v.field, v.message);
    }
    if report.violations.len() > 10 {
        println!("  ... 共 {} 条", report.violations.len());
    }
}

fn print_analysis(loaded: &LoadedInputs) {
    let session = &loaded.session;
    let summary = session.analysis_summary();

    println!("需求分析: {} 行", session.analysis().len());
    for status in [
        AllocationStatus::AllocationNeeded,
        AllocationStatus::NoAllocationNeeded,
        AllocationStatus::Overstock,
    ] {
        println!("  {:<22}{} 个门店", status.as_str(), summary.count_of(status));
    }
    println!("  净需求合计: {}", summary.total_net_need);
    for c in &summary.top_demand_channels {
        println!("  渠道 {:>6}  预测 {}", c.channel_id, c.quantity);
    }
    println!("可选优先渠道: {:?}", session.needy_channels());
    println!("可选优先门店: {:?}", session.needy_branches());
}

fn print_allocation(run: &AllocationRun) {
    let f = &run.fulfillment;
    println!("运行 ID: {}", run.outcome.run_id);
    println!(
        "调拨 {} 条, 合计 {}; 未满足 {}; 满足率 {:.1}%; 中央仓剩余 {}",
        run.outcome.allocation_plan.len(),
        f.total_allocated,
        f.total_unfulfilled,
        f.fulfillment_ratio * 100.0,
        f.remaining_cw_stock
    );
    for c in &f.top_allocated_channels {
        println!("  渠道 {:>6}  调拨 {}", c.channel_id, c.quantity);
    }
    if !run.outcome.skipped_demands.is_empty() {
        println!("未分配需求行: {}", run.outcome.skipped_demands.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expiry_rule() {
        assert_eq!(parse_expiry_rule("10=180"), Ok((10, 180)));
        assert_eq!(parse_expiry_rule(" 70 = 45 "), Ok((70, 45)));
        assert!(parse_expiry_rule("10").is_err());
        assert!(parse_expiry_rule("10=-1").is_err());
        assert!(parse_expiry_rule("x=1").is_err());
    }

    #[test]
    fn test_cli_rules_override_config() {
        let base = AllocationRules::new()
            .with_priority_channels([1])
            .with_priority_branches([2]);

        let merged = merge_rules(base, vec![5, 6], Vec::new(), true, vec![(10, 1)]);

        assert!(merged.is_priority_channel(5));
        assert!(!merged.is_priority_channel(1));
        assert!(merged.is_priority_branch(2));
        assert_eq!(merged.expiry_rules.min_days_for(10), 1);
        assert_eq!(merged.expiry_rules.min_days_for(70), 45);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
