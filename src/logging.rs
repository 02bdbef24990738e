// ==========================================
// 日志系统初始化
// ==========================================
// tracing-subscriber: EnvFilter + fmt
// 输出到 stderr,stdout 留给 CLI 结果
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量（取值 json 时输出 JSON 行）
pub const LOG_FORMAT_ENV: &str = "STOCK_ALLOCATION_LOG_FORMAT";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// 从环境变量解析,未设置或无法识别时为 Text
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or(LogFormat::Text)
    }

    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=stock_allocation::engine=debug,perf=off
/// - STOCK_ALLOCATION_LOG_FORMAT: text（默认）或 json
///
/// # 示例
/// ```no_run
/// use stock_allocation::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with_default("info", LogFormat::from_env());
}

/// 以指定的默认级别和格式初始化（RUST_LOG 优先）
///
/// 重复调用无副作用
pub fn init_with_default(default_directive: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
}

/// 初始化测试环境的日志系统（debug 级别,测试输出捕获）
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
    }

    #[test]
    fn test_init_is_idempotent() {
        init_test();
        init_with_default("warn", LogFormat::Text);
        init_with_default("warn", LogFormat::Json);
    }
}
