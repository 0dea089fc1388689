// ==========================================
// 出货检验追踪系统 - 主入口
// ==========================================
// 初始化日志 → 读取运行环境 → 组装 AppState → 输出目录摘要
// ==========================================

use inspection_tracker::api::OrderFilter;
use inspection_tracker::app::{get_default_db_path, AppState};
use inspection_tracker::config::RuntimeEnv;
use inspection_tracker::domain::PoStatus;
use inspection_tracker::i18n::t_with_args;
use inspection_tracker::logging;

#[tokio::main]
async fn main() {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", inspection_tracker::APP_NAME);
    tracing::info!("系统版本: {}", inspection_tracker::VERSION);
    tracing::info!("==================================================");

    let env = RuntimeEnv::from_env();
    let db_path = env.db_path.clone().unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = match AppState::new(db_path, env).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("AppState初始化失败: {}", e);
            std::process::exit(1);
        }
    };

    let summaries = match state.directory.list(&OrderFilter::default()) {
        Ok(summaries) => summaries,
        Err(e) => {
            tracing::error!("读取采购单目录失败: {}", e);
            std::process::exit(1);
        }
    };

    let submitted = summaries
        .iter()
        .filter(|s| s.status == PoStatus::Submitted)
        .count();
    let total = summaries.len().to_string();
    let submitted = submitted.to_string();
    tracing::info!(
        "{}",
        t_with_args("directory.summary", &[("total", total.as_str()), ("submitted", submitted.as_str())])
    );

    for summary in &summaries {
        tracing::info!(
            po_id = %summary.id,
            status = %summary.status,
            ship_to = %summary.ship_to,
            created = %summary.display_created(),
            progress = summary.progress_percent(),
            "采购单"
        );
    }

    state.directory.stop();
}
