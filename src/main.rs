use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use exam_question_assign::utils::logging;
use exam_question_assign::{
    AssignmentProvider, AssignmentSession, CandidateFilter, Config, Difficulty, HttpProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（CONFIG_FILE 指定 TOML 文件，否则走环境变量）
    let config = match std::env::var("CONFIG_FILE") {
        Ok(path) => Config::from_file(&path).context("加载配置文件失败")?,
        Err(_) => Config::from_env(),
    };

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::log_startup(&config);

    if config.exam_id <= 0 {
        bail!("未指定考试ID（设置 EXAM_ID 环境变量或配置文件）");
    }

    // 建立会话并输出操作台概览
    let provider = HttpProvider::new(&config)?;
    let session = AssignmentSession::load(provider, config.exam_id).await?;

    print_exam_overview(&session);
    print_available(&session, &filter_from_env());
    print_assigned(&session);
    info!("📊 {}", session.summary());

    Ok(())
}

/// 从环境变量组装可选列表的筛选条件
fn filter_from_env() -> CandidateFilter {
    let mut filter = CandidateFilter::none();
    if let Ok(text) = std::env::var("SEARCH_TEXT") {
        if !text.trim().is_empty() {
            filter.search_text = Some(text);
        }
    }
    if let Ok(raw) = std::env::var("DIFFICULTY") {
        match Difficulty::from_str(&raw) {
            Some(difficulty) => filter.difficulty = Some(difficulty),
            None => warn!("无法识别的难度 '{}'，忽略该筛选", raw),
        }
    }
    if let Ok(raw) = std::env::var("FILTER_COURSE_ID") {
        filter.course_id = raw.parse().ok();
    }
    if let Ok(raw) = std::env::var("FILTER_SUBJECT_ID") {
        filter.subject_id = raw.parse().ok();
    }
    filter
}

// ========== 输出辅助函数 ==========

fn print_exam_overview<P: AssignmentProvider>(session: &AssignmentSession<P>) {
    let exam = session.exam();
    info!("\n{}", "=".repeat(60));
    info!("📋 考试: 《{}》 [{}]", exam.title, exam.status);
    info!("🧭 范围: {}", session.exam_scope_label());
    info!(
        "⏱️ 时长 {} 分钟 / 满分 {:.1}",
        exam.duration_minutes, exam.max_marks
    );
    if exam.has_question_cap() {
        info!("📐 题目数上限: {}", exam.max_questions);
    }
    info!("{}", "=".repeat(60));
}

fn print_available<P: AssignmentProvider>(
    session: &AssignmentSession<P>,
    filter: &CandidateFilter,
) {
    let rows = session.available_questions(filter);
    if filter.is_empty() {
        info!("\n🔍 可选题目 {} 题:", rows.len());
    } else {
        info!("\n🔍 可选题目（已筛选） {} 题:", rows.len());
    }
    for row in rows.iter().take(20) {
        info!(
            "  [{}] {} ({})",
            row.question.id,
            logging::truncate_text(&row.question.content, 60),
            row.question.difficulty_level
        );
    }
    if rows.len() > 20 {
        info!("  …… 共 {} 题，仅显示前 20 题", rows.len());
    }
}

fn print_assigned<P: AssignmentProvider>(session: &AssignmentSession<P>) {
    let rows = session.assigned_questions();
    info!("\n📦 已分配 {} 题:", rows.len());
    for row in &rows {
        if row.question.is_missing() {
            warn!(
                "  [{}] {:.1} 分 - {}",
                row.assignment.question_id,
                row.assignment.marks,
                row.question.content()
            );
        } else {
            info!(
                "  [{}] {:.1} 分 - {}",
                row.assignment.question_id,
                row.assignment.marks,
                logging::truncate_text(&row.question.content(), 60)
            );
        }
    }
}
