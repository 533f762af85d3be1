// ==========================================
// 车间电视看板 - 终端主入口
// ==========================================
// 用法:
//   factory-tv-board product --code cd1
//   factory-tv-board group --line 1
// 看板帧输出到 stdout，日志输出到 stderr
// 操作员命令（stdin 每行一个）: n 下一页 / p 上一页 / 数字 跳页 / r 刷新 / q 退出
// ==========================================

use anyhow::Context;
use clap::{Parser, Subcommand};
use factory_tv_board::app::{spawn_board, BoardCommand, BoardHandle, BoardView, PushChannel};
use factory_tv_board::domain::{BoardKind, GroupSnapshot, ProductSnapshot};
use factory_tv_board::render::render;
use factory_tv_board::{logging, parse_identity, DisplayConfig, HttpBackendClient};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "factory-tv-board", version, about = "车间电视看板（终端版）")]
struct Cli {
    #[command(subcommand)]
    board: BoardArg,

    /// 配置文件路径（JSON）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 轮播周期（秒），覆盖配置文件
    #[arg(long, global = true)]
    interval: Option<u32>,

    /// 关闭自动轮播
    #[arg(long, global = true)]
    no_tv: bool,

    /// 只拉取，不连接推送通道
    #[arg(long, global = true)]
    no_push: bool,
}

#[derive(Subcommand, Debug)]
enum BoardArg {
    /// 产品明细看板
    Product {
        /// 产品族代码 cd1..cd4
        #[arg(long)]
        code: Option<String>,
    },
    /// 小组产出看板
    Group {
        /// 产线号 1..4
        #[arg(long)]
        line: Option<String>,
    },
}

impl BoardArg {
    fn kind_and_raw(&self) -> (BoardKind, Option<&str>) {
        match self {
            BoardArg::Product { code } => (BoardKind::ProductDetail, code.as_deref()),
            BoardArg::Group { line } => (BoardKind::GroupOutput, line.as_deref()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    info!("==================================================");
    info!("{} v{}", factory_tv_board::APP_NAME, factory_tv_board::VERSION);
    info!("==================================================");

    let (kind, raw) = cli.board.kind_and_raw();

    let mut config = DisplayConfig::load(cli.config.as_deref()).context("加载配置失败")?;
    if let Some(secs) = cli.interval {
        config.override_interval(kind, secs);
        config.validate().context("--interval 无效")?;
    }
    if cli.no_tv {
        config.tv_mode = false;
    }

    // 参数非法: 只显示校验提示，不发起拉取
    let identity = match parse_identity(kind, raw) {
        Ok(identity) => identity,
        Err(e) => {
            print_frame(&render(&BoardView::from_error(&e)))?;
            return Ok(());
        }
    };

    let client = Arc::new(
        HttpBackendClient::new(
            config.backend_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
        .context("创建 HTTP 客户端失败")?,
    );
    let push = if cli.no_push {
        PushChannel::Disabled
    } else {
        PushChannel::WebSocket {
            url: config.resolved_push_url(),
        }
    };

    let handle = match kind {
        BoardKind::ProductDetail => {
            spawn_board::<ProductSnapshot, _>(identity, &config, client, push)?
        }
        BoardKind::GroupOutput => spawn_board::<GroupSnapshot, _>(identity, &config, client, push)?,
    };

    run_display(handle).await
}

/// 视图变化即重绘；stdin 逐行读取操作员命令；Ctrl-C 或 `q` 退出
async fn run_display(handle: BoardHandle) -> anyhow::Result<()> {
    let mut views = handle.views();
    let mut last_frame = String::new();
    let mut operator = BufReader::new(tokio::io::stdin()).lines();
    let mut operator_open = true;

    loop {
        let frame = render(&views.borrow_and_update());
        if frame != last_frame {
            print_frame(&frame)?;
            last_frame = frame;
        }

        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            line = operator.next_line(), if operator_open => {
                match line {
                    Ok(Some(line)) => match BoardCommand::from_operator_input(&line) {
                        Some(BoardCommand::Shutdown) => {
                            info!("操作员退出");
                            break;
                        }
                        Some(command) => handle.send(command),
                        None => debug!(input = %line.trim(), "忽略未知命令"),
                    },
                    // stdin 关闭（如后台运行）后只保留显示
                    Ok(None) => operator_open = false,
                    Err(e) => {
                        warn!(error = %e, "读取操作员输入失败");
                        operator_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("收到退出信号");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn print_frame(frame: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    // 清屏并回到左上角
    write!(stdout, "\x1B[2J\x1B[H{}", frame)?;
    stdout.flush()?;
    Ok(())
}
