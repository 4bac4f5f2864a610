//! beaconrank - 从信标读数文件计算展品排名
//!
//! 输出 JSON：得分最高的 N 个展品（按时间顺序），或使用 `--all` 输出完整序列。

use anyhow::Context;
use beaconrank::BeaconRanker;
use beaconrank::config::RankerConfig;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;

#[derive(Parser, Debug)]
#[command(name = "beaconrank", version, about = "信标读数评分与展品排名")]
struct Args {
    /// 读数文件（带表头的逗号分隔文本）
    input: PathBuf,

    /// 输出得分最高的条目数，默认取配置中的 `top`
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// TOML 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 输出按时间排序的全部展品
    #[arg(long, conflicts_with = "top")]
    all: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RankerConfig::from_file(path)?,
        None => RankerConfig::default(),
    };
    let exhibits = config.exhibit_table();
    info!(exhibits = exhibits.len(), input = %args.input.display(), "config_loaded");

    let mut ranker = BeaconRanker::new(exhibits);
    ranker
        .load(&args.input)
        .await
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let entries = if args.all {
        ranker.data().all().to_vec()
    } else {
        ranker.top(args.top.unwrap_or(config.top))?
    };

    let output = serde_json::json!({
        "generated_at": ranker.data().generated_at(),
        "entries": entries,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
