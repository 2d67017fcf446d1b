// gh-content - GitHubリポジトリのファイルを取得して表示・保存するツール

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use futures::{StreamExt, stream};
use log::{error, info, warn};
use simple_logger::SimpleLogger;
use tokio::fs;

use gh_content::config::{self, Config};
use gh_content::nav::{self, NavigationStore};
use gh_content::{ContentContext, CredentialEnv, DecodedContent, GitHubClient};

// コマンドライン引数の定義

#[derive(Parser, Debug)]
#[clap(
    name = "gh-content",
    about = "GitHubリポジトリからコンテンツを取得・デコードするツール",
    version
)]
struct Args {
    /// カスタム設定ファイル（JSON）
    #[clap(long, env = "GH_CONTENT_CONFIG", default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// ログレベル
    #[clap(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// 認証せずにアクセスする
    #[clap(long)]
    no_auth: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// ファイルを取得する（パス未指定なら設定の contentOptions.path）
    Fetch {
        paths: Vec<String>,

        /// 保存先ディレクトリ（バイナリの取得には必須）
        #[clap(long)]
        out_dir: Option<PathBuf>,

        /// 同時実行数
        #[clap(long, default_value = "4")]
        concurrency: usize,
    },

    /// ナビゲーション（main.json）を読み込んで表示する
    Nav,
}

// メイン関数
#[tokio::main]
async fn main() -> Result<()> {
    // .envファイルを読み込み
    dotenv().ok();

    let args = Args::parse();

    // ロガー初期化
    SimpleLogger::new()
        .with_level(args.log_level.into())
        .init()
        .map_err(|e| anyhow!("ロガーの初期化に失敗しました: {}", e))?;

    let config = config::resolve_from_file(Config::default(), &args.config);
    let ctx = Arc::new(ContentContext::github(config)?);

    // 認証は並行取得の前に一度だけ
    if args.no_auth {
        info!("🔓 認証をスキップします");
    } else if let Err(e) = ctx.authorise(&CredentialEnv::from_process()).await {
        warn!("⚠️ 未認証で続行します: {}", e);
    }

    match args.command {
        Command::Fetch {
            paths,
            out_dir,
            concurrency,
        } => fetch_files(ctx, paths, out_dir, concurrency).await,
        Command::Nav => show_nav(ctx).await,
    }
}

async fn fetch_files(
    ctx: Arc<ContentContext<GitHubClient>>,
    paths: Vec<String>,
    out_dir: Option<PathBuf>,
    concurrency: usize,
) -> Result<()> {
    let paths = if paths.is_empty() {
        match &ctx.config().content_options.path {
            Some(path) => vec![path.clone()],
            None => bail!("取得するパスを指定してください（引数または contentOptions.path）"),
        }
    } else {
        paths
    };

    info!(
        "⬇️ {} 件のファイルを取得中: {}/{}",
        paths.len(),
        ctx.config().content_options.owner,
        ctx.config().content_options.repo
    );

    // 同時実行数を制限して取得
    let results = stream::iter(paths)
        .map(|path| {
            let ctx = ctx.clone();
            async move {
                let result = ctx.get_content(&path).await;
                (path, result)
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    let mut failures = 0;
    for (path, result) in results {
        let outcome = match result {
            Ok(content) => write_output(out_dir.as_deref(), &path, &content).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = outcome {
            error!("❌ {}: {}", path, e);
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{} 件のファイル取得に失敗しました", failures);
    }
    Ok(())
}

// 保存先があればファイルへ、なければテキストを標準出力へ
async fn write_output(out_dir: Option<&Path>, path: &str, content: &DecodedContent) -> Result<()> {
    let Some(out_dir) = out_dir else {
        return match content {
            DecodedContent::Text(text) => {
                println!("{}", text);
                Ok(())
            }
            DecodedContent::Binary(_) => {
                bail!("バイナリを保存するには --out-dir を指定してください")
            }
        };
    };

    let relative = Path::new(path.trim_start_matches('/'));
    if relative.components().any(|c| matches!(c, Component::ParentDir)) {
        bail!("不正なパスです: {}", path);
    }

    let target = out_dir.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(&target, content.as_bytes()).await?;

    info!("💾 保存しました: {}", target.display());
    Ok(())
}

async fn show_nav(ctx: Arc<ContentContext<GitHubClient>>) -> Result<()> {
    let store = NavigationStore::default();
    nav::spawn_navigation_load(ctx, Arc::new(store.clone())).await?;

    match store.get() {
        Some(nav) => {
            println!("{}", serde_json::to_string_pretty(&nav)?);
            Ok(())
        }
        None => bail!("ナビゲーション（{}）を読み込めませんでした", nav::NAV_FILE),
    }
}
