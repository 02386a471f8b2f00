use anyhow::Context;
use clap::Parser;
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use nutriscan::analyzer::GeminiClient;
use nutriscan::capture::{CaptureOptions, FileCamera};
use nutriscan::cli::{Cli, Commands};
use nutriscan::config::Config;
use nutriscan::session::Intent;
use nutriscan::{render, NutriScanApp, NutriScanError, Outcome};
use std::path::Path;
use std::time::Duration;

type App = NutriScanApp<FileCamera, GeminiClient>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Scan { source, json } => {
            run_scan(&config, &source, json).await?;
        }

        Commands::Interactive { source } => {
            run_interactive(&config, &source).await?;
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.base_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  撮影品質: {}", config.capture_quality());
                println!("  撮影画像の保存先: {}", config.captures_dir().display());
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn build_app(config: &Config, source: &Path) -> nutriscan::Result<App> {
    // 認証情報はここで一度だけ解決してクライアントに渡す
    let analyzer = GeminiClient::from_config(config)?;
    let camera = FileCamera::new(source, config.captures_dir());
    let options = CaptureOptions { quality: config.capture_quality() };
    Ok(NutriScanApp::new(camera, analyzer).with_capture_options(options))
}

async fn wait_for_analysis(app: &mut App) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("AIが栄養価を計算しています...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    app.settle().await;

    spinner.finish_and_clear();
}

async fn run_scan(config: &Config, source: &Path, json: bool) -> anyhow::Result<()> {
    let mut app = build_app(config, source)?;

    for intent in [Intent::StartScan, Intent::CapturePhoto] {
        let outcome = app.dispatch(intent).await;
        if outcome != Outcome::Applied {
            let reason = app
                .view()
                .await
                .notice
                .map(|n| n.message)
                .unwrap_or_else(|| format!("{:?}", outcome));
            return Err(NutriScanError::ScanFailed(reason).into());
        }
    }

    wait_for_analysis(&mut app).await;

    let view = app.view().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render_view(&view));
    }

    if view.result.is_none() {
        let reason = view.notice.map(|n| n.message).unwrap_or_default();
        return Err(NutriScanError::ScanFailed(reason).into());
    }

    Ok(())
}

async fn run_interactive(config: &Config, source: &Path) -> anyhow::Result<()> {
    let mut app = build_app(config, source)?;
    println!("📸 NutriScan - 対話モード\n");

    loop {
        let view = app.view().await;
        println!("{}", render::render_view(&view));

        let intents = view.available_intents();
        let mut items: Vec<&str> = intents.iter().map(|i| i.label()).collect();
        items.push("終了");

        let selection = Select::new()
            .with_prompt("操作を選択")
            .items(&items)
            .default(0)
            .interact()?;

        let Some(&intent) = intents.get(selection) else {
            break;
        };

        match app.dispatch(intent).await {
            Outcome::Applied if intent == Intent::CapturePhoto => wait_for_analysis(&mut app).await,
            Outcome::Rejected(e) => println!("✗ {}", e),
            _ => {}
        }
        println!();
    }

    let scans = app.with_session(|s| s.history().len()).await;
    println!("✅ 終了（スキャン {}件）", scans);
    Ok(())
}
