use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nutriscan")]
#[command(about = "食事写真AI栄養解析ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真を1枚撮影して栄養を解析
    Scan {
        /// 撮影ソース（画像ファイル、または画像フォルダ）
        #[arg(required = true)]
        source: PathBuf,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 対話モード（ダッシュボード → カメラ → 結果）
    Interactive {
        /// 撮影ソース（画像ファイル、または画像フォルダ）
        #[arg(required = true)]
        source: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
