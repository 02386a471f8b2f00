//! NutriScan Common Library
//!
//! CLIとフロントエンドで共有される型・プロンプト・レスポンスパーサー

pub mod error;
pub mod parser;
pub mod prompts;
pub mod types;

pub use error::{Error, Result};
pub use parser::{parse_scan_response, strip_code_fences};
pub use prompts::{build_nutrition_prompt, DEFAULT_IMAGE_MIME_TYPE, NUTRITION_PROMPT, RESPONSE_KEYS};
pub use types::{stat_value, PhotoUri, ScanResult, MISSING_VALUE};
