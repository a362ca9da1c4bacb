use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use fridgechef_core::domain::common::{
    FridgeChefConfig, LLMConfig, ObjectStorageConfig, StorageConfig,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "fridgechef", version, about = "Ingredient detection and recipe suggestions")]
pub struct Args {
    #[arg(long, value_enum, default_value_t = Mode::Cli)]
    pub mode: Mode,

    #[arg(long, value_enum, default_value_t = Action::Both)]
    pub action: Action,

    /// Image file name inside the input directory
    #[arg(long)]
    pub image: Option<String>,

    /// Number of recipes to request
    #[arg(long, default_value_t = 5)]
    pub recipes: u32,

    /// Existing request to generate recipes for (latest when omitted)
    #[arg(long)]
    pub request_id: Option<String>,

    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub llm: LLMArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Cli,
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Analyze,
    Recipes,
    Both,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "server-allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerArgs {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            root_path: String::new(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct LLMArgs {
    #[arg(long = "llm-endpoint", env = "AZURE_OPENAI_ENDPOINT", default_value = "")]
    pub endpoint: String,

    #[arg(long = "llm-api-key", env = "AZURE_OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    #[arg(long = "llm-api-version", env = "API_VERSION", default_value = "2024-02-15-preview")]
    pub api_version: String,

    #[arg(long = "llm-model", env = "MODEL_NAME", default_value = "gpt-4o")]
    pub model_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StorageBackend {
    #[default]
    Local,
    S3,
}

#[derive(Debug, Clone, clap::Args)]
pub struct StorageArgs {
    #[arg(long = "storage-backend", env = "STORAGE_BACKEND", value_enum, default_value_t = StorageBackend::Local)]
    pub backend: StorageBackend,

    #[arg(long = "results-dir", env = "RESULTS_DIR", default_value = "results")]
    pub results_dir: PathBuf,

    #[arg(long = "input-dir", env = "INPUT_DIR", default_value = "input")]
    pub input_dir: PathBuf,

    #[arg(long = "s3-endpoint", env = "S3_ENDPOINT", default_value = "")]
    pub s3_endpoint: String,

    #[arg(long = "s3-region", env = "S3_REGION", default_value = "us-east-1")]
    pub s3_region: String,

    #[arg(long = "s3-access-key", env = "S3_ACCESS_KEY", default_value = "")]
    pub s3_access_key: String,

    #[arg(long = "s3-secret-key", env = "S3_SECRET_KEY", default_value = "", hide_env_values = true)]
    pub s3_secret_key: String,

    #[arg(long = "s3-bucket", env = "S3_BUCKET", default_value = "fridgechef")]
    pub s3_bucket: String,

    #[arg(long = "s3-key-prefix", env = "S3_KEY_PREFIX", default_value = "results")]
    pub s3_key_prefix: String,
}

impl Default for StorageArgs {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            results_dir: PathBuf::from("results"),
            input_dir: PathBuf::from("input"),
            s3_endpoint: String::new(),
            s3_region: "us-east-1".to_string(),
            s3_access_key: String::new(),
            s3_secret_key: String::new(),
            s3_bucket: "fridgechef".to_string(),
            s3_key_prefix: "results".to_string(),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON")]
    pub json: bool,
}

impl Default for LogArgs {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl From<Args> for FridgeChefConfig {
    fn from(args: Args) -> Self {
        let storage = match args.storage.backend {
            StorageBackend::Local => StorageConfig::Local {
                results_dir: args.storage.results_dir,
            },
            StorageBackend::S3 => StorageConfig::ObjectStorage(ObjectStorageConfig {
                endpoint: args.storage.s3_endpoint,
                region: args.storage.s3_region,
                access_key: args.storage.s3_access_key,
                secret_key: args.storage.s3_secret_key,
                bucket: args.storage.s3_bucket,
                key_prefix: args.storage.s3_key_prefix,
            }),
        };

        FridgeChefConfig {
            llm: LLMConfig {
                endpoint: args.llm.endpoint,
                api_key: args.llm.api_key,
                api_version: args.llm.api_version,
                model_name: args.llm.model_name,
            },
            storage,
        }
    }
}
