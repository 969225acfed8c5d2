//! Entry point for the portal-i18n command line tool.
//!
//! Renders a key from the bundled core table first, then waits for the
//! deferred full-table load and renders it again.

use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{
    Parser,
    Subcommand,
};
use portal_i18n::config::{
    ConfigManager,
    LoggingConfig,
    PortalSettings,
};
use portal_i18n::source::{
    FsTranslationSource,
    StaticSource,
    TranslationSource,
};
use portal_i18n::store::{
    LoadStatus,
    StoreOptions,
};
use portal_i18n::{
    CoreTables,
    Language,
    TranslationStore,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable overriding the configured log filter
const LOG_ENV: &str = "PORTAL_I18N_LOG";

/// portal-i18n - bilingual translation lookups for the clinical data portal
#[derive(Parser, Debug)]
#[command(name = "portal-i18n")]
#[command(version)]
#[command(about = "Resolve portal translation keys against core and full tables", long_about = None)]
struct Args {
    /// Workspace root holding `.portal-i18n.json` (default: current directory)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Override `fullLoadDelayMs`
    #[arg(long, value_name = "MS")]
    full_load_delay_ms: Option<u64>,

    /// Skip the core/full consistency check
    #[arg(long)]
    no_consistency_check: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a dotted key path
    Lookup {
        /// Key path, e.g. `nav.home`
        path: String,
        /// Language code (default: configured default language)
        #[arg(long)]
        lang: Option<Language>,
        /// Returned when the key does not resolve to a string
        #[arg(long, default_value = "")]
        fallback: String,
        /// Treat the path as a form placeholder key
        #[arg(long)]
        placeholder: bool,
    },
    /// List every key of the loaded table
    Keys {
        /// Language code (default: configured default language)
        #[arg(long)]
        lang: Option<Language>,
    },
}

impl Args {
    /// 設定ファイルの値をコマンドライン引数で上書きした設定
    fn apply_overrides(&self, settings: &PortalSettings) -> Option<PortalSettings> {
        if self.full_load_delay_ms.is_none() && !self.no_consistency_check {
            return None;
        }
        let mut settings = settings.clone();
        if let Some(delay) = self.full_load_delay_ms {
            settings.full_load_delay_ms = delay;
        }
        if self.no_consistency_check {
            settings.consistency_check = false;
        }
        Some(settings)
    }
}

impl Command {
    const fn lang(&self) -> Option<Language> {
        match self {
            Self::Lookup { lang, .. } | Self::Keys { lang } => *lang,
        }
    }
}

/// stderr と（設定されていれば）日次ローテーションのファイルにログを出力する
///
/// 返されたガードはプロセス終了まで保持すること。
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let (file_layer, guard) = config.directory.as_ref().map_or((None, None), |directory| {
        let appender = tracing_appender::rolling::daily(directory, "portal-i18n.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let layer =
            tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking);
        (Some(layer), Some(guard))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

/// フルテーブルの取得元を作成
///
/// 設定が不正でもコアテーブルだけで動作を続ける。
fn build_source(settings: &PortalSettings, workspace_root: Option<&Path>) -> Arc<dyn TranslationSource> {
    match FsTranslationSource::from_config(&settings.translation_files, workspace_root) {
        Ok(source) => {
            tracing::debug!(directory = %source.directory().display(), "Using file translation source");
            Arc::new(source)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Full translations unavailable; using core translations only");
            Arc::new(StaticSource::new())
        }
    }
}

#[allow(clippy::print_stdout)]
async fn run(args: Args, config: &ConfigManager) {
    let settings = config.get_settings();
    let language = args.command.lang().unwrap_or(settings.default_language);
    let options = StoreOptions { initial_language: language, ..StoreOptions::from(settings) };
    let source = build_source(settings, config.workspace_root().map(PathBuf::as_path));
    let store = TranslationStore::new(CoreTables::bundled(), source, options);
    let mut view = store.view();

    match args.command {
        Command::Lookup { path, fallback, placeholder, .. } => {
            let render = |view: &portal_i18n::TranslationView| {
                if placeholder { view.placeholder(&path, &fallback) } else { view.t(&path, &fallback) }
            };

            println!("core: {}", render(&view));

            let handle = store.mount();
            let status = view.load_finished(language).await;
            handle.unmount();

            if status == Some(LoadStatus::Loaded) {
                println!("full: {}", render(&view));
            } else {
                println!("full: (unavailable, showing core) {}", render(&view));
            }
        }
        Command::Keys { .. } => {
            let handle = store.mount();
            view.load_finished(language).await;
            handle.unmount();

            for (key, value) in view.current_table().flatten() {
                println!("{key}\t{value}");
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let workspace_root = match args.workspace.clone() {
        Some(root) => root,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                let _guard = init_logging(&LoggingConfig::default());
                tracing::error!(error = %e, "Cannot determine the current directory");
                return ExitCode::FAILURE;
            }
        },
    };

    let mut config_manager = ConfigManager::new();
    let mut config_result = config_manager.load_settings(Some(workspace_root));
    if config_result.is_ok()
        && let Some(overridden) = args.apply_overrides(config_manager.get_settings())
    {
        config_result = config_manager.update_settings(overridden);
    }

    let _guard = init_logging(&config_manager.get_settings().logging);
    if let Err(e) = config_result {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }

    run(args, &config_manager).await;
    ExitCode::SUCCESS
}
