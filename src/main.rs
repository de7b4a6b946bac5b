use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use table_scan::{cli, config, editor, error, gateway, history, render, scanner, session};
use cli::{Cli, Commands, HistoryAction};
use config::Config;
use error::{Result, TableScanError};
use gateway::GeminiGateway;
use history::{FileStore, HistoryStore};
use session::{ExtractionOutcome, SessionController, SessionOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(TableScanError::MissingApiKey) => {
            print_configuration_error();
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("✖ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "table_scan=debug,table_scan_common=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// APIキー未設定時の画面（設定し直すまで他の操作はできない）
fn print_configuration_error() {
    eprintln!("==============================");
    eprintln!(" エラー");
    eprintln!("==============================");
    eprintln!("{}", TableScanError::MissingApiKey);
    eprintln!("AIサービスと通信できないため、処理を続行できません。");
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    match cli.command {
        Commands::Config { set_api_key, show } => {
            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }
            if show {
                print_config(&config)?;
            }
        }

        Commands::Scan { image, export, edit } => {
            let controller = connect(&config)?;
            println!("📷 table-scan - 表の抽出\n");

            let image = scanner::load_image(&image)?;
            println!("[1/2] AI解析中... ({})", image.file_name);

            let outcome = tokio::select! {
                outcome = extract_with_progress(&controller, image) => outcome,
                _ = tokio::signal::ctrl_c() => {
                    controller.reset();
                    println!("\n中断しました");
                    return Ok(());
                }
            };

            match outcome {
                ExtractionOutcome::Loaded { scan_id } => {
                    println!("✔ 抽出完了 (ID: {})\n", scan_id);
                }
                ExtractionOutcome::Empty => return Err(TableScanError::ExtractionEmpty),
                ExtractionOutcome::Failed(e) => return Err(TableScanError::Extraction(e)),
                ExtractionOutcome::Superseded => {
                    println!("抽出は取り消されました");
                    return Ok(());
                }
            }

            if let Some(table) = controller.session().table() {
                println!("{}", render::render_table(table));
            }

            if let Some(output) = export {
                println!("[2/2] Excelを生成中...");
                let path = controller.export_current(&output)?;
                println!("✔ Excel出力: {}", path.display());
            }

            if edit {
                editor::run_editor(&controller)?;
            }

            println!("\n✅ 完了");
        }

        Commands::History { action } => {
            let controller = connect(&config)?;
            match action {
                HistoryAction::List => {
                    let scans = controller.history();
                    if scans.is_empty() {
                        println!("履歴はありません");
                    } else {
                        let now = chrono::Utc::now().timestamp_millis();
                        println!("スキャン履歴（{}件）:", scans.len());
                        for scan in &scans {
                            println!("  {}", render::render_history_line(scan, now));
                        }
                    }
                }
                HistoryAction::Show { id } => {
                    controller.load_from_history(&id)?;
                    if let Some(table) = controller.session().table() {
                        println!("{}", render::render_table(table));
                    }
                }
                HistoryAction::Delete { id } => {
                    if controller.delete_scan(&id) {
                        println!("✔ 削除しました: {}", id);
                    } else {
                        println!("スキャンが見つかりません: {}", id);
                    }
                }
                HistoryAction::Clear { yes } => {
                    let confirmed = yes
                        || dialoguer::Confirm::new()
                            .with_prompt("すべての履歴を削除しますか？")
                            .default(false)
                            .interact()
                            .map_err(|e| TableScanError::Prompt(e.to_string()))?;
                    if confirmed {
                        controller.clear_history();
                        println!("✔ 履歴を削除しました");
                    }
                }
            }
        }

        Commands::Edit { id } => {
            let controller = connect(&config)?;
            controller.load_from_history(&id)?;
            if let Some(table) = controller.session().table() {
                println!("{}", render::render_table(table));
            }
            editor::run_editor(&controller)?;
        }

        Commands::Export { id, output } => {
            let controller = connect(&config)?;
            controller.load_from_history(&id)?;
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            let path = controller.export_current(&output)?;
            println!("✔ Excel出力: {}", path.display());
        }
    }

    Ok(())
}

fn print_config(config: &Config) -> Result<()> {
    println!("設定:");
    println!("  モデル: {}", config.model);
    println!("  タイムアウト: {}秒", config.timeout_seconds);
    println!("  進捗の時定数: {}ms", config.progress_time_constant_ms);
    println!("  履歴: {}", config.history_dir()?.display());
    println!(
        "  APIキー: {}",
        config.masked_api_key().unwrap_or_else(|| "未設定".to_string())
    );
    Ok(())
}

/// APIキーを確認してセッションを用意する（キーがなければ何もさせない）
fn connect(config: &Config) -> Result<SessionController<FileStore>> {
    let api_key = config.require_api_key()?;
    let gateway = GeminiGateway::new(
        api_key,
        config.model.clone(),
        std::time::Duration::from_secs(config.timeout_seconds),
    )?;
    let store = FileStore::new(config.history_dir()?);
    let history = HistoryStore::load(store);

    Ok(SessionController::new(
        history,
        Arc::new(gateway),
        SessionOptions::from(config),
    ))
}

/// 進捗バーを表示しながら抽出する
async fn extract_with_progress(
    controller: &SessionController<FileStore>,
    image: gateway::ImageInput,
) -> ExtractionOutcome {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("  [{bar:40.cyan/blue}] {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let mut updates = controller.subscribe();
    let view = bar.clone();
    let render = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let progress = updates.borrow_and_update().progress();
            view.set_position(u64::from(progress));
        }
    });

    let outcome = controller.extract(image).await;

    render.abort();
    bar.set_position(u64::from(controller.session().progress()));
    bar.finish_and_clear();
    outcome
}
