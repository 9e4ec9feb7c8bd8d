use clap::Parser;
use inventaro_client::config::cli::{Command, ResolvedConfig};
use inventaro_client::core::controller::{ActionKey, Notification, NotificationSeverity};
use inventaro_client::utils::error::{AppError, ErrorSeverity};
use inventaro_client::utils::logger;
use inventaro_client::{report, ArticleController, ArticleStore, CliConfig, HttpArticleService};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ inventaro failed: {} (Severity: {:?})",
            e,
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,      // 輸入不合法
            ErrorSeverity::Medium => 2,   // 可重試
            ErrorSeverity::High => 1,     // 伺服器拒絕
            ErrorSeverity::Critical => 3, // 設定或回應格式錯誤
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> Result<(), AppError> {
    let resolved = cli.resolve()?;
    let service = HttpArticleService::new(&resolved.service)?;
    tracing::info!("🚀 Using inventory service at {}", service.base_url());

    let store = Arc::new(RwLock::new(ArticleStore::new()));
    let controller = ArticleController::new(service, Arc::clone(&store));
    let mut notifications = controller.subscribe();

    // 整頁資料：載入失敗時不顯示任何清單
    controller.load_all().await?;

    let outcome = execute(&controller, &cli.command, &resolved).await;
    print_notifications(&mut notifications);

    // 表單錯誤不會發通知，訊息由 main 統一印出
    if let Some(key) = form_key(&cli.command) {
        let status = controller.status(&key).await;
        tracing::debug!("{:?} finished with {:?}", key, status);
    }

    outcome
}

async fn execute(
    controller: &ArticleController<HttpArticleService>,
    command: &Command,
    resolved: &ResolvedConfig,
) -> Result<(), AppError> {
    match command {
        Command::List { .. } => {
            let store = controller.store();
            let store = store.read().await;
            let output = if resolved.low_stock_only {
                report::render(store.low_stock(), resolved.format)?
            } else {
                report::render(store.list(), resolved.format)?
            };
            println!("{}", output);
        }
        Command::Create(fields) => {
            let article = controller.create(fields.clone().into()).await?;
            println!("{}", article.id);
        }
        Command::Update { .. } => {
            if let Some((id, input)) = command.update_input() {
                controller.update_metadata(&id, input).await?;
            }
        }
        Command::Quantity { .. } => {
            if let Some((id, change)) = command.quantity_change() {
                controller.adjust_quantity(&id, change).await?;
            }
        }
        Command::Delete { id } => {
            controller.delete(&id.as_str().into()).await?;
        }
    }
    Ok(())
}

fn form_key(command: &Command) -> Option<ActionKey> {
    match command {
        Command::Create(_) => Some(ActionKey::Create),
        Command::Update { id, .. } => Some(ActionKey::UpdateMetadata(id.as_str().into())),
        _ => None,
    }
}

fn print_notifications(receiver: &mut broadcast::Receiver<Notification>) {
    while let Ok(notification) = receiver.try_recv() {
        match notification.severity {
            NotificationSeverity::Info => {
                println!("✅ {}: {}", notification.title, notification.description)
            }
            NotificationSeverity::Destructive => {
                eprintln!("❌ {}: {}", notification.title, notification.description)
            }
        }
    }
}
