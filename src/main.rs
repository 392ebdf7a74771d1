use clap::Parser;
use r2_pdf_mirror::core::sheet::SheetLayout;
use r2_pdf_mirror::utils::{logger, monitor::MemoryMonitor, validation::Validate};
use r2_pdf_mirror::{
    adapters, CliArgs, MirrorConfig, MirrorEngine, MirrorError, R2Store, RetryingHttpClient,
    RunLog, TcpProbe, TransferWorker,
};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    if let Err(e) = run(&args).await {
        tracing::error!("❌ Run aborted: {} (Severity: {:?})", e, e.severity());
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);

        std::process::exit(e.exit_code());
    }
}

async fn run(args: &CliArgs) -> Result<(), MirrorError> {
    let config = args.load_config()?;
    config.validate()?;

    tracing::info!("🚀 Starting R2 PDF mirror");
    tracing::info!("Bucket: {}", config.storage.bucket);
    tracing::info!("Excel key: {}", config.sheet.key);
    tracing::info!("Upload prefix: {}", config.download.upload_prefix);

    let mut monitor = MemoryMonitor::new(args.monitor);
    monitor.sample("Startup");

    let engine = build_engine(&config).await?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - listing URLs only");
        let urls = engine.read_urls().await?;
        for url in &urls {
            println!("{}", url);
        }
        tracing::info!("{} URLs would be mirrored", urls.len());
        return Ok(());
    }

    let mut log = RunLog::create(config.log_dir())?;
    let summary = match engine.run(&mut log).await {
        Ok(summary) => summary,
        Err(e) => {
            log.line(&format!("ERROR reading spreadsheet: {}", e))?;
            return Err(e);
        }
    };

    monitor.report(summary.bytes);
    tracing::info!("📁 Log saved: {}", log.path().display());
    println!("{}", summary);
    Ok(())
}

async fn build_engine(
    config: &MirrorConfig,
) -> Result<MirrorEngine<RetryingHttpClient, R2Store, TcpProbe>, MirrorError> {
    let s3_client = adapters::build_s3_client(&config.storage).await?;
    let store = R2Store::new(s3_client, config.storage.bucket.clone())
        .with_part_size(config.download.part_size_bytes());
    let http = RetryingHttpClient::from_config(&config.download)?;
    let probe = TcpProbe::from_config(&config.connectivity);

    let worker = TransferWorker::new(http, store, probe, config.download.upload_prefix.clone())
        .with_probe_interval(config.connectivity.interval());

    Ok(MirrorEngine::new(worker, config.sheet.key.clone())
        .with_layout(SheetLayout::from_config(&config.sheet)?)
        .with_workers(config.download.workers))
}
