use clap::Parser;
use verification_fixtures::utils::{logger, validation::Validate};
use verification_fixtures::{CliConfig, HarnessError, Verifier};

fn fail(e: &HarnessError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let (definition, options) = match config.to_verification() {
        Ok(verification) => verification,
        Err(e) => fail(&e),
    };

    let verifier = Verifier::new(options);
    let report = verifier.run(&definition).await;

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(&HarnessError::SerializationError(e)),
    }

    let failed = report.results.iter().filter(|r| r.is_error()).count();
    if failed > 0 {
        tracing::warn!("⚠️ {} of {} case(s) failed", failed, report.results.len());
    } else {
        tracing::info!("✅ All {} case(s) passed", report.results.len());
    }

    // 逾時的阻塞工作不會自行結束，直接結束行程而不等待執行緒池
    let code = if config.config.is_none() && failed > 0 { 2 } else { 0 };
    std::process::exit(code);
}
