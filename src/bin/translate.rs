//! One-shot translation from the command line, straight through the provider client
//!
//! Usage:
//!   cargo run --bin translate -- こんにちは                 # Target from the process locale
//!   cargo run --bin translate -- --target fr --source ja 質問
//!   echo "本文" | cargo run --bin translate                 # Text from stdin
//!   cargo run --bin translate -- --list                    # Show the locale table
//!
//! Environment variables:
//! - DEEPL_API_KEY (optional; without it the text is echoed back unchanged)
//! - DEEPL_API_URL (defaults to https://api-free.deepl.com/v2)
//! - PROVIDER_TIMEOUT_SECS (defaults to 5)

use anyhow::{bail, Context, Result};
use qa_translate::{
    config::Config,
    language::{detect_target_language, resolve, supported_languages},
    metrics::TranslationMetrics,
    policy::{needs_translation, DEFAULT_CONTENT_LANGUAGE},
    provider::ProviderClient,
};
use std::io::Read;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default)]
struct Args {
    target: Option<String>,
    source: Option<String>,
    list: bool,
    text: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--target" | "-t" => {
                parsed.target = Some(iter.next().context("--target needs a value")?.clone());
            }
            "--source" | "-s" => {
                parsed.source = Some(iter.next().context("--source needs a value")?.clone());
            }
            "--list" => parsed.list = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            _ => parsed.text.push(arg.clone()),
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qa_translate=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;

    if args.list {
        for lang in supported_languages() {
            println!("{:<4} {:<7} {}", lang.tag, lang.provider_code, lang.name);
        }
        return Ok(());
    }

    let text = if args.text.is_empty() {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read text from stdin")?;
        buffer.trim_end().to_string()
    } else {
        args.text.join(" ")
    };

    if text.is_empty() {
        bail!("No text given (pass it as arguments or on stdin)");
    }

    let target = match args.target.as_deref() {
        Some(tag) => resolve(Some(tag)),
        None => detect_target_language(),
    };
    let source = args
        .source
        .unwrap_or_else(|| DEFAULT_CONTENT_LANGUAGE.to_string());

    if !needs_translation(&source, target.as_str()) {
        info!("No translation needed from {} to {}", source, target);
        println!("{}", text);
        return Ok(());
    }

    let config = Config::from_env()?;
    let provider = ProviderClient::from_config(&config, Arc::new(TranslationMetrics::new()))?;

    let translated = provider.translate(&text, target.as_str(), Some(&source)).await;
    println!("{}", translated);

    Ok(())
}
