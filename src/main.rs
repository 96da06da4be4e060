use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use hatsuon::{
    config::Config, session::handle_bytes, trace::init_tracing_subscriber, SimilarityScorer,
    WordBank,
};

/// Score pronunciation attempts read from stdin.
///
/// Example:
/// ```text
/// $ echo "arigatou arigato" | hatsuon
/// {"word":"arigatou","overall_score":88,...}
/// ```
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = Config::load().context("Cannot load config")?;

    let _otel_guard = init_tracing_subscriber(config.tracing_level()?, &config.otel_http_url)?;

    let bank = match &config.word_bank_path {
        Some(path) => WordBank::load(path)
            .with_context(|| format!("Cannot load word bank from {}", path))?,
        None => WordBank::builtin(),
    };

    let scorer = SimilarityScorer::from_config(&config);
    info!(
        words = bank.len(),
        mode = ?scorer.mode(),
        seeded = config.seed.is_some(),
        "Ready to score attempts"
    );

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut line = Vec::new();

    loop {
        line.clear();
        if stdin.read_until(b'\n', &mut line).await? == 0 {
            break;
        }

        if let Some(reply) = handle_bytes(&scorer, &bank, &line) {
            let mut output = serde_json::to_string(&reply)?;
            output.push('\n');
            stdout.write_all(output.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    let stats = scorer.metrics().get_stats();
    info!(
        attempts = stats.attempts_scored,
        units = stats.units_scored,
        cache_hit_rate = stats.score_cache_hit_rate(),
        "Input closed"
    );

    Ok(())
}
