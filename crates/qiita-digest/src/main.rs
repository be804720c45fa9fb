use anyhow::{Context, Result};
use clap::Parser;
use shared::{Config, Digest, MailConfig, Mailer, QiitaClient};

#[derive(Parser)]
#[command(name = "qiita-digest")]
#[command(about = "Fetch Qiita articles and mail yourself a plain-text digest")]
struct Args {
    /// Search query passed to the Qiita items API
    #[arg(short, long, default_value = "LLM")]
    query: String,

    /// Page number to fetch
    #[arg(long, default_value = "1")]
    page: u32,

    /// Articles per page (at most 100)
    #[arg(short = 'n', long, default_value = "10")]
    per_page: u32,

    /// Print the digest instead of sending it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    // Credentials are checked before fetching, but a dry run never needs them.
    let mail_config = if args.dry_run {
        None
    } else {
        Some(MailConfig::from_env(config.request_timeout)?)
    };
    let query = Some(args.query.as_str()).filter(|q| !q.trim().is_empty());

    println!("📚 Fetching articles from Qiita...");
    let client = QiitaClient::new(config.qiita_access_token.clone(), config.request_timeout)?;
    let articles = client
        .fetch_items(args.page, args.per_page, query)
        .await
        .context("Failed to fetch articles")?;

    println!("✓ Found {} articles", articles.len());

    let digest = Digest::new(&articles, query);

    let Some(mail_config) = mail_config else {
        println!("\nSubject: {}\n", digest.subject);
        println!("{}", digest.body);
        return Ok(());
    };

    println!("\n✉️  Sending digest to {}...", mail_config.email_address);
    let mailer = Mailer::new(mail_config);
    if mailer.send(&digest.subject, &digest.body).await {
        println!("✅ Email sent successfully!");
    } else {
        println!("⚠ Email could not be sent (see log above)");
    }

    Ok(())
}
