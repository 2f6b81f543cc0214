use anyhow::Result;
use hosanna::cli::{self, Command};
use hosanna::context::{AppContext, StandardContext};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let binary_name = args
        .first()
        .and_then(|p| std::path::Path::new(p).file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "hosanna".to_string());

    let parsed = cli::parse_args(args.get(1..).unwrap_or_default())?;
    if parsed.help {
        cli::print_help(&binary_name);
        return Ok(());
    }

    let ctx: Arc<dyn AppContext> = Arc::new(StandardContext::new(parsed.root.clone()));

    match Command::parse(&parsed.rest)? {
        Some(cmd) => cli::run(ctx.as_ref(), parsed.catalog, cmd),
        // Normal TUI startup
        None => hosanna::tui::run(ctx, parsed.catalog).await,
    }
}
