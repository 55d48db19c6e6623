mod app;
mod util;

use anyhow::{Context as _, Result};
use clap::Parser;
use settings_forge::compiler::{CompileOptions, Compiler, NestedTreePolicy};
use settings_forge::demo::DemoSettings;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Settings page shown at startup; unknown names fall back to the first page.
    #[arg(long, default_value = "Audio")]
    page: String,

    /// Initial search query.
    #[arg(long)]
    search: Option<String>,

    /// How plain nested trees bucket their children: flatten or scoped.
    #[arg(long, default_value_t = NestedTreePolicy::Flatten)]
    nested: NestedTreePolicy,

    /// Print the compiled settings as JSON and exit.
    #[arg(long)]
    dump: bool,

    /// Log filter, e.g. `debug` or `settings_forge=trace`. Overrides RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

fn init_tracing(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter '{directives}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn dump(options: CompileOptions, query: Option<&str>) -> Result<()> {
    let settings = DemoSettings::new();
    let tree = settings.tree();
    let mut compiler = Compiler::with_options(options);
    let schema = compiler
        .compile(&tree)
        .context("failed to compile the demo settings")?;

    let output = match query {
        Some(query) => serde_json::to_string_pretty(&serde_json::json!({
            "pages": &*schema,
            "search": compiler.query(query),
        })),
        None => serde_json::to_string_pretty(&*schema),
    }
    .context("failed to serialize the compiled settings")?;

    println!("{output}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    let options = CompileOptions {
        nested_trees: args.nested,
        ..CompileOptions::default()
    };

    if args.dump {
        return dump(options, args.search.as_deref());
    }

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([960.0, 680.0]),
        ..Default::default()
    };

    eframe::run_native(
        "settings-forge",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(app::SettingsApp::new(
                cc,
                options,
                args.page.clone(),
                args.search.clone(),
            )))
        }),
    )
    .map_err(|error| anyhow::anyhow!("settings window failed: {error}"))
}
