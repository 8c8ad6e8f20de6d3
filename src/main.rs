use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use typeview::{
    Decompiler, DocumentationSource, FrameworkLinks, JsonDecompiler, LazyDecompiler, MemberDocs, NoDocs, NoLinks,
    RenderConfig, RenderServices, TypeDefinition, TypeDocumentation, TypeUrlResolver,
};

fn load_config(path: Option<&PathBuf>) -> Result<RenderConfig> {
    let config = match path {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::load_default()?,
    };
    Ok(config)
}

fn load_links(path: Option<&PathBuf>) -> Result<Arc<dyn TypeUrlResolver>> {
    match path {
        Some(path) => Ok(Arc::new(FrameworkLinks::load(path)?)),
        None => Ok(Arc::new(NoLinks)),
    }
}

fn load_docs(path: Option<&PathBuf>) -> Result<Box<dyn DocumentationSource>> {
    match path {
        Some(path) => Ok(Box::new(MemberDocs::load(path)?)),
        None => Ok(Box::new(NoDocs)),
    }
}

fn dump_slot(dir: &Path) -> LazyDecompiler {
    let dir = dir.to_path_buf();
    LazyDecompiler::new(move || {
        if dir.is_dir() {
            Some(Arc::new(JsonDecompiler::new(dir.clone())) as Arc<dyn Decompiler>)
        } else {
            debug!("No syntax dumps at {}", dir.display());
            None
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("typeview")
        .about("Render decompiled C# types as HTML")
        .arg(
            Arg::new("dumps")
                .help("Directory of syntax dumps ({FullName}.json or .json.zst)")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("type")
                .help("Fully-qualified name of the type to render")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("interface")
                .long("interface")
                .help("Render only the externally visible declarations")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Render settings (defaults to the user config directory)"),
        )
        .arg(
            Arg::new("links")
                .long("links")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Link table for the package's target framework"),
        )
        .arg(
            Arg::new("docs")
                .long("docs")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Documentation summaries keyed by documentation id"),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .help("Print the type summary before the code")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let dumps = matches
        .get_one::<PathBuf>("dumps")
        .context("Missing dump directory")?;
    let full_name = matches
        .get_one::<String>("type")
        .context("Missing type name")?;

    let config = load_config(matches.get_one::<PathBuf>("config")).context("Failed to load config")?;
    let links = load_links(matches.get_one::<PathBuf>("links"))?;
    let docs = load_docs(matches.get_one::<PathBuf>("docs"))?;

    let services = RenderServices::new(
        links,
        Arc::new(dump_slot(dumps)),
        Arc::new(dump_slot(dumps)),
        config,
    );
    let doc = TypeDocumentation::new(TypeDefinition::new(full_name), docs.as_ref(), services);

    if matches.get_flag("summary") && !doc.summary_text().is_empty() {
        println!("<p class=\"summary\">{}</p>", typeview::renderer::encode_html(doc.summary_text()));
    }

    let html = if matches.get_flag("interface") {
        doc.render_interface_view().await
    } else {
        doc.render_full_body().await
    };
    println!("{}", html);

    Ok(())
}
