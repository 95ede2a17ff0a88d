use clap::Parser;
use doc_links::{LinkOptions, ResolvedLink, TextDocument, UrlJoinResolver, find_document_links};
use mimalloc::MiMalloc;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use url::Url;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Print the `href`/`src` links of a markup file with their source ranges.
///
/// Ranges are zero-based `line:character` pairs, characters counted in UTF-16
/// code units.
#[derive(Debug, Parser)]
#[command(name = "hreflinks", version)]
struct Cli {
    /// Markup file to scan.
    file: PathBuf,

    /// Document URI used as the resolution anchor (defaults to the file URL).
    #[arg(long)]
    uri: Option<String>,

    /// Content language id (defaults from the file extension).
    #[arg(long)]
    language_id: Option<String>,

    /// Report relative references as written instead of joining them.
    #[arg(long)]
    no_resolve: bool,

    /// Emit a JSON report instead of one line per link.
    #[arg(long)]
    json: bool,
}

#[derive(Debug)]
enum CliError {
    Read { path: PathBuf, source: io::Error },
    FileUri { path: PathBuf },
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::FileUri { path } => write!(f, "cannot express {} as a file URI", path.display()),
            Self::Json(err) => write!(f, "failed to encode report: {err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::FileUri { .. } => None,
            Self::Json(err) => Some(err),
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    uri: &'a str,
    language_id: &'a str,
    links: &'a [ResolvedLink],
}

fn language_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("hbs") || ext.eq_ignore_ascii_case("handlebars") => {
            "handlebars"
        }
        _ => "html",
    }
}

fn file_uri(path: &Path) -> Result<String, CliError> {
    let absolute = fs::canonicalize(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|()| CliError::FileUri { path: absolute })
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let bytes = fs::read(&cli.file).map_err(|source| CliError::Read {
        path: cli.file.clone(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let uri = match &cli.uri {
        Some(uri) => uri.clone(),
        None => file_uri(&cli.file)?,
    };
    let language_id = cli
        .language_id
        .clone()
        .unwrap_or_else(|| language_for(&cli.file).to_string());
    log::debug!("scanning {uri} as {language_id}");

    let document = TextDocument::new(uri, language_id, text);
    let resolver = UrlJoinResolver;
    let options = if cli.no_resolve {
        LinkOptions::default()
    } else {
        LinkOptions::with_resolver(&resolver)
    };
    let links = find_document_links(&document, &options);

    if cli.json {
        let report = Report {
            uri: document.uri(),
            language_id: document.language_id(),
            links: &links,
        };
        let json = serde_json::to_string_pretty(&report).map_err(CliError::Json)?;
        println!("{json}");
    } else {
        for link in &links {
            println!(
                "{}:{}-{}:{}\t{}",
                link.range.start.line,
                link.range.start.character,
                link.range.end.line,
                link.range.end.character,
                link.target
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("hreflinks: {err}");
            ExitCode::FAILURE
        }
    }
}
