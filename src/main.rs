use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};

use prismvot::data::loader::guess_param_value;
use prismvot::{
    FilterState, export_csv, export_json, filtered_indices, load_dir, load_file, validate,
    write_votable,
};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Command::new("prismvot")
        .version("0.1.0")
        .about("SpeX Prism spectral-library toolkit")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("inspect")
                .about("Print document metadata and a table summary")
                .arg(Arg::new("file").required(true).help("Path to a document")),
        )
        .subcommand(
            Command::new("validate")
                .about("Parse a document and check its data invariants")
                .arg(Arg::new("file").required(true).help("Path to a document")),
        )
        .subcommand(
            Command::new("export")
                .about("Re-serialize a document as CSV, JSON or canonical XML")
                .arg(Arg::new("file").required(true).help("Path to a document"))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("Output format: csv, json or votable"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .help("Output path (stdout if omitted)"),
                ),
        )
        .subcommand(
            Command::new("scan")
                .about("Load a directory of documents and list matching entries")
                .arg(Arg::new("dir").required(true).help("Directory to scan"))
                .arg(
                    Arg::new("param")
                        .long("param")
                        .action(ArgAction::Append)
                        .help("NAME=VALUE parameter filter (repeatable)"),
                ),
        );

    match cli.get_matches().subcommand() {
        Some(("inspect", args)) => inspect(&path_arg(args, "file")),
        Some(("validate", args)) => run_validate(&path_arg(args, "file")),
        Some(("export", args)) => {
            let format = args.get_one::<String>("format").unwrap().clone();
            let output = args.get_one::<String>("output").map(PathBuf::from);
            export(&path_arg(args, "file"), &format, output.as_deref())
        }
        Some(("scan", args)) => {
            let params: Vec<String> = args
                .get_many::<String>("param")
                .map(|vals| vals.cloned().collect())
                .unwrap_or_default();
            scan(&path_arg(args, "dir"), &params)
        }
        _ => Ok(()),
    }
}

fn path_arg(args: &ArgMatches, name: &str) -> PathBuf {
    PathBuf::from(args.get_one::<String>(name).unwrap())
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn inspect(path: &Path) -> Result<()> {
    let document =
        load_file(path).with_context(|| format!("loading {}", path.display()))?;

    println!("Document: {}", path.display());
    if let Some(title) = document.title() {
        println!("  title:          {title}");
    }
    if let Some(collection) = document.collection() {
        println!("  collection:     {collection}");
    }
    if let Some(spectral_type) = document.spectral_type() {
        println!("  spectral type:  {spectral_type}");
    }
    if let Some(contact) = document.contact_name() {
        let email = document
            .contact_email()
            .map(|e| format!(" <{e}>"))
            .unwrap_or_default();
        println!("  contact:        {contact}{email}");
    }

    println!("Parameters ({}):", document.params.len());
    for param in &document.params {
        let unit = param
            .unit
            .as_deref()
            .map(|u| format!(" [{u}]"))
            .unwrap_or_default();
        println!("  {:<24} {}{unit}", param.name, param.value);
    }

    println!("Fields:");
    for field in &document.fields {
        println!(
            "  {:<12} datatype={} unit={} ucd={}",
            field.name,
            field.datatype,
            field.unit.as_deref().unwrap_or("-"),
            field.ucd.as_deref().unwrap_or("-"),
        );
    }

    println!("Rows: {}", document.len());
    if let (Some(first), Some(last)) = (document.first(), document.last()) {
        println!("  first: ({}, {:e})", first.wavelength, first.flux);
        println!("  last:  ({}, {:e})", last.wavelength, last.flux);
    }
    Ok(())
}

fn run_validate(path: &Path) -> Result<()> {
    let document =
        load_file(path).with_context(|| format!("loading {}", path.display()))?;
    validate(&document).with_context(|| format!("validating {}", path.display()))?;
    println!("{}: OK ({} rows)", path.display(), document.len());
    Ok(())
}

fn export(path: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let document =
        load_file(path).with_context(|| format!("loading {}", path.display()))?;

    let text = match format {
        "csv" => export_csv(&document)?,
        "json" => export_json(&document)?,
        "votable" | "xml" => write_votable(&document),
        other => bail!("unsupported export format '{other}' (expected csv, json or votable)"),
    };

    match output {
        Some(out) => {
            std::fs::write(out, &text).with_context(|| format!("writing {}", out.display()))?;
            log::info!("exported {} as {format} to {}", path.display(), out.display());
            println!("Wrote {}", out.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn scan(dir: &Path, params: &[String]) -> Result<()> {
    let collection = load_dir(dir).with_context(|| format!("scanning {}", dir.display()))?;

    let mut filters = FilterState::new();
    for pair in params {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("invalid --param '{pair}' (expected NAME=VALUE)");
        };
        filters
            .entry(name.to_string())
            .or_default()
            .insert(guess_param_value(value));
    }

    let indices = filtered_indices(&collection, &filters);
    println!("{} of {} documents match", indices.len(), collection.len());
    for i in indices {
        let entry = &collection.entries[i];
        println!(
            "  {}  type={} rows={}",
            entry.path.display(),
            entry.document.spectral_type().unwrap_or("-"),
            entry.document.len(),
        );
    }
    Ok(())
}
