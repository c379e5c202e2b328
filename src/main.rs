use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

use hessian_enumer::config::{Config, SourceConfig};
use hessian_enumer::extractor::{self, ExtractOptions};
use hessian_enumer::frontend::UnitParser;
use hessian_enumer::generator::DescriptorGenerator;
use hessian_enumer::scanner;

#[derive(Parser)]
#[command(name = "hessian-enumer")]
#[command(about = "Generates hessian2 JavaEnum descriptor files from annotated Go sources")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "enumer.toml")]
    config: PathBuf,

    /// Java package prefix for types without a class directive
    #[arg(short, long)]
    package: Option<String>,

    /// Comma-separated list of type names to generate (default: all)
    #[arg(short, long)]
    types: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Directories to scan, in addition to configured sources
    dirs: Vec<PathBuf>,
}

/// One scan-then-generate pass. All units are parsed and validated
/// before the first write, so a failing unit produces no output at all.
fn run(cli: &Cli) -> Result<()> {
    let start = Instant::now();

    let mut config = if cli.config.exists() {
        Config::load(&cli.config)
            .with_context(|| format!("Failed to load config from {:?}", cli.config))?
    } else {
        Config::default()
    };
    if let Some(package) = &cli.package {
        config.naming.package_prefix = package.clone();
    }

    println!("hessian-enumer v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", "=".repeat(50));

    println!("\n[1/3] Scanning sources...");
    let mut files: Vec<PathBuf> = Vec::new();
    for source in &config.sources {
        match source {
            SourceConfig::Directory { path } => {
                if !path.is_dir() {
                    anyhow::bail!("Source directory not found: {:?}", path);
                }
                files.extend(scanner::scan_directory(path)?);
            }
            SourceConfig::Glob { pattern } => {
                files.extend(scanner::expand_glob(pattern)?);
            }
        }
    }
    for dir in &cli.dirs {
        if !dir.is_dir() {
            anyhow::bail!("Source directory not found: {:?}", dir);
        }
        files.extend(scanner::scan_directory(dir)?);
    }
    if config.sources.is_empty() && cli.dirs.is_empty() {
        files.extend(scanner::scan_directory(Path::new("."))?);
    }
    files.sort();
    files.dedup();
    println!("  Found {} Go files", files.len());

    println!("\n[2/3] Extracting enum types...");
    let parser = UnitParser::new();
    let options = ExtractOptions::from(&config.naming);
    let mut specs = Vec::new();
    for file in &files {
        let unit = parser.parse_file(file)?;
        let extracted = extractor::extract_unit(&unit, &options)
            .with_context(|| format!("in {}", file.display()))?;
        if cli.verbose {
            for spec in &extracted {
                println!(
                    "  [enum] {} -> {} ({} members)",
                    spec.type_name,
                    spec.external_class_name,
                    spec.members.len()
                );
            }
        }
        specs.extend(extracted);
    }
    println!("  Extracted {} enum types", specs.len());

    if let Some(filter) = &cli.types {
        let wanted: Vec<&str> = filter
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        for name in &wanted {
            if !specs.iter().any(|s| s.type_name == *name) {
                anyhow::bail!("type {} not found in scanned sources", name);
            }
        }
        specs.retain(|s| wanted.contains(&s.type_name.as_str()));
    }

    println!("\n[3/3] Generating descriptors...");
    let generator = DescriptorGenerator::new(&config.output.suffix);
    let mut written = 0;
    for spec in &specs {
        let (path, wrote) = generator.write(spec)?;
        if wrote {
            written += 1;
            println!("  Written {:?}", path);
        } else if cli.verbose {
            println!("  No changes for {:?}", path);
        }
    }
    if written == 0 && !specs.is_empty() {
        println!("  No changes, skipping all writes");
    }

    let elapsed = start.elapsed();
    println!("\n{}", "=".repeat(50));
    println!(
        "Done! {} enum types, {} file(s) written in {:?}",
        specs.len(),
        written,
        elapsed
    );

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(&cli)
}
