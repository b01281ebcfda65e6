mod cli;

use yansa::{batch, config, output};
use yansa_parser::rules::{BundledRules, DirectoryRules, RuleSource};
use yansa_parser::Rules;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, RulesCommand};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "yansa=trace,yansa_parser=trace".to_string()
        } else {
            "yansa=info,yansa_parser=info".to_string()
        }
    });

    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Parse {
            filenames,
            studio,
            json,
            trace,
        } => parse_names(
            &filenames,
            studio.as_deref(),
            json,
            trace,
            cli.config.as_deref(),
        ),
        Commands::Batch {
            list,
            studio,
            output,
        } => run_batch(
            &list,
            studio.as_deref(),
            output.as_deref(),
            cli.config.as_deref(),
        ),
        Commands::Rules {
            command: RulesCommand::Check { dir },
        } => check_rules(dir.as_deref(), cli.config.as_deref()),
        Commands::Version => {
            println!("yansa {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn parse_names(
    filenames: &[String],
    studio: Option<&str>,
    json: bool,
    trace: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let parser = config.build_parser();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (i, filename) in filenames.iter().enumerate() {
        if trace {
            if i > 0 {
                writeln!(out)?;
            }
            let stages = parser.stages(filename, studio);
            write!(out, "{}", output::trace(filename, &stages))?;
            continue;
        }

        let result = parser.parse(filename, studio);
        if json {
            writeln!(out, "{}", serde_json::to_string(&result)?)?;
        } else {
            if i > 0 {
                writeln!(out)?;
            }
            write!(out, "{}", output::summary(&result))?;
        }
    }

    Ok(())
}

fn run_batch(
    list: &str,
    studio: Option<&str>,
    output_path: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let names = if list == "-" {
        batch::read_names(io::stdin().lock())?
    } else {
        let file = File::open(list).with_context(|| format!("Failed to open list: {}", list))?;
        batch::read_names(BufReader::new(file))?
    };

    let runner = batch::BatchParser::new(config.build_parser(), config.batch.threads)?;
    tracing::info!(
        "Parsing {} filenames on {} threads",
        names.len(),
        runner.threads()
    );
    let results = runner.parse_all(&names, studio);

    let mut writer: Box<dyn Write> = match output_path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    for result in &results {
        serde_json::to_writer(&mut writer, result)?;
        writeln!(writer)?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} results", results.len());
    Ok(())
}

fn check_rules(dir: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let dir = dir.map(Path::to_path_buf).or(config.rules.dir);

    let source: Box<dyn RuleSource> = match &dir {
        Some(dir) => {
            if !dir.is_dir() {
                anyhow::bail!("Rules directory does not exist: {:?}", dir);
            }
            println!("Checking rule tables in {:?}", dir);
            Box::new(DirectoryRules::new(dir))
        }
        None => {
            println!("Checking bundled rule tables");
            Box::new(BundledRules)
        }
    };

    let rules = Rules::try_load(source.as_ref()).context("Rule tables are invalid")?;

    for (table, count) in rules.counts() {
        println!("✓ {:<24} {} entries", table.file_name(), count);
    }
    println!("All rule tables are valid");

    Ok(())
}
