//! Fintab CLI - normalize and consolidate financial tables

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use fintab::{
    check_grid, consolidate_blocks,
    export::{
        block_to_delimited, block_to_embedding_text, block_to_row_major,
        consolidated_to_delimited, consolidated_to_embedding_text, consolidated_to_row_major,
    },
    format_diagnostics,
    markdown::parse_markdown_table,
    normalize_grid_with_options, NormalizeOptions, Provenance, TableBlock,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "fintab")]
#[command(author = "SciPenAI")]
#[command(version)]
#[command(about = "Fintab - Header normalization and time-series consolidation for financial tables", long_about = None)]
struct Cli {
    /// Input files containing markdown pipe tables (reads stdin if empty)
    input_files: Vec<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Merge all normalized blocks into one consolidated table
    #[arg(short, long)]
    consolidate: bool,

    /// Transpose the consolidated table (one row per period); implies --consolidate
    #[arg(short, long)]
    transpose: bool,

    /// Treat each grid as a single block even if embedded headers appear
    #[arg(long)]
    no_split: bool,

    /// Require positive header signals instead of assuming row 0 is a header
    #[arg(long)]
    strict: bool,

    /// Check mode - report grid structure and issues without converting
    #[arg(long)]
    check: bool,

    /// Use colored output (for check mode)
    #[arg(long, default_value_t = true)]
    color: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Plain text (title, header, data lines)
    Text,
    /// Row-major JSON with validation block
    Json,
    /// Comma-delimited
    Csv,
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let mut options = NormalizeOptions::default();
    if cli.no_split {
        options.split_blocks = false;
    }
    if cli.strict {
        options.assume_header_when_ambiguous = false;
    }

    let inputs = match read_inputs(&cli.input_files) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.check {
        let mut out = String::new();
        for (name, text) in &inputs {
            let grid = parse_markdown_table(text, Provenance::new(name.clone()));
            let result = check_grid(&grid);
            out.push_str(&format!("{}:\n", name));
            out.push_str(&format_diagnostics(&result, cli.color));
            out.push('\n');
        }
        write_output(&cli.output, &out);
        return;
    }

    let mut blocks: Vec<TableBlock> = Vec::new();
    let mut warned = false;
    for (name, text) in &inputs {
        let provenance = Provenance::new(name.clone()).with_title(title_from_name(name));
        let grid = parse_markdown_table(text, provenance);
        let output = normalize_grid_with_options(&grid, &options);
        for warning in &output.warnings {
            eprintln!("{}: {}", name, warning);
            warned = true;
        }
        blocks.extend(output.blocks);
    }

    if blocks.is_empty() {
        eprintln!("error: no tables found in input");
        std::process::exit(if warned { 1 } else { 2 });
    }

    let rendered = if cli.consolidate || cli.transpose {
        let table = consolidate_blocks(&blocks, cli.transpose);
        for warning in &table.validation.warnings {
            eprintln!("validation: {}", warning);
        }
        match cli.format {
            Format::Text => consolidated_to_embedding_text(&table),
            Format::Json => {
                serde_json::to_string_pretty(&consolidated_to_row_major(&table))
                    .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
            }
            Format::Csv => match consolidated_to_delimited(&table, b',') {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("error: {}", e);
                    std::process::exit(1);
                }
            },
        }
    } else {
        let mut out = String::new();
        for block in &blocks {
            let rendered = match cli.format {
                Format::Text => block_to_embedding_text(block),
                Format::Json => serde_json::to_string_pretty(&block_to_row_major(block))
                    .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)),
                Format::Csv => match block_to_delimited(block, b',') {
                    Ok(text) => text,
                    Err(e) => {
                        eprintln!("error: {}", e);
                        std::process::exit(1);
                    }
                },
            };
            out.push_str(&rendered);
            out.push('\n');
        }
        out
    };

    write_output(&cli.output, &rendered);
}

/// Read every input file, or stdin when none was given
#[cfg(feature = "cli")]
fn read_inputs(files: &[String]) -> io::Result<Vec<(String, String)>> {
    if files.is_empty() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(vec![("stdin".to_string(), buffer)]);
    }
    files
        .iter()
        .map(|path| fs::read_to_string(path).map(|text| (path.clone(), text)))
        .collect()
}

/// Default table title from a file name: stem, underscores to spaces
#[cfg(feature = "cli")]
fn title_from_name(name: &str) -> String {
    std::path::Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
        .replace('_', " ")
}

#[cfg(feature = "cli")]
fn write_output(target: &Option<String>, content: &str) {
    match target {
        Some(path) => {
            if let Err(e) = fs::write(path, content) {
                eprintln!("error: failed to write {}: {}", path, e);
                std::process::exit(1);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let _ = handle.write_all(content.as_bytes());
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("fintab was built without the 'cli' feature");
}
