//! Magic Mapper CLI
//!
//! Command-line interface for mapping JSON documents.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use magic_mapper::{
    load_json, load_options, load_schema, MagicMapper, MapperOptions, PROPERTY_TRANSFORMS,
    VALUE_TRANSFORMS,
};

#[derive(Parser)]
#[command(name = "magic-mapper")]
#[command(about = "Map JSON objects to new objects using transforms and schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a JSON object (or array of objects)
    Map {
        /// Source JSON file
        source: PathBuf,

        /// Schema file: property name -> {"kind": "direct" | "transform" | "literal", "value": ...}
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Options file: {"propertyTransform", "valueTransform", "exclusive", "maxDepth"}
        #[arg(long)]
        options: Option<PathBuf>,

        /// Built-in property transform (overrides the options file)
        #[arg(long, short = 'p')]
        property_transform: Option<String>,

        /// Built-in value transform (overrides the options file)
        #[arg(long, short = 'v')]
        value_transform: Option<String>,

        /// Only keep properties listed in the schema
        #[arg(long)]
        exclusive: bool,

        /// Fail when objects nest deeper than this
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List built-in transforms
    Transforms,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Map {
            source,
            schema,
            options,
            property_transform,
            value_transform,
            exclusive,
            max_depth,
            output,
            pretty,
        } => run_map(MapArgs {
            source,
            schema,
            options,
            property_transform,
            value_transform,
            exclusive,
            max_depth,
            output,
            pretty,
        }),
        Commands::Transforms => {
            run_transforms();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

struct MapArgs {
    source: PathBuf,
    schema: Option<PathBuf>,
    options: Option<PathBuf>,
    property_transform: Option<String>,
    value_transform: Option<String>,
    exclusive: bool,
    max_depth: Option<usize>,
    output: Option<PathBuf>,
    pretty: bool,
}

fn run_map(args: MapArgs) -> Result<(), u8> {
    let MapArgs {
        source: source_path,
        schema: schema_path,
        options: options_path,
        property_transform,
        value_transform,
        exclusive,
        max_depth,
        output,
        pretty,
    } = args;

    let base = match &options_path {
        Some(path) => load_options(path).map_err(|e| {
            eprintln!("Error loading options: {}", e);
            e.exit_code() as u8
        })?,
        None => MapperOptions::new(),
    };

    // Flags override the options file
    let mut overrides = MapperOptions::new().exclusive(exclusive);
    if let Some(name) = property_transform {
        overrides = overrides.property_transform_value(name);
    }
    if let Some(name) = value_transform {
        overrides = overrides.value_transform_value(name);
    }
    if let Some(depth) = max_depth {
        overrides = overrides.max_depth(depth);
    }

    let mapper = MagicMapper::new(base.merge(overrides)).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let schema = match &schema_path {
        Some(path) => Some(load_schema(path).map_err(|e| {
            eprintln!("Error loading schema: {}", e);
            e.exit_code() as u8
        })?),
        None => None,
    };

    let source = load_json(&source_path).map_err(|e| {
        eprintln!("Error loading source: {}", e);
        e.exit_code() as u8
    })?;

    let mapped = mapper.map_value(&source, schema.as_ref()).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let json_output = if pretty {
        serde_json::to_string_pretty(&mapped)
    } else {
        serde_json::to_string(&mapped)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_transforms() {
    println!("Property transforms:");
    for name in PROPERTY_TRANSFORMS {
        println!("  {}", name);
    }
    println!("Value transforms:");
    for name in VALUE_TRANSFORMS {
        println!("  {}", name);
    }
}
