//! restgen CLI
//!
//! This binary provides the main entry point for restgen: it generates JAX-RS
//! resource interfaces from REST API descriptions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use restgen_cli::{apply_overrides, init_config, load_config, Overrides, Result};

#[derive(Parser)]
#[command(name = "restgen", version)]
#[command(about = "Generate JAX-RS resource interfaces from REST API descriptions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate resource interfaces, value types and support files
    Generate {
        /// API description (JSON); repeat to generate several into one output directory
        #[arg(short, long = "input", value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Configuration file [default: the user config file, if present]
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output directory for generated sources
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Base package of the generated code
        #[arg(long, value_name = "PACKAGE")]
        base_package: Option<String>,

        /// JAX-RS version of the support files (1.1 or 2.0)
        #[arg(long, value_name = "VERSION")]
        jaxrs_version: Option<String>,

        /// Annotation style of value types (jackson1, jackson2, gson, none)
        #[arg(long, value_name = "STYLE")]
        json_mapper: Option<String>,
    },
    /// Write the default configuration file
    InitConfig {
        /// Destination [default: the user config file]
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = execute(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Generate { inputs, config, output, base_package, jaxrs_version, json_mapper } => {
            let overrides = Overrides { output, base_package, jaxrs_version, json_mapper };
            let config = apply_overrides(load_config(config.as_deref())?, &overrides)?;
            logging::init(&config.logging.level, config.logging.json)?;

            let generated = pipeline::run_all(&config, &inputs)?;
            tracing::info!("generation finished");
            println!(
                "Generated {} files into {}",
                generated.len(),
                config.codegen.output_directory.display()
            );
        }
        Commands::InitConfig { path } => {
            let written = init_config(path.as_deref())?;
            println!("Configuration written to {}", written.display());
        }
    }
    Ok(())
}
