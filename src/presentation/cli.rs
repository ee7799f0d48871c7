use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ContainerType;

#[derive(Debug, Parser)]
#[command(name = "medingest", version, about = "Validate, classify and store medical PDFs")]
pub struct Cli {
    /// Directory holding base.yaml and the per-environment overlays
    #[arg(long, env = "MEDINGEST_CONFIG_DIR", default_value = "config", global = true)]
    pub config_dir: PathBuf,

    /// Runtime environment: local, test or prod
    #[arg(long, env = "APP_ENVIRONMENT", default_value = "local", global = true)]
    pub environment: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a PDF and print the validation report
    Validate {
        /// Path to the PDF
        path: PathBuf,
    },
    /// Validate, upload and optionally convert a PDF
    Ingest {
        /// Path to the PDF
        path: PathBuf,
        /// Extra blob metadata as key=value, repeatable
        #[arg(long = "meta", value_parser = parse_key_value)]
        metadata: Vec<(String, String)>,
        /// Convert to markdown with Document Intelligence and upload the result
        #[arg(long)]
        convert: bool,
    },
    /// List blobs in a container
    List {
        #[arg(long, default_value = "raw_documents")]
        container: ContainerType,
        /// Only blobs whose name starts with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Download a single blob
    Download {
        document_id: String,
        blob_name: String,
        #[arg(long, default_value = "raw_documents")]
        container: ContainerType,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Delete every blob of a document
    Delete {
        document_id: String,
        #[arg(long, default_value = "raw_documents")]
        container: ContainerType,
    },
    /// Create all configured containers
    InitContainers,
}

pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
