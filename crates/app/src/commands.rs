use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use slipscan_core::{ReceiptRecord, ReceiptSeed, ScanConfig};
use slipscan_ocr::{
    assemble_receipt, RecognitionOptions, RecognitionService, ScanPipeline, TextRecognizer,
};

#[derive(Args)]
pub struct SeedArgs {
    /// Business name entered by hand; kept over the first transcript line
    #[arg(long)]
    business_name: Option<String>,

    /// Address entered by hand; kept over the header lines
    #[arg(long)]
    address: Option<String>,
}

impl SeedArgs {
    fn into_seed(self) -> Option<ReceiptSeed> {
        let seed = ReceiptSeed {
            business_name: self.business_name,
            address: self.address,
            ..Default::default()
        };
        (!seed.is_empty()).then_some(seed)
    }
}

#[derive(Args)]
pub struct ScanArgs {
    /// Receipt image (PNG, JPEG, ...)
    image: PathBuf,

    /// Ignore text shorter than this fraction of the image height
    #[arg(long)]
    min_text_height: Option<f32>,

    /// Print the record as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    seed: SeedArgs,
}

#[derive(Args)]
pub struct TextArgs {
    /// Image to recognize
    image: PathBuf,

    /// Ignore text shorter than this fraction of the image height
    #[arg(long)]
    min_text_height: Option<f32>,
}

#[derive(Args)]
pub struct ParseArgs {
    /// Transcript file, one line per recognized line; `-` reads stdin
    transcript: PathBuf,

    /// Print the record as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    seed: SeedArgs,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration file path
    Path,
}

/// Display shape of a receipt record.
#[derive(Debug, Serialize)]
pub struct ReceiptOutput {
    pub business_name: String,
    pub address: String,
    pub phone_number: String,
    pub transaction_date: String,
    pub total: String,
    pub gst: Option<String>,
    pub save_worthy: bool,
    pub raw_text: String,
    pub created_at: String,
}

impl From<&ReceiptRecord> for ReceiptOutput {
    fn from(r: &ReceiptRecord) -> Self {
        ReceiptOutput {
            business_name: r.business_name.clone(),
            address: r.address.clone(),
            phone_number: r.phone_number.clone(),
            transaction_date: r.transaction_date.to_string(),
            total: r.total_amount.to_string(),
            gst: r.gst_amount.map(|g| g.to_string()),
            save_worthy: r.is_save_worthy(),
            raw_text: r.raw_text.clone(),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

impl ReceiptOutput {
    fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Business: {}\n", self.business_name));
        out.push_str(&format!("Address:  {}\n", self.address));
        out.push_str(&format!("Phone:    {}\n", self.phone_number));
        out.push_str(&format!("Date:     {}\n", self.transaction_date));
        out.push_str(&format!("Total:    {}\n", self.total));
        if let Some(gst) = &self.gst {
            out.push_str(&format!("GST:      {gst}\n"));
        }
        if !self.save_worthy {
            out.push_str("(incomplete: needs a business name and a total above zero)\n");
        }
        out
    }
}

fn print_receipt(record: &ReceiptRecord, json: bool) -> Result<()> {
    let output = ReceiptOutput::from(record);
    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", output.render());
    }
    Ok(())
}

#[cfg(feature = "tesseract")]
fn recognizer(config: &ScanConfig) -> Arc<dyn TextRecognizer> {
    use slipscan_ocr::recognizer::tesseract_backend::TesseractRecognizer;
    Arc::new(TesseractRecognizer::new(config.recognition.tessdata_path.clone()))
}

#[cfg(not(feature = "tesseract"))]
fn recognizer(_config: &ScanConfig) -> Arc<dyn TextRecognizer> {
    Arc::new(slipscan_ocr::UnavailableRecognizer)
}

fn pipeline(config: &ScanConfig, min_text_height: Option<f32>) -> ScanPipeline<Arc<dyn TextRecognizer>> {
    let options = RecognitionOptions::from(config.recognition.clone());
    let minimum = min_text_height.unwrap_or(options.minimum_text_height);
    ScanPipeline::new(RecognitionService::with_options(recognizer(config), options))
        .with_minimum_text_height(minimum)
}

pub async fn scan(args: ScanArgs, config_path: &Path) -> Result<()> {
    let config = ScanConfig::load(config_path)?;
    let seed = args.seed.into_seed();
    tracing::info!("Scanning receipt: {}", args.image.display());

    let outcome = pipeline(&config, args.min_text_height)
        .scan_file(&args.image, seed.as_ref())
        .await
        .with_context(|| format!("Failed to scan {}", args.image.display()))?;
    print_receipt(&outcome.receipt, args.json)
}

pub async fn text(args: TextArgs, config_path: &Path) -> Result<()> {
    let config = ScanConfig::load(config_path)?;
    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    let name = args.image.file_name().and_then(|n| n.to_str());

    let result = pipeline(&config, args.min_text_height)
        .recognize_bytes(&bytes, name)
        .await?;
    println!("{}", result.text);
    Ok(())
}

pub fn assemble_from_text(text: &str, seed: Option<&ReceiptSeed>) -> ReceiptRecord {
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    assemble_receipt(&lines, seed)
}

pub fn parse(args: ParseArgs) -> Result<()> {
    let text = if args.transcript.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&args.transcript)
            .with_context(|| format!("Failed to read {}", args.transcript.display()))?
    };
    let seed = args.seed.into_seed();
    print_receipt(&assemble_from_text(&text, seed.as_ref()), args.json)
}

pub fn config(args: ConfigArgs, config_path: &Path) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = ScanConfig::load(config_path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigCommand::Init { force } => {
            if config_path.exists() && !force {
                bail!(
                    "Config already exists at {} (use --force to overwrite)",
                    config_path.display()
                );
            }
            ScanConfig::default().save(config_path)?;
            println!("Wrote {}", config_path.display());
        }
        ConfigCommand::Path => println!("{}", config_path.display()),
    }
    Ok(())
}
