//! Recover command implementation

use anyhow::{Context, Result};
use clap::Args;
use fractus_shamir::{decode_shares, Reconstructor};
use log::{debug, info, warn};
use zeroize::Zeroizing;

use crate::config::Config;
use crate::formats::{InputFormat, OutputFormat, ShareDocument};
use crate::utils;

#[derive(Args)]
pub struct RecoverCommand {
    /// Share document to read (use '-' for stdin)
    #[arg(value_name = "FILE", default_value = utils::STDIO)]
    pub input: String,

    /// Document format (detected from extension or content if not specified)
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormat>,

    /// How to print the recovered secret
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (use '-' for stdout)
    #[arg(short, long, value_name = "FILE", default_value = utils::STDIO)]
    pub output: String,

    /// Override the threshold declared in the document
    #[arg(short = 't', long, value_name = "THRESHOLD")]
    pub threshold: Option<usize>,

    /// Check that shares beyond the threshold lie on the recovered polynomial
    #[arg(long)]
    pub verify: bool,
}

impl RecoverCommand {
    pub fn execute(&self, config: &Config) -> Result<()> {
        let content = utils::read_input(&self.input)
            .with_context(|| format!("Failed to read share document: {}", self.input))?;
        let format = utils::resolve_format(self.input_format, &self.input, &content);
        debug!("Reading share document as {:?}", format);

        let document =
            ShareDocument::parse(&content, format).context("Failed to parse share document")?;

        let threshold = self.threshold(&document);
        let points = decode_shares(&document.records).context("Failed to decode shares")?;
        info!(
            "Decoded {} of {} share entries, threshold {}",
            points.len(),
            document.records.len() + document.skipped.len(),
            threshold
        );

        let reconstructor =
            Reconstructor::new(threshold).context("Failed to create reconstructor")?;

        let secret = if self.verify || config.defaults.verify {
            reconstructor.recover_verified(&points)
        } else {
            reconstructor.recover(&points)
        }
        .context("Failed to recover secret from shares")?;

        let output_format = self.format.unwrap_or(config.defaults.output_format);
        let rendered = Zeroizing::new(output_format.render(&secret));
        utils::write_output(&self.output, &rendered)
            .with_context(|| format!("Failed to write secret to: {}", self.output))?;

        if self.output != utils::STDIO {
            info!("Secret written to {}", self.output);
        }

        Ok(())
    }

    fn threshold(&self, document: &ShareDocument) -> usize {
        match self.threshold {
            Some(k) if k != document.keys.k => {
                warn!(
                    "Using threshold {} instead of the declared threshold {}",
                    k, document.keys.k
                );
                k
            }
            Some(k) => k,
            None => document.keys.k,
        }
    }
}
