//! Verify command implementation.

use crate::cli::VerifyArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use quarry_domain::Source;
use quarry_verifier::{VerificationRequest, Verifier};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Execute the verify command.
pub async fn execute_verify(args: VerifyArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut verifier = Verifier::new(Arc::new(config.llm_provider()), config.verification.clone());
    if let Some(year) = args.year {
        verifier = verifier.with_current_year(year);
    }

    if let Some(batch) = &args.batch {
        let requests: Vec<VerificationRequest> = read_json(batch)?;
        debug!("Verifying {} entities", requests.len());
        let results = verifier.verify_batch(&requests).await;
        println!("{}", formatter.format_verifications(&results)?);
        return Ok(());
    }

    let summary = args.summary.ok_or_else(|| {
        CliError::InvalidInput("Provide --summary (with --sources) or --batch".to_string())
    })?;
    let sources: Vec<Source> = match &args.sources {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    let result = verifier.verify(&summary, &sources, &args.camp).await;
    println!("{}", formatter.format_verification(&result)?);
    Ok(())
}

/// Read a JSON document from a file.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| {
        CliError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&contents)?)
}
