use anyhow::{bail, Result};
use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;

/// Cloud environments in which documents can be pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum CloudEnvironment {
    /// Production organizations.
    Prod,
    /// HIPAA-certified organizations.
    Hipaa,
}

impl fmt::Display for CloudEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudEnvironment::Prod => write!(f, "prod"),
            CloudEnvironment::Hipaa => write!(f, "hipaa"),
        }
    }
}

/// Cloud regions in which documents can be pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Region {
    #[value(name = "us-east-1")]
    UsEast1,
    #[value(name = "eu-west-1")]
    EuWest1,
    #[value(name = "ap-southeast-2")]
    ApSoutheast2,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::UsEast1 => write!(f, "us-east-1"),
            Region::EuWest1 => write!(f, "eu-west-1"),
            Region::ApSoutheast2 => write!(f, "ap-southeast-2"),
        }
    }
}

/// Everything one push run needs: where to read files, where to push them,
/// and how to batch them. Built from CLI flags or interactive input.
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub environment: CloudEnvironment,
    pub region: Region,
    /// ID of the organization in which to push documents.
    pub organization_id: String,
    /// ID of the source in which to push documents.
    pub source_id: String,
    /// API key to use.
    pub api_key: String,
    /// Path of the local folder that contains the documents to index.
    pub folder: PathBuf,
    /// Wildcard expression for which matching files will be pushed.
    pub include: String,
    /// Whether to recursively search in sub-folders for files to push.
    pub recursive: bool,
    /// How many files to push per batch.
    pub batch_size: usize,
}

impl PushConfig {
    /// Validates everything that can be rejected before any I/O happens.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size < 1 {
            bail!("batch-size must be >= 1, got {}", self.batch_size);
        }
        if self.organization_id.trim().is_empty() {
            bail!("organization-id must not be empty");
        }
        if self.source_id.trim().is_empty() {
            bail!("source-id must not be empty");
        }
        if self.include.trim().is_empty() {
            bail!("include pattern must not be empty");
        }
        Ok(())
    }
}
