//! Interactive configuration.
//!
//! Running the binary with no arguments collects every setting from the
//! terminal. Fields are driven by an ordered static list of descriptors —
//! name, help text, default, and an apply function into an explicit draft
//! struct — so the prompt order and parsing live in one table instead of
//! being derived from type metadata at runtime.

use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::config::{CloudEnvironment, PushConfig, Region};

/// Collected-so-far configuration. Every field starts empty; the prompt loop
/// fills them in declaration order.
#[derive(Debug, Default)]
struct ConfigDraft {
    environment: Option<CloudEnvironment>,
    region: Option<Region>,
    organization_id: Option<String>,
    source_id: Option<String>,
    api_key: Option<String>,
    folder: Option<PathBuf>,
    include: Option<String>,
    recursive: Option<bool>,
    batch_size: Option<usize>,
}

impl ConfigDraft {
    fn finish(self) -> Result<PushConfig> {
        Ok(PushConfig {
            environment: self
                .environment
                .ok_or_else(|| anyhow!("environment was not provided"))?,
            region: self.region.ok_or_else(|| anyhow!("region was not provided"))?,
            organization_id: self
                .organization_id
                .ok_or_else(|| anyhow!("organization-id was not provided"))?,
            source_id: self
                .source_id
                .ok_or_else(|| anyhow!("source-id was not provided"))?,
            api_key: self
                .api_key
                .ok_or_else(|| anyhow!("api-key was not provided"))?,
            folder: self.folder.ok_or_else(|| anyhow!("folder was not provided"))?,
            include: self.include.ok_or_else(|| anyhow!("include was not provided"))?,
            recursive: self
                .recursive
                .ok_or_else(|| anyhow!("recursive was not provided"))?,
            batch_size: self
                .batch_size
                .ok_or_else(|| anyhow!("batch-size was not provided"))?,
        })
    }
}

/// One prompted field. `apply` parses the raw input into the draft and
/// reports whether it was accepted.
struct FieldSpec {
    name: &'static str,
    help: &'static str,
    /// Fields without a default are required: empty input re-prompts.
    default: Option<&'static str>,
    apply: fn(&mut ConfigDraft, &str) -> bool,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "environment",
        help: "Cloud environment: prod or hipaa.",
        default: None,
        apply: |draft, value| match CloudEnvironment::from_str(value, true) {
            Ok(parsed) => {
                draft.environment = Some(parsed);
                true
            }
            Err(_) => false,
        },
    },
    FieldSpec {
        name: "region",
        help: "Cloud region: us-east-1, eu-west-1 or ap-southeast-2.",
        default: None,
        apply: |draft, value| match Region::from_str(value, true) {
            Ok(parsed) => {
                draft.region = Some(parsed);
                true
            }
            Err(_) => false,
        },
    },
    FieldSpec {
        name: "organization-id",
        help: "ID of the organization in which to push documents.",
        default: None,
        apply: |draft, value| {
            draft.organization_id = Some(value.to_string());
            true
        },
    },
    FieldSpec {
        name: "source-id",
        help: "ID of the source in which to push documents.",
        default: None,
        apply: |draft, value| {
            draft.source_id = Some(value.to_string());
            true
        },
    },
    FieldSpec {
        name: "api-key",
        help: "API key to use.",
        default: None,
        apply: |draft, value| {
            draft.api_key = Some(value.to_string());
            true
        },
    },
    FieldSpec {
        name: "folder",
        help: "Path of the local folder that contains the documents to index.",
        default: None,
        apply: |draft, value| {
            draft.folder = Some(PathBuf::from(value));
            true
        },
    },
    FieldSpec {
        name: "include",
        help: "Wildcard expression for which matching files will be pushed. \
               All files are pushed by default.",
        default: Some("*"),
        apply: |draft, value| {
            draft.include = Some(value.to_string());
            true
        },
    },
    FieldSpec {
        name: "recursive",
        help: "Whether to recursively search in sub-folders for files to push. \
               Sub-folders are searched by default.",
        default: Some("true"),
        apply: |draft, value| match value.parse::<bool>() {
            Ok(parsed) => {
                draft.recursive = Some(parsed);
                true
            }
            Err(_) => false,
        },
    },
    FieldSpec {
        name: "batch-size",
        help: "How many files to push per batch.",
        default: Some("10"),
        apply: |draft, value| match value.parse::<usize>() {
            Ok(parsed) => {
                draft.batch_size = Some(parsed);
                true
            }
            Err(_) => false,
        },
    },
];

/// Prompts for every field on stdin/stdout and returns the configuration.
pub fn read_config_interactively() -> Result<PushConfig> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut draft = ConfigDraft::default();

    for field in FIELDS {
        println!("{}", field.help);
        loop {
            match field.default {
                Some(default) => print!("{} [{}]: ", field.name, default),
                None => print!("{}: ", field.name),
            }
            io::stdout().flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => bail!("input ended before all fields were provided"),
            };
            let value = line.trim();

            let candidate = if value.is_empty() {
                match field.default {
                    Some(default) => default,
                    None => {
                        eprintln!("Invalid value.");
                        continue;
                    }
                }
            } else {
                value
            };

            if (field.apply)(&mut draft, candidate) {
                break;
            }
            eprintln!("Invalid value.");
        }
        println!();
    }

    draft.finish()
}
