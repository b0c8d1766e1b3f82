//! # docpush
//!
//! Push the contents of a local folder into a hosted document index, batch by
//! batch, then purge index entries for files that no longer exist locally.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌─────────────┐   ┌─────────────┐
//! │  Walker  │──▶│  Mapper  │──▶│ Accumulator │──▶│ IndexClient │
//! │ (lazy FS)│   │ (zlib)   │   │ (batches)   │   │ (push API)  │
//! └──────────┘   └──────────┘   └─────────────┘   └─────────────┘
//!                                   after the last flush ──▶ purge stale
//! ```
//!
//! One ordering token is minted per run and stamped on every pushed document;
//! after every batch has been upserted, a single "delete documents older than
//! this token" call removes index entries whose source files disappeared.
//! Pushes are not transactional, so the purge is gated on all upserts having
//! succeeded: a failed run leaves stale-but-present documents behind rather
//! than deleting entries that were never refreshed.
//!
//! ## Quick start
//!
//! ```bash
//! docpush push -e prod -r us-east-1 -o myorg -s mysource -k $API_KEY -f ./docs
//! docpush endpoints          # list supported region/environment pairs
//! docpush                    # no arguments: prompt for every setting
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Run configuration and validation |
//! | [`endpoints`] | Region/environment endpoint lookup |
//! | [`walk`] | Lazy folder enumeration |
//! | [`document`] | File-to-document mapping |
//! | [`compress`] | Payload codec (zlib) |
//! | [`token`] | Per-run ordering token |
//! | [`batch`] | Batch accumulation and flushing |
//! | [`client`] | Index client contract + HTTP implementation |
//! | [`sync`] | The push-then-purge orchestrator |
//! | [`progress`] | Progress reporting on stderr |
//! | [`prompt`] | Interactive configuration |

pub mod batch;
pub mod client;
pub mod compress;
pub mod config;
pub mod document;
pub mod endpoints;
pub mod progress;
pub mod prompt;
pub mod sync;
pub mod token;
pub mod walk;
