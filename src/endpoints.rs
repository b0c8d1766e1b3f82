//! Region/environment endpoint selection.
//!
//! Each supported (region, environment) pair maps to a push API base URL and
//! a platform API base URL. The mapping is a static table; asking for an
//! absent pair is a configuration error reported before any enumeration
//! starts.

use crate::config::{CloudEnvironment, Region};

/// Base URLs for one (region, environment) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub push_url: &'static str,
    pub platform_url: &'static str,
}

/// Supported combinations. HIPAA is only hosted in us-east-1.
const ENDPOINT_TABLE: &[(Region, CloudEnvironment, Endpoints)] = &[
    (
        Region::UsEast1,
        CloudEnvironment::Prod,
        Endpoints {
            push_url: "https://push.us-east-1.docindex.cloud/v1",
            platform_url: "https://platform.us-east-1.docindex.cloud",
        },
    ),
    (
        Region::UsEast1,
        CloudEnvironment::Hipaa,
        Endpoints {
            push_url: "https://push.hipaa.us-east-1.docindex.cloud/v1",
            platform_url: "https://platform.hipaa.us-east-1.docindex.cloud",
        },
    ),
    (
        Region::EuWest1,
        CloudEnvironment::Prod,
        Endpoints {
            push_url: "https://push.eu-west-1.docindex.cloud/v1",
            platform_url: "https://platform.eu-west-1.docindex.cloud",
        },
    ),
    (
        Region::ApSoutheast2,
        CloudEnvironment::Prod,
        Endpoints {
            push_url: "https://push.ap-southeast-2.docindex.cloud/v1",
            platform_url: "https://platform.ap-southeast-2.docindex.cloud",
        },
    ),
];

/// Error returned when a (region, environment) pair has no endpoints.
#[derive(Debug, PartialEq, Eq)]
pub enum EndpointError {
    UnsupportedCombination {
        region: Region,
        environment: CloudEnvironment,
    },
}

impl std::fmt::Display for EndpointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointError::UnsupportedCombination {
                region,
                environment,
            } => write!(
                f,
                "the {} environment is not available in the {} region",
                environment, region
            ),
        }
    }
}

impl std::error::Error for EndpointError {}

/// Looks up the endpoints for a (region, environment) pair.
pub fn resolve(
    region: Region,
    environment: CloudEnvironment,
) -> Result<Endpoints, EndpointError> {
    ENDPOINT_TABLE
        .iter()
        .find(|(r, e, _)| *r == region && *e == environment)
        .map(|(_, _, endpoints)| *endpoints)
        .ok_or(EndpointError::UnsupportedCombination {
            region,
            environment,
        })
}

/// Prints the supported combinations as a table (the `endpoints` command).
pub fn print_endpoints() {
    println!(
        "{:<16} {:<12} {:<48} {}",
        "REGION", "ENVIRONMENT", "PUSH API", "PLATFORM API"
    );
    for (region, environment, endpoints) in ENDPOINT_TABLE {
        println!(
            "{:<16} {:<12} {:<48} {}",
            region.to_string(),
            environment.to_string(),
            endpoints.push_url,
            endpoints.platform_url
        );
    }
}
