//! Keywhiz auth domains
//!
//! A closed set of deployment environments. The lowercase identifier is the
//! configuration key used to pick which secrets-service environment to talk to.

use std::fmt;
use std::str::FromStr;

use keywhiz_errors::KeywhizError;
use serde::{Deserialize, Serialize};

/// Deployment environment of the secrets service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthDomain {
    Prod,
    Mgmt,
    Stg,
    Dev,

    // Tekton domains
    TektonProd,
    TektonMgmt,
    TektonStg,
    TektonDev,
}

impl AuthDomain {
    /// Every domain, in declaration order
    pub const ALL: [AuthDomain; 8] = [
        AuthDomain::Prod,
        AuthDomain::Mgmt,
        AuthDomain::Stg,
        AuthDomain::Dev,
        AuthDomain::TektonProd,
        AuthDomain::TektonMgmt,
        AuthDomain::TektonStg,
        AuthDomain::TektonDev,
    ];

    /// Get the immutable identifier for this domain
    pub fn identifier(self) -> &'static str {
        match self {
            AuthDomain::Prod => "prod",
            AuthDomain::Mgmt => "mgmt",
            AuthDomain::Stg => "stg",
            AuthDomain::Dev => "dev",
            AuthDomain::TektonProd => "tektonprod",
            AuthDomain::TektonMgmt => "tektonmgmt",
            AuthDomain::TektonStg => "tektonstg",
            AuthDomain::TektonDev => "tektondev",
        }
    }

    /// Get the symbolic (upper-case) name of this domain
    pub fn name(self) -> &'static str {
        match self {
            AuthDomain::Prod => "PROD",
            AuthDomain::Mgmt => "MGMT",
            AuthDomain::Stg => "STG",
            AuthDomain::Dev => "DEV",
            AuthDomain::TektonProd => "TEKTONPROD",
            AuthDomain::TektonMgmt => "TEKTONMGMT",
            AuthDomain::TektonStg => "TEKTONSTG",
            AuthDomain::TektonDev => "TEKTONDEV",
        }
    }
}

impl fmt::Display for AuthDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl FromStr for AuthDomain {
    type Err = KeywhizError;

    /// Accepts the symbolic name or the identifier, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AuthDomain::ALL
            .into_iter()
            .find(|domain| {
                domain.name().eq_ignore_ascii_case(wanted)
                    || domain.identifier().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| KeywhizError::UnknownAuthDomain {
                name: s.to_string(),
            })
    }
}
