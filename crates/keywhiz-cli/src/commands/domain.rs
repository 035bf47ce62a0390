//! Auth domain commands
//!
//! Usage: `domains` | `domain <NAME>`

use std::io::{self, Write};

use keywhiz_core_types::AuthDomain;

/// List every auth domain with its identifier
pub fn execute_list<W: Write>(out: &mut W) -> io::Result<()> {
    for domain in AuthDomain::ALL {
        writeln!(out, "{:<12} {}", domain.name(), domain.identifier())?;
    }
    Ok(())
}

/// Resolve a domain name to its identifier
pub fn execute_resolve<W: Write>(name: Option<&str>, out: &mut W) -> io::Result<()> {
    let Some(name) = name else {
        return writeln!(out, "Usage: domain <NAME>");
    };

    match name.parse::<AuthDomain>() {
        Ok(domain) => {
            tracing::info!(
                method = "execute_resolve",
                "Resolved auth domain {} to {}",
                domain.name(),
                domain.identifier()
            );
            writeln!(out, "{}", domain.identifier())
        }
        Err(err) => {
            tracing::warn!(method = "execute_resolve", "{}", err);
            writeln!(out, "{}", err)
        }
    }
}
