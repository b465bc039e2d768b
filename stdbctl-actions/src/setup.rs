//! Multi-step setup workflows.
//!
//! These combine several CLI actions into the steps needed before a module
//! can be published: the CLI is installed, a default server and a default
//! identity exist.

use tracing::{info, warn};

use stdbctl_core::{
    AddErrorKind, AddServerRequest, IdentityRecord, Listing, ListingEntry, ServerListing,
    ServerRecord, VersionInfo,
};

use crate::cli::SpacetimeCli;
use crate::error::ActionError;

// ============================================================================
// Default Selection
// ============================================================================

/// What to do about a listing's default entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultChoice<T> {
    /// The CLI already marks this entry as default.
    Existing(T),
    /// Entries exist but none is default; this one should be promoted.
    Promote(T),
    /// Nothing is configured.
    Empty,
}

/// Picks the default entry, or index 0 when none is marked.
pub fn choose_default<T: ListingEntry + Clone>(listing: &Listing<T>) -> DefaultChoice<T> {
    if let Some(record) = listing.default_record() {
        return DefaultChoice::Existing(record.clone());
    }
    match listing.records.first() {
        Some(first) => DefaultChoice::Promote(first.clone()),
        None => DefaultChoice::Empty,
    }
}

// ============================================================================
// Servers
// ============================================================================

/// Returns the default server, promoting the first one if none is marked.
///
/// When no server is configured at all, `local` and `testnet` are added
/// back first.
pub async fn ensure_default_server(cli: &SpacetimeCli) -> Result<ServerRecord, ActionError> {
    let mut listing = cli.list_servers().await?;
    if listing.result.has_error() {
        return Err(ActionError::Setup(format!(
            "listing servers failed: {}",
            listing.result.clipped_error(200)
        )));
    }
    if listing.is_empty() {
        listing = regenerate_default_servers(cli).await?;
    }

    match choose_default(&listing) {
        DefaultChoice::Existing(server) => Ok(server),
        DefaultChoice::Promote(mut server) => {
            info!(server = %server.nickname, "No default server, promoting first");
            let result = cli.set_default_server(&server.nickname).await?;
            if result.has_error() {
                return Err(ActionError::Setup(format!(
                    "setting default server '{}' failed: {}",
                    server.nickname,
                    result.clipped_error(200)
                )));
            }
            server.is_default = true;
            Ok(server)
        }
        DefaultChoice::Empty => Err(ActionError::Setup("no servers configured".to_string())),
    }
}

/// Adds `local` (without fingerprint) and `testnet` (becomes default).
///
/// Servers that already exist are left alone.
pub async fn regenerate_default_servers(cli: &SpacetimeCli) -> Result<ServerListing, ActionError> {
    let settings = cli.settings();
    info!(
        local = %settings.local.name,
        testnet = %settings.testnet.name,
        "Regenerating default servers"
    );

    let requests = [
        AddServerRequest::new(&settings.local.name, &settings.local.url).without_fingerprint(),
        AddServerRequest::new(&settings.testnet.name, &settings.testnet.url),
    ];
    for request in &requests {
        let outcome = cli.add_server(request).await?;
        match outcome.error_kind {
            None => {}
            Some(AddErrorKind::AlreadyExists) => {
                warn!(server = %request.nickname, "Server already exists");
            }
            Some(AddErrorKind::Unclassified) => {
                return Err(ActionError::Setup(format!(
                    "adding server '{}' failed: {}",
                    request.nickname,
                    outcome.result.clipped_error(200)
                )));
            }
        }
    }

    cli.list_servers().await
}

// ============================================================================
// Identities
// ============================================================================

/// Returns the default identity, promoting the first one if none is marked.
///
/// Returns `None` when no identity exists; the caller must create one.
pub async fn ensure_default_identity(
    cli: &SpacetimeCli,
) -> Result<Option<IdentityRecord>, ActionError> {
    let listing = cli.list_identities().await?;
    if listing.result.has_error() {
        return Err(ActionError::Setup(format!(
            "listing identities failed: {}",
            listing.result.clipped_error(200)
        )));
    }

    match choose_default(&listing) {
        DefaultChoice::Existing(identity) => Ok(Some(identity)),
        DefaultChoice::Promote(mut identity) => {
            info!(identity = %identity.nickname, "No default identity, promoting first");
            let result = cli.set_default_identity(&identity.nickname).await?;
            if result.has_error() {
                return Err(ActionError::Setup(format!(
                    "setting default identity '{}' failed: {}",
                    identity.nickname,
                    result.clipped_error(200)
                )));
            }
            identity.is_default = true;
            Ok(Some(identity))
        }
        DefaultChoice::Empty => Ok(None),
    }
}

// ============================================================================
// Install
// ============================================================================

/// Finishes a fresh install: verifies the CLI runs, makes `testnet` the
/// default server and saves its fingerprint.
///
/// Returns [`ActionError::RestartRequired`] when the CLI is installed but
/// this process still cannot find it.
pub async fn post_install_setup(cli: &SpacetimeCli) -> Result<VersionInfo, ActionError> {
    let version = cli.check_installed().await?;
    if !version.installed {
        if version.command_not_found {
            warn!("CLI installed but not found on the search path");
            return Err(ActionError::RestartRequired);
        }
        return Err(ActionError::Setup(format!(
            "installed CLI does not run: {}",
            version.result.clipped_error(200)
        )));
    }

    let testnet = cli.settings().testnet.name.clone();

    info!(server = %testnet, "Setting default server");
    let result = cli.set_default_server(&testnet).await?;
    if result.has_error() {
        return Err(ActionError::Setup(format!(
            "setting default server '{testnet}' failed: {}",
            result.clipped_error(200)
        )));
    }

    info!(server = %testnet, "Saving fingerprint");
    let result = cli.create_fingerprint(&testnet).await?;
    if result.has_error() {
        return Err(ActionError::Setup(format!(
            "saving fingerprint for '{testnet}' failed: {}",
            result.clipped_error(200)
        )));
    }

    Ok(version)
}

/// Installs the CLI if missing, then runs [`post_install_setup`].
pub async fn ensure_installed(cli: &SpacetimeCli) -> Result<VersionInfo, ActionError> {
    let version = cli.check_installed().await?;
    if version.installed {
        return Ok(version);
    }

    info!(platform = %cli.platform(), "CLI not installed, installing");
    let outcome = cli.install().await?;
    if !outcome.is_installed {
        return Err(ActionError::Setup(format!(
            "install failed: {}",
            outcome.result.clipped_error(200)
        )));
    }

    post_install_setup(cli).await
}
