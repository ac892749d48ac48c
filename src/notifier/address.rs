//! # Git Address Parsing
//!
//! Extracts the host and the `owner/repo` identity from a git remote address.
//!
//! Supported forms:
//! - `https://[user@]host[:port]/owner/repo[.git]` (and `http://`)
//! - `ssh://[user@]host[:port]/owner/repo[.git]`
//! - `[user@]host:owner/repo[.git]` (scp-like syntax)

use crate::error::NotifierError;
use url::Url;

/// Repository coordinates on a git hosting provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryId {
    pub host: String,
    pub owner: String,
    pub repo: String,
}

impl RepositoryId {
    /// Parse a git remote address into host, owner and repository name
    ///
    /// # Errors
    /// `InvalidAddress` when the address has no host or path,
    /// `InvalidIdentity` when the path is not exactly `<owner>/<repo>`.
    pub fn from_address(address: &str) -> Result<Self, NotifierError> {
        let (host, id) = parse_git_address(address)?;

        let mut parts = id.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => Ok(Self {
                host,
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(NotifierError::InvalidIdentity { id }),
        }
    }

    /// `owner/repo`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Split a git remote address into `(host, identity)`
///
/// The host is returned without scheme or user-info; a non-default port is kept.
/// The identity is the repository path with leading/trailing slashes and a
/// trailing `.git` removed.
///
/// # Errors
/// Returns `InvalidAddress` when no host/path structure can be recognized.
pub fn parse_git_address(address: &str) -> Result<(String, String), NotifierError> {
    let address = address.trim();
    let invalid = |reason| NotifierError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    if address.is_empty() {
        return Err(invalid("address is empty"));
    }

    let (host, path) = if address.contains("://") {
        let url = Url::parse(address).map_err(|_parse_error| invalid("not a valid URL"))?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host"))?;
        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        (host, url.path().to_string())
    } else {
        // scp-like: [user@]host:path
        let (authority, path) = address
            .split_once(':')
            .ok_or_else(|| invalid("expected <host>:<path> or a URL"))?;
        let host = authority.rsplit('@').next().unwrap_or(authority);
        if host.is_empty() || host.contains('/') {
            return Err(invalid("missing host"));
        }
        (host.to_string(), path.to_string())
    };

    let trimmed = path.trim_matches('/');
    let id = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    if id.is_empty() {
        return Err(invalid("missing repository path"));
    }

    Ok((host, id.to_string()))
}
