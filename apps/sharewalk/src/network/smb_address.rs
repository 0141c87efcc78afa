//! Parsing of `smb://host[:port]/share/dir/...` addresses.

use url::Url;

/// Standard SMB port, omitted from `smbclient` arguments.
pub const DEFAULT_SMB_PORT: u16 = 445;

/// A parsed share address. Path components are percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmbAddress {
    pub host: String,
    pub port: Option<u16>,
    pub share: String,
    /// Folders below the share root, outermost first.
    pub directory: Vec<String>,
}

impl SmbAddress {
    /// Parses an address. Errors are plain messages; callers pick the error category.
    pub fn parse(address: &str) -> Result<Self, String> {
        let url = Url::parse(address).map_err(|e| format!("Malformed address {address:?}: {e}"))?;

        if url.scheme() != "smb" {
            return Err(format!(
                "Unsupported scheme {:?} in {address:?}, expected smb://",
                url.scheme()
            ));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(format!(
                "Credentials don't belong in the address {}; pass them separately",
                redact_userinfo(&url)
            ));
        }
        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(format!("No host in {address:?}")),
        };

        let mut segments = Vec::new();
        for raw in url.path_segments().into_iter().flatten() {
            if raw.is_empty() {
                continue;
            }
            let decoded = urlencoding::decode(raw).map_err(|e| format!("Bad escape in {raw:?}: {e}"))?;
            segments.push(decoded.into_owned());
        }
        if segments.is_empty() {
            return Err(format!("No share name in {address:?}, expected smb://host/share/"));
        }
        let share = segments.remove(0);

        Ok(Self {
            host,
            port: url.port().filter(|port| *port != DEFAULT_SMB_PORT),
            share,
            directory: segments,
        })
    }

    /// The `//host/share` service name `smbclient` expects.
    pub fn service(&self) -> String {
        format!("//{}/{}", self.host, self.share)
    }

    /// The folder below the share root, `/`-joined. Empty at the root.
    pub fn directory_path(&self) -> String {
        self.directory.join("/")
    }
}

fn redact_userinfo(url: &Url) -> String {
    let mut redacted = url.clone();
    let _ = redacted.set_password(None);
    let _ = redacted.set_username("***");
    redacted.to_string()
}
