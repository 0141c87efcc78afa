//! `DirectoryLister` backed by Samba's `smbclient` tool.
//!
//! Each listing runs one `smbclient //host/share -c 'ls "dir/*"'` process. The
//! password travels in the `PASSWD` environment variable, never on the command line,
//! and `TZ=UTC` makes the printed modification times UTC.

use super::smb_address::SmbAddress;
use super::smb_util::{classify_error, first_status_line, status_token};
use super::smbclient_output::parse_ls_output;
use crate::config::{Credentials, ShareConfig};
use crate::inventory::{ChildDescriptor, DirectoryLister, InventoryError};
use log::debug;
use std::fmt;
use std::process::{Command, Stdio};

const SMBCLIENT_PROGRAM: &str = "smbclient";

/// A fully built `smbclient` command line.
#[derive(Clone, PartialEq, Eq)]
pub struct SmbClientInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl fmt::Debug for SmbClientInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env: Vec<String> = self.env.iter().map(|(key, _)| format!("{key}=***")).collect();
        f.debug_struct("SmbClientInvocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("env", &env)
            .finish()
    }
}

/// What a finished process produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `smbclient`. A trait so tests can replay recorded output.
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &SmbClientInvocation) -> std::io::Result<CommandOutput>;
}

/// Runs the real process, with stdin closed so a password prompt can't hang the walk.
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &SmbClientInvocation) -> std::io::Result<CommandOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Lists SMB directories through `smbclient`.
pub struct SmbClientLister<R = SystemCommandRunner> {
    config: ShareConfig,
    runner: R,
}

impl SmbClientLister<SystemCommandRunner> {
    pub fn new(config: ShareConfig) -> Self {
        Self::with_runner(config, SystemCommandRunner)
    }
}

impl<R: CommandRunner> SmbClientLister<R> {
    pub fn with_runner(config: ShareConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Builds the command that lists `address`.
    pub fn invocation_for(&self, address: &SmbAddress) -> Result<SmbClientInvocation, String> {
        let directory = address.directory_path();
        if directory.contains('"') {
            return Err(format!("Can't list {directory:?}: smbclient can't quote '\"'"));
        }
        let pattern = if directory.is_empty() {
            "*".to_string()
        } else {
            format!("{directory}/*")
        };

        let mut args = vec![address.service()];
        if let Some(port) = address.port {
            args.push("-p".to_string());
            args.push(port.to_string());
        }
        if !self.config.domain().is_empty() {
            args.push("-W".to_string());
            args.push(self.config.domain().to_string());
        }
        // smbclient formats times with the local zone.
        let mut env = vec![("TZ".to_string(), "UTC".to_string())];
        match self.config.credentials() {
            Credentials::Guest => args.push("-N".to_string()),
            Credentials::User { username, password } => {
                args.push("-U".to_string());
                args.push(username.clone());
                env.push(("PASSWD".to_string(), password.clone()));
            }
        }
        args.push("-t".to_string());
        args.push(self.config.timeout().as_secs().max(1).to_string());
        args.push("-c".to_string());
        args.push(format!("ls \"{pattern}\""));

        Ok(SmbClientInvocation {
            program: SMBCLIENT_PROGRAM.to_string(),
            args,
            env,
        })
    }
}

impl<R: CommandRunner> DirectoryLister for SmbClientLister<R> {
    fn list(&self, address: &str) -> Result<Vec<ChildDescriptor>, InventoryError> {
        let parsed = SmbAddress::parse(address).map_err(InventoryError::ConnectivityFailure)?;
        let invocation = self.invocation_for(&parsed).map_err(|message| InventoryError::ListingFailure {
            address: address.to_string(),
            message,
        })?;
        debug!("smbclient: {:?}", invocation);

        let output = self.runner.run(&invocation).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InventoryError::UnexpectedFailure(format!(
                    "{SMBCLIENT_PROGRAM} not found; install the Samba client tools"
                ))
            } else {
                InventoryError::UnexpectedFailure(format!("Failed to run {SMBCLIENT_PROGRAM}: {e}"))
            }
        })?;

        // smbclient can exit 0 after a failed `ls`, so a status line counts as failure too.
        let combined = format!("{}\n{}", output.stderr, output.stdout);
        let status_line = first_status_line(&combined);
        if status_line.is_some_and(|line| is_empty_listing(line, &parsed)) {
            debug!("smbclient: {} is empty", address);
            return Ok(Vec::new());
        }
        if !output.success || status_line.is_some() {
            debug!(
                "smbclient failed for {}: success={}, stderr={}, stdout={}",
                address,
                output.success,
                output.stderr.trim(),
                output.stdout.trim()
            );
            return Err(classify_error(address, &combined));
        }

        let base = if address.ends_with('/') {
            address.to_string()
        } else {
            format!("{address}/")
        };
        let children = parse_ls_output(&output.stdout)
            .into_iter()
            .map(|item| {
                let encoded = urlencoding::encode(&item.name).into_owned();
                if item.is_directory {
                    ChildDescriptor {
                        full_path: format!("{base}{encoded}/"),
                        name: format!("{}/", item.name),
                        is_directory: true,
                        size: 0,
                        last_modified: item.last_modified,
                    }
                } else {
                    ChildDescriptor {
                        full_path: format!("{base}{encoded}"),
                        name: item.name,
                        is_directory: false,
                        size: item.size,
                        last_modified: item.last_modified,
                    }
                }
            })
            .collect::<Vec<_>>();
        debug!("smbclient: {} children at {}", children.len(), address);
        Ok(children)
    }
}

/// Servers that send no `.` and `..` answer an empty folder with
/// `NT_STATUS_NO_SUCH_FILE listing \dir\*` for the folder itself.
fn is_empty_listing(status_line: &str, address: &SmbAddress) -> bool {
    if status_token(status_line) != Some("NT_STATUS_NO_SUCH_FILE") {
        return false;
    }
    let mut pattern = String::from("\\");
    for component in &address.directory {
        pattern.push_str(component);
        pattern.push('\\');
    }
    pattern.push('*');
    status_line.ends_with(&format!("listing {pattern}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays a fixed output and records what it was asked to run.
    struct ScriptedRunner {
        output: std::io::Result<CommandOutput>,
        seen: Mutex<Vec<SmbClientInvocation>>,
    }

    impl ScriptedRunner {
        fn ok(stdout: &str) -> Self {
            Self::finished(true, stdout, "")
        }

        fn finished(success: bool, stdout: &str, stderr: &str) -> Self {
            Self {
                output: Ok(CommandOutput {
                    success,
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                }),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, invocation: &SmbClientInvocation) -> std::io::Result<CommandOutput> {
            self.seen.lock().unwrap().push(invocation.clone());
            match &self.output {
                Ok(output) => Ok(output.clone()),
                Err(e) => Err(std::io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    fn user_config() -> ShareConfig {
        ShareConfig::new("smb://nas.local/share/", Some("WORKGROUP"), Some("ubuntu"), Some("s3cret"))
            .unwrap()
            .with_timeout(Duration::from_secs(20))
    }

    fn guest_config() -> ShareConfig {
        ShareConfig::new("smb://nas.local/share/", None, None, None).unwrap()
    }

    const LISTING: &str = "  .                                   D        0  Sun Oct 18 10:00:00 2026
  ..                                  D        0  Sun Oct 18 10:00:00 2026
  sub                                 D        0  Sun Oct 18 10:00:00 2026
  a.txt                               A       10  Sun Oct 18 10:00:00 2026

\t\t100 blocks of size 1024. 50 blocks available
";

    #[test]
    fn test_lists_children_in_output_order() {
        let lister = SmbClientLister::with_runner(user_config(), ScriptedRunner::ok(LISTING));
        let children = lister.list("smb://nas.local/share/").unwrap();

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name, "sub/");
        assert!(children[0].is_directory);
        assert_eq!(children[0].full_path, "smb://nas.local/share/sub/");
        assert_eq!(children[1].name, "a.txt");
        assert_eq!(children[1].size, 10);
        assert_eq!(children[1].full_path, "smb://nas.local/share/a.txt");
    }

    #[test]
    fn test_invocation_for_user_keeps_password_out_of_args() {
        let runner = ScriptedRunner::ok(LISTING);
        let lister = SmbClientLister::with_runner(user_config(), runner);
        lister.list("smb://nas.local/share/My%20Docs/").unwrap();

        let seen = lister.runner.seen.lock().unwrap();
        let invocation = &seen[0];
        assert_eq!(invocation.program, "smbclient");
        assert_eq!(
            invocation.args,
            vec![
                "//nas.local/share",
                "-W",
                "WORKGROUP",
                "-U",
                "ubuntu",
                "-t",
                "20",
                "-c",
                "ls \"My Docs/*\"",
            ]
        );
        assert!(!invocation.args.iter().any(|arg| arg.contains("s3cret")));
        assert_eq!(
            invocation.env,
            vec![
                ("TZ".to_string(), "UTC".to_string()),
                ("PASSWD".to_string(), "s3cret".to_string()),
            ]
        );
        assert!(!format!("{:?}", invocation).contains("s3cret"));
    }

    #[test]
    fn test_invocation_for_guest_uses_no_password_flag() {
        let lister = SmbClientLister::with_runner(guest_config(), ScriptedRunner::ok(""));
        let address = SmbAddress::parse("smb://nas.local:1445/share/").unwrap();
        let invocation = lister.invocation_for(&address).unwrap();

        assert!(invocation.args.contains(&"-N".to_string()));
        assert!(!invocation.args.contains(&"-U".to_string()));
        assert!(!invocation.args.contains(&"-W".to_string()));
        assert_eq!(invocation.env, vec![("TZ".to_string(), "UTC".to_string())]);
        assert_eq!(invocation.args[1..3], ["-p".to_string(), "1445".to_string()]);
        assert_eq!(invocation.args.last().unwrap(), "ls \"*\"");
    }

    #[test]
    fn test_malformed_address_is_connectivity_failure() {
        let lister = SmbClientLister::with_runner(guest_config(), ScriptedRunner::ok(""));
        assert!(matches!(
            lister.list("invalid-address"),
            Err(InventoryError::ConnectivityFailure(_))
        ));
        assert!(lister.runner.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failed_exit_is_classified() {
        let runner = ScriptedRunner::finished(false, "", "session setup failed: NT_STATUS_LOGON_FAILURE\n");
        let lister = SmbClientLister::with_runner(user_config(), runner);

        assert!(matches!(
            lister.list("smb://nas.local/share/"),
            Err(InventoryError::AuthenticationFailure(_))
        ));
    }

    #[test]
    fn test_status_line_with_zero_exit_is_still_a_failure() {
        let runner = ScriptedRunner::ok("NT_STATUS_ACCESS_DENIED listing \\private\\*\n");
        let lister = SmbClientLister::with_runner(user_config(), runner);

        match lister.list("smb://nas.local/share/private/") {
            Err(InventoryError::ListingFailure { address, .. }) => {
                assert_eq!(address, "smb://nas.local/share/private/")
            }
            other => panic!("Expected ListingFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_program_is_unexpected_failure() {
        let runner = ScriptedRunner {
            output: Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file")),
            seen: Mutex::new(Vec::new()),
        };
        let lister = SmbClientLister::with_runner(guest_config(), runner);

        match lister.list("smb://nas.local/share/") {
            Err(InventoryError::UnexpectedFailure(msg)) => assert!(msg.contains("Samba client")),
            other => panic!("Expected UnexpectedFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_quote_in_directory_is_rejected() {
        let lister = SmbClientLister::with_runner(guest_config(), ScriptedRunner::ok(""));
        assert!(matches!(
            lister.list("smb://nas.local/share/say%22hi%22/"),
            Err(InventoryError::ListingFailure { .. })
        ));
    }

    #[test]
    fn test_no_such_file_for_listed_folder_is_empty_listing() {
        let runner = ScriptedRunner::ok("NT_STATUS_NO_SUCH_FILE listing \\empty\\*\n");
        let lister = SmbClientLister::with_runner(guest_config(), runner);
        assert!(lister.list("smb://nas.local/share/empty/").unwrap().is_empty());

        let runner = ScriptedRunner::finished(false, "", "NT_STATUS_NO_SUCH_FILE listing \\*\n");
        let lister = SmbClientLister::with_runner(guest_config(), runner);
        assert!(lister.list("smb://nas.local/share/").unwrap().is_empty());
    }

    #[test]
    fn test_missing_folder_is_still_a_listing_failure() {
        for output in [
            "NT_STATUS_OBJECT_NAME_NOT_FOUND listing \\gone\\*\n",
            "NT_STATUS_OBJECT_PATH_NOT_FOUND listing \\gone\\*\n",
            "NT_STATUS_NO_SUCH_FILE listing \\other\\*\n",
        ] {
            let lister = SmbClientLister::with_runner(guest_config(), ScriptedRunner::ok(output));
            assert!(
                matches!(lister.list("smb://nas.local/share/gone/"), Err(InventoryError::ListingFailure { .. })),
                "{output:?} should fail"
            );
        }
    }
}
