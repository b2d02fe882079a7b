//! High-level operations against the easy-rsa/OpenVPN toolchain.
//!
//! Every operation is a thin orchestration of toolchain commands through a
//! [`CommandRunner`]; this crate owns no certificate state of its own.

use std::sync::Arc;

use crate::error::CaError;
use crate::listing::{self, ClientCert};
use crate::runner::{CommandOutput, CommandRunner};

/// Shell snippet that publishes the regenerated CRL where the OpenVPN
/// daemon reads it.
const PUBLISH_CRL: &str =
    "cp -f /etc/openvpn/pki/crl.pem /etc/openvpn/crl.pem && chmod 644 /etc/openvpn/crl.pem";

/// Check a client name against the allowed alphabet `[A-Za-z0-9_.-]`.
///
/// Enforced before any name reaches the toolchain, not just in the HTML
/// form. Names are capped at 64 bytes to stay within X.509 CN limits.
#[must_use]
pub fn valid_client_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'))
}

/// Driver for the containerized CA toolchain.
#[derive(Clone)]
pub struct EasyRsa {
    runner: Arc<dyn CommandRunner>,
    passphrase: String,
}

impl std::fmt::Debug for EasyRsa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the passphrase.
        f.debug_struct("EasyRsa").finish_non_exhaustive()
    }
}

impl EasyRsa {
    /// Create a driver over the given runner with the CA passphrase fed to
    /// easy-rsa on stdin.
    pub fn new(runner: Arc<dyn CommandRunner>, passphrase: impl Into<String>) -> Self {
        Self {
            runner,
            passphrase: passphrase.into(),
        }
    }

    fn check_name(name: &str) -> Result<(), CaError> {
        if valid_client_name(name) {
            Ok(())
        } else {
            Err(CaError::InvalidName {
                name: name.to_owned(),
            })
        }
    }

    fn failed(command: &str, out: &CommandOutput) -> CaError {
        CaError::CommandFailed {
            command: command.to_owned(),
            status: out.status,
            detail: out.detail(),
        }
    }

    async fn run(&self, args: &[&str], stdin: Option<&str>) -> Result<CommandOutput, CaError> {
        let args: Vec<String> = args.iter().map(|&a| a.to_owned()).collect();
        self.runner.run(&args, stdin).await
    }

    /// List every issued client certificate, sorted by name.
    ///
    /// Runs `ovpn_listclients` and parses its CSV. If the script fails or
    /// its output cannot be interpreted, falls back to reading
    /// `pki/issued/*.crt` and `pki/index.txt` through the container; on that
    /// path validity dates are unknown.
    ///
    /// # Errors
    ///
    /// Returns [`CaError::CommandFailed`] when the fallback reads fail too.
    pub async fn list_clients(&self) -> Result<Vec<ClientCert>, CaError> {
        match self.list_via_script().await {
            Ok(certs) => Ok(certs),
            Err(err) => {
                tracing::warn!(error = %err, "ovpn_listclients failed, using pki/issued fallback");
                self.list_via_index().await
            }
        }
    }

    async fn list_via_script(&self) -> Result<Vec<ClientCert>, CaError> {
        let out = self.run(&["ovpn_listclients"], None).await?;
        if !out.success() {
            return Err(Self::failed("ovpn_listclients", &out));
        }
        listing::parse_listing(&out.stdout)
    }

    async fn list_via_index(&self) -> Result<Vec<ClientCert>, CaError> {
        let issued = self.run(&["ls", "/etc/openvpn/pki/issued"], None).await?;
        if !issued.success() {
            return Err(Self::failed("ls pki/issued", &issued));
        }
        let index = self.run(&["cat", "/etc/openvpn/pki/index.txt"], None).await?;
        if !index.success() {
            return Err(Self::failed("cat pki/index.txt", &index));
        }
        Ok(listing::listing_from_issued(&issued.stdout, &index.stdout))
    }

    /// Issue a new client certificate with no key passphrase.
    ///
    /// # Errors
    ///
    /// Returns [`CaError::InvalidName`] for names outside the allowed
    /// alphabet and [`CaError::CommandFailed`] when easy-rsa rejects the
    /// request (for example, a duplicate name).
    pub async fn build_client(&self, name: &str) -> Result<(), CaError> {
        Self::check_name(name)?;

        let stdin = format!("{}\n", self.passphrase);
        let out = self
            .run(&["easyrsa", "build-client-full", name, "nopass"], Some(&stdin))
            .await?;
        if !out.success() {
            return Err(Self::failed("easyrsa build-client-full", &out));
        }

        tracing::info!(client = name, "client certificate issued");
        Ok(())
    }

    /// Revoke a client certificate, regenerate the CRL, and publish it to
    /// the running VPN container.
    ///
    /// # Errors
    ///
    /// Returns [`CaError::AlreadyRevoked`] when easy-rsa reports the
    /// certificate was revoked before, [`CaError::CommandFailed`] when any
    /// of the three steps fails.
    pub async fn revoke_client(&self, name: &str) -> Result<(), CaError> {
        Self::check_name(name)?;

        // Step 1: revoke. easy-rsa asks for confirmation, then the passphrase.
        let stdin = format!("yes\n{}\n", self.passphrase);
        let out = self.run(&["easyrsa", "revoke", name], Some(&stdin)).await?;
        if out.mentions("already revoked") {
            return Err(CaError::AlreadyRevoked {
                name: name.to_owned(),
            });
        }
        if !out.success() {
            return Err(Self::failed("easyrsa revoke", &out));
        }

        // Step 2: regenerate the CRL.
        let stdin = format!("{}\n", self.passphrase);
        let out = self.run(&["easyrsa", "gen-crl"], Some(&stdin)).await?;
        if !out.success() {
            return Err(Self::failed("easyrsa gen-crl", &out));
        }

        // Step 3: publish the CRL where the daemon reads it.
        let out = self.runner.exec_in_container(PUBLISH_CRL).await?;
        if !out.success() {
            return Err(Self::failed("publish crl", &out));
        }

        tracing::info!(client = name, "client certificate revoked, CRL published");
        Ok(())
    }

    /// Fetch the `.ovpn` connection profile for a client.
    ///
    /// # Errors
    ///
    /// Returns [`CaError::NotFound`] when the toolchain reports an unknown
    /// client, [`CaError::CommandFailed`] for other failures.
    pub async fn client_config(&self, name: &str) -> Result<String, CaError> {
        Self::check_name(name)?;

        let out = self.run(&["ovpn_getclient", name], None).await?;
        if !out.success() {
            if out.mentions("unable to find") || out.mentions("not found") {
                return Err(CaError::NotFound {
                    name: name.to_owned(),
                });
            }
            return Err(Self::failed("ovpn_getclient", &out));
        }
        Ok(out.stdout)
    }
}
