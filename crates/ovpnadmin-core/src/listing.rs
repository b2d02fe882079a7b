//! Certificate listing model and parsers.
//!
//! The primary source is the CSV output of `ovpn_listclients`
//! (`name,begin,end,status` with a header line and OpenSSL-style dates).
//! When that script is unavailable the fallback reconstructs the listing
//! from `pki/issued/*.crt` filenames and the revocation marks in
//! `pki/index.txt`.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::CaError;

/// Status of an issued client certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CertStatus {
    Valid,
    Revoked,
    Expired,
}

impl CertStatus {
    /// Parse the status column of `ovpn_listclients`.
    fn from_listing(s: &str) -> Result<Self, CaError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VALID" => Ok(Self::Valid),
            "REVOKED" => Ok(Self::Revoked),
            "EXPIRED" => Ok(Self::Expired),
            other => Err(CaError::ParseOutput {
                reason: format!("unknown certificate status '{other}'"),
            }),
        }
    }

    /// Label shown in listings.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Valid => "active",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        }
    }
}

/// One client certificate as reported by the toolchain.
///
/// Ephemeral — re-derived from toolchain output on every listing, never
/// stored by this application. Dates are `None` when the fallback path had
/// to be used or the toolchain printed something unparseable.
#[derive(Debug, Clone, Serialize)]
pub struct ClientCert {
    pub name: String,
    pub created: Option<NaiveDateTime>,
    pub expires: Option<NaiveDateTime>,
    pub status: CertStatus,
}

impl ClientCert {
    /// Whether the certificate can no longer be used to connect.
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        self.status == CertStatus::Revoked
    }
}

/// Parse an OpenSSL-style validity date such as `May 15 17:36:51 2025 GMT`.
///
/// Single-digit days come space-padded (`May  5 ...`), so whitespace is
/// normalized first. Returns `None` rather than failing the whole listing.
fn parse_openssl_date(s: &str) -> Option<NaiveDateTime> {
    let normalized: Vec<&str> = s.split_whitespace().collect();
    let [month, day, time, year, ..] = normalized.as_slice() else {
        return None;
    };
    let joined = format!("{month} {day} {time} {year}");
    NaiveDateTime::parse_from_str(&joined, "%b %d %H:%M:%S %Y").ok()
}

/// Parse the CSV output of `ovpn_listclients`.
///
/// Lines with fewer than four fields are skipped — the script interleaves
/// informational notices with its CSV on some toolchain versions. Duplicate
/// names keep the last row seen, and the result is sorted by name.
///
/// # Errors
///
/// Returns [`CaError::ParseOutput`] if a status column holds an
/// unrecognized value.
pub fn parse_listing(output: &str) -> Result<Vec<ClientCert>, CaError> {
    let mut certs: BTreeMap<String, ClientCert> = BTreeMap::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("name,") {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let [name, begin, end, status, ..] = fields.as_slice() else {
            tracing::debug!(line, "skipping non-CSV line in client listing");
            continue;
        };

        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        certs.insert(
            name.to_owned(),
            ClientCert {
                name: name.to_owned(),
                created: parse_openssl_date(begin),
                expires: parse_openssl_date(end),
                status: CertStatus::from_listing(status)?,
            },
        );
    }

    Ok(certs.into_values().collect())
}

/// Extract the revoked common names from an easy-rsa `index.txt`.
///
/// Revoked entries start with `R`; fields are tab-separated and the subject
/// DN sits in field six as `/CN=<name>`.
pub fn revoked_names_from_index(index: &str) -> HashSet<String> {
    let mut revoked = HashSet::new();
    for line in index.lines() {
        if !line.starts_with('R') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 6 {
            continue;
        }
        if let Some(name) = fields[5].rsplit("/CN=").next() {
            if !name.is_empty() {
                revoked.insert(name.to_owned());
            }
        }
    }
    revoked
}

/// Reconstruct a listing from `pki/issued` filenames plus `index.txt`.
///
/// Used when `ovpn_listclients` fails. Validity dates are unknown on this
/// path. Version-named artifacts (`3.*`) that easy-rsa 3 leaves in the
/// issued directory are skipped.
pub fn listing_from_issued(issued_ls: &str, index: &str) -> Vec<ClientCert> {
    let revoked = revoked_names_from_index(index);

    let mut names: Vec<&str> = issued_ls
        .lines()
        .filter_map(|l| l.trim().strip_suffix(".crt"))
        .filter(|n| !n.is_empty() && !n.starts_with("3."))
        .collect();
    names.sort_unstable();
    names.dedup();

    names
        .into_iter()
        .map(|name| ClientCert {
            name: name.to_owned(),
            created: None,
            expires: None,
            status: if revoked.contains(name) {
                CertStatus::Revoked
            } else {
                CertStatus::Valid
            },
        })
        .collect()
}
