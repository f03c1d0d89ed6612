//! PEM decoding, and the `filter` policy applied to decoded entries.

use base64::Engine;
use rustls_pemfile::Item;
use std::fmt;

/// What a PEM entry holds
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum PemKind {
    /// An X.509 certificate
    Certificate,
    /// A PKCS#1 RSA private key
    RsaPrivateKey,
    /// A PKCS#8 private key
    PrivateKey,
    /// A SEC1 EC private key
    EcPrivateKey,
    /// A SubjectPublicKeyInfo public key
    PublicKey,
    /// A certificate revocation list
    Crl,
    /// A PKCS#10 certificate signing request
    CertificateRequest,
}

impl PemKind {
    /// True for the private key kinds
    pub fn is_private_key(&self) -> bool {
        matches!(
            self,
            Self::RsaPrivateKey | Self::PrivateKey | Self::EcPrivateKey
        )
    }
}

/// One decoded PEM entry
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PemEntry {
    /// What the entry holds
    pub kind: PemKind,
    /// DER bytes. For an encrypted entry these are the encrypted bytes.
    pub der: Vec<u8>,
    /// Whether the entry is encrypted
    pub encrypted: bool,
}

impl PemEntry {
    fn is_usable_key(&self) -> bool {
        self.kind.is_private_key() && !self.encrypted
    }

    fn is_usable_certificate(&self) -> bool {
        self.kind == PemKind::Certificate && !self.encrypted
    }
}

/// The result of a `pem` conversion
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum PemValue {
    /// A list of entries
    Entries(Vec<PemEntry>),
    /// A single private key
    Entry(PemEntry),
}

/// Which entries a `pem` conversion returns
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PemFilter {
    /// Every decoded entry, as is
    #[default]
    Off,
    /// The first unencrypted private key, or else all unencrypted certificates (possibly none)
    On,
    /// All unencrypted certificates, of which there must be at least one
    Cert,
    /// The single unencrypted private key, of which there must be exactly one
    Key,
}

impl From<bool> for PemFilter {
    fn from(src: bool) -> Self {
        if src {
            Self::On
        } else {
            Self::Off
        }
    }
}

/// Decodes PEM text into typed entries
pub trait PemDecoder: Send + Sync {
    /// Decode all entries in the text, in order. Text outside of PEM blocks is ignored.
    fn decode(&self, pem: &str) -> Result<Vec<PemEntry>, String>;
}

impl fmt::Debug for dyn PemDecoder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PemDecoder")
    }
}

/// The default decoder, backed by `rustls-pemfile`.
///
/// `rustls-pemfile` skips blocks it cannot use, which includes encrypted keys, so encrypted
/// blocks (an `ENCRYPTED PRIVATE KEY` label, or a `Proc-Type: 4,ENCRYPTED` header) are
/// recognized here and kept with `encrypted` set.
#[derive(Clone, Copy, Debug, Default)]
pub struct RustlsPem;

impl PemDecoder for RustlsPem {
    fn decode(&self, pem: &str) -> Result<Vec<PemEntry>, String> {
        let mut entries = Vec::new();
        for block in blocks(pem)? {
            if block.is_encrypted() {
                let kind = match block.label {
                    "RSA PRIVATE KEY" => PemKind::RsaPrivateKey,
                    "EC PRIVATE KEY" => PemKind::EcPrivateKey,
                    _ => PemKind::PrivateKey,
                };
                entries.push(PemEntry {
                    kind,
                    der: block.body_der()?,
                    encrypted: true,
                });
                continue;
            }

            let mut reader = block.text.as_bytes();
            let item = rustls_pemfile::read_one(&mut reader)
                .map_err(|err| format!("invalid `{}` block: {err}", block.label))?;
            let (kind, der) = match item {
                Some(Item::X509Certificate(der)) => (PemKind::Certificate, der.as_ref().to_vec()),
                Some(Item::Pkcs1Key(key)) => {
                    (PemKind::RsaPrivateKey, key.secret_pkcs1_der().to_vec())
                }
                Some(Item::Pkcs8Key(key)) => (PemKind::PrivateKey, key.secret_pkcs8_der().to_vec()),
                Some(Item::Sec1Key(key)) => (PemKind::EcPrivateKey, key.secret_sec1_der().to_vec()),
                Some(Item::SubjectPublicKeyInfo(der)) => (PemKind::PublicKey, der.as_ref().to_vec()),
                Some(Item::Crl(der)) => (PemKind::Crl, der.as_ref().to_vec()),
                Some(Item::Csr(der)) => (PemKind::CertificateRequest, der.as_ref().to_vec()),
                // Labels we have no kind for
                _ => continue,
            };
            entries.push(PemEntry {
                kind,
                der,
                encrypted: false,
            });
        }
        Ok(entries)
    }
}

/// Apply a filter policy to decoded entries
pub fn apply_filter(entries: Vec<PemEntry>, filter: PemFilter) -> Result<PemValue, String> {
    match filter {
        PemFilter::Off => Ok(PemValue::Entries(entries)),
        PemFilter::On => {
            if let Some(key) = entries.iter().find(|e| e.is_usable_key()) {
                return Ok(PemValue::Entry(key.clone()));
            }
            Ok(PemValue::Entries(
                entries
                    .into_iter()
                    .filter(PemEntry::is_usable_certificate)
                    .collect(),
            ))
        }
        PemFilter::Cert => {
            let certs: Vec<_> = entries
                .into_iter()
                .filter(PemEntry::is_usable_certificate)
                .collect();
            if certs.is_empty() {
                return Err("no unencrypted certificate found".into());
            }
            Ok(PemValue::Entries(certs))
        }
        PemFilter::Key => {
            let mut keys: Vec<_> = entries
                .into_iter()
                .filter(PemEntry::is_usable_key)
                .collect();
            match keys.len() {
                1 => Ok(PemValue::Entry(keys.remove(0))),
                0 => Err("no unencrypted private key found".into()),
                n => Err(format!("expected one unencrypted private key, found {n}")),
            }
        }
    }
}

// One `-----BEGIN X-----` .. `-----END X-----` block
struct Block<'a> {
    label: &'a str,
    // The block including its BEGIN and END lines
    text: &'a str,
    // Lines between BEGIN and END
    lines: Vec<&'a str>,
}

impl<'a> Block<'a> {
    fn is_encrypted(&self) -> bool {
        self.label == "ENCRYPTED PRIVATE KEY"
            || self
                .lines
                .iter()
                .any(|line| line.trim() == "Proc-Type: 4,ENCRYPTED")
    }

    // The base64 body, skipping RFC 1421 headers and the blank line after them
    fn body_der(&self) -> Result<Vec<u8>, String> {
        let body: String = self
            .lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !line.contains(':'))
            .collect();
        base64::engine::general_purpose::STANDARD
            .decode(body)
            .map_err(|err| format!("invalid `{}` block: {err}", self.label))
    }
}

fn blocks(pem: &str) -> Result<Vec<Block<'_>>, String> {
    const BEGIN: &str = "-----BEGIN ";
    const END: &str = "-----END ";
    const DASHES: &str = "-----";

    let mut result = Vec::new();
    let mut open: Option<(&str, usize, Vec<&str>)> = None;
    let mut offset = 0;

    for line in pem.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim();

        match open.take() {
            None => {
                if let Some(label) = trimmed
                    .strip_prefix(BEGIN)
                    .and_then(|rest| rest.strip_suffix(DASHES))
                {
                    open = Some((label, line_start, Vec::new()));
                }
            }
            Some((label, start, mut lines)) => {
                if let Some(end_label) = trimmed
                    .strip_prefix(END)
                    .and_then(|rest| rest.strip_suffix(DASHES))
                {
                    if end_label != label {
                        return Err(format!(
                            "`{label}` block is closed by an `{end_label}` END line"
                        ));
                    }
                    result.push(Block {
                        label,
                        text: &pem[start..offset],
                        lines,
                    });
                } else {
                    lines.push(line);
                    open = Some((label, start, lines));
                }
            }
        }
    }

    if let Some((label, _, _)) = open {
        return Err(format!("`{label}` block has no END line"));
    }
    Ok(result)
}
