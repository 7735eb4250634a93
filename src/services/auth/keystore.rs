//! Trusted public key loading from a PKCS#12 key-store.
//!
//! The key-store is looked up on the filesystem first and, when no file exists
//! at that path, among the resources bundled into the binary. Only the RSA
//! public key bound to the requested alias is kept; the parsed key-store is
//! dropped before returning.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use include_dir::{Dir, include_dir};
use openssl::error::ErrorStack;
use openssl::pkcs12::Pkcs12;
use openssl::x509::X509;
use sha2::{Digest, Sha256};

static BUNDLED: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/resources");

#[derive(Debug, thiserror::Error)]
pub enum KeyStoreError {
    #[error("key-store not found on filesystem or in bundled resources: {location}")]
    NotFound { location: String },

    #[error("failed to read key-store {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("key-store is not a valid PKCS#12 document: {0}")]
    InvalidFormat(#[source] ErrorStack),

    #[error("wrong key-store password or corrupted key-store: {0}")]
    WrongPassword(#[source] ErrorStack),

    #[error("key alias not found in key-store: {alias}")]
    AliasNotFound { alias: String },

    #[error("key bound to alias {alias} is not an RSA public key")]
    UnsupportedKey {
        alias: String,
        #[source]
        source: ErrorStack,
    },
}

/// Byte source for key-stores shipped with the application.
pub trait ResourceLookup: Send + Sync {
    /// Return the contents of the named resource, if it exists.
    fn open(&self, name: &str) -> Option<Cow<'_, [u8]>>;
}

/// Resources compiled into the binary from the crate's `resources/` directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledResources;

impl ResourceLookup for BundledResources {
    fn open(&self, name: &str) -> Option<Cow<'_, [u8]>> {
        BUNDLED
            .get_file(name.trim_start_matches('/'))
            .map(|file| Cow::Borrowed(file.contents()))
    }
}

/// Which lookup produced the key-store bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Filesystem,
    Bundled,
}

/// RSA public key trusted to sign access tokens.
///
/// Key bytes are not printable via Debug; only the fingerprint is.
pub struct TrustedKey {
    pkcs1_der: Vec<u8>,
    fingerprint: String,
    bits: u32,
    source: KeySource,
}

impl TrustedKey {
    /// Hex SHA-256 of the SubjectPublicKeyInfo DER.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn source(&self) -> KeySource {
        self.source
    }

    /// PKCS#1 `RSAPublicKey` DER, consumed by the token verifier.
    pub(crate) fn pkcs1_der(&self) -> &[u8] {
        &self.pkcs1_der
    }
}

impl fmt::Debug for TrustedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustedKey")
            .field("fingerprint", &self.fingerprint)
            .field("bits", &self.bits)
            .field("source", &self.source)
            .finish()
    }
}

/// Load the public key bound to `alias` from a PKCS#12 key-store.
///
/// `location` is tried as a filesystem path first; if no file exists there the
/// same name is looked up in `resources`.
pub fn load_public_key(
    location: &str,
    password: &str,
    alias: &str,
    resources: &dyn ResourceLookup,
) -> Result<TrustedKey, KeyStoreError> {
    tracing::debug!(alias, location, "loading public key from key-store");

    let (bytes, source) = read_keystore(location, resources)?;

    let pkcs12 = Pkcs12::from_der(&bytes).map_err(KeyStoreError::InvalidFormat)?;
    let parsed = pkcs12.parse2(password).map_err(KeyStoreError::WrongPassword)?;

    let cert = parsed
        .cert
        .into_iter()
        .chain(parsed.ca.into_iter().flatten())
        .find(|cert| has_alias(cert, alias))
        .ok_or_else(|| {
            tracing::error!(alias, "invalid key alias provided, key not found");
            KeyStoreError::AliasNotFound {
                alias: alias.to_string(),
            }
        })?;

    let key = trusted_key_from_cert(&cert, source).map_err(|source| {
        KeyStoreError::UnsupportedKey {
            alias: alias.to_string(),
            source,
        }
    })?;

    tracing::info!(
        alias,
        location,
        source = ?key.source,
        bits = key.bits,
        fingerprint = %key.fingerprint,
        "loaded JWT signing public key"
    );

    Ok(key)
}

fn read_keystore(
    location: &str,
    resources: &dyn ResourceLookup,
) -> Result<(Vec<u8>, KeySource), KeyStoreError> {
    let path = Path::new(location);
    if path.is_file() {
        let bytes = std::fs::read(path).map_err(|source| KeyStoreError::Io {
            location: location.to_string(),
            source,
        })?;
        return Ok((bytes, KeySource::Filesystem));
    }

    match resources.open(location) {
        Some(bytes) => Ok((bytes.into_owned(), KeySource::Bundled)),
        None => {
            tracing::error!(location, "unable to load key-store");
            Err(KeyStoreError::NotFound {
                location: location.to_string(),
            })
        }
    }
}

// Aliases are case-insensitive, as keytool stores them lowercased.
fn has_alias(cert: &X509, alias: &str) -> bool {
    cert.alias()
        .is_some_and(|name| name.eq_ignore_ascii_case(alias.as_bytes()))
}

fn trusted_key_from_cert(cert: &X509, source: KeySource) -> Result<TrustedKey, ErrorStack> {
    let public_key = cert.public_key()?;
    let rsa = public_key.rsa()?;

    let spki_der = public_key.public_key_to_der()?;
    let fingerprint = hex::encode(Sha256::digest(&spki_der));

    Ok(TrustedKey {
        pkcs1_der: rsa.public_key_to_der_pkcs1()?,
        fingerprint,
        bits: public_key.bits(),
        source,
    })
}
