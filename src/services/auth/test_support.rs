//! Key, key-store and token fixtures for unit tests.

use std::borrow::Cow;
use std::collections::HashMap;

use super::keystore::{ResourceLookup, TrustedKey, load_public_key};

mod signer;

pub use signer::TestSigner;

/// In-memory bundled resources.
#[derive(Debug, Default)]
pub struct MapResources(HashMap<String, Vec<u8>>);

impl MapResources {
    pub fn with(name: &str, bytes: Vec<u8>) -> Self {
        Self(HashMap::from([(name.to_string(), bytes)]))
    }
}

impl ResourceLookup for MapResources {
    fn open(&self, name: &str) -> Option<Cow<'_, [u8]>> {
        self.0
            .get(name.trim_start_matches('/'))
            .map(|bytes| Cow::Borrowed(bytes.as_slice()))
    }
}

impl TestSigner {
    /// Load this signer's public key the way the service does at startup.
    pub fn trusted_key(&self) -> TrustedKey {
        let resources = MapResources::with("test.p12", self.keystore("jwt", "changeit"));
        load_public_key("test.p12", "changeit", "jwt", &resources).unwrap()
    }
}
