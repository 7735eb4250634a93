//! RSA signer fixture. Shared with the integration tests through `#[path]`,
//! so only external crates may be used here.

#![allow(dead_code)]

use std::sync::OnceLock;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::x509::{X509, X509NameBuilder};
use sha2::{Digest, Sha256};

/// RSA key pair with a self-signed certificate.
pub struct TestSigner {
    pkey: PKey<Private>,
    cert: X509,
}

impl TestSigner {
    /// Key that the verifier under test trusts.
    pub fn trusted() -> &'static TestSigner {
        static SIGNER: OnceLock<TestSigner> = OnceLock::new();
        SIGNER.get_or_init(|| TestSigner::generate("trusted-issuer"))
    }

    /// A second key the verifier has never seen.
    pub fn untrusted() -> &'static TestSigner {
        static SIGNER: OnceLock<TestSigner> = OnceLock::new();
        SIGNER.get_or_init(|| TestSigner::generate("rogue-issuer"))
    }

    fn generate(common_name: &str) -> Self {
        let rsa = Rsa::generate(2048).unwrap();
        let pkey = PKey::from_rsa(rsa).unwrap();
        let cert = self_signed(&pkey, common_name);
        Self { pkey, cert }
    }

    /// Key-store holding the private key and its certificate under `alias`.
    pub fn keystore(&self, alias: &str, password: &str) -> Vec<u8> {
        Pkcs12::builder()
            .name(alias)
            .pkey(&self.pkey)
            .cert(&self.cert)
            .build2(password)
            .unwrap()
            .to_der()
            .unwrap()
    }

    /// Certificate-only trust store, as a verifier normally receives it.
    pub fn trust_store(&self, alias: &str, password: &str) -> Vec<u8> {
        Pkcs12::builder()
            .name(alias)
            .cert(&self.cert)
            .build2(password)
            .unwrap()
            .to_der()
            .unwrap()
    }

    /// Key-store whose only entry is an EC (P-256) key.
    pub fn ec_keystore(alias: &str, password: &str) -> Vec<u8> {
        let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
        let pkey = PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap();
        let cert = self_signed(&pkey, "ec-issuer");

        Pkcs12::builder()
            .name(alias)
            .pkey(&pkey)
            .cert(&cert)
            .build2(password)
            .unwrap()
            .to_der()
            .unwrap()
    }

    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.pkey.public_key_to_der().unwrap()))
    }

    pub fn sign(&self, claims: &serde_json::Value) -> String {
        self.sign_with(Algorithm::RS256, claims)
    }

    pub fn sign_with(&self, alg: Algorithm, claims: &serde_json::Value) -> String {
        let der = self.pkey.rsa().unwrap().private_key_to_der().unwrap();
        let key = EncodingKey::from_rsa_der(&der);
        jsonwebtoken::encode(&Header::new(alg), claims, &key).unwrap()
    }
}

fn self_signed(pkey: &PKey<Private>, common_name: &str) -> X509 {
    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_text("CN", common_name).unwrap();
    let name = name.build();

    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    let serial = BigNum::from_u32(1).unwrap().to_asn1_integer().unwrap();
    builder.set_serial_number(&serial).unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(pkey).unwrap();
    builder
        .set_not_before(&Asn1Time::days_from_now(0).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(365).unwrap())
        .unwrap();
    builder.sign(pkey, MessageDigest::sha256()).unwrap();
    builder.build()
}
