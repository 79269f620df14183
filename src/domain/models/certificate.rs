//! Client-certificate view used for organization extraction.
//!
//! TLS termination and certificate issuance happen outside the core; what
//! arrives here is the already-verified peer certificate reduced to its
//! extensions. The org-id extension value is an ASN.1 UTF8String holding
//! the organization UUID in string form.

use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// OID of the organization-id certificate extension.
pub const ORG_ID_EXTENSION_OID: &str = "1.3.6.1.4.1.32473.1.2";

/// ASN.1 UTF8String tag.
const TAG_UTF8_STRING: u8 = 0x0c;

/// One X.509 extension: dotted OID plus the DER-encoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateExtension {
    pub oid: String,
    pub value: Vec<u8>,
}

/// The peer certificate as seen by the authorization layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerCertificate {
    pub extensions: Vec<CertificateExtension>,
}

impl PeerCertificate {
    pub fn new(extensions: Vec<CertificateExtension>) -> Self {
        Self { extensions }
    }

    pub fn extension(&self, oid: &str) -> Option<&[u8]> {
        self.extensions
            .iter()
            .find(|ext| ext.oid == oid)
            .map(|ext| ext.value.as_slice())
    }

    /// Extracts the organization ID carried by this certificate, if any.
    ///
    /// Returns `Ok(None)` when the extension is absent; a present but
    /// undecodable extension is an error.
    pub fn org_id(&self) -> DomainResult<Option<Uuid>> {
        let Some(der) = self.extension(ORG_ID_EXTENSION_OID) else {
            return Ok(None);
        };

        let value = decode_utf8_string(der)?;
        let org_id = Uuid::parse_str(&value).map_err(|_| DomainError::InvalidUuid(value))?;
        Ok(Some(org_id))
    }
}

/// Decodes a DER UTF8String. Extension values are short (a UUID in string
/// form), so only the single-byte length form is accepted.
fn decode_utf8_string(der: &[u8]) -> DomainResult<String> {
    if der.len() < 2 || der[0] != TAG_UTF8_STRING {
        return Err(DomainError::InvalidCertificate(
            "extension value is not a UTF8String".into(),
        ));
    }
    let len = der[1] as usize;
    if (der[1] & 0x80) != 0 || der.len() != 2 + len {
        return Err(DomainError::InvalidCertificate(
            "malformed UTF8String length".into(),
        ));
    }
    String::from_utf8(der[2..].to_vec())
        .map_err(|_| DomainError::InvalidCertificate("extension value is not UTF-8".into()))
}

/// Encodes a string as a DER UTF8String. Used when issuing enrollment
/// credentials and by tests building certificates.
pub fn encode_utf8_string(value: &str) -> Vec<u8> {
    debug_assert!(value.len() < 0x80);
    let mut der = Vec::with_capacity(value.len() + 2);
    der.push(TAG_UTF8_STRING);
    der.push(value.len() as u8);
    der.extend_from_slice(value.as_bytes());
    der
}
