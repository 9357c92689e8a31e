use crate::error::{Result, SignError};
use ring::{rand as ring_rand, signature};
use x509_parser::prelude::*;

/// Sign data using a private key (supports ECDSA P-256 and RSA-PKCS1-SHA256)
pub fn sign(priv_key_pem: &str, data: &[u8]) -> Result<Vec<u8>> {
    let der = decode_pem(priv_key_pem, "PRIVATE KEY")?;

    // Try ECDSA P-256 first
    let rng = ring_rand::SystemRandom::new();
    if let Ok(key_pair) =
        signature::EcdsaKeyPair::from_pkcs8(&signature::ECDSA_P256_SHA256_ASN1_SIGNING, &der, &rng)
    {
        let sig = key_pair
            .sign(&rng, data)
            .map_err(|e| SignError::Crypto(format!("ECDSA signing failed: {}", e)))?;
        return Ok(sig.as_ref().to_vec());
    }

    // Try RSA
    if let Ok(key_pair) = signature::RsaKeyPair::from_pkcs8(&der) {
        let mut sig = vec![0; key_pair.public().modulus_len()];
        key_pair
            .sign(&signature::RSA_PKCS1_SHA256, &rng, data, &mut sig)
            .map_err(|e| SignError::Crypto(format!("RSA signing failed: {}", e)))?;
        return Ok(sig);
    }

    Err(SignError::InvalidKey(
        "Unsupported or invalid private key format".into(),
    ))
}

/// Verify a signature using a certificate (supports ECDSA P-256 and RSA)
pub fn verify(cert_pem: &str, data: &[u8], sig: &[u8]) -> Result<()> {
    // Parse cert to get public key
    let (_, pem) = parse_x509_pem(cert_pem.as_bytes())
        .map_err(|e| SignError::InvalidCertificate(format!("PEM parse error: {}", e)))?;
    let (_, x509) = x509_parser::parse_x509_certificate(&pem.contents)
        .map_err(|e| SignError::InvalidCertificate(format!("X509 parse error: {}", e)))?;

    let spki = x509.tbs_certificate.subject_pki;
    let key_bytes = spki.subject_public_key.data;
    let oid = spki.algorithm.algorithm.to_id_string();

    let peer_public_key = if oid == "1.2.840.10045.2.1" {
        // ECDSA P-256
        signature::UnparsedPublicKey::new(&signature::ECDSA_P256_SHA256_ASN1, key_bytes)
    } else if oid == "1.2.840.113549.1.1.1" {
        // RSA
        signature::UnparsedPublicKey::new(&signature::RSA_PKCS1_2048_8192_SHA256, key_bytes)
    } else {
        return Err(SignError::InvalidCertificate(format!(
            "Unsupported algorithm OID: {}",
            oid
        )));
    };

    peer_public_key
        .verify(data, sig)
        .map_err(|_| SignError::Crypto("Signature verification failed".into()))
}

/// Extract the serial number (lowercase hex) from a certificate PEM
pub fn cert_serial(cert_pem: &str) -> Result<String> {
    let (_, pem) = parse_x509_pem(cert_pem.as_bytes())
        .map_err(|e| SignError::InvalidCertificate(format!("PEM parse error: {}", e)))?;
    let (_, x509) = x509_parser::parse_x509_certificate(&pem.contents)
        .map_err(|e| SignError::InvalidCertificate(format!("X509 parse error: {}", e)))?;

    Ok(x509.tbs_certificate.serial.to_str_radix(16))
}

fn decode_pem(pem_str: &str, tag: &str) -> Result<Vec<u8>> {
    let pems = ::pem::parse_many(pem_str)
        .map_err(|e| SignError::InvalidKey(format!("PEM parse error: {}", e)))?;

    for p in pems {
        if p.tag() == tag {
            return Ok(p.into_contents());
        }
    }

    Err(SignError::InvalidKey(format!("PEM tag '{}' not found", tag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cert_and_key() -> (String, String) {
        let key_pair = rcgen::KeyPair::generate().unwrap();
        let params = rcgen::CertificateParams::new(vec!["register-1.test".to_string()]).unwrap();
        let cert = params.self_signed(&key_pair).unwrap();
        (cert.pem(), key_pair.serialize_pem())
    }

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let (cert_pem, key_pem) = test_cert_and_key();
        let digest = b"YmFzZTY0LWRpZ2VzdA==";

        let sig = sign(&key_pem, digest).unwrap();
        assert!(!sig.is_empty());
        verify(&cert_pem, digest, &sig).unwrap();
    }

    #[test]
    fn test_verify_rejects_tampered_data() {
        let (cert_pem, key_pem) = test_cert_and_key();

        let sig = sign(&key_pem, b"original").unwrap();
        assert!(verify(&cert_pem, b"tampered", &sig).is_err());
    }

    #[test]
    fn test_sign_rejects_garbage_key() {
        let err = sign("not a pem", b"data").unwrap_err();
        assert!(matches!(err, SignError::InvalidKey(_)));
    }

    #[test]
    fn test_cert_serial_is_hex() {
        let (cert_pem, _) = test_cert_and_key();
        let serial = cert_serial(&cert_pem).unwrap();
        assert!(!serial.is_empty());
        assert!(serial.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
