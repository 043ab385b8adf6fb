//! Wallet signing responses and signature encoding normalization.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

use arcana_types::TxSignature;

use crate::PaymentError;

/// A chain signature is 64 bytes before encoding.
const SIGNATURE_LEN: usize = 64;

/// The three response shapes wallets return from a sign-and-send call.
///
/// Different wallet versions disagree: some return a bare array of
/// signatures, some an object carrying a `signatures` field, some a single
/// string. Anything else refuses to normalize — guessing at a signature is
/// worse than failing.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum SigningResponse {
    Signatures(Vec<String>),
    Envelope { signatures: Vec<String> },
    Raw(String),
}

impl SigningResponse {
    /// Parse a raw wallet response. Unrecognized shapes fail loudly.
    pub fn from_json(value: serde_json::Value) -> Result<Self, PaymentError> {
        serde_json::from_value(value.clone())
            .map_err(|_| PaymentError::MalformedSigningResponse(value.to_string()))
    }

    /// Extract the single transaction signature, whichever shape carried it.
    pub fn into_signature(self) -> Result<String, PaymentError> {
        let signature = match self {
            SigningResponse::Signatures(sigs) | SigningResponse::Envelope { signatures: sigs } => {
                sigs.into_iter().next()
            }
            SigningResponse::Raw(sig) => Some(sig),
        };
        match signature {
            Some(sig) if !sig.is_empty() => Ok(sig),
            _ => Err(PaymentError::MalformedSigningResponse(
                "response carried no signature".to_string(),
            )),
        }
    }
}

/// Whether a signature string already looks base58.
///
/// `+`, `/` and `=` occur in base64 but never in base58, so their absence
/// marks an already-normalized value. Checking first avoids double-encoding
/// a signature that some wallet helpfully converted for us.
fn looks_like_base58(raw: &str) -> bool {
    !raw.contains(['+', '/', '='])
}

/// Normalize a wallet-returned signature into base58.
///
/// The wallet transport hands back base64; chain RPC and the verify
/// endpoint expect base58. Either input form must resolve to the same
/// on-chain transaction.
pub fn normalize_signature(raw: &str) -> Result<TxSignature, PaymentError> {
    if looks_like_base58(raw) {
        let decoded = bs58::decode(raw).into_vec().map_err(|e| {
            PaymentError::MalformedSigningResponse(format!("invalid base58 signature: {e}"))
        })?;
        if decoded.len() != SIGNATURE_LEN {
            return Err(PaymentError::MalformedSigningResponse(format!(
                "signature decodes to {} bytes, expected {SIGNATURE_LEN}",
                decoded.len()
            )));
        }
        return Ok(TxSignature::new(raw));
    }

    let decoded = BASE64.decode(raw).map_err(|e| {
        PaymentError::MalformedSigningResponse(format!("invalid base64 signature: {e}"))
    })?;
    if decoded.len() != SIGNATURE_LEN {
        return Err(PaymentError::MalformedSigningResponse(format!(
            "signature decodes to {} bytes, expected {SIGNATURE_LEN}",
            decoded.len()
        )));
    }
    Ok(TxSignature::new(bs58::encode(decoded).into_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig_bytes() -> [u8; 64] {
        let mut bytes = [0u8; 64];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        bytes
    }

    #[test]
    fn all_three_shapes_normalize() {
        let array = serde_json::json!(["sigA", "sigB"]);
        let envelope = serde_json::json!({ "signatures": ["sigA"] });
        let raw = serde_json::json!("sigA");

        for value in [array, envelope, raw] {
            let sig = SigningResponse::from_json(value)
                .unwrap()
                .into_signature()
                .unwrap();
            assert_eq!(sig, "sigA");
        }
    }

    #[test]
    fn unrecognized_shape_fails_loudly() {
        let err = SigningResponse::from_json(serde_json::json!(42)).unwrap_err();
        assert!(matches!(err, PaymentError::MalformedSigningResponse(_)));
    }

    #[test]
    fn empty_signature_list_fails() {
        let response = SigningResponse::Signatures(vec![]);
        assert!(matches!(
            response.into_signature(),
            Err(PaymentError::MalformedSigningResponse(_))
        ));
    }

    #[test]
    fn base64_converts_to_base58() {
        let bytes = sig_bytes();
        let base64 = BASE64.encode(bytes);
        let expected = bs58::encode(bytes).into_string();

        let normalized = normalize_signature(&base64).unwrap();
        assert_eq!(normalized.as_str(), expected);
    }

    #[test]
    fn base58_input_is_not_double_encoded() {
        let bytes = sig_bytes();
        let base58 = bs58::encode(bytes).into_string();

        let normalized = normalize_signature(&base58).unwrap();
        assert_eq!(normalized.as_str(), base58);
    }

    #[test]
    fn both_encodings_resolve_to_the_same_signature() {
        let bytes = sig_bytes();
        let from_base64 = normalize_signature(&BASE64.encode(bytes)).unwrap();
        let from_base58 = normalize_signature(&bs58::encode(bytes).into_string()).unwrap();
        assert_eq!(from_base64, from_base58);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let short = BASE64.encode([1u8; 32]);
        assert!(matches!(
            normalize_signature(&short),
            Err(PaymentError::MalformedSigningResponse(_))
        ));
    }
}
