//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Only the `oauth_*` parameters and any query/form parameters are signed;
//! JSON bodies are not part of the signature base string.

use anyhow::{anyhow, Result};
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::capability::TwitterCredentials;

type HmacSha1 = Hmac<Sha1>;

/// Per-request values that must be unique.
#[derive(Debug, Clone)]
pub struct Nonce {
    pub nonce: String,
    pub timestamp: i64,
}

impl Nonce {
    /// Fresh random nonce stamped with the current time.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            nonce: uuid::Uuid::new_v4().simple().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// RFC 3986 percent-encoding (unreserved characters kept).
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// `oauth_*` protocol parameters, without the signature.
fn protocol_params(credentials: &TwitterCredentials, nonce: &Nonce) -> Vec<(String, String)> {
    vec![
        ("oauth_consumer_key".to_string(), credentials.api_key.clone()),
        ("oauth_nonce".to_string(), nonce.nonce.clone()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        ("oauth_timestamp".to_string(), nonce.timestamp.to_string()),
        ("oauth_token".to_string(), credentials.access_token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ]
}

/// Signature base string: `METHOD&url&sorted-params`, each part encoded.
#[must_use]
pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&param_string)
    )
}

/// Base64 HMAC-SHA1 of `base` keyed by both secrets.
pub fn sign(base: &str, consumer_secret: &str, token_secret: &str) -> Result<String> {
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| anyhow!("invalid signing key: {e}"))?;
    mac.update(base.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// Value of the `Authorization` header for a signed request.
///
/// `extra_params` are the request's query or form parameters.
pub fn authorization_header(
    method: &str,
    url: &str,
    extra_params: &[(String, String)],
    credentials: &TwitterCredentials,
    nonce: &Nonce,
) -> Result<String> {
    let mut oauth = protocol_params(credentials, nonce);

    let mut all = oauth.clone();
    all.extend_from_slice(extra_params);
    let base = signature_base_string(method, url, &all);
    let signature = sign(&base, &credentials.api_secret, &credentials.access_secret)?;

    oauth.push(("oauth_signature".to_string(), signature));
    oauth.sort();

    let fields = oauth
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {fields}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from Twitter's "Creating a signature" guide.
    fn example_credentials() -> TwitterCredentials {
        TwitterCredentials {
            api_key: "xvz1evFS4wEEPTGEFPHBog".to_string(),
            api_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
            access_token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            access_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
        }
    }

    fn example_nonce() -> Nonce {
        Nonce {
            nonce: "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg".to_string(),
            timestamp: 1_318_622_958,
        }
    }

    fn example_params() -> Vec<(String, String)> {
        let mut params = protocol_params(&example_credentials(), &example_nonce());
        params.push(("include_entities".to_string(), "true".to_string()));
        params.push((
            "status".to_string(),
            "Hello Ladies + Gentlemen, a signed OAuth request!".to_string(),
        ));
        params
    }

    const EXAMPLE_URL: &str = "https://api.twitter.com/1.1/statuses/update.json";

    #[test]
    fn base_string_matches_reference() {
        let base = signature_base_string("post", EXAMPLE_URL, &example_params());
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&\
             include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26\
             oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26\
             oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26\
             oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen\
             %252C%2520a%2520signed%2520OAuth%2520request%2521"
        );
    }

    #[test]
    fn signature_matches_reference() {
        let credentials = example_credentials();
        let base = signature_base_string("POST", EXAMPLE_URL, &example_params());
        let signature = sign(&base, &credentials.api_secret, &credentials.access_secret).unwrap();
        assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn header_carries_encoded_signature() {
        let extra = vec![
            ("include_entities".to_string(), "true".to_string()),
            (
                "status".to_string(),
                "Hello Ladies + Gentlemen, a signed OAuth request!".to_string(),
            ),
        ];
        let header = authorization_header(
            "POST",
            EXAMPLE_URL,
            &extra,
            &example_credentials(),
            &example_nonce(),
        )
        .unwrap();

        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(!header.contains("status="), "request params stay out of the header");
    }

    #[test]
    fn generated_nonces_differ() {
        assert_ne!(Nonce::generate().nonce, Nonce::generate().nonce);
    }
}
