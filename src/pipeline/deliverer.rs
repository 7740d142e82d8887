//! Digest delivery: simulated dispatch over a fixed channel allow-list.

use sha2::{Digest as _, Sha256};
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::types::{DeliveryReceipt, Digest};

pub const SUPPORTED_CHANNELS: [&str; 4] = ["email", "webhook", "sms", "rss"];

/// Content-addressed handle for a rendered digest: first 12 hex chars of
/// sha256(rendered).
pub fn digest_ref(digest: &Digest) -> String {
    let hash = Sha256::digest(digest.rendered.as_bytes());
    let hex: String = hash.iter().map(|b| format!("{b:02x}")).collect();
    hex[..12].to_string()
}

/// Simulate delivering a digest. No bytes leave the process; the receipt is
/// the contract. Unknown channels fail with `UnsupportedChannel`, an empty
/// recipient with `InvalidInput`.
pub fn deliver_digest(digest: &Digest, channel: &str, user_id: &str) -> Result<DeliveryReceipt> {
    if user_id.trim().is_empty() {
        return Err(PipelineError::InvalidInput(
            "delivery requires a non-empty user_id".to_string(),
        ));
    }
    if !SUPPORTED_CHANNELS.contains(&channel) {
        return Err(PipelineError::UnsupportedChannel(channel.to_string()));
    }

    let receipt = DeliveryReceipt {
        digest_ref: digest_ref(digest),
        channel: channel.to_string(),
        recipient: user_id.to_string(),
        status: "delivered".to_string(),
    };
    info!(
        channel,
        recipient = user_id,
        digest_ref = %receipt.digest_ref,
        items = digest.item_count,
        "digest delivered"
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(body: &str) -> Digest {
        Digest {
            rendered: body.to_string(),
            format: "plain".to_string(),
            item_count: 1,
            generated_at: "2025-06-04T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn delivers_on_each_supported_channel() {
        let d = digest("DAILY DIGEST\n");
        for channel in SUPPORTED_CHANNELS {
            let receipt = deliver_digest(&d, channel, "demo-user").unwrap();
            assert_eq!(receipt.channel, channel);
            assert_eq!(receipt.recipient, "demo-user");
            assert_eq!(receipt.status, "delivered");
        }
    }

    #[test]
    fn unknown_channel_is_rejected() {
        let err = deliver_digest(&digest("x"), "pigeon", "demo-user").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedChannel(_)));
    }

    #[test]
    fn empty_user_id_is_invalid_input() {
        let err = deliver_digest(&digest("x"), "email", "  ").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    #[test]
    fn digest_ref_is_stable_and_content_addressed() {
        let a = deliver_digest(&digest("same body"), "email", "u1").unwrap();
        let b = deliver_digest(&digest("same body"), "sms", "u2").unwrap();
        let c = deliver_digest(&digest("other body"), "email", "u1").unwrap();
        assert_eq!(a.digest_ref, b.digest_ref);
        assert_ne!(a.digest_ref, c.digest_ref);
        assert_eq!(a.digest_ref.len(), 12);
        assert!(a.digest_ref.chars().all(|ch| ch.is_ascii_hexdigit()));
    }
}
