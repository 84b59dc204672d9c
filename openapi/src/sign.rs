use crate::constants::PARTNER_KEY_FIELD;
use crate::Params;
use baijiayun_core::hash::hex_md5;
use baijiayun_core::Result;

/// Accumulating MD5 signer.
///
/// Terms are collected with [`add_data`](Self::add_data); the signature is
/// the lowercase-hex MD5 of the bytewise-sorted terms followed by the key
/// term, all joined with the delimiter. Sorting at finalization makes the
/// canonical form independent of the order terms were added in.
///
/// ```
/// use baijiayun_openapi::Md5Signer;
///
/// let mut signer = Md5Signer::new("", "1234567890");
/// signer.add_data("789");
/// signer.add_data("456");
/// signer.add_data("123");
/// assert_eq!(signer.signature(), "35a2035a748fce02684761710f613168");
/// ```
#[derive(Debug, Clone)]
pub struct Md5Signer {
    delimiter: String,
    key_term: String,
    terms: Vec<String>,
}

impl Md5Signer {
    /// Create a signer with the given delimiter and key term.
    ///
    /// The key term is not sorted with the data; it is always the final
    /// element of the string to sign.
    pub fn new(delimiter: impl Into<String>, key_term: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            key_term: key_term.into(),
            terms: Vec::new(),
        }
    }

    /// Add a term to the string to sign.
    pub fn add_data(&mut self, term: impl Into<String>) {
        self.terms.push(term.into());
    }

    /// Compute the signature over the accumulated terms.
    pub fn signature(&self) -> String {
        let mut terms = self.terms.clone();
        terms.sort_unstable();
        terms.push(self.key_term.clone());

        hex_md5(terms.join(&self.delimiter).as_bytes())
    }
}

/// Compute the request signature for a parameter set.
///
/// Each participating field renders as `key=value` (see
/// [`Params::canonical_pairs`]); the key term is
/// `partner_key={partner_key}`, the delimiter is `&`. Deterministic: the
/// same field content and key always produce the same digest, regardless of
/// insertion order.
pub fn compute_signature(params: &Params, partner_key: &str) -> Result<String> {
    let mut signer = Md5Signer::new("&", format!("{PARTNER_KEY_FIELD}={partner_key}"));
    for term in params.canonical_pairs()? {
        signer.add_data(term);
    }

    Ok(signer.signature())
}

#[cfg(test)]
mod tests {
    use super::*;
    use baijiayun_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    // Known-answer vector pinning the sort-join-digest wiring.
    #[test]
    fn test_md5_signer_golden_vector() {
        let mut signer = Md5Signer::new("", "1234567890");
        signer.add_data("789");
        signer.add_data("456");
        signer.add_data("123");

        assert_eq!(signer.signature(), "35a2035a748fce02684761710f613168");
    }

    #[test]
    fn test_compute_signature_golden_vector() {
        // md5("partner_id=7201963&room_id=17110288405286&\
        //      timestamp=1700000000&partner_key=abcdef0123456789")
        let params = Params::new()
            .with("partner_id", "7201963")
            .with("room_id", 17110288405286_i64)
            .with("timestamp", 1700000000);

        assert_eq!(
            compute_signature(&params, "abcdef0123456789").unwrap(),
            "c82e0cef76617108cb122484098a9bd5"
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let params = Params::new().with("a", 1).with("b", 2);

        let first = compute_signature(&params, "K").unwrap();
        let second = compute_signature(&params, "K").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_signature_ignores_insertion_order() {
        let ab = Params::new().with("a", 1).with("b", 2);
        let ba = Params::new().with("b", 2).with("a", 1);

        assert_eq!(
            compute_signature(&ab, "K").unwrap(),
            compute_signature(&ba, "K").unwrap()
        );
    }

    #[test]
    fn test_signature_is_content_sensitive() {
        let params = Params::new().with("a", 1).with("b", 2);
        let tampered = Params::new().with("a", 1).with("b", 3);

        assert_ne!(
            compute_signature(&params, "K").unwrap(),
            compute_signature(&tampered, "K").unwrap()
        );
        assert_ne!(
            compute_signature(&params, "K").unwrap(),
            compute_signature(&params, "other-key").unwrap()
        );
    }

    #[test]
    fn test_excluded_values_do_not_change_signature() {
        let bare = Params::new().with("a", 1);
        let padded = Params::new()
            .with("a", 1)
            .with("empty", "")
            .with("flag", false)
            .with("none", serde_json::Value::Null);

        assert_eq!(
            compute_signature(&bare, "K").unwrap(),
            compute_signature(&padded, "K").unwrap()
        );
    }

    #[test]
    fn test_zero_participates() {
        let with_zero = Params::new().with("a", 1).with("max_users", 0);
        let without = Params::new().with("a", 1);

        assert_ne!(
            compute_signature(&with_zero, "K").unwrap(),
            compute_signature(&without, "K").unwrap()
        );
    }

    #[test]
    fn test_non_scalar_field_fails() {
        let params = Params::new().with("ids", json!({"a": 1}));

        let err = compute_signature(&params, "K").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }
}
