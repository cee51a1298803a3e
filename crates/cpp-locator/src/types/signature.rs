use serde::{Deserialize, Serialize};

use crate::checksum;
use crate::types::{self, TypeDescriptor};

/// One positional parameter of an expected signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureParam {
    pub descriptor: TypeDescriptor,
    /// Whether the parameter is passed by reference. Const relaxation
    /// in the matching funnel applies only to these.
    pub by_reference: bool,
    /// The normalized source form the descriptor was parsed from.
    pub normalized: String,
}

/// Ordered expected parameter signature, as supplied by the host's
/// reflection metadata. Order is significant; parameters are
/// positional, not named.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSignature {
    params: Vec<SignatureParam>,
}

impl ParameterSignature {
    /// Build a signature from raw type strings (`["int32", "const
    /// FString&"]`). Each entry is normalized and parsed; the
    /// by-reference flag falls out of the descriptor.
    pub fn from_raw_types<I, S>(raw_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let params = raw_types
            .into_iter()
            .map(|raw| {
                let normalized = types::normalize(raw.as_ref(), true, true);
                let descriptor = types::parse_descriptor(&normalized);
                let by_reference = descriptor.is_reference;
                SignatureParam {
                    descriptor,
                    by_reference,
                    normalized,
                }
            })
            .collect();
        Self {
            params,
        }
    }

    pub fn params(&self) -> &[SignatureParam] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Stable hash of the normalized parameter list, used in cache
    /// keys.
    pub fn signature_hash(&self) -> u64 {
        let joined = self.params.iter().map(|p| p.normalized.as_str()).collect::<Vec<_>>().join(",");
        checksum::stable_hash64(&joined)
    }
}
