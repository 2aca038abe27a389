//! Sign documents for the two Cosmos signing modes
//!
//! - Direct mode signs the protobuf encoding of a cosmrs [`SignDoc`].
//! - Amino mode signs the canonical JSON encoding of [`StdSignDoc`].

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `cosmos.tx.v1beta1.SignDoc`, encoded with `into_bytes`
pub use cosmrs::tx::SignDoc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AminoMsg {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub value: Value,
}

/// Legacy amino `StdSignDoc`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdSignDoc {
    pub chain_id: String,
    pub account_number: String,
    pub sequence: String,
    pub fee: StdFee,
    pub msgs: Vec<AminoMsg>,
    pub memo: String,
}

impl StdSignDoc {
    /// Sorted-key compact JSON with `&`, `<`, `>` escaped, as amino expects
    pub fn to_canonical_json(&self) -> Result<String> {
        // serde_json keeps insertion order if another crate enables preserve_order
        let value = sort_keys(serde_json::to_value(self)?);
        let json = serde_json::to_string(&value)?;
        Ok(json
            .replace('&', "\\u0026")
            .replace('<', "\\u003c")
            .replace('>', "\\u003e"))
    }
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    /// Base64 compressed secp256k1 key
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: PubKey,
    /// Base64 `r || s`
    pub signature: String,
}

#[derive(Debug, Clone)]
pub struct DirectSignResponse {
    pub signed: SignDoc,
    pub signature: StdSignature,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AminoSignResponse {
    pub signed: StdSignDoc,
    pub signature: StdSignature,
}
