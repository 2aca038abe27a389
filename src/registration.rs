//! `.cel` second-level domain names and their ADR-036 sign docs

use crate::types::SecondaryAddress;
use crate::wallet::{AminoMsg, StdFee, StdSignDoc};
use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::json;
use std::fmt;

/// Top-level domain every Mycel second-level name lives under
pub const TOP_LEVEL_DOMAIN: &str = "cel";

pub const MAX_NAME_LEN: usize = 64;

/// Amino type of an ADR-036 arbitrary message
pub const MSG_SIGN_DATA_TYPE: &str = "sign/MsgSignData";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName {
    name: String,
}

impl DomainName {
    /// Validate a second-level name; a trailing `.cel` is accepted
    pub fn parse(input: &str, force_lowercase: bool) -> Result<Self> {
        let input = input.trim();
        let name = input
            .strip_suffix(TOP_LEVEL_DOMAIN)
            .and_then(|rest| rest.strip_suffix('.'))
            .unwrap_or(input);

        if name.is_empty() {
            return Err(Error::InvalidArgument("Name can't be empty".to_string()));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(Error::InvalidArgument(format!(
                "Name can't be longer than {MAX_NAME_LEN} characters"
            )));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidArgument(
                "Only alphanumeric characters are allowed".to_string(),
            ));
        }

        let name = if force_lowercase {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        };
        Ok(Self { name })
    }

    /// Second-level label without the top-level domain
    pub fn name(&self) -> &str {
        &self.name
    }

    /// ADR-036 sign doc proving `signer` owns the request for this name
    pub fn sign_doc(&self, signer: &SecondaryAddress) -> StdSignDoc {
        StdSignDoc {
            chain_id: String::new(),
            account_number: "0".to_string(),
            sequence: "0".to_string(),
            fee: StdFee {
                amount: vec![],
                gas: "0".to_string(),
            },
            msgs: vec![AminoMsg {
                msg_type: MSG_SIGN_DATA_TYPE.to_string(),
                value: json!({
                    "signer": signer.as_str(),
                    "data": BASE64.encode(self.to_string()),
                }),
            }],
            memo: String::new(),
        }
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, TOP_LEVEL_DOMAIN)
    }
}
