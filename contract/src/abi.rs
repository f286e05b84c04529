//! Minimal Solidity ABI codec for the ticket contract.
//!
//! Only static 32-byte words are encoded. Decoding covers `address`, `bool`
//! and the `Error(string)` revert payload.

use tixgate_crypto::function_selector;
use tixgate_types::{Address, TokenId};

use crate::error::ContractError;

pub const OWNER_SIGNATURE: &str = "owner()";
pub const TICKET_EXPIRED_SIGNATURE: &str = "ticketExpired(uint256)";
pub const SET_TICKET_EXPIRED_SIGNATURE: &str = "setTicketExpired(uint256)";

/// Signature of the standard revert payload produced by `require(cond, "msg")`.
const ERROR_STRING_SIGNATURE: &str = "Error(string)";

const WORD: usize = 32;

/// Selector followed by each argument word.
pub fn encode_call(signature: &str, args: &[[u8; WORD]]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + args.len() * WORD);
    data.extend_from_slice(&function_selector(signature));
    for arg in args {
        data.extend_from_slice(arg);
    }
    data
}

pub fn encode_owner() -> Vec<u8> {
    encode_call(OWNER_SIGNATURE, &[])
}

pub fn encode_ticket_expired(token_id: &TokenId) -> Vec<u8> {
    encode_call(TICKET_EXPIRED_SIGNATURE, &[token_id.to_be_bytes()])
}

pub fn encode_set_ticket_expired(token_id: &TokenId) -> Vec<u8> {
    encode_call(SET_TICKET_EXPIRED_SIGNATURE, &[token_id.to_be_bytes()])
}

fn first_word(ret: &[u8]) -> Result<&[u8], ContractError> {
    ret.get(..WORD).ok_or_else(|| {
        ContractError::Decode(format!("expected at least {WORD} bytes, got {}", ret.len()))
    })
}

/// Decode an `address` return value (right-aligned in the first word).
pub fn decode_address(ret: &[u8]) -> Result<Address, ContractError> {
    let word = first_word(ret)?;
    if word[..12].iter().any(|&b| b != 0) {
        return Err(ContractError::Decode(
            "address word has non-zero high bytes".into(),
        ));
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Ok(Address::new(bytes))
}

/// Decode a `bool` return value. Anything other than 0 or 1 is rejected.
pub fn decode_bool(ret: &[u8]) -> Result<bool, ContractError> {
    let word = first_word(ret)?;
    if word[..WORD - 1].iter().any(|&b| b != 0) {
        return Err(ContractError::Decode("bool word out of range".into()));
    }
    match word[WORD - 1] {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(ContractError::Decode(format!("bool word out of range: {other}"))),
    }
}

/// Extract the message from an `Error(string)` revert payload.
///
/// Returns `None` for custom errors, panics (`Panic(uint256)`) and
/// malformed data.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    let (selector, body) = (data.get(..4)?, data.get(4..)?);
    if selector != function_selector(ERROR_STRING_SIGNATURE) {
        return None;
    }
    let offset = word_as_usize(body.get(..WORD)?)?;
    let len_start = offset.checked_add(WORD)?;
    let len = word_as_usize(body.get(offset..len_start)?)?;
    let bytes = body.get(len_start..len_start.checked_add(len)?)?;
    String::from_utf8(bytes.to_vec()).ok()
}

fn word_as_usize(word: &[u8]) -> Option<usize> {
    if word[..WORD - 8].iter().any(|&b| b != 0) {
        return None;
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(tail)).ok()
}

/// `0x`-prefixed lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode `0x`-prefixed hex as returned by the node. `"0x"` is empty data.
pub fn from_hex(s: &str) -> Result<Vec<u8>, ContractError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| ContractError::Decode(format!("hex data missing 0x prefix: {s}")))?;
    hex::decode(digits).map_err(|e| ContractError::Decode(format!("bad hex data: {e}")))
}

/// Parse a `0x`-prefixed hex quantity (block numbers, status flags).
pub fn parse_quantity(s: &str) -> Result<u64, ContractError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| ContractError::Decode(format!("quantity missing 0x prefix: {s}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| ContractError::Decode(format!("bad quantity {s}: {e}")))
}

#[cfg(test)]
pub(crate) fn encode_revert_reason(reason: &str) -> Vec<u8> {
    let mut data = function_selector(ERROR_STRING_SIGNATURE).to_vec();
    let mut offset = [0u8; WORD];
    offset[WORD - 1] = 0x20;
    data.extend_from_slice(&offset);
    let mut len = [0u8; WORD];
    len[WORD - 8..].copy_from_slice(&(reason.len() as u64).to_be_bytes());
    data.extend_from_slice(&len);
    data.extend_from_slice(reason.as_bytes());
    let padding = (WORD - reason.len() % WORD) % WORD;
    data.extend(std::iter::repeat(0u8).take(padding));
    data
}
