//! Legacy/versioned transaction message parser. Only static account keys
//! and instructions are recovered; address-table lookups are resolved
//! externally (the engine's `IngestSource` surfaces already-resolved keys
//! for versioned messages it forwards).

use crate::error::{DecodeError, DecodeResult};
use arb_types::Pubkey;

#[derive(Debug, Clone)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct LegacyMessage {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        let end = self.pos + n;
        let s = self.data.get(self.pos..end).ok_or_else(|| DecodeError::MalformedMessage {
            reason: format!("expected {} bytes at offset {}, only {} remain", n, self.pos, self.data.len() - self.pos.min(self.data.len())),
        })?;
        self.pos = end;
        Ok(s)
    }

    fn byte(&mut self) -> DecodeResult<u8> {
        Ok(self.take(1)?[0])
    }

    /// Solana's "compact-u16": a base-128 varint, up to 3 bytes.
    fn compact_u16(&mut self) -> DecodeResult<u16> {
        let mut result: u32 = 0;
        let mut shift = 0;
        for _ in 0..3 {
            let byte = self.byte()?;
            result |= ((byte & 0x7f) as u32) << shift;
            if byte & 0x80 == 0 {
                return Ok(result as u16);
            }
            shift += 7;
        }
        Err(DecodeError::MalformedMessage { reason: "compact-u16 exceeded 3 bytes".to_string() })
    }

    fn pubkey(&mut self) -> DecodeResult<Pubkey> {
        let s = self.take(32)?;
        Ok(Pubkey::from_slice(s).expect("length checked by take(32)"))
    }
}

pub fn parse_legacy_message(data: &[u8]) -> DecodeResult<LegacyMessage> {
    let mut cursor = Cursor::new(data);

    let header = MessageHeader {
        num_required_signatures: cursor.byte()?,
        num_readonly_signed_accounts: cursor.byte()?,
        num_readonly_unsigned_accounts: cursor.byte()?,
    };

    let key_count = cursor.compact_u16()? as usize;
    let mut account_keys = Vec::with_capacity(key_count);
    for _ in 0..key_count {
        account_keys.push(cursor.pubkey()?);
    }

    let blockhash_slice = cursor.take(32)?;
    let mut recent_blockhash = [0u8; 32];
    recent_blockhash.copy_from_slice(blockhash_slice);

    let instruction_count = cursor.compact_u16()? as usize;
    let mut instructions = Vec::with_capacity(instruction_count);
    for _ in 0..instruction_count {
        let program_id_index = cursor.byte()?;
        let account_count = cursor.compact_u16()? as usize;
        let accounts = cursor.take(account_count)?.to_vec();
        let data_len = cursor.compact_u16()? as usize;
        let ix_data = cursor.take(data_len)?.to_vec();
        instructions.push(CompiledInstruction {
            program_id_index,
            accounts,
            data: ix_data,
        });
    }

    Ok(LegacyMessage {
        header,
        account_keys,
        recent_blockhash,
        instructions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact_u16_bytes(value: u16) -> Vec<u8> {
        let mut v = value as u32;
        let mut out = Vec::new();
        loop {
            let mut byte = (v & 0x7f) as u8;
            v >>= 7;
            if v != 0 {
                byte |= 0x80;
            }
            out.push(byte);
            if v == 0 {
                break;
            }
        }
        out
    }

    fn build_message(num_keys: u8, num_instructions: u8) -> Vec<u8> {
        let mut data = vec![1, 0, num_keys - 1];
        data.extend(compact_u16_bytes(num_keys as u16));
        for i in 0..num_keys {
            data.extend(std::iter::repeat(i).take(32));
        }
        data.extend(std::iter::repeat(0xabu8).take(32)); // recent blockhash
        data.extend(compact_u16_bytes(num_instructions as u16));
        for _ in 0..num_instructions {
            data.push(0); // program_id_index
            data.extend(compact_u16_bytes(1));
            data.push(1); // one account index
            data.extend(compact_u16_bytes(2));
            data.extend([0xde, 0xad]);
        }
        data
    }

    #[test]
    fn parses_header_keys_and_instructions() {
        let data = build_message(2, 1);
        let message = parse_legacy_message(&data).unwrap();
        assert_eq!(message.account_keys.len(), 2);
        assert_eq!(message.instructions.len(), 1);
        assert_eq!(message.instructions[0].data, vec![0xde, 0xad]);
    }

    #[test]
    fn truncated_message_errors_instead_of_panicking() {
        let data = vec![1, 0, 0, 1];
        assert!(parse_legacy_message(&data).is_err());
    }
}
