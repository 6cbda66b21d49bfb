use crate::error::DecodeResult;
use crate::reader::ByteReader;
use arb_types::constants::spl_token;

/// `amount: u64 LE @ offset 64`, minimum account length 165.
pub fn decode_token_amount(data: &[u8]) -> DecodeResult<u64> {
    let reader = ByteReader::new(data, "spl_token_account");
    reader.require_len(spl_token::MIN_LEN)?;
    reader.u64(spl_token::AMOUNT_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_amount_at_offset_64() {
        let mut data = vec![0u8; spl_token::MIN_LEN];
        data[64..72].copy_from_slice(&1_234_567u64.to_le_bytes());
        assert_eq!(decode_token_amount(&data).unwrap(), 1_234_567);
    }

    #[test]
    fn rejects_short_accounts() {
        let data = vec![0u8; 10];
        assert!(decode_token_amount(&data).is_err());
    }
}
