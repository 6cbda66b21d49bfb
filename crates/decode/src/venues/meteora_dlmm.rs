use crate::error::{DecodeError, DecodeResult};
use crate::reader::ByteReader;
use arb_types::constants::discriminator;
use arb_types::{Bin, BinArray, DlmmPool, Pubkey, PoolStatus};

pub const LB_PAIR_MIN_LEN: usize = 904;
pub const BIN_ARRAY_MIN_LEN: usize = 10_136;
const BIN_ARRAY_BINS_START: usize = 48;
const BIN_SIZE: usize = 32;

pub fn decode_lb_pair(data: &[u8]) -> DecodeResult<DlmmPool> {
    let reader = ByteReader::new(data, "meteora_dlmm_lb_pair");
    reader.require_len(LB_PAIR_MIN_LEN)?;

    let disc = reader.discriminator8()?;
    if disc == discriminator::METEORA_DLMM_BIN_ARRAY {
        return Err(DecodeError::WrongDiscriminator { account_type: "meteora_dlmm_lb_pair" });
    }
    if disc != discriminator::METEORA_DLMM_LB_PAIR {
        return Err(DecodeError::WrongDiscriminator { account_type: "meteora_dlmm_lb_pair" });
    }

    Ok(DlmmPool {
        base_factor: reader.u16(8)?,
        variable_fee_control: reader.u32(16)?,
        volatility_accumulator: reader.u32(72)?,
        max_volatility_accumulator: reader.u32(20)?,
        active_id: reader.i32(76)?,
        bin_step: reader.u16(80)?,
        base_fee_power_factor: reader.u8(81)?,
        token_x_mint: reader.pubkey(88)?,
        token_y_mint: reader.pubkey(120)?,
        reserve_x: reader.pubkey(152)?,
        reserve_y: reader.pubkey(184)?,
        status: PoolStatus::from_byte(reader.u8(82)?),
    })
}

pub fn decode_bin_array(lb_pair: Pubkey, data: &[u8], bins_per_array: usize) -> DecodeResult<BinArray> {
    let reader = ByteReader::new(data, "meteora_dlmm_bin_array");
    reader.require_len(BIN_ARRAY_MIN_LEN)?;

    let disc = reader.discriminator8()?;
    if disc != discriminator::METEORA_DLMM_BIN_ARRAY {
        return Err(DecodeError::WrongDiscriminator { account_type: "meteora_dlmm_bin_array" });
    }

    let index = reader.i64(40)?;
    let mut bins = Vec::with_capacity(bins_per_array);
    for i in 0..bins_per_array {
        let base = BIN_ARRAY_BINS_START + i * BIN_SIZE;
        bins.push(Bin {
            amount_x: reader.u128(base)?,
            amount_y: reader.u128(base + 16)?,
        });
    }

    Ok(BinArray {
        lb_pair,
        index,
        bins,
        version: arb_types::Version::new(0, 0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lb_pair_bytes() -> Vec<u8> {
        let mut data = vec![0u8; LB_PAIR_MIN_LEN];
        data[0..8].copy_from_slice(&discriminator::METEORA_DLMM_LB_PAIR);
        data[8..10].copy_from_slice(&50u16.to_le_bytes());
        data[80..82].copy_from_slice(&25u16.to_le_bytes());
        data[76..80].copy_from_slice(&100i32.to_le_bytes());
        data
    }

    #[test]
    fn decodes_lb_pair_fields() {
        let pool = decode_lb_pair(&lb_pair_bytes()).unwrap();
        assert_eq!(pool.base_factor, 50);
        assert_eq!(pool.bin_step, 25);
        assert_eq!(pool.active_id, 100);
    }

    #[test]
    fn rejects_bin_array_discriminator_at_lb_pair_decoder() {
        let mut data = lb_pair_bytes();
        data[0..8].copy_from_slice(&discriminator::METEORA_DLMM_BIN_ARRAY);
        assert!(decode_lb_pair(&data).is_err());
    }

    #[test]
    fn decodes_bin_array_entries() {
        let mut data = vec![0u8; BIN_ARRAY_MIN_LEN];
        data[0..8].copy_from_slice(&discriminator::METEORA_DLMM_BIN_ARRAY);
        data[40..48].copy_from_slice(&3i64.to_le_bytes());
        data[48..64].copy_from_slice(&500u128.to_le_bytes());
        data[64..80].copy_from_slice(&700u128.to_le_bytes());

        let arr = decode_bin_array(Pubkey::ZERO, &data, 70).unwrap();
        assert_eq!(arr.index, 3);
        assert_eq!(arr.bins[0].amount_x, 500);
        assert_eq!(arr.bins[0].amount_y, 700);
        assert_eq!(arr.bins.len(), 70);
    }
}
