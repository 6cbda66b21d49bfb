use crate::error::{DecodeError, DecodeResult};
use crate::reader::ByteReader;
use arb_types::constants::discriminator;
use arb_types::{ClmmPool, PoolStatus};

pub const EXPECTED_LEN: usize = 1544;

pub fn decode_clmm_pool(data: &[u8]) -> DecodeResult<ClmmPool> {
    let reader = ByteReader::new(data, "raydium_clmm_pool");
    reader.require_len(EXPECTED_LEN)?;

    let disc = reader.discriminator8()?;
    if disc != discriminator::RAYDIUM_CLMM_POOL {
        return Err(DecodeError::WrongDiscriminator { account_type: "raydium_clmm_pool" });
    }

    Ok(ClmmPool {
        amm_config_ref: reader.pubkey(235)?,
        token_mint_0: reader.pubkey(299)?,
        token_mint_1: reader.pubkey(331)?,
        vault_0: reader.pubkey(363)?,
        vault_1: reader.pubkey(395)?,
        sqrt_price_q64: reader.u128(478)?,
        liquidity: reader.u128(462)?,
        tick_current: reader.i32(494)?,
        tick_spacing: reader.u16(460)?,
        mint_decimals_0: reader.u8(233)?,
        mint_decimals_1: reader.u8(234)?,
        status: PoolStatus::from_byte(reader.u8(886)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_types::Q64;

    fn sample_bytes() -> Vec<u8> {
        let mut data = vec![0u8; EXPECTED_LEN];
        data[0..8].copy_from_slice(&discriminator::RAYDIUM_CLMM_POOL);
        data[233] = 6;
        data[234] = 9;
        data[460..462].copy_from_slice(&60u16.to_le_bytes());
        data[462..478].copy_from_slice(&1_000_000u128.to_le_bytes());
        data[478..494].copy_from_slice(&Q64.to_le_bytes());
        data[494..498].copy_from_slice(&0i32.to_le_bytes());
        data[886] = 0;
        data
    }

    #[test]
    fn decodes_pool_fields() {
        let pool = decode_clmm_pool(&sample_bytes()).unwrap();
        assert_eq!(pool.mint_decimals_0, 6);
        assert_eq!(pool.mint_decimals_1, 9);
        assert_eq!(pool.tick_spacing, 60);
        assert_eq!(pool.liquidity, 1_000_000);
        assert_eq!(pool.sqrt_price_q64, Q64);
        assert!(pool.status.is_active());
    }

    #[test]
    fn rejects_wrong_discriminator() {
        let mut data = sample_bytes();
        data[0] = 0;
        assert!(decode_clmm_pool(&data).is_err());
    }
}
