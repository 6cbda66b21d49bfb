use crate::error::{DecodeError, DecodeResult};
use crate::reader::ByteReader;
use arb_types::constants::discriminator;
use arb_types::{BondingCurvePool, ConstantProductPool, Pubkey};

const BONDING_CURVE_MIN_LEN: usize = 73;
const AMM_POOL_MIN_LEN: usize = 211;

/// Default PumpSwap CPMM-mode fee split: 20 bps LP + 5 bps protocol.
pub const DEFAULT_LP_FEE_BPS: u32 = 20;
pub const DEFAULT_PROTOCOL_FEE_BPS: u32 = 5;

pub fn decode_bonding_curve(data: &[u8]) -> DecodeResult<BondingCurvePool> {
    let reader = ByteReader::new(data, "pumpswap_bonding_curve");
    reader.require_len(BONDING_CURVE_MIN_LEN)?;

    let disc = reader.discriminator8()?;
    if disc != discriminator::PUMPSWAP_BONDING_CURVE {
        return Err(DecodeError::WrongDiscriminator { account_type: "pumpswap_bonding_curve" });
    }

    Ok(BondingCurvePool {
        virtual_token_reserves: reader.u64(8)?,
        virtual_sol_reserves: reader.u64(16)?,
        real_token_reserves: reader.u64(24)?,
        real_sol_reserves: reader.u64(32)?,
        creator: reader.pubkey(40)?,
        complete: reader.bool(72)?,
    })
}

/// Base/quote vault pubkeys for a PumpSwap AMM-mode pool. The pool's fee
/// rate is not stored on this account; it comes from the shared
/// `GlobalConfig` referenced elsewhere in the topology.
pub struct PumpswapAmmPoolFields {
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
}

pub fn decode_amm_pool(data: &[u8]) -> DecodeResult<PumpswapAmmPoolFields> {
    let reader = ByteReader::new(data, "pumpswap_amm_pool");
    reader.require_len(AMM_POOL_MIN_LEN)?;

    let disc = reader.discriminator8()?;
    if disc != discriminator::PUMPSWAP_AMM_POOL {
        return Err(DecodeError::WrongDiscriminator { account_type: "pumpswap_amm_pool" });
    }

    Ok(PumpswapAmmPoolFields {
        base_vault: reader.pubkey(139)?,
        quote_vault: reader.pubkey(171)?,
    })
}

pub fn amm_pool_to_constant_product(fields: PumpswapAmmPoolFields) -> ConstantProductPool {
    ConstantProductPool {
        base_vault: fields.base_vault,
        quote_vault: fields.quote_vault,
        lp_fee_bps: DEFAULT_LP_FEE_BPS,
        protocol_fee_bps: DEFAULT_PROTOCOL_FEE_BPS,
        pnl_accrual: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bonding_curve_bytes() -> Vec<u8> {
        let mut data = vec![0u8; BONDING_CURVE_MIN_LEN];
        data[0..8].copy_from_slice(&discriminator::PUMPSWAP_BONDING_CURVE);
        data[8..16].copy_from_slice(&1_000_000u64.to_le_bytes());
        data[16..24].copy_from_slice(&2_000_000u64.to_le_bytes());
        data[24..32].copy_from_slice(&500_000u64.to_le_bytes());
        data[32..40].copy_from_slice(&900_000u64.to_le_bytes());
        data[72] = 0;
        data
    }

    #[test]
    fn decodes_bonding_curve_fields() {
        let data = bonding_curve_bytes();
        let curve = decode_bonding_curve(&data).unwrap();
        assert_eq!(curve.virtual_token_reserves, 1_000_000);
        assert_eq!(curve.virtual_sol_reserves, 2_000_000);
        assert!(!curve.complete);
    }

    #[test]
    fn rejects_wrong_discriminator() {
        let mut data = bonding_curve_bytes();
        data[0] = 0xff;
        assert!(decode_bonding_curve(&data).is_err());
    }
}
