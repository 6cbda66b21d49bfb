//! Explicit `(owner program, data length, discriminator)` dispatch table,
//! built once at startup from the configured program ids. No runtime type
//! reflection: every branch is a concrete length/discriminator check.

use crate::error::{DecodeError, DecodeResult};
use crate::venues::{meteora_dlmm, pumpswap, raydium_clmm, raydium_v4};
use arb_types::{constants::discriminator, AmmConfig, BondingCurvePool, ConstantProductPool, DlmmPool, Pool, Pubkey};

/// Program ids the dispatcher routes on. Supplied by configuration; this
/// crate never hardcodes a mainnet address.
#[derive(Debug, Clone, Copy)]
pub struct ProgramOwners {
    pub spl_token: Pubkey,
    pub pumpswap: Pubkey,
    pub raydium_v4: Pubkey,
    pub raydium_clmm: Pubkey,
    pub meteora_dlmm: Pubkey,
}

#[derive(Debug, Clone)]
pub enum DecodedAccount {
    TokenVaultAmount(u64),
    Pool(Pool),
    AmmConfig(AmmConfig),
}

pub struct Dispatcher {
    owners: ProgramOwners,
}

impl Dispatcher {
    pub fn new(owners: ProgramOwners) -> Self {
        Self { owners }
    }

    /// Routes by owner program first, then by length/discriminator within
    /// that program's known account shapes.
    pub fn decode(&self, owner: Pubkey, data: &[u8]) -> DecodeResult<DecodedAccount> {
        if owner == self.owners.spl_token {
            return crate::spl_token::decode_token_amount(data).map(DecodedAccount::TokenVaultAmount);
        }

        if owner == self.owners.pumpswap {
            return self.decode_pumpswap(data);
        }

        if owner == self.owners.raydium_v4 {
            if data.len() == raydium_v4::EXPECTED_LEN {
                let fields = raydium_v4::decode_amm_info(data)?;
                let fee_bps = arb_math_fee_bps(fields.swap_fee_numerator, fields.swap_fee_denominator);
                return Ok(DecodedAccount::Pool(Pool::ConstantProduct(ConstantProductPool {
                    base_vault: fields.coin_vault,
                    quote_vault: fields.pc_vault,
                    lp_fee_bps: fee_bps,
                    protocol_fee_bps: 0,
                    pnl_accrual: Some(arb_types::PnlAccrual {
                        base: fields.need_take_pnl_coin,
                        quote: fields.need_take_pnl_pc,
                    }),
                })));
            }
            return Err(DecodeError::NoDispatchEntry { owner: owner.to_string(), length: data.len() });
        }

        if owner == self.owners.raydium_clmm {
            let pool = raydium_clmm::decode_clmm_pool(data)?;
            return Ok(DecodedAccount::Pool(Pool::Clmm(pool)));
        }

        if owner == self.owners.meteora_dlmm {
            return self.decode_meteora(data);
        }

        Err(DecodeError::NoDispatchEntry { owner: owner.to_string(), length: data.len() })
    }

    fn decode_pumpswap(&self, data: &[u8]) -> DecodeResult<DecodedAccount> {
        if data.len() < 8 {
            return Err(DecodeError::TooShort { account_type: "pumpswap", actual: data.len(), minimum: 8 });
        }
        let disc: [u8; 8] = data[0..8].try_into().unwrap();
        match (disc, data.len()) {
            (d, len) if d == discriminator::PUMPSWAP_BONDING_CURVE && len >= 73 && len < 211 => {
                let curve: BondingCurvePool = pumpswap::decode_bonding_curve(data)?;
                Ok(DecodedAccount::Pool(Pool::BondingCurve(curve)))
            }
            (d, len) if d == discriminator::PUMPSWAP_AMM_POOL && len >= 211 => {
                let fields = pumpswap::decode_amm_pool(data)?;
                Ok(DecodedAccount::Pool(Pool::ConstantProduct(pumpswap::amm_pool_to_constant_product(fields))))
            }
            _ => Err(DecodeError::NoDispatchEntry {
                owner: "pumpswap".to_string(),
                length: data.len(),
            }),
        }
    }

    fn decode_meteora(&self, data: &[u8]) -> DecodeResult<DecodedAccount> {
        if data.len() >= meteora_dlmm::BIN_ARRAY_MIN_LEN {
            // BinArrays are routed through `decode_bin_array` directly by the
            // cache layer (they need the owning lb_pair pubkey); reject here.
            return Err(DecodeError::NoDispatchEntry {
                owner: "meteora_dlmm_bin_array_routed_separately".to_string(),
                length: data.len(),
            });
        }
        let pool: DlmmPool = meteora_dlmm::decode_lb_pair(data)?;
        Ok(DecodedAccount::Pool(Pool::Dlmm(pool)))
    }
}

fn arb_math_fee_bps(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    ((numerator as u128 * 10_000) / denominator as u128).min(10_000) as u32
}
