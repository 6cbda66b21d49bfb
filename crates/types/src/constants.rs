//! Fixed-point bases, venue bounds, and discriminators.
//!
//! Discriminator constants are fixed per venue (see the engine's external
//! interface contract) and are consumed by `arb-decode`'s dispatch table.

/// Q64.64 fixed-point unit (2^64), used by CLMM sqrt-price and DLMM bin price.
pub const Q64: u128 = 1u128 << 64;

/// Minimum valid CLMM sqrt-price (Q64.64), mirrors Uniswap V3 / Raydium CLMM bounds.
pub const MIN_SQRT_PRICE_X64: u128 = 4_295_048_016;

/// Maximum valid CLMM sqrt-price (Q64.64).
pub const MAX_SQRT_PRICE_X64: u128 = 79_226_673_521_066_979_257_578_248_091;

/// Minimum valid CLMM tick.
pub const MIN_TICK: i32 = -443_636;

/// Maximum valid CLMM tick.
pub const MAX_TICK: i32 = 443_636;

/// Number of ticks stored per `TickArray`.
pub const TICKS_PER_ARRAY: usize = 60;

/// Number of bins stored per `BinArray`.
pub const BINS_PER_ARRAY: usize = 70;

/// DLMM bin-step validity upper bound (basis points of the geometric step).
pub const MAX_BIN_STEP: u16 = 500;

/// DLMM `|active_id|` validity gate.
pub const MAX_ACTIVE_ID_MAGNITUDE: i32 = 50_000;

/// Hard iteration cap for the CLMM tick-crossing loop.
pub const CLMM_MAX_ITERATIONS: u32 = 100;

/// Hard iteration cap for the DLMM bin walk.
pub const DLMM_MAX_BIN_WALK: u32 = 1_000;

/// Fee-rate cap for DLMM dynamic fee, 1e9 precision (10%).
pub const DLMM_MAX_FEE_RATE_1E9: u64 = 100_000_000;

/// DLMM dynamic-fee precision denominator.
pub const DLMM_FEE_PRECISION: u64 = 1_000_000_000;

/// Decoder discriminators (8-byte prefixes), per §6 of the spec.
pub mod discriminator {
    pub const PUMPSWAP_BONDING_CURVE: [u8; 8] = [0xf1, 0x9a, 0x6d, 0x04, 0x11, 0xb1, 0x6d, 0xbc];
    pub const PUMPSWAP_AMM_POOL: [u8; 8] = [0xF1, 0x9A, 0x6D, 0x04, 0x11, 0xB1, 0x6D, 0xBC];
    pub const RAYDIUM_CLMM_POOL: [u8; 8] = [0xf7, 0xed, 0xe3, 0xf5, 0xd7, 0xc3, 0xde, 0x46];
    pub const METEORA_DLMM_LB_PAIR: [u8; 8] = [0x21, 0x0b, 0x31, 0x62, 0xb5, 0x65, 0xb1, 0x0d];
    pub const METEORA_DLMM_BIN_ARRAY: [u8; 8] = [0x5c, 0x8e, 0x5c, 0xdc, 0x05, 0x94, 0x46, 0xb5];
}

/// SPL-token account layout constants.
pub mod spl_token {
    pub const AMOUNT_OFFSET: usize = 64;
    pub const MIN_LEN: usize = 165;
}

/// Default operational parameters (§6 "Configuration").
pub mod defaults {
    pub const MIN_CANDIDATE_SPREAD_BPS: u32 = 55;
    pub const MIN_PROFIT_LAMPORTS: u64 = 0;
    pub const SLIPPAGE_BPS: u32 = 50;
    pub const CANDIDATE_SIZES_LAMPORTS: [u64; 6] = [
        10_000_000,    // 0.01 SOL
        50_000_000,    // 0.05 SOL
        100_000_000,   // 0.1 SOL
        250_000_000,   // 0.25 SOL
        500_000_000,   // 0.5 SOL
        1_000_000_000, // 1.0 SOL
    ];
    pub const PENDING_QUEUE_MAX_SIZE: usize = 10_000;
    pub const PENDING_EXPIRATION_SLOTS: u64 = 150;
    pub const PENDING_EXPIRATION_MS: i64 = 60_000;
    pub const SUBMITTER_MAX_RETRIES: u32 = 3;
    pub const SUBMITTER_ATTEMPT_TIMEOUT_MS: u64 = 5_000;
    pub const SPREAD_SCAN_COOLDOWN_MS: i64 = 3_000;
    pub const SPREAD_SANITY_CAP_BPS: u64 = 10_000;
}
