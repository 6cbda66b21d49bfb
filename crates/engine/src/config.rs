//! Typed configuration tree: TOML file layered with `ARB_`-prefixed
//! environment overrides, validated before the engine starts.

use arb_types::constants::defaults;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("configuration failed validation: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PendingQueueSettings {
    #[validate(range(min = 1))]
    pub max_size: usize,
    #[validate(range(min = 1))]
    pub expiration_slots: u64,
    #[validate(range(min = 1))]
    pub expiration_ms: i64,
}

impl Default for PendingQueueSettings {
    fn default() -> Self {
        Self {
            max_size: defaults::PENDING_QUEUE_MAX_SIZE,
            expiration_slots: defaults::PENDING_EXPIRATION_SLOTS,
            expiration_ms: defaults::PENDING_EXPIRATION_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitterSettings {
    #[validate(range(min = 0, max = 10))]
    pub max_retries: u32,
    #[validate(range(min = 1))]
    pub attempt_timeout_ms: u64,
}

impl Default for SubmitterSettings {
    fn default() -> Self {
        Self { max_retries: defaults::SUBMITTER_MAX_RETRIES, attempt_timeout_ms: defaults::SUBMITTER_ATTEMPT_TIMEOUT_MS }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SpreadScanSettings {
    #[validate(range(min = 1))]
    pub cooldown_ms: i64,
}

impl Default for SpreadScanSettings {
    fn default() -> Self {
        Self { cooldown_ms: defaults::SPREAD_SCAN_COOLDOWN_MS }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MonitoringSettings {
    pub metrics_bind_address: String,
    pub log_level: String,
}

impl Default for MonitoringSettings {
    fn default() -> Self {
        Self { metrics_bind_address: "127.0.0.1:9090".to_string(), log_level: "info".to_string() }
    }
}

/// Base58 program ids the dispatcher routes on. Placeholder values here are
/// never valid mainnet addresses; an operator must override every field.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProgramOwnerSettings {
    pub spl_token: String,
    pub pumpswap: String,
    pub raydium_v4: String,
    pub raydium_clmm: String,
    pub meteora_dlmm: String,
}

impl Default for ProgramOwnerSettings {
    fn default() -> Self {
        let placeholder = bs58::encode([0u8; 32]).into_string();
        Self {
            spl_token: placeholder.clone(),
            pumpswap: placeholder.clone(),
            raydium_v4: placeholder.clone(),
            raydium_clmm: placeholder.clone(),
            meteora_dlmm: placeholder,
        }
    }
}

impl ProgramOwnerSettings {
    pub fn to_program_owners(&self) -> Result<arb_decode::dispatch::ProgramOwners, String> {
        let parse = |label: &str, value: &str| -> Result<arb_types::Pubkey, String> {
            let bytes = bs58::decode(value).into_vec().map_err(|e| format!("{label}: {e}"))?;
            arb_types::Pubkey::from_slice(&bytes).ok_or_else(|| format!("{label}: not 32 bytes"))
        };
        Ok(arb_decode::dispatch::ProgramOwners {
            spl_token: parse("spl_token", &self.spl_token)?,
            pumpswap: parse("pumpswap", &self.pumpswap)?,
            raydium_v4: parse("raydium_v4", &self.raydium_v4)?,
            raydium_clmm: parse("raydium_clmm", &self.raydium_clmm)?,
            meteora_dlmm: parse("meteora_dlmm", &self.meteora_dlmm)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EngineConfig {
    #[validate(range(max = 10_000))]
    pub min_candidate_spread_bps: u32,
    pub min_profit_lamports: u64,
    #[validate(range(max = 10_000))]
    pub slippage_bps: u32,
    pub tip_lamports: u64,
    pub compute_unit_limit: u32,
    pub compute_unit_price: u64,
    #[validate(length(min = 1))]
    pub candidate_sizes_lamports: Vec<u64>,
    pub dry_run: bool,

    #[validate]
    pub pending_queue: PendingQueueSettings,
    #[validate]
    pub submitter: SubmitterSettings,
    #[validate]
    pub spread_scan: SpreadScanSettings,
    #[validate]
    pub monitoring: MonitoringSettings,
    #[validate]
    pub program_owners: ProgramOwnerSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_candidate_spread_bps: defaults::MIN_CANDIDATE_SPREAD_BPS,
            min_profit_lamports: defaults::MIN_PROFIT_LAMPORTS,
            slippage_bps: defaults::SLIPPAGE_BPS,
            tip_lamports: 10_000,
            compute_unit_limit: 200_000,
            compute_unit_price: 1,
            candidate_sizes_lamports: defaults::CANDIDATE_SIZES_LAMPORTS.to_vec(),
            dry_run: false,
            pending_queue: PendingQueueSettings::default(),
            submitter: SubmitterSettings::default(),
            spread_scan: SpreadScanSettings::default(),
            monitoring: MonitoringSettings::default(),
            program_owners: ProgramOwnerSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Layers a TOML file (if present) under `ARB_`-prefixed environment
    /// overrides, falling back to defaults for anything neither supplies.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let defaults = EngineConfig::default();
        let defaults_json = serde_json::to_string(&defaults).expect("default config always serializes");

        let built = config::Config::builder()
            .add_source(config::File::from_str(&defaults_json, config::FileFormat::Json))
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("ARB").separator("__"))
            .build()?;

        let parsed: EngineConfig = built.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }
}
