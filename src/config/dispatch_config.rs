//! config/dispatch_config.rs
//! Parámetros del despacho por lotes (tamaño de lote y pausa entre lotes).

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub batch_size: usize,
    pub batch_delay_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            batch_delay_ms: 1000,
        }
    }
}

impl DispatchConfig {
    /// Lee CAMPAIGN_BATCH_SIZE / CAMPAIGN_BATCH_DELAY_MS del entorno,
    /// con defaults si faltan o no parsean.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CAMPAIGN_BATCH_SIZE") {
            if let Ok(n) = v.parse::<usize>() {
                if n > 0 {
                    cfg.batch_size = n;
                }
            }
        }
        if let Ok(v) = std::env::var("CAMPAIGN_BATCH_DELAY_MS") {
            if let Ok(n) = v.parse::<u64>() {
                cfg.batch_delay_ms = n;
            }
        }

        cfg
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}
