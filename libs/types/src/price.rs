//! Fixed-point price codec
//!
//! The order book works on unsigned 32-bit integer prices; market data
//! arrives as display-unit doubles. A [`PriceConverter`] maps between the
//! two with a per-symbol scale factor: scale 100 means two decimal places
//! (cents), scale 1e8 covers sub-cent assets. Internal price 0 is reserved
//! for "absent".

use std::collections::HashMap;

/// Integer price used inside the order book. 0 means "no price".
pub type InternalPrice = u32;

/// Converts between display-unit doubles and internal integer prices.
///
/// The round trip `to_external(to_internal(x)) == x` is exact whenever
/// `x × scale` is integer-representable and within `u32` range.
#[derive(Debug, Clone, Copy)]
pub struct PriceConverter {
    scale_factor: f64,
    inv_scale: f64,
}

impl PriceConverter {
    /// Create a converter with the given scale factor.
    pub fn new(scale_factor: f64) -> Self {
        Self {
            scale_factor,
            inv_scale: 1.0 / scale_factor,
        }
    }

    /// Scale a display price to its internal representation.
    ///
    /// Saturates: negative or non-finite inputs map to 0, values beyond
    /// `u32::MAX × scale` map to `u32::MAX`.
    pub fn to_internal(&self, external_price: f64) -> InternalPrice {
        let scaled = (external_price * self.scale_factor).round();
        if !scaled.is_finite() || scaled <= 0.0 {
            return 0;
        }
        if scaled >= u32::MAX as f64 {
            return u32::MAX;
        }
        scaled as InternalPrice
    }

    /// Scale an internal price back to display units.
    pub fn to_external(&self, internal_price: InternalPrice) -> f64 {
        internal_price as f64 * self.inv_scale
    }

    /// The configured scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

impl Default for PriceConverter {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Per-symbol registry of price converters.
///
/// Symbols without an explicit entry fall back to the default converter.
#[derive(Debug, Clone)]
pub struct PriceConverterRegistry {
    default: PriceConverter,
    converters: HashMap<String, PriceConverter>,
}

impl PriceConverterRegistry {
    /// Create a registry with the given default scale.
    pub fn new(default_scale: f64) -> Self {
        Self {
            default: PriceConverter::new(default_scale),
            converters: HashMap::new(),
        }
    }

    /// Set or replace the scale for one symbol.
    pub fn set_scale(&mut self, symbol: &str, scale: f64) {
        self.converters
            .insert(symbol.to_string(), PriceConverter::new(scale));
    }

    /// Look up the converter for a symbol.
    pub fn get(&self, symbol: &str) -> &PriceConverter {
        self.converters.get(symbol).unwrap_or(&self.default)
    }
}

impl Default for PriceConverterRegistry {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_cents() {
        let pc = PriceConverter::new(100.0);
        for price in [43105.50, 0.01, 99999.99, 1.00] {
            let internal = pc.to_internal(price);
            assert_eq!(pc.to_external(internal), price);
        }
    }

    #[test]
    fn test_round_trip_high_precision() {
        // Small-value assets (e.g. SHIB at $0.00001234) need scale 1e8.
        let pc = PriceConverter::new(1e8);
        let price = 0.00001234;
        let internal = pc.to_internal(price);
        assert!((pc.to_external(internal) - price).abs() < 1e-8);
    }

    #[test]
    fn test_zero_price() {
        let pc = PriceConverter::new(100.0);
        assert_eq!(pc.to_internal(0.0), 0);
        assert_eq!(pc.to_external(0), 0.0);
    }

    #[test]
    fn test_negative_price_maps_to_absent() {
        let pc = PriceConverter::new(100.0);
        assert_eq!(pc.to_internal(-5.0), 0);
    }

    #[test]
    fn test_max_range() {
        // With scale 100 the largest representable price is ~42,949,672.95.
        let pc = PriceConverter::new(100.0);
        let max_price = 42_949_672.95;
        let internal = pc.to_internal(max_price);
        assert!((pc.to_external(internal) - max_price).abs() < 0.01);
    }

    #[test]
    fn test_overflow_saturates() {
        let pc = PriceConverter::new(100.0);
        assert_eq!(pc.to_internal(1e12), u32::MAX);
        assert_eq!(pc.to_internal(f64::INFINITY), 0);
        assert_eq!(pc.to_internal(f64::NAN), 0);
    }

    #[test]
    fn test_registry_default_scale() {
        let reg = PriceConverterRegistry::new(100.0);
        assert_eq!(reg.get("UNKNOWN-SYMBOL").scale_factor(), 100.0);
    }

    #[test]
    fn test_registry_per_symbol_scale() {
        let mut reg = PriceConverterRegistry::new(100.0);
        reg.set_scale("BTC-USDT", 100.0);
        reg.set_scale("SHIB-USDT", 1e8);

        assert_eq!(reg.get("BTC-USDT").scale_factor(), 100.0);
        assert_eq!(reg.get("SHIB-USDT").scale_factor(), 1e8);
        assert_eq!(reg.get("NONEXISTENT").scale_factor(), 100.0);
    }

    #[test]
    fn test_registry_set_scale_replaces() {
        let mut reg = PriceConverterRegistry::new(100.0);
        reg.set_scale("ETH-USDT", 100.0);
        reg.set_scale("ETH-USDT", 1e6);
        assert_eq!(reg.get("ETH-USDT").scale_factor(), 1e6);
    }
}
