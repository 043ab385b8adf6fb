//! Credit pack catalog entries.

/// A purchasable credit pack.
///
/// `price_minor_units` is the payment amount in the smallest on-chain unit,
/// used for exact-amount comparisons during verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreditPack {
    pub credits: u32,
    pub price_minor_units: u64,
    pub label: &'static str,
}
