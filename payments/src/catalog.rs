//! The credit pack catalog.

use arcana_types::CreditPack;

/// The packs offered on the purchase screen. Prices are minor units of the
/// payment token (10^9 minor units per whole token).
pub const CREDIT_PACKS: &[CreditPack] = &[
    CreditPack {
        credits: 5,
        price_minor_units: 10_000_000,
        label: "Seeker",
    },
    CreditPack {
        credits: 20,
        price_minor_units: 35_000_000,
        label: "Mystic",
    },
    CreditPack {
        credits: 60,
        price_minor_units: 90_000_000,
        label: "Oracle",
    },
];

/// Look up a pack by its credit count.
pub fn pack_for_credits(credits: u32) -> Option<&'static CreditPack> {
    CREDIT_PACKS.iter().find(|pack| pack.credits == credits)
}
