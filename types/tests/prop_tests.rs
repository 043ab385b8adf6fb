use proptest::prelude::*;

use arcana_types::{Timestamp, WalletAddress};

proptest! {
    /// Any 32-44 character string drawn from the base58 alphabet parses,
    /// and the parsed address round-trips the raw string.
    #[test]
    fn valid_base58_addresses_parse(raw in "[1-9A-HJ-NP-Za-km-z]{32,44}") {
        let addr = WalletAddress::parse(raw.clone()).expect("valid address");
        prop_assert_eq!(addr.as_str(), raw.as_str());
    }

    /// Strings outside the 32-44 length window never parse.
    #[test]
    fn wrong_length_addresses_fail(raw in "[1-9A-HJ-NP-Za-km-z]{1,31}") {
        prop_assert!(WalletAddress::parse(raw).is_err());
    }

    /// A base64-only character anywhere in the string is rejected.
    #[test]
    fn base64_characters_are_rejected(
        prefix in "[1-9A-HJ-NP-Za-km-z]{16,20}",
        suffix in "[1-9A-HJ-NP-Za-km-z]{16,20}",
        bad in prop::sample::select(vec!['0', 'O', 'I', 'l', '+', '/', '=']),
    ) {
        let raw = format!("{prefix}{bad}{suffix}");
        prop_assert!(WalletAddress::parse(raw).is_err());
    }

    /// elapsed_since never underflows, whatever the ordering.
    #[test]
    fn elapsed_since_saturates(a in any::<u64>(), b in any::<u64>()) {
        let elapsed = Timestamp::new(a).elapsed_since(Timestamp::new(b));
        prop_assert_eq!(elapsed, b.saturating_sub(a));
    }
}
