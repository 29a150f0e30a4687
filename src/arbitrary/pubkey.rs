// Descriptor wallet library extending bitcoin & miniscript functionality
// by LNP/BP Association (https://lnp-bp.org)
// Written in 2020-2022 by
//     Dr. Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the Apache-2.0 License
// along with this software.
// If not, see <https://opensource.org/licenses/Apache-2.0>.

use bitcoin::util::bip32::ExtendedPubKey;
use bitcoin::{Network, PublicKey};
use proptest::prelude::*;

use super::primitives::crypto;
use crate::{DeriveType, HdKey, OriginKey, PubKeyProvider};

/// Any of the derive types
pub fn derive_type() -> impl Strategy<Value = DeriveType> {
    prop::sample::select(DeriveType::ALL.to_vec())
}

/// Constant public key
pub fn const_key() -> impl Strategy<Value = PublicKey> { crypto::public_key() }

/// Key derived from an extended key. With no network given the extended key
/// comes bound to a random network; otherwise a network-agnostic key is bound
/// to the requested one.
pub fn hd_key(network: Option<Network>) -> impl Strategy<Value = HdKey> {
    let xpub: BoxedStrategy<ExtendedPubKey> = match network {
        None => crypto::extended_pubkey().boxed(),
        Some(network) => crypto::network_bound_extended_pubkey(network).boxed(),
    };
    (xpub, crypto::derivation_path(), derive_type())
        .prop_map(|(xpub, path, derive)| HdKey { xpub, path, derive })
}

/// Key which may be put under a key origin: constant or extended
pub fn origin_key(network: Option<Network>) -> impl Strategy<Value = OriginKey> {
    prop_oneof![const_key().prop_map(OriginKey::Const), hd_key(network).prop_map(OriginKey::Hd)]
}

/// Key provider with a rooted key origin
pub fn origin_provider(network: Option<Network>) -> impl Strategy<Value = PubKeyProvider> {
    (crypto::rooted_key_origin(), origin_key(network))
        .prop_map(|(origin, key)| PubKeyProvider::Origin(origin, key))
}

/// Any key provider: origin-wrapped, constant or extended key
pub fn pubkey_provider(network: Option<Network>) -> BoxedStrategy<PubKeyProvider> {
    prop_oneof![
        origin_provider(network),
        const_key().prop_map(PubKeyProvider::Const),
        hd_key(network).prop_map(PubKeyProvider::Hd),
    ]
    .boxed()
}

impl Arbitrary for DeriveType {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy { derive_type().boxed() }

    type Strategy = BoxedStrategy<Self>;
}

impl Arbitrary for PubKeyProvider {
    type Parameters = Option<Network>;

    fn arbitrary_with(network: Option<Network>) -> Self::Strategy { pubkey_provider(network) }

    type Strategy = BoxedStrategy<Self>;
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;
    use std::convert::TryFrom;

    use proptest::strategy::ValueTree;
    use proptest::test_runner::{Config, TestRunner};

    use super::*;

    fn kind(provider: &PubKeyProvider) -> &'static str {
        match provider {
            PubKeyProvider::Const(_) => "const",
            PubKeyProvider::Hd(_) => "hd",
            PubKeyProvider::Origin(_, OriginKey::Const(_)) => "origin-const",
            PubKeyProvider::Origin(_, OriginKey::Hd(_)) => "origin-hd",
        }
    }

    proptest! {
        #![proptest_config(Config::with_cases(512))]

        #[test]
        fn origin_never_wraps_origin(provider in any::<PubKeyProvider>()) {
            if let PubKeyProvider::Origin(_, inner) = provider {
                let inner = PubKeyProvider::from(inner);
                prop_assert!(inner.origin().is_none());
                prop_assert!(OriginKey::try_from(inner).is_ok());
            }
        }

        #[test]
        fn keys_follow_network(provider in any_with::<PubKeyProvider>(Some(Network::Regtest))) {
            if let Some(network) = provider.network() {
                prop_assert_eq!(network, Network::Regtest);
            }
        }
    }

    #[test]
    fn all_provider_kinds_are_produced() {
        let strategy = pubkey_provider(None);
        let mut runner = TestRunner::deterministic();
        let mut kinds = BTreeSet::new();
        let mut derive_types = BTreeSet::new();
        for _ in 0..2000 {
            let provider = strategy.new_tree(&mut runner).unwrap().current();
            kinds.insert(kind(&provider));
            if let Some(hd) = provider.hd_key() {
                derive_types.insert(hd.derive);
            }
        }
        assert_eq!(kinds.len(), 4);
        assert_eq!(derive_types.len(), DeriveType::ALL.len());
    }
}
