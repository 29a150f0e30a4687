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

//! Strategies for the primitive bitcoin data descriptors are built from:
//! addresses, scripts and key material. None of the produced values is
//! required to be meaningful beyond being well-formed.

use proptest::prelude::*;

pub mod address {
    //! Addresses and networks.

    use bitcoin::hashes::Hash;
    use bitcoin::util::address::{Payload, WitnessVersion};
    use bitcoin::{Address, Network, PubkeyHash, ScriptHash};

    use super::*;

    /// Networks addresses and extended keys are generated for
    pub const NETWORKS: [Network; 4] =
        [Network::Bitcoin, Network::Testnet, Network::Signet, Network::Regtest];

    /// Any of the known networks
    pub fn network() -> impl Strategy<Value = Network> { prop::sample::select(NETWORKS.to_vec()) }

    /// Address payload of one of the standard output types
    pub fn payload() -> impl Strategy<Value = Payload> {
        prop_oneof![
            any::<[u8; 20]>().prop_map(|hash| Payload::PubkeyHash(PubkeyHash::from_inner(hash))),
            any::<[u8; 20]>().prop_map(|hash| Payload::ScriptHash(ScriptHash::from_inner(hash))),
            any::<[u8; 20]>().prop_map(|program| Payload::WitnessProgram {
                version: WitnessVersion::V0,
                program: program.to_vec(),
            }),
            any::<[u8; 32]>().prop_map(|program| Payload::WitnessProgram {
                version: WitnessVersion::V0,
                program: program.to_vec(),
            }),
            any::<[u8; 32]>().prop_map(|program| Payload::WitnessProgram {
                version: WitnessVersion::V1,
                program: program.to_vec(),
            }),
        ]
    }

    /// Address for the given network, or for a random one if the network is
    /// not specified
    pub fn address(network: Option<Network>) -> BoxedStrategy<Address> {
        let network = match network {
            Some(network) => Just(network).boxed(),
            None => self::network().boxed(),
        };
        (network, payload())
            .prop_map(|(network, payload)| Address { payload, network })
            .boxed()
    }
}

pub mod script {
    //! Scripts.

    use bitcoin::Script;

    use super::*;

    /// Maximal length of generated scripts
    pub const MAX_SCRIPT_LEN: usize = 64;

    /// Arbitrary byte sequence taken as a script; may be empty
    pub fn script() -> impl Strategy<Value = Script> {
        prop::collection::vec(any::<u8>(), 0..=MAX_SCRIPT_LEN).prop_map(Script::from)
    }
}

pub mod crypto {
    //! Public keys, extended keys and derivation paths.

    use bitcoin::util::bip32::{ChainCode, ChildNumber, DerivationPath, ExtendedPubKey, Fingerprint};
    use bitcoin::{Network, PublicKey};
    use secp256k1::SecretKey;

    use super::*;
    use crate::{KeyOrigin, XpubCore};

    /// Maximal number of steps in generated derivation paths
    pub const MAX_PATH_DEPTH: usize = 6;

    /// Valid secp256k1 secret key
    pub fn secret_key() -> impl Strategy<Value = SecretKey> {
        any::<[u8; 32]>().prop_filter_map("generated invalid secret key", |bytes| {
            SecretKey::from_slice(&bytes).ok()
        })
    }

    /// Compressed public key
    pub fn public_key() -> impl Strategy<Value = PublicKey> {
        secret_key().prop_map(|sk| PublicKey::new(secp256k1::PublicKey::from_secret_key_global(&sk)))
    }

    /// Master key fingerprint
    pub fn fingerprint() -> impl Strategy<Value = Fingerprint> {
        any::<[u8; 4]>().prop_map(|bytes| Fingerprint::from(&bytes[..]))
    }

    /// BIP32 chain code
    pub fn chain_code() -> impl Strategy<Value = ChainCode> {
        any::<[u8; 32]>().prop_map(|bytes| ChainCode::from(&bytes[..]))
    }

    /// Hardened or unhardened child number
    pub fn child_number() -> impl Strategy<Value = ChildNumber> {
        any::<u32>().prop_map(ChildNumber::from)
    }

    /// Derivation path, possibly empty
    pub fn derivation_path() -> impl Strategy<Value = DerivationPath> {
        prop::collection::vec(child_number(), 0..=MAX_PATH_DEPTH).prop_map(DerivationPath::from)
    }

    /// Rooted key origin
    pub fn rooted_key_origin() -> impl Strategy<Value = KeyOrigin> {
        (fingerprint(), derivation_path())
            .prop_map(|(fingerprint, derivation)| KeyOrigin::new(fingerprint, derivation))
    }

    /// Extended public key not bound to any network
    pub fn xpub_core() -> impl Strategy<Value = XpubCore> {
        (any::<u8>(), fingerprint(), child_number(), secret_key(), chain_code()).prop_map(
            |(depth, parent_fingerprint, child_number, sk, chain_code)| XpubCore {
                depth,
                parent_fingerprint,
                child_number,
                public_key: secp256k1::PublicKey::from_secret_key_global(&sk),
                chain_code,
            },
        )
    }

    /// Extended public key for a random network
    pub fn extended_pubkey() -> impl Strategy<Value = ExtendedPubKey> {
        (address::network(), xpub_core()).prop_map(|(network, core)| core.bind(network))
    }

    /// Extended public key for the given network
    pub fn network_bound_extended_pubkey(network: Network) -> impl Strategy<Value = ExtendedPubKey> {
        xpub_core().prop_map(move |core| core.bind(network))
    }
}

#[cfg(test)]
mod test {
    use bitcoin::Network;
    use proptest::test_runner::Config;

    use super::*;

    proptest! {
        #![proptest_config(Config::with_cases(256))]

        #[test]
        fn address_has_requested_network(addr in address::address(Some(Network::Signet))) {
            prop_assert_eq!(addr.network, Network::Signet);
        }

        #[test]
        fn public_keys_are_compressed(pk in crypto::public_key()) {
            prop_assert!(pk.compressed);
        }

        #[test]
        fn bound_xpub_keeps_network(xpub in crypto::network_bound_extended_pubkey(Network::Testnet)) {
            prop_assert_eq!(xpub.network, Network::Testnet);
        }

        #[test]
        fn derivation_paths_are_limited(path in crypto::derivation_path()) {
            prop_assert!(path.as_ref().len() <= crypto::MAX_PATH_DEPTH);
        }

        #[test]
        fn scripts_are_limited(script in script::script()) {
            prop_assert!(script.len() <= script::MAX_SCRIPT_LEN);
        }
    }
}
