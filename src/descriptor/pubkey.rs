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

use std::convert::TryFrom;

use bitcoin::secp256k1;
use bitcoin::util::bip32::{
    ChainCode, ChildNumber, DerivationPath, ExtendedPubKey, Fingerprint, KeySource,
};
use bitcoin::{Network, PublicKey};

/// key origin can't wrap a key provider which already has an origin
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display, Error)]
#[display(doc_comments)]
pub struct DoubleOrigin;

/// Kind of derivation applied after the derivation path of an extended key.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display)]
#[repr(u8)]
pub enum DeriveType {
    /// Key is fixed at the end of the derivation path
    #[display("fixed")]
    Fixed,

    /// Unhardened wildcard index follows the derivation path
    #[display("*")]
    Unhardened,

    /// Hardened wildcard index follows the derivation path
    #[display("*h")]
    Hardened,
}

impl DeriveType {
    /// All derive types, in declaration order
    pub const ALL: [DeriveType; 3] = [DeriveType::Fixed, DeriveType::Unhardened, DeriveType::Hardened];

    /// Detects whether the key expression ends with a wildcard
    #[inline]
    pub fn is_wildcard(self) -> bool { self != DeriveType::Fixed }

    /// Detects whether the wildcard derivation is hardened
    #[inline]
    pub fn is_hardened(self) -> bool { self == DeriveType::Hardened }
}

/// Rooted key origin: fingerprint of the master key and the derivation path
/// from it.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct KeyOrigin {
    /// Fingerprint of the master extended key
    pub master_fingerprint: Fingerprint,
    /// Derivation path from the master key
    pub derivation: DerivationPath,
}

impl KeyOrigin {
    /// Constructs key origin from its components
    #[inline]
    pub fn new(master_fingerprint: Fingerprint, derivation: DerivationPath) -> KeyOrigin {
        KeyOrigin {
            master_fingerprint,
            derivation,
        }
    }

    /// Number of derivation steps from the master key
    #[inline]
    pub fn depth(&self) -> usize { self.derivation.as_ref().len() }
}

impl From<KeySource> for KeyOrigin {
    fn from((master_fingerprint, derivation): KeySource) -> Self {
        KeyOrigin::new(master_fingerprint, derivation)
    }
}

impl From<KeyOrigin> for KeySource {
    fn from(origin: KeyOrigin) -> Self { (origin.master_fingerprint, origin.derivation) }
}

/// Network-agnostic part of an extended public key.
///
/// Combined with a network by [`XpubCore::bind`] it produces a fully-defined
/// [`ExtendedPubKey`].
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct XpubCore {
    /// Depth in the key hierarchy
    pub depth: u8,
    /// Fingerprint of the parent key
    pub parent_fingerprint: Fingerprint,
    /// Child number under which the key was derived from its parent
    pub child_number: ChildNumber,
    /// Public key
    pub public_key: secp256k1::PublicKey,
    /// BIP32 chain code used for hierarchical derivation
    pub chain_code: ChainCode,
}

impl XpubCore {
    /// Binds the key to a specific bitcoin network
    pub fn bind(self, network: Network) -> ExtendedPubKey {
        ExtendedPubKey {
            network,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
            public_key: self.public_key,
            chain_code: self.chain_code,
        }
    }
}

impl From<ExtendedPubKey> for XpubCore {
    fn from(xpub: ExtendedPubKey) -> Self {
        XpubCore {
            depth: xpub.depth,
            parent_fingerprint: xpub.parent_fingerprint,
            child_number: xpub.child_number,
            public_key: xpub.public_key,
            chain_code: xpub.chain_code,
        }
    }
}

/// Key derived from an extended public key.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct HdKey {
    /// Extended public key the derivation starts from
    pub xpub: ExtendedPubKey,
    /// Derivation path applied to the extended key; may be empty
    pub path: DerivationPath,
    /// Wildcard following the derivation path
    pub derive: DeriveType,
}

/// Key provider which may be wrapped into a key origin.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum OriginKey {
    /// Single constant public key
    Const(PublicKey),

    /// Key derived from an extended public key
    Hd(HdKey),
}

/// Source of a public key inside a descriptor.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum PubKeyProvider {
    /// Single constant public key
    Const(PublicKey),

    /// Key derived from an extended public key
    Hd(HdKey),

    /// Key with explicit origin metadata; the inner key can't have an origin
    /// of its own
    Origin(KeyOrigin, OriginKey),
}

impl PubKeyProvider {
    /// Returns key origin, if present
    pub fn origin(&self) -> Option<&KeyOrigin> {
        match self {
            PubKeyProvider::Origin(origin, _) => Some(origin),
            PubKeyProvider::Const(_) | PubKeyProvider::Hd(_) => None,
        }
    }

    /// Returns extended key information, if the key is derived from an
    /// extended key
    pub fn hd_key(&self) -> Option<&HdKey> {
        match self {
            PubKeyProvider::Hd(hd) | PubKeyProvider::Origin(_, OriginKey::Hd(hd)) => Some(hd),
            PubKeyProvider::Const(_) | PubKeyProvider::Origin(_, OriginKey::Const(_)) => None,
        }
    }

    /// Network of the extended key. Constant keys are network-agnostic and
    /// return `None`.
    #[inline]
    pub fn network(&self) -> Option<Network> { self.hd_key().map(|hd| hd.xpub.network) }

    /// Detects whether the provider produces different keys per derivation
    /// index
    #[inline]
    pub fn is_ranged(&self) -> bool {
        self.hd_key()
            .map(|hd| hd.derive.is_wildcard())
            .unwrap_or_default()
    }
}

impl From<OriginKey> for PubKeyProvider {
    fn from(key: OriginKey) -> Self {
        match key {
            OriginKey::Const(pk) => PubKeyProvider::Const(pk),
            OriginKey::Hd(hd) => PubKeyProvider::Hd(hd),
        }
    }
}

impl TryFrom<PubKeyProvider> for OriginKey {
    type Error = DoubleOrigin;

    fn try_from(provider: PubKeyProvider) -> Result<Self, Self::Error> {
        match provider {
            PubKeyProvider::Const(pk) => Ok(OriginKey::Const(pk)),
            PubKeyProvider::Hd(hd) => Ok(OriginKey::Hd(hd)),
            PubKeyProvider::Origin(..) => Err(DoubleOrigin),
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    fn pubkey() -> PublicKey {
        PublicKey::from_str("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
            .unwrap()
    }

    fn hd_key() -> HdKey {
        HdKey {
            xpub: ExtendedPubKey::from_str("xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8").unwrap(),
            path: DerivationPath::from_str("m/0/1").unwrap(),
            derive: DeriveType::Unhardened,
        }
    }

    fn origin() -> KeyOrigin {
        KeyOrigin::new(
            Fingerprint::from(&[0xd3, 0x4d, 0xb3, 0x3f][..]),
            DerivationPath::from_str("m/84'/0'/0'").unwrap(),
        )
    }

    #[test]
    fn origin_wraps_only_plain_keys() {
        let wrapped = PubKeyProvider::Origin(origin(), OriginKey::Const(pubkey()));
        assert_eq!(OriginKey::try_from(wrapped), Err(DoubleOrigin));
        assert_eq!(
            OriginKey::try_from(PubKeyProvider::Hd(hd_key())),
            Ok(OriginKey::Hd(hd_key()))
        );
        assert_eq!(
            PubKeyProvider::from(OriginKey::Const(pubkey())),
            PubKeyProvider::Const(pubkey())
        );
    }

    #[test]
    fn key_origin_source() {
        let origin = origin();
        assert_eq!(origin.depth(), 3);
        let source = KeySource::from(origin.clone());
        assert_eq!(KeyOrigin::from(source), origin);
    }

    #[test]
    fn xpub_core_binding() {
        let xpub = hd_key().xpub;
        let core = XpubCore::from(xpub);
        assert_eq!(core.bind(Network::Bitcoin), xpub);

        let bound = core.bind(Network::Regtest);
        assert_eq!(bound.network, Network::Regtest);
        assert_eq!(bound.public_key, xpub.public_key);
        assert_eq!(bound.chain_code, xpub.chain_code);
    }

    #[test]
    fn provider_network() {
        assert_eq!(PubKeyProvider::Const(pubkey()).network(), None);
        assert_eq!(PubKeyProvider::Hd(hd_key()).network(), Some(Network::Bitcoin));
        let wrapped = PubKeyProvider::Origin(origin(), OriginKey::Hd(hd_key()));
        assert_eq!(wrapped.network(), Some(Network::Bitcoin));
        assert!(wrapped.is_ranged());
        assert_eq!(wrapped.origin(), Some(&origin()));
        assert!(!PubKeyProvider::Const(pubkey()).is_ranged());
    }

    #[test]
    fn derive_type_flags() {
        assert!(!DeriveType::Fixed.is_wildcard());
        assert!(DeriveType::Unhardened.is_wildcard());
        assert!(!DeriveType::Unhardened.is_hardened());
        assert!(DeriveType::Hardened.is_hardened());
        assert_eq!(DeriveType::Hardened.to_string(), "*h");
    }
}
