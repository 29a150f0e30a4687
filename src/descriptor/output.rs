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

use bitcoin::{Address, Script};

use super::PubKeyProvider;

/// Shape of an output descriptor, without its content.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display)]
#[repr(u8)]
pub enum DescrTag {
    /// Address descriptor
    #[display("addr")]
    Addr,

    /// Raw script descriptor
    #[display("raw")]
    Raw,

    /// Pay-to-pubkey
    #[display("pk")]
    Pk,

    /// Pay-to-pubkey-hash
    #[display("pkh")]
    Pkh,

    /// Pay-to-witness-pubkey-hash
    #[display("wpkh")]
    Wpkh,

    /// Combination of pk, pkh, wpkh and sh-wpkh outputs
    #[display("combo")]
    Combo,

    /// Multisig, sorted or not
    #[display("multi")]
    Multi,

    /// Pay-to-script-hash wrapper
    #[display("sh")]
    Sh,

    /// Pay-to-witness-script-hash wrapper
    #[display("wsh")]
    Wsh,
}

impl DescrTag {
    /// All descriptor shapes
    pub const ALL: [DescrTag; 9] = [
        DescrTag::Addr,
        DescrTag::Raw,
        DescrTag::Pk,
        DescrTag::Pkh,
        DescrTag::Wpkh,
        DescrTag::Combo,
        DescrTag::Multi,
        DescrTag::Sh,
        DescrTag::Wsh,
    ];

    /// Detects shapes which wrap another descriptor
    #[inline]
    pub fn is_wrapper(self) -> bool { matches!(self, DescrTag::Sh | DescrTag::Wsh) }
}

/// Multisig group of keys with a signature threshold.
///
/// The order of keys is significant for the script construction even for the
/// sorted (BIP-67) multisig, so it is preserved as is.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Multi {
    /// Number of signatures required to spend
    pub threshold: usize,
    /// Participating keys
    pub keys: Vec<PubKeyProvider>,
    /// Whether the keys are sorted lexicographically in the script
    /// (`sortedmulti`)
    pub sorted: bool,
}

impl Multi {
    /// Number of keys in the group
    #[inline]
    pub fn len(&self) -> usize { self.keys.len() }

    /// Detects multisig with no keys
    #[inline]
    pub fn is_empty(&self) -> bool { self.keys.is_empty() }
}

/// Content of a witness script hash wrapper (`wsh`).
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum WshInner {
    /// `wsh(pk(KEY))`
    Pk(PubKeyProvider),

    /// `wsh(pkh(KEY))`
    Pkh(PubKeyProvider),

    /// `wsh(multi(..))` or `wsh(sortedmulti(..))`
    Multi(Multi),
}

impl WshInner {
    /// Shape of the wrapped descriptor
    pub fn tag(&self) -> DescrTag {
        match self {
            WshInner::Pk(_) => DescrTag::Pk,
            WshInner::Pkh(_) => DescrTag::Pkh,
            WshInner::Multi(_) => DescrTag::Multi,
        }
    }

    /// Keys of the witness script in their order
    pub fn keys(&self) -> Vec<&PubKeyProvider> {
        match self {
            WshInner::Pk(key) | WshInner::Pkh(key) => vec![key],
            WshInner::Multi(multi) => multi.keys.iter().collect(),
        }
    }
}

/// Content of a script hash wrapper (`sh`).
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ShInner {
    /// `sh(wpkh(KEY))`
    Wpkh(PubKeyProvider),

    /// `sh(pk(KEY))`
    Pk(PubKeyProvider),

    /// `sh(pkh(KEY))`
    Pkh(PubKeyProvider),

    /// `sh(multi(..))` or `sh(sortedmulti(..))`
    Multi(Multi),

    /// `sh(wsh(..))`
    Wsh(WshInner),
}

impl ShInner {
    /// Shape of the wrapped descriptor
    pub fn tag(&self) -> DescrTag {
        match self {
            ShInner::Wpkh(_) => DescrTag::Wpkh,
            ShInner::Pk(_) => DescrTag::Pk,
            ShInner::Pkh(_) => DescrTag::Pkh,
            ShInner::Multi(_) => DescrTag::Multi,
            ShInner::Wsh(_) => DescrTag::Wsh,
        }
    }

    /// Keys of the redeem script in their order
    pub fn keys(&self) -> Vec<&PubKeyProvider> {
        match self {
            ShInner::Wpkh(key) | ShInner::Pk(key) | ShInner::Pkh(key) => vec![key],
            ShInner::Multi(multi) => multi.keys.iter().collect(),
            ShInner::Wsh(inner) => inner.keys(),
        }
    }
}

/// Output descriptor.
///
/// Nesting rules are enforced by the types of the `sh` and `wsh` content;
/// see [`OutputDescriptor::check`] for the rest of the grammar.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum OutputDescriptor {
    /// `addr(ADDR)`
    Addr(Address),

    /// `raw(HEX)`
    Raw(Script),

    /// `pk(KEY)`
    Pk(PubKeyProvider),

    /// `pkh(KEY)`
    Pkh(PubKeyProvider),

    /// `wpkh(KEY)`
    Wpkh(PubKeyProvider),

    /// `combo(KEY)`
    Combo(PubKeyProvider),

    /// Bare `multi(..)` or `sortedmulti(..)`
    Multi(Multi),

    /// `sh(..)`
    Sh(ShInner),

    /// `wsh(..)`
    Wsh(WshInner),
}

impl OutputDescriptor {
    /// Shape of the descriptor
    pub fn tag(&self) -> DescrTag {
        match self {
            OutputDescriptor::Addr(_) => DescrTag::Addr,
            OutputDescriptor::Raw(_) => DescrTag::Raw,
            OutputDescriptor::Pk(_) => DescrTag::Pk,
            OutputDescriptor::Pkh(_) => DescrTag::Pkh,
            OutputDescriptor::Wpkh(_) => DescrTag::Wpkh,
            OutputDescriptor::Combo(_) => DescrTag::Combo,
            OutputDescriptor::Multi(_) => DescrTag::Multi,
            OutputDescriptor::Sh(_) => DescrTag::Sh,
            OutputDescriptor::Wsh(_) => DescrTag::Wsh,
        }
    }

    /// All key providers participating in the descriptor, in their order
    pub fn keys(&self) -> Vec<&PubKeyProvider> {
        match self {
            OutputDescriptor::Addr(_) | OutputDescriptor::Raw(_) => vec![],
            OutputDescriptor::Pk(key)
            | OutputDescriptor::Pkh(key)
            | OutputDescriptor::Wpkh(key)
            | OutputDescriptor::Combo(key) => vec![key],
            OutputDescriptor::Multi(multi) => multi.keys.iter().collect(),
            OutputDescriptor::Sh(inner) => inner.keys(),
            OutputDescriptor::Wsh(inner) => inner.keys(),
        }
    }

    /// Returns multisig group of the descriptor, if any, looking through
    /// `sh` and `wsh` wrappers
    pub fn multi(&self) -> Option<&Multi> {
        match self {
            OutputDescriptor::Multi(multi)
            | OutputDescriptor::Sh(ShInner::Multi(multi))
            | OutputDescriptor::Sh(ShInner::Wsh(WshInner::Multi(multi)))
            | OutputDescriptor::Wsh(WshInner::Multi(multi)) => Some(multi),
            _ => None,
        }
    }
}

impl From<WshInner> for OutputDescriptor {
    fn from(inner: WshInner) -> Self {
        match inner {
            WshInner::Pk(key) => OutputDescriptor::Pk(key),
            WshInner::Pkh(key) => OutputDescriptor::Pkh(key),
            WshInner::Multi(multi) => OutputDescriptor::Multi(multi),
        }
    }
}

impl From<ShInner> for OutputDescriptor {
    fn from(inner: ShInner) -> Self {
        match inner {
            ShInner::Wpkh(key) => OutputDescriptor::Wpkh(key),
            ShInner::Pk(key) => OutputDescriptor::Pk(key),
            ShInner::Pkh(key) => OutputDescriptor::Pkh(key),
            ShInner::Multi(multi) => OutputDescriptor::Multi(multi),
            ShInner::Wsh(inner) => OutputDescriptor::Wsh(inner),
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use bitcoin::PublicKey;

    use super::*;

    fn key(hex: &str) -> PubKeyProvider { PubKeyProvider::Const(PublicKey::from_str(hex).unwrap()) }

    fn keys() -> Vec<PubKeyProvider> {
        vec![
            key("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
            key("02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5"),
            key("02f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9"),
        ]
    }

    #[test]
    fn keys_preserve_order() {
        let multi = Multi {
            threshold: 2,
            keys: keys(),
            sorted: true,
        };
        let descr = OutputDescriptor::Sh(ShInner::Wsh(WshInner::Multi(multi.clone())));
        assert_eq!(descr.keys(), keys().iter().collect::<Vec<_>>());
        assert_eq!(descr.multi(), Some(&multi));
        assert_eq!(descr.tag(), DescrTag::Sh);
        assert_eq!(multi.len(), 3);
    }

    #[test]
    fn inner_into_standalone() {
        let k = keys().remove(0);
        assert_eq!(
            OutputDescriptor::from(ShInner::Wpkh(k.clone())),
            OutputDescriptor::Wpkh(k.clone())
        );
        assert_eq!(
            OutputDescriptor::from(ShInner::Wsh(WshInner::Pkh(k.clone()))),
            OutputDescriptor::Wsh(WshInner::Pkh(k.clone()))
        );
        assert_eq!(OutputDescriptor::from(WshInner::Pk(k.clone())).tag(), DescrTag::Pk);
        assert_eq!(OutputDescriptor::Combo(k).multi(), None);
    }

    #[test]
    fn tag_names() {
        let names = DescrTag::ALL
            .iter()
            .map(DescrTag::to_string)
            .collect::<Vec<_>>();
        assert_eq!(names, ["addr", "raw", "pk", "pkh", "wpkh", "combo", "multi", "sh", "wsh"]);
        assert!(DescrTag::Sh.is_wrapper());
        assert!(!DescrTag::Multi.is_wrapper());
    }
}
