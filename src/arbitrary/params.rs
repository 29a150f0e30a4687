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

use bitcoin::Network;

use crate::{Context, MIN_MULTI_KEYS};

/// Default number of attempts to draw a non-empty script for `raw`
/// descriptors
pub const DEFAULT_SCRIPT_ATTEMPTS: u32 = 1000;

/// Errors in generator configuration
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display, Error)]
#[display(doc_comments)]
pub enum BoundsError {
    /// multisig key limit {1} for the {0} context is below the minimum of 2
    /// keys
    BelowMinimum(Context, usize),

    /// multisig key limit {1} for the {0} context exceeds the protocol limit
    AboveProtocolLimit(Context, usize),

    /// number of attempts to generate a value must be non-zero
    NoAttempts,
}

/// Maximal number of keys in generated multisig groups per nesting context.
///
/// Defaults to the protocol limits (see [`Context::max_multi_keys`]); custom
/// bounds may only tighten them.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase", try_from = "BoundsRepr")
)]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MultisigBounds {
    top: usize,
    sh: usize,
    wsh: usize,
}

impl Default for MultisigBounds {
    fn default() -> Self {
        MultisigBounds {
            top: Context::Top.max_multi_keys(),
            sh: Context::Sh.max_multi_keys(),
            wsh: Context::Wsh.max_multi_keys(),
        }
    }
}

impl MultisigBounds {
    /// Constructs bounds for the bare, `sh` and `wsh` multisig contexts
    pub fn new(top: usize, sh: usize, wsh: usize) -> Result<Self, BoundsError> {
        Ok(MultisigBounds {
            top: Self::validate(Context::Top, top)?,
            sh: Self::validate(Context::Sh, sh)?,
            wsh: Self::validate(Context::Wsh, wsh)?,
        })
    }

    /// Checks a key limit against the grammar of the context
    pub fn validate(context: Context, max_keys: usize) -> Result<usize, BoundsError> {
        if max_keys < MIN_MULTI_KEYS {
            Err(BoundsError::BelowMinimum(context, max_keys))
        } else if max_keys > context.max_multi_keys() {
            Err(BoundsError::AboveProtocolLimit(context, max_keys))
        } else {
            Ok(max_keys)
        }
    }

    /// Maximal number of keys for the context
    pub fn max_keys(&self, context: Context) -> usize {
        match context {
            Context::Top => self.top,
            Context::Sh => self.sh,
            Context::Wsh => self.wsh,
        }
    }
}

/// Parameters of descriptor generation.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase", try_from = "ParamsRepr")
)]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct GeneratorParams {
    network: Option<Network>,
    bounds: MultisigBounds,
    max_script_attempts: u32,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        GeneratorParams {
            network: None,
            bounds: MultisigBounds::default(),
            max_script_attempts: DEFAULT_SCRIPT_ATTEMPTS,
        }
    }
}

impl From<Network> for GeneratorParams {
    fn from(network: Network) -> Self { GeneratorParams::default().with_network(Some(network)) }
}

impl GeneratorParams {
    /// Parameters for generating descriptors with keys and addresses bound to
    /// the given network; with `None` each collaborator picks a network itself
    #[inline]
    pub fn with_network(mut self, network: Option<Network>) -> Self {
        self.network = network;
        self
    }

    /// Replaces multisig bounds
    #[inline]
    pub fn with_bounds(mut self, bounds: MultisigBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets maximal number of draws done to get a non-empty `raw` script
    pub fn with_max_script_attempts(mut self, attempts: u32) -> Result<Self, BoundsError> {
        if attempts == 0 {
            return Err(BoundsError::NoAttempts);
        }
        self.max_script_attempts = attempts;
        Ok(self)
    }

    /// Target network
    #[inline]
    pub fn network(&self) -> Option<Network> { self.network }

    /// Multisig bounds
    #[inline]
    pub fn bounds(&self) -> MultisigBounds { self.bounds }

    /// Maximal number of draws done to get a non-empty `raw` script
    #[inline]
    pub fn max_script_attempts(&self) -> u32 { self.max_script_attempts }
}

// Deserialized values pass the same checks as the ones built with
// constructors.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(crate = "serde_crate", rename_all = "camelCase")]
struct BoundsRepr {
    top: usize,
    sh: usize,
    wsh: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<BoundsRepr> for MultisigBounds {
    type Error = BoundsError;

    fn try_from(repr: BoundsRepr) -> Result<Self, Self::Error> {
        MultisigBounds::new(repr.top, repr.sh, repr.wsh)
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(crate = "serde_crate", rename_all = "camelCase")]
struct ParamsRepr {
    network: Option<Network>,
    bounds: MultisigBounds,
    max_script_attempts: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<ParamsRepr> for GeneratorParams {
    type Error = BoundsError;

    fn try_from(repr: ParamsRepr) -> Result<Self, Self::Error> {
        GeneratorParams::default()
            .with_network(repr.network)
            .with_bounds(repr.bounds)
            .with_max_script_attempts(repr.max_script_attempts)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn protocol_defaults() {
        let bounds = MultisigBounds::default();
        assert_eq!(bounds.max_keys(Context::Top), 3);
        assert_eq!(bounds.max_keys(Context::Sh), 15);
        assert_eq!(bounds.max_keys(Context::Wsh), 20);
        assert_eq!(MultisigBounds::new(3, 15, 20), Ok(bounds));

        let params = GeneratorParams::default();
        assert_eq!(params.network(), None);
        assert_eq!(params.max_script_attempts(), DEFAULT_SCRIPT_ATTEMPTS);
    }

    #[test]
    fn bounds_fail_fast() {
        assert_eq!(MultisigBounds::new(1, 15, 20), Err(BoundsError::BelowMinimum(Context::Top, 1)));
        assert_eq!(MultisigBounds::new(3, 0, 20), Err(BoundsError::BelowMinimum(Context::Sh, 0)));
        assert_eq!(
            MultisigBounds::new(4, 15, 20),
            Err(BoundsError::AboveProtocolLimit(Context::Top, 4))
        );
        assert_eq!(
            MultisigBounds::new(3, 15, 21),
            Err(BoundsError::AboveProtocolLimit(Context::Wsh, 21))
        );
        assert_eq!(MultisigBounds::new(2, 2, 2).map(|b| b.max_keys(Context::Wsh)), Ok(2));
    }

    #[test]
    fn params_builder() {
        let params = GeneratorParams::from(Network::Regtest);
        assert_eq!(params.network(), Some(Network::Regtest));
        assert_eq!(
            params.with_max_script_attempts(0),
            Err(BoundsError::NoAttempts)
        );
        let params = params.with_max_script_attempts(5).unwrap();
        assert_eq!(params.max_script_attempts(), 5);
        assert_eq!(params.with_network(None).network(), None);
    }
    #[test]
    #[cfg(feature = "serde")]
    fn deserialized_bounds_are_validated() {
        let bounds: MultisigBounds =
            serde_json::from_str(r#"{"top":2,"sh":10,"wsh":20}"#).unwrap();
        assert_eq!(bounds, MultisigBounds::new(2, 10, 20).unwrap());

        assert!(serde_json::from_str::<MultisigBounds>(r#"{"top":50,"sh":15,"wsh":20}"#).is_err());
        assert!(serde_json::from_str::<MultisigBounds>(r#"{"top":0,"sh":15,"wsh":20}"#).is_err());
        assert!(serde_json::from_str::<MultisigBounds>(r#"{"top":3,"sh":15,"wsh":21}"#).is_err());
        let err = serde_json::from_str::<MultisigBounds>(r#"{"top":3,"sh":16,"wsh":20}"#)
            .unwrap_err();
        assert!(err.to_string().contains("exceeds the protocol limit"));
    }

    #[test]
    #[cfg(feature = "serde")]
    fn deserialized_params_are_validated() {
        let params = GeneratorParams::from(Network::Testnet)
            .with_bounds(MultisigBounds::new(2, 4, 6).unwrap())
            .with_max_script_attempts(10)
            .unwrap();
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(serde_json::from_str::<GeneratorParams>(&json).unwrap(), params);

        let zero_attempts = json.replace(r#""maxScriptAttempts":10"#, r#""maxScriptAttempts":0"#);
        assert_ne!(zero_attempts, json);
        assert!(serde_json::from_str::<GeneratorParams>(&zero_attempts).is_err());

        let wide_bounds = json.replace(r#""top":2"#, r#""top":4"#);
        assert_ne!(wide_bounds, json);
        assert!(serde_json::from_str::<GeneratorParams>(&wide_bounds).is_err());
    }
}
