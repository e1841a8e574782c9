use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Capability tag a feature unit is registered under.
///
/// The registry looks units up by this tag rather than by their concrete type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeatureKind {
    Core,
    Auth,
    Dashboard,
    User,
    Settings,
    /// Units contributed outside the built-in set.
    Extension,
}
