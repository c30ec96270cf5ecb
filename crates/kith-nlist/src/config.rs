//! Neighbour-list configuration, defaulting, and error types.
//!
//! [`NeighbourListConfig`] is the builder input. [`resolve()`](NeighbourListConfig::resolve)
//! validates it and fills in defaults, producing a [`ResolvedConfig`] whose
//! [`ConfigRecord`] notes which values were supplied and which were
//! defaulted, so a run can be reproduced from its log.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;

use crate::contacts::ContactRule;
use crate::strategy::BuildStrategy;

/// Padding used when none is configured.
pub const DEFAULT_PAD: f64 = 0.5;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while resolving a [`NeighbourListConfig`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A required parameter was not supplied.
    MissingParameter {
        /// Configuration key of the missing parameter.
        name: &'static str,
    },
    /// A parameter value is out of range.
    InvalidParameter {
        /// Configuration key of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Which constraint was violated.
        reason: &'static str,
    },
    /// A fixed contact distance exceeds the search radius, so contacts
    /// could not be a subgraph of the neighbour list.
    ContactExceedsSearch {
        /// The configured contact distance.
        contact: f64,
        /// `cutoff + pad`.
        search: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter { name } => write!(f, "missing required parameter {name}"),
            Self::InvalidParameter {
                name,
                value,
                reason,
            } => write!(f, "invalid {name} = {value}: {reason}"),
            Self::ContactExceedsSearch { contact, search } => write!(
                f,
                "contact distance {contact} exceeds search radius (cutoff + pad) {search}"
            ),
        }
    }
}

impl Error for ConfigError {}

// ── ConfigRecord ───────────────────────────────────────────────────

/// Where a resolved value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provenance {
    /// Supplied by the caller.
    Explicit,
    /// Filled in from a documented default.
    Default,
    /// Forced by another setting (faces imply contacts).
    Implied,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Explicit => "explicit",
            Self::Default => "default",
            Self::Implied => "implied",
        })
    }
}

/// A recorded configuration value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigValue {
    /// A length.
    Float(f64),
    /// A switch.
    Bool(bool),
    /// A named choice.
    Text(&'static str),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// One entry of a [`ConfigRecord`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfigEntry {
    /// The value in force.
    pub value: ConfigValue,
    /// Where it came from.
    pub provenance: Provenance,
}

/// Insertion-ordered record of every resolved option.
///
/// Keys are `nlist.cut`, `nlist.pad`, `nlist.build_type`,
/// `nlist.contact_network`, `nlist.faces` and `nlist.contact_distance`.
/// `Display` renders the entries as `key = value (provenance)`, joined
/// by `; `.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigRecord {
    entries: IndexMap<&'static str, ConfigEntry>,
}

impl ConfigRecord {
    fn set(&mut self, key: &'static str, value: ConfigValue, provenance: Provenance) {
        self.entries.insert(key, ConfigEntry { value, provenance });
    }

    /// Look up an entry by key.
    pub fn get(&self, key: &str) -> Option<&ConfigEntry> {
        self.entries.get(key)
    }

    /// All entries in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ConfigEntry)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Keys whose value was filled in from a default.
    pub fn defaulted(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.iter()
            .filter(|(_, e)| e.provenance == Provenance::Default)
            .map(|(k, _)| k)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ConfigRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, entry)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{key} = {} ({})", entry.value, entry.provenance)?;
        }
        Ok(())
    }
}

// ── NeighbourListConfig ────────────────────────────────────────────

/// Caller-facing neighbour-list options. `None` means "use the default".
///
/// # Examples
///
/// ```
/// use kith_nlist::{NeighbourListConfig, Provenance};
///
/// let resolved = NeighbourListConfig::new(2.0).with_faces(true).resolve().unwrap();
/// assert_eq!(resolved.pad(), 0.5);
/// assert!(resolved.build_contacts());
/// let record = resolved.record();
/// assert_eq!(record.get("nlist.pad").unwrap().provenance, Provenance::Default);
/// assert_eq!(record.get("nlist.contact_network").unwrap().provenance, Provenance::Implied);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighbourListConfig {
    /// Interaction cutoff (`nlist.cut`). Required.
    pub cutoff: Option<f64>,
    /// Verlet skin beyond the cutoff (`nlist.pad`). Default: 0.5.
    pub pad: Option<f64>,
    /// Fixed contact distance (`nlist.contact_distance`). Default: the sum
    /// of the two particles' radii, evaluated per pair.
    pub contact_distance: Option<f64>,
    /// Derive the contact graph after each build (`nlist.contact_network`).
    /// Default: false.
    pub build_contacts: Option<bool>,
    /// Extract planar faces after each build (`nlist.faces`). Implies
    /// contacts. Default: false.
    pub build_faces: Option<bool>,
    /// Preferred search strategy (`nlist.build_type`). Default: cell lists,
    /// falling back to all-pairs when the box is too small.
    pub build_type: Option<BuildStrategy>,
}

impl NeighbourListConfig {
    /// A config with the given cutoff and every other option defaulted.
    pub fn new(cutoff: f64) -> Self {
        Self {
            cutoff: Some(cutoff),
            ..Self::default()
        }
    }

    /// Set the padding distance.
    pub fn with_pad(mut self, pad: f64) -> Self {
        self.pad = Some(pad);
        self
    }

    /// Set a fixed contact distance.
    pub fn with_contact_distance(mut self, distance: f64) -> Self {
        self.contact_distance = Some(distance);
        self
    }

    /// Enable or disable contact-graph construction.
    pub fn with_contacts(mut self, enabled: bool) -> Self {
        self.build_contacts = Some(enabled);
        self
    }

    /// Enable or disable face extraction.
    pub fn with_faces(mut self, enabled: bool) -> Self {
        self.build_faces = Some(enabled);
        self
    }

    /// Choose the preferred search strategy.
    pub fn with_build_type(mut self, strategy: BuildStrategy) -> Self {
        self.build_type = Some(strategy);
        self
    }

    /// Check structural invariants without resolving defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cutoff = self.cutoff.ok_or(ConfigError::MissingParameter { name: "nlist.cut" })?;
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "nlist.cut",
                value: cutoff,
                reason: "must be finite and positive",
            });
        }
        let pad = self.pad.unwrap_or(DEFAULT_PAD);
        if !pad.is_finite() || pad < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "nlist.pad",
                value: pad,
                reason: "must be finite and non-negative",
            });
        }
        if let Some(contact) = self.contact_distance {
            if !contact.is_finite() || contact <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "nlist.contact_distance",
                    value: contact,
                    reason: "must be finite and positive",
                });
            }
            if contact > cutoff + pad {
                return Err(ConfigError::ContactExceedsSearch {
                    contact,
                    search: cutoff + pad,
                });
            }
        }
        Ok(())
    }

    /// Validate and fill in defaults.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        self.validate()?;
        let mut record = ConfigRecord::default();

        let cutoff = self.cutoff.unwrap_or_default();
        record.set("nlist.cut", ConfigValue::Float(cutoff), Provenance::Explicit);

        let (pad, pad_src) = pick(self.pad, DEFAULT_PAD);
        record.set("nlist.pad", ConfigValue::Float(pad), pad_src);

        let (build_type, type_src) = pick(self.build_type, BuildStrategy::CellList);
        record.set("nlist.build_type", ConfigValue::Text(build_type.as_str()), type_src);

        let (build_faces, faces_src) = pick(self.build_faces, false);
        let (mut build_contacts, mut contacts_src) = pick(self.build_contacts, false);
        if build_faces && !build_contacts {
            build_contacts = true;
            contacts_src = Provenance::Implied;
        }
        record.set("nlist.contact_network", ConfigValue::Bool(build_contacts), contacts_src);
        record.set("nlist.faces", ConfigValue::Bool(build_faces), faces_src);

        let contact_rule = match self.contact_distance {
            Some(d) => {
                record.set("nlist.contact_distance", ConfigValue::Float(d), Provenance::Explicit);
                ContactRule::Fixed(d)
            }
            None => {
                record.set(
                    "nlist.contact_distance",
                    ConfigValue::Text("radius_sum"),
                    Provenance::Default,
                );
                ContactRule::RadiusSum
            }
        };

        Ok(ResolvedConfig {
            cutoff,
            pad,
            contact_rule,
            build_contacts,
            build_faces,
            allow_cell_list: build_type == BuildStrategy::CellList,
            record,
        })
    }
}

fn pick<T>(value: Option<T>, default: T) -> (T, Provenance) {
    match value {
        Some(v) => (v, Provenance::Explicit),
        None => (default, Provenance::Default),
    }
}

// ── ResolvedConfig ─────────────────────────────────────────────────

/// A validated configuration with every default applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    cutoff: f64,
    pad: f64,
    contact_rule: ContactRule,
    build_contacts: bool,
    build_faces: bool,
    allow_cell_list: bool,
    record: ConfigRecord,
}

impl ResolvedConfig {
    /// Interaction cutoff.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Verlet skin.
    pub fn pad(&self) -> f64 {
        self.pad
    }

    /// `cutoff + pad`, the radius neighbours are collected within.
    pub fn search_radius(&self) -> f64 {
        self.cutoff + self.pad
    }

    /// How contact distances are chosen.
    pub fn contact_rule(&self) -> ContactRule {
        self.contact_rule
    }

    /// Whether contacts are derived after each build.
    pub fn build_contacts(&self) -> bool {
        self.build_contacts
    }

    /// Whether faces are extracted after each build.
    pub fn build_faces(&self) -> bool {
        self.build_faces
    }

    /// Whether cell-list search may be attempted.
    pub fn allow_cell_list(&self) -> bool {
        self.allow_cell_list
    }

    /// The provenance record.
    pub fn record(&self) -> &ConfigRecord {
        &self.record
    }

    /// Replace the cutoff after a rescale. The caller has validated it.
    pub(crate) fn set_cutoff(&mut self, cutoff: f64) {
        self.cutoff = cutoff;
        let provenance = self
            .record
            .get("nlist.cut")
            .map_or(Provenance::Explicit, |e| e.provenance);
        self.record.set("nlist.cut", ConfigValue::Float(cutoff), provenance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cutoff_is_fatal() {
        assert_eq!(
            NeighbourListConfig::default().resolve(),
            Err(ConfigError::MissingParameter { name: "nlist.cut" })
        );
    }

    #[test]
    fn invalid_values_rejected() {
        for cutoff in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                NeighbourListConfig::new(cutoff).validate(),
                Err(ConfigError::InvalidParameter { name: "nlist.cut", .. })
            ));
        }
        assert!(matches!(
            NeighbourListConfig::new(1.0).with_pad(-0.1).validate(),
            Err(ConfigError::InvalidParameter { name: "nlist.pad", .. })
        ));
        assert!(matches!(
            NeighbourListConfig::new(1.0).with_contact_distance(0.0).validate(),
            Err(ConfigError::InvalidParameter {
                name: "nlist.contact_distance",
                ..
            })
        ));
    }

    #[test]
    fn contact_distance_bounded_by_search_radius() {
        let err = NeighbourListConfig::new(1.0)
            .with_pad(0.2)
            .with_contact_distance(1.5)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ContactExceedsSearch {
                contact: 1.5,
                search: 1.2
            }
        );
        assert!(NeighbourListConfig::new(1.0)
            .with_pad(0.2)
            .with_contact_distance(1.2)
            .validate()
            .is_ok());
    }

    #[test]
    fn defaults_are_recorded() {
        let r = NeighbourListConfig::new(2.0).resolve().unwrap();
        assert_eq!(r.pad(), DEFAULT_PAD);
        assert_eq!(r.search_radius(), 2.5);
        assert_eq!(r.contact_rule(), ContactRule::RadiusSum);
        assert!(r.allow_cell_list());
        assert!(!r.build_contacts() && !r.build_faces());
        let defaulted: Vec<_> = r.record().defaulted().collect();
        assert_eq!(
            defaulted,
            vec![
                "nlist.pad",
                "nlist.build_type",
                "nlist.contact_network",
                "nlist.faces",
                "nlist.contact_distance"
            ]
        );
        assert_eq!(r.record().len(), 6);
    }

    #[test]
    fn explicit_values_recorded() {
        let r = NeighbourListConfig::new(2.0)
            .with_pad(0.3)
            .with_contact_distance(1.0)
            .with_build_type(BuildStrategy::AllPairs)
            .with_contacts(true)
            .resolve()
            .unwrap();
        assert!(!r.allow_cell_list());
        assert_eq!(r.contact_rule(), ContactRule::Fixed(1.0));
        assert_eq!(r.record().defaulted().collect::<Vec<_>>(), vec!["nlist.faces"]);
        assert_eq!(
            r.record().get("nlist.build_type").map(|e| e.value),
            Some(ConfigValue::Text("n_square"))
        );
    }

    #[test]
    fn faces_imply_contacts() {
        let r = NeighbourListConfig::new(2.0)
            .with_contacts(false)
            .with_faces(true)
            .resolve()
            .unwrap();
        assert!(r.build_contacts());
        assert_eq!(
            r.record().get("nlist.contact_network").map(|e| e.provenance),
            Some(Provenance::Implied)
        );
    }

    #[test]
    fn record_display_lists_entries() {
        let r = NeighbourListConfig::new(1.5).resolve().unwrap();
        let text = r.record().to_string();
        assert!(text.starts_with("nlist.cut = 1.5 (explicit); nlist.pad = 0.5 (default)"));
        assert!(text.contains("nlist.contact_distance = radius_sum (default)"));
    }

    #[test]
    fn set_cutoff_updates_record() {
        let mut r = NeighbourListConfig::new(1.0).resolve().unwrap();
        r.set_cutoff(2.0);
        assert_eq!(r.cutoff(), 2.0);
        assert_eq!(
            r.record().get("nlist.cut").map(|e| e.value),
            Some(ConfigValue::Float(2.0))
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ConfigError::MissingParameter { name: "nlist.cut" }.to_string(),
            "missing required parameter nlist.cut"
        );
    }
}
