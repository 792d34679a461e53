//! # Custom-Attribute Pairing Resolver
//!
//! Derives a comparison key for every host and datastore from a custom
//! attribute and flags VMs whose backing datastores carry a different key
//! than the host they run on.
//!
//! Raw [`PairingOptions`] allow two configuration modes (one attribute shared
//! by both resource kinds, or one attribute per kind). They are resolved once
//! into a [`PairingConfig`] so evaluation never looks at the mode again.

use crate::api::errors::ConfigurationError;
use crate::evaluation::{scope_of, CheckEvaluation};
use crate::filter::ScopedInventory;
use crate::log_debug;
use crate::results::{EvaluationResult, Observed};
use crate::types::inventory::{AsInventoryObject, InventoryObject, ObjectRef, VirtualMachine};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const OPT_SHARED_ATTRIBUTE: &str = "custom-attribute";
pub const OPT_SHARED_SEPARATOR: &str = "separator";
pub const OPT_HOST_ATTRIBUTE: &str = "host-attribute";
pub const OPT_HOST_SEPARATOR: &str = "host-separator";
pub const OPT_DATASTORE_ATTRIBUTE: &str = "datastore-attribute";
pub const OPT_DATASTORE_SEPARATOR: &str = "datastore-separator";

/// Pairing options exactly as configured, before mode resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PairingOptions {
    pub shared_attribute: Option<String>,
    pub shared_separator: Option<String>,
    pub host_attribute: Option<String>,
    pub host_separator: Option<String>,
    pub datastore_attribute: Option<String>,
    pub datastore_separator: Option<String>,
    /// Skip objects lacking the attribute instead of flagging them
    pub ignore_missing: bool,
}

impl PairingOptions {
    /// Fill unset fields from `fallback`
    pub fn or(self, fallback: PairingOptions) -> PairingOptions {
        PairingOptions {
            shared_attribute: self.shared_attribute.or(fallback.shared_attribute),
            shared_separator: self.shared_separator.or(fallback.shared_separator),
            host_attribute: self.host_attribute.or(fallback.host_attribute),
            host_separator: self.host_separator.or(fallback.host_separator),
            datastore_attribute: self.datastore_attribute.or(fallback.datastore_attribute),
            datastore_separator: self.datastore_separator.or(fallback.datastore_separator),
            ignore_missing: self.ignore_missing || fallback.ignore_missing,
        }
    }

    fn shared_options_set(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        if self.shared_attribute.is_some() {
            set.push(OPT_SHARED_ATTRIBUTE);
        }
        if self.shared_separator.is_some() {
            set.push(OPT_SHARED_SEPARATOR);
        }
        set
    }

    fn per_resource_options_set(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        if self.host_attribute.is_some() {
            set.push(OPT_HOST_ATTRIBUTE);
        }
        if self.host_separator.is_some() {
            set.push(OPT_HOST_SEPARATOR);
        }
        if self.datastore_attribute.is_some() {
            set.push(OPT_DATASTORE_ATTRIBUTE);
        }
        if self.datastore_separator.is_some() {
            set.push(OPT_DATASTORE_SEPARATOR);
        }
        set
    }
}

/// Attribute name and optional separator for one resource kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeKeySpec {
    pub attribute: String,
    pub separator: Option<char>,
}

impl AttributeKeySpec {
    pub fn derive_key(&self, raw: &str) -> ComparisonKey {
        ComparisonKey::derive(raw, self.separator)
    }
}

/// Resolved pairing configuration, one key spec per resource kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingConfig {
    pub host: AttributeKeySpec,
    pub datastore: AttributeKeySpec,
    pub ignore_missing: bool,
}

impl PairingConfig {
    /// Validate mode exclusivity and produce the resolved tuple
    pub fn resolve(options: &PairingOptions) -> Result<Self, ConfigurationError> {
        let shared = options.shared_options_set();
        let per_resource = options.per_resource_options_set();

        if let (Some(first), Some(second)) = (shared.first(), per_resource.first()) {
            return Err(ConfigurationError::conflict(first, second));
        }

        if !shared.is_empty() {
            let attribute = required_attribute(
                &options.shared_attribute,
                OPT_SHARED_ATTRIBUTE,
                OPT_SHARED_SEPARATOR,
            )?;
            let separator = parse_separator(OPT_SHARED_SEPARATOR, &options.shared_separator)?;
            let spec = AttributeKeySpec {
                attribute,
                separator,
            };
            return Ok(Self {
                host: spec.clone(),
                datastore: spec,
                ignore_missing: options.ignore_missing,
            });
        }

        if !per_resource.is_empty() {
            let host = AttributeKeySpec {
                attribute: required_attribute(
                    &options.host_attribute,
                    OPT_HOST_ATTRIBUTE,
                    per_resource[0],
                )?,
                separator: parse_separator(OPT_HOST_SEPARATOR, &options.host_separator)?,
            };
            let datastore = AttributeKeySpec {
                attribute: required_attribute(
                    &options.datastore_attribute,
                    OPT_DATASTORE_ATTRIBUTE,
                    per_resource[0],
                )?,
                separator: parse_separator(
                    OPT_DATASTORE_SEPARATOR,
                    &options.datastore_separator,
                )?,
            };
            return Ok(Self {
                host,
                datastore,
                ignore_missing: options.ignore_missing,
            });
        }

        Err(ConfigurationError::missing_required(OPT_SHARED_ATTRIBUTE))
    }
}

fn required_attribute(
    value: &Option<String>,
    option: &str,
    given: &str,
) -> Result<String, ConfigurationError> {
    match value.as_deref().map(str::trim) {
        Some("") => Err(ConfigurationError::invalid_value(
            option,
            "",
            "attribute name must not be empty",
        )),
        Some(name) => Ok(name.to_string()),
        None if given == option => Err(ConfigurationError::missing_required(option)),
        None => Err(ConfigurationError::missing_partner(given, option)),
    }
}

fn parse_separator(option: &str, value: &Option<String>) -> Result<Option<char>, ConfigurationError> {
    let Some(raw) = value else {
        return Ok(None);
    };

    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(separator), None) => Ok(Some(separator)),
        _ => Err(ConfigurationError::invalid_value(
            option,
            raw,
            "separator must be exactly one character",
        )),
    }
}

/// Key derived from an attribute value, compared case-insensitively
#[derive(Debug, Clone)]
pub struct ComparisonKey {
    value: String,
    folded: String,
}

impl ComparisonKey {
    /// Keep the segment before the first `separator`; the whole value when
    /// the separator is unset or does not occur
    pub fn derive(raw: &str, separator: Option<char>) -> Self {
        let value = match separator {
            Some(separator) => raw.split(separator).next().unwrap_or(raw),
            None => raw,
        };
        Self {
            value: value.to_string(),
            folded: value.to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl PartialEq for ComparisonKey {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for ComparisonKey {}

impl fmt::Display for ComparisonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// `None` marks an object that lacks the attribute
type KeyIndex<'a> = HashMap<&'a str, Option<ComparisonKey>>;

/// Host/datastore pairing evaluator for one resolved configuration
#[derive(Debug, Clone)]
pub struct PairingResolver {
    config: PairingConfig,
}

impl PairingResolver {
    pub fn new(config: PairingConfig) -> Self {
        Self { config }
    }

    /// Hosts and in-scope datastores carrying the attribute (all of them
    /// unless missing attributes are ignored), then every in-scope VM
    pub fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
        let keyed = |object: &InventoryObject<'_>, spec: &AttributeKeySpec| {
            !self.config.ignore_missing
                || scoped.attributes().get(object.id(), &spec.attribute).is_some()
        };

        let hosts = scoped
            .hosts()
            .iter()
            .map(InventoryObject::Host)
            .filter(|object| keyed(object, &self.config.host));
        let datastores = scoped
            .datastores
            .iter()
            .map(|&ds| InventoryObject::Datastore(ds))
            .filter(|object| keyed(object, &self.config.datastore));

        hosts
            .chain(datastores)
            .map(|object| object.object_ref())
            .chain(scope_of(scoped.virtual_machines.iter().copied()))
            .collect()
    }

    /// Evaluate hosts, in-scope datastores and in-scope VMs
    pub fn evaluate(&self, scoped: &ScopedInventory<'_>) -> CheckEvaluation {
        let mut evaluation = CheckEvaluation::new();

        let host_keys = self.index(
            scoped.hosts().iter().map(InventoryObject::Host),
            &self.config.host,
            scoped,
            &mut evaluation,
        );
        let datastore_keys = self.index(
            scoped
                .datastores
                .iter()
                .map(|&ds| InventoryObject::Datastore(ds)),
            &self.config.datastore,
            scoped,
            &mut evaluation,
        );

        log_debug!("Pairing key indexes built",
            "hosts" => host_keys.len(),
            "datastores" => datastore_keys.len(),
            "ignore_missing" => self.config.ignore_missing
        );

        for vm in &scoped.virtual_machines {
            evaluation.record(self.evaluate_vm(vm, scoped, &host_keys, &datastore_keys));
        }

        evaluation
    }

    /// Derive keys once; a missing attribute is a CRITICAL result for the
    /// object unless missing attributes are ignored
    fn index<'a>(
        &self,
        objects: impl Iterator<Item = InventoryObject<'a>>,
        spec: &AttributeKeySpec,
        scoped: &ScopedInventory<'_>,
        evaluation: &mut CheckEvaluation,
    ) -> KeyIndex<'a> {
        let mut index = KeyIndex::new();

        for object in objects {
            match scoped.attributes().get(object.id(), &spec.attribute) {
                Some(raw) => {
                    let key = spec.derive_key(raw);
                    evaluation.record(EvaluationResult::ok(
                        object.object_ref(),
                        Observed::Key(key.to_string()),
                        format!("attribute '{}' yields key '{}'", spec.attribute, key),
                    ));
                    index.insert(object.id(), Some(key));
                }
                None if self.config.ignore_missing => {
                    index.insert(object.id(), None);
                }
                None => {
                    evaluation.record(EvaluationResult::critical(
                        object.object_ref(),
                        Observed::Absent,
                        format!("missing required attribute '{}'", spec.attribute),
                    ));
                    index.insert(object.id(), None);
                }
            }
        }

        index
    }

    fn evaluate_vm(
        &self,
        vm: &VirtualMachine,
        scoped: &ScopedInventory<'_>,
        host_keys: &KeyIndex<'_>,
        datastore_keys: &KeyIndex<'_>,
    ) -> EvaluationResult {
        let object = vm.object_ref();

        let host = match vm.host.as_deref() {
            None => {
                return EvaluationResult::critical(
                    object,
                    Observed::Absent,
                    "VM is not assigned to any host",
                )
            }
            Some(id) => match scoped.host(id) {
                Some(host) => host,
                None => {
                    return EvaluationResult::critical(
                        object,
                        Observed::Absent,
                        format!("host '{}' not found in inventory", id),
                    )
                }
            },
        };

        let host_key = match host_keys.get(host.id.as_str()) {
            Some(Some(key)) => key,
            _ => {
                return EvaluationResult::ok(
                    object,
                    Observed::Absent,
                    format!(
                        "pairing skipped: host '{}' has no '{}' attribute",
                        host.name, self.config.host.attribute
                    ),
                )
            }
        };

        let mut mismatches = Vec::new();
        let mut compared = 0usize;

        for datastore_id in &vm.datastores {
            if !scoped.is_datastore_in_scope(datastore_id) {
                if scoped.datastore(datastore_id).is_none() {
                    mismatches.push(format!(
                        "backing datastore '{}' not found in inventory",
                        datastore_id
                    ));
                }
                continue;
            }

            // Datastores without the attribute are excluded from comparison
            if let Some(Some(key)) = datastore_keys.get(datastore_id.as_str()) {
                compared += 1;
                if key != host_key {
                    let name = scoped
                        .datastore(datastore_id)
                        .map_or(datastore_id.as_str(), |ds| ds.name.as_str());
                    mismatches.push(format!(
                        "datastore '{}' key '{}' differs from host '{}' key '{}'",
                        name, key, host.name, host_key
                    ));
                }
            }
        }

        let observed = Observed::Key(host_key.to_string());
        if !mismatches.is_empty() {
            EvaluationResult::critical(object, observed, mismatches.join("; "))
        } else if compared == 0 {
            EvaluationResult::ok(
                object,
                observed,
                "no keyed datastore to compare with host",
            )
        } else {
            EvaluationResult::ok(
                object,
                observed,
                format!("{} datastore(s) match host key '{}'", compared, host_key),
            )
        }
    }
}
