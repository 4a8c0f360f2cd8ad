//! Data model for alerting configuration documents.
//!
//! A document is a [`UserConfig`]: template files plus an
//! [`ApiAlertingConfig`], which composes the generic routing configuration
//! ([`RoutingConfig`]) with a list of [`Receiver`]s. Receivers are generic
//! over the managed-receiver shape so the read-model (`Gettable*`) and the
//! write-model (`Postable*`) share one set of rules.
//!
//! Validated types keep their fields private. The only ways to obtain one
//! are decoding (see [`crate::alerting::decoder`]) or `TryFrom` on the raw
//! shape, both of which run [`crate::alerting::validator::validate`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::classifier;
use super::error::ValidationError;
use super::validator;

/// Settings object for a single native integration. Delivery happens
/// elsewhere, so the contents are carried through untouched.
pub type IntegrationConfig = serde_json::Map<String, Value>;

/// Reads an explicit `null` as the field's default. Upstream writers emit
/// `null` for empty lists and maps.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---- Routing tree ----

/// A node in the routing tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Receiver notified by this route. Child routes without one inherit
    /// their parent's receiver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,

    #[serde(rename = "match", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_re: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matchers: Vec<String>,

    #[serde(rename = "continue", default, skip_serializing_if = "std::ops::Not::not")]
    pub continue_matching: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mute_time_intervals: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
}

impl Route {
    /// Route pointing at `receiver` with no children.
    pub fn to_receiver(receiver: impl Into<String>) -> Self {
        Self {
            receiver: Some(receiver.into()),
            ..Self::default()
        }
    }

    /// Builder-style helper that appends a child route.
    pub fn with_child(mut self, child: Route) -> Self {
        self.routes.push(child);
        self
    }
}

/// Generic routing configuration shared by every document variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inhibit_rules: Vec<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mute_time_intervals: Vec<Value>,
}

// ---- Native integrations ----

/// Built-in notification channel kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrationKind {
    Email,
    PagerDuty,
    Slack,
    Webhook,
    OpsGenie,
    WeChat,
    Pushover,
    VictorOps,
}

impl IntegrationKind {
    /// Every kind, in the order receivers are checked for mixing.
    pub const ALL: [IntegrationKind; 8] = [
        IntegrationKind::Email,
        IntegrationKind::PagerDuty,
        IntegrationKind::Slack,
        IntegrationKind::Webhook,
        IntegrationKind::OpsGenie,
        IntegrationKind::WeChat,
        IntegrationKind::Pushover,
        IntegrationKind::VictorOps,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IntegrationKind::Email => "Email",
            IntegrationKind::PagerDuty => "PagerDuty",
            IntegrationKind::Slack => "Slack",
            IntegrationKind::Webhook => "Webhook",
            IntegrationKind::OpsGenie => "OpsGenie",
            IntegrationKind::WeChat => "WeChat",
            IntegrationKind::Pushover => "Pushover",
            IntegrationKind::VictorOps => "VictorOps",
        }
    }
}

impl fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Upstream receiver shape: a name plus one list per native integration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeReceiver {
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub email_configs: Vec<IntegrationConfig>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub pagerduty_configs: Vec<IntegrationConfig>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub slack_configs: Vec<IntegrationConfig>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub webhook_configs: Vec<IntegrationConfig>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub opsgenie_configs: Vec<IntegrationConfig>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub wechat_configs: Vec<IntegrationConfig>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub pushover_configs: Vec<IntegrationConfig>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub victorops_configs: Vec<IntegrationConfig>,
}

impl NativeReceiver {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Configs registered for one integration kind.
    pub fn configs(&self, kind: IntegrationKind) -> &[IntegrationConfig] {
        match kind {
            IntegrationKind::Email => &self.email_configs,
            IntegrationKind::PagerDuty => &self.pagerduty_configs,
            IntegrationKind::Slack => &self.slack_configs,
            IntegrationKind::Webhook => &self.webhook_configs,
            IntegrationKind::OpsGenie => &self.opsgenie_configs,
            IntegrationKind::WeChat => &self.wechat_configs,
            IntegrationKind::Pushover => &self.pushover_configs,
            IntegrationKind::VictorOps => &self.victorops_configs,
        }
    }

    /// Mutable access to the configs of one integration kind.
    pub fn configs_mut(&mut self, kind: IntegrationKind) -> &mut Vec<IntegrationConfig> {
        match kind {
            IntegrationKind::Email => &mut self.email_configs,
            IntegrationKind::PagerDuty => &mut self.pagerduty_configs,
            IntegrationKind::Slack => &mut self.slack_configs,
            IntegrationKind::Webhook => &mut self.webhook_configs,
            IntegrationKind::OpsGenie => &mut self.opsgenie_configs,
            IntegrationKind::WeChat => &mut self.wechat_configs,
            IntegrationKind::Pushover => &mut self.pushover_configs,
            IntegrationKind::VictorOps => &mut self.victorops_configs,
        }
    }

    /// Kinds with at least one config, in check order.
    pub fn populated_kinds(&self) -> impl Iterator<Item = IntegrationKind> + '_ {
        IntegrationKind::ALL
            .into_iter()
            .filter(move |kind| !self.configs(*kind).is_empty())
    }

    pub fn has_integrations(&self) -> bool {
        self.populated_kinds().next().is_some()
    }
}

// ---- Managed receivers ----

/// Managed receiver as accepted from a client (write-model).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostableManagedReceiver {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub send_reminder: bool,

    #[serde(default)]
    pub disable_resolve_message: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub frequency: String,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default)]
    pub settings: Value,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub secure_settings: BTreeMap<String, String>,
}

/// Managed receiver as returned to a client (read-model). Secure settings
/// are never echoed back; only which of them are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GettableManagedReceiver {
    #[serde(default)]
    pub id: i64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default)]
    pub send_reminder: bool,

    #[serde(default)]
    pub disable_resolve_message: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub frequency: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,

    #[serde(default)]
    pub settings: Value,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub secure_fields: BTreeMap<String, bool>,
}

impl GettableManagedReceiver {
    /// Read-model view of an accepted write-model receiver.
    pub fn from_postable(postable: PostableManagedReceiver, id: i64, at: DateTime<Utc>) -> Self {
        let secure_fields = postable
            .secure_settings
            .into_keys()
            .map(|key| (key, true))
            .collect();

        Self {
            id,
            uid: postable.uid,
            name: postable.name,
            kind: postable.kind,
            is_default: postable.is_default,
            send_reminder: postable.send_reminder,
            disable_resolve_message: postable.disable_resolve_message,
            frequency: postable.frequency,
            created: Some(at),
            updated: Some(at),
            settings: postable.settings,
            secure_fields,
        }
    }
}

// ---- Receivers ----

/// Which delivery mechanism a single receiver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiverType {
    Native,
    Managed,
}

/// Which delivery mechanism a whole document uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// No receiver exists to classify.
    #[default]
    Undetermined,
    Grafana,
    Alertmanager,
}

impl From<ReceiverType> for Backend {
    fn from(receiver_type: ReceiverType) -> Self {
        match receiver_type {
            ReceiverType::Managed => Backend::Grafana,
            ReceiverType::Native => Backend::Alertmanager,
        }
    }
}

/// A named notification target: the upstream receiver shape composed with
/// the managed receiver list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "M: Serialize", deserialize = "M: Deserialize<'de>"))]
pub struct Receiver<M> {
    #[serde(flatten)]
    pub native: NativeReceiver,

    #[serde(
        rename = "grafana_managed_receiver_configs",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub managed: Vec<M>,
}

impl<M> Receiver<M> {
    pub fn new(native: NativeReceiver, managed: Vec<M>) -> Self {
        Self { native, managed }
    }

    pub fn name(&self) -> &str {
        &self.native.name
    }

    pub fn native(&self) -> &NativeReceiver {
        &self.native
    }

    pub fn managed(&self) -> &[M] {
        &self.managed
    }

    pub fn receiver_type(&self) -> ReceiverType {
        classifier::receiver_type(self)
    }
}

pub type PostableApiReceiver = Receiver<PostableManagedReceiver>;
pub type GettableApiReceiver = Receiver<GettableManagedReceiver>;

// ---- Documents ----

/// Structural shape of [`ApiAlertingConfig`] before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "M: Serialize", deserialize = "M: Deserialize<'de>"))]
pub struct RawApiAlertingConfig<M> {
    #[serde(flatten)]
    pub routing: RoutingConfig,

    #[serde(default, deserialize_with = "null_as_default")]
    pub receivers: Vec<Receiver<M>>,
}

/// Structural shape of [`UserConfig`] before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "M: Serialize", deserialize = "M: Deserialize<'de>"))]
pub struct RawUserConfig<M> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub template_files: BTreeMap<String, String>,

    pub alertmanager_config: RawApiAlertingConfig<M>,
}

/// Validated routing configuration plus receivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawApiAlertingConfig<M>",
    bound(serialize = "M: Serialize", deserialize = "M: Deserialize<'de>")
)]
pub struct ApiAlertingConfig<M> {
    #[serde(flatten)]
    routing: RoutingConfig,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    receivers: Vec<Receiver<M>>,

    #[serde(skip)]
    backend: Backend,
}

impl<M> TryFrom<RawApiAlertingConfig<M>> for ApiAlertingConfig<M> {
    type Error = ValidationError;

    fn try_from(raw: RawApiAlertingConfig<M>) -> Result<Self, Self::Error> {
        validator::validate(&raw)?;
        let backend = classifier::classify(&raw.receivers);

        Ok(Self {
            routing: raw.routing,
            receivers: raw.receivers,
            backend,
        })
    }
}

impl<M> ApiAlertingConfig<M> {
    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    pub fn route(&self) -> Option<&Route> {
        self.routing.route.as_ref()
    }

    pub fn receivers(&self) -> &[Receiver<M>] {
        &self.receivers
    }

    pub fn receiver(&self, name: &str) -> Option<&Receiver<M>> {
        self.receivers.iter().find(|r| r.name() == name)
    }

    /// Backend shared by every receiver, computed once at validation time.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Replace every managed receiver entry while keeping the document's
    /// structure. Per-receiver entry counts are unchanged, so the result
    /// satisfies the same invariants without re-validation.
    pub fn map_managed<N>(self, mut f: impl FnMut(M) -> N) -> ApiAlertingConfig<N> {
        let receivers = self
            .receivers
            .into_iter()
            .map(|receiver| Receiver {
                native: receiver.native,
                managed: receiver.managed.into_iter().map(&mut f).collect(),
            })
            .collect();

        ApiAlertingConfig {
            routing: self.routing,
            receivers,
            backend: self.backend,
        }
    }

    pub fn into_raw(self) -> RawApiAlertingConfig<M> {
        RawApiAlertingConfig {
            routing: self.routing,
            receivers: self.receivers,
        }
    }
}

/// A complete, validated alerting configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "M: Serialize", deserialize = "M: Deserialize<'de>"))]
pub struct UserConfig<M> {
    #[serde(default, deserialize_with = "null_as_default")]
    template_files: BTreeMap<String, String>,

    alertmanager_config: ApiAlertingConfig<M>,
}

impl<M> TryFrom<RawUserConfig<M>> for UserConfig<M> {
    type Error = ValidationError;

    fn try_from(raw: RawUserConfig<M>) -> Result<Self, Self::Error> {
        Ok(Self {
            template_files: raw.template_files,
            alertmanager_config: ApiAlertingConfig::try_from(raw.alertmanager_config)?,
        })
    }
}

impl<M> UserConfig<M> {
    pub fn template_files(&self) -> &BTreeMap<String, String> {
        &self.template_files
    }

    pub fn alertmanager_config(&self) -> &ApiAlertingConfig<M> {
        &self.alertmanager_config
    }

    pub fn backend(&self) -> Backend {
        self.alertmanager_config.backend()
    }

    pub fn map_managed<N>(self, f: impl FnMut(M) -> N) -> UserConfig<N> {
        UserConfig {
            template_files: self.template_files,
            alertmanager_config: self.alertmanager_config.map_managed(f),
        }
    }

    pub fn into_raw(self) -> RawUserConfig<M> {
        RawUserConfig {
            template_files: self.template_files,
            alertmanager_config: self.alertmanager_config.into_raw(),
        }
    }
}

pub type PostableApiAlertingConfig = ApiAlertingConfig<PostableManagedReceiver>;
pub type GettableApiAlertingConfig = ApiAlertingConfig<GettableManagedReceiver>;

/// Write-model document accepted from a client.
pub type PostableUserConfig = UserConfig<PostableManagedReceiver>;
/// Read-model document returned to a client.
pub type GettableUserConfig = UserConfig<GettableManagedReceiver>;

impl PostableUserConfig {
    /// Read-model view of this document. Managed receivers are numbered
    /// from 1 in document order and stamped with `at`.
    pub fn to_gettable(&self, at: DateTime<Utc>) -> GettableUserConfig {
        let mut next_id = 0;
        self.clone().map_managed(|postable| {
            next_id += 1;
            GettableManagedReceiver::from_postable(postable, next_id, at)
        })
    }
}
