//!
//! # MultiNetworkPolicy builders
//!
//! Policies are assembled from ingress rules, which are themselves built
//! fragment by fragment with [`IngressRuleBuilder`].
//!
use tracing::trace;

use kinfra_client::SharedClient;
use kinfra_client::StoreClient;
use kinfra_types::LabelSelector;
use kinfra_types::networkpolicy::IpBlock;
use kinfra_types::networkpolicy::MultiNetworkPolicyIngressRule;
use kinfra_types::networkpolicy::MultiNetworkPolicyPeer;
use kinfra_types::networkpolicy::MultiNetworkPolicyPort;
use kinfra_types::networkpolicy::MultiNetworkPolicySpec;
use kinfra_types::networkpolicy::POLICY_FOR_ANNOTATION;
use kinfra_types::networkpolicy::PolicyType;
use kinfra_types::networkpolicy::Protocol;

use crate::BuilderError;
use crate::ResourceBuilder;
use crate::net::parse_cidr;

resource_builder!(
    /// Builder for `MultiNetworkPolicy` objects
    MultiNetworkPolicyBuilder,
    MultiNetworkPolicySpec
);

impl<C> MultiNetworkPolicyBuilder<C>
where
    C: StoreClient,
{
    pub fn new(
        client: impl Into<Option<SharedClient<C>>>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self(ResourceBuilder::new(client, name, namespace))
    }

    pub async fn pull(
        client: impl Into<Option<SharedClient<C>>>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<Self, BuilderError> {
        ResourceBuilder::pull(client, name, namespace).await.map(Self)
    }

    /// Bind the policy to a network attachment definition.
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        let network = network.into();
        self.update_definition(|definition| {
            if network.is_empty() {
                return Err(BuilderError::invalid_field(
                    "network",
                    "network attachment name cannot be empty",
                ));
            }
            definition
                .metadata
                .annotations
                .insert(POLICY_FOR_ANNOTATION.to_owned(), network);
            Ok(())
        });
        self
    }

    pub fn with_pod_selector(mut self, selector: LabelSelector) -> Self {
        self.update_definition(|definition| {
            definition.spec.pod_selector = selector;
            Ok(())
        });
        self
    }

    /// add a policy type, repeated types are kept once
    pub fn with_policy_type(mut self, policy_type: PolicyType) -> Self {
        self.update_definition(|definition| {
            if !definition.spec.policy_types.contains(&policy_type) {
                definition.spec.policy_types.push(policy_type);
            }
            Ok(())
        });
        self
    }

    /// Append the rule assembled by `rule`.
    /// A poisoned rule builder poisons the policy builder with the same error.
    pub fn with_ingress_rule(mut self, rule: &IngressRuleBuilder) -> Self {
        self.update_definition(|definition| {
            definition.spec.ingress.push(rule.build()?);
            Ok(())
        });
        self
    }
}

/// Mutation applied by [`IngressRuleBuilder::with_options`].
pub type IngressRuleOption =
    Box<dyn FnOnce(IngressRuleBuilder) -> Result<IngressRuleBuilder, BuilderError> + Send>;

/// Assembles a [`MultiNetworkPolicyIngressRule`] from port and peer fragments.
///
/// Every call consumes the builder and hands back a new one. The first invalid
/// fragment turns the builder into an error that later calls pass through
/// untouched and that [`IngressRuleBuilder::build`] returns.
#[derive(Debug, Clone)]
pub struct IngressRuleBuilder {
    rule: Result<MultiNetworkPolicyIngressRule, BuilderError>,
}

impl Default for IngressRuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IngressRuleBuilder {
    pub fn new() -> Self {
        Self {
            rule: Ok(MultiNetworkPolicyIngressRule::default()),
        }
    }

    fn and_then<F>(self, f: F) -> Self
    where
        F: FnOnce(MultiNetworkPolicyIngressRule) -> Result<MultiNetworkPolicyIngressRule, BuilderError>,
    {
        Self {
            rule: self.rule.and_then(f),
        }
    }

    pub fn is_poisoned(&self) -> bool {
        self.rule.is_err()
    }

    pub fn with_port_and_protocol(self, port: u16, protocol: Protocol) -> Self {
        self.and_then(|mut rule| {
            if port == 0 {
                return Err(BuilderError::InvalidPort);
            }
            rule.ports.push(MultiNetworkPolicyPort {
                protocol: Some(protocol),
                port: Some(port.into()),
            });
            Ok(rule)
        })
    }

    /// add a peer matching pods by label
    pub fn with_peer_pod_selector(self, selector: LabelSelector) -> Self {
        self.and_then(|mut rule| {
            rule.from.push(MultiNetworkPolicyPeer {
                pod_selector: Some(selector),
                ..Default::default()
            });
            Ok(rule)
        })
    }

    /// Set the IP block of the last peer, adding a peer if there is none.
    pub fn with_cidr(self, cidr: &str, except: &[&str]) -> Self {
        self.and_then(|mut rule| {
            parse_cidr(cidr)?;
            for exception in except {
                parse_cidr(exception)?;
            }

            let ip_block = IpBlock {
                cidr: cidr.to_owned(),
                except: except.iter().map(|e| (*e).to_owned()).collect(),
            };
            match rule.from.last_mut() {
                Some(peer) => peer.ip_block = Some(ip_block),
                None => rule.from.push(MultiNetworkPolicyPeer {
                    ip_block: Some(ip_block),
                    ..Default::default()
                }),
            }
            Ok(rule)
        })
    }

    /// one peer carrying both a pod selector and an IP block
    pub fn with_peer_pod_selector_and_cidr(
        self,
        selector: LabelSelector,
        cidr: &str,
        except: &[&str],
    ) -> Self {
        self.with_peer_pod_selector(selector).with_cidr(cidr, except)
    }

    /// Apply `options` in order, stopping at the first one that fails.
    pub fn with_options<I, F>(self, options: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: FnOnce(Self) -> Result<Self, BuilderError>,
    {
        let mut builder = self;
        for option in options {
            if builder.is_poisoned() {
                trace!("rule poisoned, skipping remaining options");
                break;
            }
            builder = match option(builder) {
                Ok(next) => next,
                Err(err) => Self { rule: Err(err) },
            };
        }
        builder
    }

    /// The assembled rule, or the error that poisoned the builder.
    pub fn build(&self) -> Result<MultiNetworkPolicyIngressRule, BuilderError> {
        self.rule.clone()
    }
}
