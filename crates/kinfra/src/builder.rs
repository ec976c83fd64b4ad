use std::fmt;

use tracing::debug;
use tracing::instrument;
use tracing::trace;
use tracing::warn;

use kinfra_client::SharedClient;
use kinfra_client::StoreClient;
use kinfra_client::StoreClientError;
use kinfra_types::K8Obj;
use kinfra_types::ObjectKey;
use kinfra_types::Spec;

use crate::BuilderError;
use crate::StoreOp;

/// outcome of looking a resource up in the store
#[derive(Debug, Clone)]
pub enum Presence {
    Present,
    Absent,
    /// store answered with something other than "not found"
    Unknown(BuilderError),
}

/// Lifecycle driver for a single resource of kind `S`.
///
/// Holds the desired state (`definition`), the state last observed in the
/// store (`object`) and the first error hit while building. Once that error
/// is recorded every lifecycle call returns it without contacting the store.
pub struct ResourceBuilder<S, C>
where
    S: Spec,
{
    key: ObjectKey,
    definition: Option<K8Obj<S>>,
    object: Option<K8Obj<S>>,
    error: Option<BuilderError>,
    client: Option<SharedClient<C>>,
}

impl<S, C> fmt::Debug for ResourceBuilder<S, C>
where
    S: Spec,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceBuilder")
            .field("kind", &S::label())
            .field("key", &self.key)
            .field("definition", &self.definition)
            .field("object", &self.object)
            .field("error", &self.error)
            .field("client", &self.client.is_some())
            .finish()
    }
}

impl<S, C> ResourceBuilder<S, C>
where
    S: Spec,
    C: StoreClient,
{
    /// Start a builder with an empty definition.
    /// Missing identity or client is recorded, nothing is sent to the store.
    pub fn new<N, NS>(client: impl Into<Option<SharedClient<C>>>, name: N, namespace: NS) -> Self
    where
        N: Into<String>,
        NS: Into<String>,
    {
        let kind = S::label();
        let name = name.into();
        let namespace = if S::NAMESPACED {
            namespace.into()
        } else {
            String::new()
        };
        debug!(kind, %name, %namespace, "initializing builder");

        let client = client.into();
        let error = if name.is_empty() {
            Some(BuilderError::EmptyName { kind })
        } else if S::NAMESPACED && namespace.is_empty() {
            Some(BuilderError::EmptyNamespace { kind })
        } else if client.is_none() {
            Some(BuilderError::MissingClient { kind })
        } else {
            None
        };
        if let Some(err) = &error {
            debug!(kind, %err, "builder poisoned at construction");
        }

        Self {
            key: ObjectKey::new(name.clone(), namespace.clone()),
            definition: Some(K8Obj::new(name, namespace, S::default())),
            object: None,
            error,
            client,
        }
    }

    /// Build from the object already in the store.
    /// The fetched object becomes both the observed and the desired state.
    pub async fn pull<N, NS>(
        client: impl Into<Option<SharedClient<C>>>,
        name: N,
        namespace: NS,
    ) -> Result<Self, BuilderError>
    where
        N: Into<String>,
        NS: Into<String>,
    {
        let mut builder = Self::new(client, name, namespace);
        builder.validate()?;
        debug!(kind = S::label(), key = %builder.key, "pulling");

        match builder.presence().await {
            Presence::Present => {}
            Presence::Absent => {
                return Err(BuilderError::NotFound {
                    kind: S::label(),
                    key: builder.key.clone(),
                });
            }
            Presence::Unknown(err) => return Err(err),
        }

        builder.definition = builder.object.clone();
        Ok(builder)
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    pub fn client(&self) -> Option<&SharedClient<C>> {
        self.client.as_ref()
    }

    /// desired state
    pub fn definition(&self) -> Option<&K8Obj<S>> {
        self.definition.as_ref()
    }

    pub fn definition_mut(&mut self) -> Option<&mut K8Obj<S>> {
        self.definition.as_mut()
    }

    /// remove the desired state; later lifecycle calls fail as undefined
    pub fn take_definition(&mut self) -> Option<K8Obj<S>> {
        self.definition.take()
    }

    /// state last observed in the store, `None` if believed absent
    pub fn object(&self) -> Option<&K8Obj<S>> {
        self.object.as_ref()
    }

    /// first error recorded by this builder
    pub fn error(&self) -> Option<&BuilderError> {
        self.error.as_ref()
    }

    fn poison(&mut self, err: BuilderError) {
        if self.error.is_none() {
            debug!(kind = S::label(), key = %self.key, %err, "builder poisoned");
            self.error = Some(err);
        }
    }

    /// Apply `f` to the definition unless the builder is already poisoned.
    /// An error from `f` poisons the builder, so `f` must check before it mutates.
    pub fn update_definition<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut K8Obj<S>) -> Result<(), BuilderError>,
    {
        if self.error.is_some() {
            trace!(kind = S::label(), key = %self.key, "poisoned, skipping definition update");
            return self;
        }

        let result = match self.definition.as_mut() {
            Some(definition) => f(definition),
            None => Err(BuilderError::Undefined { kind: S::label() }),
        };
        if let Err(err) = result {
            self.poison(err);
        }
        self
    }

    /// Check the builder can talk to the store.
    pub fn validate(&mut self) -> Result<(), BuilderError> {
        let kind = S::label();

        if self.definition.is_none() {
            self.poison(BuilderError::Undefined { kind });
        }
        if self.client.is_none() {
            self.poison(BuilderError::MissingClient { kind });
        }

        match &self.error {
            Some(err) => {
                trace!(kind, key = %self.key, %err, "validation failed");
                Err(err.clone())
            }
            None => Ok(()),
        }
    }

    fn validated_client(&mut self) -> Result<SharedClient<C>, BuilderError> {
        self.validate()?;
        self.client.clone().ok_or(BuilderError::MissingClient { kind: S::label() })
    }

    /// definition as it is sent to the store, pinned to this builder's identity
    fn submission(&self) -> Result<K8Obj<S>, BuilderError> {
        let mut definition = self
            .definition
            .clone()
            .ok_or(BuilderError::Undefined { kind: S::label() })?;
        definition.metadata.name = self.key.name.clone();
        definition.metadata.namespace = self.key.namespace.clone();
        Ok(definition)
    }

    /// fetch into `object`; assumes the builder was validated
    async fn probe(&mut self, client: &C) -> Presence {
        match client.retrieve_item::<S>(&self.key).await {
            Ok(object) => {
                self.object = Some(object);
                Presence::Present
            }
            Err(err) if err.not_found() => {
                self.object = None;
                Presence::Absent
            }
            Err(err) => {
                warn!(kind = S::label(), key = %self.key, %err, "unable to determine presence");
                self.object = None;
                Presence::Unknown(BuilderError::store(StoreOp::Get, S::label(), err))
            }
        }
    }

    /// Look the resource up, refreshing `object`.
    pub async fn presence(&mut self) -> Presence {
        let client = match self.validated_client() {
            Ok(client) => client,
            Err(err) => return Presence::Unknown(err),
        };
        self.probe(&client).await
    }

    /// True if the resource is in the store.
    ///
    /// An invalid builder reports `false`. A store error other than
    /// "not found" reports `true`; use [`Self::presence`] to tell them apart.
    #[instrument(skip(self), fields(kind = S::label(), key = %self.key))]
    pub async fn exists(&mut self) -> bool {
        let Ok(client) = self.validated_client() else {
            return false;
        };
        !matches!(self.probe(&client).await, Presence::Absent)
    }

    /// Fresh copy of the resource from the store. Does not touch `object`.
    pub async fn get(&mut self) -> Result<K8Obj<S>, BuilderError> {
        let client = self.validated_client()?;
        trace!(kind = S::label(), key = %self.key, "getting");

        client
            .retrieve_item::<S>(&self.key)
            .await
            .map_err(|err| BuilderError::store(StoreOp::Get, S::label(), err))
    }

    /// Create the resource unless it is already present.
    #[instrument(skip(self), fields(kind = S::label(), key = %self.key))]
    pub async fn create(&mut self) -> Result<&mut Self, BuilderError> {
        let client = self.validated_client()?;

        match self.probe(&client).await {
            Presence::Present => {
                debug!("already exists, nothing to create");
                return Ok(self);
            }
            Presence::Unknown(err) => return Err(err),
            Presence::Absent => {}
        }

        let created = match client.create_item(self.submission()?).await {
            Ok(created) => created,
            Err(err) if err.already_exists() => {
                debug!("created concurrently, nothing to create");
                return Ok(self);
            }
            Err(err) => return Err(BuilderError::store(StoreOp::Create, S::label(), err)),
        };
        debug!(uid = %created.metadata.uid, "created");

        self.definition = Some(created.clone());
        self.object = Some(created);
        Ok(self)
    }

    /// Replace the resource in the store with the definition.
    #[instrument(skip(self), fields(kind = S::label(), key = %self.key))]
    pub async fn update(&mut self) -> Result<&mut Self, BuilderError> {
        let client = self.validated_client()?;

        let updated = client
            .update_item(self.submission()?)
            .await
            .map_err(|err| BuilderError::store(StoreOp::Update, S::label(), err))?;
        debug!(version = %updated.metadata.resource_version, "updated");

        self.definition = Some(updated.clone());
        self.object = Some(updated);
        Ok(self)
    }

    /// Delete the resource. Deleting an absent resource is an error.
    #[instrument(skip(self), fields(kind = S::label(), key = %self.key))]
    pub async fn delete(&mut self) -> Result<&mut Self, BuilderError> {
        let client = self.validated_client()?;

        match self.probe(&client).await {
            Presence::Present => {}
            Presence::Absent => {
                return Err(BuilderError::DeleteAbsent {
                    kind: S::label(),
                    key: self.key.clone(),
                });
            }
            Presence::Unknown(err) => return Err(err),
        }

        client
            .delete_item::<S>(&self.key)
            .await
            .map_err(|err| BuilderError::store(StoreOp::Delete, S::label(), err))?;
        debug!("deleted");

        self.object = None;
        Ok(self)
    }
}
