use std::collections::BTreeMap;

use kinfra_client::SharedClient;
use kinfra_client::StoreClient;
use kinfra_types::namespace::NamespaceSpec;

use crate::BuilderError;
use crate::ResourceBuilder;

resource_builder!(
    /// Builder for cluster scoped `Namespace` objects
    NamespaceBuilder,
    NamespaceSpec
);

impl<C> NamespaceBuilder<C>
where
    C: StoreClient,
{
    pub fn new(client: impl Into<Option<SharedClient<C>>>, name: impl Into<String>) -> Self {
        Self(ResourceBuilder::new(client, name, ""))
    }

    pub async fn pull(
        client: impl Into<Option<SharedClient<C>>>,
        name: impl Into<String>,
    ) -> Result<Self, BuilderError> {
        ResourceBuilder::pull(client, name, "").await.map(Self)
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        self.update_definition(|definition| {
            check_label_key(&key)?;
            definition.metadata.labels.insert(key, value);
            Ok(())
        });
        self
    }

    /// replace all labels
    pub fn with_multiple_labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let labels: BTreeMap<String, String> = labels
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.update_definition(|definition| {
            for key in labels.keys() {
                check_label_key(key)?;
            }
            definition.metadata.labels = labels;
            Ok(())
        });
        self
    }
}

fn check_label_key(key: &str) -> Result<(), BuilderError> {
    if key.is_empty() {
        Err(BuilderError::invalid_field("label", "key cannot be empty"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kinfra_client::MemoryClient;
    use kinfra_client::StoreClient;
    use kinfra_types::ObjectKey;

    use super::*;

    #[fluvio_future::test]
    async fn test_namespace_labels() {
        let client = MemoryClient::new_shared();

        let mut namespace = NamespaceBuilder::new(client.clone(), "tenant-a")
            .with_label("team", "infra")
            .with_label("stage", "dev");
        namespace.create().await.expect("created");

        let stored = client
            .retrieve_item::<NamespaceSpec>(&ObjectKey::cluster("tenant-a"))
            .await
            .expect("stored");
        assert_eq!(stored.metadata.labels.len(), 2);
        assert_eq!(stored.metadata.namespace, "");

        let mut pulled = NamespaceBuilder::pull(client.clone(), "tenant-a")
            .await
            .expect("pulled")
            .with_multiple_labels([("owner", "ops")]);
        pulled.update().await.expect("updated");

        let labels = &pulled.object().expect("observed").metadata.labels;
        assert_eq!(labels.len(), 1);
        assert_eq!(labels.get("owner"), Some(&"ops".to_owned()));
    }

    #[fluvio_future::test]
    async fn test_empty_label_key() {
        let client = MemoryClient::new_shared();

        let mut namespace = NamespaceBuilder::new(client.clone(), "tenant-a")
            .with_multiple_labels([("", "x"), ("team", "infra")])
            .with_label("stage", "dev");

        assert!(namespace.create().await.is_err());
        assert!(namespace.definition().expect("defined").metadata.labels.is_empty());
        assert_eq!(client.count::<NamespaceSpec>().await, 0);
    }

    #[fluvio_future::test]
    async fn test_pull_missing_namespace() {
        let client = MemoryClient::new_shared();
        let err = NamespaceBuilder::pull(client, "absent")
            .await
            .expect_err("missing");
        assert_eq!(err.to_string(), "Namespace absent does not exist");
    }
}
