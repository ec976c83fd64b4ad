use kinfra_client::SharedClient;
use kinfra_client::StoreClient;
use kinfra_types::argocd::ArgoCDSpec;

use crate::BuilderError;
use crate::ResourceBuilder;

resource_builder!(
    /// Builder for `ArgoCD` instances
    ArgoCDBuilder,
    ArgoCDSpec
);

impl<C> ArgoCDBuilder<C>
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

    /// image tag used by every ArgoCD component
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.update_definition(|definition| {
            if version.is_empty() {
                return Err(BuilderError::invalid_field("version", "cannot be empty"));
            }
            definition.spec.version = Some(version);
            Ok(())
        });
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        let image = image.into();
        self.update_definition(|definition| {
            if image.is_empty() {
                return Err(BuilderError::invalid_field("image", "cannot be empty"));
            }
            definition.spec.image = Some(image);
            Ok(())
        });
        self
    }
}
