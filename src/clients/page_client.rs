//! # Page Client
//!
//! The operations every page client shares, written once against the inner
//! [`ListClient`].
use crate::framework::{ListClient, ListError, Resource};
use async_trait::async_trait;

/// Trait for page-specific clients to inherit the standard list operations.
///
/// A domain client only has to expose its inner [`ListClient`]; loading,
/// detail fetches and the two-step delete come for free.
#[async_trait]
pub trait PageClient<T: Resource>: Send + Sync {
    /// The page-specific error type.
    type Error: From<ListError> + Send + Sync;

    /// Access the inner generic ListClient.
    fn inner(&self) -> &ListClient<T>;

    #[tracing::instrument(skip(self), fields(resource = T::LABEL))]
    async fn load(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().load().await.map_err(Self::Error::from)
    }

    #[tracing::instrument(skip(self), fields(resource = T::LABEL))]
    async fn get(&self, id: T::Id) -> Result<T, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::Error::from)
    }

    /// Marks and confirms in one go, for callers without a dialog.
    #[tracing::instrument(skip(self), fields(resource = T::LABEL))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().request_delete(id).await.map_err(Self::Error::from)?;
        self.inner().confirm_delete().await.map_err(Self::Error::from)
    }
}
