use async_trait::async_trait;

use crate::{Client, ClientError};

/// A resource that can be removed from the server.
///
/// Destroying is one-way: once it succeeds the resource reports itself as
/// deleted for the rest of its life, and further attempts fail with
/// [ClientError::ClientState].
#[async_trait]
pub trait Destroyable {
    async fn destroy(&mut self, client: &Client) -> Result<(), ClientError>;

    fn is_deleted(&self) -> bool;
}

/// A resource whose local changes can be written back to the server.
#[async_trait]
pub trait Savable {
    async fn save(&self, client: &Client) -> Result<(), ClientError>;
}
