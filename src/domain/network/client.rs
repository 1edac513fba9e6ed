//! Network sub-client — member lookup and tree assembly over HTTP.

use crate::client::StorefrontClient;
use crate::domain::network::{AssemblyToken, MemberRecord, NetworkTree, TreeAssembler};
use crate::error::SdkError;
use crate::http::StorefrontHttp;
use crate::shared::Username;

/// Sub-client for the placement network.
pub struct Network<'a> {
    pub(crate) client: &'a StorefrontClient,
}

impl<'a> Network<'a> {
    /// Single-node lookup: the member plus its child usernames.
    pub async fn member(&self, username: &Username) -> Result<MemberRecord, SdkError> {
        Ok(self.client.http.get_tree_node(username.as_str()).await?.into())
    }

    /// An assembler backed by this client's HTTP connection and limits.
    ///
    /// Hand it to a [`TreeView`](crate::domain::network::TreeView) to drive
    /// load / re-root / refresh.
    pub fn assembler(&self) -> TreeAssembler<&'a StorefrontHttp> {
        TreeAssembler::with_config(&self.client.http, self.client.assembler_config.clone())
    }

    /// Assemble the tree rooted at `username`.
    pub async fn tree(&self, username: &Username) -> Result<NetworkTree, SdkError> {
        Ok(self.assembler().assemble(username).await?)
    }

    /// Like [`tree`](Self::tree), stopping once `token` is cancelled.
    pub async fn tree_with_token(
        &self,
        username: &Username,
        token: &AssemblyToken,
    ) -> Result<NetworkTree, SdkError> {
        Ok(self.assembler().assemble_with_token(username, token).await?)
    }

    /// Assemble the signed-in member's own tree.
    pub async fn my_tree(&self) -> Result<NetworkTree, SdkError> {
        let profile = self.client.auth().me().await?;
        self.tree(&profile.username).await
    }
}
