use super::*;

/// Builds the set of integration ids a principal may view by draining the
/// oracle's enumeration stream.
///
/// The result is released only once the stream has completed. A failing item,
/// a malformed id or an elapsed deadline fail the whole collection; no partial
/// set is ever returned.
#[derive(Clone)]
pub struct AuthorizedIdCollector {
    oracle: Arc<dyn PermissionOracle>,
    workspace_resolver: Arc<dyn WorkspaceResolver>,
    drain_timeout: Duration,
}

impl AuthorizedIdCollector {
    /// Creates a collector with a deadline for the whole enumeration.
    #[must_use]
    pub fn new(
        oracle: Arc<dyn PermissionOracle>,
        workspace_resolver: Arc<dyn WorkspaceResolver>,
        drain_timeout: Duration,
    ) -> Self {
        Self {
            oracle,
            workspace_resolver,
            drain_timeout,
        }
    }

    /// Returns the authorized ids, or `None` when the principal may view nothing.
    pub async fn collect(&self, principal: &Principal) -> AppResult<Option<AuthorizedIdSet>> {
        let workspace_id = self
            .workspace_resolver
            .default_workspace_id(principal.org_id())
            .await?;

        let drain = async {
            let stream = self
                .oracle
                .list_integrations(principal, workspace_id)
                .await?;
            drain_integration_ids(stream).await
        };

        let ids = match tokio::time::timeout(self.drain_timeout, drain).await {
            Ok(result) => result.inspect_err(|error| {
                warn!(
                    org_id = %principal.org_id(),
                    username = principal.username(),
                    %workspace_id,
                    %error,
                    "integration enumeration failed"
                );
            })?,
            Err(_) => {
                warn!(
                    org_id = %principal.org_id(),
                    username = principal.username(),
                    %workspace_id,
                    timeout_ms = self.drain_timeout.as_millis(),
                    "integration enumeration timed out"
                );
                return Err(AppError::Dependency(format!(
                    "integration enumeration did not complete within {}ms",
                    self.drain_timeout.as_millis()
                )));
            }
        };

        let authorized = AuthorizedIdSet::from_ids(ids);
        match &authorized {
            Some(set) => debug!(
                org_id = %principal.org_id(),
                username = principal.username(),
                authorized_ids = set.len(),
                "collected authorized integration ids"
            ),
            None => info!(
                org_id = %principal.org_id(),
                username = principal.username(),
                "relation system did not return any integration ids"
            ),
        }

        Ok(authorized)
    }
}

async fn drain_integration_ids(stream: IntegrationBatchStream) -> AppResult<HashSet<Uuid>> {
    stream
        .try_fold(HashSet::new(), |mut ids, batch| async move {
            for integration in batch.integrations {
                let id = Uuid::parse_str(integration.local_resource_id.as_str()).map_err(
                    |error| {
                        AppError::Dependency(format!(
                            "relation system returned malformed integration id '{}': {error}",
                            integration.local_resource_id
                        ))
                    },
                )?;
                ids.insert(id);
            }
            Ok(ids)
        })
        .await
}
