//! Helpers shared by the inline test modules.

use crate::config::ClientConfig;
use crate::CatalogClient;
use wiremock::MockServer;

/// Client pointed at a running mock server.
pub(crate) fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(ClientConfig::default())
        .unwrap()
        .with_base_url(&server.uri())
        .unwrap()
}
