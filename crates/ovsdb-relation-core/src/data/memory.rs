// # Static Relation Data
//
// In-memory implementation of RelationData. The values are fixed when the
// struct is built; mutate through `&mut self` between hook invocations to
// simulate the remote side publishing new settings.

use async_trait::async_trait;

use super::non_empty;
use crate::traits::RelationData;
use crate::Error;

/// Relation data held in memory
///
/// # Example
///
/// ```rust
/// use ovsdb_relation_core::data::StaticRelationData;
///
/// let data = StaticRelationData::new("10.0.0.20")
///     .with_protocol("ssl")
///     .with_port("6640");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRelationData {
    host: Option<String>,
    port: Option<String>,
    protocol: Option<String>,
    private_address: String,
}

impl StaticRelationData {
    /// Create relation data with nothing published by the remote unit yet
    pub fn new(private_address: impl Into<String>) -> Self {
        Self {
            private_address: private_address.into(),
            ..Self::default()
        }
    }

    /// Set the published host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the published port
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Set the published protocol
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Replace the published remote settings in one step
    pub fn publish(
        &mut self,
        host: Option<String>,
        port: Option<String>,
        protocol: Option<String>,
    ) {
        self.host = host;
        self.port = port;
        self.protocol = protocol;
    }
}

#[async_trait]
impl RelationData for StaticRelationData {
    async fn host(&self) -> Result<Option<String>, Error> {
        Ok(non_empty(self.host.clone()))
    }

    async fn port(&self) -> Result<Option<String>, Error> {
        Ok(non_empty(self.port.clone()))
    }

    async fn protocol(&self) -> Result<Option<String>, Error> {
        Ok(non_empty(self.protocol.clone()))
    }

    async fn private_address(&self) -> Result<String, Error> {
        Ok(self.private_address.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_data_lookups() {
        let data = StaticRelationData::new("10.0.0.20")
            .with_host("10.0.0.10")
            .with_port("1234")
            .with_protocol("tcp");

        assert_eq!(data.host().await.unwrap().as_deref(), Some("10.0.0.10"));
        assert_eq!(data.port().await.unwrap().as_deref(), Some("1234"));
        assert_eq!(data.protocol().await.unwrap().as_deref(), Some("tcp"));
        assert_eq!(data.private_address().await.unwrap(), "10.0.0.20");
    }

    #[tokio::test]
    async fn test_static_data_empty_is_absent() {
        let data = StaticRelationData::new("10.0.0.20").with_protocol("");
        assert_eq!(data.protocol().await.unwrap(), None);
        assert_eq!(data.host().await.unwrap(), None);
    }

    #[test]
    fn test_static_data_private_address_always_answerable() {
        let data = StaticRelationData::new("10.0.0.20");
        let address = tokio_test::block_on(data.private_address()).unwrap();
        assert_eq!(address, "10.0.0.20");
    }

    #[tokio::test]
    async fn test_static_data_publish_replaces_settings() {
        let mut data = StaticRelationData::new("10.0.0.20").with_host("10.0.0.10");
        data.publish(None, Some("6641".to_string()), Some("ssl".to_string()));

        assert_eq!(data.host().await.unwrap(), None);
        assert_eq!(data.port().await.unwrap().as_deref(), Some("6641"));
        assert_eq!(data.protocol().await.unwrap().as_deref(), Some("ssl"));
    }
}
