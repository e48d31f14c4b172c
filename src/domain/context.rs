//! Request context
//!
//! Who asked for an operation, carried into handler log lines.

use std::net::IpAddr;

use uuid::Uuid;

/// Correlation id and caller address of one request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationContext {
    pub correlation_id: Option<Uuid>,
    /// Peer address of the connection, when the server exposes it
    pub client_ip: Option<IpAddr>,
}

impl OperationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_client_ip(mut self, ip: Option<IpAddr>) -> Self {
        self.client_ip = ip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_anonymous() {
        let context = OperationContext::default();
        assert!(context.correlation_id.is_none());
        assert!(context.client_ip.is_none());
    }

    #[test]
    fn test_context_builder() {
        let correlation_id = Uuid::new_v4();
        let ip: IpAddr = "10.0.0.1".parse().unwrap();

        let context = OperationContext::new()
            .with_correlation_id(correlation_id)
            .with_client_ip(Some(ip));

        assert_eq!(context.correlation_id, Some(correlation_id));
        assert_eq!(context.client_ip, Some(ip));
        assert_eq!(context.with_client_ip(None).client_ip, None);
    }
}
