//! Tests for node addresses and configured node services

#[cfg(test)]
mod tests {
    use crate::{
        config::NodeConfig,
        node::{ConfiguredNode, NetworkHostAndPort, NodeError, NodeService, NodeServices},
        Party,
    };
    use ed25519_dalek::SigningKey;

    fn party(name: &str, seed: u8) -> Party {
        Party::new(name, SigningKey::from_bytes(&[seed; 32]).verifying_key().into())
    }

    /// Helper function to create a node configuration
    fn node_config(name: &str, seed: u8, online: bool) -> NodeConfig {
        NodeConfig {
            name: name.to_string(),
            identity: party(&format!("O={name},L=London,C=GB"), seed),
            notaries: vec![party("O=Notary,L=Zurich,C=CH", 9)],
            flows: vec!["IssueAccordanceFlow".to_string()],
            addresses: vec![NetworkHostAndPort::parse("localhost:10005").unwrap()],
            online,
        }
    }

    #[test]
    fn test_parse_host_and_port() {
        let address = NetworkHostAndPort::parse("localhost:10005").unwrap();
        assert_eq!(address.host, "localhost");
        assert_eq!(address.port, 10005);
        assert_eq!(address.to_string(), "localhost:10005");

        let v6 = NetworkHostAndPort::parse("[::1]:10006").unwrap();
        assert_eq!(v6.host, "::1");
        assert_eq!(v6.to_string(), "[::1]:10006");
    }

    #[test]
    fn test_reject_malformed_addresses() {
        for bad in ["localhost", ":10005", "localhost:0", "localhost:http", "::1:10006", "[::1]"] {
            assert!(NetworkHostAndPort::parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_configured_node_answers_queries() {
        let node = ConfiguredNode::new(node_config("partyA", 1, true));

        assert_eq!(node.name(), "partyA");
        assert_eq!(node.identity().unwrap(), party("any name", 1));
        assert_eq!(node.notaries().unwrap().len(), 1);
        assert_eq!(node.flows().unwrap(), vec!["IssueAccordanceFlow".to_string()]);
        assert_eq!(node.addresses().unwrap()[0].port, 10005);
    }

    #[test]
    fn test_offline_node_is_unreachable() {
        let node = ConfiguredNode::new(node_config("partyB", 2, false));

        let expected = NodeError::Unreachable("partyB".to_string());
        assert_eq!(node.identity().unwrap_err(), expected);
        assert_eq!(node.notaries().unwrap_err(), expected);
        assert_eq!(node.flows().unwrap_err(), expected);
        assert_eq!(node.addresses().unwrap_err(), expected);
    }

    #[test]
    fn test_node_services_lookup_by_name() {
        let services = NodeServices::from_config(&[
            node_config("partyB", 2, true),
            node_config("partyA", 1, true),
        ]);

        assert_eq!(services.len(), 2);
        assert_eq!(services.names(), vec!["partyA".to_string(), "partyB".to_string()]);
        assert!(services.get("partyA").is_some());
        assert!(services.get("partyC").is_none());
    }
}
