//! Tests for the HTTP API
//!
//! Runs a multi-node network described in configuration and drives the
//! router directly, without binding a socket.

#[cfg(test)]
mod tests {
    use crate::{
        api::{AppState, ErrorBody, SubmitTransaction, router},
        config::Config,
        node::NodeServices,
        registry::ContractRegistry,
        state::StateCache,
        validation::CONTRACT_ID,
        workflow::{complete_agreement, issue_agreement},
        AccordanceState, AccordanceStatus, Party, SubmissionReceipt, SubmissionStatus, TimeWindow,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        Router,
    };
    use chrono::{Duration, Utc};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    const NETWORK: &str = r#"
        [api]
        host = "127.0.0.1"
        port = 0

        [[nodes]]
        name = "partyA"
        identity = { name = "O=PartyA,L=London,C=GB", owning_key = "8a88e3dd7409f195fd52db2d3cba5d72ca6709bf1d94121bf3748801b40f6f5c" }
        notaries = [
            { name = "O=Notary,L=Zurich,C=CH", owning_key = "ed4928c628d1c2c6eae90338905995612959273a5c63f93636c14614ac8737d1" },
        ]
        flows = ["IssueAccordanceFlow", "CompleteAccordanceFlow"]
        addresses = ["localhost:10005"]

        [[nodes]]
        name = "partyB"
        identity = { name = "O=PartyB,L=New York,C=US", owning_key = "8139770ea87d175f56a35466c34c7ecccb8d8a91b4ee37a25df60f5b8fc9b394" }
        notaries = [
            { name = "O=Notary,L=Zurich,C=CH", owning_key = "ed4928c628d1c2c6eae90338905995612959273a5c63f93636c14614ac8737d1" },
        ]
        flows = ["CompleteAccordanceFlow"]
        addresses = ["localhost:10008"]

        [[nodes]]
        name = "partyC"
        identity = { name = "O=PartyC,L=Paris,C=FR", owning_key = "ed4928c628d1c2c6eae90338905995612959273a5c63f93636c14614ac8737d1" }
        online = false
    "#;

    /// Helper function to build the router for the test network
    fn app() -> Router {
        let config = Config::from_toml_str(NETWORK).unwrap();
        let state = AppState::new(
            ContractRegistry::with_defaults(),
            NodeServices::from_config(&config.nodes),
            StateCache::new(),
        );
        router(state)
    }

    async fn get<T: DeserializeOwned>(app: &Router, uri: &str) -> (StatusCode, T) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn submit(app: &Router, request: &SubmitTransaction) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/transactions")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn party_of(app: &Router, node: &str) -> Party {
        let (status, party) = get::<Party>(app, &format!("/api/nodes/{node}/whoami")).await;
        assert_eq!(status, StatusCode::OK);
        party
    }

    fn window() -> TimeWindow {
        TimeWindow::with_tolerance(Utc::now(), Duration::seconds(30)).unwrap()
    }

    #[tokio::test]
    async fn test_node_services_are_registered() {
        let (status, names) = get::<Vec<String>>(&app(), "/api/nodes").await;

        assert_eq!(status, StatusCode::OK);
        assert!(!names.is_empty());
        assert_eq!(names, vec!["partyA", "partyB", "partyC"]);
    }

    #[tokio::test]
    async fn test_retrieve_node_identity() {
        let app = app();
        let party = party_of(&app, "partyA").await;

        assert_eq!(party.name, "O=PartyA,L=London,C=GB");
        assert_eq!(
            party.owning_key.to_hex(),
            "8a88e3dd7409f195fd52db2d3cba5d72ca6709bf1d94121bf3748801b40f6f5c"
        );
    }

    #[tokio::test]
    async fn test_retrieve_notaries() {
        let (status, notaries) = get::<Vec<Party>>(&app(), "/api/nodes/partyB/notaries").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(notaries.len(), 1);
        assert_eq!(notaries[0].name, "O=Notary,L=Zurich,C=CH");
    }

    #[tokio::test]
    async fn test_retrieve_flows() {
        let (status, flows) = get::<Vec<String>>(&app(), "/api/nodes/partyA/flows").await;

        assert_eq!(status, StatusCode::OK);
        assert!(flows.contains(&"IssueAccordanceFlow".to_string()));
    }

    #[tokio::test]
    async fn test_retrieve_addresses() {
        let (status, addresses) = get::<Vec<String>>(&app(), "/api/nodes/partyB/addresses").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(addresses, vec!["localhost:10008".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_node_is_not_found() {
        let (status, body) = get::<ErrorBody>(&app(), "/api/nodes/partyZ/whoami").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.error.contains("partyZ"));
    }

    #[tokio::test]
    async fn test_offline_node_is_unavailable() {
        let (status, body) = get::<ErrorBody>(&app(), "/api/nodes/partyC/flows").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.error, "Node partyC is unreachable");
    }

    #[tokio::test]
    async fn test_issue_then_complete_between_nodes() {
        let app = app();
        let initiator = party_of(&app, "partyA").await;
        let reviewer = party_of(&app, "partyB").await;

        let (issue, issued) = issue_agreement(initiator, reviewer, window());
        let (status, body) = submit(
            &app,
            &SubmitTransaction {
                contract_id: CONTRACT_ID.to_string(),
                transaction: issue,
            },
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let receipt: SubmissionReceipt = serde_json::from_value(body).unwrap();
        assert_eq!(receipt.status, SubmissionStatus::Accepted);

        let state_uri = format!("/api/states/{}", issued.linear_id.id);
        let (_, recorded) = get::<AccordanceState>(&app, &state_uri).await;
        assert_eq!(recorded.status, AccordanceStatus::New);

        let completed = complete_agreement(&issued, AccordanceStatus::Approved, window());
        let (_, body) = submit(
            &app,
            &SubmitTransaction {
                contract_id: CONTRACT_ID.to_string(),
                transaction: completed,
            },
        )
        .await;
        let receipt: SubmissionReceipt = serde_json::from_value(body).unwrap();
        assert_eq!(receipt.status, SubmissionStatus::Accepted);

        let (_, recorded) = get::<AccordanceState>(&app, &state_uri).await;
        assert_eq!(recorded.status, AccordanceStatus::Approved);
    }

    #[tokio::test]
    async fn test_completed_agreement_cannot_be_completed_again() {
        let app = app();
        let initiator = party_of(&app, "partyA").await;
        let reviewer = party_of(&app, "partyB").await;
        let (issue, issued) = issue_agreement(initiator, reviewer, window());

        let accepted = [
            issue.clone(),
            complete_agreement(&issued, AccordanceStatus::Approved, window()),
        ];
        for transaction in accepted {
            let (_, body) = submit(
                &app,
                &SubmitTransaction {
                    contract_id: CONTRACT_ID.to_string(),
                    transaction,
                },
            )
            .await;
            let receipt: SubmissionReceipt = serde_json::from_value(body).unwrap();
            assert_eq!(receipt.status, SubmissionStatus::Accepted);
        }

        // Each of these passes the contract but conflicts with the recorded APPROVED version
        let conflicting = [
            (
                complete_agreement(&issued, AccordanceStatus::Rejected, window()),
                "StaleInput",
            ),
            (issue, "AlreadyIssued"),
        ];
        for (transaction, expected_rule) in conflicting {
            let (status, body) = submit(
                &app,
                &SubmitTransaction {
                    contract_id: CONTRACT_ID.to_string(),
                    transaction,
                },
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            let receipt: SubmissionReceipt = serde_json::from_value(body).unwrap();
            match receipt.status {
                SubmissionStatus::Rejected { rule, .. } => assert_eq!(rule, expected_rule),
                other => panic!("expected {expected_rule} rejection, got {other:?}"),
            }
        }

        let state_uri = format!("/api/states/{}", issued.linear_id.id);
        let (_, recorded) = get::<AccordanceState>(&app, &state_uri).await;
        assert_eq!(recorded.status, AccordanceStatus::Approved);
    }

    #[tokio::test]
    async fn test_completion_of_unissued_agreement_is_rejected() {
        let app = app();
        let initiator = party_of(&app, "partyA").await;
        let reviewer = party_of(&app, "partyB").await;
        let (_, never_submitted) = issue_agreement(initiator, reviewer, window());

        let (_, body) = submit(
            &app,
            &SubmitTransaction {
                contract_id: CONTRACT_ID.to_string(),
                transaction: complete_agreement(
                    &never_submitted,
                    AccordanceStatus::Approved,
                    window(),
                ),
            },
        )
        .await;
        let receipt: SubmissionReceipt = serde_json::from_value(body).unwrap();
        assert!(matches!(
            receipt.status,
            SubmissionStatus::Rejected { ref rule, .. } if rule == "UnknownInput"
        ));

        let (status, _) = get::<ErrorBody>(
            &app,
            &format!("/api/states/{}", never_submitted.linear_id.id),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejected_transaction_reports_reason_and_is_not_recorded() {
        let app = app();
        let initiator = party_of(&app, "partyA").await;
        let reviewer = party_of(&app, "partyB").await;

        let (mut issue, issued) = issue_agreement(initiator, reviewer, window());
        issue.signers.clear();

        let (status, body) = submit(
            &app,
            &SubmitTransaction {
                contract_id: CONTRACT_ID.to_string(),
                transaction: issue,
            },
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let receipt: SubmissionReceipt = serde_json::from_value(body).unwrap();
        match receipt.status {
            SubmissionStatus::Rejected { rule, reason } => {
                assert_eq!(rule, "MissingSignature");
                assert!(reason.contains("O=PartyA,L=London,C=GB"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }

        let (status, _) =
            get::<ErrorBody>(&app, &format!("/api/states/{}", issued.linear_id.id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_contract_is_not_found() {
        let app = app();
        let initiator = party_of(&app, "partyA").await;
        let reviewer = party_of(&app, "partyB").await;
        let (issue, _) = issue_agreement(initiator, reviewer, window());

        let (status, body) = submit(
            &app,
            &SubmitTransaction {
                contract_id: "com.example.Unknown".to_string(),
                transaction: issue,
            },
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("com.example.Unknown"));
    }
}
