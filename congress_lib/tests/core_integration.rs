use std::time::Duration;

use congress_lib::types::{BillType, Chamber, Party};
use congress_lib::{
    Config, CongressClient, CongressError, MemberId, MemberQuery, MemberVoteQuery, RetryPolicy,
    VoteCast, VoteRequest,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(10),
        backoff: 2.0,
        max_delay: None,
    }
}

fn client_for(server: &MockServer) -> CongressClient {
    let mut config = Config::new("test-key");
    config.api_base_url = Some(server.uri());
    config.house_feed_url = Some(format!("{}/evs", server.uri()));
    config.senate_feed_url = Some(format!("{}/lis", server.uri()));
    config.retry = fast_retry();
    CongressClient::from_config(&config).unwrap()
}

fn house_doc(roll: u32, member: &str) -> String {
    format!(
        r#"<rollcall-vote>
  <vote-metadata>
    <congress>118</congress><session>2nd</session><rollcall-num>{roll}</rollcall-num>
    <vote-question>On Passage</vote-question><vote-result>Passed</vote-result>
    <action-date>05-Feb-2024</action-date>
  </vote-metadata>
  <vote-data>
    <recorded-vote><legislator name-id="{member}" party="D" state="NC">Adams</legislator><vote>Aye</vote></recorded-vote>
    <recorded-vote><legislator name-id="Z000001" party="R" state="TX">Other</legislator><vote>No</vote></recorded-vote>
  </vote-data>
</rollcall-vote>"#
    )
}

fn xml_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/xml")
}

fn cosponsor(id: &str) -> serde_json::Value {
    json!({
        "bioguideId": id,
        "firstName": "Jane",
        "lastName": "Doe",
        "party": "D",
        "state": "CA",
        "sponsorshipDate": "2023-04-27",
        "isOriginalCosponsor": true
    })
}

fn bill_item(n: u32) -> serde_json::Value {
    json!({
        "congress": 118,
        "number": n.to_string(),
        "title": format!("Bill {}", n),
        "type": "HR"
    })
}

// ============================================================================
// Vote feeds
// ============================================================================

#[tokio::test]
async fn house_vote_is_fetched_and_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/evs/2024/roll017.xml"))
        .respond_with(xml_response(
            include_str!("fixtures/house_roll017.xml").to_string(),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let vote = client.get_house_vote(2024, 17).await.unwrap();

    assert_eq!(vote.chamber, Chamber::House);
    assert_eq!((vote.congress, vote.session, vote.roll_number), (Some(118), Some(2), Some(17)));
    assert_eq!(vote.bill_number.as_deref(), Some("H R 2872"));
    assert_eq!(vote.tally.get(&VoteCast::Yea), Some(&314));
    assert_eq!(vote.positions.len(), 5);
    assert_eq!(vote.party_tally[&Party::Republican][&VoteCast::Yea], 1);
    assert_eq!(vote.party_tally[&Party::Republican][&VoteCast::Nay], 1);
    assert_eq!(vote.party_tally[&Party::Republican][&VoteCast::NotVoting], 1);
    assert_eq!(vote.party_tally[&Party::Democrat][&VoteCast::Yea], 2);
    assert_eq!(client.feed_stats().successes, 1);
}

#[tokio::test]
async fn senate_vote_is_fetched_and_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lis/vote1182/vote_118_2_00012.xml"))
        .respond_with(xml_response(
            include_str!("fixtures/senate_vote_118_2_00012.xml").to_string(),
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let vote = client.get_senate_vote(118, 2, 12).await.unwrap();

    assert_eq!(vote.chamber, Chamber::Senate);
    assert!(vote.is_complete());
    assert_eq!(vote.vote_question.as_deref(), Some("On Passage of the Bill H.R. 2872"));
    assert_eq!(vote.bill_number.as_deref(), Some("H.R. 2872 (Congress 118)"));
    assert_eq!(vote.tally[&VoteCast::Present], 0);
    assert_eq!(vote.tally[&VoteCast::NotVoting], 5);
    assert_eq!(vote.party_tally[&Party::Republican][&VoteCast::Yea], 1);
    assert_eq!(vote.party_tally[&Party::Republican][&VoteCast::Nay], 1);
    assert_eq!(vote.party_tally[&Party::Independent][&VoteCast::Yea], 1);
}

#[tokio::test]
async fn missing_feed_document_is_permanent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/evs/2024/roll999.xml"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_house_vote(2024, 999).await.unwrap_err();
    assert!(matches!(err, CongressError::Permanent { attempts: 1, .. }));
    assert_eq!(err.upstream_status(), Some(404));
}

#[tokio::test]
async fn structurally_invalid_document_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/evs/2024/roll018.xml"))
        .respond_with(xml_response(
            "<rollcall-vote><vote-metadata/></rollcall-vote>".to_string(),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_house_vote(2024, 18).await.unwrap_err();
    match err {
        CongressError::Structure { section, url, .. } => {
            assert_eq!(section, "<vote-data>");
            assert!(url.ends_with("/evs/2024/roll018.xml"));
        }
        other => panic!("expected structure error, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_votes_keeps_request_order() {
    let server = MockServer::start().await;
    // Earlier rolls answer later so completion order is reversed.
    for (i, roll) in [101u32, 102, 103].iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(format!("/evs/2024/roll{:03}.xml", roll)))
            .respond_with(
                xml_response(house_doc(*roll, "A000370"))
                    .set_delay(Duration::from_millis(150 - 50 * i as u64)),
            )
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let requests: Vec<VoteRequest> = [101, 102, 103]
        .iter()
        .map(|&roll| VoteRequest::House { year: 2024, roll })
        .collect();
    let results = client.fetch_votes(&requests).await;
    let rolls: Vec<Option<u32>> = results
        .iter()
        .map(|r| r.as_ref().unwrap().roll_number)
        .collect();
    assert_eq!(rolls, vec![Some(101), Some(102), Some(103)]);
}

// ============================================================================
// Member vote batches
// ============================================================================

#[tokio::test]
async fn batch_with_one_structural_failure_returns_the_rest_in_order() {
    let server = MockServer::start().await;
    let rolls = [201u32, 202, 203, 204, 205];
    for (i, roll) in rolls.iter().enumerate() {
        let body = if *roll == 203 {
            "<rollcall-vote><vote-metadata><rollcall-num>203</rollcall-num></vote-metadata></rollcall-vote>"
                .to_string()
        } else {
            house_doc(*roll, "A000370")
        };
        Mock::given(method("GET"))
            .and(path(format!("/evs/2024/roll{:03}.xml", roll)))
            .respond_with(
                xml_response(body).set_delay(Duration::from_millis(200 - 40 * i as u64)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let query = MemberVoteQuery {
        member_id: "A000370".to_string(),
        chamber: Chamber::House,
        congress: 118,
        roll_numbers: rolls.to_vec(),
        session: None,
        year: Some(2024),
    };
    let records = client.list_member_vote_details(&query).await.unwrap();

    let got: Vec<Option<u32>> = records.iter().map(|r| r.roll_number).collect();
    assert_eq!(got, vec![Some(201), Some(202), Some(204), Some(205)]);
    for record in &records {
        assert_eq!(
            record.member_position.member_id,
            Some(MemberId::Bioguide("A000370".to_string()))
        );
        assert_eq!(record.member_position.vote_cast, VoteCast::Yea);
        assert_eq!(record.vote_question.as_deref(), Some("On Passage"));
    }
}

#[tokio::test]
async fn member_absent_from_every_vote_yields_no_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/evs/2024/roll301.xml"))
        .respond_with(xml_response(house_doc(301, "A000370")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = MemberVoteQuery {
        member_id: "P000197".to_string(),
        chamber: Chamber::House,
        congress: 118,
        roll_numbers: vec![301],
        session: None,
        year: Some(2024),
    };
    let records = client.list_member_vote_details(&query).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn senate_batch_matches_lis_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lis/vote1182/vote_118_2_00012.xml"))
        .respond_with(xml_response(
            include_str!("fixtures/senate_vote_118_2_00012.xml").to_string(),
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = MemberVoteQuery {
        member_id: "S346".to_string(),
        chamber: Chamber::Senate,
        congress: 118,
        roll_numbers: vec![12],
        session: Some(2),
        year: None,
    };
    let records = client.list_member_vote_details(&query).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].member_position.name.as_deref(), Some("Lee (R-UT)"));
    assert_eq!(records[0].member_position.vote_cast, VoteCast::Nay);
    assert_eq!(records[0].session, Some(2));
}

#[tokio::test]
async fn empty_roll_list_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = MemberVoteQuery {
        member_id: "A000370".to_string(),
        chamber: Chamber::House,
        congress: 118,
        roll_numbers: Vec::new(),
        session: None,
        year: None,
    };
    assert!(client.list_member_vote_details(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn house_batch_without_year_is_rejected() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let query = MemberVoteQuery {
        member_id: "A000370".to_string(),
        chamber: Chamber::House,
        congress: 118,
        roll_numbers: vec![1],
        session: None,
        year: None,
    };
    let err = client.list_member_vote_details(&query).await.unwrap_err();
    assert!(matches!(err, CongressError::InvalidInput(_)));
}

// ============================================================================
// Congress.gov JSON operations
// ============================================================================

#[tokio::test]
async fn transient_failures_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bill/118/hr/2882"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bill/118/hr/2882"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bill": {"congress": 118, "type": "HR", "number": "2882", "title": "Appropriations"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bill = client.get_bill_info(118, BillType::Hr, 2882).await.unwrap();
    assert_eq!(bill.number, "2882");
    assert_eq!(bill.legislation_type, "HR");

    let stats = client.api_stats();
    assert_eq!(stats.attempts, 3);
    assert_eq!(stats.retries, 2);
    assert_eq!(stats.successes, 1);
}

#[tokio::test]
async fn exhausted_retries_surface_the_last_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bill/118/hr/1/actions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_bill_actions(118, BillType::Hr, 1).await.unwrap_err();
    assert!(matches!(err, CongressError::Transient { attempts: 3, .. }));
    assert_eq!(err.upstream_status(), Some(500));
}

#[tokio::test]
async fn refused_connections_are_retried_as_network_failures() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = Config::new("test-key");
    config.house_feed_url = Some(format!("http://{}/evs", addr));
    config.retry = fast_retry();
    let client = CongressClient::from_config(&config).unwrap();

    let err = client.get_house_vote(2024, 17).await.unwrap_err();
    assert!(matches!(
        err,
        CongressError::Transient {
            attempts: 3,
            source: congress_lib::congress_api::Error::Network { .. },
            ..
        }
    ));
    assert!(err.url().unwrap_or_default().contains("/evs/2024/roll017.xml"));

    let stats = client.feed_stats();
    assert_eq!(stats.attempts, 3);
    assert_eq!(stats.retries, 2);
    assert_eq!(stats.failed_calls, 1);
    assert!(stats.backoff_secs > 0.0);
}

#[tokio::test]
async fn bill_info_without_bill_mapping_is_structural() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bill/118/s/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bill": []})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_bill_info(118, BillType::S, 5).await.unwrap_err();
    assert!(matches!(err, CongressError::Structure { ref section, .. } if section == "bill"));
}

#[tokio::test]
async fn bill_actions_skip_invalid_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bill/118/hr/1/actions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "actions": [
                {"actionDate": "2023-01-09", "text": "Introduced in House"},
                {"text": "missing date"},
                {"actionDate": "2023-01-10", "text": "Referred", "actionCode": "H11100"}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let set = client.get_bill_actions(118, BillType::Hr, 1).await.unwrap();
    assert_eq!(set.actions.len(), 2);
    assert_eq!(set.actions[1].action_code.as_deref(), Some("H11100"));
}

#[tokio::test]
async fn text_versions_accept_the_camel_case_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bill/118/hr/1/text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "textVersions": [
                {"type": "Introduced in House", "date": "2023-01-09T05:00:00Z",
                 "formats": [{"type": "PDF", "url": "https://www.congress.gov/118/bills/hr1/BILLS-118hr1ih.pdf"}]}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let set = client.get_bill_text_versions(118, BillType::Hr, 1).await.unwrap();
    assert_eq!(set.text_versions.len(), 1);
    assert_eq!(set.text_versions[0].formats[0].format_type, "PDF");
}

#[tokio::test]
async fn cosponsors_walk_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bill/118/hr/815/cosponsors"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cosponsors": [cosponsor("A000001"), {"bioguideId": "BAD"}, cosponsor("A000002")],
            "pagination": {"count": 3, "next": "https://api.congress.gov/v3/bill/118/hr/815/cosponsors?offset=250"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bill/118/hr/815/cosponsors"))
        .and(query_param("offset", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cosponsors": [cosponsor("A000003")],
            "pagination": {"count": 3, "next": null}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let set = client.get_bill_cosponsors(118, BillType::Hr, 815).await;
    let ids: Vec<&str> = set.cosponsors.iter().map(|c| c.bioguide_id.as_str()).collect();
    assert_eq!(ids, vec!["A000001", "A000002", "A000003"]);
}

#[tokio::test]
async fn cosponsor_page_failure_keeps_earlier_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bill/118/hr/815/cosponsors"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cosponsors": [cosponsor("A000001"), cosponsor("A000002")],
            "pagination": {"count": 400, "next": "more"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bill/118/hr/815/cosponsors"))
        .and(query_param("offset", "250"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let set = client.get_bill_cosponsors(118, BillType::Hr, 815).await;
    assert_eq!(set.cosponsors.len(), 2);
}

#[tokio::test]
async fn search_bills_truncates_and_reports_total() {
    let server = MockServer::start().await;
    let bills: Vec<serde_json::Value> = (1..=100).map(bill_item).collect();
    Mock::given(method("GET"))
        .and(path("/bill"))
        .and(query_param("query", "farm"))
        .and(query_param("limit", "100"))
        .and(query_param("offset", "0"))
        .and(query_param("congress", "118"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bills": bills,
            "pagination": {"count": 4321, "next": "https://api.congress.gov/v3/bill?offset=100"},
            "request": {"contentType": "application/json", "format": "json"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let results = client.search_bills("farm", Some(118)).await.unwrap();
    assert_eq!(results.bills.len(), 5);
    assert_eq!(results.bills[0].number, "1");
    assert_eq!(results.pagination.total_found, 4321);
    assert_eq!(results.pagination.returned_to_llm, 5);
    assert_eq!(results.pagination.limit_applied_in_tool, 5);
    assert_eq!(results.request.unwrap()["format"], "json");
}

#[tokio::test]
async fn search_bills_without_count_reports_collected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bill"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bills": [bill_item(1), bill_item(2), {"title": "no number"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let results = client.search_bills("water", None).await.unwrap();
    assert_eq!(results.bills.len(), 2);
    assert_eq!(results.pagination.total_found, 2);
}

#[tokio::test]
async fn search_bills_rejects_control_only_query_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bill"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bills": []})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.search_bills("\u{0007}\t\n", None).await.unwrap_err();
    assert!(matches!(err, CongressError::InvalidInput(_)));
    assert_eq!(client.api_stats().attempts, 0);
}

#[tokio::test]
async fn search_bills_sends_the_sanitized_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bill"))
        .and(query_param("query", "clean air"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bills": [bill_item(7)],
            "pagination": {"count": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let results = client.search_bills("  clean\u{0007} air\n", None).await.unwrap();
    assert_eq!(results.bills[0].number, "7");
}

#[tokio::test]
async fn find_member_sends_normalized_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/member"))
        .and(query_param("q", "Pelosi"))
        .and(query_param("limit", "20"))
        .and(query_param("chamber", "house"))
        .and(query_param("state", "CA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "members": [
                {"bioguideId": "P000197", "name": "Pelosi, Nancy", "state": "California",
                 "partyName": "Democratic"},
                {"name": "missing id"}
            ],
            "pagination": {"count": 1},
            "request": {"format": "json"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = MemberQuery {
        name: "Pelosi".to_string(),
        congress: None,
        chamber: Some(Chamber::House),
        state: Some("ca".to_string()),
    };
    let results = client.find_member(&query).await.unwrap();
    assert_eq!(results.members.len(), 1);
    assert_eq!(results.members[0].bioguide_id, "P000197");
    assert_eq!(results.members[0].party_name.as_deref(), Some("Democratic"));
    assert_eq!(results.pagination.unwrap()["count"], 1);
}
