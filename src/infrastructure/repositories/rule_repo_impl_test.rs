// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn repository(server: &MockServer) -> RuleRepositoryImpl {
    RuleRepositoryImpl::new(ApiClient::with_base_url(&server.uri()).unwrap())
}

fn rule() -> CrawlerRule {
    serde_json::from_value(json!({
        "name": "news",
        "request_args": {"method": "get", "url": "https://example.com/news"},
        "parse_rules": [],
        "regex": "^https://example.com/news",
        "encoding": ""
    }))
    .unwrap()
}

#[tokio::test]
async fn test_load_hosts_returns_normalized_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/load_hosts"))
        .and(query_param("host", "https://example.com/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "host": "example.com",
            "hosts": [{"name": "example.com", "freq": true}]
        })))
        .mount(&server)
        .await;

    let hosts = repository(&server)
        .await
        .load_hosts("https://example.com/a")
        .await
        .unwrap();

    assert_eq!(hosts.host, "example.com");
    assert_eq!(hosts.hosts.len(), 1);
    assert!(hosts.hosts[0].freq);
}

#[tokio::test]
async fn test_get_host_rule_with_missing_frequency() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_host_rule"))
        .and(query_param("host", "example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "msg": "ok",
            "host_rule": {"host": "example.com", "n": null, "interval": null}
        })))
        .mount(&server)
        .await;

    let host_rule = repository(&server)
        .await
        .get_host_rule("example.com")
        .await
        .unwrap();

    assert_eq!(host_rule.host, "example.com");
    assert!(!host_rule.is_throttled());
    assert!(host_rule.crawler_rules.is_empty());
}

#[tokio::test]
async fn test_update_host_freq_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/update_host_freq"))
        .and(query_param("host", "example.com"))
        .and(query_param("n", "2"))
        .and(query_param("interval", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    repository(&server)
        .await
        .update_host_freq("example.com", 2, 10)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_find_crawler_rule_decodes_result_text() {
    let server = MockServer::start().await;
    let text = serde_json::to_string(&rule()).unwrap();
    Mock::given(method("POST"))
        .and(path("/find_crawler_rule"))
        .and(body_partial_json(json!({"url": "https://example.com/news/1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok", "result": text})))
        .mount(&server)
        .await;

    let found = repository(&server)
        .await
        .find_crawler_rule(&json!({"url": "https://example.com/news/1"}))
        .await
        .unwrap();

    assert_eq!(found, rule());
}

#[tokio::test]
async fn test_add_crawler_rule_with_force() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawler_rule.add"))
        .and(query_param("force", "1"))
        .and(body_partial_json(json!({"name": "news"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok", "result": "added"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = repository(&server)
        .await
        .add_crawler_rule(&rule(), true)
        .await
        .unwrap();

    assert_eq!(result, json!("added"));
}

#[tokio::test]
async fn test_pop_crawler_rule_missing_returns_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawler_rule.pop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok", "result": null})))
        .mount(&server)
        .await;

    let result = repository(&server).await.pop_crawler_rule(&rule()).await.unwrap();

    assert!(result.is_null());
}
