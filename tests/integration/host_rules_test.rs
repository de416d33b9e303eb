// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::TestBackend;
use serde_json::json;
use watchdogs::application::dto::Outcome;
use watchdogs::domain::models::host_rule::CrawlerRule;
use watchdogs::domain::models::task::TaskForm;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn rule() -> CrawlerRule {
    serde_json::from_value(json!({
        "name": "python-blog",
        "request_args": {"method": "get", "url": "https://importpython.com/blog/feed/"},
        "parse_rules": [{"name": "text", "chain_rules": [["xml", "channel>item>title", "$text"]], "child_rules": ""}],
        "regex": "^https?://importpython.com/blog/feed/$",
        "encoding": ""
    }))
    .unwrap()
}

#[tokio::test]
async fn test_conflicting_rule_is_forced_after_confirmation() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/crawler_rule.add"))
        .and(query_param("force", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok", "result": "added"})))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/crawler_rule.add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "msg": "ValueError('https://importpython.com/blog/feed/ matched more than 1 rule')"
        })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let controller = backend.host_rules();
    let outcome = controller
        .add_crawler_rule(&rule(), &|_: &str| true)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Done);
}

#[tokio::test]
async fn test_find_rule_fills_task_form() {
    let backend = TestBackend::start().await;
    let text = serde_json::to_string(&rule()).unwrap();
    Mock::given(method("POST"))
        .and(path("/find_crawler_rule"))
        .and(body_partial_json(json!({"url": "https://importpython.com/blog/feed/"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok", "result": text})))
        .mount(&backend.server)
        .await;

    let controller = backend.host_rules();
    let found = controller
        .find_crawler_rule(r#"{"method": "get", "url": "https://importpython.com/blog/feed/"}"#)
        .await
        .unwrap();
    let form = TaskForm::from_crawler_rule(&found).unwrap().with_callback("dingtalk");

    assert_eq!(form.name, "python-blog");
    assert_eq!(form.origin_url, "https://importpython.com/blog/feed/");
    assert_eq!(form.custom_info, "dingtalk:");
    assert!(form.check().is_ok());
}

#[tokio::test]
async fn test_host_browsing_flow() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/load_hosts"))
        .and(query_param("host", "importpython.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "host": "importpython.com",
            "hosts": [{"name": "importpython.com", "freq": false}]
        })))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_host_rule"))
        .and(query_param("host", "importpython.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "msg": "ok",
            "host_rule": {
                "host": "importpython.com",
                "crawler_rules": {"python-blog": rule()},
                "n": null,
                "interval": null
            }
        })))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/update_host_freq"))
        .and(query_param("n", "1"))
        .and(query_param("interval", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok"})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let mut controller = backend.host_rules();
    controller.set_filter("https://importpython.com/blog/feed/");
    controller.load_hosts().await.unwrap();
    assert_eq!(controller.visible_hosts().len(), 1);

    let host_rule = controller.show_host_rule("importpython.com").await.unwrap();
    assert!(host_rule.crawler_rules.contains_key("python-blog"));

    controller
        .update_frequency("importpython.com", 1, 3)
        .await
        .unwrap();
    assert!(controller.current_host_rule().unwrap().is_throttled());
}
