//! Usage probes run independently and the three-way join waits for all of them.

mod common;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde_json::json;
use tokio::sync::Notify;
use tokio::time::timeout;

use rephrase_core::transport::mock::{MockReply, MockTransport};
use rephrase_core::usage::{DETAIL_DEEPSEEK_BALANCE, DETAIL_GEMINI_FREE_TIER, DETAIL_OPENAI_KEY_VALID};
use rephrase_core::{Config, Provider, ProviderClient};

use common::config_with_bases;

const SETTLED: Duration = Duration::from_secs(2);
const STALLED: Duration = Duration::from_millis(100);

fn config() -> Config {
    config_with_bases(|provider| format!("https://mock.test/{}", provider.config_key()))
}

fn transport(gemini: MockReply) -> MockTransport {
    MockTransport::new()
        .respond_json(Method::GET, "/openai/models", 200, json!({"data": []}))
        .route(Method::GET, "/gemini/models", gemini)
        .respond_json(
            Method::GET,
            "/deepseek/user/balance",
            200,
            json!({"balance_infos": [{"total_balance": "10.5"}, {"total_balance": "5.25"}]}),
        )
}

#[tokio::test]
async fn hung_probe_does_not_block_the_others() {
    let transport = Arc::new(transport(MockReply::Hang));
    let client = ProviderClient::with_transport(&config(), transport);

    let openai = timeout(SETTLED, client.fetch_usage(Provider::OpenAi))
        .await
        .expect("OpenAI probe should settle");
    assert_eq!(openai.details.as_deref(), Some(DETAIL_OPENAI_KEY_VALID));

    let deepseek = timeout(SETTLED, client.fetch_usage(Provider::DeepSeek))
        .await
        .expect("DeepSeek probe should settle");
    assert_eq!(deepseek.total_used, 15.75);
    assert_eq!(deepseek.details.as_deref(), Some(DETAIL_DEEPSEEK_BALANCE));

    assert!(timeout(STALLED, client.fetch_usage(Provider::Gemini)).await.is_err());
    assert!(timeout(STALLED, client.fetch_all_usage()).await.is_err());
}

#[tokio::test]
async fn join_resolves_only_after_every_probe_settles() {
    let gate = Arc::new(Notify::new());
    let transport = Arc::new(transport(MockReply::Gated {
        gate: gate.clone(),
        status: 200,
        body: br#"{"models": []}"#.to_vec(),
    }));
    let client = Arc::new(ProviderClient::with_transport(&config(), transport.clone()));

    let join = {
        let client = client.clone();
        tokio::spawn(async move { client.fetch_all_usage().await })
    };

    tokio::time::sleep(STALLED).await;
    assert!(!join.is_finished());

    let paths: Vec<String> = transport
        .requests()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    for expected in ["/openai/models", "/gemini/models", "/deepseek/user/balance"] {
        assert!(paths.iter().any(|p| p == expected), "{expected} not requested: {paths:?}");
    }

    gate.notify_one();
    let report = timeout(SETTLED, join)
        .await
        .expect("join should settle once the gate opens")
        .expect("join task should not panic");

    assert_eq!(report.gemini.details.as_deref(), Some(DETAIL_GEMINI_FREE_TIER));
    assert_eq!(report.deepseek.total_used, 15.75);
    assert_eq!(report.openai.provider, "OpenAI");
}

#[tokio::test]
async fn transport_failure_degrades_to_a_record() {
    let transport = Arc::new(transport(MockReply::Fail("network is unreachable".into())));
    let client = ProviderClient::with_transport(&config(), transport);

    let report = timeout(SETTLED, client.fetch_all_usage()).await.unwrap();
    assert_eq!(
        report.gemini.details.as_deref(),
        Some("Unable to fetch: network is unreachable")
    );
    assert_eq!(report.gemini.total_used, 0.0);
    assert_eq!(report.deepseek.details.as_deref(), Some(DETAIL_DEEPSEEK_BALANCE));
}
