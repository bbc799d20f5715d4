mod common;

use std::sync::Arc;

use common::{empty_page, listing_page, listing_strategy, page_url, FakeFetcher, BASE};
use ifra_core::{is_cas_number, Category, HarvestOutcome, StopReason};
use ifra_engine::{
    FetchSettings, HarvestSettings, Harvester, NullSink, ProbeMode, ReqwestFetcher,
    StrategyTable,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(base_url: &str) -> HarvestSettings {
    HarvestSettings {
        base_url: base_url.to_string(),
        pause_ms: 0,
        ..HarvestSettings::default()
    }
}

fn three_page_source() -> FakeFetcher {
    FakeFetcher::new()
        .html(
            &page_url(1),
            listing_page(
                &[("Bergamot oil", "8007-75-8", "G2.20"), ("Vanillin", "121-33-5", "")],
                true,
            ),
        )
        .html(
            &page_url(2),
            listing_page(
                &[("Bergamot oil FCF", "8007-75-8", ""), ("Cedarwood oil", "8000-27-9", "")],
                true,
            ),
        )
        .html(
            &page_url(3),
            listing_page(&[("Lemon oil", "8008-56-8", "G1.1"), ("Ambrox", "", "")], false),
        )
}

#[tokio::test]
async fn harvest_normalizes_and_deduplicates_three_pages() {
    engine_logging::initialize_for_tests();
    let fetcher = Arc::new(three_page_source());
    let harvester = Harvester::new(
        fetcher.clone(),
        settings(BASE),
        StrategyTable::new(vec![listing_strategy("views-table", true)]),
    );

    let report = harvester.run(&NullSink).await.unwrap();

    assert_eq!(report.outcome(), HarvestOutcome::Completed);
    assert_eq!(fetcher.calls(), vec![page_url(1), page_url(2), page_url(3)]);

    let keys: Vec<&str> = report.ingredients.iter().map(|i| i.natural_key()).collect();
    assert_eq!(keys, vec!["8007-75-8", "121-33-5", "8000-27-9", "8008-56-8", ""]);
    assert!(report
        .ingredients
        .iter()
        .all(|i| !i.display_name().is_empty() && Category::ALL.contains(&i.category())));

    let bergamot = &report.ingredients[0];
    assert_eq!(bergamot.display_name(), "Bergamot oil");
    assert_eq!(bergamot.regulatory_category_code(), Some("G2.20"));
    assert_eq!(bergamot.category(), Category::CitrusOils);
    assert_eq!(report.ingredients[1].category(), Category::Synthetic);
    assert_eq!(report.ingredients[1].description(), "Sweet vanilla note");
    assert_eq!(report.ingredients[2].category(), Category::NaturalOils);
    assert_eq!(report.ingredients[2].description(), "Woody note");

    let summary = &report.summary;
    assert_eq!(summary.total, 5);
    assert_eq!(summary.raw_rows, 6);
    assert_eq!(summary.duplicates_dropped, 1);
    assert_eq!(summary.with_key, 4);
    assert_eq!(summary.without_key, 1);
    assert_eq!(summary.with_category_code, 2);
    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(
        summary.category_breakdown(),
        vec![("Citrus Oils", 2), ("Synthetic", 2), ("Natural Oils", 1)]
    );
    assert_eq!(summary.strategies[0].stop, Some(StopReason::NoNextPage));
}

#[tokio::test]
async fn pooled_strategies_keep_the_first_sighting() {
    let fetcher = Arc::new(
        FakeFetcher::new()
            .json(
                "http://fake.test/api/transparency-list",
                r#"[{"cas": "8007-75-8", "name": "Bergamot (API)"}]"#,
            )
            .html(
                &page_url(1),
                listing_page(
                    &[("Bergamot oil", "8007-75-8", "G2.20"), ("Hedione", "24851-98-7", "")],
                    false,
                ),
            )
            .html(&page_url(2), empty_page()),
    );
    let mut table = StrategyTable::ifra_default();
    table.strategies.retain(|s| s.name == "rest-api" || s.name == "views-table");
    let harvester = Harvester::new(fetcher, settings(BASE), table);

    let report = harvester.run(&NullSink).await.unwrap();

    assert_eq!(report.ingredients.len(), 2);
    assert_eq!(report.ingredients[0].display_name(), "Bergamot (API)");
    assert_eq!(report.ingredients[1].display_name(), "Hedione");
    assert_eq!(report.summary.duplicates_dropped, 1);
    assert_eq!(report.summary.strategies.len(), 2);
}

#[tokio::test]
async fn default_pool_reads_a_name_first_listing_once() {
    let fetcher = Arc::new(FakeFetcher::new().html(
        &page_url(1),
        listing_page(
            &[("Rose absolute", "8007-01-0", "J1.4"), ("Galaxolide", "1222-05-5", "")],
            false,
        ),
    ));
    let harvester = Harvester::new(fetcher, settings(BASE), StrategyTable::ifra_default());

    let report = harvester.run(&NullSink).await.unwrap();

    assert_eq!(report.outcome(), HarvestOutcome::Completed);
    let names: Vec<&str> = report.ingredients.iter().map(|i| i.display_name()).collect();
    assert_eq!(names, vec!["Rose absolute", "Galaxolide"]);
    assert!(report.ingredients.iter().all(|i| !is_cas_number(i.display_name())));
    let keys: Vec<&str> = report.ingredients.iter().map(|i| i.natural_key()).collect();
    assert_eq!(keys, vec!["8007-01-0", "1222-05-5"]);

    let viable: Vec<&str> = report
        .summary
        .strategies
        .iter()
        .filter(|s| s.viable)
        .map(|s| s.strategy.as_str())
        .collect();
    assert_eq!(viable, vec!["views-table"]);
    assert_eq!(report.summary.duplicates_dropped, 0);
}

#[test]
fn exhausted_source_is_reported_not_fatal() {
    let harvester = Harvester::new(
        Arc::new(FakeFetcher::new()),
        settings(BASE),
        StrategyTable::ifra_default(),
    );

    let report = harvester.run_blocking(&NullSink).unwrap();

    assert_eq!(report.outcome(), HarvestOutcome::AllStrategiesExhausted);
    assert!(report.ingredients.is_empty());
    assert_eq!(report.summary.total, 0);
    assert_eq!(
        report.summary.strategies.len(),
        StrategyTable::ifra_default().strategies.len()
    );
    assert!(report.summary.transport_failures > 0);
}

#[test]
fn malformed_base_url_is_an_error() {
    let harvester = Harvester::new(
        Arc::new(FakeFetcher::new()),
        settings("not a url"),
        StrategyTable::ifra_default(),
    );
    assert!(harvester.run_blocking(&NullSink).is_err());
}

#[tokio::test]
async fn harvest_over_http_with_the_default_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transparency-list"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            listing_page(
                &[("Rose absolute", "8007-01-0", "J1.4"), ("Galaxolide", "1222-05-5", "")],
                true,
            ),
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/transparency-list"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            listing_page(&[("Musk ketone", "81-14-1", "")], false),
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()));
    let harvester = Harvester::new(
        fetcher,
        HarvestSettings {
            mode: ProbeMode::FirstViable,
            ..settings(&format!("{}/transparency-list", server.uri()))
        },
        StrategyTable::ifra_default(),
    );

    let report = harvester.run(&NullSink).await.unwrap();

    assert_eq!(report.outcome(), HarvestOutcome::Completed);
    let names: Vec<&str> = report.ingredients.iter().map(|i| i.display_name()).collect();
    assert_eq!(names, vec!["Rose absolute", "Galaxolide", "Musk ketone"]);
    assert_eq!(report.ingredients[0].category(), Category::LeafOils);
    assert_eq!(report.ingredients[2].description(), "Clean musk note");

    let viable: Vec<&str> = report
        .summary
        .strategies
        .iter()
        .filter(|s| s.viable)
        .map(|s| s.strategy.as_str())
        .collect();
    assert_eq!(viable, vec!["views-table"]);
    assert_eq!(
        report.summary.strategies.last().unwrap().stop,
        Some(StopReason::NoNextPage)
    );
}
