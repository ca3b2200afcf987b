//! End-to-end discovery against mock search and generation.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use grant_harvester::discovery::build_queries;
use grant_harvester::types::source::DISCOVERED_BY;
use grant_harvester::{
    persist_all, CandidateSource, DiscoveryConfig, DiscoveryOrchestrator, DiscoveryRequest,
    DiscoveryScope, MockGenerator, MockSearcher, MockSink,
};
use proptest::prelude::*;

fn candidate(title: &str, url: &str) -> CandidateSource {
    CandidateSource::new(title, url, "Convocatorias abiertas")
}

#[tokio::test]
async fn espana_madrid_yields_one_validated_source() {
    let searcher = Arc::new(MockSearcher::new().with_default_results(vec![candidate(
        "Subvenciones Comunidad de Madrid",
        "https://www.comunidad.madrid/servicios/subvenciones/",
    )]));
    let generator = Arc::new(MockGenerator::new().with_reply(
        r#"{"confidence":0.92,"description":"Portal de ayudas regionales","organization":"Comunidad de Madrid","region":"Madrid"}"#,
    ));

    let request = DiscoveryRequest::new("espana")
        .with_regions(vec!["Madrid".to_string()])
        .with_max_results(20);
    let sources = DiscoveryOrchestrator::new(searcher.clone())
        .with_validator(generator.clone())
        .discover(&request)
        .await;

    assert_eq!(sources.len(), 1);
    let source = &sources[0];
    assert_eq!(source.base_url, "https://www.comunidad.madrid/servicios/subvenciones");
    assert_eq!(source.metadata.region, "Madrid");
    assert_eq!(source.metadata.organization, "Comunidad de Madrid");
    assert_eq!(source.metadata.confidence, 0.92);
    assert_eq!(source.metadata.discovered_by, DISCOVERED_BY);
    assert!(!source.is_active);

    // Every query ran, but the duplicate URL was validated only once.
    let expected = build_queries(DiscoveryScope::Espana, &["Madrid".to_string()]);
    assert_eq!(searcher.queries(), expected);
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn duplicate_urls_across_queries_appear_once() {
    let queries = build_queries(DiscoveryScope::Europa, &[]);
    let searcher = MockSearcher::new()
        .with_results(
            queries[0].clone(),
            vec![candidate("Fondos europeos", "https://ec.europa.eu/funding")],
        )
        .with_results(
            queries[1].clone(),
            vec![
                candidate("Fondos europeos (copy)", "https://ec.europa.eu/funding/?ref=search"),
                candidate("Horizon Europe", "https://ec.europa.eu/horizon"),
            ],
        );

    let sources = DiscoveryOrchestrator::new(Arc::new(searcher))
        .discover(&DiscoveryRequest::new("europa").with_ai_validation(false))
        .await;

    let urls: Vec<_> = sources.iter().map(|s| s.base_url.as_str()).collect();
    assert_eq!(urls, vec!["https://ec.europa.eu/funding", "https://ec.europa.eu/horizon"]);
    assert_eq!(sources[0].name, "Fondos europeos");
}

#[tokio::test]
async fn early_stop_skips_remaining_queries() {
    let results: Vec<_> = (0..10)
        .map(|i| candidate("Ayudas", &format!("https://ayuntamiento{}.es/ayudas", i)))
        .collect();
    let searcher = Arc::new(MockSearcher::new().with_default_results(results));

    let sources = DiscoveryOrchestrator::new(searcher.clone())
        .discover(&DiscoveryRequest::new("espana").with_max_results(3).with_ai_validation(false))
        .await;

    assert_eq!(sources.len(), 3);
    assert_eq!(searcher.queries().len(), 1);
}

#[tokio::test]
async fn failed_query_is_skipped() {
    let queries = build_queries(DiscoveryScope::Internacional, &[]);
    let searcher = MockSearcher::new()
        .with_failing_query(queries[0].clone())
        .with_results(
            queries[1].clone(),
            vec![candidate("Grants.gov", "https://www.grants.gov/search")],
        );

    let sources = DiscoveryOrchestrator::new(Arc::new(searcher))
        .discover(&DiscoveryRequest::new("internacional").with_ai_validation(false))
        .await;

    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].base_url, "https://www.grants.gov/search");
}

#[tokio::test]
async fn slow_search_is_skipped() {
    let searcher = MockSearcher::new()
        .with_default_results(vec![candidate("Ayudas", "https://a.gob.es")])
        .with_delay(Duration::from_millis(200));

    let sources = DiscoveryOrchestrator::new(Arc::new(searcher))
        .with_config(DiscoveryConfig::new().with_search_timeout(Duration::from_millis(10)))
        .discover(&DiscoveryRequest::new("espana").with_ai_validation(false))
        .await;

    assert!(sources.is_empty());
}

#[tokio::test]
async fn domain_filter_is_opt_in() {
    let searcher = Arc::new(MockSearcher::new().with_default_results(vec![
        candidate("Blog de subvenciones", "https://ayudas-blog.com/lista"),
        candidate("Sede electrónica", "https://sede.gob.es/ayudas"),
    ]));
    let orchestrator = DiscoveryOrchestrator::new(searcher);

    let permissive = orchestrator
        .discover(&DiscoveryRequest::new("espana").with_ai_validation(false))
        .await;
    assert_eq!(permissive.len(), 2);

    let filtered = orchestrator
        .discover(
            &DiscoveryRequest::new("espana")
                .with_ai_validation(false)
                .with_domain_filter(true),
        )
        .await;
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].base_url, "https://sede.gob.es/ayudas");
}

#[tokio::test]
async fn output_keeps_search_order() {
    let searcher = MockSearcher::new().with_default_results(vec![
        candidate("Portal", "https://c.es"),
        candidate("Ayudas a la innovación", "https://a.es"),
        candidate("Otro portal", "https://b.es"),
    ]);

    let sources = DiscoveryOrchestrator::new(Arc::new(searcher))
        .discover(&DiscoveryRequest::new("espana").with_ai_validation(false))
        .await;

    let urls: Vec<_> = sources.iter().map(|s| s.base_url.as_str()).collect();
    assert_eq!(urls, vec!["https://c.es", "https://a.es", "https://b.es"]);
    // Higher-scoring candidate is not moved forward.
    assert!(sources[1].metadata.confidence > sources[0].metadata.confidence);
}

#[tokio::test]
async fn invalid_validation_answer_falls_back_to_heuristic() {
    let searcher = MockSearcher::new()
        .with_default_results(vec![candidate("Subvenciones Andalucía", "https://juntadeandalucia.es")]);
    let generator = Arc::new(MockGenerator::new().with_reply("{}"));

    let sources = DiscoveryOrchestrator::new(Arc::new(searcher))
        .with_validator(generator)
        .discover(&DiscoveryRequest::new("espana"))
        .await;

    assert_eq!(sources.len(), 1);
    assert!((sources[0].metadata.confidence - 0.6).abs() < 1e-9);
    assert_eq!(sources[0].metadata.region, "N/A");
    assert_eq!(sources[0].metadata.description, "Convocatorias abiertas");
    assert_eq!(sources[0].metadata.organization, "Subvenciones Andalucía");
}

#[tokio::test]
async fn concurrent_runs_keep_separate_dedup_sets() {
    let searcher = Arc::new(
        MockSearcher::new().with_default_results(vec![candidate("Ayudas", "https://a.gob.es")]),
    );
    let orchestrator = DiscoveryOrchestrator::new(searcher);
    let request = DiscoveryRequest::new("espana").with_ai_validation(false);

    let runs = futures::future::join_all((0..8).map(|_| orchestrator.discover(&request))).await;
    assert!(runs.iter().all(|sources| sources.len() == 1));
}

#[tokio::test]
async fn discovered_sources_can_be_persisted() {
    let searcher = MockSearcher::new().with_default_results(vec![
        candidate("Ayudas", "https://a.gob.es"),
        candidate("Subvenciones", "https://b.gob.es"),
    ]);
    let sources = DiscoveryOrchestrator::new(Arc::new(searcher))
        .discover(&DiscoveryRequest::new("espana").with_ai_validation(false))
        .await;

    let sink = MockSink::new();
    assert_eq!(persist_all(&sink, &sources).await, 2);
    assert_eq!(sink.persisted(), sources);
}

fn url_pool() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0usize..12, 0..6), 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn urls_unique_and_budget_respected(per_query in url_pool(), max_results in 1usize..10) {
        let queries = build_queries(DiscoveryScope::Europa, &[]);
        let mut searcher = MockSearcher::new();
        for (query, ids) in queries.iter().zip(&per_query) {
            let results = ids
                .iter()
                .map(|id| candidate("Funding", &format!("https://portal{}.europa.eu/calls/", id)))
                .collect();
            searcher = searcher.with_results(query.clone(), results);
        }

        let sources = tokio_test::block_on(
            DiscoveryOrchestrator::new(Arc::new(searcher)).discover(
                &DiscoveryRequest::new("europa")
                    .with_max_results(max_results)
                    .with_ai_validation(false),
            ),
        );

        let unique: HashSet<_> = sources.iter().map(|s| s.base_url.clone()).collect();
        prop_assert_eq!(unique.len(), sources.len());
        prop_assert!(sources.len() <= max_results);
    }
}
