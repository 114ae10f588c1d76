//! Integration tests for the journal ranking pipeline.
//!
//! These tests load a catalog from CSV text, run the full pipeline and
//! exercise pool export and selection validation on disk.

use std::collections::HashSet;

use journal_rank::catalog::loader;
use journal_rank::catalog::Catalog;
use journal_rank::config::RankingParams;
use journal_rank::error::RankError;
use journal_rank::models::{Mode, Query, Rating};
use journal_rank::ranking::lexicon::LexiconRegistry;
use journal_rank::ranking::pipeline::{Pipeline, RecommendOptions};
use journal_rank::ranking::pool::{validate_selection, CandidatePool, Selection, SelectionItem};

const HEADER: &str = "Field,Journal Title,AJG 2024,AJG 2021,Citescore rank,SNIP rank,SJR rank,JIF rank,SDG content indicator (2017-21),International co-authorship (2017-21),Academic-non-academic collaboration (2017-21),Citations in policy documents (2017-21)";

/// Helper: build catalog CSV text from (field, title, rating) rows.
fn csv_text(rows: &[(String, String, &str)]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for (field, title, rating) in rows {
        out.push_str(&format!("{field},\"{title}\",{rating},{rating},,,,,,,,\n"));
    }
    out
}

/// Helper: 100 equally relevant trade journals, tiers 1..4 interleaved.
fn interleaved_catalog() -> Catalog {
    let tiers = ["1", "2", "3", "4"];
    let rows: Vec<(String, String, &str)> = (0..100)
        .map(|i| {
            (
                "ECON".to_string(),
                format!("Journal of Trade Studies {i}"),
                tiers[i % 4],
            )
        })
        .collect();
    loader::from_reader(csv_text(&rows).as_bytes()).unwrap()
}

fn trade_query(mode: Mode) -> Query {
    Query::new(
        "ECON",
        "Retaliatory tariffs and farm trade",
        "We study the trade war and agricultural exports.",
        mode,
    )
}

#[test]
fn test_end_to_end_csv_load_and_rank() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.csv");
    let rows = vec![
        ("ECON".to_string(), "Journal of Agricultural Economics".to_string(), "3"),
        ("ECON".to_string(), "Econometrica".to_string(), "4*"),
        ("IB&AREA".to_string(), "The World Economy".to_string(), "2"),
        ("PUB SEC".to_string(), "Food Policy".to_string(), "3"),
        ("FINANCE".to_string(), "Journal of Finance".to_string(), "4*"),
    ];
    std::fs::write(&path, csv_text(&rows)).unwrap();

    let catalog = loader::load_csv(&path).unwrap();
    assert_eq!(catalog.len(), 5);

    let lexicons = LexiconRegistry::builtin();
    let params = RankingParams::default();
    let pipeline = Pipeline::new(&catalog, &lexicons, &params);
    let options = RecommendOptions {
        topk: 3,
        ..Default::default()
    };

    let rec = pipeline.run(&trade_query(Mode::Medium), &options).unwrap();
    // Finance is outside the ECON scope.
    assert_eq!(rec.gating.total_before, 4);
    assert_eq!(rec.items.len(), 3);
    assert!(rec.items.iter().all(|r| r.journal.field != "FINANCE"));
    // The methods journal is penalized below the applied ones.
    assert!(rec.items.iter().all(|r| r.journal.name != "Econometrica"));
}

#[test]
fn test_balanced_easy_split_from_interleaved_tiers() {
    let catalog = interleaved_catalog();
    let lexicons = LexiconRegistry::builtin();
    let params = RankingParams::default();
    let pipeline = Pipeline::new(&catalog, &lexicons, &params);

    let options = RecommendOptions {
        topk: 10,
        rebalance: true,
        exact_balance: true,
        ..Default::default()
    };
    let rec = pipeline.run(&trade_query(Mode::Easy), &options).unwrap();

    assert_eq!(rec.items.len(), 10);
    let tier1 = rec.items.iter().filter(|r| r.journal.rating == Rating::Tier1).count();
    let tier2 = rec.items.iter().filter(|r| r.journal.rating == Rating::Tier2).count();
    assert_eq!((tier1, tier2), (5, 5));

    let meta = rec.rebalance.unwrap();
    assert!(!meta.adjacent_filled);
    assert!(!meta.insufficient_total_candidates);
}

#[test]
fn test_adjacent_fill_when_tier_is_short() {
    let mut rows: Vec<(String, String, &str)> = vec![
        ("ECON".to_string(), "Journal of Trade A".to_string(), "1"),
        ("ECON".to_string(), "Journal of Trade B".to_string(), "1"),
    ];
    rows.extend((0..30).map(|i| ("ECON".to_string(), format!("Trade Review {i}"), "2")));
    let catalog = loader::from_reader(csv_text(&rows).as_bytes()).unwrap();

    let lexicons = LexiconRegistry::builtin();
    let params = RankingParams::default();
    let pipeline = Pipeline::new(&catalog, &lexicons, &params);
    let options = RecommendOptions {
        topk: 10,
        rebalance: true,
        ..Default::default()
    };
    let rec = pipeline.run(&trade_query(Mode::Easy), &options).unwrap();

    let meta = rec.rebalance.unwrap();
    assert_eq!(meta.achieved(Rating::Tier1), 2);
    assert_eq!(meta.achieved(Rating::Tier2), 8);
    assert!(meta.adjacent_filled);
    assert_eq!(rec.items.len(), 10);
}

#[test]
fn test_pool_export_round_trip_and_validation() {
    let catalog = interleaved_catalog();
    let lexicons = LexiconRegistry::builtin();
    let params = RankingParams::default();
    let pipeline = Pipeline::new(&catalog, &lexicons, &params);
    let options = RecommendOptions {
        topk: 10,
        rating_filter: Some(vec![Rating::Tier4]),
        ..Default::default()
    };

    let pool = pipeline.candidate_pool(&trade_query(Mode::Hard), &options).unwrap();
    // 80 gated journals, a quarter of them tier 4.
    assert_eq!(pool.candidates.len(), 20);
    assert!(pool.candidates.iter().all(|c| c.rating == Rating::Tier4));

    let ids: HashSet<_> = pool.candidates.iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), pool.candidates.len());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CandidatePool::file_name(Mode::Hard));
    pool.write_json(&path).unwrap();
    let loaded = CandidatePool::read_json(&path).unwrap();
    assert_eq!(loaded, pool);

    let again = pipeline.candidate_pool(&trade_query(Mode::Hard), &options).unwrap();
    assert_eq!(
        again.candidates.iter().map(|c| c.id).collect::<Vec<_>>(),
        pool.candidates.iter().map(|c| c.id).collect::<Vec<_>>()
    );

    let pick = |i: usize| SelectionItem {
        journal: loaded.candidates[i].journal.clone(),
        topic: "trade policy".to_string(),
    };
    let selection = Selection {
        easy: vec![pick(0), pick(1)],
        medium: vec![pick(2), pick(3)],
        hard: vec![pick(4), pick(5)],
        ..Default::default()
    };
    assert!(validate_selection(&loaded, &selection, 2).is_empty());

    let overlapping = Selection {
        hard: vec![pick(0), pick(5)],
        ..selection
    };
    assert_eq!(validate_selection(&loaded, &overlapping, 2).len(), 1);
}

#[test]
fn test_no_keyword_match_leaves_field_bonus_only() {
    let rows = vec![
        ("ECON".to_string(), "Economic Journal".to_string(), "4"),
        ("PUB SEC".to_string(), "Public Administration Review".to_string(), "3"),
        ("IB&AREA".to_string(), "Journal of Regional Affairs".to_string(), "2"),
    ];
    let catalog = loader::from_reader(csv_text(&rows).as_bytes()).unwrap();
    let lexicons = LexiconRegistry::builtin();
    let params = RankingParams::default();
    let pipeline = Pipeline::new(&catalog, &lexicons, &params);

    let query = Query::new("ECON", "Notes on organisations", "", Mode::Medium);
    let pool = pipeline
        .candidate_pool(&query, &RecommendOptions::default())
        .unwrap();
    assert_eq!(pool.candidates.len(), 3);
    for c in &pool.candidates {
        assert!(c.scores.fit == 0.5 || c.scores.fit == 0.0, "{}: {}", c.journal, c.scores.fit);
    }
}

#[test]
fn test_unknown_field_is_rejected_before_ranking() {
    let catalog = interleaved_catalog();
    let lexicons = LexiconRegistry::builtin();
    let params = RankingParams::default();
    let pipeline = Pipeline::new(&catalog, &lexicons, &params);

    let query = trade_query(Mode::Easy).with_field_scope(vec!["NOT_A_FIELD".to_string()]);
    match pipeline.run(&query, &RecommendOptions::default()) {
        Err(RankError::UnknownField { field, known }) => {
            assert_eq!(field, "NOT_A_FIELD");
            assert_eq!(known, vec!["ECON".to_string()]);
        }
        other => panic!("expected UnknownField, got {other:?}"),
    }
}
