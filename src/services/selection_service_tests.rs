// src/services/selection_service_tests.rs
//
// Selection Service Tests
//
// INVARIANTS TESTED:
// - Strictness: strict mode never selects a catalog candidate in the
//   wrong language, and never suppresses the keyword fallback
// - Priority: an eligible catalog candidate always beats keyword search
// - Ranking: Official > height > recency, unknowns rank lowest/oldest
// - Determinism: ties resolve by provider order, stable across calls

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::domain::{
        CandidateSource, Selection, SelectionPolicy, TrailerCandidate, TrailerKind,
    };
    use crate::services::SelectionService;

    fn policy(strict: bool) -> SelectionPolicy {
        SelectionPolicy {
            target_language: "de".to_string(),
            strict,
            preferred_height: 1080,
            allow_non_mp4_for_quality: false,
        }
    }

    fn catalog(
        language: Option<&str>,
        kind: TrailerKind,
        declared_height: Option<u32>,
        published_year: Option<i32>,
    ) -> TrailerCandidate {
        TrailerCandidate {
            source: CandidateSource::Catalog,
            language: language.map(|l| l.to_string()),
            kind,
            declared_height,
            url: format!(
                "https://www.youtube.com/watch?v={:?}-{:?}-{:?}",
                language, declared_height, published_year
            ),
            published_at: published_year
                .map(|y| Utc.with_ymd_and_hms(y, 6, 1, 0, 0, 0).unwrap()),
        }
    }

    fn keyword_hit(url: &str) -> TrailerCandidate {
        TrailerCandidate {
            source: CandidateSource::KeywordSearch,
            language: None,
            kind: TrailerKind::Unranked,
            declared_height: None,
            url: url.to_string(),
            published_at: None,
        }
    }

    // ========================================================================
    // LANGUAGE ELIGIBILITY
    // ========================================================================

    #[test]
    fn test_language_match_outranks_raw_height() {
        // Scenario: German Official 1080 vs English Official 2160,
        // non-strict, target de. The English one is not eligible because
        // a language match exists.
        let selector = SelectionService::new(policy(false));
        let cands = vec![
            catalog(Some("en"), TrailerKind::Official, Some(2160), Some(2020)),
            catalog(Some("de"), TrailerKind::Official, Some(1080), Some(2020)),
        ];

        let selection = selector.select(&cands, &[]);
        let winner = selection.candidate().unwrap();
        assert_eq!(winner.language.as_deref(), Some("de"));
        assert_eq!(winner.declared_height, Some(1080));
    }

    #[test]
    fn test_non_strict_falls_back_to_any_catalog_candidate() {
        let selector = SelectionService::new(policy(false));
        let cands = vec![catalog(
            Some("en"),
            TrailerKind::Official,
            Some(1080),
            Some(2020),
        )];

        let selection = selector.select(&cands, &[keyword_hit("https://yt/kw")]);
        let winner = selection.candidate().unwrap();
        assert_eq!(winner.source, CandidateSource::Catalog);
        assert_eq!(winner.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_strict_skips_catalog_without_language_match() {
        // Scenario: strict mode, zero German catalog entries. Catalog is
        // skipped entirely; the keyword top hit is selected.
        let selector = SelectionService::new(policy(true));
        let cands = vec![
            catalog(Some("en"), TrailerKind::Official, Some(2160), Some(2021)),
            catalog(None, TrailerKind::Official, Some(2160), Some(2021)),
        ];
        let hits = vec![keyword_hit("https://yt/top"), keyword_hit("https://yt/second")];

        let selection = selector.select(&cands, &hits);
        let winner = selection.candidate().unwrap();
        assert_eq!(winner.source, CandidateSource::KeywordSearch);
        assert_eq!(winner.url, "https://yt/top");
    }

    #[test]
    fn test_strict_never_selects_wrong_language_catalog() {
        let selector = SelectionService::new(policy(true));
        let cands = vec![
            catalog(Some("en"), TrailerKind::Official, Some(2160), Some(2021)),
            catalog(Some("de"), TrailerKind::Teaser, None, None),
            catalog(Some("fr"), TrailerKind::Official, Some(2160), Some(2021)),
        ];

        let selection = selector.select(&cands, &[]);
        let winner = selection.candidate().unwrap();
        assert_eq!(winner.language.as_deref(), Some("de"));
    }

    // ========================================================================
    // SOURCE PRIORITY
    // ========================================================================

    #[test]
    fn test_eligible_catalog_always_beats_keyword_search() {
        let selector = SelectionService::new(policy(false));
        let cands = vec![catalog(Some("de"), TrailerKind::Other, None, None)];
        let hits = vec![keyword_hit("https://yt/kw")];

        let selection = selector.select(&cands, &hits);
        assert_eq!(
            selection.candidate().unwrap().source,
            CandidateSource::Catalog
        );
    }

    #[test]
    fn test_no_candidate_when_both_sources_empty() {
        let selector = SelectionService::new(policy(false));
        let selection = selector.select(&[], &[]);
        assert!(matches!(selection, Selection::NoCandidate));
    }

    #[test]
    fn test_keyword_fallback_takes_provider_top_hit() {
        let selector = SelectionService::new(policy(false));
        let hits = vec![keyword_hit("https://yt/first"), keyword_hit("https://yt/second")];

        let selection = selector.select(&[], &hits);
        assert_eq!(selection.candidate().unwrap().url, "https://yt/first");
    }

    // ========================================================================
    // CATALOG RANKING
    // ========================================================================

    #[test]
    fn test_official_outranks_higher_resolution_teaser() {
        let selector = SelectionService::new(policy(false));
        let cands = vec![
            catalog(Some("de"), TrailerKind::Teaser, Some(2160), Some(2023)),
            catalog(Some("de"), TrailerKind::Official, Some(720), Some(2019)),
        ];

        let winner = selector.select_from_catalog(&cands).unwrap();
        assert_eq!(winner.kind, TrailerKind::Official);
    }

    #[test]
    fn test_height_breaks_official_ties() {
        let selector = SelectionService::new(policy(false));
        let cands = vec![
            catalog(Some("de"), TrailerKind::Official, Some(720), Some(2023)),
            catalog(Some("de"), TrailerKind::Official, Some(1080), Some(2019)),
        ];

        let winner = selector.select_from_catalog(&cands).unwrap();
        assert_eq!(winner.declared_height, Some(1080));
    }

    #[test]
    fn test_unknown_height_ranks_lowest() {
        let selector = SelectionService::new(policy(false));
        let cands = vec![
            catalog(Some("de"), TrailerKind::Official, None, Some(2023)),
            catalog(Some("de"), TrailerKind::Official, Some(480), Some(2019)),
        ];

        let winner = selector.select_from_catalog(&cands).unwrap();
        assert_eq!(winner.declared_height, Some(480));
    }

    #[test]
    fn test_recency_breaks_height_ties_and_unknown_is_oldest() {
        let selector = SelectionService::new(policy(false));
        let cands = vec![
            catalog(Some("de"), TrailerKind::Official, Some(1080), None),
            catalog(Some("de"), TrailerKind::Official, Some(1080), Some(2018)),
            catalog(Some("de"), TrailerKind::Official, Some(1080), Some(2024)),
        ];

        let winner = selector.select_from_catalog(&cands).unwrap();
        assert_eq!(
            winner.published_at.unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
    }

    // ========================================================================
    // DETERMINISM
    // ========================================================================

    #[test]
    fn test_full_ties_keep_provider_order() {
        let selector = SelectionService::new(policy(false));
        let mut first = catalog(Some("de"), TrailerKind::Official, Some(1080), Some(2020));
        first.url = "https://yt/first".to_string();
        let mut second = catalog(Some("de"), TrailerKind::Official, Some(1080), Some(2020));
        second.url = "https://yt/second".to_string();
        let cands = vec![first, second];

        for _ in 0..10 {
            let winner = selector.select_from_catalog(&cands).unwrap();
            assert_eq!(winner.url, "https://yt/first");
        }
    }

    #[test]
    fn test_selection_is_repeatable() {
        let selector = SelectionService::new(policy(false));
        let cands = vec![
            catalog(Some("de"), TrailerKind::Other, Some(720), Some(2019)),
            catalog(Some("de"), TrailerKind::Official, None, Some(2021)),
            catalog(Some("en"), TrailerKind::Official, Some(2160), Some(2023)),
        ];
        let hits = vec![keyword_hit("https://yt/kw")];

        let first = selector.select(&cands, &hits);
        for _ in 0..10 {
            let again = selector.select(&cands, &hits);
            assert_eq!(
                first.candidate().unwrap().url,
                again.candidate().unwrap().url
            );
        }
    }
}
