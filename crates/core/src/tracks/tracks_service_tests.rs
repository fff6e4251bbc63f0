#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::events::{DomainEvent, MockDomainEventSink};
    use crate::tracks::{
        InMemoryTrackRepository, TrackRepositoryTrait, TrackService, TrackServiceTrait,
        TrackSourceTrait, TrackSummary,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use std::sync::Arc;

    // --- Mock track source ---
    #[derive(Default)]
    struct MockTrackSource;

    #[async_trait]
    impl TrackSourceTrait for MockTrackSource {
        async fn fetch(&self, url: &str) -> Result<TrackSummary> {
            if url.contains("broken") {
                return Err(Error::TrackSource(format!("cannot parse {}", url)));
            }
            Ok(TrackSummary {
                h_date: NaiveDate::from_ymd_opt(2016, 2, 19).unwrap(),
                pilot: "Miguel Angel Gordillo".to_string(),
                glider: "RV8".to_string(),
                glider_id: "EC-XLL".to_string(),
                track_length: 12.5,
            })
        }
    }

    struct Fixture {
        service: Arc<TrackService>,
        repository: Arc<InMemoryTrackRepository>,
        sink: MockDomainEventSink,
    }

    fn fixture() -> Fixture {
        let repository = Arc::new(InMemoryTrackRepository::new());
        let sink = MockDomainEventSink::new();
        let service = TrackService::new(
            repository.clone(),
            Arc::new(MockTrackSource),
            Arc::new(sink.clone()),
        )
        .unwrap();
        Fixture {
            service: Arc::new(service),
            repository,
            sink,
        }
    }

    #[tokio::test]
    async fn test_ingest_assigns_sequential_ids() {
        let f = fixture();

        for n in 1..=4u64 {
            let track = f
                .service
                .ingest(&format!("http://tracks.test/{}.igc", n))
                .await
                .unwrap();
            assert_eq!(track.id(), format!("igc{}", n));
            assert_eq!(f.service.count().unwrap(), n);
        }

        assert_eq!(
            f.service.list_ids().unwrap(),
            vec!["igc1", "igc2", "igc3", "igc4"]
        );
    }

    #[tokio::test]
    async fn test_ingest_tokens_are_strictly_increasing() {
        let f = fixture();
        let mut previous = None;
        for _ in 0..10 {
            let track = f.service.ingest("http://tracks.test/a.igc").await.unwrap();
            if let Some(prev) = previous {
                assert!(track.timestamp > prev);
            }
            previous = Some(track.timestamp);
        }
        assert_eq!(f.service.latest_token().unwrap(), previous.unwrap());
    }

    #[tokio::test]
    async fn test_ingest_rejects_empty_url() {
        let f = fixture();

        for url in ["", "   "] {
            let err = f.service.ingest(url).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert_eq!(f.service.count().unwrap(), 0);
        assert!(f.sink.is_empty());
    }

    #[tokio::test]
    async fn test_ingest_source_failure_is_client_error_and_allocates_nothing() {
        let f = fixture();

        let err = f
            .service
            .ingest("http://tracks.test/broken.igc")
            .await
            .unwrap_err();
        assert!(err.is_client_error());

        let track = f.service.ingest("http://tracks.test/ok.igc").await.unwrap();
        assert_eq!(track.id(), "igc1");
    }

    #[tokio::test]
    async fn test_ingest_emits_event() {
        let f = fixture();
        let track = f.service.ingest("http://tracks.test/a.igc").await.unwrap();

        assert_eq!(
            f.sink.events(),
            vec![DomainEvent::track_ingested(1, track.timestamp)]
        );
    }

    #[tokio::test]
    async fn test_concurrent_ingestions_never_share_ids() {
        let f = fixture();

        let handles: Vec<_> = (0..25)
            .map(|i| {
                let service = f.service.clone();
                tokio::spawn(async move {
                    service
                        .ingest(&format!("http://tracks.test/{}.igc", i))
                        .await
                        .unwrap()
                        .seq
                })
            })
            .collect();

        let mut seqs = HashSet::new();
        for handle in handles {
            assert!(seqs.insert(handle.await.unwrap()));
        }
        assert_eq!(seqs, (1..=25).collect::<HashSet<u64>>());
        assert_eq!(f.service.count().unwrap(), 25);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_ingestions_emit_events_in_seq_order() {
        let f = fixture();

        let handles: Vec<_> = (0..40)
            .map(|i| {
                let service = f.service.clone();
                tokio::spawn(async move {
                    service
                        .ingest(&format!("http://tracks.test/{}.igc", i))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let seqs: Vec<u64> = f
            .sink
            .events()
            .into_iter()
            .map(|event| match event {
                DomainEvent::TrackIngested { seq, .. } => seq,
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        assert_eq!(seqs, (1..=40).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_get_track_and_fields() {
        let f = fixture();
        f.service.ingest("http://tracks.test/a.igc").await.unwrap();

        let track = f.service.get_track("igc1").unwrap();
        assert_eq!(track.pilot, "Miguel Angel Gordillo");
        assert_eq!(f.service.get_field("igc1", "glider").unwrap(), "RV8");
        assert_eq!(f.service.get_field("igc1", "track_length").unwrap(), "12.5");
        assert_eq!(
            f.service.get_field("igc1", "track_src_url").unwrap(),
            "http://tracks.test/a.igc"
        );

        assert!(f.service.get_track("igc2").unwrap_err().is_client_error());
        assert!(f.service.get_track("track1").unwrap_err().is_client_error());
        assert!(f
            .service
            .get_field("igc1", "wingspan")
            .unwrap_err()
            .is_client_error());
    }

    #[tokio::test]
    async fn test_latest_token_on_empty_store_is_client_error() {
        let f = fixture();
        assert!(f.service.latest_token().unwrap_err().is_client_error());
    }

    #[tokio::test]
    async fn test_wipe_resets_count_but_not_numbering() {
        let f = fixture();
        for _ in 0..3 {
            f.service.ingest("http://tracks.test/a.igc").await.unwrap();
        }

        assert_eq!(f.service.wipe().await.unwrap(), 3);
        assert_eq!(f.service.count().unwrap(), 0);
        assert!(f.service.list_ids().unwrap().is_empty());
        assert!(f.service.get_track("igc1").is_err());
        assert_eq!(f.service.high_water().unwrap(), 3);

        let track = f.service.ingest("http://tracks.test/b.igc").await.unwrap();
        assert_eq!(track.id(), "igc4");
        assert_eq!(f.service.count().unwrap(), 1);
        assert_eq!(f.service.list_ids().unwrap(), vec!["igc4"]);
        assert!(f
            .sink
            .events()
            .contains(&DomainEvent::tracks_wiped(3)));
    }

    #[tokio::test]
    async fn test_service_resumes_from_repository_state() {
        let f = fixture();
        f.service.ingest("http://tracks.test/a.igc").await.unwrap();
        f.service.ingest("http://tracks.test/b.igc").await.unwrap();

        let restarted = TrackService::new(
            f.repository.clone(),
            Arc::new(MockTrackSource),
            Arc::new(MockDomainEventSink::new()),
        )
        .unwrap();
        let track = restarted.ingest("http://tracks.test/c.igc").await.unwrap();

        assert_eq!(track.id(), "igc3");
        assert!(track.timestamp > f.repository.get_by_seq(2).unwrap().unwrap().timestamp);
    }
}
