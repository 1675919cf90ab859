#[cfg(test)]
mod tests {
    use crate::error::GuideError;
    use crate::feed::{FeedSource, StaticFeedSource};
    use crate::models::{parse_xmltv_time, Category, GridWindow};
    use crate::services::grid::{
        clip, get_data, project_snapshot, ChannelRange, Clip, GridRequest,
    };
    use crate::store::ListingsStore;
    use chrono::{DateTime, Duration, FixedOffset};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn at(value: &str) -> DateTime<FixedOffset> {
        parse_xmltv_time(value).unwrap()
    }

    fn channel(id: &str, names: &[&str]) -> String {
        let names: String = names
            .iter()
            .map(|n| format!("<display-name>{}</display-name>", n))
            .collect();
        format!(r#"<channel id="{}">{}</channel>"#, id, names)
    }

    fn programme(channel: &str, start: &str, stop: &str, title: &str, extra: &str) -> String {
        format!(
            r#"<programme start="{} +0000" stop="{} +0000" channel="{}"><title>{}</title>{}</programme>"#,
            start, stop, channel, title, extra
        )
    }

    fn loaded_store(body: &[String]) -> ListingsStore {
        let xml = format!("<tv>{}</tv>", body.concat());
        let source: Arc<dyn FeedSource> = Arc::new(StaticFeedSource::new("grid-test", xml));
        let store = ListingsStore::new(source);
        store.refresh().unwrap();
        store
    }

    fn single_programme_store() -> ListingsStore {
        loaded_store(&[
            channel("c5", &["5", "KPIX"]),
            programme("c5", "20240324010000", "20240324020000", "Evening News", ""),
        ])
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clipping
    // ─────────────────────────────────────────────────────────────────────────

    fn window(now: &str, count: u32, width: u32) -> GridWindow {
        GridWindow::starting_at_or_before(at(&format!("{} +0000", now)), count, width).unwrap()
    }

    #[test]
    fn test_clip_inside_window() {
        let w = window("20240324010000", 3, 30);
        let c = clip(at("20240324011000 +0000"), at("20240324014000 +0000"), &w);
        assert_eq!(
            c,
            Clip {
                span_minutes: 30,
                continued_left: false,
                continued_right: false
            }
        );
    }

    #[test]
    fn test_clip_left_only() {
        let w = window("20240324010000", 3, 30);
        let c = clip(at("20240324003000 +0000"), at("20240324023000 +0000"), &w);
        assert_eq!(c.span_minutes, 90);
        assert!(c.continued_left);
        assert!(!c.continued_right);
    }

    #[test]
    fn test_clip_covering_whole_window() {
        let w = window("20240324010000", 3, 30);
        let c = clip(at("20240324000000 +0000"), at("20240324030000 +0000"), &w);
        assert_eq!(c.span_minutes, w.length_minutes());
        assert!(c.continued_left && c.continued_right);
    }

    #[test]
    fn test_clip_outside_window_is_hidden() {
        let w = window("20240324010000", 1, 30);
        assert!(!clip(at("20240324000000 +0000"), at("20240324005900 +0000"), &w).is_visible());
        // Touching either edge is not overlap.
        assert!(!clip(at("20240324000000 +0000"), at("20240324010000 +0000"), &w).is_visible());
        assert!(!clip(at("20240324013000 +0000"), at("20240324020000 +0000"), &w).is_visible());
    }

    #[test]
    fn test_clip_truncates_each_difference() {
        let w = window("20240324010000", 1, 30);
        let c = clip(at("20240324005930 +0000"), at("20240324011000 +0000"), &w);
        // 10m30s total, 30s of it before the window: 10 - 0.
        assert_eq!(c.span_minutes, 10);
        assert!(c.continued_left);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Property-based tests
    // ─────────────────────────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn prop_clip_matches_overlap(offset in -300i64..300, length in 1i64..600) {
            let w = window("20240324010000", 3, 30);
            let start = w.start + Duration::minutes(offset);
            let stop = start + Duration::minutes(length);
            let c = clip(start, stop, &w);

            let overlap_start = start.max(w.start);
            let overlap_stop = stop.min(w.end);
            let expected = (overlap_stop - overlap_start).num_minutes().max(0);

            prop_assert_eq!(c.span_minutes.max(0), expected);
            prop_assert!(c.span_minutes <= w.length_minutes());
            if c.is_visible() {
                prop_assert_eq!(c.continued_left, start < w.start);
                prop_assert_eq!(c.continued_right, stop > w.end);
            }
        }

        #[test]
        fn prop_window_contains_now(minute in 0i64..2880, second in 0i64..60, width_index in 0usize..6) {
            let width = [1u32, 5, 15, 30, 60, 1440][width_index];
            let now = at("20240324000000 -0500") + Duration::minutes(minute) + Duration::seconds(second);
            let w = GridWindow::starting_at_or_before(now, 2, width).unwrap();

            prop_assert!(w.start <= now);
            prop_assert!(now < w.start + Duration::minutes(i64::from(width)));
            prop_assert_eq!(w.length_minutes(), 2 * i64::from(width));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_invalid_arguments_rejected() {
        let store = single_programme_store();
        let now = at("20240324011000 +0000");

        for request in [
            GridRequest::at(now).with_slots(0, 30),
            GridRequest::at(now).with_slots(3, 7),
            GridRequest::at(now).with_slots(3, 0),
            GridRequest::at(now).with_channel_range(Some(20), Some(10)),
            GridRequest::at(now).with_channel_range(Some(10), Some(10)),
        ] {
            let err = get_data(&store, &request).unwrap_err();
            assert!(
                matches!(err, GuideError::InvalidArgument { .. }),
                "expected InvalidArgument for {:?}",
                request
            );
        }
    }

    #[test]
    fn test_invalid_argument_reported_before_not_ready() {
        let source: Arc<dyn FeedSource> = Arc::new(StaticFeedSource::new("empty", "<tv/>"));
        let store = ListingsStore::new(source);

        let err = get_data(&store, &GridRequest::default().with_slots(3, 7)).unwrap_err();
        assert!(matches!(err, GuideError::InvalidArgument { .. }));

        let err = get_data(&store, &GridRequest::default()).unwrap_err();
        assert_eq!(err, GuideError::NotReady);
    }

    #[test]
    fn test_channel_range_admits() {
        let range = ChannelRange::new(Some(10), Some(20)).unwrap();
        assert!(!range.admits(Some(9)));
        assert!(range.admits(Some(10)));
        assert!(range.admits(Some(19)));
        assert!(!range.admits(Some(20)));
        assert!(!range.admits(None));

        let lower_only = ChannelRange::new(Some(10), None).unwrap();
        assert!(lower_only.admits(Some(5000)));
        assert!(!lower_only.admits(None));

        assert!(ChannelRange::unbounded().admits(None));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Projection scenarios
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_programme_continuing_past_single_slot() {
        let store = single_programme_store();
        let request = GridRequest::at(at("20240324012959 +0000")).with_slots(1, 30);
        let data = get_data(&store, &request).unwrap();

        assert_eq!(data.window.start, at("20240324010000 +0000"));
        assert_eq!(data.window.end, at("20240324013000 +0000"));
        let listings = &data.channel("c5").unwrap().listings;
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].span, 30);
        assert!(!listings[0].continued_left);
        assert!(listings[0].continued_right);
    }

    #[test]
    fn test_now_on_slot_boundary_starts_new_window() {
        let store = single_programme_store();
        let request = GridRequest::at(at("20240324013000 +0000")).with_slots(1, 30);
        let data = get_data(&store, &request).unwrap();

        assert_eq!(data.window.start, at("20240324013000 +0000"));
        let listings = &data.channel("c5").unwrap().listings;
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].span, 30);
        assert!(listings[0].continued_left);
        assert!(!listings[0].continued_right);
    }

    #[test]
    fn test_programme_ending_at_window_start_is_dropped() {
        let store = single_programme_store();
        let request = GridRequest::at(at("20240324021500 +0000")).with_slots(1, 30);
        let data = get_data(&store, &request).unwrap();

        assert_eq!(data.window.start, at("20240324020000 +0000"));
        assert_eq!(data.channels.len(), 1);
        assert!(data.channels[0].listings.is_empty());
    }

    #[test]
    fn test_channel_limits_select_numbered_range() {
        let store = loaded_store(&[
            channel("a", &["5"]),
            channel("b", &["15"]),
            channel("c", &["25"]),
            channel("d", &["WXYZ"]),
            programme("b", "20240324010000", "20240324020000", "Match", ""),
        ]);
        let request = GridRequest::at(at("20240324011000 +0000"))
            .with_channel_range(Some(10), Some(20));
        let data = get_data(&store, &request).unwrap();

        let ids: Vec<_> = data.channels.iter().map(|c| c.channel.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(data.channels[0].listings.len(), 1);

        let upper_only = GridRequest::at(at("20240324011000 +0000"))
            .with_channel_range(None, Some(16));
        let ids: Vec<_> = get_data(&store, &upper_only)
            .unwrap()
            .channels
            .into_iter()
            .map(|c| c.channel.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_channels_in_presentation_order_with_empty_lists() {
        let store = loaded_store(&[
            channel("two", &["2"]),
            channel("none", &["NONE"]),
            channel("one", &["1"]),
            programme("two", "20240324010000", "20240324013000", "Show", ""),
        ]);
        let data = get_data(&store, &GridRequest::at(at("20240324011000 +0000"))).unwrap();

        let ids: Vec<_> = data.channels.iter().map(|c| c.channel.id.as_str()).collect();
        assert_eq!(ids, vec!["one", "two", "none"]);
        assert!(data.channel("one").unwrap().listings.is_empty());
        assert_eq!(data.channel("two").unwrap().listings.len(), 1);
        assert_eq!(data.channel("none").unwrap().channel.abbreviation.as_deref(), Some("NONE"));
    }

    #[test]
    fn test_listings_ordered_by_true_start() {
        let store = loaded_store(&[
            channel("c5", &["5"]),
            programme("c5", "20240324020000", "20240324023000", "Third", ""),
            programme("c5", "20240324003000", "20240324013000", "First", ""),
            programme("c5", "20240324013000", "20240324020000", "Second", ""),
        ]);
        let data = get_data(&store, &GridRequest::at(at("20240324011000 +0000"))).unwrap();

        let titles: Vec<_> = data.channels[0]
            .listings
            .iter()
            .map(|l| l.title.as_str())
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        assert_eq!(data.channels[0].listings[0].span, 30);
        assert!(data.channels[0].listings[0].continued_left);
    }

    #[test]
    fn test_classification_and_markers() {
        let store = loaded_store(&[
            channel("c5", &["5"]),
            channel("c6", &["6"]),
            channel("c7", &["7"]),
            programme(
                "c5",
                "20240324010000",
                "20240324013000",
                "Feature",
                r#"<category>Drama</category><category>Movie</category><stereo>stereo</stereo>
                   <rating system="VCHIP"><value>TV-14</value></rating>
                   <rating system="MPAA"><value>PG-13</value></rating>"#,
            ),
            programme(
                "c6",
                "20240324010000",
                "20240324013000",
                "Headlines",
                r#"<category>NEWS</category><subtitles type="teletext"/>
                   <rating system="MPAA"><value>G</value></rating>"#,
            ),
            programme("c7", "20240324010000", "20240324013000", "Untagged", "<subtitles/>"),
        ]);
        let data = get_data(&store, &GridRequest::at(at("20240324010000 +0000"))).unwrap();

        let movie = &data.channel("c5").unwrap().listings[0];
        assert_eq!(movie.category, Some(Category::Movie));
        assert_eq!(movie.rating.as_deref(), Some("PG-13"));
        assert!(movie.stereo);
        assert!(!movie.subtitled);

        let news = &data.channel("c6").unwrap().listings[0];
        assert_eq!(news.category, Some(Category::News));
        assert_eq!(news.rating, None);
        assert!(news.subtitled);

        let plain = &data.channel("c7").unwrap().listings[0];
        assert_eq!(plain.category, None);
        assert!(!plain.stereo);
        assert!(!plain.subtitled);
    }

    #[test]
    fn test_unknown_channel_programmes_are_skipped() {
        let store = loaded_store(&[
            channel("c5", &["5"]),
            programme("ghost", "20240324010000", "20240324020000", "Orphan", ""),
        ]);
        let data = get_data(&store, &GridRequest::at(at("20240324011000 +0000"))).unwrap();
        assert_eq!(data.channels.len(), 1);
        assert_eq!(data.total_listings(), 0);
    }

    #[test]
    fn test_repeated_calls_are_byte_identical() {
        let store = loaded_store(&[
            channel("c5", &["5", "KPIX"]),
            channel("c7", &["7"]),
            programme("c5", "20240324003000", "20240324020000", "A", "<category>kids</category>"),
            programme("c7", "20240324010000", "20240324040000", "B", ""),
        ]);
        let request = GridRequest::at(at("20240324011000 +0000"));

        let first = serde_json::to_vec(&get_data(&store, &request).unwrap()).unwrap();
        let second = serde_json::to_vec(&get_data(&store, &request).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_project_snapshot_uses_given_snapshot() {
        let store = single_programme_store();
        let snapshot = store.snapshot().unwrap();
        let w = window("20240324010000", 2, 60);

        let data = project_snapshot(&snapshot, &w, ChannelRange::unbounded());
        assert_eq!(data.window, w);
        assert_eq!(data.channels[0].listings[0].span, 60);
        assert!(!data.channels[0].listings[0].continued_right);
    }
}
