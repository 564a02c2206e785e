mod common;

mod tests {
    use std::{thread, time::Duration as StdDuration};

    use curio_led_engine::{
        Color, Duration, DriverError, GenerationId, GenerationManager, LifecycleError,
        OutputDriver, PixelGroup, Strand, spec::AnimationKind,
    };

    use crate::common::{recording_strand, seeded_rng};

    const SETTLE: StdDuration = StdDuration::from_millis(60);

    fn fast_manager() -> GenerationManager {
        GenerationManager::with_rng(seeded_rng()).with_frame_duration(Duration::from_millis(1))
    }

    #[test]
    fn test_replace_stops_previous_generation() {
        let (porch, porch_log) = recording_strand("porch", 4);
        let (garage, garage_log) = recording_strand("garage", 4);
        let strands = vec![porch, garage];
        let mut manager = fast_manager();

        let first = manager
            .replace_generation(
                &strands,
                &[PixelGroup::new("roof", 0, vec![0, 1, 2, 3], "rainbow, fast")],
            )
            .unwrap();
        assert_eq!(first, Some(GenerationId(1)));
        thread::sleep(SETTLE);
        assert!(porch_log.count() > 0);

        let second = manager
            .replace_generation(
                &strands,
                &[PixelGroup::new("door", 1, vec![0, 1], "red, twinkle, 6")],
            )
            .unwrap();
        assert_eq!(second, Some(GenerationId(2)));

        let frozen = porch_log.count();
        thread::sleep(SETTLE);
        assert_eq!(porch_log.count(), frozen);
        assert!(garage_log.count() > 0);
    }

    #[test]
    fn test_halt_is_idempotent() {
        let (porch, porch_log) = recording_strand("porch", 3);
        let strands = vec![porch];
        let mut manager = fast_manager();

        manager.halt().unwrap();
        manager
            .replace_generation(
                &strands,
                &[PixelGroup::new("all", 0, vec![0, 1, 2], "rainbow, fast")],
            )
            .unwrap();
        assert!(manager.is_running());

        manager.halt().unwrap();
        manager.halt().unwrap();
        assert!(!manager.is_running());
        assert!(manager.generation().is_none());

        let frozen = porch_log.count();
        thread::sleep(SETTLE);
        assert_eq!(porch_log.count(), frozen);
    }

    #[test]
    fn test_generation_info() {
        let (porch, _) = recording_strand("porch", 10);
        let strands = vec![porch];
        let mut manager = fast_manager();
        let groups = [
            PixelGroup::new("roof", 0, vec![0, 1, 2, 3], "blue, pulse"),
            PixelGroup::new("window", 0, vec![4, 5], "green"),
            PixelGroup::new("door", 0, vec![6], "red, blink"),
        ];

        manager.replace_generation(&strands, &groups).unwrap();
        let info = manager.generation().unwrap();
        assert_eq!(info.id, GenerationId(1));

        let summary: Vec<_> = info
            .animations
            .iter()
            .map(|animation| (animation.name.as_str(), animation.kind, animation.pixel_count))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("roof", AnimationKind::Pulse, 4),
                ("door", AnimationKind::Blink, 1),
            ]
        );
    }

    #[test]
    fn test_static_groups_start_nothing() {
        let (porch, porch_log) = recording_strand("porch", 3);
        let strands = vec![porch];
        let mut manager = fast_manager();

        let started = manager
            .replace_generation(&strands, &[PixelGroup::new("all", 0, vec![0, 1, 2], "red")])
            .unwrap();
        assert_eq!(started, None);
        assert!(!manager.is_running());
        thread::sleep(SETTLE);
        assert_eq!(porch_log.count(), 0);
    }

    #[test]
    fn test_unknown_strand_starts_nothing() {
        let (porch, porch_log) = recording_strand("porch", 3);
        let strands = vec![porch];
        let mut manager = fast_manager();

        let groups = [
            PixelGroup::new("good", 0, vec![0], "rainbow"),
            PixelGroup::new("bad", 4, vec![0], "rainbow"),
        ];
        let err = manager.replace_generation(&strands, &groups).unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::UnknownStrand { ref group, strand: 4 } if group == "bad"
        ));
        assert!(!manager.is_running());
        assert_eq!(porch_log.count(), 0);
    }

    #[test]
    fn test_drop_halts_generation() {
        let (porch, porch_log) = recording_strand("porch", 3);
        let strands = vec![porch];
        {
            let mut manager = fast_manager();
            manager
                .replace_generation(
                    &strands,
                    &[PixelGroup::new("all", 0, vec![0, 1, 2], "rainbow, fast")],
                )
                .unwrap();
            thread::sleep(SETTLE);
        }

        let frozen = porch_log.count();
        assert!(frozen > 0);
        thread::sleep(SETTLE);
        assert_eq!(porch_log.count(), frozen);
    }

    struct SlowDriver;

    impl OutputDriver for SlowDriver {
        fn write(&mut self, _colors: &[Color]) -> Result<(), DriverError> {
            thread::sleep(StdDuration::from_millis(300));
            Ok(())
        }
    }

    #[test]
    fn test_halt_timeout_keeps_generation() {
        let strands = vec![Strand::new("slow", 5, 2, Box::new(SlowDriver)).shared()];
        let mut manager = fast_manager().with_halt_timeout(Duration::from_millis(10));

        manager
            .replace_generation(&strands, &[PixelGroup::new("all", 0, vec![0, 1], "rainbow, fast")])
            .unwrap();
        thread::sleep(StdDuration::from_millis(30));

        let err = manager.halt().unwrap_err();
        assert!(matches!(err, LifecycleError::HaltTimeout(GenerationId(1))));
        assert!(manager.is_running());

        let mut halted = false;
        for _ in 0..20 {
            thread::sleep(StdDuration::from_millis(100));
            if manager.halt().is_ok() {
                halted = true;
                break;
            }
        }
        assert!(halted);
        assert!(!manager.is_running());
    }
}
