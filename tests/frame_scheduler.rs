mod common;

mod tests {
    use curio_led_engine::{
        AnimationSlot, Duration, FrameScheduler, Instant, Strand,
        frame_scheduler::ActiveAnimation,
        spec::AnimationSpec,
        strand::{SharedStrand, lock_strand},
    };

    use crate::common::{BLACK, BrokenDriver, RED, recording_strand, seeded_rng};

    fn animation(
        strand: &SharedStrand,
        index: usize,
        text: &str,
        pixels: Vec<usize>,
    ) -> ActiveAnimation {
        let spec = AnimationSpec::parse(text);
        let slot =
            AnimationSlot::new(&spec, pixels, &mut lock_strand(strand), seeded_rng()).unwrap();
        ActiveAnimation {
            strand: index,
            name: text.to_owned(),
            slot,
        }
    }

    #[test]
    fn test_cadence_every_fourth_tick() {
        let (strand, log) = recording_strand("porch", 6);
        let pulse = animation(&strand, 0, "blue, pulse", (0..6).collect());
        assert_eq!(pulse.slot.frame_interval_ticks(), 4);
        let mut scheduler = FrameScheduler::new(vec![strand], vec![pulse]);

        let mut advanced_on = Vec::new();
        for _ in 0..100 {
            let report = scheduler.step();
            assert_eq!(report.flushed, report.advanced);
            if report.advanced > 0 {
                advanced_on.push(report.tick);
            }
        }

        let expected: Vec<u64> = (1..=25).map(|n| n * 4).collect();
        assert_eq!(advanced_on, expected);
        assert_eq!(log.count(), 25);
        assert_eq!(scheduler.iteration(), 100);
    }

    #[test]
    fn test_shared_strand_is_flushed_once_per_tick() {
        let (strand, log) = recording_strand("porch", 4);
        let rainbow = animation(&strand, 0, "rainbow, fast", vec![0, 1]);
        let blink = animation(&strand, 0, "red, blink, fast", vec![2, 3]);
        let mut scheduler = FrameScheduler::new(vec![strand], vec![rainbow, blink]);

        for tick in 1..=20 {
            let report = scheduler.step();
            let expected = if tick % 10 == 0 { 2 } else { 1 };
            assert_eq!(report.advanced, expected);
            assert_eq!(report.flushed, 1);
        }
        assert_eq!(log.count(), 20);
    }

    #[test]
    fn test_untouched_strand_is_not_flushed() {
        let (porch, porch_log) = recording_strand("porch", 3);
        let (garage, garage_log) = recording_strand("garage", 3);
        let blink = animation(&garage, 1, "red, blink, fast", vec![0, 1, 2]);
        let mut scheduler = FrameScheduler::new(vec![porch, garage], vec![blink]);

        for _ in 0..30 {
            scheduler.step();
        }
        assert_eq!(porch_log.count(), 0);
        assert_eq!(garage_log.count(), 3);
    }

    #[test]
    fn test_slow_blink_alternates_fully() {
        let (strand, log) = recording_strand("porch", 10);
        let blink = animation(&strand, 0, "red, blink, 1", (0..10).collect());
        let mut scheduler = FrameScheduler::new(vec![strand], vec![blink]);

        // 10 simulated seconds of 10 ms ticks
        for _ in 0..1000 {
            scheduler.step();
        }

        let frames = log.frames();
        assert_eq!(frames.len(), 5);
        for (i, frame) in frames.iter().enumerate() {
            let expected = if i % 2 == 0 { RED } else { BLACK };
            assert_eq!(frame, &vec![expected; 10]);
        }
    }

    #[test]
    fn test_driver_errors_do_not_stop_the_loop() {
        let strand = Strand::new("broken", 4, 2, Box::new(BrokenDriver)).shared();
        let blink = animation(&strand, 0, "red, blink, fast", vec![0, 1]);
        let mut scheduler = FrameScheduler::new(vec![strand.clone()], vec![blink]);

        for _ in 0..30 {
            scheduler.step();
        }
        assert_eq!(scheduler.iteration(), 30);
        assert_eq!(lock_strand(&strand).pixels(), &[RED; 2]);
    }

    #[test]
    fn test_missing_strand_is_skipped() {
        let (strand, log) = recording_strand("porch", 2);
        let mut orphan = animation(&strand, 0, "red, blink, fast", vec![0, 1]);
        orphan.strand = 3;
        let mut scheduler = FrameScheduler::new(vec![strand], vec![orphan]);

        for _ in 0..10 {
            let report = scheduler.step();
            assert_eq!(report.advanced, 0);
        }
        assert_eq!(log.count(), 0);
    }

    #[test]
    fn test_tick_timing() {
        let (strand, _) = recording_strand("porch", 2);
        let mut scheduler = FrameScheduler::with_frame_duration(
            vec![strand],
            Vec::new(),
            Duration::from_millis(10),
        );

        let result = scheduler.tick(Instant::from_millis(0));
        assert_eq!(result.next_deadline, Instant::from_millis(10));
        assert_eq!(result.sleep_duration, Duration::from_millis(10));
        assert_eq!(result.report.tick, 1);

        let result = scheduler.tick(Instant::from_millis(10));
        assert_eq!(result.next_deadline, Instant::from_millis(20));
        assert_eq!(result.sleep_duration, Duration::from_millis(10));

        // Far behind: the schedule restarts from now instead of bursting
        let result = scheduler.tick(Instant::from_millis(100));
        assert_eq!(result.next_deadline, Instant::from_millis(110));
        assert_eq!(result.sleep_duration, Duration::from_millis(10));

        // Slightly behind: no sleep, deadline keeps its rhythm
        let result = scheduler.tick(Instant::from_millis(125));
        assert_eq!(result.next_deadline, Instant::from_millis(120));
        assert_eq!(result.sleep_duration, Duration::from_millis(0));
    }
}
