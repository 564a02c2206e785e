mod common;

mod tests {
    use curio_led_engine::{
        Color, NullDriver, OutputDriver, SmartLedsOutput, Strand,
        strand::lock_strand,
    };
    use smart_leds::{RGB8, SmartLedsWrite};

    use crate::common::{BLACK, BLUE, RED, recording_strand};

    /// Collects everything written, like a WS2812 writer would push it out.
    #[derive(Default)]
    struct FakeWriter {
        written: Vec<RGB8>,
        fail: bool,
    }

    impl SmartLedsWrite for FakeWriter {
        type Error = &'static str;
        type Color = RGB8;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            if self.fail {
                return Err("bus busy");
            }
            self.written = iterator.into_iter().map(Into::into).collect();
            Ok(())
        }
    }

    #[test]
    fn test_smart_leds_output() {
        let mut output = SmartLedsOutput::new(FakeWriter::default());
        output
            .write(&[RED, Color::new(1, 2, 3), BLUE])
            .unwrap();

        let writer = output.into_inner();
        assert_eq!(
            writer.written,
            vec![RGB8::new(255, 0, 0), RGB8::new(1, 2, 3), RGB8::new(0, 0, 255)]
        );
    }

    #[test]
    fn test_smart_leds_output_error() {
        let mut output = SmartLedsOutput::new(FakeWriter {
            fail: true,
            ..FakeWriter::default()
        });
        let err = output.write(&[RED]).unwrap_err();
        assert!(err.to_string().contains("bus busy"));
    }

    #[test]
    fn test_strand_buffer() {
        let mut strand = Strand::new("porch", 18, 3, Box::new(NullDriver));
        assert_eq!(strand.name(), "porch");
        assert_eq!(strand.pin(), 18);
        assert_eq!(strand.pixel_count(), 3);
        assert_eq!(strand.pixels(), &[BLACK; 3]);

        assert!(strand.set_pixel(2, RED));
        assert!(!strand.set_pixel(3, RED));
        assert_eq!(strand.pixel(2), Some(RED));
        assert_eq!(strand.pixel(3), None);

        strand.fill(BLUE);
        assert_eq!(strand.pixels(), &[BLUE; 3]);
        assert!(strand.show().is_ok());
    }

    #[test]
    fn test_show_flushes_whole_buffer() {
        let (strand, log) = recording_strand("porch", 4);
        {
            let mut strand = lock_strand(&strand);
            strand.set_pixel(1, RED);
            strand.show().unwrap();
        }
        assert_eq!(log.count(), 1);
        assert_eq!(log.last().unwrap(), vec![BLACK, RED, BLACK, BLACK]);
    }

    #[test]
    fn test_poisoned_strand_is_recovered() {
        let (strand, _) = recording_strand("porch", 2);
        let poisoner = strand.clone();
        let _ = std::thread::spawn(move || {
            let mut strand = lock_strand(&poisoner);
            strand.set_pixel(0, RED);
            panic!("worker died");
        })
        .join();

        assert!(strand.is_poisoned());
        assert_eq!(lock_strand(&strand).pixel(0), Some(RED));
    }
}
