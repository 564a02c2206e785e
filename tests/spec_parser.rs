mod common;

mod tests {
    use curio_led_engine::{
        color::PaletteColor,
        spec::{
            AnimationKind, AnimationSpec, DEFAULT_DENSITY, DEFAULT_PULSE_HEIGHT, DEFAULT_SPEED,
            LoopModifier,
        },
    };
    use rstest::rstest;

    use crate::common::{BLUE, RED};

    #[rstest]
    #[case("")]
    #[case("  ")]
    #[case("red")]
    #[case("abc")]
    fn test_short_text_is_off(#[case] text: &str) {
        assert_eq!(AnimationSpec::parse(text), AnimationSpec::default());
        assert!(!AnimationSpec::parse(text).is_animated());
    }

    #[test]
    fn test_parse_full_spec() {
        let spec = AnimationSpec::parse("red and blue:.1, twinkle, random, fast, density:.4");

        assert_eq!(
            spec.colors,
            vec![
                PaletteColor::solid(RED),
                PaletteColor {
                    color: BLUE,
                    variation: Some([0.1; 3]),
                },
            ]
        );
        assert_eq!(spec.animation, Some(AnimationKind::Twinkle));
        assert_eq!(spec.loop_modifier, Some(LoopModifier::Random));
        assert_eq!(spec.loop_speed, 6);
        assert_eq!(spec.param("density"), Some(".4"));
        assert!((spec.density() - 0.4).abs() < f32::EPSILON);
        assert!(spec.is_animated());
    }

    #[test]
    fn test_parse_static_color() {
        let spec = AnimationSpec::parse("green and gold");
        assert_eq!(spec.colors.len(), 2);
        assert_eq!(spec.animation, None);
        assert_eq!(spec.loop_speed, DEFAULT_SPEED);
        assert!(!spec.is_animated());
    }

    #[test]
    fn test_kind_in_color_phrase() {
        let spec = AnimationSpec::parse("rainbow, fast");
        assert!(spec.colors.is_empty());
        assert_eq!(spec.animation, Some(AnimationKind::Rainbow));
        assert_eq!(spec.loop_speed, 6);
    }

    #[test]
    fn test_explicit_none_is_not_animated() {
        let spec = AnimationSpec::parse("red, none");
        assert_eq!(spec.animation, Some(AnimationKind::None));
        assert!(!spec.is_animated());
    }

    #[rstest]
    #[case("red, blink, 1", 1)]
    #[case("red, blink, 4", 4)]
    #[case("red, blink, 9", 6)]
    #[case("red, blink, 0", 1)]
    #[case("red, blink, -3", 1)]
    #[case("red, blink, gentle", 2)]
    #[case("red, blink, Normal", 3)]
    #[case("red, blink, speedy", 5)]
    #[case("red, blink", 3)]
    fn test_speed(#[case] text: &str, #[case] expected: u8) {
        assert_eq!(AnimationSpec::parse(text).loop_speed, expected);
    }

    #[test]
    fn test_variations() {
        let spec = AnimationSpec::parse("red:.1:.2:.3 and blue:.5:.25 and white:x, pulse");
        assert_eq!(spec.colors[0].variation, Some([0.1, 0.2, 0.3]));
        assert_eq!(spec.colors[1].variation, Some([0.5, 0.25, 0.25]));
        assert_eq!(spec.colors[2].variation, None);
    }

    #[test]
    fn test_unknown_tokens_are_skipped() {
        let spec = AnimationSpec::parse("red and blurple, wobble, pulse, sideways, 2");
        assert_eq!(spec.colors, vec![PaletteColor::solid(RED)]);
        assert_eq!(spec.animation, Some(AnimationKind::Pulse));
        assert_eq!(spec.loop_modifier, None);
        assert_eq!(spec.loop_speed, 2);
        assert!(spec.extra_params.is_empty());
    }

    #[test]
    fn test_case_insensitive_fields() {
        let spec = AnimationSpec::parse("RED, Pulsing, CENTERED, Mode:SPIKE");
        assert_eq!(spec.colors, vec![PaletteColor::solid(RED)]);
        assert_eq!(spec.animation, Some(AnimationKind::Pulse));
        assert!(spec.has_modifier(LoopModifier::Centered));
        assert_eq!(spec.mode(), "spike");
    }

    #[test]
    fn test_extra_defaults() {
        let spec = AnimationSpec::parse("red, pulse, density:lots, pulse_height:0");
        assert!((spec.density() - DEFAULT_DENSITY).abs() < f32::EPSILON);
        assert_eq!(spec.mode(), "linear");
        assert_eq!(spec.pulse_height(), 1);
        assert_eq!(
            AnimationSpec::parse("red, pulse").pulse_height(),
            DEFAULT_PULSE_HEIGHT
        );
        let dense = AnimationSpec::parse("red, twinkle, density:4");
        assert!((dense.density() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "gold:.2 and #ff0000, blinkenlicht, reverse, quick, mode:sin";
        assert_eq!(AnimationSpec::parse(text), AnimationSpec::parse(text));
    }

    #[rstest]
    #[case(AnimationKind::Rainbow)]
    #[case(AnimationKind::Warp)]
    #[case(AnimationKind::Pulse)]
    #[case(AnimationKind::Blink)]
    #[case(AnimationKind::Blinkenlicht)]
    #[case(AnimationKind::Twinkle)]
    fn test_kind_names(#[case] kind: AnimationKind) {
        assert_eq!(AnimationKind::parse_from_str(kind.as_str()), Some(kind));
        assert!(kind.is_animated());
    }
}
