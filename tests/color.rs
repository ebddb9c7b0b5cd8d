mod tests {
    use myrtio_tlc5955::color::{from_channels, to_channels};
    use myrtio_tlc5955::{Color, Rgb, Rgb16, gamma16, widen_rgb, widen8};

    #[test]
    fn test_widen8_spans_full_range() {
        assert_eq!(widen8(0), 0);
        assert_eq!(widen8(0xAB), 0xABAB);
        assert_eq!(widen8(255), u16::MAX);
    }

    #[test]
    fn test_widen_rgb() {
        assert_eq!(
            widen_rgb(Rgb::new(1, 128, 255)),
            Rgb16::new(257, 32896, 65535)
        );
    }

    #[test]
    fn test_gamma16_endpoints() {
        for gamma in [1.0, 2.2, 2.8] {
            assert_eq!(gamma16(0, gamma), 0);
            assert_eq!(gamma16(255, gamma), u16::MAX);
        }
    }

    #[test]
    fn test_gamma16_linear_matches_widen() {
        for value in [1u8, 64, 128, 200] {
            assert_eq!(gamma16(value, 1.0), widen8(value));
        }
    }

    #[test]
    fn test_gamma16_is_monotonic() {
        let mut previous = 0;
        for value in 0..=255u8 {
            let current = gamma16(value, 2.2);
            assert!(current >= previous);
            previous = current;
        }
        assert!(gamma16(128, 2.2) < widen8(128));
    }

    #[test]
    fn test_color_indices() {
        for (index, color) in Color::ALL.into_iter().enumerate() {
            assert_eq!(color.index(), index);
            assert_eq!(Color::from_index(index), Some(color));
        }
        assert_eq!(Color::from_index(3), None);
    }

    #[test]
    fn test_channels_follow_logical_order() {
        let color = Rgb16::new(1, 2, 3);
        assert_eq!(to_channels(color), [1, 2, 3]);
        assert_eq!(from_channels([1, 2, 3]), color);
    }
}
