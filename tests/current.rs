mod common;

mod tests {
    use myrtio_tlc5955::current::{MAX_CURRENT_TABLE, channel_current};
    use myrtio_tlc5955::{Color, ControlSettings, LEDS_PER_CHIP, Rgb16};

    use crate::common::driver;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() <= expected.abs() * 1e-5 + 1e-7,
            "{actual} != {expected}"
        );
    }

    #[test]
    fn test_full_settings_draw_table_maximum() {
        let (mut driver, _log) = driver(2);
        driver.set_max_current(7);
        driver.set_brightness_control(127);
        driver.set_dot_correction(127);
        driver.set_all(u16::MAX);

        let leds = (2 * LEDS_PER_CHIP) as f32;
        assert_close(driver.total_current(), leds * 3.0 * MAX_CURRENT_TABLE[7]);
    }

    #[test]
    fn test_dark_chain_draws_nothing() {
        let (mut driver, _log) = driver(3);
        driver.set_max_current(7);
        assert_eq!(driver.total_current(), 0.0);
    }

    #[test]
    fn test_scale_factor_floors() {
        let mut settings = ControlSettings::new();
        settings.set_max_current([7, 7, 7]);
        settings.set_brightness_control([0, 127, 0]);
        settings.set_dot_correction([0, 0, 127]);

        let max = MAX_CURRENT_TABLE[7];
        assert_close(channel_current(&settings, Color::Red), max * 0.1 * 0.262);
        assert_close(channel_current(&settings, Color::Green), max * 0.262);
        assert_close(channel_current(&settings, Color::Blue), max * 0.1);
    }

    #[test]
    fn test_total_scales_with_grayscale() {
        let (mut driver, _log) = driver(1);
        driver.set_max_current_rgb([7, 3, 0]);
        driver.set_led_rgb(5, Rgb16::new(u16::MAX, 0, 0)).unwrap();
        driver.set_led_rgb(6, Rgb16::new(0, u16::MAX, 0)).unwrap();

        let expected = MAX_CURRENT_TABLE[7] + MAX_CURRENT_TABLE[3];
        assert_close(driver.total_current(), expected);
    }

    #[test]
    fn test_total_matches_sum_of_led_currents() {
        let (mut driver, _log) = driver(2);
        driver.set_max_current_rgb([2, 5, 6]);
        driver.set_brightness_control_rgb([30, 90, 127]);
        driver.set_dot_correction_rgb([127, 60, 10]);

        let mut expected = 0.0;
        for led in 0..driver.led_count() {
            let value = (led * 613 % 65536) as u16;
            let color = Rgb16::new(value, value / 2, u16::MAX - value);
            driver.set_led_rgb(led, color).unwrap();
            expected += driver.led_currents(color).iter().sum::<f32>();
        }

        assert_close(driver.total_current(), expected);
    }

    #[test]
    fn test_led_currents_per_color() {
        let (mut driver, _log) = driver(1);
        driver.set_max_current(7);
        let currents = driver.led_currents(Rgb16::new(u16::MAX, 0, u16::MAX));
        assert_close(currents[0], MAX_CURRENT_TABLE[7]);
        assert_eq!(currents[1], 0.0);
        assert_close(currents[2], MAX_CURRENT_TABLE[7]);
    }
}
