use aeolus_calendar::{month_start_sequence, month_starts, NoLeapDate};

#[test]
fn decade_of_monthly_axes_are_uniform() {
    // A 122-month axis spans ten years plus two months.
    let axis = month_starts(1970, 122);
    assert_eq!(axis.len(), 122);
    assert_eq!(axis[0], NoLeapDate::new(1970, 1, 1).unwrap());
    assert_eq!(*axis.last().unwrap(), NoLeapDate::new(1980, 2, 1).unwrap());

    // Consecutive entries are exactly one no-leap month apart.
    for pair in axis.windows(2) {
        assert_eq!(pair[0].next_month_start(), pair[1]);
        assert!(pair[0].serial_days() < pair[1].serial_days());
    }
}

#[test]
fn serial_days_round_trip_through_doy() {
    // serial_days() is year * 365 + (doy - 1); confirm the decomposition.
    for &(y, m, d) in &[(1954, 1, 1), (1980, 11, 1), (2015, 12, 31), (0, 2, 28)] {
        let date = NoLeapDate::new(y, m, d).unwrap();
        let serial = date.serial_days();
        assert_eq!(serial.div_euclid(365), y as i64);
        assert_eq!(serial.rem_euclid(365) + 1, date.doy() as i64);
    }
}

#[test]
fn november_initialized_axis_crosses_two_year_boundaries() {
    let axis = month_start_sequence(1980, 11, 26).unwrap();
    let years: Vec<i32> = axis.iter().map(|d| d.year()).collect();
    assert_eq!(years[0], 1980);
    assert_eq!(years[2], 1981);
    assert_eq!(years[14], 1982);
    assert_eq!(years[25], 1982);
}
