//! Conversion between SubRip time strings and signed seconds.
//!
//! Input accepts `[-][[[dd:]hh:]mm:]ss[,fff]`; output is always the fixed
//! SubRip shape `hh:mm:ss,fff`, prefixed with `-` for negative values.

use crate::error::{Result, SrtError};

use nom::bytes::complete::take_while_m_n;
use nom::character::complete::{char, digit1, one_of};
use nom::combinator::{all_consuming, map_opt, opt};
use nom::error::VerboseError;
use nom::multi::separated_list1;
use nom::sequence::{preceded, tuple};
use nom::IResult;

/// Seconds per component, right to left: seconds, minutes, hours, days.
const UNITS: [i64; 4] = [1, 60, 60 * 60, 24 * 60 * 60];
const MILLIS_MAX: usize = 3;

/// Anything that can be turned into a time value in seconds.
pub trait TimeArg {
    fn into_secs(self) -> Result<f64>;
}

impl TimeArg for f64 {
    fn into_secs(self) -> Result<f64> {
        Ok(self)
    }
}

impl TimeArg for f32 {
    fn into_secs(self) -> Result<f64> {
        Ok(f64::from(self))
    }
}

impl TimeArg for i32 {
    fn into_secs(self) -> Result<f64> {
        Ok(f64::from(self))
    }
}

impl TimeArg for u32 {
    fn into_secs(self) -> Result<f64> {
        Ok(f64::from(self))
    }
}

impl TimeArg for i64 {
    fn into_secs(self) -> Result<f64> {
        Ok(self as f64)
    }
}

impl TimeArg for &str {
    fn into_secs(self) -> Result<f64> {
        parse_millis(self).map(|ms| ms as f64 / 1000.0)
    }
}

impl TimeArg for String {
    fn into_secs(self) -> Result<f64> {
        self.as_str().into_secs()
    }
}

impl TimeArg for &String {
    fn into_secs(self) -> Result<f64> {
        self.as_str().into_secs()
    }
}

/// Converts a time string (or a number of seconds, unchanged) into seconds.
///
/// ```
/// assert_eq!(srtedit::to_secs("01:02:03,004").unwrap(), 3723.004);
/// assert_eq!(srtedit::to_secs("-5").unwrap(), -5.0);
/// assert_eq!(srtedit::to_secs(2.5).unwrap(), 2.5);
/// ```
pub fn to_secs<T: TimeArg>(value: T) -> Result<f64> {
    value.into_secs()
}

/// Formats seconds as `hh:mm:ss,fff`, rounding to the nearest millisecond.
pub fn to_timestr(seconds: f64) -> String {
    format_millis((seconds * 1000.0).round() as i64)
}

pub(crate) fn format_millis(millis: i64) -> String {
    let sign = if millis < 0 { "-" } else { "" };
    let millis = millis.unsigned_abs();
    let total_secs = millis / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!(
        "{}{:02}:{:02}:{:02},{:03}",
        sign,
        hours,
        minutes,
        seconds,
        millis % 1000
    )
}

fn parse_millis(input: &str) -> Result<i64> {
    match all_consuming(timestamp)(input.trim()) {
        Ok((_, millis)) => Ok(millis),
        Err(_) => Err(SrtError::Time(input.to_string())),
    }
}

/// A signed timestamp in milliseconds.
pub(crate) fn timestamp(input: &str) -> IResult<&str, i64, VerboseError<&str>> {
    // A fraction like `,2` is not valid SRT, but it shows up in the wild.
    // It means `,200`, so shorter fractions are right-padded.
    let fraction = preceded(
        one_of(",."),
        take_while_m_n(1, MILLIS_MAX, |c: char| c.is_ascii_digit()),
    );
    map_opt(
        tuple((opt(char('-')), separated_list1(char(':'), digit1), opt(fraction))),
        |(sign, components, fraction): (Option<char>, Vec<&str>, Option<&str>)| {
            let magnitude = magnitude_millis(&components, fraction)?;
            Some(if sign.is_some() { -magnitude } else { magnitude })
        },
    )(input)
}

fn magnitude_millis(components: &[&str], fraction: Option<&str>) -> Option<i64> {
    if components.len() > UNITS.len() {
        return None;
    }
    let secs = components
        .iter()
        .rev()
        .zip(UNITS.iter())
        .try_fold(0i64, |acc, (component, unit)| {
            component.parse::<i64>().ok()?.checked_mul(*unit)?.checked_add(acc)
        })?;
    let millis = match fraction {
        Some(digits) => format!("{:0<3}", digits).parse::<i64>().ok()?,
        None => 0,
    };
    secs.checked_mul(1000)?.checked_add(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_to_secs {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected): (&str, f64) = $value;

                let secs = to_secs(input).unwrap();

                assert_eq!(secs, expected);
            }
        )*
        }
    }

    test_to_secs! {
        test_to_secs_0: ("00:00:01,200", 1.2),
        test_to_secs_1: ("00:00:01,2", 1.2),
        test_to_secs_2: ("00:00:01,002", 1.002),
        test_to_secs_3: ("00:00:01,02", 1.02),
        test_to_secs_4: ("1:1:1,200", 3661.2),
        test_to_secs_5: ("01:02:03,004", 3723.004),
        test_to_secs_6: ("12,500", 12.5),
        test_to_secs_7: ("12", 12.0),
        test_to_secs_8: ("1:30", 90.0),
        test_to_secs_9: ("1:00:00:00,000", 86400.0),
        test_to_secs_10: ("-5", -5.0),
        test_to_secs_11: ("-1:30,250", -90.25),
        test_to_secs_12: ("-00:00:05,000", -5.0),
        test_to_secs_13: ("00:00:01.500", 1.5),
        test_to_secs_14: (" 3,000 ", 3.0),
        test_to_secs_15: ("100:00:00,001", 360000.001),
    }

    macro_rules! test_bad_timestr {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let input: &str = $value;

                match to_secs(input) {
                    Err(SrtError::Time(s)) => assert_eq!(s, input),
                    other => panic!("expected a time error for {:?}, got {:?}", input, other),
                }
            }
        )*
        }
    }

    test_bad_timestr! {
        test_bad_timestr_0: "00:00:aa,000",
        test_bad_timestr_1: "",
        test_bad_timestr_2: "-",
        test_bad_timestr_3: "00:00:01,",
        test_bad_timestr_4: "00:00:01,0000",
        test_bad_timestr_5: "00;00;01,000",
        test_bad_timestr_6: "1:2:3:4:5",
        test_bad_timestr_7: "00:00:",
        test_bad_timestr_8: "--5",
        test_bad_timestr_9: "5-",
        test_bad_timestr_10: "99999999999999999999",
    }

    macro_rules! test_write_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected): (f64, &str) = $value;

                assert_eq!(to_timestr(input), expected);
            }
        )*
        }
    }

    test_write_ts! {
        test_write_ts_0: (0.0, "00:00:00,000"),
        test_write_ts_1: (0.001, "00:00:00,001"),
        test_write_ts_2: (0.999, "00:00:00,999"),
        test_write_ts_3: (1.0, "00:00:01,000"),
        test_write_ts_4: (59.999, "00:00:59,999"),
        test_write_ts_5: (60.0, "00:01:00,000"),
        test_write_ts_6: (3600.0, "01:00:00,000"),
        test_write_ts_7: (7326.159, "02:02:06,159"),
        test_write_ts_8: (360000.001, "100:00:00,001"),
        test_write_ts_9: (-5.0, "-00:00:05,000"),
        test_write_ts_10: (-3723.004, "-01:02:03,004"),
        test_write_ts_11: (1.0004, "00:00:01,000"),
        test_write_ts_12: (1.0006, "00:00:01,001"),
        test_write_ts_13: (59.9996, "00:01:00,000"),
        test_write_ts_14: (-0.0001, "00:00:00,000"),
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(to_secs(12.345f64).unwrap(), 12.345);
        assert_eq!(to_secs(-0.5f64).unwrap(), -0.5);
        assert_eq!(to_secs(7).unwrap(), 7.0);
        assert_eq!(to_secs(-7i64).unwrap(), -7.0);
        assert_eq!(to_secs(String::from("1:00")).unwrap(), 60.0);
    }

    #[test]
    fn formatting_round_trips() {
        for &x in &[0.0, -5.0, 5.0, 0.5, -0.5, 12.345, -12.345, 3723.004, -86461.999, 1e6] {
            let back = to_secs(to_timestr(x).as_str()).unwrap();
            assert!((back - x).abs() <= 0.0005, "{} came back as {}", x, back);
        }
    }

    #[test]
    fn timestamp_stops_before_trailing_input() {
        let (rest, millis) = timestamp("00:00:02,500 --> x").unwrap();
        assert_eq!(millis, 2500);
        assert_eq!(rest, " --> x");
    }
}
