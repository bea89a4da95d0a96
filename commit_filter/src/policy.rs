use std::{fmt, str::FromStr};

use chrono::NaiveDate;

use crate::FilterError;

/// What to do with a start date that lies after the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// Query with the bounds as entered and let the source decide.
    #[default]
    PassThrough,
    /// Query with the bounds swapped. Stored dates stay as entered.
    Swap,
    /// Do not query until the range is ordered again. Commits of the previous range are dropped.
    Reject,
}

impl RangePolicy {
    /// Bounds to query with for the entered `start` and `end`.
    pub fn bounds(
        self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(NaiveDate, NaiveDate), FilterError> {
        if start <= end {
            return Ok((start, end));
        }
        match self {
            RangePolicy::PassThrough => Ok((start, end)),
            RangePolicy::Swap => Ok((end, start)),
            RangePolicy::Reject => Err(FilterError::InvertedRange { start, end }),
        }
    }
}

impl FromStr for RangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass-through" => Ok(RangePolicy::PassThrough),
            "swap" => Ok(RangePolicy::Swap),
            "reject" => Ok(RangePolicy::Reject),
            other => Err(format!(
                "Unknown range policy '{other}', expected one of: pass-through, swap, reject"
            )),
        }
    }
}

impl fmt::Display for RangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangePolicy::PassThrough => "pass-through",
            RangePolicy::Swap => "swap",
            RangePolicy::Reject => "reject",
        })
    }
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::RangePolicy;
    use crate::FilterError;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn ordered_ranges_pass_every_policy() {
        for policy in [RangePolicy::PassThrough, RangePolicy::Swap, RangePolicy::Reject] {
            assert_eq!(policy.bounds(day(1), day(31)), Ok((day(1), day(31))));
            assert_eq!(policy.bounds(day(5), day(5)), Ok((day(5), day(5))));
        }
    }

    #[test]
    fn inverted_ranges() {
        assert_eq!(
            RangePolicy::PassThrough.bounds(day(31), day(1)),
            Ok((day(31), day(1)))
        );
        assert_eq!(
            RangePolicy::Swap.bounds(day(31), day(1)),
            Ok((day(1), day(31)))
        );
        assert_eq!(
            RangePolicy::Reject.bounds(day(31), day(1)),
            Err(FilterError::InvertedRange {
                start: day(31),
                end: day(1)
            })
        );
    }

    #[test]
    fn parse_and_display() {
        for name in ["pass-through", "swap", "reject"] {
            let policy: RangePolicy = name.parse().unwrap();
            assert_eq!(policy.to_string(), name);
        }
        assert!("sideways".parse::<RangePolicy>().is_err());
        assert_eq!(RangePolicy::default(), RangePolicy::PassThrough);
    }
}
