//! implements a parser for the compact list syntaxes accepted on the command
//! line: comma-separated level lists (`1,2,3`) and semicolon-separated job
//! lists (`id,arrival,service;...`).
use std::fmt;
use std::str::FromStr;

use crate::types::job::{JobSpec, Ticks};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParsingError {
    BadFormat,
    BadNumber,
    WrongFieldCount,
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::BadFormat => "bad format",
            Self::BadNumber => "expected a non-negative integer",
            Self::WrongFieldCount => {
                "invalid job format, expected id,arrival,service"
            },
        })
    }
}

impl std::error::Error for ParsingError {}

/// Provides a custom, minimal, zero-copy parser of byte slices.
struct ParseState<'a> {
    from: &'a [u8],
}

impl ParseState<'_> {
    fn is_done(&self) -> bool {
        self.from.is_empty()
    }

    /// Asserts there's no more input to take, returning `result` if so, and a
    /// `BadFormat` error otherwise.
    fn expect_done_and<R>(&self, result: R) -> Result<R, ParsingError> {
        if self.is_done() {
            Ok(result)
        } else {
            Err(ParsingError::BadFormat)
        }
    }

    /// Consumes `b` if it's the next byte, returning whether it was.
    fn take_byte(&mut self, b: u8) -> bool {
        match self.from.first() {
            Some(&c) if c == b => {
                self.from = &self.from[1..];
                true
            },
            _ => false,
        }
    }

    /// Consumes a run of ASCII digits as a u64. Fails with `BadNumber` if
    /// there are no digits or the value overflows.
    fn expect_next_u64(&mut self) -> Result<u64, ParsingError> {
        let len = self
            .from
            .iter()
            .position(|c| !c.is_ascii_digit())
            .unwrap_or(self.from.len());

        if len == 0 {
            return Err(ParsingError::BadNumber);
        }

        let mut r = 0u64;
        for v in &self.from[..len] {
            r = r
                .checked_mul(10)
                .ok_or(ParsingError::BadNumber)?
                .checked_add((*v - b'0') as u64)
                .ok_or(ParsingError::BadNumber)?;
        }
        self.from = &self.from[len..];

        Ok(r)
    }

    /// Consumes a comma-separated run of numbers, stopping at the end of the
    /// input or before any byte other than a comma.
    fn expect_next_u64_list(&mut self) -> Result<Vec<u64>, ParsingError> {
        let mut values = vec![self.expect_next_u64()?];
        while self.take_byte(b',') {
            values.push(self.expect_next_u64()?);
        }

        Ok(values)
    }
}

impl<'a> From<&'a [u8]> for ParseState<'a> {
    fn from(from: &'a [u8]) -> Self {
        ParseState { from }
    }
}

/// Parses a comma-separated list of time values. Empty input yields an
/// empty list, leaving the defaults to apply.
pub fn parse_ticks_list(input: &str) -> Result<Vec<Ticks>, ParsingError> {
    let mut ps: ParseState = input.trim().as_bytes().into();

    if ps.is_done() {
        return Ok(Vec::new());
    }

    let values = ps.expect_next_u64_list()?;
    ps.expect_done_and(values)
}

/// Parses a semicolon-separated list of `id,arrival,service` jobs. A single
/// trailing semicolon is tolerated.
pub fn parse_job_list(input: &str) -> Result<Vec<JobSpec>, ParsingError> {
    let mut ps: ParseState = input.trim().as_bytes().into();
    let mut jobs = Vec::new();

    while !ps.is_done() {
        let job = match ps.expect_next_u64_list()?.as_slice() {
            &[id, arrival, service] => JobSpec::new(id, arrival, service),
            _ => return Err(ParsingError::WrongFieldCount),
        };
        jobs.push(job);

        if !ps.take_byte(b';') {
            break;
        }
    }

    ps.expect_done_and(jobs)
}

/// A level list given as a single command line value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TicksList(pub Vec<Ticks>);

impl FromStr for TicksList {
    type Err = ParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_ticks_list(s).map(Self)
    }
}

/// A workload given as a single command line value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JobList(pub Vec<JobSpec>);

impl FromStr for JobList {
    type Err = ParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_job_list(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const U64_MAX_PLUS_1: u128 = u64::MAX as u128 + 1;

    #[test]
    fn test_parse_ticks_list() {
        // Asserts the input parses into the given list successfully.
        #[track_caller]
        fn ok(input: &str, res: &[Ticks]) {
            assert_eq!(parse_ticks_list(input), Ok(res.to_vec()));
        }

        // Asserts the input fails to parse with the given error.
        #[track_caller]
        fn err(input: &str, error: ParsingError) {
            assert_eq!(parse_ticks_list(input), Err(error));
        }

        ok("", &[]);
        ok("  ", &[]);
        ok("7", &[7]);
        ok("1,2,3", &[1, 2, 3]);
        ok(" 4,6,8 ", &[4, 6, 8]);
        ok(&format!("{}", u64::MAX), &[u64::MAX]);

        err(&format!("{U64_MAX_PLUS_1}"), ParsingError::BadNumber);
        err("1,,2", ParsingError::BadNumber);
        err("1,2,", ParsingError::BadNumber);
        err(",1", ParsingError::BadNumber);
        err("-1", ParsingError::BadNumber);
        err("1, 2", ParsingError::BadNumber);
        err("1;2", ParsingError::BadFormat);
        err("3x", ParsingError::BadFormat);
    }

    #[test]
    fn test_parse_job_list() {
        #[track_caller]
        fn ok(input: &str, res: &[(u64, Ticks, Ticks)]) {
            let expected: Vec<_> =
                res.iter().map(|&(i, a, s)| JobSpec::new(i, a, s)).collect();
            assert_eq!(parse_job_list(input), Ok(expected));
        }

        #[track_caller]
        fn err(input: &str, error: ParsingError) {
            assert_eq!(parse_job_list(input), Err(error));
        }

        ok("", &[]);
        ok("1,0,10", &[(1, 0, 10)]);
        ok("1,0,10;2,5,10", &[(1, 0, 10), (2, 5, 10)]);
        ok("1,0,10;2,5,10;", &[(1, 0, 10), (2, 5, 10)]);
        // Zero service times are a configuration error, not a syntax one.
        ok("9,3,0", &[(9, 3, 0)]);

        err("1,0", ParsingError::WrongFieldCount);
        err("1,0,10,4", ParsingError::WrongFieldCount);
        err("1,0,10;2,5", ParsingError::WrongFieldCount);
        err("1,-1,10", ParsingError::BadNumber);
        err("1,0,10;;", ParsingError::BadNumber);
        err("a,0,10", ParsingError::BadNumber);
        err("1,0,10 2,5,10", ParsingError::BadFormat);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("1,2".parse::<TicksList>(), Ok(TicksList(vec![1, 2])));
        assert_eq!(
            "4,1,2".parse::<JobList>(),
            Ok(JobList(vec![JobSpec::new(4, 1, 2)]))
        );
        assert_eq!(
            ParsingError::WrongFieldCount.to_string(),
            "invalid job format, expected id,arrival,service"
        );
    }
}
