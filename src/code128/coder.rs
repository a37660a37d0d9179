use std::fmt::Write;

use super::CodeSet;
use crate::error::{FormatError, Result};

const A: u8 = 1;
const B: u8 = 2;
const C: u8 = 4;
const C_FIRST: u8 = 8;
const C_SECOND: u8 = 16;

/// Candidate code sets per character, in the order they are tried.
const FLAGS: [u8; 5] = [A, B, C, C_FIRST, C_SECOND];

/// Longest data accepted by [`code`].
pub const MAX_LENGTH: usize = 1024;

const UNREACHABLE: usize = usize::MAX / 4;

fn set_of(flag: u8) -> CodeSet {
    match flag {
        A => CodeSet::A,
        B => CodeSet::B,
        _ => CodeSet::C,
    }
}

/// Cost in half symbols of encoding a character as `flag` while `current`
/// is active.
fn step_cost(flag: u8, current: CodeSet) -> usize {
    let set = set_of(flag);
    let switch = 2 * (set != current) as usize;
    match flag {
        A | B => 2 + switch,
        _ => 1 + switch,
    }
}

fn allowed_flags(data: &[char]) -> Vec<u8> {
    let mut allowed = vec![0; data.len()];
    for (i, &c) in data.iter().enumerate() {
        if CodeSet::A.value(c).is_some() {
            allowed[i] |= A;
        }
        if CodeSet::B.value(c).is_some() {
            allowed[i] |= B;
        }
        if i + 1 < data.len() && c.is_ascii_digit() && data[i + 1].is_ascii_digit() {
            allowed[i] |= C_FIRST;
            allowed[i + 1] |= C_SECOND;
        }
    }
    allowed
}

/// Search state for one call of [`code`].
struct Search<'a> {
    allowed: &'a [u8],
    // cheapest completion from index i with the set active before i,
    // ignoring the pruning heuristics
    remaining: Vec<[usize; 3]>,
    current: Vec<u8>,
    best: Vec<u8>,
    best_cost: usize,
}

impl<'a> Search<'a> {
    fn new(allowed: &'a [u8]) -> Self {
        let n = allowed.len();
        let mut remaining = vec![[0; 3]; n + 1];
        for i in (0..n).rev() {
            for current in [CodeSet::A, CodeSet::B, CodeSet::C] {
                let mut cost = UNREACHABLE;
                for flag in [A, B] {
                    if allowed[i] & flag != 0 {
                        let next = remaining[i + 1][set_of(flag) as usize];
                        cost = cost.min(step_cost(flag, current) + next);
                    }
                }
                if allowed[i] & C_FIRST != 0 {
                    let next = remaining[i + 2][CodeSet::C as usize];
                    cost = cost.min(step_cost(C_FIRST, current) + 1 + next);
                }
                remaining[i][current as usize] = cost;
            }
        }
        Self {
            allowed,
            remaining,
            current: vec![0; n],
            best: vec![0; n],
            best_cost: usize::MAX,
        }
    }

    fn lower_bound(&self, index: usize, current: CodeSet) -> usize {
        if index > 0 && self.current[index - 1] == C_FIRST {
            1 + self.remaining[index + 1][CodeSet::C as usize]
        } else if index == 0 {
            self.remaining[0].iter().copied().min().unwrap_or(0)
        } else {
            self.remaining[index][current as usize]
        }
    }

    fn skip(&self, index: usize, flag: u8) -> bool {
        if index == 0 {
            return false;
        }
        let previous = self.current[index - 1];
        let allowed = self.allowed[index];
        if previous == C_FIRST {
            return flag != C_SECOND;
        }
        if flag == C_SECOND {
            return true;
        }
        match previous {
            // stay in A or B instead of switching between them
            A => allowed & A != 0 && flag == B,
            B => allowed & B != 0 && flag == A,
            // stay in C while there are pairs
            C_SECOND => allowed & C_FIRST != 0 && flag != C_FIRST,
            _ => false,
        }
    }

    fn solve(&mut self, index: usize, halves: usize, current: CodeSet) {
        if (halves + self.lower_bound(index, current)) / 2 >= self.best_cost {
            return;
        }
        for flag in FLAGS {
            if self.skip(index, flag) || self.allowed[index] & flag == 0 {
                continue;
            }
            // the first character never pays for a switch
            let current = if index == 0 { set_of(flag) } else { current };
            let halves = halves + step_cost(flag, current);
            self.current[index] = flag;
            if index + 1 == self.allowed.len() {
                let cost = halves / 2;
                if cost < self.best_cost {
                    self.best.copy_from_slice(&self.current);
                    self.best_cost = cost;
                }
            } else {
                self.solve(index + 1, halves, set_of(flag));
            }
        }
    }
}

/// Assign a code set to every character of `data`.
///
/// Finds the assignment of minimal length among those allowed by the
/// following rules: no switch between A and B while the current set can
/// encode the character, and no leaving C while digit pairs follow.
pub(crate) fn assign(data: &[char]) -> Vec<CodeSet> {
    let allowed = allowed_flags(data);
    if allowed.is_empty() {
        return Vec::new();
    }
    let mut search = Search::new(&allowed);
    search.solve(0, 0, CodeSet::A);
    search.best.iter().map(|flag| set_of(*flag)).collect()
}

/// Code `data` for encoding with Code 128.
///
/// The result starts with the start marker of the first code set and has
/// switch markers in front of every character where the set changes.
/// Characters must be ASCII.
pub fn code(data: &str) -> Result<String> {
    let chars: Vec<char> = data.chars().collect();
    if chars.is_empty() {
        return Err(FormatError::NoData.into());
    }
    if chars.len() > MAX_LENGTH {
        return Err(FormatError::TooLong {
            max: MAX_LENGTH,
            found: chars.len(),
        }
        .into());
    }
    if let Some(c) = chars.iter().find(|c| !c.is_ascii()) {
        return Err(FormatError::InvalidCharacter(*c).into());
    }

    let sets = assign(&chars);
    if log::log_enabled!(log::Level::Debug) {
        let mut assignment = String::with_capacity(sets.len());
        for set in &sets {
            let _ = write!(assignment, "{set:?}");
        }
        log::debug!("code 128 coding of {data:?}: {assignment}");
    }

    let mut coded = String::with_capacity(chars.len() + 4);
    let mut active = sets[0];
    coded.push(active.start());
    for (c, set) in chars.iter().zip(sets) {
        if set != active {
            coded.push(set.switch());
            active = set;
        }
        coded.push(*c);
    }
    Ok(coded)
}

#[cfg(test)]
use super::{CODE_A, CODE_B, CODE_C, START_A, START_B, START_C};

#[cfg(test)]
fn sets(data: &str) -> String {
    let chars: Vec<char> = data.chars().collect();
    assign(&chars).iter().map(|s| format!("{s:?}")).collect()
}

#[test]
fn test_digits_use_c() {
    assert_eq!(sets("1234"), "CCCC");
    assert_eq!(code("1234").unwrap(), format!("{START_C}1234"));
}

#[test]
fn test_lowercase_uses_b() {
    assert_eq!(sets("testing"), "BBBBBBB");
    assert_eq!(code("ab").unwrap(), format!("{START_B}ab"));
}

#[test]
fn test_control_uses_a() {
    assert_eq!(code("A\tB").unwrap(), format!("{START_A}A\tB"));
}

#[test]
fn test_odd_digits() {
    assert_eq!(sets("1"), "A");
    // ties keep the first assignment found
    assert_eq!(sets("123"), "AAA");
    assert_eq!(code("12345").unwrap(), format!("{START_A}1{CODE_C}2345"));
    assert_eq!(sets("123456"), "CCCCCC");
}

#[test]
fn test_switches() {
    assert_eq!(sets("testing123"), "BBBBBBBBBB");
    assert_eq!(
        code("ab123456").unwrap(),
        format!("{START_B}ab{CODE_C}123456")
    );
    assert_eq!(
        code("a\nb").unwrap(),
        format!("{START_B}a{CODE_A}\n{CODE_B}b")
    );
}

#[test]
fn test_reject() {
    assert_eq!(code(""), Err(FormatError::NoData.into()));
    assert_eq!(code("é"), Err(FormatError::InvalidCharacter('é').into()));
    let long = "1".repeat(MAX_LENGTH + 1);
    assert_eq!(
        code(&long),
        Err(FormatError::TooLong {
            max: MAX_LENGTH,
            found: MAX_LENGTH + 1
        }
        .into())
    );
}

#[test]
fn test_long_input() {
    // six digits save a symbol over the two switches, four would not
    assert_eq!(sets("a1234b"), "BBBBBB");
    assert_eq!(sets("a123456b"), "BCCCCCCB");

    let data: String = "a123456b".repeat(MAX_LENGTH / 8);
    assert_eq!(data.len(), MAX_LENGTH);
    let expected = format!("a{CODE_C}123456{CODE_B}b").repeat(MAX_LENGTH / 8);
    assert_eq!(code(&data).unwrap(), format!("{START_B}{expected}"));
}
