use anyhow::{Result, bail};
use serde::Serialize;

/// Tranche ratings of the epoch pool, by on-chain index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrancheRating {
    S,
    AA,
    A,
}

impl TrancheRating {
    pub const ALL: [TrancheRating; 3] = [TrancheRating::S, TrancheRating::AA, TrancheRating::A];

    pub fn index(self) -> u8 {
        match self {
            TrancheRating::S => 0,
            TrancheRating::AA => 1,
            TrancheRating::A => 2,
        }
    }

    /// The A tranche requires staking SFI alongside the deposit, at the
    /// pool's published ratio.
    pub fn requires_sfi_staking(self) -> bool {
        self == TrancheRating::A
    }

    pub fn parse(input: &str) -> Result<Self> {
        match input.to_uppercase().as_str() {
            "S" => Ok(TrancheRating::S),
            "AA" => Ok(TrancheRating::AA),
            "A" => Ok(TrancheRating::A),
            other => bail!("unknown tranche rating '{other}' (expected S, AA, or A)"),
        }
    }
}

impl std::fmt::Display for TrancheRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrancheRating::S => write!(f, "S"),
            TrancheRating::AA => write!(f, "AA"),
            TrancheRating::A => write!(f, "A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(TrancheRating::parse("aa").unwrap(), TrancheRating::AA);
        assert_eq!(TrancheRating::parse("S").unwrap(), TrancheRating::S);
        assert!(TrancheRating::parse("B").is_err());
    }

    #[test]
    fn only_a_requires_sfi() {
        assert!(TrancheRating::A.requires_sfi_staking());
        assert!(!TrancheRating::S.requires_sfi_staking());
        assert!(!TrancheRating::AA.requires_sfi_staking());
    }
}
