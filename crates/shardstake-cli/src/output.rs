//! Output formatting utilities.

use shardstake_state::{PeerRecord, UserPeerStake};

/// Records that can be printed as a table row.
pub trait TableRow {
    /// Column headings.
    fn header() -> String;
    /// One formatted row.
    fn row(&self) -> String;
}

impl TableRow for PeerRecord {
    fn header() -> String {
        format!(
            "{:<24} {:<40} {:>12} {:>12} {:>14} {:>10}",
            "PEER_KEY", "OWNER", "WHOLE_FEE", "FEE_BALANCE", "WHOLE_STAKE", "PROPORTION"
        )
    }

    fn row(&self) -> String {
        format!(
            "{:<24} {:<40} {:>12} {:>12} {:>14} {:>10}",
            truncate(&self.peer_key, 24),
            self.owner,
            self.whole_fee,
            self.fee_balance,
            self.whole_stake_amount,
            self.proportion
        )
    }
}

impl TableRow for UserPeerStake {
    fn header() -> String {
        format!("{:<24} {:>14} {:>14}", "PEER_KEY", "STAKE", "UNFREEZE")
    }

    fn row(&self) -> String {
        format!(
            "{:<24} {:>14} {:>14}",
            truncate(&self.peer_key, 24),
            self.stake_amount,
            self.unfreeze_amount
        )
    }
}

/// Prints a header line followed by a separator.
pub fn print_table_header<R: TableRow>() {
    let header = R::header();
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_keys_are_truncated() {
        let key = "ab".repeat(33);
        let shown = truncate(&key, 24);
        assert_eq!(shown.len(), 24);
        assert!(shown.ends_with("..."));
        assert_eq!(truncate("aa", 24), "aa");
    }

    #[test]
    fn stake_row_columns() {
        let row = UserPeerStake {
            peer_key: "aa".to_string(),
            stake_amount: 5,
            unfreeze_amount: 1,
        }
        .row();
        assert!(row.starts_with("aa "));
        assert!(row.trim_end().ends_with('1'));
    }
}
