/// Figures shown on the summary cards above the users table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_users: u64,
    pub users_with_loans: u64,
    pub users_with_savings: u64,
}

impl DashboardStats {
    /// Static placeholder figures.
    ///
    /// These are not derived from the cached collection and do not change
    /// when it does. Nothing should compute with them.
    pub const fn placeholder() -> Self {
        Self {
            total_users: 2_453,
            active_users: 2_453,
            users_with_loans: 12_453,
            users_with_savings: 102_453,
        }
    }

    /// Card labels paired with their values, in display order.
    pub fn cards(&self) -> [(&'static str, u64); 4] {
        [
            ("USERS", self.total_users),
            ("ACTIVE USERS", self.active_users),
            ("USERS WITH LOANS", self.users_with_loans),
            ("USERS WITH SAVINGS", self.users_with_savings),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_cards() {
        let cards = DashboardStats::placeholder().cards();
        assert_eq!(cards[0], ("USERS", 2_453));
        assert_eq!(cards[2], ("USERS WITH LOANS", 12_453));
        assert_eq!(cards[3], ("USERS WITH SAVINGS", 102_453));
    }
}
